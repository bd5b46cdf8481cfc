//! Browser audio: the hit sound effect and the microphone input
//!
//! The hit sound is a pre-recorded clip, restarted from the beginning on
//! every play. The microphone is read through an `AnalyserNode` as
//! time-domain byte samples.

use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    AnalyserNode, AudioContext, HtmlAudioElement, MediaStream, MediaStreamAudioSourceNode,
    MediaStreamConstraints, MediaStreamTrack,
};

use crate::consts::SIGNAL_BUFFER_LEN;
use crate::error::{GameError, Result, js_error_name, js_message};
use crate::platform::{SignalSource, SoundEffect, SoundPlayer};
use crate::settings::Settings;

/// Path of the collision clip, relative to the page
const HIT_SOUND_URL: &str = "hit.mp3";

/// Sound effect playback
pub struct AudioManager {
    hit: Option<HtmlAudioElement>,
    volume: f32,
}

impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        let hit = HtmlAudioElement::new_with_src(HIT_SOUND_URL).ok();
        if hit.is_none() {
            log::warn!("Failed to create audio element - sound disabled");
        }
        Self {
            hit,
            volume: settings.effective_volume(),
        }
    }
}

impl SoundPlayer for AudioManager {
    fn play(&mut self, effect: SoundEffect) {
        if self.volume <= 0.0 {
            return;
        }
        let clip = match effect {
            SoundEffect::Hit => self.hit.as_ref(),
        };
        let Some(clip) = clip else { return };

        clip.set_current_time(0.0);
        clip.set_volume(self.volume as f64);
        // Autoplay rejections are not worth surfacing
        let _ = clip.play();
    }
}

/// Live microphone input
pub struct Microphone {
    ctx: AudioContext,
    analyser: AnalyserNode,
    stream: MediaStream,
    _source: MediaStreamAudioSourceNode,
    closed: bool,
}

impl Microphone {
    /// Ask for microphone access and wire it into an analyser.
    ///
    /// A refused prompt is `GameError::PermissionDenied`; a missing or busy
    /// device is `GameError::AudioUnavailable`.
    pub async fn open() -> Result<Self> {
        let window = web_sys::window()
            .ok_or_else(|| GameError::AudioUnavailable("no window".into()))?;
        let devices = window
            .navigator()
            .media_devices()
            .map_err(|e| GameError::AudioUnavailable(js_message(&e)))?;

        let constraints = MediaStreamConstraints::new();
        constraints.set_audio(&JsValue::TRUE);
        let request = devices
            .get_user_media_with_constraints(&constraints)
            .map_err(|e| GameError::AudioUnavailable(js_message(&e)))?;

        let stream: MediaStream = JsFuture::from(request)
            .await
            .map_err(|e| GameError::from_media_rejection(&js_error_name(&e), js_message(&e)))?
            .dyn_into()
            .map_err(|e| GameError::AudioUnavailable(js_message(&e)))?;

        match Self::connect(&stream) {
            Ok((ctx, analyser, source)) => {
                log::info!("Microphone opened");
                Ok(Self {
                    ctx,
                    analyser,
                    stream,
                    _source: source,
                    closed: false,
                })
            }
            Err(e) => {
                stop_tracks(&stream);
                Err(e)
            }
        }
    }

    fn connect(
        stream: &MediaStream,
    ) -> Result<(AudioContext, AnalyserNode, MediaStreamAudioSourceNode)> {
        let unavailable = |e: JsValue| GameError::AudioUnavailable(js_message(&e));

        let ctx = AudioContext::new().map_err(unavailable)?;
        let analyser = ctx.create_analyser().map_err(unavailable)?;
        analyser.set_fft_size((SIGNAL_BUFFER_LEN * 2) as u32);
        let source = ctx.create_media_stream_source(stream).map_err(unavailable)?;
        source
            .connect_with_audio_node(&analyser)
            .map_err(unavailable)?;
        Ok((ctx, analyser, source))
    }
}

impl SignalSource for Microphone {
    fn read_samples(&mut self, buf: &mut [u8]) {
        if self.closed {
            buf.fill(128);
            return;
        }
        self.analyser.get_byte_time_domain_data(buf);
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        stop_tracks(&self.stream);
        let _ = self.ctx.close();
        log::info!("Microphone closed");
    }
}

impl Drop for Microphone {
    fn drop(&mut self) {
        self.close();
    }
}

fn stop_tracks(stream: &MediaStream) {
    for track in stream.get_tracks().iter() {
        if let Ok(track) = track.dyn_into::<MediaStreamTrack>() {
            track.stop();
        }
    }
}
