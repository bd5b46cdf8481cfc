//! Platform abstraction layer
//!
//! Collaborators the game talks to without knowing the browser:
//! - `Surface`: 2D drawing
//! - `SignalSource`: microphone amplitude samples
//! - `SoundPlayer`: one-shot sound effects
//!
//! Storage lives in `persistence`. Browser implementations are wasm only.

#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(test)]
pub(crate) mod recording;

/// Horizontal text anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
    }
}

/// Fixed-size 2D drawing context, modelled on the canvas 2D API
pub trait Surface {
    fn width(&self) -> f32;
    fn height(&self) -> f32;

    fn clear_rect(&mut self, x: f32, y: f32, w: f32, h: f32);
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32);
    fn fill_circle(&mut self, x: f32, y: f32, r: f32);
    /// Stroke an arc from `start` to `end` radians
    fn stroke_arc(&mut self, x: f32, y: f32, r: f32, start: f32, end: f32, anticlockwise: bool);
    fn fill_text(&mut self, text: &str, x: f32, y: f32);

    /// CSS color string
    fn set_fill_style(&mut self, color: &str);
    fn set_stroke_style(&mut self, color: &str);
    fn set_line_width(&mut self, width: f32);
    /// CSS font string, e.g. `"22px Arial"`
    fn set_font(&mut self, font: &str);
    fn set_text_align(&mut self, align: TextAlign);

    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, x: f32, y: f32);
    fn rotate(&mut self, angle: f32);
}

/// Source of byte amplitude samples (0-255, 128 = silence)
pub trait SignalSource {
    /// Fill `buf` with the most recent samples
    fn read_samples(&mut self, buf: &mut [u8]);
    /// Release the underlying device. Reads after close yield silence.
    fn close(&mut self) {}
}

/// Sound effects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Dust hit an obstacle
    Hit,
}

/// Plays sound effects, restarting a clip that is already playing
pub trait SoundPlayer {
    fn play(&mut self, effect: SoundEffect);
}

/// Player that drops everything (native runs, tests)
#[derive(Debug, Default)]
pub struct SilentPlayer;

impl SoundPlayer for SilentPlayer {
    fn play(&mut self, _effect: SoundEffect) {}
}

/// Surface that draws nothing (headless runs)
#[derive(Debug, Default)]
pub struct NullSurface;

impl Surface for NullSurface {
    fn width(&self) -> f32 {
        crate::consts::SCREEN_WIDTH
    }
    fn height(&self) -> f32 {
        crate::consts::SCREEN_HEIGHT
    }
    fn clear_rect(&mut self, _x: f32, _y: f32, _w: f32, _h: f32) {}
    fn fill_rect(&mut self, _x: f32, _y: f32, _w: f32, _h: f32) {}
    fn fill_circle(&mut self, _x: f32, _y: f32, _r: f32) {}
    fn stroke_arc(&mut self, _x: f32, _y: f32, _r: f32, _start: f32, _end: f32, _ccw: bool) {}
    fn fill_text(&mut self, _text: &str, _x: f32, _y: f32) {}
    fn set_fill_style(&mut self, _color: &str) {}
    fn set_stroke_style(&mut self, _color: &str) {}
    fn set_line_width(&mut self, _width: f32) {}
    fn set_font(&mut self, _font: &str) {}
    fn set_text_align(&mut self, _align: TextAlign) {}
    fn save(&mut self) {}
    fn restore(&mut self) {}
    fn translate(&mut self, _x: f32, _y: f32) {}
    fn rotate(&mut self, _angle: f32) {}
}
