//! Session orchestration
//!
//! [`Game`] owns the simulation state and its collaborators (storage, sound,
//! microphone) and runs one animation frame at a time. The host calls
//! [`Game::frame`] from `requestAnimationFrame` and schedules another frame
//! only while it returns [`FrameOutcome::Continue`].

use crate::consts::SIGNAL_BUFFER_LEN;
use crate::error::{GameError, Result};
use crate::highscores::Leaderboard;
use crate::persistence::KeyValueStore;
use crate::platform::{SignalSource, SoundEffect, SoundPlayer, Surface};
use crate::renderer;
use crate::settings::Settings;
use crate::sim::{
    ControlMode, GameEvent, GamePhase, GameState, InputEvent, TickInput, rms_volume, tick,
};

/// Whether the host should request another animation frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Continue,
    Stop,
}

/// Game instance holding all state
pub struct Game {
    state: GameState,
    leaderboard: Leaderboard,
    settings: Settings,
    store: Box<dyn KeyValueStore>,
    sound: Box<dyn SoundPlayer>,
    signal: Option<Box<dyn SignalSource>>,
    /// Events captured since the last frame
    queue: Vec<InputEvent>,
    samples: [u8; SIGNAL_BUFFER_LEN],
}

impl Game {
    /// Create an idle game, loading settings and the leaderboard from `store`
    pub fn new(seed: u64, store: Box<dyn KeyValueStore>, sound: Box<dyn SoundPlayer>) -> Self {
        let settings = Settings::load(store.as_ref());
        let leaderboard = Leaderboard::load(store.as_ref());
        Self {
            state: GameState::new(seed),
            leaderboard,
            settings,
            store,
            sound,
            signal: None,
            queue: Vec::new(),
            samples: [128; SIGNAL_BUFFER_LEN],
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Queue an input event for the next frame. Dropped at the menu, where
    /// no frames run to drain it.
    pub fn push_input(&mut self, event: InputEvent) {
        if self.state.phase == GamePhase::Idle {
            return;
        }
        self.queue.push(event);
    }

    /// Enter click mode
    pub fn start_click(&mut self, now_ms: f64) -> Result<()> {
        self.begin(ControlMode::Click, None, now_ms)
    }

    /// Enter signal mode with the outcome of the microphone request.
    ///
    /// A failed request is returned unchanged and the game stays where it was.
    pub fn start_signal(
        &mut self,
        opened: Result<Box<dyn SignalSource>>,
        now_ms: f64,
    ) -> Result<()> {
        let source = match opened {
            Ok(source) => source,
            Err(e) => {
                log::error!("Voice mode unavailable: {}", e);
                return Err(e);
            }
        };
        self.begin(ControlMode::Signal, Some(source), now_ms)
    }

    fn begin(
        &mut self,
        mode: ControlMode,
        source: Option<Box<dyn SignalSource>>,
        now_ms: f64,
    ) -> Result<()> {
        if self.state.is_playing() {
            if let Some(mut source) = source {
                source.close();
            }
            return Err(GameError::SessionActive);
        }
        self.reset(now_ms)?;

        self.close_signal();
        self.signal = source;
        self.queue.clear();
        self.state.mode = Some(mode);
        self.state.phase = GamePhase::Playing;

        if self.settings.last_mode != Some(mode) {
            self.settings.last_mode = Some(mode);
            if let Err(e) = self.settings.save(self.store.as_mut()) {
                log::warn!("Could not save settings: {}", e);
            }
        }

        log::info!("Started {} mode (seed {})", mode.as_str(), self.state.seed);
        Ok(())
    }

    /// Reset the session layout. Not allowed mid-game.
    pub fn reset(&mut self, now_ms: f64) -> Result<()> {
        if self.state.is_playing() {
            return Err(GameError::SessionActive);
        }
        self.state.reset(now_ms);
        Ok(())
    }

    /// Run one animation frame: input, simulation, rendering
    pub fn frame(&mut self, now_ms: f64, surface: &mut dyn Surface) -> FrameOutcome {
        let events = std::mem::take(&mut self.queue);

        match self.state.phase {
            GamePhase::Idle => FrameOutcome::Stop,
            GamePhase::Playing => {
                let mut input = TickInput {
                    threshold: self.settings.effective_threshold(),
                    ..TickInput::at(now_ms)
                }
                .with_events(&events);

                if self.state.mode == Some(ControlMode::Signal) {
                    if let Some(signal) = self.signal.as_mut() {
                        signal.read_samples(&mut self.samples);
                        input.volume = Some(rms_volume(&self.samples));
                    }
                }

                for event in tick(&mut self.state, &input) {
                    match event {
                        GameEvent::Collided => {
                            self.sound.play(SoundEffect::Hit);
                            log::info!("Game over with score {}", self.state.score);
                        }
                        GameEvent::Scored { score } => log::debug!("Score {}", score),
                        GameEvent::Jumped => log::trace!("Jump at y={:.1}", self.state.character.y),
                        GameEvent::ObstacleSpawned => {
                            log::trace!("Obstacles on screen: {}", self.state.obstacles.len())
                        }
                    }
                }

                if self.state.phase == GamePhase::GameOver {
                    self.record_final_score();
                    renderer::render_game_over(surface, &self.state, &self.leaderboard);
                } else {
                    renderer::render_playing(surface, &self.state);
                }
                FrameOutcome::Continue
            }
            GamePhase::GameOver => {
                if events.iter().any(InputEvent::is_return_key) {
                    self.return_to_menu();
                    return FrameOutcome::Stop;
                }
                self.record_final_score();
                renderer::render_game_over(surface, &self.state, &self.leaderboard);
                FrameOutcome::Continue
            }
        }
    }

    /// Push the session's score to the leaderboard, once per session
    fn record_final_score(&mut self) {
        if self.state.leaderboard_recorded {
            return;
        }
        self.state.leaderboard_recorded = true;
        let previous_best = self.leaderboard.top_score();
        self.leaderboard = Leaderboard::record(self.store.as_mut(), self.state.score);
        if previous_best.is_none_or(|best| self.state.score > best) {
            log::info!("New best score: {}", self.state.score);
        }
    }

    fn return_to_menu(&mut self) {
        self.state.phase = GamePhase::Idle;
        self.state.mode = None;
        self.close_signal();
        log::info!("Returned to menu");
    }

    fn close_signal(&mut self) {
        if let Some(mut signal) = self.signal.take() {
            signal.close();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::persistence::MemoryStore;
    use crate::platform::recording::{CountingPlayer, RecordingSurface, ScriptedSignal};
    use crate::sim::Obstacle;

    const FRAME_MS: f64 = 16.0;

    fn new_game() -> (Game, CountingPlayer) {
        let sound = CountingPlayer::default();
        let game = Game::new(2024, Box::new(MemoryStore::new()), Box::new(sound.clone()));
        (game, sound)
    }

    /// Put a solid wall right on the dust so the next frame collides
    fn block_dust(game: &mut Game) {
        game.state.obstacles.push(Obstacle::new(CHARACTER_X, SCREEN_HEIGHT));
    }

    #[test]
    fn test_click_mode_starts_playing() {
        let (mut game, _) = new_game();
        assert_eq!(game.phase(), GamePhase::Idle);
        game.start_click(100.0).unwrap();
        assert_eq!(game.phase(), GamePhase::Playing);
        assert_eq!(game.state().mode, Some(ControlMode::Click));
        assert_eq!(game.state().last_spawn_ms, 100.0);
        assert_eq!(game.settings().last_mode, Some(ControlMode::Click));
    }

    #[test]
    fn test_permission_denied_stays_idle() {
        let (mut game, _) = new_game();
        let err = game
            .start_signal(Err(GameError::PermissionDenied("NotAllowedError".into())), 0.0)
            .unwrap_err();
        assert!(matches!(err, GameError::PermissionDenied(_)));
        assert_eq!(game.phase(), GamePhase::Idle);
        assert_eq!(game.state().mode, None);

        let mut surface = RecordingSurface::default();
        assert_eq!(game.frame(16.0, &mut surface), FrameOutcome::Stop);
        assert!(surface.calls.is_empty());
    }

    #[test]
    fn test_start_while_playing_rejected() {
        let (mut game, _) = new_game();
        game.start_click(0.0).unwrap();
        assert!(matches!(game.start_click(5.0), Err(GameError::SessionActive)));
        assert!(matches!(game.reset(5.0), Err(GameError::SessionActive)));

        let mic = ScriptedSignal::default();
        let result = game.start_signal(Ok(Box::new(mic.clone())), 5.0);
        assert!(matches!(result, Err(GameError::SessionActive)));
        assert!(*mic.closed.borrow());
        assert_eq!(game.state().mode, Some(ControlMode::Click));
        assert_eq!(game.state().last_spawn_ms, 0.0);
    }

    #[test]
    fn test_input_at_menu_is_dropped() {
        let (mut game, _) = new_game();
        for _ in 0..100 {
            game.push_input(InputEvent::Key("a".into()));
            game.push_input(InputEvent::Click);
        }
        assert!(game.queue.is_empty());

        game.start_click(0.0).unwrap();
        game.push_input(InputEvent::Click);
        assert_eq!(game.queue, vec![InputEvent::Click]);
    }

    #[test]
    fn test_last_mode_survives_restart() {
        let (mut game, _) = new_game();
        game.start_signal(Ok(Box::new(ScriptedSignal::default())), 0.0)
            .unwrap();

        let saved = Settings::load(game.store.as_ref());
        assert_eq!(saved.last_mode, Some(ControlMode::Signal));
    }

    #[test]
    fn test_clicks_queue_into_one_impulse() {
        let (mut game, _) = new_game();
        game.start_click(0.0).unwrap();
        game.push_input(InputEvent::Click);
        game.push_input(InputEvent::Click);

        let mut surface = RecordingSurface::default();
        game.frame(FRAME_MS, &mut surface);
        assert_eq!(game.state().character.vel, (JUMP_IMPULSE + GRAVITY) * DAMPING);

        // Queue was drained
        game.frame(2.0 * FRAME_MS, &mut surface);
        assert!(game.state().character.vel > JUMP_IMPULSE + GRAVITY);
    }

    #[test]
    fn test_signal_mode_jumps_on_loud_frames() {
        let (mut game, _) = new_game();
        let mic = ScriptedSignal::with_levels([128, 150, 150, 128]);
        game.start_signal(Ok(Box::new(mic.clone())), 0.0).unwrap();

        let mut surface = RecordingSurface::default();
        let mut vels = Vec::new();
        for i in 1..=4 {
            game.frame(i as f64 * FRAME_MS, &mut surface);
            vels.push(game.state().character.vel);
        }
        let jumped = (JUMP_IMPULSE + GRAVITY) * DAMPING;
        assert_ne!(vels[0], jumped);
        assert_eq!(vels[1], jumped);
        assert_eq!(vels[2], jumped);
        assert_ne!(vels[3], jumped);
        assert_eq!(game.state().volume, 0.0);
    }

    #[test]
    fn test_collision_plays_sound_once_and_records_once() {
        let (mut game, sound) = new_game();
        game.start_click(0.0).unwrap();
        game.state.score = 4;
        block_dust(&mut game);
        block_dust(&mut game);

        let mut surface = RecordingSurface::default();
        assert_eq!(game.frame(FRAME_MS, &mut surface), FrameOutcome::Continue);
        assert_eq!(game.phase(), GamePhase::GameOver);
        assert_eq!(*sound.played.borrow(), vec![SoundEffect::Hit]);

        for i in 2..30 {
            game.push_input(InputEvent::Click);
            assert_eq!(game.frame(i as f64 * FRAME_MS, &mut surface), FrameOutcome::Continue);
        }
        assert_eq!(game.leaderboard().scores(), &[4]);
        assert_eq!(Leaderboard::load(game.store.as_ref()).scores(), &[4]);
        assert_eq!(sound.played.borrow().len(), 1);
        assert!(surface.texts().contains(&"1. 4 pts"));
    }

    #[test]
    fn test_enter_only_honoured_in_game_over() {
        let (mut game, _) = new_game();
        let mic = ScriptedSignal::default();
        game.start_signal(Ok(Box::new(mic.clone())), 0.0).unwrap();

        let mut surface = RecordingSurface::default();
        game.push_input(InputEvent::Key("Enter".into()));
        assert_eq!(game.frame(FRAME_MS, &mut surface), FrameOutcome::Continue);
        assert_eq!(game.phase(), GamePhase::Playing);

        block_dust(&mut game);
        game.frame(2.0 * FRAME_MS, &mut surface);
        assert_eq!(game.phase(), GamePhase::GameOver);

        game.push_input(InputEvent::Key("Escape".into()));
        assert_eq!(game.frame(3.0 * FRAME_MS, &mut surface), FrameOutcome::Continue);

        game.push_input(InputEvent::Key("Enter".into()));
        assert_eq!(game.frame(4.0 * FRAME_MS, &mut surface), FrameOutcome::Stop);
        assert_eq!(game.phase(), GamePhase::Idle);
        assert_eq!(game.state().mode, None);
        assert!(*mic.closed.borrow());
    }

    #[test]
    fn test_new_session_after_game_over_is_fresh() {
        let (mut game, _) = new_game();
        game.start_click(0.0).unwrap();
        game.state.score = 2;
        block_dust(&mut game);
        let mut surface = RecordingSurface::default();
        game.frame(FRAME_MS, &mut surface);
        assert_eq!(game.phase(), GamePhase::GameOver);

        // Straight from GameOver into another run
        game.start_click(500.0).unwrap();
        let state = game.state();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.character.y, START_Y);
        assert!(!state.leaderboard_recorded);
    }

    #[test]
    fn test_leaderboard_across_sessions() {
        let (mut game, _) = new_game();
        let mut surface = RecordingSurface::default();
        let mut t = 0.0;
        for score in [10, 50, 30, 20, 40, 5] {
            game.start_click(t).unwrap();
            game.state.score = score;
            block_dust(&mut game);
            t += FRAME_MS;
            game.frame(t, &mut surface);
            game.push_input(InputEvent::Key("Enter".into()));
            t += FRAME_MS;
            assert_eq!(game.frame(t, &mut surface), FrameOutcome::Stop);
        }
        assert_eq!(game.leaderboard().scores(), &[50, 40, 30, 20, 10]);
    }

    #[test]
    fn test_malformed_leaderboard_does_not_break_game_over() {
        let mut store = MemoryStore::new();
        store.set(Leaderboard::STORAGE_KEY, "oops").unwrap();
        let mut game = Game::new(1, Box::new(store), Box::new(CountingPlayer::default()));
        assert!(game.leaderboard().is_empty());

        game.start_click(0.0).unwrap();
        game.state.score = 6;
        block_dust(&mut game);
        let mut surface = RecordingSurface::default();
        game.frame(FRAME_MS, &mut surface);
        assert_eq!(game.leaderboard().scores(), &[6]);
    }

    /// Click whenever the dust sinks below the middle of the gap it is
    /// heading for; stop steering once three obstacles are fully behind it.
    #[test]
    fn test_end_to_end_three_points_then_crash() {
        let (mut game, sound) = new_game();
        game.start_click(0.0).unwrap();

        let mut surface = RecordingSurface::default();
        let mut t = 0.0;
        let mut frames = 0;
        while game.phase() == GamePhase::Playing {
            frames += 1;
            assert!(frames < 5_000, "dust never crashed");

            let state = game.state();
            let still_overlapping_passed = state
                .obstacles
                .iter()
                .any(|o| o.passed && o.right_edge() >= CHARACTER_X - CHARACTER_HALF);
            let steering = state.score < 3 || still_overlapping_passed;
            if steering {
                let target = state
                    .obstacles
                    .iter()
                    .find(|o| o.right_edge() > CHARACTER_X - CHARACTER_HALF)
                    .map(|o| (o.gap_top + o.gap_bottom) / 2.0)
                    .unwrap_or(START_Y);
                if state.character.y > target + 20.0 {
                    game.push_input(InputEvent::Click);
                }
            }

            t += FRAME_MS;
            game.frame(t, &mut surface);
        }

        assert_eq!(game.phase(), GamePhase::GameOver);
        assert_eq!(game.state().score, 3);
        assert_eq!(sound.played.borrow().len(), 1);
        assert_eq!(game.leaderboard().scores(), &[3]);
    }
}
