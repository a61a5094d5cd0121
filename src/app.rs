//! App - Service container for one player's session
//!
//! Built explicitly with its stores; nothing here is global. The host owns
//! an `App` and calls into it from its render loop and input handlers.

use crate::game::{GameConfig, GameState, PanPhase, Scene, SceneSnapshot};
use crate::storage::{KeyValueStore, Leaderboard, Settings};

pub struct App<S: KeyValueStore> {
    settings: Settings<S>,
    leaderboard: Leaderboard<S>,
    scene: Scene,
    /// Set once the finished run has been recorded
    run_recorded: bool,
}

impl<S: KeyValueStore> App<S> {
    /// Load settings and scores from their stores and build a fresh scene
    pub fn new(config: GameConfig, settings_store: S, leaderboard_store: S) -> Self {
        Self {
            settings: Settings::load(settings_store),
            leaderboard: Leaderboard::load(leaderboard_store),
            scene: Scene::new(config),
            run_recorded: false,
        }
    }

    /// Current user preferences
    pub fn settings(&self) -> &Settings<S> {
        &self.settings
    }

    /// Preferences for editing; every setter persists immediately
    pub fn settings_mut(&mut self) -> &mut Settings<S> {
        &mut self.settings
    }

    /// Saved top scores
    pub fn leaderboard(&self) -> &Leaderboard<S> {
        &self.leaderboard
    }

    /// The scene being played
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Start a new run, resetting the scene if a previous one was played
    pub fn start_run(&mut self) {
        if self.scene.state() != GameState::Ready {
            self.scene.reset();
        }
        self.run_recorded = false;
        self.scene.start();
    }

    /// Pause the current run
    pub fn pause(&mut self) {
        self.scene.pause();
    }

    /// Resume a paused run
    pub fn resume(&mut self) {
        self.scene.resume();
    }

    /// Per-frame entry point
    pub fn update(&mut self, delta: f32) -> SceneSnapshot {
        self.scene.update(delta);
        self.scene.snapshot()
    }

    /// Drag input, scaled by the control sensitivity setting
    pub fn pan(&mut self, phase: PanPhase, delta_x: f32) {
        // Sensitivity 0.5 is neutral
        let scale = self.settings.control_sensitivity() * 2.0;
        self.scene.pan(phase, delta_x * scale);
    }

    /// Boost tap. Returns whether a boost started.
    pub fn boost(&mut self) -> bool {
        self.scene.boost()
    }

    /// Stop the current run where it is, so it can be recorded
    pub fn end_run(&mut self) {
        self.scene.end_run();
    }

    /// Record the finished run if it qualifies. Returns the leaderboard
    /// position, or `None` if the run is still going, was already recorded,
    /// or didn't make the board.
    pub fn finish_run(&mut self) -> Option<usize> {
        if self.scene.state() != GameState::GameOver || self.run_recorded {
            return None;
        }
        self.run_recorded = true;

        let score = self.scene.score();
        if !self.leaderboard.is_high_score(score) {
            log::info!("Run ended with {}, not a high score", score);
            return None;
        }

        let name = self.settings.player_name().to_string();
        self.leaderboard.add_score_now(name, score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::TrackConfig;
    use crate::storage::MemoryStore;

    const DT: f32 = 1.0 / 60.0;

    fn crowded_config() -> GameConfig {
        GameConfig {
            track: TrackConfig {
                min_obstacles: 12,
                max_obstacles: 12,
                safe_segments: 1,
                obstacle_margin: 0.0,
                min_obstacle_size: 2.5,
                max_obstacle_size: 3.0,
                track_half_width: 3.0,
                ..TrackConfig::default()
            },
            ..GameConfig::default()
        }
        .with_seed(21)
    }

    fn play_until_over(app: &mut App<MemoryStore>) {
        app.start_run();
        for _ in 0..60 * 120 {
            if app.update(DT).state == GameState::GameOver {
                return;
            }
        }
        panic!("run never ended");
    }

    #[test]
    fn finished_run_is_recorded_once() {
        let mut app = App::new(crowded_config(), MemoryStore::new(), MemoryStore::new());
        app.settings_mut().set_player_name("Ada");

        assert_eq!(app.finish_run(), None);
        play_until_over(&mut app);

        assert_eq!(app.finish_run(), Some(1));
        assert_eq!(app.finish_run(), None);

        let entry = &app.leaderboard().entries()[0];
        assert_eq!(entry.name, "Ada");
        assert_eq!(entry.score, app.scene().score());
    }

    #[test]
    fn start_run_after_game_over_resets() {
        let mut app = App::new(crowded_config(), MemoryStore::new(), MemoryStore::new());
        play_until_over(&mut app);
        app.finish_run();

        app.start_run();
        assert_eq!(app.scene().state(), GameState::Playing);
        assert_eq!(app.scene().score(), 0);
    }

    #[test]
    fn run_ended_early_is_recorded() {
        let config = GameConfig {
            track: TrackConfig {
                min_obstacles: 0,
                max_obstacles: 0,
                ..TrackConfig::default()
            },
            ..GameConfig::default()
        };
        let mut app = App::new(config, MemoryStore::new(), MemoryStore::new());
        app.start_run();
        for _ in 0..300 {
            app.update(DT);
        }
        assert_eq!(app.finish_run(), None);

        app.end_run();
        assert_eq!(app.finish_run(), Some(1));
        assert_eq!(app.leaderboard().entries()[0].score, app.scene().score());
        assert!(app.scene().score() > 0);
    }

    #[test]
    fn zero_sensitivity_disables_drift() {
        let config = GameConfig {
            track: TrackConfig {
                min_obstacles: 0,
                max_obstacles: 0,
                ..TrackConfig::default()
            },
            ..GameConfig::default()
        };
        let mut app = App::new(config, MemoryStore::new(), MemoryStore::new());
        app.settings_mut().set_control_sensitivity(0.0);
        app.start_run();
        app.pan(PanPhase::Began, 80.0);
        for _ in 0..60 {
            app.update(DT);
        }
        assert_eq!(app.scene().body().position.x, 0.0);
    }
}
