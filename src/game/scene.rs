//! Scene - Per-frame orchestration
//!
//! Owns the player, its physics body, the track and the camera. The render
//! loop calls `update` once per frame; input arrives between frames through
//! `pan` and `boost`.

use std::time::Instant;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::game::camera::FollowCamera;
use crate::game::config::GameConfig;
use crate::game::physics::{PhysicsBody, SimpleBody};
use crate::game::player::{PanPhase, Player, PlayerState};
use crate::game::track::{ObstacleKind, TrackGenerator};

/// Height the craft hovers at
const HOVER_HEIGHT: f32 = 0.5;
/// Z the craft starts from, inside the first (obstacle-free) segment
const START_Z: f32 = 5.0;

/// Run state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    Ready,
    Playing,
    Paused,
    GameOver,
}

/// Scene statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneStats {
    pub frames: u64,
    pub avg_update_time_ms: f32,
    pub segment_count: u32,
    pub recycled_segments: u64,
    pub game_state: GameState,
}

/// Obstacle as seen by a renderer this frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstacleSnapshot {
    pub kind: ObstacleKind,
    pub position: Vec3,
    pub size: f32,
    pub color: [f32; 3],
    pub intensity: f32,
}

/// Compact scene view for the presentation layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneSnapshot {
    pub state: GameState,
    pub elapsed_time: f32,
    pub score: u32,
    pub player: PlayerState,
    pub craft_position: Vec3,
    pub camera_position: Vec3,
    pub camera_look_at: Vec3,
    pub obstacles: Vec<ObstacleSnapshot>,
}

pub struct Scene<B: PhysicsBody = SimpleBody> {
    state: GameState,
    config: GameConfig,
    player: Player,
    body: B,
    track: TrackGenerator,
    camera: FollowCamera,
    /// Seconds spent in `Playing`
    elapsed_time: f32,
    frames: u64,
    /// Recent update times for averaging
    update_times: Vec<f32>,
}

impl Scene<SimpleBody> {
    /// Scene with the built-in point-mass body
    pub fn new(config: GameConfig) -> Self {
        let body = SimpleBody::default().with_lateral_limit(config.track.track_half_width - config.craft_radius);
        Self::with_body(config, body)
    }
}

impl<B: PhysicsBody> Scene<B> {
    /// Scene driving an externally provided body
    pub fn with_body(config: GameConfig, body: B) -> Self {
        let mut scene = Self {
            state: GameState::Ready,
            player: Player::new(config.player.clone()),
            track: TrackGenerator::new(config.track.clone(), config.seed),
            camera: FollowCamera::new(config.camera.clone()),
            body,
            config,
            elapsed_time: 0.0,
            frames: 0,
            update_times: Vec::with_capacity(60),
        };
        scene.place_at_start();
        scene
    }

    fn place_at_start(&mut self) {
        let start = Vec3::new(0.0, HOVER_HEIGHT, START_Z);
        self.body.teleport(start);
        self.camera.snap_to(start);
    }

    /// Begin the run
    pub fn start(&mut self) {
        if self.state == GameState::Ready {
            self.state = GameState::Playing;
            log::info!("Run started");
        }
    }

    /// Freeze the run; updates are ignored until `resume`
    pub fn pause(&mut self) {
        if self.state == GameState::Playing {
            self.state = GameState::Paused;
            log::info!("Run paused");
        }
    }

    /// Continue a paused run
    pub fn resume(&mut self) {
        if self.state == GameState::Paused {
            self.state = GameState::Playing;
            log::info!("Run resumed");
        }
    }

    /// End the run early, keeping the score reached so far
    pub fn end_run(&mut self) {
        if matches!(self.state, GameState::Playing | GameState::Paused) {
            self.state = GameState::GameOver;
            log::info!("Run ended early, score {}", self.score());
        }
    }

    /// Back to a fresh `Ready` scene with a regenerated track
    pub fn reset(&mut self) {
        self.state = GameState::Ready;
        self.player.reset();
        self.track.reset();
        self.place_at_start();
        self.elapsed_time = 0.0;
        self.frames = 0;
        self.update_times.clear();
        log::info!("Scene reset");
    }

    /// Route a drag gesture to the player. Ignored unless playing.
    pub fn pan(&mut self, phase: PanPhase, delta_x: f32) {
        if self.state == GameState::Playing {
            self.player.pan(phase, delta_x);
        }
    }

    /// Route a boost tap to the player. Returns whether a boost started.
    pub fn boost(&mut self) -> bool {
        self.state == GameState::Playing && self.player.activate_boost()
    }

    /// Advance one frame
    pub fn update(&mut self, delta: f32) {
        if self.state != GameState::Playing {
            return;
        }

        let update_start = Instant::now();

        self.elapsed_time += delta;
        self.frames += 1;

        self.player.update(delta, &mut self.body);
        self.body.step(delta);

        let craft = self.body.position();
        self.camera.follow(craft, delta);
        self.track.update(self.camera.position.z);

        if self.hits_obstacle(craft) {
            self.state = GameState::GameOver;
            log::info!("Game over at z={:.1}, score {}", craft.z, self.score());
        }

        // Track update timing
        let update_time = update_start.elapsed().as_secs_f32() * 1000.0;
        self.update_times.push(update_time);
        if self.update_times.len() > 60 {
            self.update_times.remove(0);
        }
    }

    /// Axis-aligned overlap between the craft and any nearby obstacle
    fn hits_obstacle(&self, craft: Vec3) -> bool {
        let radius = self.config.craft_radius;
        let reach = radius + self.config.track.max_obstacle_size;

        self.track
            .obstacles_near(craft.z - reach, craft.z + reach)
            .any(|(obstacle, position)| {
                let half = obstacle.size / 2.0 + radius;
                (craft.x - position.x).abs() < half && (craft.z - position.z).abs() < half
            })
    }

    /// Forward distance travelled, in whole meters
    pub fn score(&self) -> u32 {
        (self.body.position().z - START_Z).max(0.0).floor() as u32
    }

    /// Current run state
    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn body(&self) -> &B {
        &self.body
    }

    pub fn track(&self) -> &TrackGenerator {
        &self.track
    }

    pub fn camera(&self) -> &FollowCamera {
        &self.camera
    }

    pub fn elapsed_time(&self) -> f32 {
        self.elapsed_time
    }

    /// Current view for the presentation layer
    pub fn snapshot(&self) -> SceneSnapshot {
        let obstacles = self
            .track
            .segments()
            .flat_map(|segment| {
                segment.obstacles.iter().map(move |obstacle| ObstacleSnapshot {
                    kind: obstacle.kind,
                    position: segment.world_position(obstacle),
                    size: obstacle.size,
                    color: obstacle.color,
                    intensity: self.track.pulse_intensity(self.elapsed_time, obstacle),
                })
            })
            .collect();

        SceneSnapshot {
            state: self.state,
            elapsed_time: self.elapsed_time,
            score: self.score(),
            player: self.player.state().clone(),
            craft_position: self.body.position(),
            camera_position: self.camera.position,
            camera_look_at: self.camera.look_at,
            obstacles,
        }
    }

    /// Frame count, timing and track statistics
    pub fn stats(&self) -> SceneStats {
        let avg_update_time = if self.update_times.is_empty() {
            0.0
        } else {
            self.update_times.iter().sum::<f32>() / self.update_times.len() as f32
        };

        SceneStats {
            frames: self.frames,
            avg_update_time_ms: avg_update_time,
            segment_count: self.track.segment_count() as u32,
            recycled_segments: self.track.recycled_count(),
            game_state: self.state,
        }
    }
}
