//! Game Module
//!
//! Headless hovercraft simulation: player model, streaming track, chase
//! camera and the scene that ties them together each frame.

pub mod camera;
pub mod config;
pub mod physics;
pub mod player;
pub mod scene;
pub mod track;

pub use config::{CameraConfig, ConfigError, GameConfig, PlayerTuning, TrackConfig};
pub use physics::{PhysicsBody, SimpleBody};
pub use player::{PanPhase, Player, PlayerState};
pub use scene::{GameState, Scene, SceneSnapshot, SceneStats};
pub use track::{Obstacle, ObstacleKind, TrackGenerator, TrackSegment};
