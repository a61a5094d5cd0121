//! Config - Tunable gameplay constants
//!
//! Every struct has a `Default` holding the shipped values and is
//! `#[serde(default)]`, so a config file only needs the fields it overrides.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Rejected configuration
#[derive(Debug)]
pub enum ConfigError {
    Json(serde_json::Error),
    /// A field is out of its allowed range
    Invalid { field: &'static str, reason: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Json(e) => write!(f, "config is not valid JSON: {e}"),
            ConfigError::Invalid { field, reason } => write!(f, "config field {field} {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Json(e) => Some(e),
            ConfigError::Invalid { .. } => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid { field, reason: "must be positive" })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid { field, reason: "must not be negative" })
    }
}

/// Player movement tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Cruising forward speed (m/s)
    pub base_speed: f32,
    /// Target speed multiplier while boosting
    pub boost_multiplier: f32,
    /// Speed change per second while easing toward the target
    pub acceleration: f32,
    /// Energy cap
    pub max_energy: f32,
    /// Energy regenerated per second
    pub energy_regen_rate: f32,
    /// Energy consumed by one boost
    pub boost_cost: f32,
    /// How long a boost lasts (seconds)
    pub boost_duration: f32,
    /// Delay before the next boost is allowed (seconds)
    pub boost_cooldown: f32,
    /// Drag delta to lateral force factor
    pub drift_factor: f32,
    /// Energy per second per unit of lateral force
    pub drift_energy_rate: f32,
    /// Energy floor for drifting, on top of the frame cost
    pub drift_min_energy: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            base_speed: 20.0,
            boost_multiplier: 2.0,
            acceleration: 10.0,
            max_energy: 100.0,
            energy_regen_rate: 5.0,
            boost_cost: 30.0,
            boost_duration: 2.0,
            boost_cooldown: 3.0,
            drift_factor: 0.1,
            drift_energy_rate: 2.0,
            drift_min_energy: 1.0,
        }
    }
}

/// Track generation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackConfig {
    /// Segments kept alive in the window
    pub segment_count: usize,
    /// Length of one segment along z (meters)
    pub segment_length: f32,
    /// Distance from the center line to each barrier
    pub track_half_width: f32,
    /// Barrier height
    pub barrier_height: f32,
    /// Obstacles per segment, inclusive range
    pub min_obstacles: usize,
    pub max_obstacles: usize,
    /// Lateral margin kept free next to the barriers
    pub obstacle_margin: f32,
    /// Obstacle edge length range
    pub min_obstacle_size: f32,
    pub max_obstacle_size: f32,
    /// Obstacle-free segments at the start of a run
    pub safe_segments: usize,
    /// How far behind the camera a segment's far edge may fall before recycling
    pub recycle_distance: f32,
    /// Pulse: resting intensity, swing and angular frequency (rad/s)
    pub pulse_base: f32,
    pub pulse_amplitude: f32,
    pub pulse_frequency: f32,
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self {
            segment_count: 10,
            segment_length: 50.0,
            track_half_width: 10.0,
            barrier_height: 2.0,
            min_obstacles: 2,
            max_obstacles: 5,
            obstacle_margin: 1.5,
            min_obstacle_size: 1.0,
            max_obstacle_size: 2.5,
            safe_segments: 2,
            recycle_distance: 20.0,
            pulse_base: 0.6,
            pulse_amplitude: 0.4,
            pulse_frequency: 3.0,
        }
    }
}

/// Follow camera settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Height above the craft
    pub height: f32,
    /// Distance behind the craft
    pub distance: f32,
    /// How far ahead of the craft the camera looks
    pub look_ahead: f32,
    /// Exponential smoothing rate (1/s)
    pub smoothing: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            height: 3.0,
            distance: 8.0,
            look_ahead: 10.0,
            smoothing: 5.0,
        }
    }
}

/// Complete game configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub player: PlayerTuning,
    pub track: TrackConfig,
    pub camera: CameraConfig,
    /// Track RNG seed; `None` draws one from entropy
    pub seed: Option<u64>,
    /// Collision radius of the craft
    pub craft_radius: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            player: PlayerTuning::default(),
            track: TrackConfig::default(),
            camera: CameraConfig::default(),
            seed: None,
            craft_radius: 0.8,
        }
    }
}

impl GameConfig {
    /// Parse and validate a config from JSON, filling missing fields with defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let player = &self.player;
        non_negative("player.base_speed", player.base_speed)?;
        positive("player.boost_multiplier", player.boost_multiplier)?;
        non_negative("player.acceleration", player.acceleration)?;
        non_negative("player.max_energy", player.max_energy)?;
        non_negative("player.energy_regen_rate", player.energy_regen_rate)?;
        non_negative("player.boost_cost", player.boost_cost)?;
        if player.boost_cost > player.max_energy {
            return Err(ConfigError::Invalid {
                field: "player.boost_cost",
                reason: "must not exceed player.max_energy",
            });
        }
        non_negative("player.boost_duration", player.boost_duration)?;
        non_negative("player.boost_cooldown", player.boost_cooldown)?;
        non_negative("player.drift_factor", player.drift_factor)?;
        non_negative("player.drift_energy_rate", player.drift_energy_rate)?;
        non_negative("player.drift_min_energy", player.drift_min_energy)?;

        let track = &self.track;
        if track.segment_count == 0 {
            return Err(ConfigError::Invalid { field: "track.segment_count", reason: "must be positive" });
        }
        positive("track.segment_length", track.segment_length)?;
        positive("track.track_half_width", track.track_half_width)?;
        non_negative("track.barrier_height", track.barrier_height)?;
        if track.min_obstacles > track.max_obstacles {
            return Err(ConfigError::Invalid {
                field: "track.min_obstacles",
                reason: "must not exceed track.max_obstacles",
            });
        }
        non_negative("track.obstacle_margin", track.obstacle_margin)?;
        positive("track.min_obstacle_size", track.min_obstacle_size)?;
        positive("track.max_obstacle_size", track.max_obstacle_size)?;
        if track.min_obstacle_size > track.max_obstacle_size {
            return Err(ConfigError::Invalid {
                field: "track.min_obstacle_size",
                reason: "must not exceed track.max_obstacle_size",
            });
        }
        non_negative("track.recycle_distance", track.recycle_distance)?;
        non_negative("track.pulse_base", track.pulse_base)?;
        non_negative("track.pulse_amplitude", track.pulse_amplitude)?;
        non_negative("track.pulse_frequency", track.pulse_frequency)?;

        non_negative("camera.height", self.camera.height)?;
        non_negative("camera.distance", self.camera.distance)?;
        non_negative("camera.look_ahead", self.camera.look_ahead)?;
        non_negative("camera.smoothing", self.camera.smoothing)?;

        positive("craft_radius", self.craft_radius)?;
        if self.craft_radius >= track.track_half_width {
            return Err(ConfigError::Invalid {
                field: "craft_radius",
                reason: "must be narrower than track.track_half_width",
            });
        }
        Ok(())
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = GameConfig::from_json(r#"{ "player": { "boost_cost": 40.0 }, "seed": 7 }"#)
            .expect("valid config");
        assert_eq!(config.player.boost_cost, 40.0);
        assert_eq!(config.player.max_energy, 100.0);
        assert_eq!(config.track.segment_count, 10);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.craft_radius, 0.8);
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(GameConfig::from_json("{ player: "), Err(ConfigError::Json(_))));
    }

    #[test]
    fn default_config_is_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_values() {
        let cases = [
            (r#"{ "track": { "segment_length": 0.0 } }"#, "track.segment_length"),
            (r#"{ "track": { "segment_length": -5.0 } }"#, "track.segment_length"),
            (r#"{ "track": { "segment_count": 0 } }"#, "track.segment_count"),
            (r#"{ "player": { "max_energy": -1.0 } }"#, "player.max_energy"),
            (r#"{ "player": { "max_energy": 20.0 } }"#, "player.boost_cost"),
            (r#"{ "player": { "energy_regen_rate": -2.0 } }"#, "player.energy_regen_rate"),
            (r#"{ "player": { "drift_energy_rate": -0.5 } }"#, "player.drift_energy_rate"),
            (r#"{ "track": { "min_obstacles": 6, "max_obstacles": 3 } }"#, "track.min_obstacles"),
            (
                r#"{ "track": { "min_obstacle_size": 3.0, "max_obstacle_size": 1.0 } }"#,
                "track.min_obstacle_size",
            ),
            (r#"{ "craft_radius": 0.0 }"#, "craft_radius"),
        ];

        for (json, expected) in cases {
            match GameConfig::from_json(json) {
                Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, expected, "{json}"),
                other => panic!("{json} should be rejected, got {other:?}"),
            }
        }
    }
}
