//! Player - Hovercraft movement state and behavior
//!
//! Speed eases toward a target, energy regenerates each frame and pays for
//! boosts and drifts. Failed boosts and drifts are silent no-ops.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::game::config::PlayerTuning;
use crate::game::physics::PhysicsBody;

/// Phase of a horizontal drag gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PanPhase {
    Began,
    Changed,
    Ended,
    Cancelled,
}

/// Complete movement state for the craft
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerState {
    /// Forward speed (m/s)
    pub current_speed: f32,
    /// Remaining energy, within `0..=max_energy`
    pub energy: f32,
    pub is_boosting: bool,
    pub is_drifting: bool,
    /// Sign of the last non-zero drag (-1, 0 or 1)
    pub last_drift_direction: f32,
    /// Seconds until the next boost is allowed
    pub boost_cooldown: f32,
    /// Seconds left in the active boost
    pub boost_remaining: f32,
    /// Current drag delta, applied every frame while drifting
    pub drift_delta: f32,
}

impl PlayerState {
    pub fn new(tuning: &PlayerTuning) -> Self {
        Self {
            current_speed: 0.0,
            energy: tuning.max_energy,
            is_boosting: false,
            is_drifting: false,
            last_drift_direction: 0.0,
            boost_cooldown: 0.0,
            boost_remaining: 0.0,
            drift_delta: 0.0,
        }
    }
}

/// Player model: owns its state and tuning, drives a borrowed body
#[derive(Debug, Clone)]
pub struct Player {
    state: PlayerState,
    tuning: PlayerTuning,
}

impl Player {
    pub fn new(tuning: PlayerTuning) -> Self {
        Self {
            state: PlayerState::new(&tuning),
            tuning,
        }
    }

    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    pub fn tuning(&self) -> &PlayerTuning {
        &self.tuning
    }

    /// Restore the initial state
    pub fn reset(&mut self) {
        self.state = PlayerState::new(&self.tuning);
    }

    /// Speed the craft is easing toward
    pub fn target_speed(&self) -> f32 {
        if self.state.is_boosting {
            self.tuning.base_speed * self.tuning.boost_multiplier
        } else {
            self.tuning.base_speed
        }
    }

    /// Feed a drag gesture update
    pub fn pan(&mut self, phase: PanPhase, delta_x: f32) {
        match phase {
            PanPhase::Began | PanPhase::Changed => {
                self.state.is_drifting = true;
                self.state.drift_delta = delta_x;
                if delta_x != 0.0 {
                    self.state.last_drift_direction = delta_x.signum();
                }
            }
            PanPhase::Ended | PanPhase::Cancelled => {
                self.state.is_drifting = false;
                self.state.drift_delta = 0.0;
            }
        }
    }

    /// Try to start a boost. Returns whether it started.
    pub fn activate_boost(&mut self) -> bool {
        let state = &mut self.state;
        if state.is_boosting || state.boost_cooldown > 0.0 || state.energy < self.tuning.boost_cost {
            return false;
        }

        state.energy = (state.energy - self.tuning.boost_cost).clamp(0.0, self.tuning.max_energy);
        state.boost_cooldown = self.tuning.boost_cooldown;
        state.boost_remaining = self.tuning.boost_duration;
        state.is_boosting = true;

        log::debug!("Boost started, energy left {:.1}", state.energy);
        true
    }

    /// Per-frame update. Applies this frame's force to `body`.
    pub fn update(&mut self, delta: f32, body: &mut impl PhysicsBody) {
        if delta <= 0.0 {
            return;
        }

        let tuning = &self.tuning;
        let state = &mut self.state;

        state.boost_cooldown = (state.boost_cooldown - delta).max(0.0);

        if state.is_boosting {
            state.boost_remaining -= delta;
            if state.boost_remaining <= 0.0 {
                state.boost_remaining = 0.0;
                state.is_boosting = false;
                log::debug!("Boost ended");
            }
        }

        state.energy = (state.energy + tuning.energy_regen_rate * delta).min(tuning.max_energy);

        // Lateral force, only when this frame's cost can be paid in full
        let mut lateral = 0.0;
        if state.is_drifting {
            let force = state.drift_delta * tuning.drift_factor;
            let cost = force.abs() * tuning.drift_energy_rate * delta;
            if state.energy >= cost.max(tuning.drift_min_energy) {
                lateral = force;
                state.energy -= cost;
            }
        }
        state.energy = state.energy.clamp(0.0, tuning.max_energy);

        // Smooth acceleration
        let target = if state.is_boosting {
            tuning.base_speed * tuning.boost_multiplier
        } else {
            tuning.base_speed
        };
        let accel = tuning.acceleration * delta;
        if state.current_speed < target {
            state.current_speed = (state.current_speed + accel).min(target);
        } else if state.current_speed > target {
            state.current_speed = (state.current_speed - accel).max(target);
        }

        body.apply_force(Vec3::new(lateral, 0.0, state.current_speed), false);
    }
}
