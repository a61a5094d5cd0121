//! Physics - Boundary to the engine that owns the craft's body
//!
//! The player model only talks to `PhysicsBody`. `SimpleBody` is a damped
//! point mass that stands in for a real engine when running headless.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A rigid body driven by forces
pub trait PhysicsBody {
    /// Apply a force for this frame, or an instantaneous impulse
    fn apply_force(&mut self, force: Vec3, impulse: bool);

    fn position(&self) -> Vec3;

    fn velocity(&self) -> Vec3;

    /// Advance the body. Engines that integrate on their own leave this empty.
    fn step(&mut self, _delta: f32) {}

    /// Put the body back at `position` at rest
    fn teleport(&mut self, position: Vec3);
}

/// Damped point mass, optionally confined between two x limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimpleBody {
    pub position: Vec3,
    pub velocity: Vec3,
    pub mass: f32,
    /// Velocity lost per second, as a fraction
    pub linear_damping: f32,
    /// Barrier planes the body cannot cross
    pub lateral_limit: Option<f32>,
    /// Forces accumulated since the last step
    #[serde(skip)]
    pending_force: Vec3,
}

impl SimpleBody {
    pub fn new(mass: f32, linear_damping: f32) -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            mass: mass.max(f32::EPSILON),
            linear_damping,
            lateral_limit: None,
            pending_force: Vec3::ZERO,
        }
    }

    /// Confine the body to `-limit..=limit` on x
    pub fn with_lateral_limit(mut self, limit: f32) -> Self {
        self.lateral_limit = Some(limit.abs());
        self
    }
}

impl Default for SimpleBody {
    /// Unit mass with damping 1, so steady speed equals the applied force
    fn default() -> Self {
        Self::new(1.0, 1.0)
    }
}

impl PhysicsBody for SimpleBody {
    fn apply_force(&mut self, force: Vec3, impulse: bool) {
        if impulse {
            self.velocity += force / self.mass;
        } else {
            self.pending_force += force;
        }
    }

    fn position(&self) -> Vec3 {
        self.position
    }

    fn velocity(&self) -> Vec3 {
        self.velocity
    }

    fn step(&mut self, delta: f32) {
        if delta <= 0.0 {
            return;
        }

        self.velocity += self.pending_force / self.mass * delta;
        self.velocity *= (1.0 - self.linear_damping * delta).max(0.0);
        self.pending_force = Vec3::ZERO;

        self.position += self.velocity * delta;

        // Barriers are immovable: stop lateral motion on contact
        if let Some(limit) = self.lateral_limit {
            if self.position.x.abs() > limit {
                self.position.x = self.position.x.clamp(-limit, limit);
                self.velocity.x = 0.0;
            }
        }
    }

    fn teleport(&mut self, position: Vec3) {
        self.position = position;
        self.velocity = Vec3::ZERO;
        self.pending_force = Vec3::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_force_settles_at_force_over_damping() {
        let mut body = SimpleBody::default();
        for _ in 0..600 {
            body.apply_force(Vec3::new(0.0, 0.0, 20.0), false);
            body.step(1.0 / 60.0);
        }
        assert!((body.velocity().z - 20.0).abs() < 1.0, "{}", body.velocity().z);
    }

    #[test]
    fn impulse_changes_velocity_immediately() {
        let mut body = SimpleBody::new(2.0, 0.0);
        body.apply_force(Vec3::X * 4.0, true);
        assert_eq!(body.velocity(), Vec3::X * 2.0);
    }

    #[test]
    fn lateral_limit_stops_at_barrier() {
        let mut body = SimpleBody::new(1.0, 0.0).with_lateral_limit(5.0);
        body.apply_force(Vec3::X * 100.0, true);
        body.step(1.0);
        assert_eq!(body.position().x, 5.0);
        assert_eq!(body.velocity().x, 0.0);
    }

    #[test]
    fn teleport_resets_motion() {
        let mut body = SimpleBody::default();
        body.apply_force(Vec3::Z, true);
        body.teleport(Vec3::new(1.0, 0.5, 0.0));
        assert_eq!(body.velocity(), Vec3::ZERO);
        assert_eq!(body.position(), Vec3::new(1.0, 0.5, 0.0));
    }
}
