//! Camera - Smoothed chase camera

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::game::config::CameraConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowCamera {
    pub position: Vec3,
    pub look_at: Vec3,
    config: CameraConfig,
}

impl FollowCamera {
    pub fn new(config: CameraConfig) -> Self {
        let mut camera = Self {
            position: Vec3::ZERO,
            look_at: Vec3::ZERO,
            config,
        };
        camera.snap_to(Vec3::ZERO);
        camera
    }

    /// Where the camera wants to be for a craft at `target`
    fn rest_position(&self, target: Vec3) -> Vec3 {
        target + Vec3::new(0.0, self.config.height, -self.config.distance)
    }

    /// Jump straight to the rest position
    pub fn snap_to(&mut self, target: Vec3) {
        self.position = self.rest_position(target);
        self.look_at = target + Vec3::Z * self.config.look_ahead;
    }

    /// Ease toward the rest position. Frame-rate independent.
    pub fn follow(&mut self, target: Vec3, delta: f32) {
        let t = 1.0 - (-self.config.smoothing * delta.max(0.0)).exp();
        self.position = self.position.lerp(self.rest_position(target), t);
        self.look_at = target + Vec3::Z * self.config.look_ahead;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converges_on_target() {
        let mut camera = FollowCamera::new(CameraConfig::default());
        let target = Vec3::new(2.0, 0.0, 100.0);
        for _ in 0..600 {
            camera.follow(target, 1.0 / 60.0);
        }
        let expected = camera.rest_position(target);
        assert!(camera.position.distance(expected) < 1e-3);
    }

    #[test]
    fn same_total_time_lands_in_same_place() {
        let target = Vec3::new(0.0, 0.0, 50.0);
        let mut fine = FollowCamera::new(CameraConfig::default());
        let mut coarse = FollowCamera::new(CameraConfig::default());
        for _ in 0..4 {
            fine.follow(target, 0.05);
        }
        coarse.follow(target, 0.1);
        coarse.follow(target, 0.1);
        assert!(fine.position.distance(coarse.position) < 1e-3);
    }

    #[test]
    fn zero_delta_does_not_move() {
        let mut camera = FollowCamera::new(CameraConfig::default());
        let before = camera.position;
        camera.follow(Vec3::new(0.0, 0.0, 100.0), 0.0);
        assert_eq!(camera.position, before);
    }

    #[test]
    fn looks_ahead_of_target() {
        let config = CameraConfig::default();
        let mut camera = FollowCamera::new(config.clone());
        camera.snap_to(Vec3::new(1.0, 0.0, 20.0));
        assert_eq!(camera.look_at, Vec3::new(1.0, 0.0, 20.0 + config.look_ahead));
        assert_eq!(camera.position.z, 20.0 - config.distance);
    }
}
