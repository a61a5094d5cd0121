//! Track - Streaming segment window and obstacle placement
//!
//! A fixed number of segments is kept ahead of the camera. Segments that fall
//! far enough behind are dropped from the front and a fresh one is generated
//! at the far end, so the window never changes size.

use std::collections::VecDeque;

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::game::config::TrackConfig;

/// Obstacle shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Cube,
    Cylinder,
    Pyramid,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 3] = [ObstacleKind::Cube, ObstacleKind::Cylinder, ObstacleKind::Pyramid];
}

/// Accent colors obstacles are painted with (linear RGB)
pub const ACCENT_PALETTE: [[f32; 3]; 5] = [
    [1.0, 0.2, 0.6],
    [0.2, 0.9, 1.0],
    [1.0, 0.8, 0.1],
    [0.5, 1.0, 0.3],
    [0.7, 0.3, 1.0],
];

/// A static obstacle in segment-local coordinates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    /// Center relative to the segment start
    pub local_position: Vec3,
    /// Edge length of the bounding cube
    pub size: f32,
    pub color: [f32; 3],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BarrierSide {
    Left,
    Right,
}

/// Immovable wall along one side of a segment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Barrier {
    pub side: BarrierSide,
    pub x: f32,
    pub length: f32,
    pub height: f32,
}

/// One stretch of track
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackSegment {
    /// Sequence number since the last reset
    pub index: u64,
    /// World z of the segment start
    pub z: f32,
    pub length: f32,
    pub obstacles: Vec<Obstacle>,
    pub barriers: [Barrier; 2],
}

impl TrackSegment {
    /// World z of the far edge
    pub fn end_z(&self) -> f32 {
        self.z + self.length
    }

    /// World position of an obstacle in this segment
    pub fn world_position(&self, obstacle: &Obstacle) -> Vec3 {
        obstacle.local_position + Vec3::new(0.0, 0.0, self.z)
    }
}

/// Segment generator and sliding window
pub struct TrackGenerator {
    config: TrackConfig,
    segments: VecDeque<TrackSegment>,
    rng: StdRng,
    next_index: u64,
    next_z: f32,
    recycled: u64,
}

impl TrackGenerator {
    /// Create a generator and fill the initial window
    pub fn new(config: TrackConfig, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut track = Self {
            segments: VecDeque::with_capacity(config.segment_count),
            config,
            rng,
            next_index: 0,
            next_z: 0.0,
            recycled: 0,
        };
        track.reset();
        track
    }

    /// Drop everything and rebuild the initial window from z = 0
    pub fn reset(&mut self) {
        self.segments.clear();
        self.next_index = 0;
        self.next_z = 0.0;
        self.recycled = 0;

        for _ in 0..self.config.segment_count {
            self.generate_segment();
        }
    }

    /// Append one segment at the far end of the window
    pub fn generate_segment(&mut self) {
        let config = &self.config;
        let half_width = config.track_half_width;

        let obstacles = if self.next_index < config.safe_segments as u64 {
            Vec::new()
        } else {
            let max = config.max_obstacles.max(config.min_obstacles);
            let count = self.rng.gen_range(config.min_obstacles..=max);
            (0..count)
                .map(|_| Self::random_obstacle(&mut self.rng, config))
                .collect()
        };

        let barrier = |side, x| Barrier {
            side,
            x,
            length: config.segment_length,
            height: config.barrier_height,
        };

        self.segments.push_back(TrackSegment {
            index: self.next_index,
            z: self.next_z,
            length: config.segment_length,
            obstacles,
            barriers: [
                barrier(BarrierSide::Left, -half_width),
                barrier(BarrierSide::Right, half_width),
            ],
        });

        self.next_index += 1;
        self.next_z += config.segment_length;
    }

    fn random_obstacle(rng: &mut StdRng, config: &TrackConfig) -> Obstacle {
        let size = if config.max_obstacle_size > config.min_obstacle_size {
            rng.gen_range(config.min_obstacle_size..config.max_obstacle_size)
        } else {
            config.min_obstacle_size
        };

        let x_limit = (config.track_half_width - config.obstacle_margin - size / 2.0).max(0.0);
        let x = if x_limit > 0.0 { rng.gen_range(-x_limit..=x_limit) } else { 0.0 };
        let z = rng.gen_range(0.0..config.segment_length);

        Obstacle {
            kind: ObstacleKind::ALL[rng.gen_range(0..ObstacleKind::ALL.len())],
            local_position: Vec3::new(x, size / 2.0, z),
            size,
            color: ACCENT_PALETTE[rng.gen_range(0..ACCENT_PALETTE.len())],
        }
    }

    /// Recycle segments left behind the camera
    pub fn update(&mut self, camera_z: f32) {
        while let Some(oldest) = self.segments.front() {
            if camera_z - oldest.end_z() <= self.config.recycle_distance {
                break;
            }
            if let Some(dropped) = self.segments.pop_front() {
                log::debug!("Recycling segment {} at z={:.0}", dropped.index, dropped.z);
            }
            self.recycled += 1;
            self.generate_segment();
        }
    }

    /// Pulse intensity for an obstacle at `elapsed` seconds
    pub fn pulse_intensity(&self, elapsed: f32, obstacle: &Obstacle) -> f32 {
        pulse_intensity(&self.config, elapsed, obstacle)
    }

    /// Obstacles whose world z lies in `z_min..=z_max`, with their world position
    pub fn obstacles_near(&self, z_min: f32, z_max: f32) -> impl Iterator<Item = (&Obstacle, Vec3)> + '_ {
        self.segments
            .iter()
            .filter(move |segment| segment.end_z() >= z_min && segment.z <= z_max)
            .flat_map(|segment| {
                segment
                    .obstacles
                    .iter()
                    .map(move |obstacle| (obstacle, segment.world_position(obstacle)))
            })
            .filter(move |(_, position)| position.z >= z_min && position.z <= z_max)
    }

    pub fn segments(&self) -> impl Iterator<Item = &TrackSegment> {
        self.segments.iter()
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Segments recycled since the last reset
    pub fn recycled_count(&self) -> u64 {
        self.recycled
    }

    pub fn config(&self) -> &TrackConfig {
        &self.config
    }
}

/// Sinusoidal glow, offset per obstacle so neighbours don't pulse in lockstep
pub fn pulse_intensity(config: &TrackConfig, elapsed: f32, obstacle: &Obstacle) -> f32 {
    let phase = obstacle.local_position.z * 0.37 + obstacle.local_position.x;
    config.pulse_base + config.pulse_amplitude * (elapsed * config.pulse_frequency + phase).sin()
}
