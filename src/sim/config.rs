//! Per-mode simulation parameters
//!
//! A `SimConfig` fixes everything a session needs to know up front: how the
//! player moves, where trees come from, how fast they travel, and which
//! collision test decides a hit. Geometry that depends on the playfield size
//! is derived on demand so a resize takes effect on the next tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::collision::CollisionPolicy;
use crate::consts::*;
use crate::settings::GameMode;

/// Rejected configuration values
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("spawn interval must be positive, got {0} ms")]
    SpawnInterval(f64),
    #[error("restart delay must be positive, got {0} ms")]
    RestartDelay(f64),
    #[error("{name} must be non-negative and finite, got {value}")]
    Speed { name: &'static str, value: f32 },
    #[error("{name} size must be positive, got {value:?}")]
    Size { name: &'static str, value: Vec2 },
    #[error("world bounds are empty")]
    EmptyWorld,
}

/// Axis-aligned rectangle the player is clamped into
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    /// Build bounds, collapsing inverted ranges onto their lower edge
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max: max.max(min) }
    }

    pub fn clamp(&self, p: Vec2) -> Vec2 {
        crate::clamp_vec2(p, self.min, self.max)
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// Where obstacles enter, which way they travel, and where they leave
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lane {
    /// Transverse (x) range spawns are drawn from, `[start, end)`
    pub spawn_x: (f32, f32),
    /// Approach-axis (y) coordinate of a fresh obstacle
    pub spawn_y: f32,
    /// Obstacles at or past this y are pruned
    pub exit_y: f32,
    /// +1.0 when obstacles travel toward larger y, -1.0 otherwise
    pub direction: f32,
}

impl Lane {
    /// True once `y` has reached or crossed the exit boundary
    #[inline]
    pub fn is_past_exit(&self, y: f32) -> bool {
        (y - self.exit_y) * self.direction >= 0.0
    }
}

/// Coordinate space a mode plays in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Layout {
    /// Fixed world units, independent of the canvas; the renderer projects
    World {
        half_width: f32,
        max_depth: f32,
        spawn_depth: f32,
        exit_depth: f32,
    },
    /// Screen pixels; bounds follow the live playfield size
    Screen { floor_gap: f32 },
}

/// Which player axes respond to input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Axes {
    pub x: bool,
    pub y: bool,
}

/// Complete parameter set for one game mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    pub mode: GameMode,
    pub layout: Layout,
    pub controlled: Axes,
    pub player_size: Vec2,
    pub player_speed: f32,
    pub obstacle_size: Vec2,
    /// Obstacle speed at the start of every run
    pub base_obstacle_speed: f32,
    pub enable_difficulty_ramp: bool,
    /// Added to the obstacle speed every active tick when the ramp is on
    pub speed_ramp: f32,
    pub collision: CollisionPolicy,
    pub spawn_interval_ms: f64,
    pub restart_delay_ms: f64,
}

impl SimConfig {
    /// Defaults for a game mode
    pub fn for_mode(mode: GameMode) -> Self {
        match mode {
            GameMode::Isometric => Self {
                mode,
                layout: Layout::World {
                    half_width: ISO_HALF_WIDTH,
                    max_depth: ISO_MAX_DEPTH,
                    spawn_depth: ISO_MAX_DEPTH + ISO_SPAWN_BEYOND,
                    exit_depth: ISO_EXIT_DEPTH,
                },
                controlled: Axes { x: true, y: true },
                // The seal is a point in world space; only the trees have extent
                player_size: Vec2::ZERO,
                player_speed: ISO_PLAYER_SPEED,
                obstacle_size: Vec2::splat(ISO_OBSTACLE_SIZE),
                base_obstacle_speed: ISO_OBSTACLE_SPEED,
                enable_difficulty_ramp: true,
                speed_ramp: ISO_SPEED_RAMP,
                collision: CollisionPolicy::DistanceThreshold {
                    margin: ISO_COLLISION_MARGIN,
                },
                spawn_interval_ms: ISO_SPAWN_INTERVAL_MS,
                restart_delay_ms: RESTART_DELAY_MS,
            },
            GameMode::TopDown => Self {
                mode,
                layout: Layout::Screen {
                    floor_gap: TOP_PLAYER_FLOOR_GAP,
                },
                controlled: Axes { x: true, y: false },
                player_size: Vec2::splat(TOP_PLAYER_SIZE),
                player_speed: TOP_PLAYER_SPEED,
                obstacle_size: Vec2::splat(TOP_OBSTACLE_SIZE),
                base_obstacle_speed: TOP_OBSTACLE_SPEED,
                enable_difficulty_ramp: false,
                speed_ramp: TOP_SPEED_RAMP,
                collision: CollisionPolicy::BoxOverlap,
                spawn_interval_ms: TOP_SPAWN_INTERVAL_MS,
                restart_delay_ms: RESTART_DELAY_MS,
            },
        }
    }

    /// Reject values that would stall the timers or break clamping
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.spawn_interval_ms > 0.0) {
            return Err(ConfigError::SpawnInterval(self.spawn_interval_ms));
        }
        if !(self.restart_delay_ms > 0.0) {
            return Err(ConfigError::RestartDelay(self.restart_delay_ms));
        }
        for (name, value) in [
            ("player speed", self.player_speed),
            ("obstacle speed", self.base_obstacle_speed),
            ("speed ramp", self.speed_ramp),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Speed { name, value });
            }
        }
        if !(self.obstacle_size.x > 0.0 && self.obstacle_size.y > 0.0) {
            return Err(ConfigError::Size {
                name: "obstacle",
                value: self.obstacle_size,
            });
        }
        if self.player_size.x < 0.0 || self.player_size.y < 0.0 {
            return Err(ConfigError::Size {
                name: "player",
                value: self.player_size,
            });
        }
        if let Layout::World {
            half_width,
            max_depth,
            ..
        } = self.layout
        {
            if !(half_width > 0.0 && max_depth >= 0.0) {
                return Err(ConfigError::EmptyWorld);
            }
        }
        Ok(())
    }

    /// Region the player centre may occupy
    pub fn player_bounds(&self, playfield: Vec2) -> Bounds {
        match self.layout {
            Layout::World {
                half_width,
                max_depth,
                ..
            } => Bounds::new(Vec2::new(-half_width, 0.0), Vec2::new(half_width, max_depth)),
            Layout::Screen { floor_gap } => {
                let half = self.player_size / 2.0;
                let y = playfield.y - floor_gap - half.y;
                Bounds::new(Vec2::new(half.x, y), Vec2::new(playfield.x - half.x, y))
            }
        }
    }

    /// Where the player stands after a reset
    pub fn player_start(&self, playfield: Vec2) -> Vec2 {
        let bounds = self.player_bounds(playfield);
        match self.layout {
            Layout::World { .. } => bounds.clamp(Vec2::ZERO),
            Layout::Screen { .. } => Vec2::new((bounds.min.x + bounds.max.x) / 2.0, bounds.max.y),
        }
    }

    /// Obstacle approach geometry for the current playfield
    pub fn lane(&self, playfield: Vec2) -> Lane {
        match self.layout {
            Layout::World {
                half_width,
                spawn_depth,
                exit_depth,
                ..
            } => Lane {
                spawn_x: (-half_width, half_width),
                spawn_y: spawn_depth,
                exit_y: exit_depth,
                direction: -1.0,
            },
            Layout::Screen { .. } => {
                let half = self.obstacle_size / 2.0;
                Lane {
                    spawn_x: (half.x, (playfield.x - half.x).max(half.x)),
                    spawn_y: -half.y,
                    exit_y: playfield.y + half.y,
                    direction: 1.0,
                }
            }
        }
    }
}
