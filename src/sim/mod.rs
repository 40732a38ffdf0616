//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Tick-counted motion, scoring and difficulty
//! - Seeded RNG only (passed in by the caller)
//! - Stable obstacle order (spawn order)
//! - No rendering, timer or platform dependencies

pub mod collision;
pub mod config;
pub mod obstacles;
pub mod state;
pub mod tick;

pub use collision::{Body, CollisionPolicy, boxes_overlap, within_distance};
pub use config::{Axes, Bounds, ConfigError, Lane, Layout, SimConfig};
pub use obstacles::{Obstacle, ObstacleField};
pub use state::{GamePhase, Player, Simulation, Snapshot};
pub use tick::{InputState, TickOutcome, tick};
