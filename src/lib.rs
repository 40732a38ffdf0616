//! Seal Slalom - dodge the trees for as long as you can
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, obstacles, collisions, score)
//! - `session`: Game loop state machine and timer ownership
//! - `timer`: Host-clock driven timer queue (interval/timeout/cancel)
//! - `renderer`: Projection math and Canvas 2D drawing
//! - `platform`: Browser input mapping and asset gating
//! - `settings`: Game mode selection and persisted preferences

pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;
pub mod timer;

pub use session::GameSession;
pub use settings::{GameMode, Settings};

/// Game configuration constants
pub mod consts {
    /// Delay between a collision and the automatic restart
    pub const RESTART_DELAY_MS: f64 = 2000.0;

    /// Longest stretch of host time a single frame may cover. Longer gaps
    /// (hidden tab, debugger) count as paused so timers do not pile up.
    pub const MAX_FRAME_GAP_MS: f64 = 100.0;

    /// Default playfield size before the host reports a real one
    pub const DEFAULT_PLAYFIELD_WIDTH: f32 = 800.0;
    pub const DEFAULT_PLAYFIELD_HEIGHT: f32 = 600.0;

    /// Isometric mode: world units, x in [-1, 1], depth in [0, MAX_DEPTH]
    pub const ISO_HALF_WIDTH: f32 = 1.0;
    pub const ISO_MAX_DEPTH: f32 = 5.0;
    pub const ISO_PLAYER_SPEED: f32 = 0.08;
    /// Trees appear this far beyond the deepest reachable row
    pub const ISO_SPAWN_BEYOND: f32 = 2.0;
    pub const ISO_EXIT_DEPTH: f32 = -1.0;
    pub const ISO_OBSTACLE_SIZE: f32 = 0.5;
    pub const ISO_OBSTACLE_SPEED: f32 = 0.025;
    pub const ISO_SPEED_RAMP: f32 = 0.00001;
    pub const ISO_COLLISION_MARGIN: f32 = 0.3;
    pub const ISO_SPAWN_INTERVAL_MS: f64 = 1000.0;

    /// Top-down mode: pixels, player slides along the bottom edge
    pub const TOP_PLAYER_SIZE: f32 = 50.0;
    pub const TOP_PLAYER_SPEED: f32 = 6.0;
    /// Gap between the player's bottom edge and the playfield bottom
    pub const TOP_PLAYER_FLOOR_GAP: f32 = 10.0;
    pub const TOP_OBSTACLE_SIZE: f32 = 40.0;
    pub const TOP_OBSTACLE_SPEED: f32 = 4.0;
    /// Only used when the ramp is switched on in settings
    pub const TOP_SPEED_RAMP: f32 = 0.001;
    pub const TOP_SPAWN_INTERVAL_MS: f64 = 2000.0;
}

/// Clamp each component of `v` into `[min, max]`
#[inline]
pub fn clamp_vec2(v: glam::Vec2, min: glam::Vec2, max: glam::Vec2) -> glam::Vec2 {
    glam::Vec2::new(v.x.clamp(min.x, max.x), v.y.clamp(min.y, max.y))
}
