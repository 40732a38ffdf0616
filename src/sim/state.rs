//! Simulation state and render snapshots

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::config::{Bounds, Lane, SimConfig};
use super::obstacles::ObstacleField;
use crate::consts::{DEFAULT_PLAYFIELD_HEIGHT, DEFAULT_PLAYFIELD_WIDTH};
use crate::settings::GameMode;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Seal is moving, trees are coming
    Running,
    /// Hit a tree; waiting for the automatic restart
    GameOver,
}

/// The player's seal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Centre position
    pub pos: Vec2,
    pub size: Vec2,
    /// Distance moved per tick along each held direction
    pub speed: f32,
}

/// Complete simulation state for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Simulation {
    pub config: SimConfig,
    pub player: Player,
    pub obstacles: ObstacleField,
    pub score: u64,
    pub phase: GamePhase,
    /// Current obstacle approach speed
    pub obstacle_speed: f32,
    /// Active ticks since the last reset
    pub time_ticks: u64,
    /// Live playfield size reported by the host
    pub playfield: Vec2,
}

impl Simulation {
    /// Create a fresh simulation; the config is assumed validated
    pub fn new(config: SimConfig) -> Self {
        let playfield = Vec2::new(DEFAULT_PLAYFIELD_WIDTH, DEFAULT_PLAYFIELD_HEIGHT);
        let mut sim = Self {
            player: Player {
                pos: Vec2::ZERO,
                size: config.player_size,
                speed: config.player_speed,
            },
            obstacles: ObstacleField::new(config.obstacle_size),
            score: 0,
            phase: GamePhase::Running,
            obstacle_speed: config.base_obstacle_speed,
            time_ticks: 0,
            playfield,
            config,
        };
        sim.reset();
        sim
    }

    /// Back to the start of a run. Safe to call at any time.
    pub fn reset(&mut self) {
        self.player.pos = self.config.player_start(self.playfield);
        self.obstacles.clear();
        self.score = 0;
        self.phase = GamePhase::Running;
        self.obstacle_speed = self.config.base_obstacle_speed;
        self.time_ticks = 0;
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Update the playfield size; the player is re-clamped on the next tick
    pub fn resize(&mut self, width: f32, height: f32) {
        self.playfield = Vec2::new(width.max(0.0), height.max(0.0));
    }

    pub fn player_bounds(&self) -> Bounds {
        self.config.player_bounds(self.playfield)
    }

    pub fn lane(&self) -> Lane {
        self.config.lane(self.playfield)
    }

    /// Read-only view for the renderer
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            mode: self.config.mode,
            player: self.player.pos,
            player_size: self.player.size,
            obstacles: self.obstacles.iter().map(|o| o.pos).collect(),
            obstacle_size: self.obstacles.size,
            score: self.score,
            game_over: self.is_game_over(),
            playfield: self.playfield,
        }
    }
}

/// Everything a renderer needs to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub mode: GameMode,
    pub player: Vec2,
    pub player_size: Vec2,
    pub obstacles: Vec<Vec2>,
    pub obstacle_size: Vec2,
    pub score: u64,
    pub game_over: bool,
    pub playfield: Vec2,
}
