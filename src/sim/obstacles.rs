//! Obstacle field: spawning, motion and pruning of trees

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::config::Lane;

/// A single tree
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub pos: Vec2,
}

/// Active obstacles in spawn order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleField {
    pub size: Vec2,
    obstacles: Vec<Obstacle>,
    next_id: u32,
}

impl ObstacleField {
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            obstacles: Vec::new(),
            next_id: 1,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter()
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    /// Drop every obstacle and restart id allocation
    pub fn clear(&mut self) {
        self.obstacles.clear();
        self.next_id = 1;
    }

    /// Spawn one obstacle at a random transverse position on the lane's spawn line
    pub fn spawn<R: Rng>(&mut self, rng: &mut R, lane: &Lane) -> u32 {
        let (start, end) = lane.spawn_x;
        let x = if end > start {
            rng.random_range(start..end)
        } else {
            start
        };
        self.insert(Vec2::new(x, lane.spawn_y))
    }

    /// Place an obstacle at an exact position
    pub fn insert(&mut self, pos: Vec2) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.obstacles.push(Obstacle { id, pos });
        log::debug!("Spawned obstacle {} at ({:.2}, {:.2})", id, pos.x, pos.y);
        id
    }

    /// Move every obstacle `speed` units along the lane direction
    pub fn advance(&mut self, speed: f32, lane: &Lane) {
        let step = speed * lane.direction;
        for obstacle in &mut self.obstacles {
            obstacle.pos.y += step;
        }
    }

    /// Remove obstacles past the exit boundary, keeping the rest in order.
    /// Returns how many were removed.
    pub fn prune(&mut self, lane: &Lane) -> usize {
        let before = self.obstacles.len();
        self.obstacles.retain(|o| !lane.is_past_exit(o.pos.y));
        before - self.obstacles.len()
    }
}
