//! Collision detection between the player and obstacles
//!
//! Two policies exist and each game mode picks exactly one: a box overlap test
//! for the pixel-space top-down mode, and a centre distance threshold for the
//! isometric mode where the seal is treated as a point.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// How a hit between the player and an obstacle is decided
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CollisionPolicy {
    /// Axis-aligned boxes centred on each position intersect on both axes
    BoxOverlap,
    /// Centre distance is below `(margin + obstacle width) / 2`
    DistanceThreshold { margin: f32 },
}

/// A positioned box, centred on `pos`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }
}

impl CollisionPolicy {
    /// Does the player touch the obstacle under this policy?
    #[inline]
    pub fn hits(&self, player: &Body, obstacle: &Body) -> bool {
        match *self {
            CollisionPolicy::BoxOverlap => boxes_overlap(player, obstacle),
            CollisionPolicy::DistanceThreshold { margin } => {
                within_distance(player.pos, obstacle.pos, (margin + obstacle.size.x) / 2.0)
            }
        }
    }
}

/// Strict AABB overlap; boxes that only share an edge do not overlap
pub fn boxes_overlap(a: &Body, b: &Body) -> bool {
    let reach = (a.size + b.size) / 2.0;
    let d = (a.pos - b.pos).abs();
    d.x < reach.x && d.y < reach.y
}

/// True when the two points are closer than `threshold`
#[inline]
pub fn within_distance(a: Vec2, b: Vec2, threshold: f32) -> bool {
    a.distance(b) < threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_overlap_full() {
        let player = Body::new(Vec2::new(25.0, 500.0), Vec2::splat(50.0));
        let tree = Body::new(Vec2::new(25.0, 500.0), Vec2::splat(40.0));
        assert!(CollisionPolicy::BoxOverlap.hits(&player, &tree));
    }

    #[test]
    fn test_box_overlap_needs_both_axes() {
        let player = Body::new(Vec2::new(100.0, 100.0), Vec2::splat(50.0));

        // Overlaps on x only
        let tree = Body::new(Vec2::new(110.0, 200.0), Vec2::splat(40.0));
        assert!(!boxes_overlap(&player, &tree));

        // Overlaps on y only
        let tree = Body::new(Vec2::new(300.0, 100.0), Vec2::splat(40.0));
        assert!(!boxes_overlap(&player, &tree));

        // Corner overlap
        let tree = Body::new(Vec2::new(140.0, 140.0), Vec2::splat(40.0));
        assert!(boxes_overlap(&player, &tree));
    }

    #[test]
    fn test_box_touching_edges_is_not_a_hit() {
        let player = Body::new(Vec2::new(0.0, 0.0), Vec2::splat(50.0));
        let tree = Body::new(Vec2::new(45.0, 0.0), Vec2::splat(40.0));
        assert!(!boxes_overlap(&player, &tree));
    }

    #[test]
    fn test_distance_threshold() {
        let policy = CollisionPolicy::DistanceThreshold { margin: 0.3 };
        let seal = Body::new(Vec2::ZERO, Vec2::ZERO);
        // Threshold is (0.3 + 0.5) / 2 = 0.4
        let near = Body::new(Vec2::new(0.0, 0.39), Vec2::splat(0.5));
        let far = Body::new(Vec2::new(0.3, 0.3), Vec2::splat(0.5));
        assert!(policy.hits(&seal, &near));
        assert!(!policy.hits(&seal, &far));
    }

    #[test]
    fn test_distance_ignores_player_size() {
        let policy = CollisionPolicy::DistanceThreshold { margin: 0.3 };
        let big_seal = Body::new(Vec2::ZERO, Vec2::splat(10.0));
        let tree = Body::new(Vec2::new(1.0, 0.0), Vec2::splat(0.5));
        assert!(!policy.hits(&big_seal, &tree));
    }
}
