//! World to screen mapping and sprite layout
//!
//! Pure math, shared by the canvas renderer and native tests. The isometric
//! mode projects world units onto a 30 degree grid centred on the canvas and
//! shrinks trees with depth; the top-down mode is already in pixels.

use glam::Vec2;

use crate::settings::GameMode;
use crate::sim::Snapshot;

/// Isometric grid angle (30 degrees)
pub const ISO_ANGLE: f32 = std::f32::consts::PI / 6.0;
/// Pixels per world unit before depth scaling
pub const ISO_SCALE: f32 = 200.0;
/// On-screen sprite size at depth 0
pub const ISO_SPRITE_SIZE: Vec2 = Vec2::new(80.0, 100.0);
/// Depth scale is capped so trees about to leave do not fill the screen
pub const MAX_DEPTH_SCALE: f32 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteKind {
    Seal,
    Tree,
}

/// A screen-space rectangle to draw, centred on `center`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub kind: SpriteKind,
    pub center: Vec2,
    pub size: Vec2,
}

impl Sprite {
    /// Top-left corner, the origin `drawImage`/`fillRect` expect
    pub fn origin(&self) -> Vec2 {
        self.center - self.size / 2.0
    }
}

/// Project a world point onto an isometric canvas of `viewport` pixels
pub fn project_iso(world: Vec2, viewport: Vec2) -> Vec2 {
    let (sin, cos) = ISO_ANGLE.sin_cos();
    Vec2::new(
        (world.x - world.y) * cos * ISO_SCALE + viewport.x / 2.0,
        (world.x + world.y) * sin * ISO_SCALE + viewport.y / 2.0,
    )
}

/// Perspective shrink for something at `depth`
pub fn depth_scale(depth: f32) -> f32 {
    (1.0 / (depth + 1.0)).clamp(0.0, MAX_DEPTH_SCALE)
}

/// Screen-space sprites for a snapshot, in draw order (back to front)
pub fn layout_sprites(snapshot: &Snapshot, viewport: Vec2) -> Vec<Sprite> {
    let mut sprites = Vec::with_capacity(snapshot.obstacles.len() + 1);
    match snapshot.mode {
        GameMode::Isometric => {
            let mut trees: Vec<Vec2> = snapshot.obstacles.clone();
            // Far trees first so near ones cover them
            trees.sort_by(|a, b| b.y.total_cmp(&a.y));
            sprites.extend(trees.into_iter().map(|t| Sprite {
                kind: SpriteKind::Tree,
                center: project_iso(t, viewport),
                size: ISO_SPRITE_SIZE * depth_scale(t.y),
            }));
            sprites.push(Sprite {
                kind: SpriteKind::Seal,
                center: project_iso(snapshot.player, viewport),
                size: ISO_SPRITE_SIZE,
            });
        }
        GameMode::TopDown => {
            // Playfield is the canvas, scale if the two disagree
            let scale = if snapshot.playfield.x > 0.0 && snapshot.playfield.y > 0.0 {
                viewport / snapshot.playfield
            } else {
                Vec2::ONE
            };
            sprites.extend(snapshot.obstacles.iter().map(|&t| Sprite {
                kind: SpriteKind::Tree,
                center: t * scale,
                size: snapshot.obstacle_size * scale,
            }));
            sprites.push(Sprite {
                kind: SpriteKind::Seal,
                center: snapshot.player * scale,
                size: snapshot.player_size * scale,
            });
        }
    }
    sprites
}
