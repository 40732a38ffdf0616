//! Rendering module
//!
//! `projection` is pure layout math; `canvas` draws it with the Canvas 2D API
//! in the browser.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod projection;

#[cfg(target_arch = "wasm32")]
pub use canvas::{CanvasRenderer, Sprites};
pub use projection::{Sprite, SpriteKind, depth_scale, layout_sprites, project_iso};
