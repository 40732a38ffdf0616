//! Platform abstraction layer
//!
//! Handles browser-facing concerns that do not need a browser to test:
//! - Keyboard/touch to input mapping
//! - Asset loading gate before the first frame

pub mod assets;
pub mod input;

pub use assets::{AssetState, ReadyBarrier};
pub use input::{InputTracker, Key};
