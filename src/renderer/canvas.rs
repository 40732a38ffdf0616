//! Canvas 2D renderer
//!
//! Draws a snapshot with images when they loaded and plain rectangles when
//! they did not. Drawing failures are logged and never reach the simulation.

use glam::Vec2;
use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use super::projection::{Sprite, SpriteKind, layout_sprites};
use crate::sim::Snapshot;

const HUD_FONT: &str = "20px Arial";
const TITLE_FONT: &str = "40px Arial";
const SUBTITLE_FONT: &str = "30px Arial";

/// Images the renderer may use; `None` draws a fallback shape
#[derive(Default)]
pub struct Sprites {
    pub seal: Option<HtmlImageElement>,
    pub tree: Option<HtmlImageElement>,
}

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    sprites: Sprites,
    /// Canvas size in pixels
    pub size: Vec2,
}

impl CanvasRenderer {
    pub fn new(ctx: CanvasRenderingContext2d, sprites: Sprites, width: u32, height: u32) -> Self {
        Self {
            ctx,
            sprites,
            size: Vec2::new(width as f32, height as f32),
        }
    }

    /// Swap in an image once it has loaded
    pub fn set_sprite(&mut self, kind: SpriteKind, image: HtmlImageElement) {
        match kind {
            SpriteKind::Seal => self.sprites.seal = Some(image),
            SpriteKind::Tree => self.sprites.tree = Some(image),
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.size = Vec2::new(width as f32, height as f32);
        }
    }

    /// Draw one frame
    pub fn render(&self, snapshot: &Snapshot, fps: Option<u32>) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        ctx.clear_rect(0.0, 0.0, self.size.x as f64, self.size.y as f64);

        if snapshot.game_over {
            return self.draw_game_over(snapshot.score);
        }

        self.draw_ground()?;
        for sprite in layout_sprites(snapshot, self.size) {
            self.draw_sprite(&sprite)?;
        }

        ctx.set_fill_style_str("#000");
        ctx.set_font(HUD_FONT);
        ctx.set_text_align("left");
        ctx.fill_text(&format!("Score: {}", snapshot.score), 10.0, 30.0)?;
        if let Some(fps) = fps {
            ctx.fill_text(&format!("FPS: {}", fps), 10.0, 56.0)?;
        }
        Ok(())
    }

    fn draw_ground(&self) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let gradient = ctx.create_linear_gradient(0.0, self.size.y as f64, 0.0, 0.0);
        gradient.add_color_stop(0.0, "#ffffff")?;
        gradient.add_color_stop(1.0, "#cccccc")?;
        ctx.set_fill_style_canvas_gradient(&gradient);
        ctx.fill_rect(0.0, 0.0, self.size.x as f64, self.size.y as f64);
        Ok(())
    }

    fn draw_sprite(&self, sprite: &Sprite) -> Result<(), JsValue> {
        let (image, fallback) = match sprite.kind {
            SpriteKind::Seal => (self.sprites.seal.as_ref(), "#5b6770"),
            SpriteKind::Tree => (self.sprites.tree.as_ref(), "#2e7d32"),
        };
        let origin = sprite.origin();
        // A broken image reports complete with zero natural size
        match image.filter(|img| img.complete() && img.natural_width() > 0) {
            Some(img) => self
                .ctx
                .draw_image_with_html_image_element_and_dw_and_dh(
                    img,
                    origin.x as f64,
                    origin.y as f64,
                    sprite.size.x as f64,
                    sprite.size.y as f64,
                ),
            None => {
                self.ctx.set_fill_style_str(fallback);
                self.ctx.fill_rect(
                    origin.x as f64,
                    origin.y as f64,
                    sprite.size.x as f64,
                    sprite.size.y as f64,
                );
                Ok(())
            }
        }
    }

    fn draw_game_over(&self, score: u64) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let (w, h) = (self.size.x as f64, self.size.y as f64);
        ctx.set_fill_style_str("rgba(0, 0, 0, 0.7)");
        ctx.fill_rect(0.0, 0.0, w, h);

        ctx.set_fill_style_str("#fff");
        ctx.set_text_align("center");
        ctx.set_font(TITLE_FONT);
        ctx.fill_text("Game Over!", w / 2.0, h / 2.0 - 30.0)?;
        ctx.set_font(SUBTITLE_FONT);
        ctx.fill_text(&format!("Your score: {}", score), w / 2.0, h / 2.0 + 10.0)?;
        ctx.fill_text("Restarting...", w / 2.0, h / 2.0 + 50.0)?;
        Ok(())
    }
}
