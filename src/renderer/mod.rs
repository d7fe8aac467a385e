//! Canvas 2D rendering
//!
//! Draws settled cells, the falling piece and the next-piece preview. Each
//! cell is a simple cat part picked by role; colors come straight from the
//! cells.

use std::f64::consts::PI;

use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::consts::BLOCK_SIZE;
use crate::sim::{CatRole, GameState, Piece};

const BACKGROUND: &str = "#1c1c2e";
const FEATURE: &str = "#000000";

/// Draws onto one canvas
pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
}

impl CanvasRenderer {
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| JsValue::from_str("not a 2d context"))?;
        Ok(Self {
            ctx,
            width: canvas.width() as f64,
            height: canvas.height() as f64,
        })
    }

    /// Full frame: background, board, active piece
    pub fn draw_game(&self, state: &GameState) {
        self.ctx.set_fill_style_str(BACKGROUND);
        self.ctx.fill_rect(0.0, 0.0, self.width, self.height);

        for (y, row) in state.board.rows().iter().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                if let Some(cell) = cell {
                    draw_cat_block(&self.ctx, x as f64, y as f64, &cell.color.to_css(), cell.role);
                }
            }
        }

        let color = state.current.color.to_css();
        for (pos, role) in state.current.cells() {
            if pos.y >= 0 {
                draw_cat_block(&self.ctx, pos.x as f64, pos.y as f64, &color, role);
            }
        }
    }

    /// Next-piece preview, centered on its occupied bounding box
    pub fn draw_preview(&self, piece: &Piece) {
        self.ctx.clear_rect(0.0, 0.0, self.width, self.height);

        let mut min = (i32::MAX, i32::MAX);
        let mut max = (i32::MIN, i32::MIN);
        for (offset, _) in piece.local_cells() {
            min = (min.0.min(offset.x), min.1.min(offset.y));
            max = (max.0.max(offset.x), max.1.max(offset.y));
        }
        if min.0 > max.0 {
            return;
        }

        let piece_w = (max.0 - min.0 + 1) as f64 * BLOCK_SIZE;
        let piece_h = (max.1 - min.1 + 1) as f64 * BLOCK_SIZE;
        let offset_x = ((self.width - piece_w) / 2.0).floor();
        let offset_y = ((self.height - piece_h) / 2.0).floor();

        self.ctx.save();
        if self.ctx.translate(offset_x, offset_y).is_ok() {
            let color = piece.color.to_css();
            for (offset, role) in piece.local_cells() {
                let x = (offset.x - min.0) as f64;
                let y = (offset.y - min.1) as f64;
                draw_cat_block(&self.ctx, x, y, &color, role);
            }
        }
        self.ctx.restore();
    }
}

/// Draw one cell at grid position (x, y)
fn draw_cat_block(ctx: &CanvasRenderingContext2d, x: f64, y: f64, color: &str, role: CatRole) {
    let s = BLOCK_SIZE;
    let px = x * s;
    let py = y * s;
    ctx.set_fill_style_str(color);

    match role {
        CatRole::Head => {
            ctx.begin_path();
            let _ = ctx.arc(px + s * 0.5, py + s * 0.55, s * 0.4, 0.0, 2.0 * PI);
            ctx.fill();

            // Ears
            ctx.begin_path();
            ctx.move_to(px + s * 0.15, py + s * 0.35);
            ctx.line_to(px + s * 0.25, py);
            ctx.line_to(px + s * 0.45, py + s * 0.2);
            ctx.move_to(px + s * 0.55, py + s * 0.2);
            ctx.line_to(px + s * 0.75, py);
            ctx.line_to(px + s * 0.85, py + s * 0.35);
            ctx.fill();

            // Eyes
            ctx.set_fill_style_str(FEATURE);
            ctx.begin_path();
            let _ = ctx.arc(px + s * 0.4, py + s * 0.5, s * 0.05, 0.0, 2.0 * PI);
            ctx.fill();
            ctx.begin_path();
            let _ = ctx.arc(px + s * 0.6, py + s * 0.5, s * 0.05, 0.0, 2.0 * PI);
            ctx.fill();
        }
        CatRole::Body => {
            ctx.fill_rect(px + s * 0.1, py + s * 0.1, s * 0.8, s * 0.8);
        }
        CatRole::BodySide => {
            ctx.fill_rect(px + s * 0.3, py + s * 0.1, s * 0.4, s * 0.8);
        }
        CatRole::Tail => {
            ctx.fill_rect(px + s * 0.1, py + s * 0.1, s * 0.5, s * 0.8);
            ctx.set_stroke_style_str(color);
            ctx.set_line_width(s * 0.12);
            ctx.begin_path();
            ctx.move_to(px + s * 0.6, py + s * 0.7);
            ctx.quadratic_curve_to(px + s, py + s * 0.6, px + s * 0.85, py + s * 0.15);
            ctx.stroke();
        }
        CatRole::Legs => {
            ctx.fill_rect(px + s * 0.1, py + s * 0.1, s * 0.8, s * 0.5);
            ctx.fill_rect(px + s * 0.15, py + s * 0.6, s * 0.15, s * 0.35);
            ctx.fill_rect(px + s * 0.7, py + s * 0.6, s * 0.15, s * 0.35);
        }
    }
}
