//! Logical play area drawn into a [`PixelBuf`]
//!
//! The 400x600 play area is scaled to fit the terminal and centred; the
//! remaining cells are letterboxed. Images are procedural, there are no asset
//! files.

use crate::consts::*;
use crate::geom::Rect;
use crate::pipe::Orientation;
use crate::surface::{BLACK, Image, Rgb, Surface};

use super::font::{self, ADVANCE, GLYPH_H};
use super::pixels::PixelBuf;

// ── Colors ──────────────────────────────────────────────────────────────────

const SKY_TOP: Rgb = Rgb(70, 180, 200);
const SKY_BOT: Rgb = Rgb(190, 232, 245);
const PIPE_L: Rgb = Rgb(74, 122, 26);
const PIPE_M: Rgb = Rgb(100, 170, 40);
const PIPE_R: Rgb = Rgb(115, 191, 46);
const PIPE_HI: Rgb = Rgb(145, 215, 62);
const BIRD_Y: Rgb = Rgb(245, 200, 66);
const BIRD_HI: Rgb = Rgb(255, 225, 100);
const BIRD_WING: Rgb = Rgb(215, 165, 35);
const BIRD_EYE: Rgb = Rgb(255, 255, 255);
const BIRD_PUPIL: Rgb = Rgb(20, 20, 20);
const BIRD_BEAK: Rgb = Rgb(225, 75, 35);
const BIRD_BEAK_HI: Rgb = Rgb(240, 110, 50);
const HILL_FAR: Rgb = Rgb(120, 195, 75);
const HILL_NEAR: Rgb = Rgb(95, 175, 55);
const SHADOW: Rgb = Rgb(30, 30, 30);

/// Pipe cap: height and overhang on each side, logical pixels
const CAP_H: i32 = 24;
const CAP_EXTRA: i32 = 4;

/// Smallest play-area height, in pixels, worth starting a game in
pub const MIN_PLAY_HEIGHT: i32 = 24;

/// Glyph height as a fraction of the requested font size
const GLYPH_SCALE: f64 = 0.7;

// ── Viewport ────────────────────────────────────────────────────────────────

/// Placement of the logical play area inside the pixel buffer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scale: f64,
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Viewport {
    pub fn fit(pw: usize, ph: usize) -> Self {
        let scale = (pw as f64 / SCREEN_WIDTH as f64).min(ph as f64 / SCREEN_HEIGHT as f64);
        let w = (SCREEN_WIDTH as f64 * scale) as i32;
        let h = (SCREEN_HEIGHT as f64 * scale) as i32;
        Self {
            scale,
            x: (pw as i32 - w) / 2,
            y: (ph as i32 - h) / 2,
            w,
            h,
        }
    }

    pub fn is_playable(&self) -> bool {
        self.h >= MIN_PLAY_HEIGHT
    }

    pub fn to_device(&self, lx: i32, ly: i32) -> (i32, i32) {
        (
            self.x + (lx as f64 * self.scale).floor() as i32,
            self.y + (ly as f64 * self.scale).floor() as i32,
        )
    }

    /// Device-pixel span (x0, y0, x1, y1) of a logical rect, clipped to the
    /// play area. Ends are exclusive.
    pub fn span(&self, r: Rect) -> (i32, i32, i32, i32) {
        let (x0, y0) = self.to_device(r.left(), r.top());
        let (x1, y1) = self.to_device(r.right(), r.bottom());
        (
            x0.max(self.x),
            y0.max(self.y),
            x1.min(self.x + self.w),
            y1.min(self.y + self.h),
        )
    }
}

// ── Canvas ──────────────────────────────────────────────────────────────────

pub struct Canvas {
    pub buf: PixelBuf,
    pub view: Viewport,
}

impl Canvas {
    pub fn new(pw: usize, ph: usize) -> Self {
        Self {
            buf: PixelBuf::new(pw, ph),
            view: Viewport::fit(pw, ph),
        }
    }

    pub fn resize(&mut self, pw: usize, ph: usize) {
        self.buf.resize(pw, ph);
        self.view = Viewport::fit(pw, ph);
    }

    fn fill(&mut self, r: Rect, c: Rgb) {
        let (x0, y0, x1, y1) = self.view.span(r);
        for y in y0..y1 {
            for x in x0..x1 {
                self.buf.set(x, y, c);
            }
        }
    }

    /// Fill with the pipe's cylindrical shading, column by column
    fn fill_shaded(&mut self, r: Rect) {
        let (x0, y0, x1, y1) = self.view.span(r);
        let (full_x0, _) = self.view.to_device(r.left(), 0);
        let (full_x1, _) = self.view.to_device(r.right(), 0);
        for x in x0..x1 {
            let c = pipe_shade(x - full_x0, full_x1 - full_x0);
            for y in y0..y1 {
                self.buf.set(x, y, c);
            }
        }
    }

    /// Device size of one glyph cell at `size`
    fn cell(&self, size: u32) -> i32 {
        let glyph_px = size as f64 * GLYPH_SCALE * self.view.scale;
        ((glyph_px / GLYPH_H as f64).round() as i32).max(1)
    }

    fn draw_background(&mut self, scroll: i32) {
        let v = self.view;
        for y in 0..v.h {
            let t = (y as u32 * 256 / v.h.max(1) as u32) as u16;
            let c = Rgb::lerp(SKY_TOP, SKY_BOT, t);
            for x in 0..v.w {
                self.buf.set(v.x + x, v.y + y, c);
            }
        }

        // Hills, shaped in logical units so they look the same at any scale
        let base = v.y + v.h;
        let scale = v.scale.max(f64::EPSILON);
        for x in 0..v.w {
            let lx = x as f64 / scale;
            let fx = (lx + scroll as f64 * 0.2) * 0.012;
            let h = (fx.sin() * 30.0 + (fx * 1.7).sin() * 15.0 + 60.0) * scale;
            for y in (base - h as i32)..base {
                self.buf.set(v.x + x, y, HILL_FAR);
            }
        }
        for x in 0..v.w {
            let lx = x as f64 / scale;
            let fx = (lx + scroll as f64 * 0.4) * 0.018;
            let h = (fx.sin() * 20.0 + (fx * 2.3).sin() * 10.0 + 30.0) * scale;
            for y in (base - h as i32)..base {
                self.buf.set(v.x + x, y, HILL_NEAR);
            }
        }
    }

    fn draw_pipe(&mut self, x: i32, y: i32, orientation: Orientation) {
        let body = Rect::new(x, y, PIPE_WIDTH, PIPE_HEIGHT);
        self.fill_shaded(body);

        let cap_y = match orientation {
            Orientation::Inverted => body.bottom() - CAP_H,
            Orientation::Upward => body.top(),
        };
        let cap = Rect::new(x - CAP_EXTRA, cap_y, PIPE_WIDTH + CAP_EXTRA * 2, CAP_H);
        self.fill_shaded(cap);
    }

    /// Parts laid out inside the 34x24 bird box
    fn draw_bird(&mut self, x: i32, y: i32, rising: bool) {
        let part = |dx, dy, w, h| Rect::new(x + dx, y + dy, w, h);
        self.fill(part(0, 2, 28, 20), BIRD_Y);
        self.fill(part(2, 2, 24, 4), BIRD_HI);
        let wing_y = if rising { 6 } else { 12 };
        self.fill(part(2, wing_y, 14, 6), BIRD_WING);
        self.fill(part(18, 4, 8, 8), BIRD_EYE);
        self.fill(part(22, 6, 4, 4), BIRD_PUPIL);
        self.fill(part(24, 12, 10, 4), BIRD_BEAK_HI);
        self.fill(part(24, 16, 10, 4), BIRD_BEAK);
    }
}

impl Surface for Canvas {
    fn size(&self) -> (i32, i32) {
        (SCREEN_WIDTH, SCREEN_HEIGHT)
    }

    fn blit(&mut self, image: Image, x: i32, y: i32) {
        match image {
            Image::Background { scroll } => {
                self.buf.clear();
                self.draw_background(scroll);
            }
            Image::Bird { rising } => self.draw_bird(x, y, rising),
            Image::Pipe(orientation) => self.draw_pipe(x, y, orientation),
        }
    }

    fn draw_text(&mut self, text: &str, size: u32, color: Rgb, rect: Rect) {
        if !self.view.is_playable() {
            return;
        }
        let cell = self.cell(size);
        let (cols, rows) = font::cells(text);
        let (left, top) = self.view.to_device(rect.left(), rect.top());
        let (right, bottom) = self.view.to_device(rect.right(), rect.bottom());
        let sx = (left + right) / 2 - cols * cell / 2;
        let sy = (top + bottom) / 2 - rows * cell / 2;
        let shadow = color != BLACK;

        for (i, ch) in text.chars().enumerate() {
            let Some(g) = font::glyph(ch) else { continue };
            let gx = sx + i as i32 * ADVANCE * cell;
            for row in 0..GLYPH_H {
                for col in 0..font::GLYPH_W {
                    if !font::lit(g, col, row) {
                        continue;
                    }
                    for dy in 0..cell {
                        for dx in 0..cell {
                            let px = gx + col * cell + dx;
                            let py = sy + row * cell + dy;
                            if shadow {
                                self.buf.set(px + 1, py + 1, SHADOW);
                            }
                            self.buf.set(px, py, color);
                        }
                    }
                }
            }
        }
    }

    fn text_size(&self, text: &str, size: u32) -> (i32, i32) {
        if !self.view.is_playable() {
            return (0, 0);
        }
        let cell = self.cell(size) as f64;
        let (cols, rows) = font::cells(text);
        let scale = self.view.scale.max(f64::EPSILON);
        (
            (cols as f64 * cell / scale).ceil() as i32,
            (rows as f64 * cell / scale).ceil() as i32,
        )
    }

    fn dim(&mut self) {
        self.buf.dim();
    }
}

fn pipe_shade(x: i32, total_w: i32) -> Rgb {
    if total_w <= 1 {
        return PIPE_M;
    }
    let t = (x.clamp(0, total_w - 1) as f64 / (total_w - 1) as f64 * 256.0) as u16;
    if t < 64 {
        Rgb::lerp(PIPE_L, PIPE_M, (t * 4).min(256))
    } else if t < 100 {
        Rgb::lerp(PIPE_M, PIPE_HI, ((t - 64) * 7).min(256))
    } else if t < 160 {
        Rgb::lerp(PIPE_HI, PIPE_R, ((t - 100) * 4).min(256))
    } else {
        Rgb::lerp(PIPE_R, PIPE_L, ((t - 160) * 3).min(256))
    }
}
