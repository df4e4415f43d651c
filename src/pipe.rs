//! Scrolling pipes and the factory that spawns them in gated pairs

use log::debug;
use rand::Rng;

use crate::consts::*;
use crate::geom::Rect;
use crate::sprite::Sprite;
use crate::surface::{Image, Surface};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Stands on the floor; its top edge is the bottom of the gap
    Upward,
    /// Hangs from the ceiling; its bottom edge is the top of the gap
    Inverted,
}

/// One wall segment of a gate.
#[derive(Debug, Clone, PartialEq)]
pub struct Pipe {
    pub x: i32,
    pub y: i32,
    /// Gap-side edge: bottom for inverted pipes, top for upward ones
    pub anchor_y: i32,
    pub orientation: Orientation,
    /// Set once the bird has fully passed this pipe
    pub scored: bool,
    removed: bool,
}

impl Pipe {
    pub fn new(x: i32, anchor_y: i32, orientation: Orientation) -> Self {
        let y = match orientation {
            Orientation::Inverted => anchor_y - PIPE_HEIGHT,
            Orientation::Upward => anchor_y,
        };
        Self {
            x,
            y,
            anchor_y,
            orientation,
            scored: false,
            removed: false,
        }
    }

    /// True once the pipe has scrolled fully off the left edge
    pub fn is_removed(&self) -> bool {
        self.removed
    }
}

impl Sprite for Pipe {
    fn update(&mut self) -> bool {
        if self.removed {
            return false;
        }
        self.x -= PIPE_SPEED;
        if self.bounds().right() < 0 {
            self.removed = true;
        }
        !self.removed
    }

    fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, PIPE_WIDTH, PIPE_HEIGHT)
    }

    fn draw(&self, surface: &mut dyn Surface) {
        surface.blit(Image::Pipe(self.orientation), self.x, self.y);
    }
}

/// An inverted and an upward pipe around one gap. Always built and inserted whole.
#[derive(Debug, Clone, PartialEq)]
pub struct PipePair {
    pub top: Pipe,
    pub bottom: Pipe,
}

impl PipePair {
    /// Pair whose gap is centred on `gap_center`, spawned at the right edge
    pub fn at(gap_center: i32) -> Self {
        Self {
            top: Pipe::new(SCREEN_WIDTH, gap_center - PIPE_GAP / 2, Orientation::Inverted),
            bottom: Pipe::new(SCREEN_WIDTH, gap_center + PIPE_GAP / 2, Orientation::Upward),
        }
    }

    pub fn into_pipes(self) -> [Pipe; 2] {
        [self.top, self.bottom]
    }
}

/// Spawn a pair with its gap centre drawn uniformly from
/// `[GAP_MARGIN, SCREEN_HEIGHT - GAP_MARGIN]`.
pub fn create_pair<R: Rng + ?Sized>(rng: &mut R) -> PipePair {
    let gap_center = rng.random_range(GAP_MARGIN..=SCREEN_HEIGHT - GAP_MARGIN);
    debug!("spawning pipe pair, gap centre {gap_center}");
    PipePair::at(gap_center)
}
