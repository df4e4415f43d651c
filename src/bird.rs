use crate::consts::*;
use crate::geom::Rect;
use crate::sprite::Sprite;
use crate::surface::{Image, Surface};

/// The player. Horizontal position is fixed; gravity and flaps move it vertically.
#[derive(Debug, Clone, PartialEq)]
pub struct Bird {
    pub x: i32,
    pub y: i32,
    pub velocity: f32,
}

impl Bird {
    pub fn new() -> Self {
        Self {
            x: BIRD_START_X,
            y: BIRD_START_Y,
            velocity: 0.0,
        }
    }

    /// Reset velocity to the flap strength. Not additive.
    pub fn flap(&mut self) {
        self.velocity = FLAP_STRENGTH;
    }
}

impl Default for Bird {
    fn default() -> Self {
        Self::new()
    }
}

impl Sprite for Bird {
    /// No clamping here; leaving the play area is the game's concern.
    fn update(&mut self) -> bool {
        self.velocity += GRAVITY;
        // Truncates toward zero, so small velocities don't move the bird yet
        self.y += self.velocity as i32;
        true
    }

    fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, BIRD_WIDTH, BIRD_HEIGHT)
    }

    fn draw(&self, surface: &mut dyn Surface) {
        let rising = self.velocity < 0.0;
        surface.blit(Image::Bird { rising }, self.x, self.y);
    }
}
