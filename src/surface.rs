//! Rendering collaborator seam
//!
//! The game only knows sprite positions. Pixels, fonts and images belong to
//! whatever implements [`Surface`].

use crate::geom::Rect;
use crate::pipe::Orientation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const fn lerp(a: Rgb, b: Rgb, t_256: u16) -> Rgb {
        let t = t_256 as i32;
        Rgb(
            (a.0 as i32 + (b.0 as i32 - a.0 as i32) * t / 256) as u8,
            (a.1 as i32 + (b.1 as i32 - a.1 as i32) * t / 256) as u8,
            (a.2 as i32 + (b.2 as i32 - a.2 as i32) * t / 256) as u8,
        )
    }

    pub const fn halved(self) -> Rgb {
        Rgb(self.0 / 2, self.1 / 2, self.2 / 2)
    }
}

pub const WHITE: Rgb = Rgb(255, 255, 255);
pub const BLACK: Rgb = Rgb(0, 0, 0);
pub const RED: Rgb = Rgb(255, 0, 0);

/// Images the surface knows how to draw. Each is drawn with its top-left
/// corner at the given position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Image {
    /// Full play-area backdrop; `scroll` drifts the scenery
    Background { scroll: i32 },
    /// Bird in its box; `rising` picks the wing pose
    Bird { rising: bool },
    Pipe(Orientation),
}

pub trait Surface {
    /// Logical size of the play area
    fn size(&self) -> (i32, i32);

    fn blit(&mut self, image: Image, x: i32, y: i32);

    /// Draw `text` centred in `rect`. `size` is the glyph height in logical pixels.
    fn draw_text(&mut self, text: &str, size: u32, color: Rgb, rect: Rect);

    /// Logical width and height `text` occupies at `size`
    fn text_size(&self, text: &str, size: u32) -> (i32, i32);

    /// Darken everything drawn so far
    fn dim(&mut self);
}
