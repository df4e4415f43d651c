use crate::geom::Rect;
use crate::surface::Surface;

/// The interface shared by the two entity kinds, [`Bird`](crate::bird::Bird)
/// and [`Pipe`](crate::pipe::Pipe).
pub trait Sprite {
    /// Advance one frame. Returns `false` once the sprite has left the play
    /// area and must be evicted from the live set.
    fn update(&mut self) -> bool;

    fn bounds(&self) -> Rect;

    fn draw(&self, surface: &mut dyn Surface);
}
