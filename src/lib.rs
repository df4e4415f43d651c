//! Flappy Bird for the terminal
//!
//! Core modules:
//! - `bird`, `pipe`: the two entity kinds and the pipe pair factory
//! - `game`: per-frame simulation, collision, scoring and the play/game-over state machine
//! - `event`, `surface`: the seams to the input and rendering collaborators
//! - `term`: crossterm implementation of those collaborators

pub mod bird;
pub mod error;
pub mod event;
pub mod game;
pub mod geom;
pub mod pipe;
pub mod sprite;
pub mod surface;
pub mod term;

pub use error::StartupError;
pub use game::{Game, Phase};

/// Fixed game constants. Coordinates are logical pixels of the play area.
pub mod consts {
    /// Play area size
    pub const SCREEN_WIDTH: i32 = 400;
    pub const SCREEN_HEIGHT: i32 = 600;

    /// Frame rate of the simulation and renderer
    pub const FPS: u32 = 60;

    /// Bird box and spawn point (top-left corner)
    pub const BIRD_WIDTH: i32 = 34;
    pub const BIRD_HEIGHT: i32 = 24;
    pub const BIRD_START_X: i32 = 50;
    pub const BIRD_START_Y: i32 = 300;

    /// Added to the bird's velocity every frame
    pub const GRAVITY: f32 = 0.25;
    /// Velocity after a flap (negative is up)
    pub const FLAP_STRENGTH: f32 = -5.0;

    pub const PIPE_WIDTH: i32 = 50;
    /// Pipes span the full play height so each one is a solid wall
    pub const PIPE_HEIGHT: i32 = SCREEN_HEIGHT;
    /// Vertical opening between a pipe pair
    pub const PIPE_GAP: i32 = 200;
    /// Leftward scroll per frame
    pub const PIPE_SPEED: i32 = 2;
    /// Gap centres are drawn from [GAP_MARGIN, SCREEN_HEIGHT - GAP_MARGIN]
    pub const GAP_MARGIN: i32 = 200;
    /// Period of the pipe spawn timer
    pub const SPAWN_INTERVAL_MS: u64 = 2000;

    /// Each pipe is worth half a point, so a cleared pair scores one
    pub const HALF_POINTS_PER_PIPE: u32 = 1;

    /// Frames the game-over screen is held before a restart is accepted (2 s)
    pub const GAME_OVER_HOLD_FRAMES: u32 = 2 * FPS;
}
