//! crossterm implementation of the rendering and input collaborators

mod canvas;
mod font;
mod pixels;

pub use canvas::{Canvas, Viewport};
pub use pixels::PixelBuf;

use crossterm::{
    cursor,
    event::{self, Event},
    execute, terminal,
};
use log::{debug, info};
use std::io::{self, Stdout, stdout};
use std::time::{Duration, Instant};

use crate::consts::SPAWN_INTERVAL_MS;
use crate::error::StartupError;
use crate::event::{EventSource, InputEvent, SpawnTimer, map_key};
use crate::game::{Frontend, Phase};
use crate::geom::Rect;
use crate::surface::{Image, Rgb, Surface};

/// Caps the frame rate by sleeping out the rest of each frame.
pub struct FrameClock {
    last: Instant,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
        }
    }

    /// Sleep until one frame at `fps` has passed since the previous tick.
    /// Returns the time since the previous tick.
    pub fn tick(&mut self, fps: u32) -> Duration {
        let frame_dur = Duration::from_secs(1) / fps.max(1);
        let elapsed = self.last.elapsed();
        if elapsed < frame_dur {
            std::thread::sleep(frame_dur - elapsed);
        }
        let now = Instant::now();
        let dt = now - self.last;
        self.last = now;
        dt
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

/// The process-wide terminal context: raw mode, alternate screen, pixel
/// canvas, frame clock and spawn timer. Restores the terminal on
/// [`shutdown`](Terminal::shutdown) or drop.
pub struct Terminal {
    out: Stdout,
    canvas: Canvas,
    clock: FrameClock,
    timer: SpawnTimer,
    active: bool,
}

impl Terminal {
    pub fn start() -> Result<Self, StartupError> {
        let (cols, rows) = terminal::size()?;
        let pw = cols as usize;
        let ph = rows as usize * 2;
        if !Viewport::fit(pw, ph).is_playable() {
            return Err(StartupError::TooSmall { cols, rows });
        }

        terminal::enable_raw_mode()?;
        // From here on, drop restores the terminal if setup fails
        let mut term = Terminal {
            out: stdout(),
            canvas: Canvas::new(pw, ph),
            clock: FrameClock::new(),
            timer: SpawnTimer::new(Duration::from_millis(SPAWN_INTERVAL_MS), Instant::now()),
            active: true,
        };
        execute!(
            term.out,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::DisableLineWrap,
            terminal::SetTitle("Flappy Bird"),
        )?;
        info!("terminal ready, {cols}x{rows} cells, scale {:.3}", term.canvas.view.scale);
        Ok(term)
    }

    pub fn shutdown(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        execute!(
            self.out,
            terminal::LeaveAlternateScreen,
            cursor::Show,
            terminal::EnableLineWrap,
        )?;
        terminal::disable_raw_mode()
    }

    fn resize(&mut self, cols: u16, rows: u16) {
        debug!("resized to {cols}x{rows}");
        self.canvas.resize(cols as usize, rows as usize * 2);
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = self.shutdown();
    }
}

impl EventSource for Terminal {
    fn drain(&mut self, phase: Phase, out: &mut Vec<InputEvent>) -> io::Result<()> {
        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key) => out.extend(map_key(key, phase)),
                Event::Resize(c, r) => self.resize(c, r),
                _ => {}
            }
        }
        if self.timer.poll(Instant::now()) {
            out.push(InputEvent::SpawnPipe);
        }
        Ok(())
    }
}

impl Surface for Terminal {
    fn size(&self) -> (i32, i32) {
        self.canvas.size()
    }

    fn blit(&mut self, image: Image, x: i32, y: i32) {
        self.canvas.blit(image, x, y);
    }

    fn draw_text(&mut self, text: &str, size: u32, color: Rgb, rect: Rect) {
        self.canvas.draw_text(text, size, color, rect);
    }

    fn text_size(&self, text: &str, size: u32) -> (i32, i32) {
        self.canvas.text_size(text, size)
    }

    fn dim(&mut self) {
        self.canvas.dim();
    }
}

impl Frontend for Terminal {
    fn present(&mut self) -> io::Result<()> {
        self.canvas.buf.render(&mut self.out)
    }

    fn tick(&mut self, fps: u32) {
        self.clock.tick(fps);
    }

    fn new_round(&mut self) {
        debug!("spawn timer re-armed");
        self.timer.reset(Instant::now());
    }
}
