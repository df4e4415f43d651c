//! Per-frame simulation and the play/game-over state machine

use std::io;

use log::{debug, info};
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::bird::Bird;
use crate::consts::*;
use crate::event::{EventSource, InputEvent};
use crate::geom::Rect;
use crate::pipe::{Pipe, PipePair, create_pair};
use crate::sprite::Sprite;
use crate::surface::{BLACK, Image, RED, Surface, WHITE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Playing,
    /// Entered on a crash; left only through an explicit restart
    GameOver,
}

/// Whether the loop should keep going after the current frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// A restart happened this frame; per-round schedules start over
    Restarted,
    Quit,
}

pub struct Game {
    bird: Bird,
    pipes: Vec<Pipe>,
    /// One half point per pipe passed
    score_halves: u32,
    phase: Phase,
    /// Frames left before a restart is accepted
    hold: u32,
    scroll: i32,
    quit: bool,
    restarted: bool,
    rng: Pcg32,
}

impl Game {
    pub fn new(seed: u64) -> Self {
        Self {
            bird: Bird::new(),
            pipes: Vec::new(),
            score_halves: 0,
            phase: Phase::Playing,
            hold: 0,
            scroll: 0,
            quit: false,
            restarted: false,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn bird(&self) -> &Bird {
        &self.bird
    }

    pub fn pipes(&self) -> &[Pipe] {
        &self.pipes
    }

    /// Whole points; a pair is worth one once both its pipes are passed
    pub fn score(&self) -> u32 {
        self.score_halves / (2 * HALF_POINTS_PER_PIPE)
    }

    /// Process this frame's events then advance the simulation one step.
    pub fn step(&mut self, events: &[InputEvent]) -> Flow {
        self.handle_events(events);
        self.update();
        if self.quit {
            Flow::Quit
        } else if std::mem::take(&mut self.restarted) {
            Flow::Restarted
        } else {
            Flow::Continue
        }
    }

    pub fn handle_events(&mut self, events: &[InputEvent]) {
        for &event in events {
            match (event, self.phase) {
                (InputEvent::Quit, _) => self.quit = true,
                (InputEvent::Flap, Phase::Playing) => self.bird.flap(),
                (InputEvent::SpawnPipe, Phase::Playing) => self.spawn_pair(),
                (InputEvent::Restart, Phase::GameOver) => {
                    if self.hold == 0 {
                        self.restart();
                    } else {
                        debug!("restart ignored, {} hold frames left", self.hold);
                    }
                }
                _ => {}
            }
        }
    }

    fn spawn_pair(&mut self) {
        let pair = create_pair(&mut self.rng);
        self.add_pair(pair);
    }

    fn add_pair(&mut self, pair: PipePair) {
        self.pipes.extend(pair.into_pipes());
    }

    fn restart(&mut self) {
        info!("restarting");
        self.bird = Bird::new();
        self.pipes.clear();
        self.score_halves = 0;
        self.hold = 0;
        self.phase = Phase::Playing;
        self.restarted = true;
    }

    pub fn update(&mut self) {
        match self.phase {
            Phase::Playing => {
                self.bird.update();
                self.pipes.retain_mut(|p| p.update());
                self.scroll = self.scroll.wrapping_add(PIPE_SPEED);

                if self.crashed() {
                    info!("game over, score {}", self.score());
                    self.phase = Phase::GameOver;
                    self.hold = GAME_OVER_HOLD_FRAMES;
                }
                self.award_points();
            }
            Phase::GameOver => {
                self.hold = self.hold.saturating_sub(1);
            }
        }
    }

    fn crashed(&self) -> bool {
        let bird = self.bird.bounds();
        bird.top() <= 0
            || bird.bottom() >= SCREEN_HEIGHT
            || self.pipes.iter().any(|p| bird.collides(&p.bounds()))
    }

    fn award_points(&mut self) {
        let bird_left = self.bird.bounds().left();
        for pipe in &mut self.pipes {
            if !pipe.scored && pipe.bounds().right() < bird_left {
                pipe.scored = true;
                self.score_halves += HALF_POINTS_PER_PIPE;
                debug!("pipe passed, {} half points", self.score_halves);
            }
        }
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        surface.blit(Image::Background { scroll: self.scroll }, 0, 0);
        for pipe in &self.pipes {
            pipe.draw(surface);
        }
        self.bird.draw(surface);

        let score = format!("SCORE: {}", self.score());
        let (w, h) = surface.text_size(&score, 36);
        surface.draw_text(&score, 36, BLACK, Rect::new(10, 10, w, h));

        if self.phase == Phase::GameOver {
            self.draw_game_over(surface);
        }
    }

    fn draw_game_over(&self, surface: &mut dyn Surface) {
        let (sw, sh) = surface.size();
        let (cx, cy) = (sw / 2, sh / 2);
        surface.dim();

        let text = "GAME OVER";
        let (w, h) = surface.text_size(text, 74);
        surface.draw_text(text, 74, RED, Rect::centered(cx, cy - 50, w, h));

        let score = format!("SCORE: {}", self.score());
        let (w, h) = surface.text_size(&score, 50);
        surface.draw_text(&score, 50, BLACK, Rect::centered(cx, cy + 50, w, h));

        if self.hold == 0 {
            let hint = "SPACE TO RESTART";
            let (w, h) = surface.text_size(hint, 24);
            surface.draw_text(hint, 24, WHITE, Rect::centered(cx, cy + 120, w, h));
        }
    }
}

/// Everything the loop needs from the outside world
pub trait Frontend: EventSource + Surface {
    /// Push the finished frame to the display
    fn present(&mut self) -> io::Result<()>;

    /// Block until the next frame is due at `fps`
    fn tick(&mut self, fps: u32);

    /// A new round started; re-arm the spawn timer
    fn new_round(&mut self);
}

/// Run frames until a quit event. The frame that sees the quit still
/// updates and renders before returning.
pub fn run<F: Frontend>(game: &mut Game, frontend: &mut F) -> io::Result<()> {
    let mut events = Vec::new();
    loop {
        frontend.tick(FPS);

        events.clear();
        frontend.drain(game.phase(), &mut events)?;
        let flow = game.step(&events);
        if flow == Flow::Restarted {
            frontend.new_round();
        }

        game.draw(&mut *frontend);
        frontend.present()?;

        if flow == Flow::Quit {
            info!("quit, final score {}", game.score());
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipe::Orientation;
    use proptest::prelude::*;
    use std::collections::VecDeque;

    fn crash(game: &mut Game) {
        game.bird.y = 0;
        game.update();
        assert_eq!(game.phase(), Phase::GameOver);
    }

    #[test]
    fn test_starts_playing() {
        let game = Game::new(1);
        assert_eq!(game.phase(), Phase::Playing);
        assert_eq!(game.score(), 0);
        assert!(game.pipes().is_empty());
        assert_eq!(*game.bird(), Bird::new());
    }

    #[test]
    fn test_spawn_adds_whole_pair() {
        let mut game = Game::new(1);
        game.handle_events(&[InputEvent::SpawnPipe]);
        assert_eq!(game.pipes().len(), 2);
        let (top, bottom) = (&game.pipes()[0], &game.pipes()[1]);
        assert_eq!(top.orientation, Orientation::Inverted);
        assert_eq!(bottom.orientation, Orientation::Upward);
        assert_eq!(top.anchor_y, bottom.anchor_y - PIPE_GAP);
    }

    #[test]
    fn test_flap_then_gravity_in_one_frame() {
        let mut game = Game::new(1);
        game.step(&[]);
        game.step(&[InputEvent::Flap]);
        assert_eq!(game.bird().velocity, FLAP_STRENGTH + GRAVITY);
    }

    #[test]
    fn test_pipe_collision_ends_game() {
        let mut game = Game::new(1);
        game.bird.y = 100;
        // After one scroll step this sits at (40,0)-(90,600)
        game.pipes.push(Pipe::new(40 + PIPE_SPEED, 0, Orientation::Upward));
        game.update();
        assert!(game.bird.bounds().collides(&game.pipes[0].bounds()));
        assert_eq!(game.phase(), Phase::GameOver);
    }

    #[test]
    fn test_ceiling_ends_game() {
        let mut game = Game::new(1);
        crash(&mut game);
    }

    #[test]
    fn test_floor_ends_game() {
        let mut game = Game::new(1);
        game.bird.y = SCREEN_HEIGHT - BIRD_HEIGHT;
        game.update();
        assert_eq!(game.phase(), Phase::GameOver);
    }

    #[test]
    fn test_falls_to_floor_without_input() {
        let mut game = Game::new(1);
        let mut frames = 0;
        while game.phase() == Phase::Playing {
            game.step(&[]);
            frames += 1;
            assert!(frames < 1000);
        }
        assert!(game.bird().bounds().bottom() >= SCREEN_HEIGHT);
    }

    #[test]
    fn test_game_over_freezes_world() {
        let mut game = Game::new(1);
        game.handle_events(&[InputEvent::SpawnPipe]);
        crash(&mut game);
        let bird = game.bird().clone();
        let pipes = game.pipes().to_vec();
        game.step(&[InputEvent::Flap, InputEvent::SpawnPipe]);
        assert_eq!(*game.bird(), bird);
        assert_eq!(game.pipes(), &pipes[..]);
    }

    #[test]
    fn test_pair_scores_one_point() {
        let mut game = Game::new(1);
        let mut pair = PipePair::at(BIRD_START_Y + BIRD_HEIGHT / 2);
        pair.top.x = 2;
        pair.bottom.x = 2;
        game.add_pair(pair);

        game.update();
        assert_eq!(game.score_halves, 0, "right edge level with the bird");
        game.update();
        assert_eq!(game.score_halves, 2);
        assert_eq!(game.score(), 1);
        assert!(game.pipes().iter().all(|p| p.scored));

        game.update();
        assert_eq!(game.score(), 1);
        assert_eq!(game.phase(), Phase::Playing);
    }

    #[test]
    fn test_each_pipe_carries_its_own_half_point() {
        let mut game = Game::new(1);
        let mut pipe = Pipe::new(0, 500, Orientation::Upward);
        pipe.x = -2;
        game.pipes.push(pipe);
        game.update();
        assert_eq!(game.score_halves, 1);
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn test_off_screen_pipes_are_evicted() {
        let mut game = Game::new(1);
        game.handle_events(&[InputEvent::SpawnPipe]);
        for p in &mut game.pipes {
            p.x = -PIPE_WIDTH + 1;
        }
        game.bird.flap();
        game.update();
        assert!(game.pipes().is_empty());
    }

    #[test]
    fn test_restart_waits_for_hold() {
        let mut game = Game::new(1);
        crash(&mut game);
        game.step(&[InputEvent::Restart]);
        assert_eq!(game.phase(), Phase::GameOver);

        for _ in 0..GAME_OVER_HOLD_FRAMES {
            game.step(&[]);
        }
        game.step(&[InputEvent::Restart]);
        assert_eq!(game.phase(), Phase::Playing);
    }

    #[test]
    fn test_restart_resets_everything() {
        let mut game = Game::new(1);
        game.handle_events(&[InputEvent::SpawnPipe, InputEvent::SpawnPipe]);
        game.score_halves = 6;
        crash(&mut game);
        for _ in 0..GAME_OVER_HOLD_FRAMES {
            game.update();
        }

        game.handle_events(&[InputEvent::Restart]);
        assert_eq!(game.phase(), Phase::Playing);
        assert_eq!(game.score(), 0);
        assert!(game.pipes().is_empty());
        assert_eq!((game.bird().x, game.bird().y), (BIRD_START_X, BIRD_START_Y));
        assert_eq!(game.bird().velocity, 0.0);
    }

    #[test]
    fn test_restart_ignored_while_playing() {
        let mut game = Game::new(1);
        game.handle_events(&[InputEvent::SpawnPipe]);
        game.score_halves = 4;
        game.handle_events(&[InputEvent::Restart]);
        assert_eq!(game.score(), 2);
        assert_eq!(game.pipes().len(), 2);
    }

    #[test]
    fn test_repeated_restarts() {
        let mut game = Game::new(1);
        for _ in 0..50 {
            crash(&mut game);
            for _ in 0..GAME_OVER_HOLD_FRAMES {
                game.update();
            }
            game.handle_events(&[InputEvent::Restart]);
            assert_eq!(game.phase(), Phase::Playing);
        }
    }

    /// Frontend that replays scripted frames and records what was drawn
    #[derive(Default)]
    struct Script {
        frames: VecDeque<Vec<InputEvent>>,
        presented: usize,
        ticks: usize,
        new_rounds: usize,
        blits: Vec<(Image, i32, i32)>,
        texts: Vec<String>,
        dims: usize,
    }

    impl EventSource for Script {
        fn drain(&mut self, _phase: Phase, out: &mut Vec<InputEvent>) -> io::Result<()> {
            out.extend(self.frames.pop_front().unwrap_or_else(|| vec![InputEvent::Quit]));
            Ok(())
        }
    }

    impl Surface for Script {
        fn size(&self) -> (i32, i32) {
            (SCREEN_WIDTH, SCREEN_HEIGHT)
        }

        fn blit(&mut self, image: Image, x: i32, y: i32) {
            self.blits.push((image, x, y));
        }

        fn draw_text(&mut self, text: &str, _size: u32, _color: crate::surface::Rgb, _rect: Rect) {
            self.texts.push(text.to_string());
        }

        fn text_size(&self, text: &str, size: u32) -> (i32, i32) {
            (text.len() as i32 * size as i32 / 2, size as i32)
        }

        fn dim(&mut self) {
            self.dims += 1;
        }
    }

    impl Frontend for Script {
        fn present(&mut self) -> io::Result<()> {
            self.presented += 1;
            Ok(())
        }

        fn tick(&mut self, fps: u32) {
            assert_eq!(fps, FPS);
            self.ticks += 1;
        }

        fn new_round(&mut self) {
            self.new_rounds += 1;
        }
    }

    #[test]
    fn test_run_finishes_quit_frame() {
        let mut game = Game::new(1);
        let mut script = Script::default();
        script.frames.push_back(vec![InputEvent::SpawnPipe]);
        script.frames.push_back(vec![InputEvent::Flap, InputEvent::Quit]);

        run(&mut game, &mut script).unwrap();
        assert_eq!(script.ticks, 2);
        assert_eq!(script.presented, 2);
        // Flap was applied and the bird moved on the quit frame
        assert_eq!(game.bird().velocity, FLAP_STRENGTH + GRAVITY);
        assert_eq!(script.texts.last().map(String::as_str), Some("SCORE: 0"));
    }

    #[test]
    fn test_run_draws_sprites_and_overlay() {
        let mut game = Game::new(1);
        let mut script = Script::default();
        script.frames.push_back(vec![InputEvent::SpawnPipe]);
        run(&mut game, &mut script).unwrap();

        // Two frames: background, two pipes, bird each
        let pipes = script
            .blits
            .iter()
            .filter(|(image, _, _)| matches!(image, Image::Pipe(_)))
            .count();
        assert_eq!(pipes, 4);
        assert!(matches!(script.blits[0].0, Image::Background { .. }));
        assert_eq!(script.dims, 0);
    }

    #[test]
    fn test_run_renders_game_over() {
        let mut game = Game::new(1);
        game.bird.y = 0;
        let mut script = Script::default();
        script.frames.push_back(vec![]);
        run(&mut game, &mut script).unwrap();

        assert_eq!(game.phase(), Phase::GameOver);
        assert_eq!(script.dims, 2);
        assert!(script.texts.iter().any(|t| t == "GAME OVER"));
        assert!(!script.texts.iter().any(|t| t == "SPACE TO RESTART"));
    }

    #[test]
    fn test_step_reports_restart_once() {
        let mut game = Game::new(1);
        crash(&mut game);
        assert_eq!(game.step(&[InputEvent::Restart]), Flow::Continue);
        for _ in 0..GAME_OVER_HOLD_FRAMES {
            game.step(&[]);
        }
        assert_eq!(game.step(&[InputEvent::Restart]), Flow::Restarted);
        assert_eq!(game.step(&[]), Flow::Continue);
    }

    #[test]
    fn test_run_starts_new_round_on_restart() {
        let mut game = Game::new(1);
        game.bird.y = 0;
        let mut script = Script::default();
        script.frames.push_back(vec![]);
        // Too early, still holding the game-over screen
        script.frames.push_back(vec![InputEvent::Restart]);
        for _ in 1..GAME_OVER_HOLD_FRAMES {
            script.frames.push_back(vec![]);
        }
        assert_eq!(script.new_rounds, 0);
        script.frames.push_back(vec![InputEvent::Restart]);
        run(&mut game, &mut script).unwrap();

        assert_eq!(script.new_rounds, 1);
        assert_eq!(game.phase(), Phase::Playing);
        assert!(game.pipes().is_empty());
    }

    proptest! {
        #[test]
        fn prop_velocity_law(flaps in proptest::collection::vec(any::<bool>(), 1..200)) {
            let mut game = Game::new(3);
            for flap in flaps {
                let before = game.bird().velocity;
                let events: &[InputEvent] = if flap { &[InputEvent::Flap] } else { &[] };
                game.step(events);
                let expected = if flap { FLAP_STRENGTH + GRAVITY } else { before + GRAVITY };
                prop_assert_eq!(game.bird().velocity, expected);
                if game.phase() == Phase::GameOver {
                    break;
                }
            }
        }

        #[test]
        fn prop_score_monotonic(
            seed in any::<u64>(),
            frames in proptest::collection::vec((any::<bool>(), 0u8..40), 1..600),
        ) {
            let mut game = Game::new(seed);
            let mut last = 0;
            let mut spawned = 0;
            for (flap, roll) in frames {
                let mut events = Vec::new();
                // Keep the bird roughly airborne
                if flap && game.bird().velocity > 0.0 {
                    events.push(InputEvent::Flap);
                }
                if roll == 0 {
                    events.push(InputEvent::SpawnPipe);
                    if game.phase() == Phase::Playing {
                        spawned += 1;
                    }
                }
                game.handle_events(&events);
                let scored_before: Vec<bool> = game.pipes().iter().map(|p| p.scored).collect();
                game.update();

                prop_assert!(game.score_halves >= last);
                prop_assert!(game.score() <= spawned);
                last = game.score_halves;

                // Updates only evict, and always the oldest pipes first
                let evicted = scored_before.len().saturating_sub(game.pipes().len());
                for (pipe, was) in game.pipes().iter().zip(scored_before.iter().skip(evicted)) {
                    prop_assert!(pipe.scored || !*was);
                }
            }
        }
    }
}
