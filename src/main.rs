use anyhow::Context;
use log::{error, info};

use flappy_term::game::{self, Game};
use flappy_term::term::Terminal;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut term = match Terminal::start() {
        Ok(term) => term,
        Err(e) => {
            error!("startup failed: {e}");
            return Err(e).context("could not start the game");
        }
    };

    let seed: u64 = rand::random();
    info!("starting, seed {seed}");
    let mut game = Game::new(seed);

    let result = game::run(&mut game, &mut term);
    // Restore the terminal before anything is printed
    term.shutdown().context("failed to restore the terminal")?;
    result.context("frame loop failed")?;
    Ok(())
}
