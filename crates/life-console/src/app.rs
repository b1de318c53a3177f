//! Frame loop tying the engine to a renderer.

use crate::command::Command;
use crate::renderer::Renderer;
use life_engine::GameOfLife;
use rand_chacha::ChaCha8Rng;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, info, instrument, warn};

/// Whether the loop keeps going after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

pub struct App<R: Renderer> {
    game: GameOfLife,
    renderer: R,
    rng: ChaCha8Rng,
    paused: bool,
    stop_when_settled: bool,
}

impl<R: Renderer> App<R> {
    pub fn new(game: GameOfLife, renderer: R, rng: ChaCha8Rng) -> Self {
        Self {
            game,
            renderer,
            rng,
            paused: false,
            stop_when_settled: true,
        }
    }

    pub fn paused(mut self, paused: bool) -> Self {
        self.paused = paused;
        self
    }

    pub fn stop_when_settled(mut self, stop: bool) -> Self {
        self.stop_when_settled = stop;
        self
    }

    pub fn game(&self) -> &GameOfLife {
        &self.game
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Apply one command. Persistence failures are logged and the loop goes on.
    pub fn apply(&mut self, command: Command) -> Flow {
        match command {
            Command::Quit => return Flow::Stop,
            Command::TogglePause => {
                self.paused = !self.paused;
                info!(paused = self.paused, "Pause toggled");
            }
            Command::Toggle(pos) if self.paused => {
                if let Err(e) = self.game.toggle(pos) {
                    warn!("Cannot toggle cell: {}", e);
                }
            }
            Command::Toggle(pos) => {
                debug!(%pos, "Ignoring toggle while running");
            }
            Command::Randomize => self.game.randomize(&mut self.rng),
            Command::Save(path) => {
                if let Err(e) = self.game.save(&path) {
                    warn!("Failed to save grid to {:?}: {}", path, e);
                }
            }
            Command::Load(path) => match GameOfLife::from_file(&path)
                .and_then(|game| game.with_max_generations(self.game.max_generations()))
            {
                Ok(game) => self.game = game,
                Err(e) => warn!("Failed to load grid from {:?}: {}", path, e),
            },
        }
        Flow::Continue
    }

    /// Handle pending input, advance once unless paused, then draw.
    pub fn frame(&mut self) -> life_core::Result<Flow> {
        for command in self.renderer.handle_input() {
            if self.apply(command) == Flow::Stop {
                return Ok(Flow::Stop);
            }
        }

        if !self.paused {
            self.game.step();
        }
        self.renderer.render(&self.game, self.paused)?;

        if self.paused {
            return Ok(Flow::Continue);
        }
        if self.game.is_max_generations_exceeded() {
            info!(generation = self.game.generations(), "Stopping at generation cap");
            return Ok(Flow::Stop);
        }
        if self.stop_when_settled && !self.game.is_changing() {
            info!(generation = self.game.generations(), "Stopping on settled grid");
            return Ok(Flow::Stop);
        }
        Ok(Flow::Continue)
    }

    /// Run frames every `tick` until a stop condition or Ctrl-C
    #[instrument(skip(self))]
    pub async fn run(mut self, tick: Duration) -> life_core::Result<GameOfLife> {
        let mut ticker = interval(tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if self.frame()? == Flow::Stop {
                        break;
                    }
                }
                _ = &mut ctrl_c => {
                    info!("Shutdown signal received");
                    break;
                }
            }
        }

        Ok(self.game)
    }
}
