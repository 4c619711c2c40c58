use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use log::{debug, info};
use rand::Rng;
use rand::rngs::ThreadRng;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::{Duration, Instant};
use tokio::time::interval;

use crate::game::{GameConfig, GameEngine, GameState, Phase, RenderFrame};
use crate::input::{InputBuffer, InputHandler, KeyAction};
use crate::metrics::SessionStats;
use crate::render::Renderer;

/// Redraw period, independent of the game tick
const RENDER_INTERVAL: Duration = Duration::from_millis(33);

pub struct HumanMode<R = ThreadRng> {
    engine: GameEngine<R>,
    state: GameState,
    frame: RenderFrame,
    stats: SessionStats,
    renderer: Renderer,
    input_handler: InputHandler,
    input: InputBuffer,
    /// When the help overlay was opened, while it is shown
    help_opened: Option<Instant>,
    should_quit: bool,
}

impl HumanMode<ThreadRng> {
    pub fn new(config: GameConfig) -> Result<Self> {
        let engine = GameEngine::new(config).context("Cannot start a round")?;
        Self::with_engine(engine)
    }
}

impl<R: Rng> HumanMode<R> {
    pub fn with_engine(mut engine: GameEngine<R>) -> Result<Self> {
        let now = Instant::now();
        let state = engine.reset().context("Cannot start a round")?;

        Ok(Self {
            frame: RenderFrame::capture(&state, now),
            engine,
            state,
            stats: SessionStats::new(now),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            input: InputBuffer::new(),
            help_opened: None,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        info!(
            "Session over: {} rounds, high score {}, longest snake {}",
            self.stats.rounds_played, self.stats.high_score, self.stats.longest_snake
        );

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        let mut tick_timer = interval(self.engine.config().tick_interval());
        let mut render_timer = interval(RENDER_INTERVAL);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event)?,
                        Some(Err(err)) => return Err(err).context("Failed to read terminal event"),
                        None => self.should_quit = true,
                    }
                }

                // Game logic tick
                _ = tick_timer.tick() => {
                    self.update_game(Instant::now());
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.stats.update(Instant::now());
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &self.frame, &self.stats, self.help_opened.is_some());
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> Result<()> {
        let key = match event {
            Event::Key(key) => key,
            Event::Resize(cols, rows) => {
                debug!("Terminal resized to {}x{}, grid unchanged", cols, rows);
                return Ok(());
            }
            _ => return Ok(()),
        };

        // Only process key press events, not release
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        match self.input_handler.handle_key_event(key) {
            action @ (KeyAction::Turn(_) | KeyAction::TogglePause) => {
                // The help screen holds the round still
                if self.help_opened.is_none() {
                    self.input.push(action);
                }
            }
            KeyAction::ToggleHelp => {
                self.toggle_help(Instant::now());
            }
            KeyAction::Restart => {
                self.reset_game(Instant::now())?;
            }
            KeyAction::Quit => {
                self.should_quit = true;
            }
            KeyAction::None => {}
        }

        Ok(())
    }

    /// Open or close the help overlay. The round is frozen while it is shown,
    /// bonus window and round clock included.
    fn toggle_help(&mut self, now: Instant) {
        match self.help_opened.take() {
            None => {
                self.help_opened = Some(now);
                if self.state.is_playing() {
                    self.stats.set_paused(true, now);
                }
            }
            Some(opened) => {
                // A paused round shifts its bonus on resume instead
                if self.state.is_playing() {
                    self.state.bonus.postpone(now.saturating_duration_since(opened));
                    self.stats.set_paused(false, now);
                }
            }
        }
    }

    fn update_game(&mut self, now: Instant) {
        if self.help_opened.is_some() {
            return;
        }

        let was_over = self.state.is_over();
        let input = self.input.next_tick();
        let result = self.engine.step(&mut self.state, input, now);

        if result.terminated {
            if !was_over {
                let (score, len) = (self.state.score, self.state.snake.len());
                self.stats.on_round_over(score, len, now);
            }
        } else {
            self.stats.set_paused(self.state.phase == Phase::Paused, now);
        }

        self.frame = result.frame;
    }

    fn reset_game(&mut self, now: Instant) -> Result<()> {
        if !self.state.is_over() {
            info!("Round abandoned at score {}", self.state.score);
        }

        self.state = self.engine.reset().context("Cannot start a round")?;
        self.frame = RenderFrame::capture(&self.state, now);
        self.stats.on_round_start(now);
        self.input.clear();
        self.help_opened = None;
        Ok(())
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
