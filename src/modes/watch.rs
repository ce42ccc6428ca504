//! Watch an agent play
//!
//! The selected policy plays game after game in the TUI. A Q-learning agent
//! keeps learning and saves its model after every game.
//!
//! # Controls
//!
//! - Space: Pause/unpause
//! - R: Reset game
//! - 1-4: Speed control (1=slow, 2=normal, 3=fast, 4=very fast)
//! - Q/Esc: Quit

use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::{Duration, Instant};
use tokio::time::{Interval, interval};

use super::autoplay::AutoplayPolicy;
use crate::game::{GameConfig, GameState, HighScoreStore};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::{AgentPanel, Renderer};

/// Playback speed settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchSpeed {
    /// 2 moves per second
    Slow,
    /// 8 moves per second
    Normal,
    /// 20 moves per second
    Fast,
    /// One move per frame
    VeryFast,
}

impl WatchSpeed {
    fn tick_interval(&self) -> Duration {
        match self {
            Self::Slow => Duration::from_millis(500),
            Self::Normal => Duration::from_millis(125),
            Self::Fast => Duration::from_millis(50),
            Self::VeryFast => Duration::from_millis(16),
        }
    }

    fn from_key(level: u8) -> Option<Self> {
        match level {
            1 => Some(Self::Slow),
            2 => Some(Self::Normal),
            3 => Some(Self::Fast),
            4 => Some(Self::VeryFast),
            _ => None,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Slow => "Slow",
            Self::Normal => "Normal",
            Self::Fast => "Fast",
            Self::VeryFast => "Very Fast",
        }
    }
}

pub struct WatchMode {
    state: GameState,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    policy: AutoplayPolicy,
    should_quit: bool,
    paused: bool,
    speed: WatchSpeed,
    episode_count: usize,
    warning: Option<String>,
}

impl WatchMode {
    pub fn new(config: GameConfig, high_scores: HighScoreStore, policy: AutoplayPolicy) -> Self {
        Self {
            state: GameState::new(config, high_scores),
            metrics: GameMetrics::new(),
            renderer: Renderer::for_watch(),
            input_handler: InputHandler::new(),
            policy,
            should_quit: false,
            paused: false,
            speed: WatchSpeed::Normal,
            episode_count: 1,
            warning: None,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        let result = self.run_watch_loop(&mut terminal).await;

        self.cleanup_terminal(&mut terminal)?;

        if let Some(warning) = &self.warning {
            eprintln!("Warning: {warning}");
        }
        println!(
            "Watched {} game(s) with the {} policy. Best score: {}",
            self.metrics.games_played,
            self.policy.name(),
            self.metrics.session_best
        );

        result
    }

    async fn run_watch_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // Agent moves based on speed
        let mut tick_timer = interval(self.speed.tick_interval());

        let mut frame_timer = interval(Duration::from_millis(16));
        let mut last_frame = Instant::now();

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event, &mut tick_timer);
                    }
                }

                _ = tick_timer.tick() => {
                    if !self.paused {
                        self.tick();
                    }
                }

                _ = frame_timer.tick() => {
                    let now = Instant::now();
                    let dt = now.duration_since(last_frame).as_secs_f32();
                    last_frame = now;

                    self.state.update(dt);
                    self.metrics.update();
                    let panel = self.panel();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &self.state, &self.metrics, Some(&panel));
                    }).context("Failed to draw frame")?;
                }

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

    /// One agent step. Faster speeds cut the animations short.
    fn tick(&mut self) {
        if self.state.is_animating() {
            self.state.settle();
        }

        if self.state.game_over {
            self.finish_game();
            self.restart();
        } else if self.state.awaiting_continue() {
            self.state.continue_game();
        } else {
            self.policy.step(&mut self.state);
        }
    }

    fn finish_game(&mut self) {
        self.metrics.on_game_over(self.state.score, self.state.best_tile);
        if let Some(warning) = self
            .policy
            .finish_game(self.state.score, self.state.best_tile)
        {
            self.warning = Some(warning);
        }
    }

    fn restart(&mut self) {
        self.state.reset();
        self.metrics.on_game_start();
        self.episode_count += 1;
    }

    fn handle_event(&mut self, event: Event, tick_timer: &mut Interval) {
        let Event::Key(key) = event else {
            return;
        };
        if key.kind != KeyEventKind::Press {
            return;
        }

        match self.input_handler.handle_key_event(key) {
            KeyAction::Quit => self.should_quit = true,
            KeyAction::TogglePause => self.paused = !self.paused,
            // Abandoned games are not fed to the agent
            KeyAction::Restart => self.restart(),
            KeyAction::Speed(level) => {
                if let Some(speed) = WatchSpeed::from_key(level) {
                    self.change_speed(speed, tick_timer);
                }
            }
            _ => {}
        }
    }

    fn change_speed(&mut self, new_speed: WatchSpeed, tick_timer: &mut Interval) {
        self.speed = new_speed;
        tick_timer.reset_after(self.speed.tick_interval());
    }

    fn panel(&self) -> AgentPanel {
        let mut panel = self
            .policy
            .panel()
            .entry("Game", self.episode_count)
            .entry("Avg score", format!("{:.0}", self.metrics.average_score()))
            .entry("Speed", self.speed.as_str());
        if self.paused {
            panel = panel.entry("Status", "PAUSED");
        }
        if let Some(warning) = &self.warning {
            panel = panel.entry("Warning", warning);
        }
        panel
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
