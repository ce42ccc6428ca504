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
use tokio::time::interval;

use super::autoplay::AutoplayPolicy;
use crate::game::{GameConfig, GameState, HighScoreStore};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::Renderer;

/// Delay between autoplay moves
const AUTOPLAY_INTERVAL: Duration = Duration::from_millis(100);

pub struct HumanMode {
    state: GameState,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    policy: AutoplayPolicy,
    autoplay: bool,
    game_recorded: bool,
    warning: Option<String>,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(config: GameConfig, high_scores: HighScoreStore, policy: AutoplayPolicy) -> Self {
        Self {
            state: GameState::new(config, high_scores),
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            policy,
            autoplay: false,
            game_recorded: false,
            warning: None,
            should_quit: false,
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

        let result = self.run_game_loop(&mut terminal).await;

        self.cleanup_terminal(&mut terminal)?;

        // Safe to print once the alternate screen is gone
        if let Some(warning) = &self.warning {
            eprintln!("Warning: {warning}");
        }

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // Animations and drawing at ~60 FPS
        let mut frame_timer = interval(Duration::from_millis(16));
        let mut autoplay_timer = interval(AUTOPLAY_INTERVAL);
        let mut last_frame = Instant::now();

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event);
                    }
                }

                _ = autoplay_timer.tick() => {
                    if self.autoplay {
                        self.autoplay_move();
                    }
                }

                _ = frame_timer.tick() => {
                    let now = Instant::now();
                    let dt = now.duration_since(last_frame).as_secs_f32();
                    last_frame = now;

                    self.advance(dt);
                    self.metrics.update();
                    let panel = self.autoplay.then(|| self.policy.panel());
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &self.state, &self.metrics, panel.as_ref());
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

    fn handle_event(&mut self, event: Event) {
        let Event::Key(key) = event else {
            return;
        };
        // Only process key press events, not release
        if key.kind != KeyEventKind::Press {
            return;
        }

        match self.input_handler.handle_key_event(key) {
            KeyAction::Move(direction) => {
                self.state.apply_move(direction);
            }
            KeyAction::Restart => self.reset_game(),
            KeyAction::Continue => self.state.continue_game(),
            KeyAction::ToggleAutoplay => self.autoplay = !self.autoplay,
            KeyAction::Quit => self.should_quit = true,
            KeyAction::TogglePause | KeyAction::Speed(_) | KeyAction::None => {}
        }
    }

    /// Advance animations and record the game once it ends
    fn advance(&mut self, dt: f32) {
        self.state.update(dt);

        if self.state.game_over && !self.game_recorded {
            self.game_recorded = true;
            self.metrics.on_game_over(self.state.score, self.state.best_tile);
            if self.autoplay {
                if let Some(warning) = self
                    .policy
                    .finish_game(self.state.score, self.state.best_tile)
                {
                    self.warning = Some(warning);
                }
            }
        }
    }

    fn autoplay_move(&mut self) {
        if self.state.is_animating() || !self.state.accepts_moves() {
            return;
        }
        self.policy.step(&mut self.state);
    }

    fn reset_game(&mut self) {
        self.state.reset();
        self.metrics.on_game_start();
        self.game_recorded = false;
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, Grid};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn mode() -> HumanMode {
        HumanMode::new(
            GameConfig::instant(),
            HighScoreStore::in_memory(),
            AutoplayPolicy::heuristic(),
        )
    }

    fn press(mode: &mut HumanMode, code: KeyCode) {
        mode.handle_event(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)));
    }

    #[test]
    fn test_game_initialization() {
        let mode = mode();
        assert_eq!(mode.state.grid.tile_count(), 2);
        assert_eq!(mode.state.score, 0);
        assert!(!mode.autoplay);
    }

    #[test]
    fn test_arrow_key_moves() {
        let mut mode = mode();
        mode.state.grid = Grid::from_rows([
            [0, 0, 0, 2],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
        ]);
        press(&mut mode, KeyCode::Left);
        assert_eq!(mode.state.moves, 1);
        assert_eq!(mode.state.grid.get((0, 0)), 2);

        mode.advance(0.0);
        assert_eq!(mode.state.grid.tile_count(), 2);
    }

    #[test]
    fn test_toggle_autoplay() {
        let mut mode = mode();
        press(&mut mode, KeyCode::Char('i'));
        assert!(mode.autoplay);

        mode.autoplay_move();
        assert_eq!(mode.state.moves, 1);

        press(&mut mode, KeyCode::Char('i'));
        assert!(!mode.autoplay);
    }

    #[test]
    fn test_continue_after_win() {
        let mut mode = HumanMode::new(
            GameConfig::with_win_tile(8),
            HighScoreStore::in_memory(),
            AutoplayPolicy::heuristic(),
        );
        mode.state.grid = Grid::from_rows([
            [4, 4, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
        ]);
        press(&mut mode, KeyCode::Char('a'));
        mode.state.settle();
        assert!(mode.state.awaiting_continue());

        press(&mut mode, KeyCode::Char('c'));
        assert!(mode.state.accepts_moves());
    }

    #[test]
    fn test_game_over_recorded_once() {
        let mut mode = mode();
        mode.state.grid = Grid::from_rows([
            [8, 16, 8, 16],
            [16, 8, 16, 8],
            [8, 16, 8, 16],
            [0, 32, 64, 128],
        ]);
        assert!(mode.state.apply_move(Direction::Left));
        mode.advance(0.0);
        assert!(mode.state.game_over);
        mode.advance(0.1);
        assert_eq!(mode.metrics.games_played, 1);

        press(&mut mode, KeyCode::Char('r'));
        assert!(!mode.state.game_over);
        assert!(!mode.game_recorded);
    }

    #[test]
    fn test_quit_key() {
        let mut mode = mode();
        press(&mut mode, KeyCode::Char('q'));
        assert!(mode.should_quit);
    }
}
