//! Line-based play on stdin/stdout
//!
//! Each line is one command: `w`/`a`/`s`/`d` (or `up`, `left`, ...) to move,
//! `r` to restart, `c` to continue after a win and `q` to quit. The grid is
//! printed as text after every command.

use anyhow::{Context, Result};
use std::io::{BufRead, Write};

use crate::game::{Direction, GameConfig, GameState, HighScoreStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Move(Direction),
    Restart,
    Continue,
    Quit,
}

fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    match line.to_ascii_lowercase().as_str() {
        "" => Ok(None),
        "q" | "quit" => Ok(Some(Command::Quit)),
        "r" | "restart" => Ok(Some(Command::Restart)),
        "c" | "continue" => Ok(Some(Command::Continue)),
        _ => line
            .parse::<Direction>()
            .map(|direction| Some(Command::Move(direction)))
            .map_err(|e| e.to_string()),
    }
}

pub struct ConsoleMode {
    state: GameState,
}

impl ConsoleMode {
    pub fn new(config: GameConfig, high_scores: HighScoreStore) -> Self {
        Self {
            state: GameState::new(config, high_scores),
        }
    }

    pub fn with_state(state: GameState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Play until `q` or end of input
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut out: W) -> Result<()> {
        writeln!(out, "2048 - W/A/S/D to move, R restart, C continue, Q quit")?;
        self.print_board(&mut out)?;

        for line in input.lines() {
            let line = line.context("Failed to read command")?;
            let command = match parse_command(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(message) => {
                    writeln!(out, "{message}")?;
                    continue;
                }
            };

            match command {
                Command::Quit => break,
                Command::Restart => self.state.reset(),
                Command::Continue => {
                    if !self.state.game_won {
                        writeln!(out, "Nothing to continue: the game is not won yet")?;
                        continue;
                    }
                    self.state.continue_game();
                }
                Command::Move(direction) => {
                    if !self.state.apply_move(direction) {
                        writeln!(out, "Cannot move {direction}")?;
                    }
                    self.state.settle();
                }
            }
            self.print_board(&mut out)?;
        }

        writeln!(
            out,
            "Final score: {} (best {})",
            self.state.score, self.state.high_score
        )?;
        Ok(())
    }

    fn print_board<W: Write>(&mut self, out: &mut W) -> Result<()> {
        writeln!(out, "{}", self.state.grid)?;
        writeln!(
            out,
            "Score: {}  Best: {}  Best tile: {}",
            self.state.score, self.state.high_score, self.state.best_tile
        )?;
        if let Some(err) = self.state.last_save_error() {
            writeln!(out, "Warning: high score not saved: {err}")?;
        }
        if self.state.game_over {
            writeln!(out, "Game over! Press R to restart.")?;
        } else if self.state.awaiting_continue() {
            writeln!(
                out,
                "You reached {}! Press C to continue or R to restart.",
                self.state.config().win_tile
            )?;
        }
        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Grid;

    fn console(grid: Grid, config: GameConfig) -> ConsoleMode {
        let mut state = GameState::with_seed(config, HighScoreStore::in_memory(), 21);
        state.grid = grid;
        ConsoleMode::with_state(state)
    }

    fn run(mode: &mut ConsoleMode, input: &str) -> String {
        let mut out = Vec::new();
        mode.run(input.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_parse_command() {
        assert_eq!(parse_command("w"), Ok(Some(Command::Move(Direction::Up))));
        assert_eq!(parse_command(" D \n"), Ok(Some(Command::Move(Direction::Right))));
        assert_eq!(parse_command("Q"), Ok(Some(Command::Quit)));
        assert_eq!(parse_command("r"), Ok(Some(Command::Restart)));
        assert_eq!(parse_command("c"), Ok(Some(Command::Continue)));
        assert_eq!(parse_command("   "), Ok(None));
        assert!(parse_command("x").is_err());
    }

    #[test]
    fn test_moves_and_prints_score() {
        let mut mode = console(
            Grid::from_rows([
                [2, 2, 0, 0],
                [0, 0, 0, 0],
                [0, 0, 0, 0],
                [0, 0, 0, 0],
            ]),
            GameConfig::default(),
        );

        let output = run(&mut mode, "a\nq\n");

        assert_eq!(mode.state().score, 4);
        assert_eq!(mode.state().grid.tile_count(), 2);
        assert!(output.contains("Score: 4"));
        assert!(output.contains("Final score: 4"));
    }

    #[test]
    fn test_invalid_command_is_reported() {
        let mut mode = console(Grid::from_rows([[2, 0, 0, 0]; 4]), GameConfig::default());

        let output = run(&mut mode, "x\nzz\n");

        assert!(output.contains("unknown direction 'x'"));
        assert!(output.contains("unknown direction 'zz'"));
        assert_eq!(mode.state().moves, 0);
    }

    #[test]
    fn test_blocked_move_is_reported() {
        let mut mode = console(
            Grid::from_rows([
                [2, 4, 0, 0],
                [0, 0, 0, 0],
                [0, 0, 0, 0],
                [0, 0, 0, 0],
            ]),
            GameConfig::default(),
        );

        let output = run(&mut mode, "a\n");

        assert!(output.contains("Cannot move left"));
        assert_eq!(mode.state().moves, 0);
    }

    #[test]
    fn test_win_and_continue() {
        let mut mode = console(
            Grid::from_rows([
                [4, 4, 0, 0],
                [0, 0, 0, 0],
                [0, 0, 0, 0],
                [0, 0, 0, 0],
            ]),
            GameConfig::with_win_tile(8),
        );

        let output = run(&mut mode, "c\na\nd\nc\nd\n");

        assert!(output.contains("Nothing to continue"));
        assert!(output.contains("You reached 8!"));
        assert!(output.contains("Cannot move right"));
        assert!(mode.state().continue_after_win);
        assert_eq!(mode.state().moves, 2);
    }

    #[test]
    fn test_restart() {
        let mut mode = console(Grid::from_rows([[2, 0, 0, 0]; 4]), GameConfig::default());
        mode.state.score = 100;

        run(&mut mode, "r\n");

        assert_eq!(mode.state().score, 0);
        assert_eq!(mode.state().grid.tile_count(), 2);
    }
}
