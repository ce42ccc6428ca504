use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::game::{Cell, GameState, TileSlide, GRID_SIZE};
use crate::metrics::GameMetrics;

const CELL_WIDTH: usize = 8;
const CELL_HEIGHT: usize = 3;
const GAP: usize = 1;

/// Board size in terminal cells, without the surrounding border
pub const BOARD_WIDTH: usize = GRID_SIZE * (CELL_WIDTH + GAP) + GAP;
pub const BOARD_HEIGHT: usize = GRID_SIZE * (CELL_HEIGHT + GAP) + GAP;

const BACKGROUND: Color = Color::Rgb(187, 173, 160);
const EMPTY_CELL: Color = Color::Rgb(205, 193, 180);
const TEXT_DARK: Color = Color::Rgb(119, 110, 101);
const TEXT_BRIGHT: Color = Color::Rgb(249, 246, 242);

const HUMAN_CONTROLS: &[(&str, &str)] = &[
    ("↑↓←→/WASD", "move"),
    ("C", "continue"),
    ("I", "autoplay"),
    ("R", "restart"),
    ("Q", "quit"),
];

const WATCH_CONTROLS: &[(&str, &str)] = &[
    ("Space", "pause"),
    ("1-4", "speed"),
    ("R", "restart"),
    ("Q", "quit"),
];

/// Background and text color for a tile value
pub fn tile_colors(value: u32) -> (Color, Color) {
    let background = match value {
        0 => EMPTY_CELL,
        2 => Color::Rgb(238, 228, 218),
        4 => Color::Rgb(237, 224, 200),
        8 => Color::Rgb(242, 177, 121),
        16 => Color::Rgb(245, 149, 99),
        32 => Color::Rgb(246, 124, 95),
        64 => Color::Rgb(246, 94, 59),
        128 => Color::Rgb(237, 207, 114),
        256 => Color::Rgb(237, 204, 97),
        512 => Color::Rgb(237, 200, 80),
        1024 => Color::Rgb(237, 197, 63),
        2048 => Color::Rgb(237, 194, 46),
        4096 => Color::Rgb(114, 177, 237),
        8192 => Color::Rgb(97, 204, 237),
        16384 => Color::Rgb(80, 200, 237),
        32768 => Color::Rgb(63, 197, 237),
        65536 => Color::Rgb(46, 194, 237),
        _ => Color::Rgb(237, 194, 46),
    };
    let text = if value <= 4 { TEXT_DARK } else { TEXT_BRIGHT };
    (background, text)
}

/// Extra information shown beside the board in autoplay modes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgentPanel {
    pub title: String,
    pub entries: Vec<(String, String)>,
}

impl AgentPanel {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            entries: Vec::new(),
        }
    }

    pub fn entry(mut self, label: impl Into<String>, value: impl ToString) -> Self {
        self.entries.push((label.into(), value.to_string()));
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Glyph {
    ch: char,
    fg: Color,
    bg: Color,
    bold: bool,
}

/// Character grid the board is painted into before it becomes ratatui lines
#[derive(Debug, Clone)]
struct Canvas {
    glyphs: Vec<Vec<Glyph>>,
}

impl Canvas {
    fn new() -> Self {
        let blank = Glyph {
            ch: ' ',
            fg: TEXT_DARK,
            bg: BACKGROUND,
            bold: false,
        };
        Self {
            glyphs: vec![vec![blank; BOARD_WIDTH]; BOARD_HEIGHT],
        }
    }

    fn glyph_mut(&mut self, row: i32, col: i32) -> Option<&mut Glyph> {
        if row < 0 || col < 0 {
            return None;
        }
        self.glyphs
            .get_mut(row as usize)
            .and_then(|line| line.get_mut(col as usize))
    }

    /// Fill a rectangle, clipped to the canvas
    fn fill(&mut self, top: i32, left: i32, height: i32, width: i32, bg: Color) {
        for row in top..top + height {
            for col in left..left + width {
                if let Some(glyph) = self.glyph_mut(row, col) {
                    *glyph = Glyph {
                        ch: ' ',
                        fg: TEXT_DARK,
                        bg,
                        bold: false,
                    };
                }
            }
        }
    }

    /// Write `text` over the existing background
    fn text(&mut self, row: i32, left: i32, text: &str, fg: Color, bold: bool) {
        for (offset, ch) in text.chars().enumerate() {
            if let Some(glyph) = self.glyph_mut(row, left + offset as i32) {
                glyph.ch = ch;
                glyph.fg = fg;
                glyph.bold = bold;
            }
        }
    }

    #[cfg(test)]
    fn row_text(&self, row: usize) -> String {
        self.glyphs[row].iter().map(|g| g.ch).collect()
    }

    /// Merge runs of identically styled glyphs into spans
    fn into_lines(self) -> Vec<Line<'static>> {
        self.glyphs
            .into_iter()
            .map(|row| {
                let mut spans = Vec::new();
                let mut run = String::new();
                let mut style: Option<Style> = None;
                for glyph in row {
                    let mut glyph_style = Style::default().fg(glyph.fg).bg(glyph.bg);
                    if glyph.bold {
                        glyph_style = glyph_style.add_modifier(Modifier::BOLD);
                    }
                    if style.is_some_and(|s| s != glyph_style) {
                        spans.push(Span::styled(std::mem::take(&mut run), style.unwrap_or_default()));
                    }
                    style = Some(glyph_style);
                    run.push(glyph.ch);
                }
                if let Some(style) = style {
                    spans.push(Span::styled(run, style));
                }
                Line::from(spans)
            })
            .collect()
    }
}

/// Top-left canvas position of a grid cell
fn cell_origin((row, col): Cell) -> (f32, f32) {
    (
        (GAP + row * (CELL_HEIGHT + GAP)) as f32,
        (GAP + col * (CELL_WIDTH + GAP)) as f32,
    )
}

/// Draw a tile whose unscaled top-left corner is `(top, left)`.
/// `scale` grows or shrinks it around its center.
fn draw_tile(canvas: &mut Canvas, (top, left): (f32, f32), value: u32, scale: f32, bold: bool) {
    let width = ((CELL_WIDTH as f32 * scale).round() as i32).max(1);
    let height = ((CELL_HEIGHT as f32 * scale).round() as i32).max(1);
    let center_row = top + CELL_HEIGHT as f32 / 2.0;
    let center_col = left + CELL_WIDTH as f32 / 2.0;
    let tile_top = (center_row - height as f32 / 2.0).round() as i32;
    let tile_left = (center_col - width as f32 / 2.0).round() as i32;

    let (bg, fg) = tile_colors(value);
    canvas.fill(tile_top, tile_left, height, width, bg);

    let label = value.to_string();
    let len = label.len() as i32;
    if scale >= 0.5 && width >= len {
        canvas.text(tile_top + height / 2, tile_left + (width - len) / 2, &label, fg, bold);
    }
}

/// Paint the board for the current frame, including slide, merge pulse and
/// spawn animations
fn compose_board(state: &GameState) -> Canvas {
    let mut canvas = Canvas::new();
    for row in 0..GRID_SIZE {
        for col in 0..GRID_SIZE {
            let (top, left) = cell_origin((row, col));
            canvas.fill(top as i32, left as i32, CELL_HEIGHT as i32, CELL_WIDTH as i32, EMPTY_CELL);
        }
    }

    if let Some(anim) = state.move_animation() {
        let t = anim.progress(state.config().move_animation_secs);
        // Stationary tiles first so sliding ones pass over them
        let (still, moving): (Vec<&TileSlide>, Vec<&TileSlide>) =
            anim.slides.iter().partition(|s| s.from == s.to);
        for slide in still.into_iter().chain(moving) {
            let (from_top, from_left) = cell_origin(slide.from);
            let (to_top, to_left) = cell_origin(slide.to);
            let position = (
                from_top + (to_top - from_top) * t,
                from_left + (to_left - from_left) * t,
            );
            draw_tile(&mut canvas, position, slide.value, 1.0, false);
        }
        return canvas;
    }

    let pulse = state.merge_pulse();
    let mut pulsing = Vec::new();
    for row in 0..GRID_SIZE {
        for col in 0..GRID_SIZE {
            let cell = (row, col);
            let value = state.grid.get(cell);
            if value == 0 {
                continue;
            }
            if pulse.is_some_and(|p| p.contains(cell)) {
                pulsing.push(cell);
                continue;
            }
            let scale = state.spawn_scale(cell).unwrap_or(1.0);
            draw_tile(&mut canvas, cell_origin(cell), value, scale, false);
        }
    }
    if let Some(pulse) = pulse {
        for cell in pulsing {
            draw_tile(&mut canvas, cell_origin(cell), state.grid.get(cell), pulse.scale, true);
        }
    }
    canvas
}

/// Rectangle of at most `width` x `height` centered in `area`
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

pub struct Renderer {
    controls: &'static [(&'static str, &'static str)],
}

impl Renderer {
    /// Renderer with the interactive play controls
    pub fn new() -> Self {
        Self {
            controls: HUMAN_CONTROLS,
        }
    }

    /// Renderer with the playback controls of watch mode
    pub fn for_watch() -> Self {
        Self {
            controls: WATCH_CONTROLS,
        }
    }

    pub fn render(
        &self,
        frame: &mut Frame,
        state: &GameState,
        metrics: &GameMetrics,
        panel: Option<&AgentPanel>,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(state, metrics), chunks[0]);

        let (board_area, panel_area) = match panel {
            Some(_) => {
                let columns = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Min(0), Constraint::Length(30)])
                    .split(chunks[1]);
                (columns[0], Some(columns[1]))
            }
            None => (chunks[1], None),
        };

        let board_rect = centered_rect(
            BOARD_WIDTH as u16 + 2,
            BOARD_HEIGHT as u16 + 2,
            board_area,
        );
        frame.render_widget(self.render_board(state), board_rect);

        if state.game_over {
            self.render_overlay(frame, board_rect, self.game_over_text(state), Color::Red);
        } else if state.awaiting_continue() {
            self.render_overlay(frame, board_rect, self.win_text(state), Color::Yellow);
        }

        if let (Some(panel), Some(area)) = (panel, panel_area) {
            frame.render_widget(self.render_panel(panel), area);
        }

        frame.render_widget(self.render_footer(state), chunks[2]);
    }

    fn render_board(&self, state: &GameState) -> Paragraph<'static> {
        Paragraph::new(compose_board(state).into_lines()).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BACKGROUND))
                .title(" 2048 "),
        )
    }

    fn render_stats(&self, state: &GameState, metrics: &GameMetrics) -> Paragraph<'static> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);
        let text = vec![
            Line::from(""),
            Line::from(vec![
                Span::styled("Score: ", label),
                Span::styled(state.score.to_string(), value),
                Span::raw("    "),
                Span::styled("Best: ", label),
                Span::styled(state.high_score.to_string(), value),
                Span::raw("    "),
                Span::styled("Best tile: ", label),
                Span::styled(state.best_tile.to_string(), value),
                Span::raw("    "),
                Span::styled("Moves: ", label),
                Span::styled(state.moves.to_string(), Style::default().fg(Color::White)),
                Span::raw("    "),
                Span::styled("Time: ", label),
                Span::styled(metrics.format_time(), Style::default().fg(Color::White)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn game_over_text(&self, state: &GameState) -> Vec<Line<'static>> {
        vec![
            Line::from(Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    state.score.to_string(),
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled("R", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
                Span::styled(" to restart", Style::default().fg(Color::Gray)),
            ]),
        ]
    }

    fn win_text(&self, state: &GameState) -> Vec<Line<'static>> {
        vec![
            Line::from(Span::styled(
                format!("{} reached!", state.config().win_tile),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("C", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
                Span::styled(" continue  ", Style::default().fg(Color::Gray)),
                Span::styled("R", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
                Span::styled(" restart", Style::default().fg(Color::Gray)),
            ]),
        ]
    }

    fn render_overlay(&self, frame: &mut Frame, board: Rect, text: Vec<Line<'static>>, color: Color) {
        let area = centered_rect(28, text.len() as u16 + 2, board);
        frame.render_widget(Clear, area);
        frame.render_widget(
            Paragraph::new(text).alignment(Alignment::Center).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color)),
            ),
            area,
        );
    }

    fn render_panel(&self, panel: &AgentPanel) -> Paragraph<'static> {
        let lines: Vec<Line<'static>> = panel
            .entries
            .iter()
            .map(|(label, value)| {
                Line::from(vec![
                    Span::styled(format!("{label}: "), Style::default().fg(Color::Yellow)),
                    Span::styled(value.clone(), Style::default().fg(Color::White)),
                ])
            })
            .collect();

        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(format!(" {} ", panel.title)),
        )
    }

    fn render_footer(&self, state: &GameState) -> Paragraph<'static> {
        let mut spans = Vec::new();
        for (i, (key, action)) in self.controls.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" | "));
            }
            spans.push(Span::styled(*key, Style::default().fg(Color::Cyan)));
            spans.push(Span::raw(format!(" {action}")));
        }

        let mut lines = vec![Line::from(spans)];
        if let Some(err) = state.last_save_error() {
            lines.push(Line::from(Span::styled(
                format!("Warning: high score not saved: {err}"),
                Style::default().fg(Color::Red),
            )));
        }

        Paragraph::new(lines).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
