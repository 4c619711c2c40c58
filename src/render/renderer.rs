use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::game::{Phase, RenderFrame, RoundEnd};
use crate::metrics::SessionStats;

const FOOD_CHAR: char = '*';
const BONUS_FOOD_CHAR: char = '*';
const SEPARATOR_CHAR: char = '─';
const TIMER_FILLED: char = '█';
const TIMER_EMPTY: char = '░';

/// Columns left free on each side of the bonus timer bar
const TIMER_MARGIN: u16 = 2;

pub const HELP_TEXT: &[&str] = &[
    "Controls:",
    "  Arrow keys/WASD  Move",
    "  P/Space/Esc      Pause/Play",
    "  R/N              New game",
    "  H                Help",
    "  Q                Quit",
    "",
    "Gameplay:",
    "  Eat food (*) to grow.",
    "  Edges wrap around.",
    "  Every 5th food opens a bonus.",
    "  Eat it fast: its value drains",
    "  with the timer bar.",
];

/// A single character on the playfield
#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    symbol: char,
    style: Style,
}

impl Cell {
    const EMPTY: Cell = Cell {
        symbol: ' ',
        style: Style::new(),
    };
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(
        &self,
        frame: &mut Frame,
        view: &RenderFrame,
        stats: &SessionStats,
        show_help: bool,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),    // Game area
                Constraint::Length(1), // Separator or bonus timer
                Constraint::Length(1), // Status line
            ])
            .split(frame.area());

        frame.render_widget(self.render_grid(view), chunks[0]);
        frame.render_widget(self.render_separator(chunks[1], view), chunks[1]);
        self.render_status(frame, chunks[2], view, stats);

        if show_help {
            self.render_overlay(frame, chunks[0], " HELP ", help_lines(), Color::Cyan);
            return;
        }

        match view.phase {
            Phase::Playing => {}
            Phase::Paused => {
                let lines = vec![
                    Line::from(Span::styled(
                        "PAUSED",
                        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                    )),
                    Line::from(""),
                    Line::from(Span::styled(
                        "P/Space/Esc to resume",
                        Style::default().fg(Color::Gray),
                    )),
                ];
                self.render_overlay(frame, chunks[0], "", lines, Color::Cyan);
            }
            Phase::RoundOver(end) => {
                let lines = round_over_lines(end, view.score);
                self.render_overlay(frame, chunks[0], "", lines, Color::Red);
            }
        }
    }

    fn render_grid(&self, view: &RenderFrame) -> Paragraph<'static> {
        let lines: Vec<Line> = paint_cells(view)
            .into_iter()
            .map(|row| {
                Line::from(
                    row.into_iter()
                        .map(|cell| Span::styled(cell.symbol.to_string(), cell.style))
                        .collect::<Vec<_>>(),
                )
            })
            .collect();

        Paragraph::new(lines)
    }

    fn render_separator(&self, area: Rect, view: &RenderFrame) -> Paragraph<'static> {
        let line = match view.bonus_remaining {
            Some(remaining) => Line::from(vec![
                Span::raw(" ".repeat(TIMER_MARGIN as usize)),
                Span::styled(
                    timer_bar(area.width.saturating_sub(2 * TIMER_MARGIN), remaining),
                    Style::default().fg(Color::Blue),
                ),
            ]),
            None => Line::from(Span::styled(
                SEPARATOR_CHAR.to_string().repeat(area.width as usize),
                Style::default().fg(Color::White),
            )),
        };

        Paragraph::new(line)
    }

    fn render_status(
        &self,
        frame: &mut Frame,
        area: Rect,
        view: &RenderFrame,
        stats: &SessionStats,
    ) {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);

        let left = Line::from(vec![
            Span::raw(" "),
            Span::styled(
                format!("{:04}", view.score),
                value.add_modifier(Modifier::BOLD),
            ),
            Span::raw("   "),
            Span::styled("Lv ", label),
            Span::styled(view.level.to_string(), value),
            Span::raw("   "),
            Span::styled("Hi ", label),
            Span::styled(format!("{:04}", stats.high_score.max(view.score)), value),
            Span::raw("   "),
            Span::styled("Len ", label),
            Span::styled(view.snake_len().to_string(), value),
            Span::raw("   "),
            Span::styled(stats.format_time(), value),
        ]);

        let right = Line::from(vec![
            Span::styled("H", Style::default().fg(Color::Cyan)),
            Span::styled(" Help ", Style::default().fg(Color::Yellow)),
        ]);

        let halves = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(right.width() as u16)])
            .split(area);

        frame.render_widget(Paragraph::new(left), halves[0]);
        frame.render_widget(Paragraph::new(right).alignment(Alignment::Right), halves[1]);
    }

    fn render_overlay(
        &self,
        frame: &mut Frame,
        area: Rect,
        title: &'static str,
        lines: Vec<Line<'static>>,
        color: Color,
    ) {
        let width = lines.iter().map(|line| line.width()).max().unwrap_or(0) as u16 + 6;
        let height = lines.len() as u16 + 2;
        let popup = centered(area, width, height);

        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(lines).alignment(Alignment::Center).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(color))
                    .title(title),
            ),
            popup,
        );
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// The playfield as rows of styled characters
fn paint_cells(view: &RenderFrame) -> Vec<Vec<Cell>> {
    let height = view.bounds.height() as usize;
    let width = view.bounds.width() as usize;
    let mut cells = vec![vec![Cell::EMPTY; width]; height];

    let mut put = |row: i32, col: i32, cell: Cell| {
        let slot = usize::try_from(row)
            .ok()
            .zip(usize::try_from(col).ok())
            .and_then(|(r, c)| cells.get_mut(r).and_then(|line| line.get_mut(c)));
        if let Some(slot) = slot {
            *slot = cell;
        }
    };

    put(
        view.food.row,
        view.food.col,
        Cell {
            symbol: FOOD_CHAR,
            style: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        },
    );

    if let Some(bonus) = view.bonus_food {
        put(
            bonus.row,
            bonus.col,
            Cell {
                symbol: BONUS_FOOD_CHAR,
                style: Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            },
        );
    }

    // Draw tail first so the head wins if anything overlaps
    for (i, cell) in view.snake.iter().enumerate().rev() {
        let mut style = Style::default().fg(Color::Green);
        if i == 0 {
            style = style.add_modifier(Modifier::BOLD);
        }
        if matches!(view.phase, Phase::RoundOver(RoundEnd::SelfCollision)) {
            style = style.fg(Color::DarkGray);
        }
        put(
            cell.position.row,
            cell.position.col,
            Cell {
                symbol: cell.glyph.symbol(),
                style,
            },
        );
    }

    cells
}

fn timer_bar(width: u16, remaining: f64) -> String {
    let width = width as usize;
    let filled = ((width as f64) * remaining.clamp(0.0, 1.0)) as usize;
    let mut bar = TIMER_FILLED.to_string().repeat(filled);
    bar.push_str(&TIMER_EMPTY.to_string().repeat(width - filled));
    bar
}

fn round_over_lines(end: RoundEnd, score: u32) -> Vec<Line<'static>> {
    let headline = match end {
        RoundEnd::SelfCollision => "GAME OVER",
        RoundEnd::BoardFull => "BOARD FULL - YOU WIN",
    };

    vec![
        Line::from(Span::styled(
            headline,
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Your Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                format!("{:04}", score),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Press ", Style::default().fg(Color::Gray)),
            Span::styled(
                "R",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" to restart or ", Style::default().fg(Color::Gray)),
            Span::styled(
                "Q",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" to quit", Style::default().fg(Color::Gray)),
        ]),
    ]
}

fn help_lines() -> Vec<Line<'static>> {
    HELP_TEXT
        .iter()
        .map(|text| {
            Line::from(Span::styled(
                format!("{:<32}", text),
                Style::default().fg(Color::White),
            ))
        })
        .collect()
}

/// A `width` x `height` rectangle in the middle of `area`, shrunk to fit
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
