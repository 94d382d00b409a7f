pub mod dialogs;
pub mod screen;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;
use wordveil::{activity::ActivityLog, board::CellLook, game::Game, game::Mode};

use crate::App;

const HORIZONTAL_MARGIN: u16 = 2;
const CELL_HEIGHT: u16 = 3;
const MIN_CELL_WIDTH: u16 = 7;
const BOTTOM_PANEL_HEIGHT: u16 = 8;

const ORANGE: Color = Color::Rgb(255, 165, 0);

pub fn draw(app: &mut App, f: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Min(CELL_HEIGHT),
            Constraint::Length(BOTTOM_PANEL_HEIGHT),
        ])
        .split(f.area());

    let board = BoardView::new(&app.game);
    app.grid_columns = board.columns(chunks[0].width);
    f.render_widget(board, chunks[0]);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[1]);
    f.render_widget(LogView::new(app.game.log()), bottom[0]);
    f.render_widget(StatusView::new(&app.game), bottom[1]);

    if let Some(overlay) = screen::overlay(app.game.mode()) {
        overlay.render(&app.game, f);
    }
}

pub fn look_style(look: CellLook) -> Style {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    match look {
        CellLook::Selected => bold.fg(Color::White).bg(Color::Red),
        CellLook::Revealed => bold.fg(ORANGE),
        CellLook::Wrong => bold.fg(Color::Magenta),
        CellLook::Hidden => bold.fg(Color::Cyan),
    }
}

/// Grid of cells, one per word, scrolled so the cursor stays in view.
pub struct BoardView<'a> {
    game: &'a Game,
    cell_width: u16,
}

impl<'a> BoardView<'a> {
    pub fn new(game: &'a Game) -> Self {
        let widest = game
            .board()
            .tokens()
            .iter()
            .map(|t| t.width())
            .max()
            .unwrap_or(0);
        let cell_width = u16::try_from(widest)
            .unwrap_or(u16::MAX)
            .saturating_add(4)
            .max(MIN_CELL_WIDTH);

        Self { game, cell_width }
    }

    pub fn columns(&self, width: u16) -> usize {
        usize::from(width / self.cell_width).max(1)
    }
}

impl Widget for BoardView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let board = self.game.board();

        if board.is_empty() {
            let placeholder = Paragraph::new(Span::styled(
                "No sentence yet. Press (e) to enter one.",
                Style::default()
                    .fg(Color::Gray)
                    .add_modifier(Modifier::BOLD | Modifier::ITALIC),
            ))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });

            let y = area.y + area.height / 2;
            placeholder.render(Rect::new(area.x, y, area.width, 1).intersection(area), buf);
            return;
        }

        let columns = self.columns(area.width);
        let visible_rows = usize::from(area.height / CELL_HEIGHT).max(1);
        let total_rows = board.len().div_ceil(columns);
        let cursor_row = self.game.cursor().map_or(0, |c| c / columns);
        let first_row = cursor_row.saturating_sub(visible_rows - 1);
        let shown_rows = (total_rows - first_row).min(visible_rows) as u16;

        let grid_width = columns.min(board.len()) as u16 * self.cell_width;
        let x0 = area.x + area.width.saturating_sub(grid_width) / 2;
        let y0 = area.y + area.height.saturating_sub(shown_rows * CELL_HEIGHT) / 2;

        for idx in first_row * columns..board.len() {
            let row = idx / columns - first_row;
            if row >= visible_rows {
                break;
            }
            let col = idx % columns;

            let cell = Rect::new(
                x0.saturating_add(col as u16 * self.cell_width),
                y0.saturating_add(row as u16 * CELL_HEIGHT),
                self.cell_width,
                CELL_HEIGHT,
            )
            .intersection(area);

            let style = board
                .look(idx, self.game.cursor())
                .map(look_style)
                .unwrap_or_default();
            let label = board.label(idx).unwrap_or_default();

            Paragraph::new(label)
                .alignment(Alignment::Center)
                .style(style)
                .block(Block::default().borders(Borders::ALL).border_style(style))
                .render(cell, buf);
        }
    }
}

/// Most recent activity entries, newest at the bottom.
pub struct LogView<'a> {
    log: &'a ActivityLog,
}

impl<'a> LogView<'a> {
    pub fn new(log: &'a ActivityLog) -> Self {
        Self { log }
    }
}

impl Widget for LogView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default().borders(Borders::ALL).title("Activity");
        let inner_height = usize::from(block.inner(area).height);
        let dim = Style::default().add_modifier(Modifier::DIM);

        let lines: Vec<Line> = self
            .log
            .tail(inner_height)
            .iter()
            .map(|item| {
                Line::from(vec![
                    Span::styled(item.at.format("%H:%M:%S ").to_string(), dim),
                    Span::styled(item.entry.to_string(), Style::default().fg(Color::Green)),
                ])
            })
            .collect();

        Paragraph::new(lines).block(block).render(area, buf);
    }
}

/// Spinner / board status plus the key legend for the current mode.
pub struct StatusView<'a> {
    game: &'a Game,
}

impl<'a> StatusView<'a> {
    pub fn new(game: &'a Game) -> Self {
        Self { game }
    }

    fn status_line(&self) -> String {
        let board = self.game.board();
        let picker = self.game.picker();

        if picker.is_running() {
            format!(
                "Picking... {:.1}s, step {}ms",
                picker.elapsed().as_secs_f64(),
                picker.cadence().as_millis()
            )
        } else if board.is_empty() {
            String::from("No words")
        } else if !board.words_hidden() {
            String::from("Study mode: words shown")
        } else {
            format!("{} of {} hidden", board.hidden_count(), board.len())
        }
    }

    fn legend(&self) -> &'static str {
        match self.game.mode() {
            Mode::Board if self.game.is_picking() => "(e)dit / (esc)ape",
            Mode::Board if !self.game.board().words_hidden() => {
                "(h)ide words / ←→↑↓ move / (enter) answer / (e)dit / (esc)ape"
            }
            Mode::Board => "(space) pick / ←→↑↓ move / (enter) answer / (e)dit / (esc)ape",
            Mode::Answer(_) => "↑↓ choose / (enter) answer / (esc) close",
            Mode::Settings(_) => "(enter) save / (ctrl+u) clear / (esc) close",
        }
    }
}

impl Widget for StatusView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines = vec![
            Line::from(Span::styled(
                self.status_line(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                self.legend(),
                Style::default().add_modifier(Modifier::ITALIC),
            )),
        ];

        Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("wordveil"))
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}
