use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, StatefulWidget, Widget, Wrap},
};
use wordveil::game::{AnswerDialog, SettingsForm};

/// A `width` x `height` rectangle centered in `area`, shrunk to fit.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

/// Pick the answer for one cell from the sorted word list.
pub struct AnswerPopup<'a> {
    dialog: &'a AnswerDialog,
    options: &'a [String],
}

impl<'a> AnswerPopup<'a> {
    pub fn new(dialog: &'a AnswerDialog, options: &'a [String]) -> Self {
        Self { dialog, options }
    }
}

impl Widget for AnswerPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!("Cell {} holds:", self.dialog.cell + 1))
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(area);
        block.render(area, buf);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(inner);

        let items: Vec<ListItem> = self
            .options
            .iter()
            .map(|o| ListItem::new(o.as_str()))
            .collect();
        let list = List::new(items)
            .highlight_style(
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");
        let mut state = ListState::default().with_selected(self.dialog.highlighted);
        StatefulWidget::render(list, chunks[0], buf, &mut state);

        let footer_style = if self.dialog.guess.is_some() {
            Style::default().add_modifier(Modifier::ITALIC)
        } else {
            Style::default().add_modifier(Modifier::ITALIC | Modifier::DIM)
        };
        Paragraph::new(Span::styled("↑↓ choose / (enter) answer", footer_style))
            .render(chunks[1], buf);
    }
}

/// Edit the sentence being memorized.
pub struct SettingsPopup<'a> {
    form: &'a SettingsForm,
}

impl<'a> SettingsPopup<'a> {
    pub fn new(form: &'a SettingsForm) -> Self {
        Self { form }
    }
}

impl Widget for SettingsPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .title("Settings")
            .border_style(Style::default().fg(Color::Green));
        let inner = block.inner(area);
        block.render(area, buf);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),    // input
                Constraint::Length(1), // helper
            ])
            .split(inner);

        let input = Paragraph::new(Line::from(vec![
            Span::styled(self.form.input.as_str(), Style::default().add_modifier(Modifier::BOLD)),
            Span::styled("▏", Style::default().add_modifier(Modifier::SLOW_BLINK)),
        ]))
        .block(Block::default().borders(Borders::ALL).title("Sentence"))
        .wrap(Wrap { trim: false });
        input.render(chunks[0], buf);

        Paragraph::new(Span::styled(
            "Words and punctuation are separated by spaces",
            Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
        ))
        .render(chunks[1], buf);
    }
}
