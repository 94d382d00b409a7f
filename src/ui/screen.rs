use ratatui::Frame;
use wordveil::game::{Game, Mode};

use crate::ui::dialogs::{centered_rect, AnswerPopup, SettingsPopup};

const ANSWER_POPUP: (u16, u16) = (40, 14);
const SETTINGS_POPUP: (u16, u16) = (70, 9);

/// A popup drawn over the board
pub trait Screen {
    fn render(&self, game: &Game, f: &mut Frame);
}

/// Answer dialog - list of candidate words for the selected cell
pub struct AnswerScreen;

impl Screen for AnswerScreen {
    fn render(&self, game: &Game, f: &mut Frame) {
        if let Mode::Answer(dialog) = game.mode() {
            let (w, h) = ANSWER_POPUP;
            let area = centered_rect(w, h, f.area());
            f.render_widget(AnswerPopup::new(dialog, game.board().options()), area);
        }
    }
}

/// Settings dialog - sentence input
pub struct SettingsScreen;

impl Screen for SettingsScreen {
    fn render(&self, game: &Game, f: &mut Frame) {
        if let Mode::Settings(form) = game.mode() {
            let (w, h) = SETTINGS_POPUP;
            let area = centered_rect(w, h, f.area());
            f.render_widget(SettingsPopup::new(form), area);
        }
    }
}

/// Helper to construct the popup for the current mode, if it has one
pub fn overlay(mode: &Mode) -> Option<Box<dyn Screen>> {
    match mode {
        Mode::Board => None,
        Mode::Answer(_) => Some(Box::new(AnswerScreen)),
        Mode::Settings(_) => Some(Box::new(SettingsScreen)),
    }
}
