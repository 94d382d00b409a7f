use std::time::Duration;

use rand::Rng;
use strum_macros::Display;
use tracing::{debug, info};

use crate::activity::{ActivityLog, LogEntry};
use crate::board::{tokenize, Board, CellState};
use crate::error::ActionError;
use crate::picker::{Picker, PickerConfig, PickerStep, RunToken};

/// Number of distinct "wrong answer" sounds to choose from.
pub const WRONG_CUE_VARIANTS: u8 = 3;

/// Sound the front end should play. Playback itself is up to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SoundCue {
    Finding,
    StopFinding,
    Right,
    Wrong(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Verdict {
    Correct,
    Wrong,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerDialog {
    pub cell: usize,
    /// Position in the board's answer options, once the player has moved onto one.
    pub highlighted: Option<usize>,
    pub guess: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsForm {
    pub input: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Board,
    Answer(AnswerDialog),
    Settings(SettingsForm),
}

/// All state of one game screen. Every mutation goes through a method here.
#[derive(Debug)]
pub struct Game {
    sentence: String,
    board: Board,
    picker: Picker,
    cursor: Option<usize>,
    log: ActivityLog,
    mode: Mode,
    cues: Vec<SoundCue>,
}

impl Game {
    pub fn new(sentence: &str, words_hidden: bool, picker: PickerConfig) -> Self {
        Self {
            sentence: sentence.trim().to_string(),
            board: Board::from_sentence(sentence, words_hidden),
            picker: Picker::new(picker),
            cursor: None,
            log: ActivityLog::new(),
            mode: Mode::Board,
            cues: vec![],
        }
    }

    pub fn sentence(&self) -> &str {
        &self.sentence
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn picker(&self) -> &Picker {
        &self.picker
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn log(&self) -> &ActivityLog {
        &self.log
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn is_picking(&self) -> bool {
        self.picker.is_running()
    }

    /// Replace the sentence. A sentence without words leaves the board untouched.
    pub fn configure(&mut self, sentence: &str) -> Result<(), ActionError> {
        let tokens = tokenize(sentence);
        if tokens.is_empty() {
            return Err(ActionError::EmptySentence);
        }

        self.cancel_picker();
        self.board = Board::new(tokens, self.board.words_hidden());
        self.sentence = sentence.trim().to_string();
        self.cursor = None;
        self.log.clear();
        self.mode = Mode::Board;

        info!(words = self.board.len(), "sentence configured");
        Ok(())
    }

    /// Switch from study mode to hidden mode. There is no way back short of
    /// restarting.
    pub fn hide_words(&mut self) -> Result<(), ActionError> {
        if self.board.words_hidden() {
            return Err(ActionError::WordsAlreadyHidden);
        }

        self.board.hide_words();
        self.log.push(LogEntry::WordsHidden);
        Ok(())
    }

    /// Start a picker run. Returns its token and the delay before its first tick.
    pub fn start_picker(&mut self) -> Result<(RunToken, Duration), ActionError> {
        if self.mode != Mode::Board {
            return Err(ActionError::DialogOpen);
        }
        if self.picker.is_running() {
            return Err(ActionError::PickerRunning);
        }
        if !self.board.words_hidden() {
            return Err(ActionError::StudyMode);
        }
        if self.board.hidden_count() == 0 {
            return Err(ActionError::NothingHidden);
        }

        let token = self.picker.start();
        self.log.push(LogEntry::PickingStarted);
        self.cues.push(SoundCue::Finding);

        Ok((token, self.picker.first_tick_in()))
    }

    /// Apply one picker tick against the cells hidden right now.
    pub fn on_picker_tick<R: Rng + ?Sized>(&mut self, token: RunToken, rng: &mut R) -> PickerStep {
        let hidden = self.board.hidden_indices();
        let step = self.picker.tick(token, &hidden, rng);

        match step {
            PickerStep::Selected { index, .. } => {
                self.cursor = Some(index);
            }
            PickerStep::Stopped { index } => {
                self.cursor = Some(index);
                self.log.push(LogEntry::Picked { cell: index });
                self.cues.push(SoundCue::StopFinding);
            }
            PickerStep::Exhausted => {
                self.cues.push(SoundCue::StopFinding);
            }
            PickerStep::Stale => {
                debug!(?token, "ignoring tick from a finished run");
            }
        }
        step
    }

    pub fn cancel_picker(&mut self) -> Option<RunToken> {
        let cancelled = self.picker.cancel();
        if let Some(token) = cancelled {
            debug!(?token, "picker cancelled");
            self.cues.push(SoundCue::StopFinding);
        }
        cancelled
    }

    /// Move the selection cursor by `delta` cells, clamped to the board.
    pub fn move_cursor(&mut self, delta: isize) -> Result<(), ActionError> {
        if self.mode != Mode::Board {
            return Err(ActionError::DialogOpen);
        }
        if self.picker.is_running() {
            return Err(ActionError::PickerRunning);
        }
        if self.board.is_empty() {
            return Err(ActionError::NoSelection);
        }

        let last = self.board.len() - 1;
        self.cursor = Some(match self.cursor {
            None if delta < 0 => last,
            None => 0,
            Some(idx) => idx.saturating_add_signed(delta).min(last),
        });
        Ok(())
    }

    /// Open the answer dialog for `index`, which becomes the active selection.
    pub fn open_answer(&mut self, index: usize) -> Result<(), ActionError> {
        if self.mode != Mode::Board {
            return Err(ActionError::DialogOpen);
        }
        if self.picker.is_running() {
            return Err(ActionError::PickerRunning);
        }
        if index >= self.board.len() {
            return Err(ActionError::NoSuchCell {
                index,
                len: self.board.len(),
            });
        }

        self.cursor = Some(index);
        self.mode = Mode::Answer(AnswerDialog {
            cell: index,
            highlighted: None,
            guess: None,
        });
        Ok(())
    }

    pub fn open_answer_at_cursor(&mut self) -> Result<(), ActionError> {
        let index = self.cursor.ok_or(ActionError::NoSelection)?;
        self.open_answer(index)
    }

    /// Move through the answer options; the highlighted option becomes the guess.
    pub fn choose_option(&mut self, delta: isize) -> Result<(), ActionError> {
        let Mode::Answer(dialog) = &mut self.mode else {
            return Err(ActionError::AnswerClosed);
        };
        let options = self.board.options();
        if options.is_empty() {
            return Ok(());
        }

        let last = options.len() - 1;
        let next = match dialog.highlighted {
            None if delta < 0 => last,
            None => 0,
            Some(idx) => idx.saturating_add_signed(delta).min(last),
        };
        dialog.highlighted = Some(next);
        dialog.guess = Some(options[next].clone());
        Ok(())
    }

    pub fn set_guess(&mut self, guess: impl Into<String>) -> Result<(), ActionError> {
        let Mode::Answer(dialog) = &mut self.mode else {
            return Err(ActionError::AnswerClosed);
        };
        let guess = guess.into();
        dialog.highlighted = self.board.options().iter().position(|o| *o == guess);
        dialog.guess = Some(guess);
        Ok(())
    }

    /// Compare the pending guess with the word under the active selection.
    pub fn submit_answer<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Verdict, ActionError> {
        let Mode::Answer(dialog) = &self.mode else {
            return Err(ActionError::AnswerClosed);
        };
        let guess = dialog
            .guess
            .as_deref()
            .filter(|g| !g.is_empty())
            .ok_or(ActionError::EmptyGuess)?;
        let index = self.cursor.ok_or(ActionError::NoSelection)?;
        let correct = self
            .board
            .check(index, guess)
            .ok_or(ActionError::NoSuchCell {
                index,
                len: self.board.len(),
            })?;

        let verdict = if correct {
            self.board.set_cell(index, CellState::Revealed);
            self.log.push(LogEntry::Correct { cell: index });
            self.cues.push(SoundCue::Right);
            Verdict::Correct
        } else {
            self.board.set_cell(index, CellState::Wrong);
            self.log.push(LogEntry::Wrong { cell: index });
            self.cues
                .push(SoundCue::Wrong(rng.gen_range(1..=WRONG_CUE_VARIANTS)));
            Verdict::Wrong
        };

        self.mode = Mode::Board;
        info!(cell = index + 1, %verdict, "answer checked");
        Ok(verdict)
    }

    /// Close whichever dialog is open. Returns false if none was.
    pub fn close_dialog(&mut self) -> bool {
        let was_open = self.mode != Mode::Board;
        self.mode = Mode::Board;
        was_open
    }

    pub fn open_settings(&mut self) -> Result<(), ActionError> {
        if self.mode != Mode::Board {
            return Err(ActionError::DialogOpen);
        }

        self.mode = Mode::Settings(SettingsForm {
            input: self.sentence.clone(),
        });
        Ok(())
    }

    pub fn settings_input(&mut self, c: char) -> Result<(), ActionError> {
        let Mode::Settings(form) = &mut self.mode else {
            return Err(ActionError::SettingsClosed);
        };
        form.input.push(c);
        Ok(())
    }

    pub fn settings_backspace(&mut self) -> Result<(), ActionError> {
        let Mode::Settings(form) = &mut self.mode else {
            return Err(ActionError::SettingsClosed);
        };
        form.input.pop();
        Ok(())
    }

    pub fn settings_clear(&mut self) -> Result<(), ActionError> {
        let Mode::Settings(form) = &mut self.mode else {
            return Err(ActionError::SettingsClosed);
        };
        form.input.clear();
        Ok(())
    }

    /// Apply the settings form. The form stays open if the sentence is empty.
    pub fn save_settings(&mut self) -> Result<(), ActionError> {
        let Mode::Settings(form) = &self.mode else {
            return Err(ActionError::SettingsClosed);
        };
        let input = form.input.clone();
        self.configure(&input)
    }

    pub fn drain_cues(&mut self) -> Vec<SoundCue> {
        std::mem::take(&mut self.cues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rand::{rngs::StdRng, SeedableRng};

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    fn hidden_game(sentence: &str) -> Game {
        Game::new(sentence, true, PickerConfig::default())
    }

    fn run_picker(game: &mut Game, rng: &mut StdRng) -> Vec<PickerStep> {
        let (token, _) = game.start_picker().unwrap();
        let mut steps = vec![];
        loop {
            let step = game.on_picker_tick(token, rng);
            steps.push(step);
            if !matches!(step, PickerStep::Selected { .. }) {
                return steps;
            }
        }
    }

    #[test]
    fn test_new_game() {
        let game = Game::new("  In the beginning  ", false, PickerConfig::default());

        assert_eq!(game.sentence(), "In the beginning");
        assert_eq!(game.board().len(), 3);
        assert_eq!(game.cursor(), None);
        assert_eq!(game.mode(), &Mode::Board);
        assert!(game.log().is_empty());
        assert!(!game.is_picking());
    }

    #[test]
    fn test_empty_sentence_gives_empty_board() {
        let game = hidden_game("");
        assert!(game.board().is_empty());
    }

    #[test]
    fn test_full_run_logs_exactly_one_stop() {
        let mut game = hidden_game("A B C");
        let mut rng = rng();

        let steps = run_picker(&mut game, &mut rng);

        assert_matches!(steps.last(), Some(PickerStep::Stopped { .. }));
        assert_eq!(game.log().entries().filter(|e| e.is_stop()).count(), 1);
        assert_eq!(game.log().entries().next(), Some(&LogEntry::PickingStarted));
        assert!(!game.is_picking());

        let Some(PickerStep::Stopped { index }) = steps.last().copied() else {
            unreachable!()
        };
        assert_eq!(game.cursor(), Some(index));
        assert_eq!(
            game.drain_cues(),
            vec![SoundCue::Finding, SoundCue::StopFinding]
        );
    }

    #[test]
    fn test_start_rejected_in_study_mode() {
        let mut game = Game::new("A B C", false, PickerConfig::default());
        assert_eq!(game.start_picker(), Err(ActionError::StudyMode));

        game.hide_words().unwrap();
        assert!(game.start_picker().is_ok());
    }

    #[test]
    fn test_start_rejected_while_running() {
        let mut game = hidden_game("A B C");
        game.start_picker().unwrap();

        assert_eq!(game.start_picker(), Err(ActionError::PickerRunning));
    }

    #[test]
    fn test_start_rejected_when_nothing_hidden() {
        let mut game = hidden_game("");
        assert_eq!(game.start_picker(), Err(ActionError::NothingHidden));
    }

    #[test]
    fn test_hide_words_is_one_way() {
        let mut game = Game::new("A B", false, PickerConfig::default());

        game.hide_words().unwrap();
        assert_eq!(game.board().hidden_indices(), vec![0, 1]);
        assert_eq!(game.hide_words(), Err(ActionError::WordsAlreadyHidden));
        assert_eq!(game.log().entries().last(), Some(&LogEntry::WordsHidden));
    }

    #[test]
    fn test_picker_skips_answered_cells() {
        let mut game = hidden_game("A B C");
        let mut rng = rng();
        game.open_answer(0).unwrap();
        game.set_guess("A").unwrap();
        game.submit_answer(&mut rng).unwrap();
        game.open_answer(1).unwrap();
        game.set_guess("x").unwrap();
        game.submit_answer(&mut rng).unwrap();

        for step in run_picker(&mut game, &mut rng) {
            match step {
                PickerStep::Selected { index, .. } | PickerStep::Stopped { index } => {
                    assert_eq!(index, 2)
                }
                other => panic!("unexpected step {other:?}"),
            }
        }
    }

    #[test]
    fn test_stale_tick_changes_nothing() {
        let mut game = hidden_game("A B C");
        let mut rng = rng();
        let (token, _) = game.start_picker().unwrap();
        game.on_picker_tick(token, &mut rng);
        game.cancel_picker();
        let cursor = game.cursor();
        let log_len = game.log().len();

        assert_eq!(game.on_picker_tick(token, &mut rng), PickerStep::Stale);
        assert_eq!(game.cursor(), cursor);
        assert_eq!(game.log().len(), log_len);
    }

    #[test]
    fn test_answer_correct_is_case_sensitive() {
        let mut game = hidden_game("Love is patient");
        let mut rng = rng();

        game.open_answer(0).unwrap();
        game.set_guess("love").unwrap();
        assert_eq!(game.submit_answer(&mut rng), Ok(Verdict::Wrong));
        assert_eq!(game.board().cell(0), Some(CellState::Wrong));

        game.open_answer(0).unwrap();
        game.set_guess("Love").unwrap();
        assert_eq!(game.submit_answer(&mut rng), Ok(Verdict::Correct));
        assert_eq!(game.board().cell(0), Some(CellState::Revealed));

        let entries: Vec<_> = game.log().entries().cloned().collect();
        assert_eq!(
            entries,
            vec![LogEntry::Wrong { cell: 0 }, LogEntry::Correct { cell: 0 }]
        );
    }

    #[test]
    fn test_submit_clears_guess_and_closes() {
        let mut game = hidden_game("A B");
        game.open_answer(1).unwrap();
        game.set_guess("B").unwrap();
        game.submit_answer(&mut rng()).unwrap();

        assert_eq!(game.mode(), &Mode::Board);
        game.open_answer(1).unwrap();
        assert_matches!(game.mode(), Mode::Answer(AnswerDialog { guess: None, .. }));
    }

    #[test]
    fn test_submit_requires_guess() {
        let mut game = hidden_game("A B");
        assert_eq!(game.submit_answer(&mut rng()), Err(ActionError::AnswerClosed));

        game.open_answer(0).unwrap();
        assert_eq!(game.submit_answer(&mut rng()), Err(ActionError::EmptyGuess));
        game.set_guess("").unwrap();
        assert_eq!(game.submit_answer(&mut rng()), Err(ActionError::EmptyGuess));
    }

    #[test]
    fn test_wrong_cue_variant_in_range() {
        let mut game = hidden_game("A");
        let mut rng = rng();

        for _ in 0..20 {
            game.open_answer(0).unwrap();
            game.set_guess("nope").unwrap();
            game.submit_answer(&mut rng).unwrap();
        }

        for cue in game.drain_cues() {
            assert_matches!(cue, SoundCue::Wrong(n) if (1..=WRONG_CUE_VARIANTS).contains(&n));
        }
    }

    #[test]
    fn test_open_answer_guards() {
        let mut game = hidden_game("A B");

        assert_eq!(
            game.open_answer(5),
            Err(ActionError::NoSuchCell { index: 5, len: 2 })
        );
        assert_eq!(game.open_answer_at_cursor(), Err(ActionError::NoSelection));

        game.start_picker().unwrap();
        assert_eq!(game.open_answer(0), Err(ActionError::PickerRunning));
    }

    #[test]
    fn test_open_answer_moves_cursor() {
        let mut game = hidden_game("A B C");

        game.open_answer(2).unwrap();

        assert_eq!(game.cursor(), Some(2));
        assert_eq!(game.open_answer(1), Err(ActionError::DialogOpen));
        assert!(game.close_dialog());
        assert!(!game.close_dialog());
    }

    #[test]
    fn test_choose_option_walks_sorted_options() {
        let mut game = hidden_game("the cat saw the dog");
        game.open_answer(0).unwrap();

        game.choose_option(1).unwrap();
        assert_matches!(game.mode(), Mode::Answer(d) if d.guess.as_deref() == Some("cat"));

        game.choose_option(2).unwrap();
        assert_matches!(game.mode(), Mode::Answer(d) if d.guess.as_deref() == Some("saw"));

        game.choose_option(10).unwrap();
        assert_matches!(game.mode(), Mode::Answer(d) if d.highlighted == Some(3));

        game.choose_option(-10).unwrap();
        assert_matches!(game.mode(), Mode::Answer(d) if d.highlighted == Some(0));

        assert_eq!(game.submit_answer(&mut rng()), Ok(Verdict::Wrong));
    }

    #[test]
    fn test_choose_option_up_first_picks_last() {
        let mut game = hidden_game("b a");
        game.open_answer(0).unwrap();

        game.choose_option(-1).unwrap();

        assert_matches!(game.mode(), Mode::Answer(d) if d.guess.as_deref() == Some("b"));
    }

    #[test]
    fn test_move_cursor() {
        let mut game = hidden_game("A B C");

        game.move_cursor(1).unwrap();
        assert_eq!(game.cursor(), Some(0));
        game.move_cursor(5).unwrap();
        assert_eq!(game.cursor(), Some(2));
        game.move_cursor(-1).unwrap();
        assert_eq!(game.cursor(), Some(1));
        game.move_cursor(-9).unwrap();
        assert_eq!(game.cursor(), Some(0));

        game.start_picker().unwrap();
        assert_eq!(game.move_cursor(1), Err(ActionError::PickerRunning));
    }

    #[test]
    fn test_move_cursor_empty_board() {
        let mut game = hidden_game("");
        assert_eq!(game.move_cursor(1), Err(ActionError::NoSelection));
    }

    #[test]
    fn test_configure_resets_state() {
        let mut game = hidden_game("A B C");
        let mut rng = rng();
        let (token, _) = game.start_picker().unwrap();
        game.on_picker_tick(token, &mut rng);

        game.configure("one two").unwrap();

        assert_eq!(game.sentence(), "one two");
        assert_eq!(game.board().len(), 2);
        assert!(game.board().words_hidden());
        assert!(!game.is_picking());
        assert_eq!(game.cursor(), None);
        assert!(game.log().is_empty());
        assert_eq!(game.on_picker_tick(token, &mut rng), PickerStep::Stale);
    }

    #[test]
    fn test_configure_empty_keeps_board() {
        let mut game = hidden_game("A B C");

        assert_eq!(game.configure("   "), Err(ActionError::EmptySentence));
        assert_eq!(game.board().len(), 3);
        assert_eq!(game.sentence(), "A B C");
    }

    #[test]
    fn test_settings_flow() {
        let mut game = Game::new("", false, PickerConfig::default());
        assert_eq!(game.settings_input('x'), Err(ActionError::SettingsClosed));

        game.open_settings().unwrap();
        for c in "Be still".chars() {
            game.settings_input(c).unwrap();
        }
        game.settings_input('!').unwrap();
        game.settings_backspace().unwrap();
        game.save_settings().unwrap();

        assert_eq!(game.mode(), &Mode::Board);
        assert_eq!(game.board().tokens(), &["Be", "still"]);
        assert!(!game.board().words_hidden());
    }

    #[test]
    fn test_settings_prefilled_and_empty_save_stays_open() {
        let mut game = hidden_game("A B");
        game.open_settings().unwrap();
        assert_eq!(
            game.mode(),
            &Mode::Settings(SettingsForm {
                input: "A B".into()
            })
        );

        game.settings_clear().unwrap();
        assert_eq!(game.save_settings(), Err(ActionError::EmptySentence));
        assert_matches!(game.mode(), Mode::Settings(_));
    }
}
