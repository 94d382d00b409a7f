use itertools::Itertools;
use strum_macros::Display;

/// State of one cell on the board.
///
/// `Revealed` covers both a correctly named word and every cell while the
/// board is in study mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum CellState {
    Hidden,
    Revealed,
    Wrong,
}

/// How a cell should be drawn. Derived from the cursor and the cell state only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellLook {
    Selected,
    Revealed,
    Wrong,
    Hidden,
}

/// Split a sentence into word tokens. Punctuation stays attached to its word.
pub fn tokenize(sentence: &str) -> Vec<String> {
    sentence.split_whitespace().map(str::to_owned).collect()
}

#[derive(Debug, Clone)]
pub struct Board {
    tokens: Vec<String>,
    cells: Vec<CellState>,
    options: Vec<String>,
    words_hidden: bool,
}

impl Board {
    pub fn new(tokens: Vec<String>, words_hidden: bool) -> Self {
        let options = tokens.iter().cloned().sorted().dedup().collect();
        let cells = vec![initial_state(words_hidden); tokens.len()];

        Self {
            tokens,
            cells,
            options,
            words_hidden,
        }
    }

    pub fn from_sentence(sentence: &str, words_hidden: bool) -> Self {
        Self::new(tokenize(sentence), words_hidden)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn token(&self, index: usize) -> Option<&str> {
        self.tokens.get(index).map(String::as_str)
    }

    pub fn cell(&self, index: usize) -> Option<CellState> {
        self.cells.get(index).copied()
    }

    pub fn cells(&self) -> &[CellState] {
        &self.cells
    }

    /// Sorted, de-duplicated tokens offered as answers.
    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn words_hidden(&self) -> bool {
        self.words_hidden
    }

    /// Leave study mode: every cell goes back behind its number.
    pub fn hide_words(&mut self) {
        self.words_hidden = true;
        self.cells.fill(CellState::Hidden);
    }

    pub fn hidden_indices(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, state)| **state == CellState::Hidden)
            .map(|(idx, _)| idx)
            .collect()
    }

    pub fn hidden_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|state| **state == CellState::Hidden)
            .count()
    }

    pub fn set_cell(&mut self, index: usize, state: CellState) -> bool {
        match self.cells.get_mut(index) {
            Some(cell) => {
                *cell = state;
                true
            }
            None => false,
        }
    }

    /// Exact, case-sensitive comparison against the token at `index`.
    pub fn check(&self, index: usize, guess: &str) -> Option<bool> {
        self.token(index).map(|token| token == guess)
    }

    /// Text shown on a cell: the word once it is visible, its 1-based number otherwise.
    pub fn label(&self, index: usize) -> Option<String> {
        let token = self.token(index)?;
        let state = self.cell(index)?;

        if !self.words_hidden || state != CellState::Hidden {
            Some(token.to_string())
        } else {
            Some((index + 1).to_string())
        }
    }

    pub fn look(&self, index: usize, cursor: Option<usize>) -> Option<CellLook> {
        let state = self.cell(index)?;

        Some(if cursor == Some(index) {
            CellLook::Selected
        } else {
            match state {
                CellState::Revealed => CellLook::Revealed,
                CellState::Wrong => CellLook::Wrong,
                CellState::Hidden => CellLook::Hidden,
            }
        })
    }
}

fn initial_state(words_hidden: bool) -> CellState {
    if words_hidden {
        CellState::Hidden
    } else {
        CellState::Revealed
    }
}
