use thiserror::Error;

/// A game operation that is not allowed in the current state.
///
/// None of these are failures in the usual sense: the UI logs them and
/// carries on, the same way a disabled button would simply not react.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ActionError {
    #[error("the picker is already running")]
    PickerRunning,

    #[error("words are shown; hide them before picking")]
    StudyMode,

    #[error("words are already hidden")]
    WordsAlreadyHidden,

    #[error("no hidden cells left to pick from")]
    NothingHidden,

    #[error("cell {index} does not exist (board has {len} cells)")]
    NoSuchCell { index: usize, len: usize },

    #[error("no cell is selected")]
    NoSelection,

    #[error("a dialog is open")]
    DialogOpen,

    #[error("the answer dialog is not open")]
    AnswerClosed,

    #[error("the settings form is not open")]
    SettingsClosed,

    #[error("no answer chosen")]
    EmptyGuess,

    #[error("the sentence has no words")]
    EmptySentence,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file I/O failed")]
    Io(#[from] std::io::Error),

    #[error("config file is not valid JSON")]
    Json(#[from] serde_json::Error),

    #[error("invalid picker timing: {0}")]
    InvalidPicker(String),
}
