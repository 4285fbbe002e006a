//! Format misuse diagnostics

use thiserror::Error;

/// Misuse detected while interpreting a template
///
/// None of these change what reaches the sink: the engine degrades silently
/// and reports the first problem it saw through [`super::format_checked`].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatError {
    #[error("directive at offset {offset} ends before its conversion type")]
    UnterminatedDirective { offset: usize },

    #[error("unknown conversion {conversion:?} at offset {offset}")]
    UnknownConversion { offset: usize, conversion: char },

    #[error("directive at offset {offset} has no argument left to consume")]
    MissingArgument { offset: usize },

    #[error("argument {index} does not fit the directive at offset {offset}")]
    ArgumentMismatch { offset: usize, index: usize },

    #[error("{unused} argument(s) left unconsumed")]
    ExtraArguments { unused: usize },
}
