use std::{
    fmt::Display,
    ops::{Deref, DerefMut},
};

use cursor::Line;
use itertools::Itertools;

/// Where on its line an error happened, as rendered between `Error` and the colon.
#[derive(Clone, Debug, PartialEq)]
pub enum At {
    Nothing,
    End,
    Lexeme(String),
}

impl Display for At {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            At::Nothing => Ok(()),
            At::End => write!(f, " at end"),
            At::Lexeme(lexeme) => write!(f, " at '{lexeme}'"),
        }
    }
}

#[derive(thiserror::Error, Clone, Debug, PartialEq)]
#[error("[line {line}] Error{at}: {message}")]
pub struct LoxError {
    pub line: Line,
    pub at: At,
    pub message: String,
}

impl LoxError {
    pub fn new(line: Line, at: At, message: impl ToString) -> Self {
        Self { line, at, message: message.to_string() }
    }
}

/// Every diagnostic reported for one source unit, in report order.
///
/// A fresh value is created for each unit (a file, or one REPL line), so
/// "had an error" never leaks from one unit into the next.
#[derive(thiserror::Error, Clone, Debug, Default, PartialEq)]
pub struct LoxErrors(pub Vec<LoxError>);

impl LoxErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, line: Line, at: At, message: impl ToString) {
        self.push_error(LoxError::new(line, at, message));
    }

    pub fn push_error(&mut self, error: impl Into<LoxError>) {
        let error = error.into();
        log::debug!("Reported: {error}");
        self.0.push(error);
    }

    pub fn had_error(&self) -> bool {
        !self.0.is_empty()
    }
}

impl From<LoxError> for LoxErrors {
    fn from(e: LoxError) -> Self {
        Self(vec![e])
    }
}

impl<E: Into<LoxError>> Extend<E> for LoxErrors {
    fn extend<T: IntoIterator<Item = E>>(&mut self, iter: T) {
        for error in iter {
            self.push_error(error);
        }
    }
}

impl Deref for LoxErrors {
    type Target = Vec<LoxError>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for LoxErrors {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl Display for LoxErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0.iter().join("\n"))
    }
}
