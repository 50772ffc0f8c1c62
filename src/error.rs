// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::error::Error;
use std::fmt::Display;
use std::fmt::Formatter;

use crate::types::fact::FactId;

/// Failures that the study engine reports to its callers. These never
/// indicate a bug or an I/O problem: they describe a request that cannot be
/// honoured, and no state is mutated when one is returned.
#[derive(Debug, Clone, PartialEq)]
pub enum StudyError {
    /// The answer quality is outside `0..=5`.
    InvalidQuality(i64),
    FactNotFound(FactId),
    DeckNotFound(String),
    /// A deck with this name already exists.
    DuplicateDeck(String),
    /// An uploaded deck failed validation.
    InvalidDeck(String),
    /// A fact was requested before any deck was loaded.
    NoDeckLoaded,
    /// A closed session was asked to record something.
    SessionClosed,
}

impl Display for StudyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StudyError::InvalidQuality(q) => {
                write!(f, "invalid quality {q}: must be between 0 and 5.")
            }
            StudyError::FactNotFound(id) => write!(f, "fact {id} not found."),
            StudyError::DeckNotFound(name) => write!(f, "deck '{name}' not found."),
            StudyError::DuplicateDeck(name) => write!(f, "deck '{name}' already exists."),
            StudyError::InvalidDeck(reason) => write!(f, "invalid deck: {reason}"),
            StudyError::NoDeckLoaded => write!(f, "no deck loaded."),
            StudyError::SessionClosed => write!(f, "session is closed."),
        }
    }
}

impl Error for StudyError {}

#[derive(Debug)]
pub struct ErrorReport {
    message: String,
    /// Set when the report was built from a [`StudyError`].
    study: Option<StudyError>,
}

impl ErrorReport {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            study: None,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The domain error behind this report, if any.
    pub fn study_error(&self) -> Option<&StudyError> {
        self.study.as_ref()
    }
}

impl Display for ErrorReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "error: {}", self.message)
    }
}

impl Error for ErrorReport {}

impl From<StudyError> for ErrorReport {
    fn from(value: StudyError) -> Self {
        Self {
            message: value.to_string(),
            study: Some(value),
        }
    }
}

impl From<std::io::Error> for ErrorReport {
    fn from(value: std::io::Error) -> Self {
        ErrorReport::new(format!("I/O error: {value}"))
    }
}

impl From<rusqlite::Error> for ErrorReport {
    fn from(value: rusqlite::Error) -> Self {
        ErrorReport::new(format!("database error: {value}"))
    }
}

impl From<serde_json::Error> for ErrorReport {
    fn from(value: serde_json::Error) -> Self {
        ErrorReport::new(format!("JSON error: {value}"))
    }
}

impl From<toml::de::Error> for ErrorReport {
    fn from(value: toml::de::Error) -> Self {
        ErrorReport::new(format!("config error: {value}"))
    }
}

impl From<walkdir::Error> for ErrorReport {
    fn from(value: walkdir::Error) -> Self {
        ErrorReport::new(format!("directory walk error: {value}"))
    }
}

pub type Fallible<T> = Result<T, ErrorReport>;

pub fn fail<T>(message: impl Into<String>) -> Fallible<T> {
    Err(ErrorReport::new(message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = ErrorReport::new("directory does not exist.");
        assert_eq!(err.to_string(), "error: directory does not exist.");
    }

    #[test]
    fn test_study_error_is_kept() {
        let err: ErrorReport = StudyError::InvalidQuality(7).into();
        assert_eq!(err.study_error(), Some(&StudyError::InvalidQuality(7)));
        assert_eq!(
            err.to_string(),
            "error: invalid quality 7: must be between 0 and 5."
        );
    }

    #[test]
    fn test_plain_error_has_no_study_error() {
        let result: Fallible<()> = fail("boom");
        let err = result.err().unwrap();
        assert!(err.study_error().is_none());
    }
}
