//! Parser error type.
//!
//! Per spec §4.3: the first structural error in a file is reported with
//! precise positions, but does not abort the repo-level pipeline — the
//! resolver treats a failed file as contributing no declarations and keeps
//! walking the rest of the include graph.

use crate::position::Range;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
#[error("{range}: {message}")]
pub struct ParseError {
    pub range: Range,
    pub message: String,
}

impl ParseError {
    pub fn new(range: Range, message: impl Into<String>) -> Self {
        Self {
            range,
            message: message.into(),
        }
    }
}
