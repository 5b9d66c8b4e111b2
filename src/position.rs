//! Source positions and ranges.
//!
//! Every AST node carries a [`Range`] so editor tooling and diagnostics can
//! point back at exact source bytes. The IR is "source-amnesiac" (spec §3)
//! and drops these entirely once built.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single point in a source file: 1-based line/column plus a byte offset
/// for fast slicing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub filename: String,
    pub line: usize,
    pub column: usize,
    pub byte_offset: usize,
}

impl Position {
    pub fn new(filename: impl Into<String>, line: usize, column: usize, byte_offset: usize) -> Self {
        Self {
            filename: filename.into(),
            line,
            column,
            byte_offset,
        }
    }

    /// The start-of-file position for `filename`.
    pub fn start_of(filename: impl Into<String>) -> Self {
        Self::new(filename, 1, 1, 0)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.filename, self.line, self.column)
    }
}

/// A half-open range `[start, end)` over a single file's bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// A zero-width range, used for synthetic nodes (e.g. spread-expanded
    /// fields that have no source of their own).
    pub fn point(pos: Position) -> Self {
        Self {
            end: pos.clone(),
            start: pos,
        }
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.start.filename, self.start.line, self.start.column)
    }
}
