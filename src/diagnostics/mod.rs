//! Diagnostic model: first-class values produced alongside results, never
//! thrown across layer boundaries (spec §4.5 taxonomy, §6 wire format, §7).

mod code;

pub use code::DiagnosticCode;

use crate::position::{Position, Range};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
}

/// `{file, start, end, code, message}` — the structured record consumed by
/// the LSP (spec §6). [`fmt::Display`] renders the stable wire string
/// `"{file}:{line}:{col}: error[{Code}]: {message}"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub file: String,
    pub start: Position,
    pub end: Position,
    pub code: DiagnosticCode,
    pub message: String,
    pub severity: Severity,
}

impl Diagnostic {
    pub fn new(range: &Range, code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            file: range.start.filename.clone(),
            start: range.start.clone(),
            end: range.end.clone(),
            code,
            message: message.into(),
            severity: Severity::Error,
        }
    }

    pub fn warning(range: &Range, code: DiagnosticCode, message: impl Into<String>) -> Self {
        let mut d = Self::new(range, code, message);
        d.severity = Severity::Warning;
        d
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(
            f,
            "{}:{}:{}: {}[{}]: {}",
            self.file, self.start.line, self.start.column, level, self.code, self.message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_stable_wire_string() {
        let range = Range::new(
            Position::new("a.vdl", 3, 5, 10),
            Position::new("a.vdl", 3, 12, 17),
        );
        let d = Diagnostic::new(&range, DiagnosticCode::E201UndeclaredType, "undeclared type `Profile`");
        assert_eq!(
            d.to_string(),
            "a.vdl:3:5: error[E201]: undeclared type `Profile`"
        );
    }
}
