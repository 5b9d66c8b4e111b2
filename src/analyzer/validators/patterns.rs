//! Pattern placeholder validation (spec §4.5 "Patterns").
//!
//! A pattern template is a string literal containing `{name}` placeholders
//! that a codegen backend substitutes at a call site. `{name}` must be a
//! bare identifier; unbalanced braces or malformed placeholder bodies are
//! rejected as E401.

use crate::analyzer::Program;
use crate::diagnostics::{Diagnostic, DiagnosticCode};
use regex::Regex;
use std::sync::OnceLock;

fn placeholder_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap())
}

/// All well-formed placeholder names in `template`, in order of
/// appearance, duplicates included. Malformed placeholders are silently
/// skipped here; [`check`] reports those.
pub fn extract_placeholders(template: &str) -> Vec<String> {
    scan(template).0
}

/// Returns `(valid names, malformed placeholder bodies)`.
fn scan(template: &str) -> (Vec<String>, Vec<String>) {
    let mut valid = Vec::new();
    let mut malformed = Vec::new();
    let mut chars = template.char_indices().peekable();

    while let Some((_, c)) = chars.next() {
        if c != '{' {
            continue;
        }
        let mut body = String::new();
        let mut closed = false;
        for (_, c2) in chars.by_ref() {
            if c2 == '}' {
                closed = true;
                break;
            }
            body.push(c2);
        }
        if !closed {
            malformed.push(body);
            continue;
        }
        if placeholder_name_re().is_match(&body) {
            valid.push(body);
        } else {
            malformed.push(body);
        }
    }

    (valid, malformed)
}

pub fn check(program: &Program, diagnostics: &mut Vec<Diagnostic>) {
    for p in program.patterns.values() {
        let (_, malformed) = scan(&p.template);
        for body in malformed {
            diagnostics.push(Diagnostic::new(
                &p.header.origin.range,
                DiagnosticCode::E401InvalidPlaceholder,
                format!("pattern `{}` has an invalid placeholder `{{{body}}}`", p.header.name),
            ));
        }
        if template_has_unbalanced_close(&p.template) {
            diagnostics.push(Diagnostic::new(
                &p.header.origin.range,
                DiagnosticCode::E401InvalidPlaceholder,
                format!("pattern `{}` has an unmatched `}}`", p.header.name),
            ));
        }
    }
}

fn template_has_unbalanced_close(template: &str) -> bool {
    let mut depth = 0i32;
    for c in template.chars() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth < 0 {
                    return true;
                }
            }
            _ => {}
        }
    }
    false
}
