//! VDL: a schema compiler front end for a strongly-typed, include-capable
//! RPC interface-definition language.
//!
//! The pipeline is leaves-first:
//!
//! ```text
//! text ──► lexer ──► parser ──► ast
//!                                 │
//!   vfs ◄── include/docstring reads
//!                                 │
//!                                 ▼
//!                           resolver ──► file set (graph of ASTs)
//!                                 │
//!                                 ▼
//!                           analyzer ──► Program (symbols, diagnostics)
//!                                 │
//!                                 ▼
//!                           ir ──► flattened, deterministic IR
//! ```
//!
//! [`formatter`] and [`transforms`] operate on the AST in both directions
//! and are independent of the rest of the pipeline. Diagnostics are
//! first-class values returned alongside best-effort results; nothing in
//! this crate aborts the pipeline on user-input errors (see [`error`]).

pub mod analyzer;
pub mod ast;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod formatter;
pub mod ir;
pub mod lexer;
pub mod parser;
pub mod position;
pub mod resolver;
pub mod transforms;
pub mod vfs;

pub use analyzer::Program;
pub use diagnostics::Diagnostic;
pub use error::VdlError;
pub use ir::Ir;
pub use vfs::VirtualFileSystem;

use std::path::Path;

/// Runs the full front end — resolve, analyze, build IR — against one
/// entry point. Best-effort throughout: diagnostics accumulate from every
/// stage rather than short-circuiting the pipeline (spec §7).
pub fn compile(vfs: &VirtualFileSystem, entry_path: &Path) -> (Program, Ir, Vec<Diagnostic>) {
    let (file_set, mut diagnostics) = resolver::resolve(vfs, entry_path);
    let (program, analyzer_diagnostics) = analyzer::analyze(&file_set);
    diagnostics.extend(analyzer_diagnostics);
    let ir = ir::build(&program);
    (program, ir, diagnostics)
}
