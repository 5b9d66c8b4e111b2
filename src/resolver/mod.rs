//! Phase 3: walks `include` statements into a file graph, resolving each
//! path against the VFS, detecting cycles, and inlining external `.md`
//! docstrings (spec §4.4).
//!
//! Best-effort: a missing include, a cyclic include, or a parse failure
//! produces a diagnostic but never aborts resolution of the rest of the
//! graph (spec §7).

use crate::ast::{Schema, SchemaItem};
use crate::diagnostics::{Diagnostic, DiagnosticCode};
use crate::parser;
use crate::position::Range;
use crate::vfs::VirtualFileSystem;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// One resolved file. `ast` is `None` when the file could not be read or
/// failed to parse; the accompanying diagnostic explains why.
#[derive(Debug, Clone)]
pub struct File {
    pub path: PathBuf,
    pub ast: Option<Schema>,
    /// Canonical, resolved include targets, in source order. Used by
    /// [`crate::transforms::merge`] for topological ordering.
    pub includes: Vec<PathBuf>,
}

/// The result of resolving an entry point: every file reached, keyed by
/// canonical absolute path, plus the order files were first visited in
/// (depth-first, spec §5 "Ordering guarantees").
#[derive(Debug, Default)]
pub struct FileSet {
    pub entry_point: PathBuf,
    pub files: HashMap<PathBuf, File>,
    pub visit_order: Vec<PathBuf>,
}

pub fn resolve(vfs: &VirtualFileSystem, entry_path: &Path) -> (FileSet, Vec<Diagnostic>) {
    let mut set = FileSet {
        entry_point: entry_path.to_path_buf(),
        ..FileSet::default()
    };
    let mut diagnostics = Vec::new();
    let mut stack: Vec<PathBuf> = Vec::new();
    let mut visited: HashSet<PathBuf> = HashSet::new();

    resolve_file(vfs, entry_path, &mut set, &mut diagnostics, &mut stack, &mut visited);
    (set, diagnostics)
}

fn resolve_file(
    vfs: &VirtualFileSystem,
    path: &Path,
    set: &mut FileSet,
    diagnostics: &mut Vec<Diagnostic>,
    stack: &mut Vec<PathBuf>,
    visited: &mut HashSet<PathBuf>,
) {
    let path = path.to_path_buf();
    if visited.contains(&path) {
        return;
    }
    visited.insert(path.clone());
    set.visit_order.push(path.clone());
    stack.push(path.clone());

    let filename = path.display().to_string();
    let read = vfs.read_absolute(&path);
    let content = match read {
        Ok(r) => r.content,
        Err(e) => {
            tracing::debug!(path = %filename, error = %e, "resolver: failed to read file");
            let pos = crate::position::Position::start_of(filename.clone());
            diagnostics.push(Diagnostic::new(
                &Range::point(pos),
                DiagnosticCode::E001FileNotFound,
                format!("cannot read `{filename}`: {e}"),
            ));
            set.files.insert(
                path.clone(),
                File { path: path.clone(), ast: None, includes: Vec::new() },
            );
            stack.pop();
            return;
        }
    };

    let mut ast = match parser::parse(&filename, &content) {
        Ok(ast) => ast,
        Err(e) => {
            diagnostics.push(Diagnostic::new(&e.range, DiagnosticCode::E005ParseError, e.message.clone()));
            set.files.insert(
                path.clone(),
                File { path: path.clone(), ast: None, includes: Vec::new() },
            );
            stack.pop();
            return;
        }
    };

    resolve_docstrings(vfs, &path, &mut ast, diagnostics);

    let mut includes = Vec::new();
    for item in &ast.items {
        let SchemaItem::Include(inc) = item else { continue };
        let target = match crate::vfs::resolve_path(Some(&path), &inc.path) {
            Ok(target) => target,
            Err(e) => {
                diagnostics.push(Diagnostic::new(
                    &inc.range,
                    DiagnosticCode::E001FileNotFound,
                    format!("cannot resolve include `{}`: {e}", inc.path),
                ));
                continue;
            }
        };

        if stack.contains(&target) {
            diagnostics.push(Diagnostic::new(
                &inc.range,
                DiagnosticCode::E002CircularInclude,
                format!("circular include: `{}` is already being resolved", target.display()),
            ));
            includes.push(target);
            continue;
        }

        includes.push(target.clone());
        resolve_file(vfs, &target, set, diagnostics, stack, visited);
    }

    set.files.insert(path.clone(), File { path: path.clone(), ast: Some(ast), includes });
    stack.pop();
}

/// Inline any docstring whose trimmed content is a single `*.md` token
/// (spec §4.4). This is the only side-effecting (VFS-touching) step in
/// analysis; every later pass is pure over the in-memory AST.
fn resolve_docstrings(
    vfs: &VirtualFileSystem,
    file_path: &Path,
    ast: &mut Schema,
    diagnostics: &mut Vec<Diagnostic>,
) {
    for item in &mut ast.items {
        walk_item_docstrings(vfs, file_path, item, diagnostics);
    }
}

fn try_resolve_one(
    vfs: &VirtualFileSystem,
    file_path: &Path,
    doc: &mut crate::ast::Docstring,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let Some(rel) = doc.external_path.clone() else { return };
    match vfs.read(Some(file_path), &rel) {
        Ok(result) => doc.resolved = result.content,
        Err(e) => {
            diagnostics.push(Diagnostic::new(
                &doc.range,
                DiagnosticCode::E003ExternalDocstringMissing,
                format!("external docstring `{rel}` could not be read: {e}"),
            ));
        }
    }
}

fn walk_item_docstrings(
    vfs: &VirtualFileSystem,
    file_path: &Path,
    item: &mut SchemaItem,
    diagnostics: &mut Vec<Diagnostic>,
) {
    use crate::ast::*;
    match item {
        SchemaItem::Docstring(d) => try_resolve_one(vfs, file_path, d, diagnostics),
        SchemaItem::Type(t) => {
            if let Some(d) = &mut t.docstring {
                try_resolve_one(vfs, file_path, d, diagnostics);
            }
            for child in &mut t.children {
                walk_type_child_docstrings(vfs, file_path, child, diagnostics);
            }
        }
        SchemaItem::Enum(e) => {
            if let Some(d) = &mut e.docstring {
                try_resolve_one(vfs, file_path, d, diagnostics);
            }
            for m in &mut e.members {
                if let Some(d) = &mut m.docstring {
                    try_resolve_one(vfs, file_path, d, diagnostics);
                }
            }
        }
        SchemaItem::Const(d) => {
            if let Some(d) = &mut d.docstring {
                try_resolve_one(vfs, file_path, d, diagnostics);
            }
        }
        SchemaItem::Pattern(p) => {
            if let Some(d) = &mut p.docstring {
                try_resolve_one(vfs, file_path, d, diagnostics);
            }
        }
        SchemaItem::Rpc(r) => {
            if let Some(d) = &mut r.docstring {
                try_resolve_one(vfs, file_path, d, diagnostics);
            }
            for child in &mut r.children {
                match child {
                    RpcChild::Docstring(d) => try_resolve_one(vfs, file_path, d, diagnostics),
                    RpcChild::Proc(p) => {
                        if let Some(d) = &mut p.docstring {
                            try_resolve_one(vfs, file_path, d, diagnostics);
                        }
                        walk_block_docstrings(vfs, file_path, &mut p.input, diagnostics);
                        walk_block_docstrings(vfs, file_path, &mut p.output, diagnostics);
                    }
                    RpcChild::Stream(s) => {
                        if let Some(d) = &mut s.docstring {
                            try_resolve_one(vfs, file_path, d, diagnostics);
                        }
                        walk_block_docstrings(vfs, file_path, &mut s.input, diagnostics);
                        walk_block_docstrings(vfs, file_path, &mut s.output, diagnostics);
                    }
                    RpcChild::Comment(_) => {}
                }
            }
        }
        SchemaItem::Include(_) | SchemaItem::Comment(_) => {}
    }
}

fn walk_block_docstrings(
    vfs: &VirtualFileSystem,
    file_path: &Path,
    blocks: &mut [crate::ast::Block],
    diagnostics: &mut Vec<Diagnostic>,
) {
    for b in blocks {
        for child in &mut b.children {
            walk_type_child_docstrings(vfs, file_path, child, diagnostics);
        }
    }
}

fn walk_type_child_docstrings(
    vfs: &VirtualFileSystem,
    file_path: &Path,
    child: &mut crate::ast::TypeChild,
    diagnostics: &mut Vec<Diagnostic>,
) {
    use crate::ast::{FieldTypeBase, TypeChild};
    if let TypeChild::Field(f) = child {
        if let Some(d) = &mut f.docstring {
            try_resolve_one(vfs, file_path, d, diagnostics);
        }
        if let FieldTypeBase::Object(children) = &mut f.field_type.base {
            for c in children {
                walk_type_child_docstrings(vfs, file_path, c, diagnostics);
            }
        }
    }
}
