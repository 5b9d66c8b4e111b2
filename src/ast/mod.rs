//! Abstract Syntax Tree: syntax-level, one-to-one with source text (spec §3).
//!
//! Every node carries a [`Range`]; the IR (see [`crate::ir`]) strips these
//! entirely once symbols are resolved ("source amnesia", spec §3).

use crate::position::Range;
use serde::{Deserialize, Serialize};

/// A docstring's resolved form: either the literal text as written, or a
/// path that the Resolver inlined the content of (spec §4.4). Both variants
/// keep the range of the *original* docstring token for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Docstring {
    pub range: Range,
    /// Raw token text as lexed (before any `.md` resolution).
    pub raw: String,
    /// Resolved text: `raw` itself for inline docstrings, or the inlined
    /// file content when `raw` was a `.md` path the Resolver could read.
    pub resolved: String,
    /// Set when `raw` looked like a `path/to/file.md` token, regardless of
    /// whether resolution succeeded.
    pub external_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub range: Range,
    pub text: String,
    pub block: bool,
    /// Set when this comment immediately follows a preceding sibling on the
    /// same source line (no newline token between them), as opposed to
    /// standing on its own line.
    pub inline: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deprecated {
    pub range: Range,
    pub message: Option<String>,
}

/// A top-level `include "path"` statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Include {
    pub range: Range,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldType {
    pub base: FieldTypeBase,
    pub array_dims: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldTypeBase {
    /// A bare identifier: either a primitive (`string`, `int`, `float`,
    /// `bool`, `datetime`) or a reference to a user type/enum, resolved
    /// later by the analyzer.
    Named(String),
    Map(Box<FieldType>),
    Object(Vec<TypeChild>),
}

pub const PRIMITIVE_NAMES: [&str; 5] = ["string", "int", "float", "bool", "datetime"];

impl FieldTypeBase {
    pub fn is_primitive_named(name: &str) -> bool {
        PRIMITIVE_NAMES.contains(&name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub range: Range,
    pub docstring: Option<Docstring>,
    pub name: String,
    pub optional: bool,
    pub field_type: FieldType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spread {
    pub range: Range,
    pub type_name: String,
}

/// A child of a `type` body, an inline object, or an RPC input/output block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TypeChild {
    Field(Field),
    Comment(Comment),
    Spread(Spread),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDecl {
    pub range: Range,
    pub docstring: Option<Docstring>,
    pub deprecated: Option<Deprecated>,
    pub name: String,
    pub children: Vec<TypeChild>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumMember {
    pub range: Range,
    pub docstring: Option<Docstring>,
    pub name: String,
    pub value: Option<Literal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumDecl {
    pub range: Range,
    pub docstring: Option<Docstring>,
    pub deprecated: Option<Deprecated>,
    pub name: String,
    pub members: Vec<EnumMember>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstDecl {
    pub range: Range,
    pub docstring: Option<Docstring>,
    pub deprecated: Option<Deprecated>,
    pub name: String,
    pub value: Literal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternDecl {
    pub range: Range,
    pub docstring: Option<Docstring>,
    pub deprecated: Option<Deprecated>,
    pub name: String,
    pub template: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub range: Range,
    pub children: Vec<TypeChild>,
}

/// `input`/`output` are `Vec` rather than `Option` so the analyzer can
/// detect and report "more than one input/output block" (E701/E702,
/// spec §4.5) as a semantic diagnostic rather than a syntax error: the
/// grammar itself tolerates repetition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcDecl {
    pub range: Range,
    pub docstring: Option<Docstring>,
    pub deprecated: Option<Deprecated>,
    pub name: String,
    pub input: Vec<Block>,
    pub output: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamDecl {
    pub range: Range,
    pub docstring: Option<Docstring>,
    pub deprecated: Option<Deprecated>,
    pub name: String,
    pub input: Vec<Block>,
    pub output: Vec<Block>,
}

impl ProcDecl {
    pub fn primary_input(&self) -> Option<&Block> {
        self.input.first()
    }
    pub fn primary_output(&self) -> Option<&Block> {
        self.output.first()
    }
}

impl StreamDecl {
    pub fn primary_input(&self) -> Option<&Block> {
        self.input.first()
    }
    pub fn primary_output(&self) -> Option<&Block> {
        self.output.first()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RpcChild {
    Proc(ProcDecl),
    Stream(StreamDecl),
    Comment(Comment),
    Docstring(Docstring),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcDecl {
    pub range: Range,
    pub docstring: Option<Docstring>,
    pub deprecated: Option<Deprecated>,
    pub name: String,
    pub children: Vec<RpcChild>,
}

/// A top-level item of a [`Schema`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SchemaItem {
    Include(Include),
    Comment(Comment),
    Docstring(Docstring),
    Type(TypeDecl),
    Const(ConstDecl),
    Enum(EnumDecl),
    Pattern(PatternDecl),
    Rpc(RpcDecl),
}

/// A parsed file: an ordered sequence of top-level items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Schema {
    pub items: Vec<SchemaItem>,
}

impl Schema {
    pub fn includes(&self) -> impl Iterator<Item = &Include> {
        self.items.iter().filter_map(|i| match i {
            SchemaItem::Include(inc) => Some(inc),
            _ => None,
        })
    }
}
