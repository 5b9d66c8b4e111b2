//! IR data model (spec §4.6, §6 "IR JSON Schema").
//!
//! Every type here derives `JsonSchema` so [`crate::ir::builder::json_schema`]
//! can produce the wire schema by reflection instead of hand-maintaining a
//! parallel schema document.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Primitive {
    String,
    Int,
    Float,
    Bool,
    /// Maps to JSON Schema `{"type": "string", "format": "date-time"}`.
    Datetime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldTypeBase {
    Primitive { name: Primitive },
    /// A resolved reference to a registered type or enum name.
    Named { name: String },
    Map { value: Box<FieldType> },
    Object { fields: Vec<Field> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FieldType {
    #[serde(flatten)]
    pub base: FieldTypeBase,
    pub array_dims: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Field {
    pub name: String,
    pub doc: Option<String>,
    pub optional: bool,
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Type {
    pub name: String,
    pub doc: Option<String>,
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    String,
    Int,
    Float,
    Bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EnumMember {
    pub name: String,
    pub doc: Option<String>,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Enum {
    pub name: String,
    pub doc: Option<String>,
    pub value_type: ValueKind,
    pub members: Vec<EnumMember>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Const {
    pub name: String,
    pub doc: Option<String>,
    pub value_type: ValueKind,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Pattern {
    pub name: String,
    pub doc: Option<String>,
    pub template: String,
    pub placeholders: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Rpc {
    pub name: String,
    pub doc: Option<String>,
}

/// A hoisted proc/stream record. `id` is `{rpc_name}_{name}` (spec §9 Open
/// Question, resolved in DESIGN.md).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Procedure {
    pub id: String,
    pub rpc_name: String,
    pub name: String,
    pub doc: Option<String>,
    pub input: Vec<Field>,
    pub output: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Stream {
    pub id: String,
    pub rpc_name: String,
    pub name: String,
    pub doc: Option<String>,
    pub input: Vec<Field>,
    pub output: Vec<Field>,
}

/// The flattened intermediate representation handed to generators.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Ir {
    pub types: Vec<Type>,
    pub enums: Vec<Enum>,
    pub consts: Vec<Const>,
    pub patterns: Vec<Pattern>,
    pub rpcs: Vec<Rpc>,
    pub procedures: Vec<Procedure>,
    pub streams: Vec<Stream>,
}
