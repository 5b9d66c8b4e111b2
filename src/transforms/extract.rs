//! Returns a minimal `Schema` containing only the requested declaration
//! (spec §4.8 "Extract"), used by the playground and LSP to show a single
//! declaration's source without the whole file.

use crate::ast::{RpcChild, RpcDecl, Schema, SchemaItem};

/// What to extract. Procs/streams carry their enclosing RPC's name since a
/// proc by itself is meaningless without its `rpc` scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Type(String),
    Const(String),
    Enum(String),
    Pattern(String),
    Rpc(String),
    Proc(String, String),
    Stream(String, String),
}

pub fn extract(schema: &Schema, target: &Target) -> Option<Schema> {
    let item = match target {
        Target::Type(name) => find(schema, |i| matches!(i, SchemaItem::Type(t) if &t.name == name)),
        Target::Const(name) => find(schema, |i| matches!(i, SchemaItem::Const(c) if &c.name == name)),
        Target::Enum(name) => find(schema, |i| matches!(i, SchemaItem::Enum(e) if &e.name == name)),
        Target::Pattern(name) => find(schema, |i| matches!(i, SchemaItem::Pattern(p) if &p.name == name)),
        Target::Rpc(name) => find(schema, |i| matches!(i, SchemaItem::Rpc(r) if &r.name == name)),
        Target::Proc(rpc_name, proc_name) => extract_member(schema, rpc_name, |c| {
            matches!(c, RpcChild::Proc(p) if &p.name == proc_name)
        }),
        Target::Stream(rpc_name, stream_name) => extract_member(schema, rpc_name, |c| {
            matches!(c, RpcChild::Stream(s) if &s.name == stream_name)
        }),
    }?;
    Some(Schema { items: vec![item] })
}

fn find(schema: &Schema, pred: impl Fn(&SchemaItem) -> bool) -> Option<SchemaItem> {
    schema.items.iter().find(|i| pred(i)).cloned()
}

fn extract_member(schema: &Schema, rpc_name: &str, pred: impl Fn(&RpcChild) -> bool) -> Option<SchemaItem> {
    let rpc = schema.items.iter().find_map(|i| match i {
        SchemaItem::Rpc(r) if r.name == rpc_name => Some(r),
        _ => None,
    })?;
    let member = rpc.children.iter().find(|c| pred(c))?.clone();
    Some(SchemaItem::Rpc(RpcDecl {
        range: rpc.range.clone(),
        docstring: rpc.docstring.clone(),
        deprecated: rpc.deprecated.clone(),
        name: rpc.name.clone(),
        children: vec![member],
    }))
}
