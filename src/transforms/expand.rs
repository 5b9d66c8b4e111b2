//! Inlines every non-primitive `Named` field reference with a copy of the
//! referenced type's body, recursing into inline objects and map values,
//! and flattens spreads (spec §4.8 "Expand").
//!
//! A reference is only inlined against the `Schema`'s own top-level types —
//! this is a single-file, not a whole-program, transform; callers that need
//! cross-file expansion should run [`super::merge`] first.

use crate::ast::{Field, FieldType, FieldTypeBase, RpcChild, Schema, SchemaItem, TypeChild, TypeDecl};
use std::collections::{HashMap, HashSet};

pub fn expand(schema: &Schema) -> Schema {
    let types: HashMap<String, TypeDecl> = schema
        .items
        .iter()
        .filter_map(|i| match i {
            SchemaItem::Type(t) => Some((t.name.clone(), t.clone())),
            _ => None,
        })
        .collect();

    let items = schema.items.iter().map(|item| expand_item(item, &types)).collect();
    Schema { items }
}

fn expand_item(item: &SchemaItem, types: &HashMap<String, TypeDecl>) -> SchemaItem {
    match item {
        SchemaItem::Type(t) => {
            let mut visited = HashSet::new();
            visited.insert(t.name.clone());
            SchemaItem::Type(TypeDecl { children: expand_children(&t.children, types, &mut visited), ..t.clone() })
        }
        SchemaItem::Rpc(r) => {
            let children = r
                .children
                .iter()
                .map(|c| match c {
                    RpcChild::Proc(p) => {
                        let mut p = p.clone();
                        for block in p.input.iter_mut().chain(p.output.iter_mut()) {
                            let mut visited = HashSet::new();
                            block.children = expand_children(&block.children, types, &mut visited);
                        }
                        RpcChild::Proc(p)
                    }
                    RpcChild::Stream(s) => {
                        let mut s = s.clone();
                        for block in s.input.iter_mut().chain(s.output.iter_mut()) {
                            let mut visited = HashSet::new();
                            block.children = expand_children(&block.children, types, &mut visited);
                        }
                        RpcChild::Stream(s)
                    }
                    other => other.clone(),
                })
                .collect();
            SchemaItem::Rpc(crate::ast::RpcDecl { children, ..r.clone() })
        }
        other => other.clone(),
    }
}

fn expand_children(children: &[TypeChild], types: &HashMap<String, TypeDecl>, visited: &mut HashSet<String>) -> Vec<TypeChild> {
    let mut out = Vec::new();
    for child in children {
        match child {
            TypeChild::Field(f) => out.push(TypeChild::Field(expand_field(f, types, visited))),
            TypeChild::Comment(c) => out.push(TypeChild::Comment(c.clone())),
            TypeChild::Spread(s) => match types.get(&s.type_name) {
                Some(target) if !visited.contains(&s.type_name) => {
                    visited.insert(s.type_name.clone());
                    out.extend(expand_children(&target.children, types, visited));
                    visited.remove(&s.type_name);
                }
                _ => out.push(TypeChild::Spread(s.clone())),
            },
        }
    }
    out
}

fn expand_field(f: &Field, types: &HashMap<String, TypeDecl>, visited: &mut HashSet<String>) -> Field {
    Field { field_type: expand_field_type(&f.field_type, types, visited), ..f.clone() }
}

fn expand_field_type(ft: &FieldType, types: &HashMap<String, TypeDecl>, visited: &mut HashSet<String>) -> FieldType {
    FieldType { base: expand_base(&ft.base, types, visited), array_dims: ft.array_dims }
}

fn expand_base(base: &FieldTypeBase, types: &HashMap<String, TypeDecl>, visited: &mut HashSet<String>) -> FieldTypeBase {
    match base {
        FieldTypeBase::Named(n) => {
            if FieldTypeBase::is_primitive_named(n) || visited.contains(n) {
                return FieldTypeBase::Named(n.clone());
            }
            match types.get(n) {
                Some(target) => {
                    visited.insert(n.clone());
                    let children = expand_children(&target.children, types, visited);
                    visited.remove(n);
                    FieldTypeBase::Object(children)
                }
                // Not a known type in this schema (an enum, or unresolved) — leave as a reference.
                None => FieldTypeBase::Named(n.clone()),
            }
        }
        FieldTypeBase::Map(inner) => FieldTypeBase::Map(Box::new(expand_field_type(inner, types, visited))),
        FieldTypeBase::Object(children) => FieldTypeBase::Object(expand_children(children, types, visited)),
    }
}
