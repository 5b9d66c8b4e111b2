//! Phase 6a: pretty-prints an AST back to canonical VDL source text (spec
//! §4.7).
//!
//! Operates purely on [`crate::ast`] — no `Program` is consulted — so
//! formatting never requires a full analysis pass. Declaration names are
//! re-cased to their canonical convention even when the source used a
//! different one. References to other declarations (field types, spread
//! targets) are re-cased to the same canonical form without a symbol
//! table lookup: a non-primitive `Named` field type is PascalCase'd on
//! the assumption that it names a type/enum/pattern declaration, which is
//! itself always formatted to PascalCase.

mod case;

use crate::ast::{
    Block, Comment, ConstDecl, Deprecated, Docstring, EnumDecl, EnumMember, Field, FieldType,
    FieldTypeBase, Include, Literal, PatternDecl, ProcDecl, RpcChild, RpcDecl, Schema, SchemaItem,
    StreamDecl, TypeChild, TypeDecl,
};
use case::{to_camel_case, to_pascal_case, to_upper_snake_case};

const INDENT: &str = "    ";

pub fn format(schema: &Schema) -> String {
    let mut out = String::new();
    let mut first = true;
    for item in &schema.items {
        let inline = matches!(item, SchemaItem::Comment(c) if c.inline);
        if !first && !inline {
            out.push('\n');
        }
        first = false;
        format_item(&mut out, item, "");
        if !inline {
            out.push('\n');
        }
    }
    out
}

fn format_item(out: &mut String, item: &SchemaItem, indent: &str) {
    match item {
        SchemaItem::Include(inc) => format_include(out, inc, indent),
        SchemaItem::Comment(c) => format_comment(out, c, indent),
        SchemaItem::Docstring(d) => format_docstring(out, d, indent),
        SchemaItem::Type(t) => format_type(out, t, indent),
        SchemaItem::Const(c) => format_const(out, c, indent),
        SchemaItem::Enum(e) => format_enum(out, e, indent),
        SchemaItem::Pattern(p) => format_pattern(out, p, indent),
        SchemaItem::Rpc(r) => format_rpc(out, r, indent),
    }
}

fn format_include(out: &mut String, inc: &Include, indent: &str) {
    out.push_str(indent);
    out.push_str(&format!("include \"{}\"\n", inc.path));
}

fn format_comment(out: &mut String, c: &Comment, indent: &str) {
    if c.inline && out.ends_with('\n') {
        out.pop();
        if c.block {
            out.push_str(&format!(" /* {} */\n", c.text.trim()));
        } else {
            out.push_str(&format!(" // {}\n", c.text.trim_end()));
        }
        return;
    }
    out.push_str(indent);
    if c.block {
        out.push_str(&format!("/* {} */\n", c.text.trim()));
    } else {
        out.push_str(&format!("// {}\n", c.text.trim_end()));
    }
}

fn format_docstring(out: &mut String, d: &Docstring, indent: &str) {
    render_docstring_block(out, &d.raw, indent);
}

fn render_docstring_block(out: &mut String, raw: &str, indent: &str) {
    if !raw.contains('\n') {
        out.push_str(indent);
        out.push_str(&format!("\"\"\" {} \"\"\"\n", raw.trim()));
        return;
    }
    out.push_str(indent);
    out.push_str("\"\"\"\n");
    for line in dedent(raw) {
        if line.is_empty() {
            out.push('\n');
        } else {
            out.push_str(indent);
            out.push_str(&line);
            out.push('\n');
        }
    }
    out.push_str(indent);
    out.push_str("\"\"\"\n");
}

fn dedent(raw: &str) -> Vec<String> {
    let lines: Vec<&str> = raw.lines().collect();
    let indent = lines
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);
    lines.iter().map(|l| l.get(indent..).unwrap_or(l.trim_start()).to_string()).collect()
}

fn format_deprecated(out: &mut String, dep: &Deprecated, indent: &str) {
    out.push_str(indent);
    match &dep.message {
        Some(msg) => out.push_str(&format!("deprecated(\"{msg}\")\n")),
        None => out.push_str("deprecated\n"),
    }
}

fn format_leading(out: &mut String, docstring: &Option<Docstring>, deprecated: &Option<Deprecated>, indent: &str) {
    if let Some(d) = docstring {
        format_docstring(out, d, indent);
    }
    if let Some(dep) = deprecated {
        format_deprecated(out, dep, indent);
    }
}

fn format_type(out: &mut String, t: &TypeDecl, indent: &str) {
    format_leading(out, &t.docstring, &t.deprecated, indent);
    out.push_str(indent);
    out.push_str(&format!("type {} {{\n", to_pascal_case(&t.name)));
    format_type_children(out, &t.children, &format!("{indent}{INDENT}"));
    out.push_str(indent);
    out.push_str("}\n");
}

fn format_type_children(out: &mut String, children: &[TypeChild], indent: &str) {
    for child in children {
        match child {
            TypeChild::Field(f) => format_field(out, f, indent),
            TypeChild::Comment(c) => format_comment(out, c, indent),
            TypeChild::Spread(s) => {
                out.push_str(indent);
                out.push_str(&format!("...{}\n", to_pascal_case(&s.type_name)));
            }
        }
    }
}

fn format_field(out: &mut String, f: &Field, indent: &str) {
    if let Some(d) = &f.docstring {
        format_docstring(out, d, indent);
    }
    out.push_str(indent);
    let opt = if f.optional { "?" } else { "" };
    out.push_str(&format!("{}{} {}\n", to_camel_case(&f.name), opt, format_field_type(&f.field_type, indent)));
}

fn format_field_type(ft: &FieldType, indent: &str) -> String {
    let mut rendered = match &ft.base {
        FieldTypeBase::Named(n) if FieldTypeBase::is_primitive_named(n) => n.clone(),
        FieldTypeBase::Named(n) => to_pascal_case(n),
        FieldTypeBase::Map(inner) => format!("map<{}>", format_field_type(inner, indent)),
        FieldTypeBase::Object(children) => format_inline_object(children, indent),
    };
    rendered.push_str(&"[]".repeat(ft.array_dims));
    rendered
}

fn format_inline_object(children: &[TypeChild], indent: &str) -> String {
    let inner_indent = format!("{indent}{INDENT}");
    let mut body = String::new();
    format_type_children(&mut body, children, &inner_indent);
    format!("{{\n{body}{indent}}}")
}

fn literal_text(lit: &Literal) -> String {
    match lit {
        Literal::Str(s) => format!("\"{s}\""),
        Literal::Int(i) => i.to_string(),
        Literal::Float(f) => f.to_string(),
        Literal::Bool(b) => b.to_string(),
    }
}

fn format_const(out: &mut String, c: &ConstDecl, indent: &str) {
    format_leading(out, &c.docstring, &c.deprecated, indent);
    out.push_str(indent);
    out.push_str(&format!("const {} = {}\n", to_upper_snake_case(&c.name), literal_text(&c.value)));
}

fn format_enum(out: &mut String, e: &EnumDecl, indent: &str) {
    format_leading(out, &e.docstring, &e.deprecated, indent);
    out.push_str(indent);
    out.push_str(&format!("enum {} {{\n", to_pascal_case(&e.name)));
    let inner_indent = format!("{indent}{INDENT}");
    for m in &e.members {
        format_enum_member(out, m, &inner_indent);
    }
    out.push_str(indent);
    out.push_str("}\n");
}

fn format_enum_member(out: &mut String, m: &EnumMember, indent: &str) {
    if let Some(d) = &m.docstring {
        format_docstring(out, d, indent);
    }
    out.push_str(indent);
    match &m.value {
        Some(v) => out.push_str(&format!("{} = {}\n", to_pascal_case(&m.name), literal_text(v))),
        None => out.push_str(&format!("{}\n", to_pascal_case(&m.name))),
    }
}

fn format_pattern(out: &mut String, p: &PatternDecl, indent: &str) {
    format_leading(out, &p.docstring, &p.deprecated, indent);
    out.push_str(indent);
    out.push_str(&format!("pattern {} = \"{}\"\n", to_pascal_case(&p.name), p.template));
}

fn format_rpc(out: &mut String, r: &RpcDecl, indent: &str) {
    format_leading(out, &r.docstring, &r.deprecated, indent);
    out.push_str(indent);
    out.push_str(&format!("rpc {} {{\n", to_pascal_case(&r.name)));
    let inner_indent = format!("{indent}{INDENT}");
    let mut first = true;
    for child in &r.children {
        let inline = matches!(child, RpcChild::Comment(c) if c.inline);
        if !first && !inline {
            out.push('\n');
        }
        first = false;
        match child {
            RpcChild::Proc(p) => format_proc(out, p, &inner_indent),
            RpcChild::Stream(s) => format_stream(out, s, &inner_indent),
            RpcChild::Comment(c) => format_comment(out, c, &inner_indent),
            RpcChild::Docstring(d) => format_docstring(out, d, &inner_indent),
        }
    }
    out.push_str(indent);
    out.push_str("}\n");
}

fn format_proc(out: &mut String, p: &ProcDecl, indent: &str) {
    format_leading(out, &p.docstring, &p.deprecated, indent);
    out.push_str(indent);
    out.push_str(&format!("proc {} {{\n", to_pascal_case(&p.name)));
    format_block(out, p.primary_input(), "input", &format!("{indent}{INDENT}"));
    format_block(out, p.primary_output(), "output", &format!("{indent}{INDENT}"));
    out.push_str(indent);
    out.push_str("}\n");
}

fn format_stream(out: &mut String, s: &StreamDecl, indent: &str) {
    format_leading(out, &s.docstring, &s.deprecated, indent);
    out.push_str(indent);
    out.push_str(&format!("stream {} {{\n", to_pascal_case(&s.name)));
    format_block(out, s.primary_input(), "input", &format!("{indent}{INDENT}"));
    format_block(out, s.primary_output(), "output", &format!("{indent}{INDENT}"));
    out.push_str(indent);
    out.push_str("}\n");
}

fn format_block(out: &mut String, block: Option<&Block>, keyword: &str, indent: &str) {
    let Some(block) = block else { return };
    out.push_str(indent);
    out.push_str(&format!("{keyword} {{\n"));
    format_type_children(out, &block.children, &format!("{indent}{INDENT}"));
    out.push_str(indent);
    out.push_str("}\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser;

    fn roundtrip(src: &str) -> String {
        let schema = parser::parse("a.vdl", src).unwrap();
        format(&schema)
    }

    #[test]
    fn formats_a_simple_type() {
        let out = roundtrip("type user {\n    id string\n    name? string\n}\n");
        assert_eq!(out, "type User {\n    id string\n    name? string\n}\n");
    }

    #[test]
    fn reenforces_const_and_field_case() {
        let out = roundtrip("type t {\n    user_id string\n}\nconst max_size = 10\n");
        assert!(out.contains("userId string"));
        assert!(out.contains("MAX_SIZE = 10"));
    }

    #[test]
    fn format_is_idempotent() {
        let src = "type User {\n    id string\n    tags string[]\n}\n\nenum Status {\n    Active\n    Inactive\n}\n";
        let schema = parser::parse("a.vdl", src).unwrap();
        let once = format(&schema);
        let twice_schema = parser::parse("a.vdl", &once).unwrap();
        let twice = format(&twice_schema);
        assert_eq!(once, twice);
    }

    #[test]
    fn renders_array_and_map_field_types() {
        let out = roundtrip("type t {\n    ids int[]\n    scores map<float>\n}\n");
        assert!(out.contains("ids int[]"));
        assert!(out.contains("scores map<float>"));
    }

    #[test]
    fn inline_comment_stays_on_the_same_line_as_the_field() {
        let out = roundtrip("type User {\n    id string // the id\n    name string\n}\n");
        assert!(out.contains("id string // the id\n"));
        assert!(!out.contains("\n    // the id\n"));
    }

    #[test]
    fn standalone_comment_on_its_own_line_stays_on_its_own_line() {
        let out = roundtrip("type User {\n    // a standalone note\n    id string\n}\n");
        assert!(out.contains("// a standalone note\n    id string\n"));
    }

    #[test]
    fn inline_comment_round_trip_is_idempotent() {
        let src = "type User {\n    id string // the id\n    name string\n}\n";
        let schema = parser::parse("a.vdl", src).unwrap();
        let once = format(&schema);
        let twice_schema = parser::parse("a.vdl", &once).unwrap();
        let twice = format(&twice_schema);
        assert_eq!(once, twice);
    }

    #[test]
    fn recases_field_type_references_to_match_the_declaration() {
        let out = roundtrip("type base_profile {\n    bio string\n}\ntype User {\n    profile base_profile\n}\n");
        assert!(out.contains("type BaseProfile"));
        assert!(out.contains("profile BaseProfile"));
        assert!(!out.contains("base_profile"));
    }

    #[test]
    fn renders_multiline_docstring_as_block() {
        let src = "\"\"\"\nfirst\nsecond\n\"\"\"\ntype T {\n    a string\n}\n";
        let out = roundtrip(src);
        assert!(out.contains("\"\"\"\nfirst\nsecond\n\"\"\""));
    }
}
