//! Formatter universal properties (spec §8 properties 2 and 7): idempotence
//! and naming re-enforcement, exercised with `proptest` over a small
//! generated grammar of valid VDL sources so the property is checked across
//! many shapes rather than a handful of hand-picked examples.

use proptest::prelude::*;
use vdl::{formatter, parser};

fn format_twice(src: &str) -> (String, String) {
    let once = formatter::format(&parser::parse("a.vdl", src).unwrap());
    let reparsed = parser::parse("a.vdl", &once).unwrap();
    let twice = formatter::format(&reparsed);
    (once, twice)
}

const KEYWORDS: &[&str] = &[
    "include", "const", "enum", "type", "pattern", "rpc", "proc", "stream", "input", "output",
    "deprecated", "map", "string", "int", "float", "bool", "datetime", "true", "false",
];

fn identifier() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,8}".prop_filter("must not be a VDL keyword", |s| !KEYWORDS.contains(&s.as_str()))
}

fn primitive() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("string"),
        Just("int"),
        Just("float"),
        Just("bool"),
        Just("datetime"),
    ]
}

/// Builds `type {Name} { {field} {primitive} }` from arbitrary
/// (non-canonically-cased, underscore-laden) identifiers, the shape naming
/// re-enforcement is specifically meant to tolerate.
fn arbitrary_single_field_type() -> impl Strategy<Value = String> {
    (identifier(), identifier(), primitive()).prop_map(|(type_name, field_name, prim)| {
        format!("type {type_name} {{\n    {field_name} {prim}\n}}\n")
    })
}

proptest! {
    #[test]
    fn format_is_idempotent_over_generated_single_field_types(src in arbitrary_single_field_type()) {
        let (once, twice) = format_twice(&src);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn formatted_declaration_names_are_always_canonical_case(src in arbitrary_single_field_type()) {
        let (once, _) = format_twice(&src);
        let schema = parser::parse("a.vdl", &once).unwrap();
        let vdl::ast::SchemaItem::Type(t) = &schema.items[0] else { unreachable!() };
        prop_assert!(t.name.chars().next().unwrap().is_ascii_uppercase());
        prop_assert!(!t.name.contains('_'));
        let vdl::ast::TypeChild::Field(f) = &t.children[0] else { unreachable!() };
        prop_assert!(f.name.chars().next().unwrap().is_ascii_lowercase());
        prop_assert!(!f.name.contains('_'));
    }
}

#[test]
fn naming_idempotence_concrete_example() {
    let src = "type user_profile {\n    user_id string\n}\n";
    let (once, twice) = format_twice(src);
    assert!(once.contains("type UserProfile"));
    assert!(once.contains("userId string"));
    assert_eq!(once, twice);
}
