//! IR-level universal properties (spec §8 properties 3 and 4): multi-level
//! spread flattening order, and determinism of repeated builds from the same
//! `Program`.

use std::path::PathBuf;
use vdl::{analyzer, resolver, vfs::VirtualFileSystem};

fn build_program(src: &str) -> analyzer::Program {
    let vfs = VirtualFileSystem::new();
    let entry = PathBuf::from("/main.vdl");
    vfs.open(&entry, src.to_string());
    let (file_set, diagnostics) = resolver::resolve(&vfs, &entry);
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    let (program, diagnostics) = analyzer::analyze(&file_set);
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    program
}

#[test]
fn building_the_same_program_twice_yields_byte_identical_ir() {
    let program = build_program(
        "type Base {\n    id string\n}\ntype User {\n    ...Base\n    name string\n}\nenum Status {\n    Active\n    Inactive\n}\n",
    );
    let first = vdl::ir::build(&program);
    let second = vdl::ir::build(&program);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn three_level_spread_chain_flattens_depth_first_in_position() {
    let src = "\
type A {
    a string
}
type B {
    ...A
    b string
}
type C {
    ...B
    c string
}
";
    let program = build_program(src);
    let ir = vdl::ir::build(&program);
    let c = ir.types.iter().find(|t| t.name == "C").unwrap();
    let names: Vec<&str> = c.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b", "c"]);
}

#[test]
fn multiple_spreads_in_one_type_flatten_in_declaration_order() {
    let src = "\
type Left {
    l string
}
type Right {
    r string
}
type Both {
    ...Left
    ...Right
    own string
}
";
    let program = build_program(src);
    let ir = vdl::ir::build(&program);
    let both = ir.types.iter().find(|t| t.name == "Both").unwrap();
    let names: Vec<&str> = both.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["l", "r", "own"]);
}

#[test]
fn spread_inside_a_nested_object_field_flattens_too() {
    let src = "\
type Coords {
    lat float
}
type Place {
    location {
        ...Coords
        label string
    }
}
";
    let program = build_program(src);
    let ir = vdl::ir::build(&program);
    let place = ir.types.iter().find(|t| t.name == "Place").unwrap();
    let location = &place.fields[0];
    let vdl::ir::FieldTypeBase::Object { fields } = &location.field_type.base else {
        panic!("expected an object field type")
    };
    let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["lat", "label"]);
}

#[test]
fn ir_lists_are_sorted_regardless_of_declaration_order() {
    let program = build_program(
        "type Zebra {\n    a string\n}\nconst ZEE = 1\nconst AYE = 2\ntype Apple {\n    a string\n}\n",
    );
    let ir = vdl::ir::build(&program);
    let type_names: Vec<&str> = ir.types.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(type_names, vec!["Apple", "Zebra"]);
    let const_names: Vec<&str> = ir.consts.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(const_names, vec!["AYE", "ZEE"]);
}
