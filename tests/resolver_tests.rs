//! Include-graph properties: topology (spec §8 property 9) and merge
//! behavior under cycles, exercised against the resolver and the merge
//! transform together since merge is the only consumer of `FileSet.includes`.

use std::path::PathBuf;
use vdl::ast::SchemaItem;
use vdl::{resolver, transforms, vfs::VirtualFileSystem};

#[test]
fn include_topology_places_base_declarations_first() {
    let vfs = VirtualFileSystem::new();
    let base = PathBuf::from("/base.vdl");
    let main = PathBuf::from("/main.vdl");
    vfs.open(&base, "type Base {\n    id string\n}\n");
    vfs.open(&main, "include \"base.vdl\"\ntype User {\n    ...Base\n}\n");

    let (file_set, diagnostics) = resolver::resolve(&vfs, &main);
    assert!(diagnostics.is_empty(), "{diagnostics:?}");

    let merged = transforms::merge(&file_set);
    assert_eq!(merged.items.len(), 2);
    assert!(matches!(&merged.items[0], SchemaItem::Type(t) if t.name == "Base"));
    assert!(matches!(&merged.items[1], SchemaItem::Type(t) if t.name == "User"));
}

#[test]
fn diamond_include_contributes_the_shared_base_once() {
    let vfs = VirtualFileSystem::new();
    let base = PathBuf::from("/base.vdl");
    let left = PathBuf::from("/left.vdl");
    let right = PathBuf::from("/right.vdl");
    let main = PathBuf::from("/main.vdl");
    vfs.open(&base, "type Base {\n    id string\n}\n");
    vfs.open(&left, "include \"base.vdl\"\ntype Left {\n    id string\n}\n");
    vfs.open(&right, "include \"base.vdl\"\ntype Right {\n    id string\n}\n");
    vfs.open(&main, "include \"left.vdl\"\ninclude \"right.vdl\"\ntype Main {\n    id string\n}\n");

    let (file_set, diagnostics) = resolver::resolve(&vfs, &main);
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    assert_eq!(file_set.files.len(), 4);

    let merged = transforms::merge(&file_set);
    let base_count = merged
        .items
        .iter()
        .filter(|i| matches!(i, SchemaItem::Type(t) if t.name == "Base"))
        .count();
    assert_eq!(base_count, 1);
    assert_eq!(merged.items.len(), 4);
}

#[test]
fn self_include_is_visited_once() {
    let vfs = VirtualFileSystem::new();
    let main = PathBuf::from("/main.vdl");
    vfs.open(&main, "include \"main.vdl\"\ntype A {\n    id string\n}\n");

    let (file_set, diagnostics) = resolver::resolve(&vfs, &main);
    assert!(diagnostics.iter().any(|d| d.code == vdl::diagnostics::DiagnosticCode::E002CircularInclude));
    assert_eq!(file_set.files.len(), 1);

    let merged = transforms::merge(&file_set);
    assert_eq!(merged.items.len(), 1);
}
