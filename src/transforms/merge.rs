//! Flattens a resolved [`FileSet`](crate::resolver::FileSet) into a single,
//! `include`-free `Schema` in topological order: an included file's
//! declarations appear before the including file's (spec §4.8 "Merge").
//!
//! A cycle (already diagnosed by the Resolver as E002) is handled by the
//! same visited-set discipline: a re-entered file contributes nothing the
//! second time, so merging always terminates.

use crate::ast::{Schema, SchemaItem};
use crate::resolver::FileSet;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub fn merge(file_set: &FileSet) -> Schema {
    let mut visited = HashSet::new();
    let mut items = Vec::new();
    merge_file(file_set, &file_set.entry_point, &mut visited, &mut items);
    Schema { items }
}

fn merge_file(file_set: &FileSet, path: &Path, visited: &mut HashSet<PathBuf>, items: &mut Vec<SchemaItem>) {
    if !visited.insert(path.to_path_buf()) {
        return;
    }
    let Some(file) = file_set.files.get(path) else { return };
    let Some(ast) = &file.ast else { return };

    for include in &file.includes {
        merge_file(file_set, include, visited, items);
    }
    items.extend(ast.items.iter().filter(|i| !matches!(i, SchemaItem::Include(_))).cloned());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{resolver, vfs::VirtualFileSystem};

    #[test]
    fn merges_includes_before_the_including_file() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("base.vdl");
        let main = dir.path().join("main.vdl");
        std::fs::write(&base, "type Base { id string }\n").unwrap();
        std::fs::write(&main, "include \"base.vdl\"\ntype User { ...Base }\n").unwrap();

        let vfs = VirtualFileSystem::new();
        let (file_set, _) = resolver::resolve(&vfs, &main);
        let merged = merge(&file_set);

        assert_eq!(merged.items.len(), 2);
        assert!(matches!(&merged.items[0], SchemaItem::Type(t) if t.name == "Base"));
        assert!(matches!(&merged.items[1], SchemaItem::Type(t) if t.name == "User"));
    }

    #[test]
    fn circular_include_contributes_each_file_once() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.vdl");
        let b = dir.path().join("b.vdl");
        std::fs::write(&a, "include \"b.vdl\"\ntype A { id string }\n").unwrap();
        std::fs::write(&b, "include \"a.vdl\"\ntype B { id string }\n").unwrap();

        let vfs = VirtualFileSystem::new();
        let (file_set, _) = resolver::resolve(&vfs, &a);
        let merged = merge(&file_set);

        assert_eq!(merged.items.len(), 2);
    }
}
