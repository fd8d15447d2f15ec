//! Tree entry ordering must match git's rules exactly — byte-wise, with a
//! directory name compared as if it ended in `/` — or every tree we write
//! would hash differently from git's.

use bstr::BString;
use quill_hash::ObjectId;
use quill_object::{FileMode, Tree, TreeEntry};

fn entry(name: &str, mode: FileMode) -> TreeEntry {
    TreeEntry {
        mode,
        name: BString::from(name),
        oid: ObjectId::NULL,
    }
}

fn sorted_names(mut tree: Tree) -> Vec<String> {
    tree.sort();
    tree.entries
        .iter()
        .map(|e| e.name.to_string())
        .collect()
}

#[test]
fn plain_files_sort_bytewise() {
    let tree = Tree {
        entries: vec![
            entry("zebra", FileMode::Regular),
            entry("alpha", FileMode::Regular),
            entry("Mixed", FileMode::Regular),
        ],
    };
    // Uppercase sorts before lowercase in byte order.
    assert_eq!(sorted_names(tree), ["Mixed", "alpha", "zebra"]);
}

#[test]
fn directory_sorts_as_if_trailing_slash() {
    let tree = Tree {
        entries: vec![
            entry("foo.c", FileMode::Regular),
            entry("foo", FileMode::Tree),
            entry("foo-bar", FileMode::Regular),
        ],
    };
    // "foo-" (0x2D) < "foo." (0x2E) < "foo/" (0x2F)
    assert_eq!(sorted_names(tree), ["foo-bar", "foo.c", "foo"]);
}

#[test]
fn file_with_same_name_as_dir_prefix() {
    let tree = Tree {
        entries: vec![
            entry("a", FileMode::Tree),
            entry("a", FileMode::Regular),
        ],
    };
    // File "a" (next char \0) sorts before dir "a" (next char '/').
    let names_and_modes: Vec<(String, bool)> = {
        let mut t = tree;
        t.sort();
        t.entries
            .iter()
            .map(|e| (e.name.to_string(), e.mode.is_tree()))
            .collect()
    };
    assert_eq!(names_and_modes, [("a".to_string(), false), ("a".to_string(), true)]);
}

#[test]
fn serialization_emits_sorted_order() {
    let tree = Tree {
        entries: vec![
            entry("b.txt", FileMode::Regular),
            entry("a.txt", FileMode::Regular),
        ],
    };
    let bytes = tree.serialize_content();
    let reparsed = Tree::parse(&bytes).unwrap();
    assert_eq!(reparsed.entries[0].name, "a.txt");
    assert_eq!(reparsed.entries[1].name, "b.txt");
}

#[test]
fn sort_is_stable_under_resort() {
    let mut tree = Tree {
        entries: vec![
            entry("x", FileMode::Tree),
            entry("x.h", FileMode::Regular),
            entry("x-ray", FileMode::Regular),
        ],
    };
    tree.sort();
    let first = tree.serialize_content();
    tree.sort();
    assert_eq!(tree.serialize_content(), first);
}
