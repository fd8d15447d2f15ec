//! Round-trip tests: parse(serialize(x)) == x and oid stability.

use bstr::BString;
use proptest::prelude::*;
use quill_hash::ObjectId;
use quill_object::{Blob, Commit, FileMode, Object, Tree, TreeEntry};
use quill_utils::date::{GitDate, Signature};

fn sig(ts: i64, tz: i32) -> Signature {
    Signature {
        name: BString::from("Test Author"),
        email: BString::from("test@example.com"),
        date: GitDate::new(ts, tz),
    }
}

#[test]
fn framed_blob_roundtrip() {
    let obj = Object::Blob(Blob::new(b"some file content\n".to_vec()));
    let framed = obj.serialize();
    let parsed = Object::parse(&framed).unwrap();
    assert_eq!(parsed, obj);
    assert_eq!(parsed.compute_oid().unwrap(), obj.compute_oid().unwrap());
}

#[test]
fn framed_tree_roundtrip() {
    let tree = Tree {
        entries: vec![
            TreeEntry {
                mode: FileMode::Regular,
                name: BString::from("file.txt"),
                oid: ObjectId::from_hex("e69de29bb2d1d6434b8b29ae775ad8c2e48c5391").unwrap(),
            },
            TreeEntry {
                mode: FileMode::Tree,
                name: BString::from("subdir"),
                oid: ObjectId::from_hex("4b825dc642cb6eb9a060e54bf8d69288fbee4904").unwrap(),
            },
        ],
    };
    let obj = Object::Tree(tree);
    let parsed = Object::parse(&obj.serialize()).unwrap();
    assert_eq!(parsed.serialize(), obj.serialize());
}

#[test]
fn commit_reserialization_hashes_identically() {
    let commit = Commit {
        tree: ObjectId::from_hex("4b825dc642cb6eb9a060e54bf8d69288fbee4904").unwrap(),
        parents: vec![],
        author: sig(1234567890, 0),
        committer: sig(1234567890, 0),
        message: BString::from("initial\n"),
    };
    let obj = Object::Commit(commit);
    let oid = obj.compute_oid().unwrap();

    let reparsed = Object::parse(&obj.serialize()).unwrap();
    assert_eq!(reparsed.compute_oid().unwrap(), oid);
}

#[test]
fn empty_tree_has_wellknown_oid() {
    let obj = Object::Tree(Tree::new());
    assert_eq!(
        obj.compute_oid().unwrap().to_hex(),
        "4b825dc642cb6eb9a060e54bf8d69288fbee4904"
    );
}

proptest! {
    #[test]
    fn blob_roundtrip_any_bytes(data in proptest::collection::vec(any::<u8>(), 0..2048)) {
        let obj = Object::Blob(Blob::new(data));
        let parsed = Object::parse(&obj.serialize()).unwrap();
        prop_assert_eq!(parsed, obj);
    }

    #[test]
    fn commit_roundtrip_any_message(
        msg in "[ -~\\n]{0,200}",
        ts in 0i64..4_000_000_000,
        tz in -720i32..720,
        n_parents in 0usize..3,
    ) {
        let parent = ObjectId::from_hex("0000000000000000000000000000000000000001").unwrap();
        let commit = Commit {
            tree: ObjectId::from_hex("4b825dc642cb6eb9a060e54bf8d69288fbee4904").unwrap(),
            parents: vec![parent; n_parents],
            author: sig(ts, tz),
            committer: sig(ts, tz),
            message: BString::from(msg),
        };
        let bytes = commit.serialize_content();
        let parsed = Commit::parse(&bytes).unwrap();
        prop_assert_eq!(parsed.serialize_content(), bytes);
    }
}
