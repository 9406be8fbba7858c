//! Tests for view identity: stability across writes, child caching, and
//! reference-equality of snapshots.

use loupe::{rec, seq, Seg, Value, View};

// ============================================================================
// Child View Identity
// ============================================================================

#[test]
fn test_same_path_yields_same_view() {
    let root = View::root(rec! { "user" => rec! { "name" => "Alice" } });
    let a = root.key("user").key("name");
    let b = root.key("user").key("name");
    assert_eq!(a, b);
}

#[test]
fn test_view_identity_survives_writes() {
    let root = View::root(rec! { "user" => rec! { "name" => "Alice" } });
    let user_before = root.key("user");
    let name_before = user_before.key("name");

    name_before.write(Value::from("Bob"));

    assert_eq!(root.key("user"), user_before);
    assert_eq!(root.key("user").key("name"), name_before);
    assert_eq!(name_before.read(), Value::from("Bob"));
}

#[test]
fn test_view_identity_survives_parent_replacement() {
    let root = View::root(rec! { "user" => rec! { "name" => "Alice" } });
    let name = root.key("user").key("name");

    root.write(rec! { "user" => rec! { "name" => "Carol" } });

    assert_eq!(root.key("user").key("name"), name);
    assert_eq!(name.read(), Value::from("Carol"));
}

#[test]
fn test_clones_are_the_same_view() {
    let root = View::root(rec! { "a" => 1 });
    let child = root.key("a");
    let clone = child.clone();
    assert_eq!(child, clone);
    clone.write(Value::from(2));
    assert_eq!(child.read(), Value::Int(2));
}

#[test]
fn test_held_view_keeps_its_ancestor_chain() {
    let root = View::root(rec! { "a" => rec! { "b" => 1 } });
    let b = {
        let a = root.key("a");
        a.key("b")
    };
    // The intermediate handle is gone, but b still belongs to the tree.
    b.write(Value::from(2));
    assert_eq!(root.read(), rec! { "a" => rec! { "b" => 2 } });

    // b's parent link kept the intermediate node alive, so re-deriving the
    // path lands on the identical views.
    assert_eq!(root.key("a").key("b"), b);
}

#[test]
fn test_distinct_paths_are_distinct_views() {
    let root = View::root(rec! { "a" => 1, "b" => 1 });
    assert_ne!(root.key("a"), root.key("b"));
}

#[test]
fn test_index_views_are_cached_per_index() {
    let root = View::root(seq![10, 20]);
    let first = root.index(0);
    assert_eq!(root.index(0), first);
    assert_ne!(root.index(0), root.index(1));
}

// ============================================================================
// Snapshot Reference Equality
// ============================================================================

#[test]
fn test_reads_between_writes_are_identical() {
    let root = View::root(rec! { "a" => rec! { "b" => 1 } });
    let one = root.read();
    let two = root.read();
    assert!(Value::same(&one, &two));
}

#[test]
fn test_unchanged_branch_keeps_its_reference() {
    let root = View::root(rec! {
        "a" => rec! { "b" => 1 },
        "c" => rec! { "x" => 9 },
    });
    let before = root.read();

    root.key("a").key("b").write(Value::from(2));
    let after = root.read();

    assert!(!Value::same(&before, &after));
    assert!(Value::same(
        &before.child(&"c".into()),
        &after.child(&"c".into()),
    ));
    assert!(!Value::same(
        &before.child(&"a".into()),
        &after.child(&"a".into()),
    ));
}

#[test]
fn test_old_snapshot_is_never_mutated() {
    let root = View::root(rec! { "a" => rec! { "b" => 1 } });
    let before = root.read();

    root.key("a").key("b").write(Value::from(2));

    assert_eq!(
        before.child(&"a".into()).child(&"b".into()),
        Value::Int(1)
    );
    assert_eq!(
        root.read().child(&"a".into()).child(&"b".into()),
        Value::Int(2)
    );
}

#[test]
fn test_numeric_key_addresses_record_field() {
    let root = View::root(rec! { "0" => "zero" });
    assert_eq!(root.child(Seg::Index(0)).read(), Value::from("zero"));
}
