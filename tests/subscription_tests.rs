//! Tests for subscription lifecycle and the tracking scope: weak registry
//! cleanup, multi-view subscriptions, and read discovery.

use loupe::{rec, subscribe, Value, View};
use std::cell::Cell;
use std::rc::Rc;

// ============================================================================
// Subscription Lifecycle
// ============================================================================

#[test]
fn test_unsubscribe_stops_notifications_and_clears_the_entry() {
    let root = View::root(rec! { "n" => 0 });
    let fired = Rc::new(Cell::new(0));
    let c = fired.clone();
    let sub = subscribe(move |_| c.set(c.get() + 1), &[root.clone()]);

    root.key("n").write(Value::from(1));
    assert_eq!(fired.get(), 1);

    sub.unsubscribe();
    root.key("n").write(Value::from(2));
    assert_eq!(fired.get(), 1);
    assert!(!root.runtime().has_subscriber_entry(&root));
}

#[test]
fn test_dropped_subscription_expires_in_the_registry() {
    let root = View::root(rec! { "n" => 0 });
    let fired = Rc::new(Cell::new(0));
    {
        let c = fired.clone();
        let _sub = subscribe(move |_| c.set(c.get() + 1), &[root.clone()]);
        // Dropped here without an explicit unsubscribe.
    }

    root.key("n").write(Value::from(1));
    assert_eq!(fired.get(), 0);

    // The expired handle was pruned during the trigger pass, taking the
    // whole entry with it.
    assert!(!root.runtime().has_subscriber_entry(&root));
}

#[test]
fn test_one_callback_covers_many_views() {
    let root = View::root(rec! { "a" => 1, "b" => 2 });
    let a = root.key("a");
    let b = root.key("b");

    let fired = Rc::new(Cell::new(0));
    let c = fired.clone();
    let mut sub = subscribe(
        move |_| c.set(c.get() + 1),
        &[a.clone(), b.clone()],
    );
    assert_eq!(sub.len(), 2);

    a.write(Value::from(10));
    b.write(Value::from(20));
    assert_eq!(fired.get(), 2);

    sub.unsubscribe_views(&[a.clone()]);
    assert_eq!(sub.len(), 1);
    a.write(Value::from(11));
    b.write(Value::from(21));
    assert_eq!(fired.get(), 3);
    sub.unsubscribe();
}

#[test]
fn test_callback_receives_the_changed_view() {
    let root = View::root(rec! { "a" => 1, "b" => 2 });
    let a = root.key("a");
    let b = root.key("b");

    let seen: Rc<Cell<Option<u64>>> = Rc::new(Cell::new(None));
    let expect = b.clone();
    let log = seen.clone();
    let _sub = subscribe(
        move |changed| log.set(Some(if *changed == expect { 1 } else { 0 })),
        &[a.clone(), b.clone()],
    );

    b.write(Value::from(9));
    assert_eq!(seen.get(), Some(1));
}

#[test]
fn test_duplicate_subscribe_of_same_views_fires_per_subscription() {
    let root = View::root(rec! { "n" => 0 });
    let fired = Rc::new(Cell::new(0));
    let c1 = fired.clone();
    let c2 = fired.clone();
    let _s1 = subscribe(move |_| c1.set(c1.get() + 1), &[root.clone()]);
    let _s2 = subscribe(move |_| c2.set(c2.get() + 1), &[root.clone()]);

    root.key("n").write(Value::from(1));
    assert_eq!(fired.get(), 2);
    assert_eq!(root.runtime().subscriber_count(&root), 2);
}

#[test]
fn test_independent_trees_do_not_interfere() {
    let one = View::root(rec! { "n" => 0 });
    let two = View::root(rec! { "n" => 0 });
    let fired = Rc::new(Cell::new(0));
    let c = fired.clone();
    let _sub = subscribe(move |_| c.set(c.get() + 1), &[one.clone()]);

    two.key("n").write(Value::from(5));
    assert_eq!(fired.get(), 0);
    one.key("n").write(Value::from(5));
    assert_eq!(fired.get(), 1);
}

// ============================================================================
// Tracking Scope
// ============================================================================

#[test]
fn test_tracking_discovers_reads_for_subscription() {
    let root = View::root(rec! { "a" => 1, "b" => 2, "c" => 3 });
    let rt = root.runtime().clone();

    rt.begin_tracking().unwrap();
    let a = root.key("a");
    let c = root.key("c");
    a.read();
    c.read();
    let used = rt.end_tracking();
    assert_eq!(used, vec![a.clone(), c.clone()]);

    // The discovered views feed straight into subscribe.
    let fired = Rc::new(Cell::new(0));
    let counter = fired.clone();
    let _sub = subscribe(move |_| counter.set(counter.get() + 1), &used);

    root.key("b").write(Value::from(9));
    assert_eq!(fired.get(), 0);
    a.write(Value::from(9));
    assert_eq!(fired.get(), 1);
}

#[test]
fn test_peek_is_invisible_to_tracking() {
    let root = View::root(rec! { "a" => 1 });
    let rt = root.runtime().clone();

    rt.begin_tracking().unwrap();
    root.key("a").peek();
    assert!(rt.end_tracking().is_empty());
}

#[test]
fn test_tracking_is_per_tree() {
    let one = View::root(rec! { "n" => 1 });
    let two = View::root(rec! { "n" => 2 });

    one.runtime().begin_tracking().unwrap();
    two.key("n").read();
    one.key("n").read();

    let used = one.runtime().end_tracking();
    assert_eq!(used.len(), 1);
    assert_eq!(used[0], one.key("n"));
    assert!(!two.runtime().is_tracking());
}
