//! Shared per-tree runtime: the subscriber registry and the tracking scope.
//!
//! Every view created from one root shares one `Runtime`. This replaces the
//! module-wide mutable state a trap-based implementation would use: tracking
//! and suppression are explicit, and two independent trees never interfere.
//!
//! The whole crate is single-threaded by design, so the runtime uses `Cell`
//! and `RefCell` rather than locks; a multi-threaded host would need to add
//! mutual exclusion here.

use crate::subscribers::{ListenerFn, Subscribers};
use crate::{LoupeError, LoupeResult, View};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// The shared context of one view tree.
///
/// Obtained from any view via [`View::runtime`]. Exposes the raw registry
/// primitives for collaborators that manage their own subscription lifecycle,
/// and the tracking scope used to discover which views a computation read.
pub struct Runtime {
    next_id: Cell<u64>,
    subscribers: RefCell<Subscribers>,
    tracking: RefCell<Option<Vec<View>>>,
}

impl Runtime {
    pub(crate) fn new() -> Rc<Runtime> {
        Rc::new(Runtime {
            next_id: Cell::new(0),
            subscribers: RefCell::new(Subscribers::default()),
            tracking: RefCell::new(None),
        })
    }

    pub(crate) fn allocate_id(&self) -> u64 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }

    // ===== Registry primitives =====

    /// Register a listener handle for a view (weakly held, de-duplicated).
    pub fn subscribers_add(&self, view: &View, listener: &Rc<ListenerFn>) {
        self.subscribers.borrow_mut().add(view.id(), listener);
    }

    /// Remove a listener handle for a view.
    pub fn subscribers_remove(&self, view: &View, listener: &Rc<ListenerFn>) {
        self.subscribers.borrow_mut().remove(view.id(), listener);
    }

    /// Invoke every still-live listener registered for a view.
    ///
    /// Expired handles are skipped and pruned. The handles are upgraded
    /// before any listener runs, so listeners may subscribe or unsubscribe
    /// freely without re-entrant borrows.
    pub fn trigger(&self, view: &View) {
        let live = self.subscribers.borrow_mut().live(view.id());
        for listener in live {
            listener(view);
        }
    }

    /// Number of live listeners registered for a view.
    pub fn subscriber_count(&self, view: &View) -> usize {
        self.subscribers.borrow().live_count(view.id())
    }

    /// Whether the registry still holds an entry for a view at all.
    pub fn has_subscriber_entry(&self, view: &View) -> bool {
        self.subscribers.borrow().has_entry(view.id())
    }

    // ===== Tracking scope =====

    /// Open the tracking scope. Every subsequent [`View::read`] on this tree
    /// records its view until [`Runtime::end_tracking`] is called.
    ///
    /// At most one scope may be active; a second begin is a usage fault, not
    /// a queued request.
    pub fn begin_tracking(&self) -> LoupeResult<()> {
        let mut tracking = self.tracking.borrow_mut();
        if tracking.is_some() {
            return Err(LoupeError::ReentrantTracking);
        }
        *tracking = Some(Vec::new());
        Ok(())
    }

    /// Close the tracking scope and return the views read while it was open,
    /// in first-read order, de-duplicated by view identity. Returns an empty
    /// set if no scope was active.
    pub fn end_tracking(&self) -> Vec<View> {
        self.tracking.borrow_mut().take().unwrap_or_default()
    }

    /// Whether a tracking scope is currently active.
    pub fn is_tracking(&self) -> bool {
        self.tracking.borrow().is_some()
    }

    pub(crate) fn record_read(&self, view: &View) {
        if let Some(used) = self.tracking.borrow_mut().as_mut() {
            if !used.contains(view) {
                used.push(view.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rec;

    #[test]
    fn test_tracking_records_reads_in_order() {
        let root = View::root(rec! { "a" => 1, "b" => 2 });
        let rt = root.runtime().clone();

        rt.begin_tracking().unwrap();
        let b = root.child("b");
        b.read();
        root.read();
        b.read(); // de-duplicated
        let used = rt.end_tracking();

        assert_eq!(used.len(), 2);
        assert_eq!(used[0], b);
        assert_eq!(used[1], root);
        assert!(!rt.is_tracking());
    }

    #[test]
    fn test_reentrant_tracking_is_a_fault() {
        let root = View::root(rec! {});
        let rt = root.runtime();

        rt.begin_tracking().unwrap();
        assert!(matches!(
            rt.begin_tracking(),
            Err(LoupeError::ReentrantTracking)
        ));
        let _ = rt.end_tracking();
        // A fresh scope works once the first is closed.
        rt.begin_tracking().unwrap();
        let _ = rt.end_tracking();
    }

    #[test]
    fn test_end_without_begin_is_empty() {
        let root = View::root(rec! {});
        assert!(root.runtime().end_tracking().is_empty());
    }

    #[test]
    fn test_reads_outside_scope_are_not_recorded() {
        let root = View::root(rec! { "a" => 1 });
        let rt = root.runtime().clone();

        root.read();
        rt.begin_tracking().unwrap();
        let used = rt.end_tracking();
        assert!(used.is_empty());
    }
}
