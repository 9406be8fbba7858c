//! Weak subscriber registry and the `subscribe` convenience layer.
//!
//! Listeners are held weakly: the registry never keeps a subscriber alive.
//! A [`Subscription`] owns the strong handles, so dropping it (or calling
//! [`Subscription::unsubscribe`]) is what ends a subscription. Entries that
//! lose their last live handle are removed rather than left behind.

use crate::View;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

/// The callable invoked when a subscribed view changes.
pub type ListenerFn = dyn Fn(&View);

/// The per-tree table from view identity to weakly-held listener handles.
#[derive(Default)]
pub(crate) struct Subscribers {
    entries: HashMap<u64, Vec<Weak<ListenerFn>>>,
}

impl Subscribers {
    /// Append a weak handle for `listener`, pruning expired handles and any
    /// existing handle whose live target is the same listener.
    pub(crate) fn add(&mut self, id: u64, listener: &Rc<ListenerFn>) {
        let handles = self.entries.entry(id).or_default();
        handles.retain(|weak| {
            weak.upgrade()
                .is_some_and(|live| !Rc::ptr_eq(&live, listener))
        });
        handles.push(Rc::downgrade(listener));
    }

    /// Remove handles matching `listener` by identity; drop the entry when it
    /// empties.
    pub(crate) fn remove(&mut self, id: u64, listener: &Rc<ListenerFn>) {
        if let Some(handles) = self.entries.get_mut(&id) {
            handles.retain(|weak| {
                weak.upgrade()
                    .is_some_and(|live| !Rc::ptr_eq(&live, listener))
            });
            if handles.is_empty() {
                self.entries.remove(&id);
            }
        }
    }

    /// Upgrade the live handles for a view, pruning expired ones and the
    /// entry itself when nothing is left.
    pub(crate) fn live(&mut self, id: u64) -> Vec<Rc<ListenerFn>> {
        let Some(handles) = self.entries.get_mut(&id) else {
            return Vec::new();
        };
        let live: Vec<Rc<ListenerFn>> = handles.iter().filter_map(Weak::upgrade).collect();
        if live.is_empty() {
            self.entries.remove(&id);
        } else if live.len() < handles.len() {
            handles.retain(|weak| weak.strong_count() > 0);
        }
        live
    }

    pub(crate) fn live_count(&self, id: u64) -> usize {
        self.entries
            .get(&id)
            .map_or(0, |handles| {
                handles.iter().filter(|w| w.strong_count() > 0).count()
            })
    }

    /// Whether an entry exists at all, live or not. Used to verify cleanup.
    pub(crate) fn has_entry(&self, id: u64) -> bool {
        self.entries.contains_key(&id)
    }
}

/// An active subscription produced by [`subscribe`].
///
/// Holds the strong listener handles; the registry only holds weak ones.
/// Dropping the subscription without unsubscribing lets the handles expire,
/// which the registry treats the same as removal on its next pass.
pub struct Subscription {
    entries: Vec<(View, Rc<ListenerFn>)>,
}

impl Subscription {
    /// Number of views still covered by this subscription.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is subscribed anymore.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Unsubscribe from every view.
    pub fn unsubscribe(mut self) {
        for (view, wrapper) in self.entries.drain(..) {
            view.runtime().subscribers_remove(&view, &wrapper);
        }
    }

    /// Unsubscribe from specific views only; the rest stay subscribed.
    pub fn unsubscribe_views(&mut self, views: &[View]) {
        self.entries.retain(|(view, wrapper)| {
            if views.contains(view) {
                view.runtime().subscribers_remove(view, wrapper);
                false
            } else {
                true
            }
        });
    }
}

/// Subscribe one callback to any number of views.
///
/// Each view gets its own wrapper that invokes `callback` with the changed
/// view. Returns the [`Subscription`] holding the wrappers alive.
///
/// # Examples
///
/// ```
/// use loupe::{rec, subscribe, Value, View};
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let root = View::root(rec! { "n" => 1 });
/// let fired = Rc::new(Cell::new(0));
/// let counter = fired.clone();
///
/// let sub = subscribe(move |_view| counter.set(counter.get() + 1), &[root.clone()]);
/// root.write(rec! { "n" => 2 });
/// assert_eq!(fired.get(), 1);
///
/// sub.unsubscribe();
/// root.write(rec! { "n" => 3 });
/// assert_eq!(fired.get(), 1);
/// ```
pub fn subscribe(callback: impl Fn(&View) + 'static, views: &[View]) -> Subscription {
    let shared: Rc<dyn Fn(&View)> = Rc::new(callback);
    let entries = views
        .iter()
        .map(|view| {
            let cb = shared.clone();
            let wrapper: Rc<ListenerFn> = Rc::new(move |changed: &View| cb(changed));
            view.runtime().subscribers_add(view, &wrapper);
            (view.clone(), wrapper)
        })
        .collect();
    Subscription { entries }
}
