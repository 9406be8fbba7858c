//! Identity-stable view nodes over immutable snapshot values.
//!
//! A [`View`] addresses one path into a snapshot. Child views are created
//! lazily and cached weakly, so requesting the same key twice while the first
//! result is alive returns the identical view. Writes flow both ways: a child
//! edit folds a new container into its parent ("bubbling"), and a parent
//! replacement pushes fresh slices into every live child ("fan-out"), with
//! bubbling explicitly suppressed during fan-out so the edit does not fold
//! back into the value that was just installed.

use crate::schema::{self, Behavior};
use crate::{LoupeError, LoupeResult, Record, Runtime, Seg, Seq, Value};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

/// Whether a write propagates upward to its parent.
///
/// Threaded explicitly through the write call chain instead of living in a
/// module-wide flag; `Fanout` is used while pushing a freshly installed value
/// down to children.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Propagate {
    Bubble,
    Fanout,
}

/// The upward edge of a node. Strong: a held view keeps its whole ancestor
/// chain alive so writes can always fold into the root, and fan-out can
/// always reach it. No cycle arises because the downward edges are weak.
struct ParentLink {
    node: Rc<Node>,
    seg: Seg,
}

struct NodeState {
    value: Value,
    behavior: Behavior,
    parent: Option<ParentLink>,
    write_back: Option<Rc<dyn Fn(&Value)>>,
    children: HashMap<Seg, Weak<Node>>,
}

struct Node {
    id: u64,
    runtime: Rc<Runtime>,
    state: RefCell<NodeState>,
}

/// An identity-stable accessor over one path into a snapshot.
///
/// Cloning a `View` clones the handle, not the node: clones compare equal and
/// share all state. Equality between views is node identity.
///
/// # Examples
///
/// ```
/// use loupe::{rec, Value, View};
///
/// let root = View::root(rec! { "user" => rec! { "name" => "Alice" } });
/// let name = root.child("user").child("name");
///
/// name.write(Value::from("Bob"));
/// assert_eq!(
///     root.read().child(&"user".into()).child(&"name".into()),
///     Value::from("Bob"),
/// );
/// ```
#[derive(Clone)]
pub struct View {
    node: Rc<Node>,
}

impl View {
    // ===== Construction =====

    /// Create a root view over an initial snapshot.
    pub fn root(initial: impl Into<Value>) -> View {
        Self::build_root(initial.into(), None)
    }

    /// Create a root view with an external write-back callback.
    ///
    /// The callback is invoked with every new snapshot installed by a
    /// bubbling write; it is how the tree's owner observes the whole-value
    /// result of any edit.
    pub fn root_with_write_back(
        initial: impl Into<Value>,
        write_back: impl Fn(&Value) + 'static,
    ) -> View {
        Self::build_root(initial.into(), Some(Rc::new(write_back)))
    }

    fn build_root(value: Value, write_back: Option<Rc<dyn Fn(&Value)>>) -> View {
        let runtime = Runtime::new();
        let behavior = schema::default_behavior(&value);
        let node = Rc::new(Node {
            id: runtime.allocate_id(),
            runtime,
            state: RefCell::new(NodeState {
                value,
                behavior,
                parent: None,
                write_back,
                children: HashMap::new(),
            }),
        });
        View { node }
    }

    /// The shared runtime of this view's tree.
    #[inline]
    pub fn runtime(&self) -> &Rc<Runtime> {
        &self.node.runtime
    }

    pub(crate) fn id(&self) -> u64 {
        self.node.id
    }

    /// The behavior kind resolved for this view's own slot.
    pub fn behavior(&self) -> Behavior {
        self.node.state.borrow().behavior
    }

    // ===== Read / write =====

    /// The current snapshot.
    ///
    /// Two reads between writes return the identical value. When a tracking
    /// scope is active on this tree, the read registers this view as used.
    pub fn read(&self) -> Value {
        self.node.runtime.record_read(self);
        self.node.state.borrow().value.clone()
    }

    /// The current snapshot, without registering in any tracking scope.
    pub fn peek(&self) -> Value {
        self.node.state.borrow().value.clone()
    }

    /// Install a new snapshot.
    ///
    /// A value identical (by [`Value::same`]) to the current snapshot is a
    /// complete no-op: no clone, no notification, no fan-out. Otherwise the
    /// value is stored, folded into the parent (or handed to the write-back
    /// callback), this view's subscribers are triggered, and every live child
    /// receives its new slice with bubbling suppressed.
    pub fn write(&self, value: impl Into<Value>) {
        self.write_with(value.into(), Propagate::Bubble);
    }

    fn write_with(&self, value: Value, propagate: Propagate) {
        {
            let state = self.node.state.borrow();
            if Value::same(&state.value, &value) {
                return;
            }
        }

        // Store, then re-resolve this node's behavior against the (possibly
        // new) parent context.
        let (parent, write_back) = {
            let mut state = self.node.state.borrow_mut();
            state.value = value.clone();
            let parent = state.parent.as_ref().map(|link| ParentLink {
                node: link.node.clone(),
                seg: link.seg.clone(),
            });
            (parent, state.write_back.clone())
        };
        let behavior = match &parent {
            Some(link) => {
                let parent_value = link.node.state.borrow().value.clone();
                schema::resolve(&parent_value, &link.seg, &value)
            }
            None => schema::default_behavior(&value),
        };
        self.node.state.borrow_mut().behavior = behavior;

        if propagate == Propagate::Bubble {
            if let Some(link) = &parent {
                let parent_view = View {
                    node: link.node.clone(),
                };
                let folded = fold(&parent_view.peek(), &link.seg, &value);
                parent_view.write_with(folded, Propagate::Bubble);
            }
            if let Some(callback) = &write_back {
                callback(&value);
            }
        }

        self.node.runtime.trigger(self);

        // Fan out to live children. Keys addressing a callable in the new
        // value are skipped; method slots are not data to push.
        let children: Vec<(Seg, Rc<Node>)> = {
            let mut state = self.node.state.borrow_mut();
            state.children.retain(|_, weak| weak.strong_count() > 0);
            state
                .children
                .iter()
                .filter_map(|(seg, weak)| weak.upgrade().map(|node| (seg.clone(), node)))
                .collect()
        };
        for (seg, node) in children {
            let slice = value.child(&seg);
            if !matches!(slice, Value::Func(_)) {
                View { node }.write_with(slice, Propagate::Fanout);
            }
        }
    }

    // ===== Child access =====

    /// The child view for a segment, cached per key.
    ///
    /// While a reference to a previous result is held, the same segment
    /// returns the identical view; an expired cache slot is recreated
    /// transparently (child views are pure derivations of parent + key).
    pub fn child(&self, seg: impl Into<Seg>) -> View {
        let seg = seg.into();
        if let Some(node) = self
            .node
            .state
            .borrow()
            .children
            .get(&seg)
            .and_then(Weak::upgrade)
        {
            return View { node };
        }

        let (slice, behavior) = {
            let state = self.node.state.borrow();
            let slice = state.value.child(&seg);
            let behavior = schema::resolve(&state.value, &seg, &slice);
            (slice, behavior)
        };
        let node = Rc::new(Node {
            id: self.node.runtime.allocate_id(),
            runtime: self.node.runtime.clone(),
            state: RefCell::new(NodeState {
                value: slice,
                behavior,
                parent: Some(ParentLink {
                    node: self.node.clone(),
                    seg: seg.clone(),
                }),
                write_back: None,
                children: HashMap::new(),
            }),
        });
        let mut state = self.node.state.borrow_mut();
        state.children.retain(|_, weak| weak.strong_count() > 0);
        state.children.insert(seg, Rc::downgrade(&node));
        View { node }
    }

    /// Child view by record key.
    #[inline]
    pub fn key(&self, key: &str) -> View {
        self.child(Seg::key(key))
    }

    /// Child view by sequence index.
    #[inline]
    pub fn index(&self, index: usize) -> View {
        self.child(Seg::index(index))
    }

    // ===== Method dispatch =====

    /// Invoke a method slot by key.
    ///
    /// Dispatch follows the resolved behavior: `Readonly` runs against the
    /// current snapshot and writes nothing; `Mutate` runs through the
    /// copy-on-write mutator, installs the edited snapshot as a normal write,
    /// and returns the callable's own return value. `Pointer` slots are data
    /// (use [`View::child`]) and `GetSet` slots go through
    /// [`View::get_computed`]/[`View::set_computed`]; invoking either is a
    /// usage fault.
    pub fn invoke(&self, key: &str, args: &[Value]) -> LoupeResult<Value> {
        let (current, slot, behavior) = self.resolve_slot(key);
        let Value::Func(func) = slot else {
            return Err(LoupeError::not_a_method(key));
        };
        match behavior {
            Behavior::Pointer | Behavior::GetSet => Err(LoupeError::not_a_method(key)),
            Behavior::Readonly => Ok(func.call_readonly(&current, args)),
            Behavior::Mutate => {
                let (new_value, result) = func.call_mutating(&current, args);
                self.write_with(new_value, Propagate::Bubble);
                Ok(result)
            }
        }
    }

    /// Read an accessor slot declared `GetSet`.
    ///
    /// The getter runs against a mutator-managed clone; an impure getter's
    /// edits are installed as a normal write (a pure getter's run is an
    /// identity no-op).
    pub fn get_computed(&self, key: &str) -> LoupeResult<Value> {
        let (current, slot, behavior) = self.resolve_slot(key);
        if behavior != Behavior::GetSet {
            return Err(LoupeError::not_a_method(key));
        }
        let Value::Func(func) = slot else {
            return Err(LoupeError::not_a_method(key));
        };
        let Some((new_value, result)) = func.call_getter(&current) else {
            return Err(LoupeError::not_a_method(key));
        };
        self.write_with(new_value, Propagate::Bubble);
        Ok(result)
    }

    /// Write through an accessor slot declared `GetSet`.
    ///
    /// The setter runs against a mutator-managed clone and the clone is
    /// written back as a single step.
    pub fn set_computed(&self, key: &str, value: impl Into<Value>) -> LoupeResult<()> {
        let (current, slot, behavior) = self.resolve_slot(key);
        if behavior != Behavior::GetSet {
            return Err(LoupeError::not_a_method(key));
        }
        let Value::Func(func) = slot else {
            return Err(LoupeError::not_a_method(key));
        };
        let Some(new_value) = func.call_setter(&current, value.into()) else {
            return Err(LoupeError::not_a_method(key));
        };
        self.write_with(new_value, Propagate::Bubble);
        Ok(())
    }

    fn resolve_slot(&self, key: &str) -> (Value, Value, Behavior) {
        let state = self.node.state.borrow();
        let seg = Seg::key(key);
        let slot = state.value.child(&seg);
        let behavior = schema::resolve(&state.value, &seg, &slot);
        (state.value.clone(), slot, behavior)
    }

    // ===== Sequence specialization =====

    /// The length of the sequence this view addresses, as a plain number.
    pub fn len(&self) -> LoupeResult<usize> {
        match &self.node.state.borrow().value {
            Value::Seq(seq) => Ok(seq.len()),
            other => Err(LoupeError::kind_mismatch("sequence", other.kind_name())),
        }
    }

    /// Whether the sequence this view addresses is empty.
    pub fn is_empty(&self) -> LoupeResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Rewrite the sequence with its length adjusted: truncated, or padded
    /// with absent slots. A single write; live element views are updated
    /// through the normal fan-out.
    pub fn set_len(&self, len: usize) -> LoupeResult<()> {
        let seq = self.current_seq()?;
        let mut items = seq.to_vec();
        items.resize(len, Value::Absent);
        self.write(Value::from(items));
        Ok(())
    }

    /// Apply one of the allow-listed mutating sequence operations.
    ///
    /// The operation reads the whole sequence, applies to a mutable copy,
    /// writes the copy back through a single normal write (bubble, trigger,
    /// fan-out), and returns the operation's native result.
    pub fn apply_seq(&self, op: SeqOp) -> LoupeResult<Value> {
        let seq = self.current_seq()?;
        let mut items = seq.to_vec();
        let native = apply_seq_op(&mut items, op);
        let new_value = Value::from(items);
        let result = match native {
            SeqNative::Value(value) => value,
            SeqNative::Whole => new_value.clone(),
        };
        self.write(new_value);
        Ok(result)
    }

    /// Append an element; returns the new length.
    pub fn push(&self, value: impl Into<Value>) -> LoupeResult<Value> {
        self.apply_seq(SeqOp::Push(value.into()))
    }

    /// Remove the last element; returns it, or absent when empty.
    pub fn pop(&self) -> LoupeResult<Value> {
        self.apply_seq(SeqOp::Pop)
    }

    /// Insert an element at the front; returns the new length.
    pub fn unshift(&self, value: impl Into<Value>) -> LoupeResult<Value> {
        self.apply_seq(SeqOp::Unshift(value.into()))
    }

    /// Remove the first element; returns it, or absent when empty.
    pub fn shift(&self) -> LoupeResult<Value> {
        self.apply_seq(SeqOp::Shift)
    }

    /// Replace a range; returns the removed elements as a sequence.
    pub fn splice(&self, start: usize, delete: usize, items: Vec<Value>) -> LoupeResult<Value> {
        self.apply_seq(SeqOp::Splice {
            start,
            delete,
            items,
        })
    }

    /// Fill a range with one value; returns the new sequence.
    pub fn fill(&self, value: impl Into<Value>, start: usize, end: Option<usize>) -> LoupeResult<Value> {
        self.apply_seq(SeqOp::Fill {
            value: value.into(),
            start,
            end,
        })
    }

    /// Copy a range within the sequence; returns the new sequence.
    pub fn copy_within(
        &self,
        target: usize,
        start: usize,
        end: Option<usize>,
    ) -> LoupeResult<Value> {
        self.apply_seq(SeqOp::CopyWithin { target, start, end })
    }

    /// Reverse in place; returns the new sequence.
    pub fn reverse(&self) -> LoupeResult<Value> {
        self.apply_seq(SeqOp::Reverse)
    }

    /// Stable sort by the crate's value order; returns the new sequence.
    pub fn sort(&self) -> LoupeResult<Value> {
        self.apply_seq(SeqOp::Sort)
    }

    fn current_seq(&self) -> LoupeResult<Seq> {
        match &self.node.state.borrow().value {
            Value::Seq(seq) => Ok(seq.clone()),
            other => Err(LoupeError::kind_mismatch("sequence", other.kind_name())),
        }
    }
}

impl PartialEq for View {
    /// View equality is node identity, never value equality.
    fn eq(&self, other: &View) -> bool {
        Rc::ptr_eq(&self.node, &other.node)
    }
}

impl Eq for View {}

impl fmt::Debug for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("View")
            .field("id", &self.node.id)
            .field("value", &self.node.state.borrow().value)
            .finish()
    }
}

/// The fixed allow-list of mutating sequence operations.
///
/// Kept as a data type so the set is explicit and exhaustive; each executes
/// as read-whole, apply-to-copy, write-whole rather than being forwarded to
/// element views.
#[derive(Clone, Debug)]
pub enum SeqOp {
    /// Append to the end; native result is the new length.
    Push(Value),
    /// Remove from the end; native result is the removed element.
    Pop,
    /// Insert at the front; native result is the new length.
    Unshift(Value),
    /// Remove from the front; native result is the removed element.
    Shift,
    /// Remove `delete` elements at `start`, inserting `items` in their place;
    /// native result is the removed elements.
    Splice {
        start: usize,
        delete: usize,
        items: Vec<Value>,
    },
    /// Overwrite `start..end` (end defaulting to the length) with one value;
    /// native result is the new sequence.
    Fill {
        value: Value,
        start: usize,
        end: Option<usize>,
    },
    /// Copy `start..end` over the range beginning at `target`, length
    /// unchanged; native result is the new sequence.
    CopyWithin {
        target: usize,
        start: usize,
        end: Option<usize>,
    },
    /// Reverse; native result is the new sequence.
    Reverse,
    /// Stable sort by value order; native result is the new sequence.
    Sort,
}

enum SeqNative {
    /// A concrete result computed by the operation.
    Value(Value),
    /// The operation returns the new sequence itself.
    Whole,
}

fn apply_seq_op(items: &mut Vec<Value>, op: SeqOp) -> SeqNative {
    match op {
        SeqOp::Push(value) => {
            items.push(value);
            SeqNative::Value(Value::from(items.len()))
        }
        SeqOp::Pop => SeqNative::Value(items.pop().unwrap_or(Value::Absent)),
        SeqOp::Unshift(value) => {
            items.insert(0, value);
            SeqNative::Value(Value::from(items.len()))
        }
        SeqOp::Shift => SeqNative::Value(if items.is_empty() {
            Value::Absent
        } else {
            items.remove(0)
        }),
        SeqOp::Splice {
            start,
            delete,
            items: insert,
        } => {
            let start = start.min(items.len());
            let end = start.saturating_add(delete).min(items.len());
            let removed: Vec<Value> = items.splice(start..end, insert).collect();
            SeqNative::Value(Value::from(removed))
        }
        SeqOp::Fill { value, start, end } => {
            let len = items.len();
            let start = start.min(len);
            let end = end.unwrap_or(len).min(len);
            for slot in items[start..end.max(start)].iter_mut() {
                *slot = value.clone();
            }
            SeqNative::Whole
        }
        SeqOp::CopyWithin { target, start, end } => {
            let len = items.len();
            let target = target.min(len);
            let start = start.min(len);
            let end = end.unwrap_or(len).min(len);
            let window: Vec<Value> = items[start..end.max(start)].to_vec();
            for (offset, value) in window.into_iter().enumerate() {
                let dst = target + offset;
                if dst >= len {
                    break;
                }
                items[dst] = value;
            }
            SeqNative::Whole
        }
        SeqOp::Reverse => {
            items.reverse();
            SeqNative::Whole
        }
        SeqOp::Sort => {
            items.sort_by(Value::sort_cmp);
            SeqNative::Whole
        }
    }
}

/// Build the parent's next container from one child's new value.
///
/// An absent child removes the key; otherwise the key is set on a shallow
/// copy. The copy keeps the parent's container kind; when the parent value is
/// not a container, the kind is inferred from the segment (index means
/// sequence, key means record).
fn fold(parent: &Value, seg: &Seg, child: &Value) -> Value {
    match (parent, seg) {
        (Value::Record(rec), Seg::Key(key)) => Value::Record(if child.is_absent() {
            rec.without(key)
        } else {
            rec.with(key.clone(), child.clone())
        }),
        (Value::Record(rec), Seg::Index(index)) => {
            let key = index.to_string();
            Value::Record(if child.is_absent() {
                rec.without(&key)
            } else {
                rec.with(key, child.clone())
            })
        }
        (Value::Seq(seq), Seg::Index(index)) => Value::Seq(seq.with(*index, child.clone())),
        (_, Seg::Key(key)) => {
            let rec = Record::new();
            Value::Record(if child.is_absent() {
                rec
            } else {
                rec.with(key.clone(), child.clone())
            })
        }
        (_, Seg::Index(index)) => Value::Seq(if child.is_absent() {
            Seq::new()
        } else {
            Seq::new().with(*index, child.clone())
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{rec, seq};

    #[test]
    fn test_child_identity_is_stable_while_held() {
        let root = View::root(rec! { "a" => 1 });
        let first = root.key("a");
        let second = root.key("a");
        assert_eq!(first, second);
    }

    #[test]
    fn test_child_is_recreated_after_expiry() {
        let root = View::root(rec! { "a" => 1 });
        {
            let _gone = root.key("a");
        }
        // The cache slot expired; a fresh derivation reads the same slice.
        let again = root.key("a");
        assert_eq!(again.read(), Value::Int(1));
    }

    #[test]
    fn test_write_bubbles_to_root() {
        let root = View::root(rec! { "a" => rec! { "b" => 1 } });
        root.key("a").key("b").write(Value::from(2));
        assert_eq!(root.read(), rec! { "a" => rec! { "b" => 2 } });
    }

    #[test]
    fn test_fan_out_updates_live_children() {
        let root = View::root(rec! { "a" => rec! { "b" => 1 } });
        let b = root.key("a").key("b");

        root.write(rec! { "a" => rec! { "b" => 9 } });
        assert_eq!(b.read(), Value::Int(9));
    }

    #[test]
    fn test_identical_write_is_a_noop() {
        let root = View::root(rec! { "a" => 1 });
        let before = root.read();
        root.write(before.clone());
        assert!(Value::same(&before, &root.read()));
    }

    #[test]
    fn test_absent_child_write_removes_parent_key() {
        let root = View::root(rec! { "a" => 1, "b" => 2 });
        root.key("a").write(Value::Absent);

        let value = root.read();
        assert!(value.child(&"a".into()).is_absent());
        assert!(!value.as_record().unwrap().contains_key("a"));
        assert_eq!(value.child(&"b".into()), Value::Int(2));
    }

    #[test]
    fn test_kind_inferred_for_absent_parent() {
        let root = View::root(rec! {});
        let items = root.key("items");
        items.index(0).write(Value::from("x"));

        let value = root.read();
        assert!(value.child(&"items".into()).as_seq().is_some());
        assert_eq!(
            value.child(&"items".into()).child(&Seg::Index(0)),
            Value::from("x")
        );
    }

    #[test]
    fn test_root_write_back_sees_every_snapshot() {
        use std::cell::RefCell;
        let seen: Rc<RefCell<Vec<Value>>> = Rc::new(RefCell::new(Vec::new()));
        let log = seen.clone();

        let root = View::root_with_write_back(rec! { "n" => 1 }, move |value| {
            log.borrow_mut().push(value.clone());
        });
        root.key("n").write(Value::from(2));

        let snapshots = seen.borrow();
        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0], rec! { "n" => 2 });
    }

    #[test]
    fn test_len_is_plain_number() {
        let root = View::root(seq![1, 2, 3]);
        assert_eq!(root.len().unwrap(), 3);
        assert!(matches!(
            View::root(rec! {}).len(),
            Err(LoupeError::KindMismatch { .. })
        ));
    }

    #[test]
    fn test_set_len_pads_and_truncates() {
        let root = View::root(seq![1, 2, 3]);
        root.set_len(5).unwrap();
        assert_eq!(root.len().unwrap(), 5);
        assert!(root.read().child(&Seg::Index(4)).is_absent());

        root.set_len(2).unwrap();
        assert_eq!(root.read(), seq![1, 2]);
    }

    #[test]
    fn test_push_returns_new_length() {
        let root = View::root(seq![1, 2]);
        assert_eq!(root.push(3).unwrap(), Value::Int(3));
        assert_eq!(root.read(), seq![1, 2, 3]);
    }

    #[test]
    fn test_pop_and_shift_return_removed() {
        let root = View::root(seq![1, 2, 3]);
        assert_eq!(root.pop().unwrap(), Value::Int(3));
        assert_eq!(root.shift().unwrap(), Value::Int(1));
        assert_eq!(root.read(), seq![2]);
        assert_eq!(View::root(seq![]).pop().unwrap(), Value::Absent);
    }

    #[test]
    fn test_unshift_prepends() {
        let root = View::root(seq![2, 3]);
        assert_eq!(root.unshift(1).unwrap(), Value::Int(3));
        assert_eq!(root.read(), seq![1, 2, 3]);
    }

    #[test]
    fn test_splice_returns_removed() {
        let root = View::root(seq![1, 2, 3, 4]);
        let removed = root
            .splice(1, 2, vec![Value::from(9)])
            .unwrap();
        assert_eq!(removed, seq![2, 3]);
        assert_eq!(root.read(), seq![1, 9, 4]);
    }

    #[test]
    fn test_fill_and_reverse_return_new_sequence() {
        let root = View::root(seq![1, 2, 3]);
        let filled = root.fill(0, 1, None).unwrap();
        assert_eq!(filled, seq![1, 0, 0]);
        assert!(Value::same(&filled, &root.read()));

        let reversed = root.reverse().unwrap();
        assert_eq!(reversed, seq![0, 0, 1]);
    }

    #[test]
    fn test_copy_within() {
        let root = View::root(seq![1, 2, 3, 4, 5]);
        root.copy_within(0, 3, None).unwrap();
        assert_eq!(root.read(), seq![4, 5, 3, 4, 5]);
    }

    #[test]
    fn test_sort_is_stable_by_value_order() {
        let root = View::root(seq![3, 1, 2]);
        root.sort().unwrap();
        assert_eq!(root.read(), seq![1, 2, 3]);
    }

    #[test]
    fn test_seq_op_on_record_is_kind_mismatch() {
        let root = View::root(rec! {});
        assert!(matches!(
            root.push(1),
            Err(LoupeError::KindMismatch { .. })
        ));
    }

    #[test]
    fn test_invoke_non_func_is_not_a_method() {
        let root = View::root(rec! { "x" => 1 });
        assert!(matches!(
            root.invoke("x", &[]),
            Err(LoupeError::NotAMethod { .. })
        ));
    }
}
