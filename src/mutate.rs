//! Copy-on-write mutation over immutable values.
//!
//! [`mutate`] hands an edit routine an [`Editor`]: a path-addressed facade
//! over the input value. Reads never copy anything; writes shallow-clone only
//! the containers along the written path, sharing every untouched branch
//! with the original. The containers are reference-counted, so a shared
//! container is cloned exactly once per call and edits after the first reach
//! the same clone — there is no separate clone cache to maintain.
//!
//! The result is immutable the moment `mutate` returns, and if the edit
//! routine wrote nothing the result is identity-equal to the input.

use crate::{Path, Record, Seg, Seq, Value};

/// A path-addressed editor over one value.
///
/// Created by [`mutate`]; edit routines receive it by `&mut`.
///
/// # Examples
///
/// ```
/// use loupe::{mutate, path, rec, Value};
///
/// let original = rec! { "a" => rec! { "b" => 1 }, "c" => rec! { "x" => 1 } };
/// let (updated, ()) = mutate(&original, |editor| {
///     editor.set(&path!("a", "b"), Value::from(2));
/// });
///
/// assert_eq!(updated.child(&"a".into()).child(&"b".into()), Value::from(2));
/// // The untouched sibling is the exact same object, not a copy.
/// assert!(Value::same(
///     &original.child(&"c".into()),
///     &updated.child(&"c".into()),
/// ));
/// ```
pub struct Editor {
    root: Value,
}

impl Editor {
    pub(crate) fn new(value: &Value) -> Self {
        Editor {
            root: value.clone(),
        }
    }

    /// The whole value being edited, as it currently stands.
    #[inline]
    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Read the value at a path. Missing slots read as [`Value::Absent`].
    ///
    /// Reads are cheap handle clones and never copy a container.
    pub fn get(&self, path: &Path) -> Value {
        let mut current = &self.root;
        for seg in path.iter() {
            match (current, seg) {
                (Value::Record(rec), Seg::Key(key)) => match rec.get(key) {
                    Some(child) => current = child,
                    None => return Value::Absent,
                },
                (Value::Seq(seq), Seg::Index(index)) => match seq.get(*index) {
                    Some(child) => current = child,
                    None => return Value::Absent,
                },
                _ => return Value::Absent,
            }
        }
        current.clone()
    }

    /// Write a value at a path.
    ///
    /// Containers along the path are shallow-cloned on first touch; missing
    /// intermediates are created with the kind inferred from the next segment
    /// (key means record, index means sequence), and sequence writes past the
    /// end pad with absent holes.
    pub fn set(&mut self, path: &Path, value: impl Into<Value>) {
        set_in(&mut self.root, path.segments(), value.into());
    }

    /// Remove the slot at a path.
    ///
    /// Record keys are deleted; sequence slots become absent holes (length is
    /// unchanged). A missing path is a no-op and clones nothing.
    pub fn remove(&mut self, path: &Path) {
        if self.get(path).is_absent() {
            return;
        }
        remove_in(&mut self.root, path.segments());
    }

    /// Read-modify-write a single slot.
    pub fn update(&mut self, path: &Path, f: impl FnOnce(Value) -> Value) {
        let current = self.get(path);
        self.set(path, f(current));
    }

    pub(crate) fn finish(self) -> Value {
        self.root
    }
}

/// Run an edit routine against a copy-on-write facade over `value`.
///
/// Returns the finalized top-level value and the routine's own return value.
/// The input and every untouched sub-container are shared with the result by
/// reference; an edit-free run returns a value identity-equal to the input.
pub fn mutate<R>(value: &Value, edit: impl FnOnce(&mut Editor) -> R) -> (Value, R) {
    let mut editor = Editor::new(value);
    let result = edit(&mut editor);
    (editor.finish(), result)
}

fn set_in(current: &mut Value, segs: &[Seg], value: Value) {
    let Some((seg, rest)) = segs.split_first() else {
        *current = value;
        return;
    };
    match seg {
        Seg::Key(key) => {
            // A non-record slot under a key segment is replaced wholesale.
            if !matches!(current, Value::Record(_)) {
                *current = Value::Record(Record::new());
            }
            let Value::Record(rec) = current else {
                unreachable!()
            };
            let slot = rec
                .make_mut()
                .entry(key.clone())
                .or_insert(Value::Absent);
            set_in(slot, rest, value);
        }
        Seg::Index(index) => {
            if !matches!(current, Value::Seq(_)) {
                *current = Value::Seq(Seq::new());
            }
            let Value::Seq(seq) = current else {
                unreachable!()
            };
            let items = seq.make_mut();
            if items.len() <= *index {
                items.resize(*index + 1, Value::Absent);
            }
            set_in(&mut items[*index], rest, value);
        }
    }
}

// Caller has verified the path exists, so descending clones only containers
// that really hold the removed slot.
fn remove_in(current: &mut Value, segs: &[Seg]) {
    match segs {
        [] => *current = Value::Absent,
        [Seg::Key(key)] => {
            if let Value::Record(rec) = current {
                rec.make_mut().shift_remove(key);
            }
        }
        [Seg::Index(index)] => {
            if let Value::Seq(seq) = current {
                if *index < seq.len() {
                    seq.make_mut()[*index] = Value::Absent;
                }
            }
        }
        [Seg::Key(key), rest @ ..] => {
            if let Value::Record(rec) = current {
                if let Some(slot) = rec.make_mut().get_mut(key) {
                    remove_in(slot, rest);
                }
            }
        }
        [Seg::Index(index), rest @ ..] => {
            if let Value::Seq(seq) = current {
                if let Some(slot) = seq.make_mut().get_mut(*index) {
                    remove_in(slot, rest);
                }
            }
        }
    }
}
