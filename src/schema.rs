//! Behavior schema: per-record declaration of how keys behave under a view.
//!
//! A schema is a side-table attached to a record that tells the view layer
//! how to treat specific keys: as plain data (`Pointer`), as a mutating
//! method (`Mutate`), as a read-only computed method (`Readonly`), or as an
//! accessor pair (`GetSet`). The table rides in a non-enumerable side-channel
//! on the record itself, so attaching one changes neither the record's shape
//! nor its identity, and copy-on-write clones keep it.

use crate::{LoupeError, LoupeResult, Seg, Value};
use indexmap::IndexMap;

/// How a view treats one key of a record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Behavior {
    /// Plain data: exposed as a child view, even for callables.
    Pointer,
    /// A method that edits its receiver through the copy-on-write mutator.
    /// The default for callables.
    Mutate,
    /// A computed method: runs against the current snapshot, never writes
    /// back, never notifies.
    Readonly,
    /// An accessor-style slot with distinct read and write halves.
    GetSet,
}

/// An ordered key-to-behavior table.
///
/// # Examples
///
/// ```
/// use loupe::{attach, rec, Behavior, BehaviorMap, Func, Value};
///
/// let map = BehaviorMap::new()
///     .with("total", Behavior::Readonly)
///     .with("reset", Behavior::Mutate);
///
/// let value = rec! {
///     "count" => 3,
///     "total" => Func::compute("total", |recv, _| recv.child(&"count".into())),
/// };
/// let value = attach(value, map).unwrap();
/// ```
#[derive(Clone, Debug, Default)]
pub struct BehaviorMap {
    entries: IndexMap<String, Behavior>,
}

impl BehaviorMap {
    /// Create an empty behavior map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry (builder pattern).
    pub fn with(mut self, key: impl Into<String>, behavior: Behavior) -> Self {
        self.entries.insert(key.into(), behavior);
        self
    }

    /// Look up the declared behavior for a key.
    #[inline]
    pub fn get(&self, key: &str) -> Option<Behavior> {
        self.entries.get(key).copied()
    }

    /// Number of declared entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no behaviors are declared.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Attach a behavior map to a record, returning the same value for chaining.
///
/// The record's fields and identity are untouched; only the side-channel is
/// set. Errors if the value is not a record or already carries a schema.
pub fn attach(value: Value, map: BehaviorMap) -> LoupeResult<Value> {
    let Value::Record(rec) = &value else {
        return Err(LoupeError::kind_mismatch("record", value.kind_name()));
    };
    rec.set_schema(map)
        .map_err(|_| LoupeError::SchemaAlreadyAttached)?;
    Ok(value)
}

/// Resolve the behavior of one slot of a container.
///
/// An explicit schema entry on the containing record wins; otherwise
/// callables default to [`Behavior::Mutate`] and everything else to
/// [`Behavior::Pointer`].
pub fn resolve(container: &Value, seg: &Seg, slot: &Value) -> Behavior {
    if let (Value::Record(rec), Seg::Key(key)) = (container, seg) {
        if let Some(declared) = rec.schema().and_then(|schema| schema.get(key)) {
            return declared;
        }
    }
    default_behavior(slot)
}

/// The schema-free default: callables mutate, everything else is data.
pub fn default_behavior(slot: &Value) -> Behavior {
    if matches!(slot, Value::Func(_)) {
        Behavior::Mutate
    } else {
        Behavior::Pointer
    }
}
