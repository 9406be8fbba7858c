//! Immutable snapshot values: records, sequences, primitives, and callables.
//!
//! A [`Value`] is a cheaply clonable handle to shared immutable data. Records
//! and sequences are reference-counted, so cloning a value never copies a
//! container; all change happens by building a new container that shares the
//! untouched children with the old one.
//!
//! Identity matters here: [`Value::same`] compares containers by pointer, not
//! by structure. That predicate is what makes a write with an unchanged value
//! a guaranteed no-op.

use crate::mutate::{mutate, Editor};
use crate::schema::BehaviorMap;
use crate::Seg;
use indexmap::IndexMap;
use std::cell::OnceCell;
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

/// An immutable nested value: the unit of everything a view addresses.
///
/// # Examples
///
/// ```
/// use loupe::{rec, seq, Value};
///
/// let v = rec! {
///     "name" => "Alice",
///     "scores" => seq![1, 2, 3],
/// };
/// assert_eq!(v.child(&"name".into()), Value::from("Alice"));
/// ```
#[derive(Clone)]
pub enum Value {
    /// A missing slot: an unset record key, a sequence hole, or the removal
    /// sentinel when folding a child edit back into its parent.
    Absent,
    /// An explicit null.
    Null,
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// A floating-point number.
    Float(f64),
    /// An immutable string.
    Str(Rc<str>),
    /// An ordered record of named fields.
    Record(Record),
    /// An ordered sequence of values.
    Seq(Seq),
    /// A named callable bound to its enclosing record.
    Func(Func),
}

impl Value {
    /// Identity comparison: the write short-circuit predicate.
    ///
    /// Containers and funcs compare by pointer; scalars, strings included,
    /// compare by value. This is deliberately never a deep structural
    /// comparison: two separately built but structurally equal records are
    /// *not* the same value.
    pub fn same(a: &Value, b: &Value) -> bool {
        match (a, b) {
            (Value::Absent, Value::Absent) => true,
            (Value::Null, Value::Null) => true,
            (Value::Bool(x), Value::Bool(y)) => x == y,
            (Value::Int(x), Value::Int(y)) => x == y,
            (Value::Float(x), Value::Float(y)) => x == y,
            (Value::Str(x), Value::Str(y)) => x == y,
            (Value::Record(x), Value::Record(y)) => Record::ptr_eq(x, y),
            (Value::Seq(x), Value::Seq(y)) => Seq::ptr_eq(x, y),
            (Value::Func(x), Value::Func(y)) => Func::ptr_eq(x, y),
            _ => false,
        }
    }

    /// The child value addressed by `seg`, or [`Value::Absent`] when missing.
    ///
    /// Index segments on records fall back to the decimal string key, so a
    /// record standing in for sparse numeric data still resolves.
    pub fn child(&self, seg: &Seg) -> Value {
        match (self, seg) {
            (Value::Record(rec), Seg::Key(k)) => rec.get(k).cloned().unwrap_or(Value::Absent),
            (Value::Record(rec), Seg::Index(i)) => rec
                .get(&i.to_string())
                .cloned()
                .unwrap_or(Value::Absent),
            (Value::Seq(seq), Seg::Index(i)) => seq.get(*i).cloned().unwrap_or(Value::Absent),
            _ => Value::Absent,
        }
    }

    /// Human-readable kind name for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Absent => "absent",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int(_) | Value::Float(_) => "number",
            Value::Str(_) => "string",
            Value::Record(_) => "record",
            Value::Seq(_) => "sequence",
            Value::Func(_) => "function",
        }
    }

    /// Returns true if this value is absent.
    #[inline]
    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    /// Get the record if this value is one.
    #[inline]
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(rec) => Some(rec),
            _ => None,
        }
    }

    /// Get the sequence if this value is one.
    #[inline]
    pub fn as_seq(&self) -> Option<&Seq> {
        match self {
            Value::Seq(seq) => Some(seq),
            _ => None,
        }
    }

    /// Get the func if this value is one.
    #[inline]
    pub fn as_func(&self) -> Option<&Func> {
        match self {
            Value::Func(f) => Some(f),
            _ => None,
        }
    }

    /// Get the integer if this value is one.
    #[inline]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get the string if this value is one.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Total order used by the sequence `Sort` operation.
    ///
    /// Kinds rank null < bool < number < string < sequence < record < func
    /// < absent; numbers compare numerically across int/float, strings
    /// lexicographically. Values of other kinds tie, and the sort is stable,
    /// so they keep their relative order.
    pub(crate) fn sort_cmp(a: &Value, b: &Value) -> Ordering {
        fn rank(v: &Value) -> u8 {
            match v {
                Value::Null => 0,
                Value::Bool(_) => 1,
                Value::Int(_) | Value::Float(_) => 2,
                Value::Str(_) => 3,
                Value::Seq(_) => 4,
                Value::Record(_) => 5,
                Value::Func(_) => 6,
                Value::Absent => 7,
            }
        }
        fn as_f64(v: &Value) -> f64 {
            match v {
                Value::Int(i) => *i as f64,
                Value::Float(f) => *f,
                _ => 0.0,
            }
        }
        match rank(a).cmp(&rank(b)) {
            Ordering::Equal => match (a, b) {
                (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
                (Value::Str(x), Value::Str(y)) => x.cmp(y),
                _ if rank(a) == 2 => as_f64(a).partial_cmp(&as_f64(b)).unwrap_or(Ordering::Equal),
                _ => Ordering::Equal,
            },
            other => other,
        }
    }

    /// Convert a `serde_json::Value` into a snapshot value.
    pub fn from_json(json: &serde_json::Value) -> Value {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else {
                    Value::Float(n.as_f64().unwrap_or(0.0))
                }
            }
            serde_json::Value::String(s) => Value::Str(Rc::from(s.as_str())),
            serde_json::Value::Array(items) => {
                Value::Seq(Seq::from_values(items.iter().map(Value::from_json).collect()))
            }
            serde_json::Value::Object(map) => Value::Record(
                map.iter()
                    .map(|(k, v)| (k.clone(), Value::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Convert this snapshot value to JSON.
    ///
    /// Funcs have no JSON form and are dropped from records (a standalone
    /// func becomes null); absent slots become null.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Absent | Value::Null | Value::Func(_) => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::Value::Number((*i).into()),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Str(s) => serde_json::Value::String(s.to_string()),
            Value::Seq(seq) => {
                serde_json::Value::Array(seq.iter().map(Value::to_json).collect())
            }
            Value::Record(rec) => serde_json::Value::Object(
                rec.iter()
                    .filter(|(_, v)| !matches!(v, Value::Func(_)))
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

impl PartialEq for Value {
    /// Structural equality, for assertions and callers.
    ///
    /// Funcs compare by identity; everything else compares by structure.
    /// Note that [`Value::same`] is a different, identity-only predicate.
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Absent, Value::Absent) => true,
            (Value::Null, Value::Null) => true,
            (Value::Bool(x), Value::Bool(y)) => x == y,
            (Value::Int(x), Value::Int(y)) => x == y,
            (Value::Float(x), Value::Float(y)) => x == y,
            (Value::Str(x), Value::Str(y)) => x == y,
            (Value::Record(x), Value::Record(y)) => x == y,
            (Value::Seq(x), Value::Seq(y)) => x == y,
            (Value::Func(x), Value::Func(y)) => Func::ptr_eq(x, y),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Absent => write!(f, "Absent"),
            Value::Null => write!(f, "Null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(s) => write!(f, "{s:?}"),
            Value::Record(rec) => rec.fmt(f),
            Value::Seq(seq) => seq.fmt(f),
            Value::Func(func) => write!(f, "Func({})", func.name()),
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Absent
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<usize> for Value {
    fn from(i: usize) -> Self {
        Value::Int(i as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(Rc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(Rc::from(s.as_str()))
    }
}

impl From<Record> for Value {
    fn from(rec: Record) -> Self {
        Value::Record(rec)
    }
}

impl From<Seq> for Value {
    fn from(seq: Seq) -> Self {
        Value::Seq(seq)
    }
}

impl From<Func> for Value {
    fn from(func: Func) -> Self {
        Value::Func(func)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Seq(Seq::from_values(items))
    }
}

// ============================================================================
// Record
// ============================================================================

struct RecordRepr {
    fields: IndexMap<String, Value>,
    /// Behavior schema side-channel. Does not participate in the record's
    /// enumerable shape or structural equality; cloned along with the repr so
    /// copy-on-write clones keep their behavioral kind.
    schema: OnceCell<BehaviorMap>,
}

impl Clone for RecordRepr {
    fn clone(&self) -> Self {
        RecordRepr {
            fields: self.fields.clone(),
            schema: self.schema.clone(),
        }
    }
}

/// An ordered, immutable record of named fields.
///
/// Field order is insertion order and is preserved by every copy, so child
/// fan-out and iteration are deterministic.
#[derive(Clone)]
pub struct Record(Rc<RecordRepr>);

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Record(Rc::new(RecordRepr {
            fields: IndexMap::new(),
            schema: OnceCell::new(),
        }))
    }

    /// Identity comparison.
    #[inline]
    pub fn ptr_eq(a: &Record, b: &Record) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }

    /// Get a field by key.
    #[inline]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.fields.get(key)
    }

    /// Check whether a field exists.
    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.fields.contains_key(key)
    }

    /// Number of fields.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.fields.len()
    }

    /// Returns true if the record has no fields.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.fields.is_empty()
    }

    /// Iterate over the field keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.fields.keys().map(String::as_str)
    }

    /// Iterate over `(key, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.fields.iter()
    }

    /// Shallow copy with one field set. The copy shares every other field
    /// with the original and keeps the schema side-channel.
    pub fn with(&self, key: impl Into<String>, value: impl Into<Value>) -> Record {
        let mut copy = self.clone();
        copy.make_mut().insert(key.into(), value.into());
        copy
    }

    /// Shallow copy with one field removed (no-op copy if the key is absent).
    pub fn without(&self, key: &str) -> Record {
        let mut copy = self.clone();
        copy.make_mut().shift_remove(key);
        copy
    }

    /// Copy-on-write access to the fields. Clones the repr only while it is
    /// shared, so repeated calls within one edit clone at most once.
    pub(crate) fn make_mut(&mut self) -> &mut IndexMap<String, Value> {
        &mut Rc::make_mut(&mut self.0).fields
    }

    pub(crate) fn schema(&self) -> Option<&BehaviorMap> {
        self.0.schema.get()
    }

    /// Set the schema side-channel. Errors if one is already attached.
    pub(crate) fn set_schema(&self, map: BehaviorMap) -> Result<(), BehaviorMap> {
        self.0.schema.set(map)
    }
}

impl Default for Record {
    fn default() -> Self {
        Record::new()
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Record) -> bool {
        Rc::ptr_eq(&self.0, &other.0) || self.0.fields == other.0.fields
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Record(Rc::new(RecordRepr {
            fields: iter.into_iter().collect(),
            schema: OnceCell::new(),
        }))
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

// ============================================================================
// Seq
// ============================================================================

/// An ordered, immutable sequence of values.
///
/// Sequences may contain [`Value::Absent`] holes; length counts them.
#[derive(Clone)]
pub struct Seq(Rc<Vec<Value>>);

impl Seq {
    /// Create an empty sequence.
    pub fn new() -> Self {
        Seq(Rc::new(Vec::new()))
    }

    /// Create a sequence from a vector of values.
    pub fn from_values(items: Vec<Value>) -> Self {
        Seq(Rc::new(items))
    }

    /// Identity comparison.
    #[inline]
    pub fn ptr_eq(a: &Seq, b: &Seq) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }

    /// Get an element by index.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.0.get(index)
    }

    /// Number of elements, counting holes.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the sequence is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the elements.
    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.0.iter()
    }

    /// Clone the elements out into a vector.
    pub fn to_vec(&self) -> Vec<Value> {
        self.0.as_ref().clone()
    }

    /// Shallow copy with one element set, padding with absent holes when the
    /// index is past the end. Every other element is shared with the original.
    pub fn with(&self, index: usize, value: impl Into<Value>) -> Seq {
        let mut copy = self.clone();
        let items = copy.make_mut();
        if items.len() <= index {
            items.resize(index + 1, Value::Absent);
        }
        items[index] = value.into();
        copy
    }

    /// Copy-on-write access to the elements.
    pub(crate) fn make_mut(&mut self) -> &mut Vec<Value> {
        Rc::make_mut(&mut self.0)
    }
}

impl Default for Seq {
    fn default() -> Self {
        Seq::new()
    }
}

impl PartialEq for Seq {
    fn eq(&self, other: &Seq) -> bool {
        Rc::ptr_eq(&self.0, &other.0) || self.0 == other.0
    }
}

impl FromIterator<Value> for Seq {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Seq(Rc::new(iter.into_iter().collect()))
    }
}

impl fmt::Debug for Seq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

// ============================================================================
// Func
// ============================================================================

/// A callable's body, fixing how it touches its receiver.
pub(crate) enum Body {
    /// Pure computation over the receiver; never writes.
    Compute(Box<dyn Fn(&Value, &[Value]) -> Value>),
    /// Edits the receiver through a copy-on-write editor.
    Mutate(Box<dyn Fn(&mut Editor, &[Value]) -> Value>),
    /// Accessor pair for get-set slots. The getter takes the editor too:
    /// impure getters may mutate the clone mid-read.
    Accessor {
        get: Box<dyn Fn(&mut Editor) -> Value>,
        set: Box<dyn Fn(&mut Editor, Value)>,
    },
}

struct FuncRepr {
    name: String,
    body: Body,
}

/// A named callable stored inside a record.
///
/// How an invocation treats the receiver is decided by the behavior schema
/// of the enclosing record (see [`crate::schema`]), defaulting to a mutating
/// call. The body kind fixes what the callable *can* do; the schema fixes
/// what the view *lets* it do.
///
/// # Examples
///
/// ```
/// use loupe::{path, rec, Func, Value, View};
///
/// let counter = rec! {
///     "count" => 0,
///     "incr" => Func::mutator("incr", |editor, _args| {
///         let n = editor.get(&path!("count")).as_int().unwrap_or(0);
///         editor.set(&path!("count"), Value::from(n + 1));
///         Value::from(n + 1)
///     }),
/// };
/// let view = View::root(counter);
/// assert_eq!(view.invoke("incr", &[]).unwrap(), Value::from(1));
/// assert_eq!(view.child("count").read(), Value::from(1));
/// ```
#[derive(Clone)]
pub struct Func(Rc<FuncRepr>);

impl Func {
    /// A pure computed method: runs against the current snapshot, never
    /// writes back.
    pub fn compute(
        name: impl Into<String>,
        f: impl Fn(&Value, &[Value]) -> Value + 'static,
    ) -> Func {
        Func(Rc::new(FuncRepr {
            name: name.into(),
            body: Body::Compute(Box::new(f)),
        }))
    }

    /// A mutating method: edits its receiver through a copy-on-write editor;
    /// the edited snapshot is installed as the node's new value.
    pub fn mutator(
        name: impl Into<String>,
        f: impl Fn(&mut Editor, &[Value]) -> Value + 'static,
    ) -> Func {
        Func(Rc::new(FuncRepr {
            name: name.into(),
            body: Body::Mutate(Box::new(f)),
        }))
    }

    /// An accessor pair for a get-set slot.
    pub fn accessor(
        name: impl Into<String>,
        get: impl Fn(&mut Editor) -> Value + 'static,
        set: impl Fn(&mut Editor, Value) + 'static,
    ) -> Func {
        Func(Rc::new(FuncRepr {
            name: name.into(),
            body: Body::Accessor {
                get: Box::new(get),
                set: Box::new(set),
            },
        }))
    }

    /// The callable's name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Identity comparison.
    #[inline]
    pub fn ptr_eq(a: &Func, b: &Func) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }

    /// Returns true if this func is an accessor pair.
    pub fn is_accessor(&self) -> bool {
        matches!(self.0.body, Body::Accessor { .. })
    }

    /// Run as a readonly method: compute against the receiver, discard any
    /// edits, return the result.
    pub(crate) fn call_readonly(&self, receiver: &Value, args: &[Value]) -> Value {
        match &self.0.body {
            Body::Compute(f) => f(receiver, args),
            Body::Mutate(f) => mutate(receiver, |editor| f(editor, args)).1,
            Body::Accessor { get, .. } => mutate(receiver, |editor| get(editor)).1,
        }
    }

    /// Run as a mutating method: returns the edited snapshot and the
    /// callable's return value. A compute body leaves the snapshot untouched.
    pub(crate) fn call_mutating(&self, receiver: &Value, args: &[Value]) -> (Value, Value) {
        match &self.0.body {
            Body::Mutate(f) => mutate(receiver, |editor| f(editor, args)),
            Body::Compute(f) => (receiver.clone(), f(receiver, args)),
            Body::Accessor { get, .. } => mutate(receiver, |editor| get(editor)),
        }
    }

    /// Run the getter half of an accessor. `None` for non-accessor bodies.
    pub(crate) fn call_getter(&self, receiver: &Value) -> Option<(Value, Value)> {
        match &self.0.body {
            Body::Accessor { get, .. } => Some(mutate(receiver, |editor| get(editor))),
            _ => None,
        }
    }

    /// Run the setter half of an accessor. `None` for non-accessor bodies.
    pub(crate) fn call_setter(&self, receiver: &Value, value: Value) -> Option<Value> {
        match &self.0.body {
            Body::Accessor { set, .. } => {
                let (new_value, ()) = mutate(receiver, |editor| set(editor, value));
                Some(new_value)
            }
            _ => None,
        }
    }
}

impl fmt::Debug for Func {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Func({})", self.name())
    }
}

// ============================================================================
// Construction macros
// ============================================================================

/// Construct a [`Value::Record`] from `key => value` pairs.
///
/// # Examples
///
/// ```
/// use loupe::rec;
///
/// let v = rec! { "a" => 1, "b" => rec! { "c" => true } };
/// ```
#[macro_export]
macro_rules! rec {
    () => {
        $crate::Value::Record($crate::Record::new())
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut record = $crate::Record::new();
        $(
            record = record.with($key, $crate::Value::from($value));
        )+
        $crate::Value::Record(record)
    }};
}

/// Construct a [`Value::Seq`] from elements.
///
/// # Examples
///
/// ```
/// use loupe::seq;
///
/// let v = seq![1, 2, 3];
/// ```
#[macro_export]
macro_rules! seq {
    () => {
        $crate::Value::Seq($crate::Seq::new())
    };
    ($($value:expr),+ $(,)?) => {
        $crate::Value::Seq($crate::Seq::from_values(vec![
            $($crate::Value::from($value)),+
        ]))
    };
}
