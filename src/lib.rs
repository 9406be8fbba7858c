//! Identity-stable views over immutable values, with change notification.
//!
//! `loupe` keeps application state as an immutable snapshot and hands out
//! [`View`] handles addressing paths into it. Edits go through a copy-on-write
//! mutator, so every snapshot is a pure value; views stay identity-stable
//! across edits, which makes reference equality a reliable "did this part
//! change" check.
//!
//! # Core Concepts
//!
//! - **Value**: Immutable data (scalars, records, sequences, callables) with
//!   cheap reference-counted sharing
//! - **View**: Identity-stable accessor for one path; child views are cached
//!   so the same path yields the same view
//! - **mutate / Editor**: Copy-on-write edits that shallow-clone only the
//!   written path and share everything else
//! - **subscribe / Subscription**: Weakly-registered change listeners, fired
//!   once per view per write
//! - **Behavior / attach**: Per-key method dispatch schema (pointer, mutate,
//!   readonly, accessor)
//! - **Runtime**: Per-tree shared context holding the registry and the
//!   tracking scope
//!
//! # Change Propagation
//!
//! A write to a child view folds a new container into its parent, all the way
//! to the root ("bubbling"); installing a new value on a parent pushes fresh
//! slices into every live child with bubbling suppressed ("fan-out"). A write
//! of a value identical to the current one is a complete no-op.
//!
//! # Quick Start
//!
//! ```
//! use loupe::{rec, subscribe, Value, View};
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let root = View::root(rec! { "count" => 0, "label" => "counter" });
//! let count = root.key("count");
//!
//! let fired = Rc::new(Cell::new(0));
//! let counter = fired.clone();
//! let sub = subscribe(move |_| counter.set(counter.get() + 1), &[count.clone()]);
//!
//! count.write(Value::from(1));
//! assert_eq!(count.read(), Value::Int(1));
//! assert_eq!(root.read(), rec! { "count" => 1, "label" => "counter" });
//! assert_eq!(fired.get(), 1);
//!
//! // Writing the identical value notifies nobody.
//! count.write(Value::Int(1));
//! assert_eq!(fired.get(), 1);
//! sub.unsubscribe();
//! ```

mod error;
mod mutate;
mod path;
mod runtime;
mod schema;
mod subscribers;
mod value;
mod view;

pub use error::{LoupeError, LoupeResult};
pub use mutate::{mutate, Editor};
pub use path::{Path, Seg};
pub use runtime::Runtime;
pub use schema::{attach, default_behavior, resolve, Behavior, BehaviorMap};
pub use subscribers::{subscribe, ListenerFn, Subscription};
pub use value::{Func, Record, Seq, Value};
pub use view::{SeqOp, View};
