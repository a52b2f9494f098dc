//! Ephemeral in-memory reference database.
//!
//! This crate provides a reference database backend that a version-control
//! engine can plug in instead of on-disk refs. Each reference binds a name to
//! either an object id (direct) or another reference name (symbolic).
//! Everything lives in memory and disappears with the database.
//!
//! # Architecture
//!
//! - **Store**: [`MemoryRefdb`] keeps records in an arena indexed by name,
//!   with create/update, lookup, delete and rename. Writes and deletes accept
//!   an expected prior value and fail with `Modified` on mismatch.
//! - **Iterator**: [`MemoryRefIter`] walks every live reference exactly once,
//!   optionally filtered by a glob.
//! - **Reflog**: [`NullReflog`] satisfies the reflog contract without keeping
//!   any history.
//! - **Host adapter**: [`Refdb`] drives any [`RefdbBackend`] and adds
//!   resolution of symbolic chains and sorted listings.
//!
//! # Modules
//!
//! - [`error`] — Error and status types
//! - [`types`] — [`Reference`], [`ReferenceTarget`], [`ReferenceKind`]
//! - [`traits`] — The [`RefdbBackend`] and [`ReferenceIterator`] interfaces
//! - [`memory`] — The in-memory [`MemoryRefdb`]
//! - [`iter`] — Cursor over a [`MemoryRefdb`]
//! - [`reflog`] — Reflog value types and the [`NullReflog`] shim
//! - [`refdb`] — The host-facing [`Refdb`]
//! - [`names`] — Reference name validation
//! - [`glob`] — Glob patterns for filtered iteration
//! - [`hash`] — The name hash used by the index
//! - [`config`] — [`RefdbConfig`]

pub mod config;
pub mod error;
pub mod glob;
pub mod hash;
pub mod iter;
pub mod memory;
pub mod names;
pub mod refdb;
pub mod reflog;
pub mod traits;
pub mod types;

pub use config::RefdbConfig;
pub use error::{status_of, ErrorCode, RefdbError, Result};
pub use glob::Glob;
pub use iter::{MemoryRefIter, Names};
pub use memory::{MemoryRefdb, RefdbStats};
pub use names::validate_reference_name;
pub use refdb::{Refdb, HEAD, MAX_SYMBOLIC_DEPTH};
pub use reflog::{NullReflog, Reflog, ReflogEntry};
pub use traits::{RefdbBackend, ReferenceIterator};
pub use types::{Reference, ReferenceKind, ReferenceTarget};

pub use memref_types::{ObjectFormat, ObjectId};
