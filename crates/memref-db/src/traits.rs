//! The backend capability interface.
//!
//! The host engine drives a reference database exclusively through
//! [`RefdbBackend`]. A backend instance is used from one thread at a time:
//! lookups take `&self`, mutations take `&mut self`, and an iterator borrows
//! the backend for as long as it lives.

use crate::error::{RefdbError, Result};
use crate::reflog::Reflog;
use crate::types::{Reference, ReferenceTarget};

/// A forward-only cursor over a backend's references.
///
/// Once either method returns `None` the cursor is exhausted and keeps
/// returning `None`. Dropping the cursor never affects the backend.
pub trait ReferenceIterator {
    /// Advance and return an owned copy of the next reference.
    fn next_ref(&mut self) -> Option<Reference>;

    /// Advance and return only the next reference's name.
    fn next_name(&mut self) -> Option<&str>;
}

/// Storage backend for named references.
///
/// Names are full reference names such as `HEAD` or `refs/heads/main`.
pub trait RefdbBackend: Send {
    /// Whether a reference with this name exists. Never fails for a missing
    /// name.
    fn exists(&self, name: &str) -> Result<bool>;

    /// Look up a reference by name.
    ///
    /// Fails with `NotFound` if there is none.
    fn lookup(&self, name: &str) -> Result<Reference>;

    /// Start iterating over every reference, optionally only those whose
    /// names match a glob.
    fn iterator<'a>(&'a self, glob: Option<&str>) -> Result<Box<dyn ReferenceIterator + 'a>>;

    /// Create or update a reference.
    ///
    /// Without `force`, writing over an existing name fails with
    /// `AlreadyExists`. When `expected` is given, the live value must equal it
    /// or the write fails with `Modified`.
    fn write(
        &mut self,
        reference: &Reference,
        force: bool,
        expected: Option<&ReferenceTarget>,
    ) -> Result<()>;

    /// Move a reference to a new name, keeping its target.
    fn rename(&mut self, old_name: &str, new_name: &str, force: bool) -> Result<Reference>;

    /// Delete a reference. When `expected` is given, the live value must
    /// equal it or the delete fails with `Modified`.
    fn delete(&mut self, name: &str, expected: Option<&ReferenceTarget>) -> Result<()>;

    /// Compact internal storage.
    fn compress(&mut self) -> Result<()>;

    /// Whether a reflog exists for this reference.
    fn has_log(&self, name: &str) -> bool;

    /// Make sure a reflog will be kept for this reference.
    fn ensure_log(&mut self, name: &str) -> Result<()>;

    fn reflog_read(&self, name: &str) -> Result<Reflog>;

    fn reflog_write(&mut self, reflog: &Reflog) -> Result<()>;

    fn reflog_rename(&mut self, old_name: &str, new_name: &str) -> Result<()>;

    fn reflog_delete(&mut self, name: &str) -> Result<()>;

    /// Take a transactional lock on a reference.
    ///
    /// Backends without transaction support keep the default.
    fn lock(&mut self, _name: &str) -> Result<()> {
        Err(RefdbError::Unimplemented { operation: "lock" })
    }

    /// Release a lock taken with [`lock`](Self::lock), optionally writing
    /// `update` as part of the release.
    fn unlock(&mut self, _name: &str, _update: Option<&Reference>) -> Result<()> {
        Err(RefdbError::Unimplemented { operation: "unlock" })
    }
}
