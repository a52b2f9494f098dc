//! Reflog shim.
//!
//! The in-memory database keeps no history. [`NullReflog`] answers the reflog
//! half of the backend contract: nothing is ever logged, reads find nothing,
//! and writes, renames and deletes succeed without doing anything.

use memref_types::ObjectId;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{RefdbError, Result};

/// One recorded change of a reference's value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReflogEntry {
    pub old: ObjectId,
    pub new: ObjectId,
    /// Who made the change (`"Name <email>"`).
    pub committer: String,
    pub message: Option<String>,
}

/// The history of one reference, as the host engine hands it in.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reflog {
    pub name: String,
    pub entries: Vec<ReflogEntry>,
}

impl Reflog {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }
}

/// Stateless reflog that stores nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullReflog;

impl NullReflog {
    pub fn has_log(&self, _name: &str) -> bool {
        false
    }

    pub fn ensure_log(&self, name: &str) -> Result<()> {
        trace!(name = %name, "ensure_log ignored");
        Ok(())
    }

    pub fn read(&self, name: &str) -> Result<Reflog> {
        Err(RefdbError::not_found(name))
    }

    pub fn write(&self, reflog: &Reflog) -> Result<()> {
        trace!(name = %reflog.name, entries = reflog.entries.len(), "reflog write dropped");
        Ok(())
    }

    pub fn rename(&self, old_name: &str, new_name: &str) -> Result<()> {
        trace!(old = %old_name, new = %new_name, "reflog rename ignored");
        Ok(())
    }

    pub fn delete(&self, name: &str) -> Result<()> {
        trace!(name = %name, "reflog delete ignored");
        Ok(())
    }
}
