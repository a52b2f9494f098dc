//! The host-facing reference database.
//!
//! [`Refdb`] owns one boxed [`RefdbBackend`] and forwards the host engine's
//! calls to it. On top of the raw backend contract it offers the few
//! conveniences the engine layers over every backend: sorted listings,
//! symbolic resolution and HEAD updates.

use tracing::debug;

use memref_types::ObjectId;

use crate::config::RefdbConfig;
use crate::error::{RefdbError, Result};
use crate::memory::MemoryRefdb;
use crate::reflog::Reflog;
use crate::traits::{RefdbBackend, ReferenceIterator};
use crate::types::{Reference, ReferenceTarget};

/// Maximum number of symbolic hops [`Refdb::resolve`] follows.
pub const MAX_SYMBOLIC_DEPTH: usize = 5;

/// Name of the symbolic reference naming the current branch.
pub const HEAD: &str = "HEAD";

/// A reference database backed by any [`RefdbBackend`].
pub struct Refdb {
    backend: Box<dyn RefdbBackend>,
}

impl Refdb {
    /// Wrap an existing backend.
    pub fn new(backend: Box<dyn RefdbBackend>) -> Self {
        Self { backend }
    }

    /// A database backed by a fresh [`MemoryRefdb`].
    pub fn in_memory() -> Self {
        Self::in_memory_with(RefdbConfig::default())
    }

    pub fn in_memory_with(config: RefdbConfig) -> Self {
        debug!(?config, "creating in-memory refdb");
        Self::new(Box::new(MemoryRefdb::with_config(config)))
    }

    pub fn backend(&self) -> &dyn RefdbBackend {
        self.backend.as_ref()
    }

    pub fn exists(&self, name: &str) -> Result<bool> {
        self.backend.exists(name)
    }

    pub fn lookup(&self, name: &str) -> Result<Reference> {
        self.backend.lookup(name)
    }

    /// Start iterating; see [`RefdbBackend::iterator`].
    pub fn iter(&self, glob: Option<&str>) -> Result<Box<dyn ReferenceIterator + '_>> {
        self.backend.iterator(glob)
    }

    /// Create a reference that must not exist yet.
    pub fn create(&mut self, reference: &Reference) -> Result<()> {
        self.write(reference, false, None)
    }

    pub fn write(
        &mut self,
        reference: &Reference,
        force: bool,
        expected: Option<&ReferenceTarget>,
    ) -> Result<()> {
        debug!(name = %reference.name(), force, cas = expected.is_some(), "write ref");
        self.backend.write(reference, force, expected)
    }

    pub fn rename(&mut self, old_name: &str, new_name: &str, force: bool) -> Result<Reference> {
        debug!(old = %old_name, new = %new_name, force, "rename ref");
        self.backend.rename(old_name, new_name, force)
    }

    pub fn delete(&mut self, name: &str, expected: Option<&ReferenceTarget>) -> Result<()> {
        debug!(name = %name, cas = expected.is_some(), "delete ref");
        self.backend.delete(name, expected)
    }

    pub fn compress(&mut self) -> Result<()> {
        self.backend.compress()
    }

    pub fn has_log(&self, name: &str) -> bool {
        self.backend.has_log(name)
    }

    pub fn ensure_log(&mut self, name: &str) -> Result<()> {
        self.backend.ensure_log(name)
    }

    pub fn reflog_read(&self, name: &str) -> Result<Reflog> {
        self.backend.reflog_read(name)
    }

    pub fn reflog_write(&mut self, reflog: &Reflog) -> Result<()> {
        self.backend.reflog_write(reflog)
    }

    pub fn reflog_rename(&mut self, old_name: &str, new_name: &str) -> Result<()> {
        self.backend.reflog_rename(old_name, new_name)
    }

    pub fn reflog_delete(&mut self, name: &str) -> Result<()> {
        self.backend.reflog_delete(name)
    }

    /// All reference names matching `glob` (or all names), sorted.
    pub fn list_names(&self, glob: Option<&str>) -> Result<Vec<String>> {
        let mut iter = self.backend.iterator(glob)?;
        let mut names = Vec::new();
        while let Some(name) = iter.next_name() {
            names.push(name.to_string());
        }
        names.sort();
        Ok(names)
    }

    /// All references matching `glob` (or all references), sorted by name.
    pub fn list(&self, glob: Option<&str>) -> Result<Vec<Reference>> {
        let mut iter = self.backend.iterator(glob)?;
        let mut refs = Vec::new();
        while let Some(reference) = iter.next_ref() {
            refs.push(reference);
        }
        refs.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(refs)
    }

    /// Follow symbolic references from `name` until a direct one is reached.
    ///
    /// Fails with `NotFound` if any hop is missing and with `SymbolicLoop`
    /// after [`MAX_SYMBOLIC_DEPTH`] hops.
    pub fn resolve(&self, name: &str) -> Result<Reference> {
        let mut current = self.backend.lookup(name)?;
        for _ in 0..MAX_SYMBOLIC_DEPTH {
            let next = match current.symbolic_target() {
                None => return Ok(current),
                Some(target) => self.backend.lookup(target)?,
            };
            current = next;
        }
        if current.is_direct() {
            return Ok(current);
        }
        Err(RefdbError::SymbolicLoop {
            name: name.to_string(),
        })
    }

    /// The object `name` ultimately points at.
    pub fn resolve_id(&self, name: &str) -> Result<ObjectId> {
        let resolved = self.resolve(name)?;
        resolved
            .target()
            .copied()
            .ok_or_else(|| RefdbError::SymbolicLoop {
                name: name.to_string(),
            })
    }

    /// Point `HEAD` at `target`, creating or replacing it.
    pub fn set_head(&mut self, target: &str) -> Result<()> {
        self.write(&Reference::symbolic(HEAD, target), true, None)
    }
}

impl Default for Refdb {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl std::fmt::Debug for Refdb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Refdb").finish_non_exhaustive()
    }
}
