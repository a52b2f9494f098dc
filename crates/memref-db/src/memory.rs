//! In-memory reference database.
//!
//! [`MemoryRefdb`] keeps every reference record in an arena of slots addressed
//! by stable handles, plus a name index hashed with
//! [`BuildRefNameHasher`](crate::hash::BuildRefNameHasher). Deleted slots go on
//! a free list and are reused. Nothing is persisted: all references are gone
//! once the database is dropped.
//!
//! # Invariants
//!
//! - Every index entry names a live slot, and every live slot is indexed
//!   under exactly its own name.
//! - A failed call leaves the database exactly as it was. Anything that may
//!   allocate is reserved or copied before the first mutation.

use std::collections::HashMap;
use std::fmt;

use tracing::{debug, trace, warn};

use crate::config::RefdbConfig;
use crate::error::{RefdbError, Result};
use crate::hash::{bucket_of, BuildRefNameHasher};
use crate::iter::MemoryRefIter;
use crate::names::validate_reference_name;
use crate::reflog::{NullReflog, Reflog};
use crate::traits::{RefdbBackend, ReferenceIterator};
use crate::types::{Reference, ReferenceKind, ReferenceTarget};

/// Stable index of a record in the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct RefHandle(usize);

/// A stored reference.
#[derive(Debug)]
pub(crate) struct RefRecord {
    pub(crate) name: String,
    pub(crate) target: ReferenceTarget,
}

impl RefRecord {
    /// Plain clone for the iterator, which has no error channel. `lookup`
    /// copies through `try_copy` so it can report `OutOfMemory` instead.
    pub(crate) fn to_reference(&self) -> Reference {
        Reference::new(self.name.clone(), self.target.clone())
    }
}

/// Copy a string, reporting allocation failure instead of aborting.
fn try_copy(s: &str) -> Result<String> {
    let mut out = String::new();
    out.try_reserve_exact(s.len())?;
    out.push_str(s);
    Ok(out)
}

fn try_copy_target(target: &ReferenceTarget) -> Result<ReferenceTarget> {
    Ok(match target {
        ReferenceTarget::Direct(oid) => ReferenceTarget::Direct(*oid),
        ReferenceTarget::Symbolic(name) => ReferenceTarget::Symbolic(try_copy(name)?),
    })
}

/// Counters describing the current contents of a [`MemoryRefdb`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RefdbStats {
    /// Live references.
    pub references: usize,
    pub direct: usize,
    pub symbolic: usize,
    /// Arena slots waiting for reuse.
    pub free_slots: usize,
    /// Longest collision chain when names are spread over
    /// [`RefdbConfig::stats_buckets`] buckets.
    pub longest_chain: usize,
}

/// An in-memory implementation of [`RefdbBackend`].
pub struct MemoryRefdb {
    slots: Vec<Option<RefRecord>>,
    free: Vec<usize>,
    index: HashMap<String, RefHandle, BuildRefNameHasher>,
    reflog: NullReflog,
    config: RefdbConfig,
}

impl MemoryRefdb {
    /// Create an empty database with the default configuration.
    pub fn new() -> Self {
        Self::with_config(RefdbConfig::default())
    }

    /// Create an empty database with the given configuration.
    pub fn with_config(config: RefdbConfig) -> Self {
        Self {
            slots: Vec::with_capacity(config.initial_capacity),
            free: Vec::new(),
            index: HashMap::with_capacity_and_hasher(config.initial_capacity, BuildRefNameHasher),
            reflog: NullReflog,
            config,
        }
    }

    pub fn config(&self) -> &RefdbConfig {
        &self.config
    }

    /// Number of live references.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns `true` if no references are stored.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Drop every reference.
    pub fn clear(&mut self) {
        debug!(count = self.index.len(), "clearing refdb");
        self.slots.clear();
        self.free.clear();
        self.index.clear();
    }

    /// Iterate over all references in arena order.
    pub fn iter(&self) -> MemoryRefIter<'_> {
        MemoryRefIter::new(&self.slots, None)
    }

    /// Iterate over references whose names match `glob`.
    pub fn iter_glob(&self, glob: &str) -> MemoryRefIter<'_> {
        MemoryRefIter::new(&self.slots, Some(crate::glob::Glob::new(glob)))
    }

    pub fn stats(&self) -> RefdbStats {
        let buckets = self.config.stats_buckets.max(1);
        let mut chains = vec![0usize; buckets];
        let mut stats = RefdbStats {
            free_slots: self.free.len(),
            ..Default::default()
        };
        for record in self.slots.iter().flatten() {
            stats.references += 1;
            match record.target.kind() {
                ReferenceKind::Direct => stats.direct += 1,
                ReferenceKind::Symbolic => stats.symbolic += 1,
            }
            chains[bucket_of(&record.name, buckets)] += 1;
        }
        stats.longest_chain = chains.into_iter().max().unwrap_or(0);
        stats
    }

    fn record(&self, name: &str) -> Option<&RefRecord> {
        let handle = self.index.get(name)?;
        self.slots.get(handle.0)?.as_ref()
    }

    fn record_mut(&mut self, name: &str) -> Option<&mut RefRecord> {
        let handle = self.index.get(name)?;
        self.slots.get_mut(handle.0)?.as_mut()
    }

    fn check_name(&self, name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(RefdbError::invalid("ref name must not be empty"));
        }
        if self.config.validate_names {
            validate_reference_name(name)?;
        }
        Ok(())
    }

    fn check_reference(&self, reference: &Reference) -> Result<()> {
        let name = reference.name();
        self.check_name(name)?;
        match reference.value() {
            ReferenceTarget::Direct(oid) if oid.is_null() => Err(RefdbError::invalid(format!(
                "direct ref {name} has a null target"
            ))),
            ReferenceTarget::Symbolic(target) if target.is_empty() => Err(RefdbError::invalid(
                format!("symbolic ref {name} has an empty target"),
            )),
            ReferenceTarget::Symbolic(target) if self.config.validate_names => {
                validate_reference_name(target)
            }
            _ => Ok(()),
        }
    }

    /// Link a brand-new record. All allocation happens before the first
    /// mutation.
    fn insert_new(&mut self, reference: &Reference) -> Result<()> {
        let name = try_copy(reference.name())?;
        let key = try_copy(reference.name())?;
        let target = try_copy_target(reference.value())?;
        self.index.try_reserve(1)?;
        if self.free.is_empty() {
            self.slots.try_reserve(1)?;
        }

        let record = RefRecord { name, target };
        let handle = match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(record);
                RefHandle(slot)
            }
            None => {
                self.slots.push(Some(record));
                RefHandle(self.slots.len() - 1)
            }
        };
        self.index.insert(key, handle);
        Ok(())
    }

    /// Unlink the record at `handle`. Callers must have reserved room on the
    /// free list.
    fn unlink(&mut self, name: &str, handle: RefHandle) {
        self.index.remove(name);
        if let Some(slot) = self.slots.get_mut(handle.0) {
            *slot = None;
        }
        self.free.push(handle.0);
    }
}

impl Default for MemoryRefdb {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MemoryRefdb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryRefdb")
            .field("ref_count", &self.index.len())
            .field("free_slots", &self.free.len())
            .finish()
    }
}

impl RefdbBackend for MemoryRefdb {
    fn exists(&self, name: &str) -> Result<bool> {
        Ok(self.index.contains_key(name))
    }

    fn lookup(&self, name: &str) -> Result<Reference> {
        trace!(name = %name, "lookup");
        let record = self.record(name).ok_or_else(|| RefdbError::not_found(name))?;
        Ok(Reference::new(
            try_copy(&record.name)?,
            try_copy_target(&record.target)?,
        ))
    }

    fn iterator<'a>(&'a self, glob: Option<&str>) -> Result<Box<dyn ReferenceIterator + 'a>> {
        let iter = match glob {
            Some(pattern) => self.iter_glob(pattern),
            None => self.iter(),
        };
        Ok(Box::new(iter))
    }

    fn write(
        &mut self,
        reference: &Reference,
        force: bool,
        expected: Option<&ReferenceTarget>,
    ) -> Result<()> {
        self.check_reference(reference)?;
        let name = reference.name();

        if !self.index.contains_key(name) {
            if expected.is_some() {
                warn!(name = %name, "write rejected: expected a prior value but ref is missing");
                return Err(RefdbError::Modified {
                    name: name.to_string(),
                });
            }
            self.insert_new(reference)?;
            debug!(name = %name, kind = ?reference.kind(), "created ref");
            return Ok(());
        }

        if !force {
            return Err(RefdbError::AlreadyExists {
                name: name.to_string(),
            });
        }

        let target = try_copy_target(reference.value())?;
        let record = self
            .record_mut(name)
            .ok_or_else(|| RefdbError::not_found(name))?;
        if let Some(expected) = expected {
            if record.target != *expected {
                warn!(name = %name, live = %record.target, expected = %expected, "write rejected: stale value");
                return Err(RefdbError::Modified {
                    name: name.to_string(),
                });
            }
        }
        record.target = target;
        debug!(name = %name, kind = ?reference.kind(), "updated ref");
        Ok(())
    }

    fn rename(&mut self, old_name: &str, new_name: &str, force: bool) -> Result<Reference> {
        self.check_name(new_name)?;

        let displaced = self.index.get(new_name).copied();
        if displaced.is_some() && !force {
            return Err(RefdbError::AlreadyExists {
                name: new_name.to_string(),
            });
        }

        let handle = *self
            .index
            .get(old_name)
            .ok_or_else(|| RefdbError::not_found(old_name))?;
        if old_name == new_name {
            return self.lookup(old_name);
        }

        // Stage everything that allocates.
        let key = try_copy(new_name)?;
        let record_name = try_copy(new_name)?;
        self.index.try_reserve(1)?;
        if displaced.is_some() {
            self.free.try_reserve(1)?;
        }

        if let Some(victim) = displaced {
            debug!(name = %new_name, "rename overwrites existing ref");
            self.unlink(new_name, victim);
        }
        self.index.remove(old_name);
        self.index.insert(key, handle);
        let record = self
            .slots
            .get_mut(handle.0)
            .and_then(Option::as_mut)
            .ok_or_else(|| RefdbError::not_found(old_name))?;
        record.name = record_name;
        let renamed = record.to_reference();

        self.reflog.rename(old_name, new_name)?;
        debug!(old = %old_name, new = %new_name, force, "renamed ref");
        Ok(renamed)
    }

    fn delete(&mut self, name: &str, expected: Option<&ReferenceTarget>) -> Result<()> {
        let handle = *self
            .index
            .get(name)
            .ok_or_else(|| RefdbError::not_found(name))?;
        let record = self.record(name).ok_or_else(|| RefdbError::not_found(name))?;
        if let Some(expected) = expected {
            if record.target != *expected {
                warn!(name = %name, live = %record.target, expected = %expected, "delete rejected: stale value");
                return Err(RefdbError::Modified {
                    name: name.to_string(),
                });
            }
        }

        self.free.try_reserve(1)?;
        self.unlink(name, handle);
        debug!(name = %name, "deleted ref");
        Ok(())
    }

    fn compress(&mut self) -> Result<()> {
        trace!("compress is a no-op for the in-memory refdb");
        Ok(())
    }

    fn has_log(&self, name: &str) -> bool {
        self.reflog.has_log(name)
    }

    fn ensure_log(&mut self, name: &str) -> Result<()> {
        self.reflog.ensure_log(name)
    }

    fn reflog_read(&self, name: &str) -> Result<Reflog> {
        self.reflog.read(name)
    }

    fn reflog_write(&mut self, reflog: &Reflog) -> Result<()> {
        self.reflog.write(reflog)
    }

    fn reflog_rename(&mut self, old_name: &str, new_name: &str) -> Result<()> {
        self.reflog.rename(old_name, new_name)
    }

    fn reflog_delete(&mut self, name: &str) -> Result<()> {
        self.reflog.delete(name)
    }
}
