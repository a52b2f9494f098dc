//! Forward-only cursor over a [`MemoryRefdb`](crate::MemoryRefdb).
//!
//! The cursor walks the arena slot by slot, skipping vacant slots and names
//! rejected by its glob. It borrows the database, so the database cannot be
//! mutated while a cursor is alive. Order is arena order: neither name order
//! nor insertion order is promised, since freed slots are reused.

use std::iter::FusedIterator;

use crate::glob::Glob;
use crate::memory::RefRecord;
use crate::traits::ReferenceIterator;
use crate::types::Reference;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CursorState {
    Scanning,
    Exhausted,
}

/// Lazy, single-pass iterator over stored references.
#[derive(Debug)]
pub struct MemoryRefIter<'a> {
    slots: &'a [Option<RefRecord>],
    next_slot: usize,
    glob: Option<Glob>,
    state: CursorState,
}

impl<'a> MemoryRefIter<'a> {
    pub(crate) fn new(slots: &'a [Option<RefRecord>], glob: Option<Glob>) -> Self {
        Self {
            slots,
            next_slot: 0,
            glob,
            state: CursorState::Scanning,
        }
    }

    fn advance(&mut self) -> Option<&'a RefRecord> {
        if self.state == CursorState::Exhausted {
            return None;
        }
        let slots = self.slots;
        while let Some(slot) = slots.get(self.next_slot) {
            self.next_slot += 1;
            let Some(record) = slot else { continue };
            if self.glob.as_ref().map_or(true, |g| g.is_match(&record.name)) {
                return Some(record);
            }
        }
        self.state = CursorState::Exhausted;
        None
    }

    /// Advance and return only the name of the next reference.
    pub fn next_name(&mut self) -> Option<&'a str> {
        self.advance().map(|record| record.name.as_str())
    }

    /// Returns `true` once the cursor has run off the end.
    pub fn is_exhausted(&self) -> bool {
        self.state == CursorState::Exhausted
    }

    /// Turn this cursor into an iterator over names only.
    pub fn names(self) -> Names<'a> {
        Names { inner: self }
    }
}

impl Iterator for MemoryRefIter<'_> {
    type Item = Reference;

    fn next(&mut self) -> Option<Reference> {
        self.advance().map(RefRecord::to_reference)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.state {
            CursorState::Exhausted => (0, Some(0)),
            CursorState::Scanning => (0, Some(self.slots.len().saturating_sub(self.next_slot))),
        }
    }
}

impl FusedIterator for MemoryRefIter<'_> {}

impl ReferenceIterator for MemoryRefIter<'_> {
    fn next_ref(&mut self) -> Option<Reference> {
        self.next()
    }

    fn next_name(&mut self) -> Option<&str> {
        MemoryRefIter::next_name(self)
    }
}

/// Iterator over reference names, see [`MemoryRefIter::names`].
#[derive(Debug)]
pub struct Names<'a> {
    inner: MemoryRefIter<'a>,
}

impl<'a> Iterator for Names<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        self.inner.next_name()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl FusedIterator for Names<'_> {}
