//! Core reference types.
//!
//! A reference binds a name to either an object id (direct) or to the name of
//! another reference (symbolic). The store never resolves symbolic chains;
//! that is left to the caller (see [`Refdb::resolve`](crate::Refdb::resolve)).

use std::fmt;

use memref_types::ObjectId;
use serde::{Deserialize, Serialize};

/// What a reference points at.
///
/// Also used as the expected prior value for compare-and-swap writes and
/// deletes.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReferenceTarget {
    /// Points directly at an object.
    Direct(ObjectId),
    /// Points at another reference by name (e.g. `HEAD` -> `refs/heads/main`).
    Symbolic(String),
}

impl ReferenceTarget {
    pub fn kind(&self) -> ReferenceKind {
        match self {
            ReferenceTarget::Direct(_) => ReferenceKind::Direct,
            ReferenceTarget::Symbolic(_) => ReferenceKind::Symbolic,
        }
    }
}

impl fmt::Display for ReferenceTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceTarget::Direct(oid) => write!(f, "{oid}"),
            ReferenceTarget::Symbolic(name) => write!(f, "ref: {name}"),
        }
    }
}

/// The two kinds of reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReferenceKind {
    Direct,
    Symbolic,
}

/// A named reference as handed to and returned from the database.
///
/// Values returned by lookups and iterators are owned copies; mutating them
/// does not affect the store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    name: String,
    target: ReferenceTarget,
}

impl Reference {
    /// Create a direct reference.
    pub fn direct(name: impl Into<String>, oid: ObjectId) -> Self {
        Self {
            name: name.into(),
            target: ReferenceTarget::Direct(oid),
        }
    }

    /// Create a symbolic reference pointing at `target`.
    pub fn symbolic(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target: ReferenceTarget::Symbolic(target.into()),
        }
    }

    pub fn new(name: impl Into<String>, target: ReferenceTarget) -> Self {
        Self {
            name: name.into(),
            target,
        }
    }

    /// Full reference name (e.g. "refs/heads/main").
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ReferenceKind {
        self.target.kind()
    }

    /// The value this reference holds.
    pub fn value(&self) -> &ReferenceTarget {
        &self.target
    }

    /// The object id, for direct references.
    pub fn target(&self) -> Option<&ObjectId> {
        match &self.target {
            ReferenceTarget::Direct(oid) => Some(oid),
            ReferenceTarget::Symbolic(_) => None,
        }
    }

    /// The referenced name, for symbolic references.
    pub fn symbolic_target(&self) -> Option<&str> {
        match &self.target {
            ReferenceTarget::Direct(_) => None,
            ReferenceTarget::Symbolic(name) => Some(name),
        }
    }

    pub fn is_direct(&self) -> bool {
        matches!(self.target, ReferenceTarget::Direct(_))
    }

    pub fn is_symbolic(&self) -> bool {
        matches!(self.target, ReferenceTarget::Symbolic(_))
    }

    /// Split into name and target.
    pub fn into_parts(self) -> (String, ReferenceTarget) {
        (self.name, self.target)
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.target, self.name)
    }
}
