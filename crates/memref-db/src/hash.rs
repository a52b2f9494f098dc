//! Deterministic polynomial string hash for reference names.
//!
//! `h = h * 31 + byte` over the name's bytes with wrapping `u32` arithmetic.
//! The name index uses it through [`BuildRefNameHasher`], so the same name
//! always lands in the same place across runs.

use std::hash::{BuildHasher, Hasher};

const BASE: u32 = 31;

/// Hash a reference name.
pub fn name_hash(name: &str) -> u32 {
    name.bytes()
        .fold(0u32, |h, b| h.wrapping_mul(BASE).wrapping_add(u32::from(b)))
}

/// Reduce a name's hash to a bucket index in a table of `buckets` slots.
///
/// # Panics
///
/// Panics if `buckets` is zero.
pub fn bucket_of(name: &str, buckets: usize) -> usize {
    name_hash(name) as usize % buckets
}

/// [`Hasher`] form of [`name_hash`].
///
/// `str`'s `Hash` impl writes the bytes followed by a `0xff` terminator; the
/// terminator is folded in like any other byte, which keeps the result
/// deterministic.
#[derive(Clone, Copy, Debug, Default)]
pub struct RefNameHasher {
    state: u32,
}

impl Hasher for RefNameHasher {
    fn write(&mut self, bytes: &[u8]) {
        for b in bytes {
            self.state = self.state.wrapping_mul(BASE).wrapping_add(u32::from(*b));
        }
    }

    fn finish(&self) -> u64 {
        u64::from(self.state)
    }
}

/// Builds [`RefNameHasher`]s for the name index.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuildRefNameHasher;

impl BuildHasher for BuildRefNameHasher {
    type Hasher = RefNameHasher;

    fn build_hasher(&self) -> RefNameHasher {
        RefNameHasher::default()
    }
}
