//! Foundation types for memref.
//!
//! This crate provides the object identifier type shared by every memref
//! crate. References bind names to these identifiers; the identifiers
//! themselves are opaque content addresses produced by the host engine.
//!
//! # Key Types
//!
//! - [`ObjectId`] — Fixed-width content address (SHA-1 or SHA-256 width)
//! - [`ObjectFormat`] — Which width an [`ObjectId`] carries

pub mod error;
pub mod object;

pub use error::TypeError;
pub use object::{ObjectFormat, ObjectId};
