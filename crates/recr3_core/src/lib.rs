//! Carving engine for recovering Canon CR3 files from unstructured
//! binary data: memory dumps, disk images, corrupted storage.
//!
//! The pipeline scans a [`BlockSource`] for CR3 signatures, resolves
//! each candidate's size from the container's atom structure, and
//! copies the resolved region into a standalone output file.

pub mod atoms;
pub mod carve;
mod error;
pub mod extract;
pub mod resolver;
pub mod scanner;
mod traits;

pub use atoms::{read_atom, Atom, AtomWalker};
pub use carve::run_carve;
pub use error::{CoreError, Result};
pub use extract::Extractor;
pub use resolver::{resolve_size, ChunkPolicy};
pub use scanner::{Signature, SignatureScanner};
pub use traits::BlockSource;

#[cfg(test)]
pub(crate) mod testutil;
