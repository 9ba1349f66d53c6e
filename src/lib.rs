//! Wordhelper: structural word index for a word-guessing game
//!
//! Nouns, first names and places are indexed by a structural key (length,
//! first letter and the positions of the first two vowels) and queried by
//! letter bucket with a stack of optional filters.
//! Core implementation in Rust with Python bindings.

// Core modules
pub mod cache; // Bounded LRU memo for exact lookups
pub mod classifier; // Rule-based noun categories
pub mod config;
pub mod constraint; // Positional constraint grammar
pub mod dataset; // Primary dataset readers
pub mod encoder; // Structural keys and letter buckets
pub mod entry;
pub mod error;
pub mod index; // Generic category index
pub mod io;
pub mod labels; // Side tables and the label overlay
pub mod names;
pub mod nouns;
pub mod places;
pub mod query; // Filter compilation
pub mod service; // Background build and request handling

// Python bindings
#[cfg(feature = "pyo3")]
pub mod python;

// Re-exports for convenience
pub use config::Config;
pub use encoder::{LetterBuckets, StructuralKey};
pub use entry::{CategoryTag, Entry};
pub use error::{BuildError, QueryError};
pub use index::{BuildReport, CategoryIndex, Record};
pub use query::QueryFilters;
pub use service::{Domain, Indexes, QueryRequest, QueryResponse, QueryService, Status};
