//! Search entry points over loaded records.
//!
//! # Responsibility
//! - Keep result narrowing inside core so every caller filters the same way.
//!
//! # See also
//! - `filter::Searchable` for the per-record field lists.

pub mod filter;
