//! Analysis modules.
//!
//! Statistics computed over built graphs for reporting.

pub mod summary;

pub use summary::*;
