//! Vote matrix sources.
//!
//! Datasets are either downloaded from PublicWhip or read from a local
//! directory; both paths end in the same parser.

pub mod fetcher;
pub mod local;
pub mod parser;

pub use fetcher::{FetchOptions, PublicWhipClient};
