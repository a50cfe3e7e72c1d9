//! File materialization
//!
//! Converges one regular file to an exact content, mode and ownership:
//! - atomic content replacement through a sibling temporary file
//! - attribute-only updates when the content already matches
//! - check mode reporting pending changes without writing

pub mod materializer;

// Utility modules
pub mod utils;

pub use materializer::{FileChange, FileMaterializer, MaterializeReport};
