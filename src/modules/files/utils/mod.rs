//! Utility functions for file operations

pub mod atomic;
pub mod checksum;
pub mod ownership;
pub mod permissions;

pub use atomic::*;
pub use checksum::*;
pub use ownership::*;
pub use permissions::*;
