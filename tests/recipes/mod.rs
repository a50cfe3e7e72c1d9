//! Recipe test suite

pub mod integration;
