//! Shared helpers for artifact handling.

pub mod fs;
