//! Utility module.

pub mod cache;
