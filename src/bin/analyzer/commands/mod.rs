//! Command implementations

pub mod document;
