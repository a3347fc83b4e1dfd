//! High-level operations.
//!
//! This module contains the implementation of analyzer commands.

pub mod document;

pub use document::{document, DocumentOptions, DocumentResult};
