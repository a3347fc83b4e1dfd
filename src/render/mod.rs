//! Report rendering.

pub mod documentation;
pub mod html;

pub use documentation::{make_output_directory, workflow_id, Documentation};
