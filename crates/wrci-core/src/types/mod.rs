//! Runtime data types
//!
//! - The variable environment shared by every block of a pipeline run

pub mod variables;

pub use variables::{Variables, LAST_RC};
