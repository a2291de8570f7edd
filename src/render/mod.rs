//! Rendering module for converting outline results to output formats.

mod json;

pub use json::{to_json, JsonFormat};
