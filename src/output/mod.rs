//! Output formatting module
//!
//! Provides various output formats for console results.

mod formatter;

pub use formatter::{OutputFormat, ResultFormatter};
