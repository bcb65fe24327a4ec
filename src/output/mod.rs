//! Output module for rendering crawl results
//!
//! This module handles:
//! - The sorted console listing and the end-of-crawl summary
//! - Persisting results to a CSV file and reading them back

mod console;
mod csv_output;
mod traits;

pub use console::ConsoleSink;
pub use csv_output::{read_results, CsvSink};
pub use traits::{sorted_rows, OutputResult, ResultSink};
