//! CSV results file
//!
//! The file has a header row `Email,Source_URL` followed by one row per
//! email, sorted by email, UTF-8 encoded.

use super::traits::{sorted_rows, OutputResult, ResultSink};
use crate::state::EmailMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const HEADER: [&str; 2] = ["Email", "Source_URL"];

/// Writes the email map to a CSV file
#[derive(Debug, Clone)]
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    /// Creates a sink writing to `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The results file location
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ResultSink for CsvSink {
    /// Writes the results file, replacing any previous one
    ///
    /// Nothing is written when the map is empty.
    fn write_results(&mut self, emails: &EmailMap) -> OutputResult<()> {
        if emails.is_empty() {
            debug!("No emails found, not writing {}", self.path.display());
            return Ok(());
        }

        info!("Saving results to {}", self.path.display());

        let mut writer = csv::Writer::from_path(&self.path)?;
        writer.write_record(HEADER)?;
        for (email, source) in sorted_rows(emails) {
            writer.write_record([email, source])?;
        }
        writer.flush()?;

        Ok(())
    }
}

/// Reads a results file back into `(email, source)` pairs in file order
///
/// # Arguments
///
/// * `path` - A file previously written by [`CsvSink`]
pub fn read_results(path: &Path) -> OutputResult<Vec<(String, String)>> {
    let mut reader = csv::Reader::from_path(path)?;

    let mut rows = Vec::new();
    for record in reader.deserialize::<(String, String)>() {
        rows.push(record?);
    }

    Ok(rows)
}
