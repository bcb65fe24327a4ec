//! Result sink trait
//!
//! A sink consumes the final email map once the crawl is over. Sinks never
//! modify the map; a failing sink leaves it intact for the next one.

use crate::state::EmailMap;
use crate::OutputError;

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Trait for result sinks
pub trait ResultSink {
    /// Renders the email map
    ///
    /// # Arguments
    ///
    /// * `emails` - Email → first source URL, already sorted by email
    fn write_results(&mut self, emails: &EmailMap) -> OutputResult<()>;
}

/// Sorted `(email, source)` pairs of an email map
pub fn sorted_rows(emails: &EmailMap) -> Vec<(&str, &str)> {
    emails
        .iter()
        .map(|(email, source)| (email.as_str(), source.as_str()))
        .collect()
}
