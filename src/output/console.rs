//! Human-readable console output

use super::traits::{sorted_rows, OutputResult, ResultSink};
use crate::crawler::CrawlReport;
use crate::state::EmailMap;
use std::io::Write;

const RULE: &str = "==================================";

/// Writes the sorted email listing to any writer (stdout in the binary)
pub struct ConsoleSink<W: Write> {
    writer: W,
}

impl<W: Write> ConsoleSink<W> {
    /// Creates a sink writing to `writer`
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Writes the elapsed-time line and, if needed, the interrupted notice
    ///
    /// # Example
    ///
    /// ```text
    /// [-] Process interrupted by user!
    ///
    /// [+] Process Finished in 4.21 seconds.
    /// [i] 12 pages processed (1 failed, 0 skipped), 2 linked documents scanned
    /// ```
    pub fn write_summary(&mut self, report: &CrawlReport) -> OutputResult<()> {
        if report.interrupted {
            writeln!(self.writer, "\n[-] Process interrupted by user!")?;
        }

        writeln!(
            self.writer,
            "\n[+] Process Finished in {:.2} seconds.",
            report.elapsed.as_secs_f64()
        )?;
        writeln!(
            self.writer,
            "[i] {} pages processed ({} failed, {} skipped), {} linked documents scanned",
            report.pages_processed,
            report.pages_failed,
            report.pages_skipped,
            report.documents_fetched
        )?;
        Ok(())
    }

    /// Consumes the sink and returns the writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ResultSink for ConsoleSink<W> {
    fn write_results(&mut self, emails: &EmailMap) -> OutputResult<()> {
        writeln!(self.writer, "\nList of Mails ({} found):", emails.len())?;
        writeln!(self.writer, "{}", RULE)?;
        for (email, source) in sorted_rows(emails) {
            writeln!(self.writer, "      {} (found at: {})", email, source)?;
        }
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}
