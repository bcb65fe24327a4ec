/// Page state definitions for tracking crawl progress
///
/// A URL moves through `Queued → Processing → {Done, Skipped, Failed}`.
/// URLs discarded at dequeue time go straight from `Queued` to `Skipped`.
use std::fmt;

/// Represents the current state of a URL in the crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageState {
    // ===== Active States =====
    /// URL is waiting in the frontier
    Queued,

    /// URL has been dequeued, counted against the budget and is being fetched
    Processing,

    // ===== Terminal States =====
    /// Page was fetched and its content mined
    Done,

    /// URL was discarded without a fetch, or its content type is unsupported
    Skipped,

    /// Fetch failed (network error, timeout or non-2xx status)
    Failed,
}

impl PageState {
    /// Returns true if this is a terminal state (no further processing needed)
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Queued | Self::Processing)
    }

    /// Returns true if moving from `self` to `next` is a legal transition
    pub fn can_transition_to(&self, next: PageState) -> bool {
        matches!(
            (self, next),
            (Self::Queued, Self::Processing)
                | (Self::Queued, Self::Skipped)
                | (Self::Processing, Self::Done)
                | (Self::Processing, Self::Skipped)
                | (Self::Processing, Self::Failed)
        )
    }

    /// Short lowercase name used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Processing => "processing",
            Self::Done => "done",
            Self::Skipped => "skipped",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
