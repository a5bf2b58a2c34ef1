/// Pagination state definitions
///
/// The walker is a two-state machine: it is `Active` on some listing page
/// until a stop condition moves it to the terminal `Done` state.
use std::fmt;

/// Why pagination stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopReason {
    /// A listing page yielded no item references
    EmptyPage,

    /// A listing page could not be fetched
    FetchFailed,

    /// The configured maximum page count was reached
    PageLimit,

    /// A listing page repeated the previous page's references
    RepeatedPage,

    /// The run was cancelled from outside
    Cancelled,
}

impl StopReason {
    /// Returns the string form used in logs and reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EmptyPage => "empty_page",
            Self::FetchFailed => "fetch_failed",
            Self::PageLimit => "page_limit",
            Self::RepeatedPage => "repeated_page",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns true for the stop signals a well-behaved catalog produces
    pub fn is_natural_end(&self) -> bool {
        matches!(self, Self::EmptyPage | Self::PageLimit)
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// State of the pagination walk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkState {
    /// Walking; `page` is the next listing page to request (1-based)
    Active { page: u32 },

    /// Terminal; no further listing pages are requested
    Done { reason: StopReason },
}

impl WalkState {
    /// Initial state: about to request page 1
    pub fn start() -> Self {
        Self::Active { page: 1 }
    }

    /// Moves to the next page. `Done` stays `Done`.
    pub fn advance(self) -> Self {
        match self {
            Self::Active { page } => Self::Active {
                page: page.saturating_add(1),
            },
            done => done,
        }
    }

    /// Moves to `Done`. A walk that is already done keeps its first reason.
    pub fn finish(self, reason: StopReason) -> Self {
        match self {
            Self::Active { .. } => Self::Done { reason },
            done => done,
        }
    }

    /// Returns true once the walk has stopped
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done { .. })
    }

    /// Returns the stop reason once done
    pub fn stop_reason(&self) -> Option<StopReason> {
        match self {
            Self::Done { reason } => Some(*reason),
            Self::Active { .. } => None,
        }
    }
}

impl Default for WalkState {
    fn default() -> Self {
        Self::start()
    }
}

impl fmt::Display for WalkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active { page } => write!(f, "active(page {})", page),
            Self::Done { reason } => write!(f, "done({})", reason),
        }
    }
}
