pub type Error = anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// The four ways a conversation with the tracker backend can go wrong, as seen by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    AuthFailure,
    NetworkFailure,
}

/// An error returned by a `Remote`. These are wrapped in `anyhow::Error` as they propagate, so
/// callers that care about the kind of failure should use `downcast_ref::<RemoteError>()` or the
/// `remote_error_kind` helper.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum RemoteError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("A tracker already exists: {0}")]
    Conflict(String),
    #[error("Authentication failed ({status}): {message}")]
    Auth { status: u16, message: String },
    #[error("Unable to reach the tracker backend: {0}")]
    Network(String),
    #[error("Unexpected response from the tracker backend ({status}): {message}")]
    Status { status: u16, message: String },
}

impl RemoteError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RemoteError::NotFound(_) => ErrorKind::NotFound,
            RemoteError::Conflict(_) => ErrorKind::Conflict,
            RemoteError::Auth { .. } => ErrorKind::AuthFailure,
            RemoteError::Network(_) | RemoteError::Status { .. } => ErrorKind::NetworkFailure,
        }
    }
}

/// Finds a `RemoteError` anywhere in the chain of `e` and returns its kind.
pub fn remote_error_kind(e: &Error) -> Option<ErrorKind> {
    e.chain()
        .find_map(|cause| cause.downcast_ref::<RemoteError>())
        .map(RemoteError::kind)
}

/// Validation failures of the year record mutation API. A mutation that returns one of these has
/// not changed anything.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Unknown category '{0}'")]
    UnknownCategory(String),
    #[error("Unknown income source '{0}'")]
    UnknownIncomeSource(String),
    #[error("Amounts cannot be negative, got {0}")]
    NegativeAmount(String),
    #[error("The date {date} is not in the tracker year {year}")]
    DateOutsideYear { date: String, year: i32 },
    #[error("Month index {0} is out of range, expected 0 through 11")]
    InvalidMonth(u32),
    #[error("Day {day} does not exist in month index {month} of {year}")]
    InvalidDay { year: i32, month: u32, day: u32 },
    #[error("Week index {0} is out of range, expected 0 through 4")]
    InvalidWeek(u32),
    #[error("The name '{0}' appears more than once")]
    DuplicateName(String),
    #[error("Names cannot be empty")]
    EmptyName,
}
