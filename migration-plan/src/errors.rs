use backtrace::Backtrace;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::result::Result;

use crate::common::{atomic, Atomic};

/// Error kinds for plan resolution.
///
/// Each kind describes one category of resolution failure. Resolution is
/// deterministic, so none of these are retryable; they all indicate a
/// problem with the supplied migration definitions or selection.
///
/// # Examples
///
/// ```rust,ignore
/// use migration_plan::errors::{PlanError, ErrorKind, PlanResult};
///
/// fn example() -> PlanResult<()> {
///     Err(PlanError::new("No such module: audit", ErrorKind::UnknownGroup))
/// }
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    /// A supplied version string is not a well-formed semantic version
    InvalidVersion,
    /// A selected module/group name has no corresponding registry
    UnknownGroup,
    /// A strict merge found the same step key in more than one group
    DuplicateKey,
    /// Invalid argument to a resolution operation
    ValidationError,
    /// Internal error (usually indicates a bug)
    InternalError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::InvalidVersion => write!(f, "Invalid version"),
            ErrorKind::UnknownGroup => write!(f, "Unknown group"),
            ErrorKind::DuplicateKey => write!(f, "Duplicate key"),
            ErrorKind::ValidationError => write!(f, "Validation error"),
            ErrorKind::InternalError => write!(f, "Internal error"),
        }
    }
}

/// Error type for plan resolution failures.
///
/// `PlanError` carries the error message, kind, and optional cause. It
/// supports error chaining and backtraces for debugging.
///
/// # Examples
///
/// ```rust,ignore
/// use migration_plan::errors::{PlanError, ErrorKind};
///
/// // Create a simple error
/// let err = PlanError::new("No such module: audit", ErrorKind::UnknownGroup);
///
/// // Create an error with a cause
/// let cause = PlanError::new("unexpected character 'x'", ErrorKind::InvalidVersion);
/// let err = PlanError::new_with_cause("Invalid ceiling '1.x'", ErrorKind::InvalidVersion, cause);
/// ```
///
/// # Type alias
///
/// The `PlanResult<T>` type alias is equivalent to `Result<T, PlanError>`
/// and is used throughout the crate for operations that can fail.
#[derive(Clone)]
pub struct PlanError {
    message: String,
    error_kind: ErrorKind,
    cause: Option<Box<PlanError>>,
    backtrace: Atomic<Backtrace>,
}

impl PlanError {
    /// Creates a new `PlanError` with the specified message and error kind.
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        PlanError {
            message: message.to_string(),
            error_kind,
            cause: None,
            backtrace: atomic(Backtrace::new()),
        }
    }

    /// Creates a new `PlanError` with a cause error.
    ///
    /// This creates an error chain where the cause error is preserved for
    /// debugging.
    pub fn new_with_cause(message: &str, error_kind: ErrorKind, cause: PlanError) -> Self {
        PlanError {
            message: message.to_string(),
            error_kind,
            cause: Some(Box::new(cause)),
            backtrace: atomic(Backtrace::new()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    pub fn cause(&self) -> Option<&Box<PlanError>> {
        self.cause.as_ref()
    }
}

impl Display for PlanError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Debug for PlanError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // print error message with stack trace followed by cause
        match &self.cause {
            Some(cause) => write!(f, "{}\nCaused by: {:?}", self.message, cause),
            None => write!(f, "{}\n{:?}", self.message, self.backtrace.read()),
        }
    }
}

impl Error for PlanError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// A result type alias for plan resolution operations.
///
/// `PlanResult<T>` is shorthand for `Result<T, PlanError>`.
pub type PlanResult<T> = Result<T, PlanError>;

// From trait implementations for automatic error conversion
impl From<semver::Error> for PlanError {
    fn from(err: semver::Error) -> Self {
        PlanError::new(
            &format!("Version parsing error: {}", err),
            ErrorKind::InvalidVersion,
        )
    }
}

impl From<String> for PlanError {
    fn from(msg: String) -> Self {
        PlanError::new(&msg, ErrorKind::InternalError)
    }
}

impl From<&str> for PlanError {
    fn from(msg: &str) -> Self {
        PlanError::new(msg, ErrorKind::InternalError)
    }
}
