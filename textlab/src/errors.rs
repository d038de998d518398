use backtrace::Backtrace;
use serde::{de, ser};
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::result::Result;

use crate::common::{atomic, Atomic};

/// Error kinds for textlab operations.
///
/// Each kind names one category of local, synchronous failure. None of them is
/// retried inside the library; callers catch and report them at their boundary.
///
/// # Examples
///
/// ```rust
/// use textlab::errors::{ErrorKind, TextlabError, TextlabResult};
///
/// fn example() -> TextlabResult<()> {
///     Err(TextlabError::new("Document `a` does not exist", ErrorKind::NotFound))
/// }
///
/// assert_eq!(example().unwrap_err().kind(), &ErrorKind::NotFound);
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    /// A filter configuration is malformed (unknown key, missing key, wrong type,
    /// empty mandatory value or a regex that does not compile)
    ValidationError,
    /// A document or prefix map entry that was expected to exist is absent
    NotFound,
    /// A document with the same name is already stored
    AlreadyExists,
    /// Segment offsets violate `0 <= start < end <= doc_len`
    InvariantViolation,
    /// A storage query was given an unusable argument (non-positive limit, bad regex)
    InvalidArgument,
    /// The operation cannot proceed on the given input (e.g. unsorted matcher input)
    InvalidOperation,
    /// A record could not be encoded or decoded
    EncodingError,
    /// Reading importer input failed
    IOError,
    /// A state the library itself should never reach
    InternalError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::ValidationError => write!(f, "Validation error"),
            ErrorKind::NotFound => write!(f, "Not found"),
            ErrorKind::AlreadyExists => write!(f, "Already exists"),
            ErrorKind::InvariantViolation => write!(f, "Invariant violation"),
            ErrorKind::InvalidArgument => write!(f, "Invalid argument"),
            ErrorKind::InvalidOperation => write!(f, "Invalid operation"),
            ErrorKind::EncodingError => write!(f, "Encoding error"),
            ErrorKind::IOError => write!(f, "IO error"),
            ErrorKind::InternalError => write!(f, "Internal error"),
        }
    }
}

/// Error type of the crate.
///
/// `TextlabError` carries a message, an [ErrorKind], an optional cause and the
/// backtrace captured where it was created.
///
/// ```rust
/// use textlab::errors::{ErrorKind, TextlabError};
///
/// let cause = TextlabError::new("bad pattern", ErrorKind::InvalidArgument);
/// let err = TextlabError::new_with_cause("Invalid filter", ErrorKind::ValidationError, cause);
/// assert!(err.cause().is_some());
/// ```
#[derive(Clone)]
pub struct TextlabError {
    message: String,
    error_kind: ErrorKind,
    cause: Option<Box<TextlabError>>,
    backtrace: Atomic<Backtrace>,
}

impl TextlabError {
    /// Creates a new error with the given message and kind.
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        TextlabError {
            message: message.to_string(),
            error_kind,
            cause: None,
            backtrace: atomic(Backtrace::new()),
        }
    }

    /// Creates a new error that wraps `cause`.
    pub fn new_with_cause(message: &str, error_kind: ErrorKind, cause: TextlabError) -> Self {
        TextlabError {
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

    pub fn cause(&self) -> Option<&TextlabError> {
        self.cause.as_deref()
    }
}

impl Display for TextlabError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Debug for TextlabError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.cause {
            Some(cause) => write!(f, "{}: {}\nCaused by: {:?}", self.error_kind, self.message, cause),
            None => self.backtrace.read_with(|backtrace| {
                write!(f, "{}: {}\n{:?}", self.error_kind, self.message, backtrace)
            }),
        }
    }
}

impl Error for TextlabError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// Shorthand for `Result<T, TextlabError>`.
pub type TextlabResult<T> = Result<T, TextlabError>;

impl de::Error for TextlabError {
    fn custom<T: Display>(msg: T) -> Self {
        TextlabError::new(&msg.to_string(), ErrorKind::EncodingError)
    }
}

impl ser::Error for TextlabError {
    fn custom<T: Display>(msg: T) -> Self {
        TextlabError::new(&msg.to_string(), ErrorKind::EncodingError)
    }
}

impl From<std::io::Error> for TextlabError {
    fn from(err: std::io::Error) -> Self {
        TextlabError::new(&format!("IO error: {}", err), ErrorKind::IOError)
    }
}
