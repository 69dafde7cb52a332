//! Error types for yangtree.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.
//! Every error maps onto a small closed [`ErrorCode`] so that callers can
//! branch on the kind of failure rather than on message text.

use std::fmt;

use thiserror::Error;

use crate::span::Span;

/// Result type used throughout yangtree.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for yangtree operations.
#[derive(Debug, Clone, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates an "already exists" collision error.
    ///
    /// `original` is the location of the earlier declaration.
    #[must_use]
    pub fn already_exists(what: impl Into<String>, name: impl Into<String>, original: Span) -> Self {
        Self::new(ErrorKind::AlreadyExists {
            what: what.into(),
            name: name.into(),
            original,
        })
    }

    /// Creates a not found error.
    #[must_use]
    pub fn not_found(what: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound {
            what: what.into(),
            name: name.into(),
        })
    }

    /// Creates a validation failure at the given line.
    #[must_use]
    pub fn validation(message: impl Into<String>, line: u32) -> Self {
        Self::new(ErrorKind::Validation {
            message: message.into(),
            line,
        })
    }

    /// Creates an invalid argument error.
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument(message.into()))
    }

    /// Creates a syntax error.
    #[must_use]
    pub fn parse(message: impl Into<String>, line: u32, column: u32) -> Self {
        Self::new(ErrorKind::Parse {
            message: message.into(),
            line,
            column,
        })
    }

    /// Creates an I/O error.
    #[must_use]
    pub fn io(path: Option<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Io {
            path,
            message: message.into(),
        })
    }

    /// Returns the closed error code for this error.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        self.kind.code()
    }

    /// Returns the source line this error points at, if any.
    #[must_use]
    pub fn line(&self) -> Option<u32> {
        match &self.kind {
            ErrorKind::AlreadyExists { original, .. } => Some(original.line),
            ErrorKind::Validation { line, .. } | ErrorKind::Parse { line, .. } => Some(*line),
            _ => self
                .context
                .as_ref()
                .and_then(|ctx| ctx.line)
                .and_then(|line| u32::try_from(line).ok()),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::OutOfMemory {
            Self::new(ErrorKind::OutOfMemory)
        } else {
            Self::io(None, err.to_string())
        }
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    /// A prefix or name is already declared in the same scope.
    #[error("{what} \"{name}\" already exists (first declared on line {})", .original.line)]
    AlreadyExists {
        /// What kind of item collided (prefix, typedef, grouping, ...).
        what: String,
        /// The colliding name.
        name: String,
        /// Location of the original declaration.
        original: Span,
    },

    /// A referenced module, typedef, or grouping is absent.
    #[error("{what} \"{name}\" not found")]
    NotFound {
        /// What kind of item was looked up.
        what: String,
        /// The name that was looked up.
        name: String,
    },

    /// A structural rule was violated.
    #[error("validation failed on line {line}: {message}")]
    Validation {
        /// Description of the violated rule.
        message: String,
        /// Line number (1-indexed).
        line: u32,
    },

    /// Syntax error while reading a module source.
    #[error("parse error at {line}:{column}: {message}")]
    Parse {
        /// Description of the syntax error.
        message: String,
        /// Line number (1-indexed).
        line: u32,
        /// Column number (1-indexed).
        column: u32,
    },

    /// The embedding application violated an API contract.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Allocation failure.
    #[error("out of memory")]
    OutOfMemory,

    /// Reading a module source failed.
    #[error("I/O error{}: {message}", .path.as_deref().map(|p| format!(" on {p}")).unwrap_or_default())]
    Io {
        /// Path being read, when known.
        path: Option<String>,
        /// Underlying error message.
        message: String,
    },
}

impl ErrorKind {
    /// Returns the closed error code for this kind.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::AlreadyExists { .. } => ErrorCode::AlreadyExists,
            Self::NotFound { .. } => ErrorCode::NotFound,
            Self::Validation { .. } | Self::Parse { .. } => ErrorCode::Validation,
            Self::InvalidArgument(_) => ErrorCode::InvalidArgument,
            Self::OutOfMemory => ErrorCode::OutOfMemory,
            Self::Io { .. } => ErrorCode::Io,
        }
    }
}

/// The closed set of result codes every fallible operation maps onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// The operation succeeded.
    Success,
    /// A prefix or name collided with an existing one.
    AlreadyExists,
    /// A referenced item is absent.
    NotFound,
    /// API contract violation.
    InvalidArgument,
    /// Structural rule violated; carries a location.
    Validation,
    /// Allocation failure.
    OutOfMemory,
    /// I/O failure.
    Io,
}

impl ErrorCode {
    /// Returns the code of a result.
    #[must_use]
    pub fn of<T>(result: &Result<T>) -> Self {
        match result {
            Ok(_) => Self::Success,
            Err(err) => err.code(),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Success => "success",
            Self::AlreadyExists => "already exists",
            Self::NotFound => "not found",
            Self::InvalidArgument => "invalid argument",
            Self::Validation => "validation failure",
            Self::OutOfMemory => "out of memory",
            Self::Io => "I/O failure",
        };
        f.write_str(name)
    }
}

/// Context about where an error occurred.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ErrorContext {
    /// Module name or source path.
    pub source: Option<String>,
    /// Line number in source.
    pub line: Option<usize>,
    /// Column number in source.
    pub column: Option<usize>,
    /// Chain of modules being loaded when the error occurred.
    pub stack: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the source location.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Sets the line and column.
    #[must_use]
    pub fn with_position(mut self, line: usize, column: usize) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }

    /// Adds a stack frame.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.stack.push(frame.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.source {
            write!(f, "at {source}")?;
            if let (Some(line), Some(col)) = (self.line, self.column) {
                write!(f, ":{line}:{col}")?;
            }
        }
        if !self.stack.is_empty() {
            writeln!(f)?;
            for frame in &self.stack {
                writeln!(f, "  while loading {frame}")?;
            }
        }
        Ok(())
    }
}
