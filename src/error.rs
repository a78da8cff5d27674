//! Error types for tyrantkv
//!
//! Two layers of failure come back from a [`Session`](crate::Session):
//!
//! - **Transport**: resolving, dialing, writing, reading, deadlines. The
//!   connection should be considered unusable and `reset()` before reuse.
//! - **Status**: the server answered with a nonzero status byte. The byte
//!   carries no reason, so the calling operation picks the [`ErrorCode`].

use std::fmt;

use thiserror::Error;

/// Result type alias using ClientError
pub type Result<T> = std::result::Result<T, ClientError>;

/// Operation-contextual error codes attached to a nonzero status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i8)]
pub enum ErrorCode {
    /// Conditional store hit a key that is already present
    Exist = 6,

    /// Fetch or delete hit a key that is absent
    NotExist = 7,

    /// Any other store failure
    Misc = 8,
}

impl ErrorCode {
    /// Numeric value of the code
    pub fn as_i8(self) -> i8 {
        self as i8
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorCode::Exist => "exist",
            ErrorCode::NotExist => "not exist",
            ErrorCode::Misc => "misc",
        };
        write!(f, "{} ({})", name, self.as_i8())
    }
}

/// Protocol-level failure: the server replied with a nonzero status byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("server error code {}", .code.as_i8())]
pub struct StatusError {
    code: ErrorCode,
}

impl StatusError {
    pub fn new(code: ErrorCode) -> Self {
        Self { code }
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// The key was already present
    pub fn is_exist(&self) -> bool {
        self.code == ErrorCode::Exist
    }

    /// The key was not found
    pub fn is_not_exist(&self) -> bool {
        self.code == ErrorCode::NotExist
    }
}

/// Unified error type for client operations
#[derive(Debug, Error)]
pub enum ClientError {
    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to resolve {addr}: {source}")]
    Resolve {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("session is not connected")]
    NotConnected,

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error(transparent)]
    Status(#[from] StatusError),

    #[error("Protocol error: {0}")]
    Protocol(String),
}

impl ClientError {
    /// Returns the status error if the server rejected the request
    pub fn status(&self) -> Option<&StatusError> {
        match self {
            ClientError::Status(status) => Some(status),
            _ => None,
        }
    }

    /// Conditional store found the key already present
    pub fn is_exist(&self) -> bool {
        self.status().is_some_and(StatusError::is_exist)
    }

    /// Fetch or delete found no such key
    pub fn is_not_exist(&self) -> bool {
        self.status().is_some_and(StatusError::is_not_exist)
    }

    /// True when the connection itself failed and should be reset
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ClientError::Io(_)
                | ClientError::Resolve { .. }
                | ClientError::Connect { .. }
                | ClientError::NotConnected
        )
    }

    /// True when a deadline elapsed mid-operation
    pub fn is_timeout(&self) -> bool {
        match self {
            ClientError::Io(e) => e.kind() == std::io::ErrorKind::TimedOut,
            _ => false,
        }
    }
}
