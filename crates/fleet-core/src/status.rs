//! Status codes carried in responses and per-agent diagnostics

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    Ok,
    NotFound,
    AlreadyExists,
    InvalidArgument,
    Unimplemented,
    Internal,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Ok => "OK",
            Self::NotFound => "NOT_FOUND",
            Self::AlreadyExists => "ALREADY_EXISTS",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::Unimplemented => "UNIMPLEMENTED",
            Self::Internal => "INTERNAL",
            Self::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

/// An error code plus a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub err_code: ErrorCode,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub msg: String,
}

impl Status {
    pub fn new(err_code: ErrorCode, msg: impl Into<String>) -> Self {
        Self {
            err_code,
            msg: msg.into(),
        }
    }

    pub fn ok() -> Self {
        Self::new(ErrorCode::Ok, "")
    }

    pub fn not_found() -> Self {
        Self::new(ErrorCode::NotFound, "")
    }

    pub fn already_exists() -> Self {
        Self::new(ErrorCode::AlreadyExists, "")
    }

    pub fn is_ok(&self) -> bool {
        self.err_code == ErrorCode::Ok
    }
}
