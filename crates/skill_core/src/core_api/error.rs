use std::error::Error;
use std::fmt;

use crate::error::{ErrorCode, SkillError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreErrorCode {
    Io,
    Decode,
    UnsupportedGame,
    Structure,
    Pairing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreError {
    pub code: CoreErrorCode,
    pub message: String,
    /// Record the failure was raised for, when it came from one record.
    pub record: Option<usize>,
}

impl CoreError {
    pub fn new(code: CoreErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            record: None,
        }
    }
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl Error for CoreError {}

impl From<ErrorCode> for CoreErrorCode {
    fn from(code: ErrorCode) -> Self {
        match code {
            ErrorCode::Io => CoreErrorCode::Io,
            ErrorCode::Decode => CoreErrorCode::Decode,
            ErrorCode::UnsupportedGame => CoreErrorCode::UnsupportedGame,
            ErrorCode::Structure => CoreErrorCode::Structure,
            ErrorCode::Pairing => CoreErrorCode::Pairing,
        }
    }
}

impl From<SkillError> for CoreError {
    fn from(err: SkillError) -> Self {
        Self {
            code: err.code().into(),
            record: err.record_index(),
            message: err.to_string(),
        }
    }
}
