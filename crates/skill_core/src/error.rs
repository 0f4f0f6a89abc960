use std::io;

use thiserror::Error;

/// Broad class of a [`SkillError`], used by callers that only need to know
/// what kind of failure happened (the CLI maps these to messages, the
/// `core_api` facade carries them in [`crate::core_api::CoreErrorCode`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Io,
    Decode,
    UnsupportedGame,
    Structure,
    Pairing,
}

#[derive(Debug, Error)]
pub enum SkillError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    #[error("record is truncated: need {needed} bytes, {available} available")]
    ShortRecord { needed: usize, available: usize },

    #[error("table length {len} is not a multiple of the record length {record_len}")]
    TableLength { len: usize, record_len: usize },

    #[error("record {index}: {source}")]
    Record {
        index: usize,
        #[source]
        source: Box<SkillError>,
    },

    #[error("unsupported game {0:?}, expected one of EO3, EO4, EOU, EO2U, EO5, EON")]
    UnsupportedGame(String),

    #[error("data section kind {kind} has {actual} values, expected {expected}")]
    SectionLength {
        kind: i32,
        expected: usize,
        actual: usize,
    },

    #[error("{count} data sections exceed the maximum of {max}")]
    TooManySections { count: usize, max: usize },

    #[error("data section kind 0 is reserved for empty slots")]
    ReservedSectionKind,

    #[error("{field} value {value:#x} does not fit in {width} bytes")]
    FieldOverflow {
        field: &'static str,
        value: u64,
        width: usize,
    },

    #[error("name list has {names} entries but the table has {records} records")]
    NamePairing { names: usize, records: usize },

    #[error("name of record {index} contains a line break")]
    NameLineBreak { index: usize },

    #[error("name list has no entry for record {index}")]
    MissingName { index: usize },

    #[error("record belongs to {actual}, expected {expected}")]
    GameMismatch {
        expected: crate::schema::Game,
        actual: crate::schema::Game,
    },
}

impl SkillError {
    pub fn at_record(self, index: usize) -> Self {
        Self::Record {
            index,
            source: Box::new(self),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Io(_) => ErrorCode::Io,
            Self::ShortRecord { .. } | Self::TableLength { .. } | Self::MissingName { .. } => {
                ErrorCode::Decode
            }
            Self::Record { source, .. } => source.code(),
            Self::UnsupportedGame(_) => ErrorCode::UnsupportedGame,
            Self::SectionLength { .. }
            | Self::TooManySections { .. }
            | Self::ReservedSectionKind
            | Self::FieldOverflow { .. }
            | Self::GameMismatch { .. } => ErrorCode::Structure,
            Self::NamePairing { .. } | Self::NameLineBreak { .. } => ErrorCode::Pairing,
        }
    }

    /// The record index this error was raised for, if it was raised while
    /// walking a table.
    pub fn record_index(&self) -> Option<usize> {
        match self {
            Self::Record { index, .. } => Some(*index),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SkillError>;
