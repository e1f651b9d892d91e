use std::io::Error as IoError;

use crate::{mods::InvalidModError, GameMode, ParseError};

/// `Result<_, akatsuki_pp::Error>`
pub type Result<T> = std::result::Result<T, Error>;

/// Any error that can occur while calculating difficulty or performance.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to parse beatmap")]
    Parse(#[source] ParseError),
    #[error("invalid mods")]
    Mods(#[from] InvalidModError),
    #[error("invalid play result")]
    PlayResult(#[from] InvalidPlayResultError),
    #[error("cannot convert {from} beatmap to {to}")]
    Conversion { from: GameMode, to: GameMode },
    #[error("failed to read beatmap")]
    Io(#[from] IoError),
}

impl From<ParseError> for Error {
    #[inline]
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::Io(err) => Self::Io(err),
            err => Self::Parse(err),
        }
    }
}

/// A play result value that is out of range.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum InvalidPlayResultError {
    #[error("accuracy must be within 0 and 100, got {0}")]
    Accuracy(f64),
    #[error("{misses} misses exceed the {objects} judged objects")]
    Misses { misses: u32, objects: u32 },
    #[error("{field} ({value}) exceeds the {objects} judged objects")]
    Judgements {
        field: &'static str,
        value: u32,
        objects: u32,
    },
}

impl InvalidPlayResultError {
    /// Name of the offending field.
    pub const fn field(&self) -> &'static str {
        match self {
            Self::Accuracy(_) => "accuracy",
            Self::Misses { .. } => "miss_count",
            Self::Judgements { field, .. } => field,
        }
    }
}
