use std::io::Error as IoError;

/// `Result<_, ParseError>`
pub type ParseResult<T> = Result<T, ParseError>;

/// Anything that could go wrong while parsing a [`Beatmap`](crate::Beatmap).
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The data does not start with `osu file format v<version>`.
    #[error("expected `osu file format v` at file begin")]
    MalformedHeader,
    /// The format version is outside of the supported range.
    #[error("unsupported file format version {version}")]
    UnsupportedVersion { version: u32 },
    /// A required section or a required field of a line is missing.
    #[error("missing {what} (line {line})")]
    TruncatedData { line: usize, what: &'static str },
    /// A line could not be interpreted.
    #[error("invalid syntax on line {line}: {reason}")]
    InvalidObjectSyntax { line: usize, reason: &'static str },
    /// Reading the underlying source failed.
    #[error("failed to read beatmap data")]
    Io(#[from] IoError),
}

/// Discriminant of a [`ParseError`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ParseErrorKind {
    MalformedHeader,
    UnsupportedVersion,
    TruncatedData,
    InvalidObjectSyntax,
    Io,
}

impl ParseError {
    /// The kind of error without its payload.
    pub const fn kind(&self) -> ParseErrorKind {
        match self {
            Self::MalformedHeader => ParseErrorKind::MalformedHeader,
            Self::UnsupportedVersion { .. } => ParseErrorKind::UnsupportedVersion,
            Self::TruncatedData { .. } => ParseErrorKind::TruncatedData,
            Self::InvalidObjectSyntax { .. } => ParseErrorKind::InvalidObjectSyntax,
            Self::Io(_) => ParseErrorKind::Io,
        }
    }

    /// Attach the line number to errors that were created without one.
    pub(crate) fn at_line(self, nmbr: usize) -> Self {
        match self {
            Self::TruncatedData { line: 0, what } => Self::TruncatedData { line: nmbr, what },
            Self::InvalidObjectSyntax { line: 0, reason } => {
                Self::InvalidObjectSyntax { line: nmbr, reason }
            }
            other => other,
        }
    }

    pub(crate) const fn invalid(reason: &'static str) -> Self {
        Self::InvalidObjectSyntax { line: 0, reason }
    }

    pub(crate) const fn missing(what: &'static str) -> Self {
        Self::TruncatedData { line: 0, what }
    }
}
