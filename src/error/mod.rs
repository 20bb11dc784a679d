//! Error types for loading documents and parsing search paths.
//!
//! Tree navigation and search never fail with an error: a search that finds
//! nothing returns `None`. The types here cover the collaborators around the
//! search core: the markup loader ([`ParseError`]), byte-stream decoding
//! ([`EncodingError`]) and path syntax ([`PathError`]).

use std::fmt;

use thiserror::Error;

/// Source location within a markup document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number (in characters, not bytes).
    pub column: u32,
    /// 0-based byte offset from the start of the input.
    pub byte_offset: usize,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// The error type returned when loading a document fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("parse error at {location}: {message}")]
pub struct ParseError {
    /// Human-readable error message.
    pub message: String,
    /// Where in the source the error occurred.
    pub location: SourceLocation,
}

impl ParseError {
    /// Creates an error that is not tied to a position in the markup,
    /// such as a failure to decode the input bytes.
    pub(crate) fn unlocated(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: SourceLocation::default(),
        }
    }
}

impl From<EncodingError> for ParseError {
    fn from(err: EncodingError) -> Self {
        Self::unlocated(err.to_string())
    }
}

/// An error that occurs during encoding detection or transcoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("encoding error: {message}")]
pub struct EncodingError {
    /// A human-readable description of the encoding error.
    pub message: String,
}

impl EncodingError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Why a slash-separated search path could not be parsed.
///
/// `Document::find_path` folds all of these into `None`; use
/// [`crate::search::parse_path`] directly to find out which one applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// The path is the empty string.
    #[error("path is empty")]
    Empty,
    /// A segment has no name, as in `a//b` or a path ending in `*/`.
    #[error("empty segment at byte {offset}")]
    EmptySegment {
        /// Byte offset in the path where the segment should have started.
        offset: usize,
    },
    /// A segment name is at least [`crate::search::MAX_SEGMENT_LEN`] bytes.
    #[error("segment at byte {offset} is {len} bytes long (limit {limit})")]
    SegmentTooLong {
        /// Byte offset in the path where the segment starts.
        offset: usize,
        /// Length of the offending segment in bytes.
        len: usize,
        /// Exclusive upper bound on segment length.
        limit: usize,
    },
}
