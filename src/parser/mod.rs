//! Markup loader.
//!
//! A small recursive descent loader that turns well-formed XML-style markup
//! into a [`Document`]: elements with attributes, character data, CDATA
//! sections and comments. Processing instructions and `<!DOCTYPE ...>`
//! declarations are recognized and skipped. There is no namespace
//! processing, no DTD handling and no error recovery; the first problem
//! ends the load with a [`ParseError`].

pub(crate) mod input;
mod xml;

use crate::error::ParseError;
use crate::tree::Document;

use input::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_NAME_LENGTH};

/// How runs of character data are stored in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LeafType {
    /// `NodeKind::Text`, with references resolved.
    #[default]
    Text,
    /// `NodeKind::Opaque`, with references resolved.
    Opaque,
    /// `NodeKind::Integer`; the trimmed run must parse as an `i64`.
    Integer,
    /// `NodeKind::Real`; the trimmed run must parse as an `f64`.
    Real,
}

/// Options controlling how markup is loaded.
///
/// ```
/// use xmlwalk::parser::{LeafType, ParseOptions};
///
/// let opts = ParseOptions::default()
///     .no_blanks(true)
///     .leaf_type(LeafType::Integer)
///     .max_depth(64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Drop character data that is entirely whitespace.
    pub no_blanks: bool,
    /// Node kind for non-blank character data. Whitespace-only runs that
    /// are kept are always stored as `Text`.
    pub leaf_type: LeafType,
    /// Maximum element nesting depth (default: 256).
    pub max_depth: u32,
    /// Maximum length in bytes of an element or attribute name (default: 50,000).
    pub max_name_length: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            no_blanks: false,
            leaf_type: LeafType::Text,
            max_depth: DEFAULT_MAX_DEPTH,
            max_name_length: DEFAULT_MAX_NAME_LENGTH,
        }
    }
}

impl ParseOptions {
    /// Enables or disables dropping of whitespace-only character data.
    #[must_use]
    pub fn no_blanks(mut self, yes: bool) -> Self {
        self.no_blanks = yes;
        self
    }

    /// Sets the node kind used for character data.
    #[must_use]
    pub fn leaf_type(mut self, leaf_type: LeafType) -> Self {
        self.leaf_type = leaf_type;
        self
    }

    /// Sets the maximum element nesting depth.
    #[must_use]
    pub fn max_depth(mut self, max: u32) -> Self {
        self.max_depth = max;
        self
    }

    /// Sets the maximum element/attribute name length in bytes.
    #[must_use]
    pub fn max_name_length(mut self, max: usize) -> Self {
        self.max_name_length = max;
        self
    }
}

/// Loads a document with default options.
///
/// # Errors
///
/// Returns `ParseError` if the input is not well-formed.
pub fn parse_str(input: &str) -> Result<Document, ParseError> {
    parse_str_with_options(input, &ParseOptions::default())
}

/// Loads a document with the given options.
///
/// # Errors
///
/// Returns `ParseError` if the input is not well-formed, nests too deeply,
/// or holds character data that does not fit the requested [`LeafType`].
pub fn parse_str_with_options(input: &str, options: &ParseOptions) -> Result<Document, ParseError> {
    let input = input.strip_prefix('\u{FEFF}').unwrap_or(input);
    xml::XmlParser::new(input, options).parse()
}
