//! Low-level input handling for the markup loader.
//!
//! [`ParserInput`] owns the cursor over the source text: position tracking
//! (line, column, byte offset), peeking and advancing, name and reference
//! parsing, and the nesting depth counter.

use crate::error::{ParseError, SourceLocation};

/// Default maximum element nesting depth.
pub(crate) const DEFAULT_MAX_DEPTH: u32 = 256;

/// Default maximum length (in bytes) of an element or attribute name.
pub(crate) const DEFAULT_MAX_NAME_LENGTH: usize = 50_000;

/// Returns `true` if `c` is a legal document character (XML 1.0 §2.2 `[2]`).
pub(crate) fn is_xml_char(c: char) -> bool {
    matches!(c as u32,
        0x09 | 0x0A | 0x0D | 0x20..=0xD7FF | 0xE000..=0xFFFD | 0x0001_0000..=0x0010_FFFF
    )
}

/// Returns `true` if `c` may start an XML name (XML 1.0 §2.3 `[4]`).
pub(crate) fn is_name_start_char(c: char) -> bool {
    matches!(c,
        ':' | 'A'..='Z' | '_' | 'a'..='z' |
        '\u{C0}'..='\u{D6}' | '\u{D8}'..='\u{F6}' | '\u{F8}'..='\u{2FF}' |
        '\u{370}'..='\u{37D}' | '\u{37F}'..='\u{1FFF}' |
        '\u{200C}'..='\u{200D}' | '\u{2070}'..='\u{218F}' |
        '\u{2C00}'..='\u{2FEF}' | '\u{3001}'..='\u{D7FF}' |
        '\u{F900}'..='\u{FDCF}' | '\u{FDF0}'..='\u{FFFD}' |
        '\u{10000}'..='\u{EFFFF}'
    )
}

/// Returns `true` if `c` may continue an XML name (XML 1.0 §2.3 `[4a]`).
pub(crate) fn is_name_char(c: char) -> bool {
    is_name_start_char(c)
        || matches!(c,
            '-' | '.' | '0'..='9' | '\u{B7}' |
            '\u{300}'..='\u{36F}' | '\u{203F}'..='\u{2040}'
        )
}

/// Cursor over the loader's source text.
///
/// The byte offset always sits on a UTF-8 character boundary: the cursor
/// only moves by whole characters or over ASCII bytes.
pub(crate) struct ParserInput<'a> {
    text: &'a str,
    pos: usize,
    line: u32,
    column: u32,
    depth: u32,
    max_depth: u32,
    max_name_length: usize,
}

impl<'a> ParserInput<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            pos: 0,
            line: 1,
            column: 1,
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
            max_name_length: DEFAULT_MAX_NAME_LENGTH,
        }
    }

    pub fn set_max_depth(&mut self, max: u32) {
        self.max_depth = max;
    }

    pub fn set_max_name_length(&mut self, max: usize) {
        self.max_name_length = max;
    }

    // -- Errors --

    /// Builds a fatal error at the current position.
    pub fn fatal(&self, message: impl Into<String>) -> ParseError {
        self.fatal_at(self.location(), message)
    }

    /// Builds a fatal error at an earlier, saved position.
    pub fn fatal_at(&self, location: SourceLocation, message: impl Into<String>) -> ParseError {
        ParseError {
            message: message.into(),
            location,
        }
    }

    // -- Depth tracking --

    pub fn increment_depth(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(self.fatal(format!(
                "maximum nesting depth exceeded ({})",
                self.max_depth
            )));
        }
        Ok(())
    }

    pub fn decrement_depth(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    // -- Position queries --

    pub fn location(&self) -> SourceLocation {
        SourceLocation {
            line: self.line,
            column: self.column,
            byte_offset: self.pos,
        }
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    // -- Peek --

    pub fn peek(&self) -> Option<u8> {
        self.text.as_bytes().get(self.pos).copied()
    }

    pub fn peek_char(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    pub fn looking_at(&self, s: &str) -> bool {
        self.text[self.pos..].starts_with(s)
    }

    // -- Advance --

    fn advance_char(&mut self, ch: char) {
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        self.pos += ch.len_utf8();
    }

    /// Advances over `s`, which the caller has checked with `looking_at`.
    pub fn advance_str(&mut self, s: &str) {
        for ch in s.chars() {
            self.advance_char(ch);
        }
    }

    /// Consumes the next character, folding `\r\n` and lone `\r` into `\n`.
    pub fn next_char(&mut self) -> Result<char, ParseError> {
        let ch = self
            .peek_char()
            .ok_or_else(|| self.fatal("unexpected end of input"))?;
        if !is_xml_char(ch) {
            return Err(self.fatal(format!("invalid XML character: U+{:04X}", ch as u32)));
        }
        self.advance_char(ch);
        if ch == '\r' {
            if self.peek() == Some(b'\n') {
                self.advance_char('\n');
            }
            return Ok('\n');
        }
        Ok(ch)
    }

    /// Rejects raw text taken in bulk (comments, CDATA) that contains a
    /// character outside the document character set.
    pub fn check_chars(&self, start: SourceLocation, content: &str) -> Result<(), ParseError> {
        match content.chars().find(|&c| !is_xml_char(c)) {
            Some(bad) => Err(self.fatal_at(
                start,
                format!("invalid XML character: U+{:04X}", bad as u32),
            )),
            None => Ok(()),
        }
    }

    pub fn expect_byte(&mut self, expected: u8) -> Result<(), ParseError> {
        match self.peek() {
            Some(b) if b == expected => {
                self.advance_char(char::from(b));
                Ok(())
            }
            Some(_) => {
                let found = self.peek_char().unwrap_or_default();
                Err(self.fatal(format!(
                    "expected '{}', found '{found}'",
                    char::from(expected)
                )))
            }
            None => Err(self.fatal(format!(
                "expected '{}', found end of input",
                char::from(expected)
            ))),
        }
    }

    pub fn expect_str(&mut self, expected: &str) -> Result<(), ParseError> {
        if !self.looking_at(expected) {
            return Err(self.fatal(format!("expected '{expected}'")));
        }
        self.advance_str(expected);
        Ok(())
    }

    /// Skips whitespace characters. Returns `true` if any were consumed.
    pub fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while let Some(b' ' | b'\t' | b'\r' | b'\n') = self.peek() {
            let ch = char::from(self.text.as_bytes()[self.pos]);
            self.advance_char(ch);
        }
        self.pos > start
    }

    /// Returns the text up to `terminator` and moves past the terminator,
    /// or `None` (without moving) if the terminator never appears.
    pub fn take_until(&mut self, terminator: &str) -> Option<&'a str> {
        let text = self.text;
        let rest = &text[self.pos..];
        let end = rest.find(terminator)?;
        let content = &rest[..end];
        self.advance_str(content);
        self.advance_str(terminator);
        Some(content)
    }

    // -- Names (XML 1.0 §2.3) --

    pub fn parse_name(&mut self) -> Result<String, ParseError> {
        let start = self.pos;
        let first = self
            .peek_char()
            .ok_or_else(|| self.fatal("expected name, found end of input"))?;
        if !is_name_start_char(first) {
            return Err(self.fatal(format!("invalid name start character: '{first}'")));
        }
        self.advance_char(first);

        while let Some(ch) = self.peek_char() {
            if !is_name_char(ch) {
                break;
            }
            self.advance_char(ch);
        }

        let len = self.pos - start;
        if len > self.max_name_length {
            return Err(self.fatal(format!(
                "name length ({len}) exceeds maximum ({})",
                self.max_name_length
            )));
        }
        Ok(self.text[start..self.pos].to_string())
    }

    // -- References (XML 1.0 §4.1) --

    /// Parses `&name;`, `&#NNN;` or `&#xHHH;` and returns the replacement.
    ///
    /// Only the five predefined entities are known.
    pub fn parse_reference(&mut self) -> Result<char, ParseError> {
        let start = self.location();
        self.expect_byte(b'&')?;

        if self.peek() == Some(b'#') {
            self.advance_char('#');
            let (digits, radix) = if self.peek() == Some(b'x') {
                self.advance_char('x');
                (self.take_while(|b| b.is_ascii_hexdigit()), 16)
            } else {
                (self.take_while(|b| b.is_ascii_digit()), 10)
            };
            self.expect_byte(b';')?;
            return u32::from_str_radix(digits, radix)
                .ok()
                .and_then(char::from_u32)
                .filter(|&c| is_xml_char(c))
                .ok_or_else(|| self.fatal_at(start, "invalid character reference"));
        }

        let name = self.parse_name()?;
        self.expect_byte(b';')?;
        match name.as_str() {
            "amp" => Ok('&'),
            "lt" => Ok('<'),
            "gt" => Ok('>'),
            "apos" => Ok('\''),
            "quot" => Ok('"'),
            _ => Err(self.fatal_at(start, format!("unknown entity reference: &{name};"))),
        }
    }

    fn take_while(&mut self, pred: impl Fn(u8) -> bool) -> &'a str {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if !pred(b) {
                break;
            }
            self.advance_char(char::from(b));
        }
        let text = self.text;
        &text[start..self.pos]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_tracks_lines() {
        let mut input = ParserInput::new("ab\ncd");
        input.advance_str("ab\nc");
        let loc = input.location();
        assert_eq!((loc.line, loc.column, loc.byte_offset), (2, 2, 4));
    }

    #[test]
    fn test_next_char_normalizes_crlf() {
        let mut input = ParserInput::new("\r\nx\ry");
        assert_eq!(input.next_char().ok(), Some('\n'));
        assert_eq!(input.next_char().ok(), Some('x'));
        assert_eq!(input.next_char().ok(), Some('\n'));
        assert_eq!(input.next_char().ok(), Some('y'));
        assert!(input.at_end());
    }

    #[test]
    fn test_next_char_rejects_illegal_characters() {
        let mut nul = ParserInput::new("\0");
        let Err(err) = nul.next_char() else {
            panic!("NUL accepted");
        };
        assert_eq!(err.message, "invalid XML character: U+0000");

        let mut control = ParserInput::new("a\u{1B}");
        assert_eq!(control.next_char().ok(), Some('a'));
        assert!(control.next_char().is_err());

        let mut nonchar = ParserInput::new("\u{FFFE}");
        assert!(nonchar.next_char().is_err());

        let mut tab = ParserInput::new("\t\u{10000}");
        assert_eq!(tab.next_char().ok(), Some('\t'));
        assert_eq!(tab.next_char().ok(), Some('\u{10000}'));
    }

    #[test]
    fn test_is_xml_char() {
        assert!(is_xml_char('\t'));
        assert!(is_xml_char('\n'));
        assert!(is_xml_char(' '));
        assert!(is_xml_char('\u{FFFD}'));
        assert!(!is_xml_char('\0'));
        assert!(!is_xml_char('\u{0B}'));
        assert!(!is_xml_char('\u{FFFF}'));
    }

    #[test]
    fn test_parse_name() {
        let mut input = ParserInput::new("ns:item-2 rest");
        assert_eq!(input.parse_name().ok().as_deref(), Some("ns:item-2"));
        assert!(input.skip_whitespace());
        assert!(input.looking_at("rest"));

        let mut bad = ParserInput::new("1abc");
        assert!(bad.parse_name().is_err());
    }

    #[test]
    fn test_name_length_limit() {
        let mut input = ParserInput::new("abcdef");
        input.set_max_name_length(3);
        let Err(err) = input.parse_name() else {
            panic!("long name accepted");
        };
        assert!(err.message.contains("exceeds maximum"));
    }

    #[test]
    fn test_parse_reference() {
        for (src, expected) in [
            ("&amp;", '&'),
            ("&lt;", '<'),
            ("&quot;", '"'),
            ("&#65;", 'A'),
            ("&#x263A;", '\u{263A}'),
        ] {
            let mut input = ParserInput::new(src);
            assert_eq!(input.parse_reference().ok(), Some(expected), "{src}");
        }
        assert!(ParserInput::new("&nbsp;").parse_reference().is_err());
        assert!(ParserInput::new("&#0;").parse_reference().is_err());
        assert!(ParserInput::new("&#xD800;").parse_reference().is_err());
    }

    #[test]
    fn test_take_until() {
        let mut input = ParserInput::new("a comment-->tail");
        assert_eq!(input.take_until("-->"), Some("a comment"));
        assert!(input.looking_at("tail"));
        assert_eq!(input.take_until("-->"), None);
        assert!(input.looking_at("tail"));
    }

    #[test]
    fn test_depth_limit() {
        let mut input = ParserInput::new("");
        input.set_max_depth(1);
        assert!(input.increment_depth().is_ok());
        assert!(input.increment_depth().is_err());
        input.decrement_depth();
        input.decrement_depth();
        assert!(input.increment_depth().is_ok());
    }
}
