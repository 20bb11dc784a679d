//! Recursive descent loader building a `Document`.

use tracing::{debug, trace};

use crate::error::ParseError;
use crate::tree::{Attribute, Document, NodeId, NodeKind};

use super::input::ParserInput;
use super::{LeafType, ParseOptions};

pub(crate) struct XmlParser<'a> {
    input: ParserInput<'a>,
    doc: Document,
    options: ParseOptions,
    input_size: usize,
}

impl<'a> XmlParser<'a> {
    pub fn new(input: &'a str, options: &ParseOptions) -> Self {
        let mut pi = ParserInput::new(input);
        pi.set_max_depth(options.max_depth);
        pi.set_max_name_length(options.max_name_length);

        Self {
            input: pi,
            doc: Document::new(),
            options: options.clone(),
            input_size: input.len(),
        }
    }

    pub fn parse(mut self) -> Result<Document, ParseError> {
        if self.at_xml_declaration() {
            self.parse_xml_declaration()?;
        }

        let root = self.doc.root();
        self.parse_misc(root)?;

        if self.input.peek() == Some(b'<') {
            self.parse_element(root)?;
        } else {
            return Err(self.input.fatal("missing root element"));
        }

        self.parse_misc(root)?;
        if !self.input.at_end() {
            return Err(self.input.fatal("content after document element"));
        }

        debug!(
            nodes = self.doc.node_count(),
            bytes = self.input_size,
            "document loaded"
        );
        Ok(self.doc)
    }

    // --- XML declaration ---

    fn at_xml_declaration(&self) -> bool {
        ["<?xml ", "<?xml\t", "<?xml\r", "<?xml\n"]
            .iter()
            .any(|prefix| self.input.looking_at(prefix))
    }

    fn parse_xml_declaration(&mut self) -> Result<(), ParseError> {
        self.input.expect_str("<?xml")?;
        loop {
            self.input.skip_whitespace();
            if self.input.looking_at("?>") {
                self.input.advance_str("?>");
                return Ok(());
            }
            let name = self.input.parse_name()?;
            self.input.skip_whitespace();
            self.input.expect_byte(b'=')?;
            self.input.skip_whitespace();
            let value = self.parse_quoted_value()?;
            match name.as_str() {
                "version" => self.doc.version = Some(value),
                "encoding" => self.doc.encoding = Some(value),
                "standalone" => {
                    self.doc.standalone = Some(match value.as_str() {
                        "yes" => true,
                        "no" => false,
                        _ => {
                            return Err(self
                                .input
                                .fatal(format!("invalid standalone value '{value}'")))
                        }
                    });
                }
                _ => {
                    return Err(self
                        .input
                        .fatal(format!("unexpected '{name}' in XML declaration")))
                }
            }
        }
    }

    // --- Prolog / epilog ---

    fn parse_misc(&mut self, parent: NodeId) -> Result<(), ParseError> {
        loop {
            self.input.skip_whitespace();
            if self.input.looking_at("<!--") {
                self.parse_comment(parent)?;
            } else if self.input.looking_at("<?") {
                self.skip_processing_instruction()?;
            } else if self.input.looking_at("<!DOCTYPE") {
                self.skip_doctype()?;
            } else {
                return Ok(());
            }
        }
    }

    fn skip_processing_instruction(&mut self) -> Result<(), ParseError> {
        let start = self.input.location();
        self.input.expect_str("<?")?;
        match self.input.take_until("?>") {
            Some(body) => {
                trace!(target_and_data = body, "skipped processing instruction");
                Ok(())
            }
            None => Err(self
                .input
                .fatal_at(start, "unterminated processing instruction")),
        }
    }

    fn skip_doctype(&mut self) -> Result<(), ParseError> {
        let start = self.input.location();
        self.input.expect_str("<!DOCTYPE")?;
        let mut subset_depth = 0u32;
        let mut quote: Option<char> = None;
        while !self.input.at_end() {
            let ch = self.input.next_char()?;
            match (quote, ch) {
                (Some(q), c) if c == q => quote = None,
                (Some(_), _) => {}
                (None, '"' | '\'') => quote = Some(ch),
                (None, '[') => subset_depth += 1,
                (None, ']') => subset_depth = subset_depth.saturating_sub(1),
                (None, '>') if subset_depth == 0 => {
                    trace!("skipped document type declaration");
                    return Ok(());
                }
                (None, _) => {}
            }
        }
        Err(self.input.fatal_at(start, "unterminated DOCTYPE declaration"))
    }

    // --- Elements ---

    fn parse_element(&mut self, parent: NodeId) -> Result<(), ParseError> {
        self.input.increment_depth()?;
        self.input.expect_byte(b'<')?;
        let name = self.input.parse_name()?;
        let attributes = self.parse_attributes()?;

        let elem = self.doc.create_node(NodeKind::Element {
            name: name.clone(),
            attributes,
        });
        self.doc.append_child(parent, elem);

        if self.input.looking_at("/>") {
            self.input.advance_str("/>");
        } else {
            self.input.expect_byte(b'>')?;
            self.parse_content(elem, &name)?;
        }

        self.input.decrement_depth();
        Ok(())
    }

    fn parse_attributes(&mut self) -> Result<Vec<Attribute>, ParseError> {
        let mut attributes: Vec<Attribute> = Vec::new();
        loop {
            let had_space = self.input.skip_whitespace();
            if matches!(self.input.peek(), Some(b'/' | b'>') | None) {
                return Ok(attributes);
            }
            if !had_space {
                return Err(self.input.fatal("whitespace required before attribute"));
            }

            let start = self.input.location();
            let name = self.input.parse_name()?;
            self.input.skip_whitespace();
            self.input.expect_byte(b'=')?;
            self.input.skip_whitespace();
            let value = self.parse_attribute_value()?;

            if attributes.iter().any(|a| a.name == name) {
                return Err(self
                    .input
                    .fatal_at(start, format!("duplicate attribute '{name}'")));
            }
            attributes.push(Attribute::new(name, value));
        }
    }

    fn parse_attribute_value(&mut self) -> Result<String, ParseError> {
        let quote = self.open_quote()?;
        let mut value = String::new();
        loop {
            match self.input.peek() {
                None => return Err(self.input.fatal("unterminated attribute value")),
                Some(b) if b == quote => {
                    self.input.expect_byte(quote)?;
                    return Ok(value);
                }
                Some(b'<') => return Err(self.input.fatal("'<' not allowed in attribute value")),
                Some(b'&') => value.push(self.input.parse_reference()?),
                Some(_) => match self.input.next_char()? {
                    '\t' | '\n' => value.push(' '),
                    ch => value.push(ch),
                },
            }
        }
    }

    /// Quoted value without reference expansion, as used in the declaration.
    fn parse_quoted_value(&mut self) -> Result<String, ParseError> {
        let quote = self.open_quote()?;
        let terminator = if quote == b'"' { "\"" } else { "'" };
        self.input
            .take_until(terminator)
            .map(str::to_string)
            .ok_or_else(|| self.input.fatal("unterminated quoted value"))
    }

    fn open_quote(&mut self) -> Result<u8, ParseError> {
        match self.input.peek() {
            Some(q @ (b'"' | b'\'')) => {
                self.input.expect_byte(q)?;
                Ok(q)
            }
            _ => Err(self.input.fatal("expected quoted value")),
        }
    }

    fn parse_content(&mut self, elem: NodeId, name: &str) -> Result<(), ParseError> {
        loop {
            if self.input.at_end() {
                return Err(self
                    .input
                    .fatal(format!("unexpected end of input in element '{name}'")));
            }
            if self.input.looking_at("</") {
                return self.parse_end_tag(name);
            } else if self.input.looking_at("<!--") {
                self.parse_comment(elem)?;
            } else if self.input.looking_at("<![CDATA[") {
                self.parse_cdata(elem)?;
            } else if self.input.looking_at("<?") {
                self.skip_processing_instruction()?;
            } else if self.input.peek() == Some(b'<') {
                self.parse_element(elem)?;
            } else {
                self.parse_char_data(elem)?;
            }
        }
    }

    fn parse_end_tag(&mut self, name: &str) -> Result<(), ParseError> {
        let start = self.input.location();
        self.input.expect_str("</")?;
        let end_name = self.input.parse_name()?;
        if end_name != name {
            return Err(self.input.fatal_at(
                start,
                format!("mismatched end tag: expected </{name}>, found </{end_name}>"),
            ));
        }
        self.input.skip_whitespace();
        self.input.expect_byte(b'>')
    }

    // --- Leaves ---

    fn parse_comment(&mut self, parent: NodeId) -> Result<(), ParseError> {
        let start = self.input.location();
        self.input.expect_str("<!--")?;
        let content = self
            .input
            .take_until("-->")
            .ok_or_else(|| self.input.fatal_at(start, "unterminated comment"))?;
        self.input.check_chars(start, content)?;
        let node = self.doc.create_node(NodeKind::Comment {
            content: content.to_string(),
        });
        self.doc.append_child(parent, node);
        Ok(())
    }

    fn parse_cdata(&mut self, parent: NodeId) -> Result<(), ParseError> {
        let start = self.input.location();
        self.input.expect_str("<![CDATA[")?;
        let content = self
            .input
            .take_until("]]>")
            .ok_or_else(|| self.input.fatal_at(start, "unterminated CDATA section"))?;
        self.input.check_chars(start, content)?;
        let node = self.doc.create_node(NodeKind::CData {
            content: content.to_string(),
        });
        self.doc.append_child(parent, node);
        Ok(())
    }

    fn parse_char_data(&mut self, parent: NodeId) -> Result<(), ParseError> {
        let start = self.input.location();
        let mut content = String::new();
        while let Some(b) = self.input.peek() {
            match b {
                b'<' => break,
                b'&' => content.push(self.input.parse_reference()?),
                _ => content.push(self.input.next_char()?),
            }
        }

        let blank = content.chars().all(char::is_whitespace);
        if blank && self.options.no_blanks {
            trace!(len = content.len(), "dropped blank character data");
            return Ok(());
        }

        let kind = match self.options.leaf_type {
            _ if blank => NodeKind::Text { content },
            LeafType::Text => NodeKind::Text { content },
            LeafType::Opaque => NodeKind::Opaque { content },
            LeafType::Integer => NodeKind::Integer {
                value: content.trim().parse().map_err(|_| {
                    self.input
                        .fatal_at(start, format!("invalid integer value '{}'", content.trim()))
                })?,
            },
            LeafType::Real => NodeKind::Real {
                value: content.trim().parse().map_err(|_| {
                    self.input
                        .fatal_at(start, format!("invalid real value '{}'", content.trim()))
                })?,
            },
        };
        let node = self.doc.create_node(kind);
        self.doc.append_child(parent, node);
        Ok(())
    }
}
