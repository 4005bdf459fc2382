//! USDA (ASCII) layer parser.
//!
//! Statements are read line by line; a statement that opens a bracket,
//! parenthesis, brace or string keeps consuming lines until it is balanced
//! again. Each statement is then tokenized and interpreted.
//!
//! # Supported Syntax
//!
//! - `#usda 1.0` header with an optional `( ... )` layer metadata block
//! - `def|over|class [Type] "Name" [( metadata )] { ... }`
//! - `[custom] [uniform] type[[]] name [= value] [( metadata )]`
//! - `type name.timeSamples = { time: value, ... }`
//! - `[custom] rel name [= </Target> | [</A>, </B>]]`
//!
//! Connections, splines, `variantSet` blocks and unknown statements are
//! skipped. Composition metadata (`references`, `payload`, ...) is read but
//! ignored.

use std::collections::VecDeque;

use glam::{DMat4, DQuat, DVec2, DVec3, DVec4, IVec2, IVec3, IVec4, Quat, Vec2, Vec3, Vec4};
use thiserror::Error;

use super::path::{is_valid_identifier, SdfPath};
use super::types::{Attribute, LayerMetadata, Prim, Relationship, Specifier};
use super::value::{Value, ValueType};

/// Errors that can occur during USDA parsing.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Missing '#usda' header")]
    MissingHeader,

    #[error("Invalid number format at line {line}: {text}")]
    InvalidNumber { line: usize, text: String },

    #[error("Unclosed block starting at line {0}")]
    UnclosedBlock(usize),

    #[error("Duplicate prim {path} at line {line}")]
    DuplicatePrim { line: usize, path: String },
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// A parsed layer: header metadata and the top-level prims.
#[derive(Clone, Debug, Default)]
pub struct Layer {
    pub metadata: LayerMetadata,
    pub root_prims: Vec<Prim>,
}

/// USDA file parser.
pub struct UsdaParser {
    lines: VecDeque<(usize, String)>,
}

impl UsdaParser {
    /// Create a new parser from file contents.
    pub fn new(content: &str) -> Self {
        let lines: VecDeque<_> = content
            .lines()
            .enumerate()
            .map(|(i, s)| (i + 1, s.to_string()))
            .collect();

        Self { lines }
    }

    /// Parse the whole layer.
    pub fn parse(&mut self) -> ParseResult<Layer> {
        self.expect_header()?;

        let mut layer = Layer::default();

        if let Some((num, line)) = self.next_statement_line() {
            if line.trim_start().starts_with('(') {
                let text = self.collect_statement(num, line)?;
                layer.metadata = parse_layer_metadata(&text, num)?;
            } else {
                self.lines.push_front((num, line));
            }
        }

        let root = SdfPath::absolute_root();
        while let Some((num, line)) = self.next_statement_line() {
            let trimmed = line.trim();
            if Specifier::from_keyword(first_word(trimmed)).is_none() {
                return Err(ParseError::Parse {
                    line: num,
                    message: format!("Expected prim definition, found: {}", trimmed),
                });
            }
            let prim = self.parse_prim_spec(num, line, &root)?;
            push_unique(&mut layer.root_prims, prim, num)?;
        }

        Ok(layer)
    }

    /// The first non-blank line must be the `#usda` magic.
    fn expect_header(&mut self) -> ParseResult<()> {
        while let Some((_, line)) = self.lines.pop_front() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if trimmed.starts_with("#usda") {
                return Ok(());
            }
            break;
        }
        Err(ParseError::MissingHeader)
    }

    /// Pop the next line that is neither blank nor a comment.
    fn next_statement_line(&mut self) -> Option<(usize, String)> {
        while let Some((num, line)) = self.lines.pop_front() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with("//") {
                continue;
            }
            return Some((num, line));
        }
        None
    }

    /// Keep appending lines until all brackets and strings are closed.
    fn collect_statement(&mut self, start_line: usize, first: String) -> ParseResult<String> {
        let mut text = first;
        loop {
            let (depth, in_string) = scan(&text, |_, _, _| false);
            if !in_string && !depth.is_open() {
                return Ok(text);
            }
            match self.lines.pop_front() {
                Some((_, line)) => {
                    text.push('\n');
                    text.push_str(&line);
                }
                None => return Err(ParseError::UnclosedBlock(start_line)),
            }
        }
    }

    /// Put text back in front of the queue, splitting off a block-closing
    /// brace so that it is seen as its own line.
    fn push_back_split(&mut self, line_num: usize, text: &str) {
        match find_unnested(text, '}') {
            Some(pos) => {
                let (before, after) = text.split_at(pos);
                self.lines.push_front((line_num, after.to_string()));
                if !before.trim().is_empty() {
                    self.lines.push_front((line_num, before.to_string()));
                }
            }
            None => self.lines.push_front((line_num, text.to_string())),
        }
    }

    /// Parse a `def`/`over`/`class` prim spec and its body.
    fn parse_prim_spec(
        &mut self,
        start_line: usize,
        first: String,
        parent: &SdfPath,
    ) -> ParseResult<Prim> {
        // The body brace can follow multi-line metadata or sit on its own line
        let mut header = first;
        let brace = loop {
            if let Some(pos) = find_unnested(&header, '{') {
                break pos;
            }
            match self.lines.pop_front() {
                Some((_, line)) => {
                    header.push('\n');
                    header.push_str(&line);
                }
                None => return Err(ParseError::UnclosedBlock(start_line)),
            }
        };

        let rest = header[brace + 1..].to_string();
        header.truncate(brace);

        let mut prim = parse_prim_header(&header, parent, start_line)?;
        log::trace!("Parsing prim {} at line {}", prim.path, start_line);

        if !rest.trim().is_empty() {
            self.push_back_split(start_line, &rest);
        }

        self.parse_prim_body(&mut prim, start_line)?;
        Ok(prim)
    }

    /// Parse properties and child prims until the closing brace.
    fn parse_prim_body(&mut self, prim: &mut Prim, start_line: usize) -> ParseResult<()> {
        loop {
            let (num, line) = match self.next_statement_line() {
                Some(x) => x,
                None => return Err(ParseError::UnclosedBlock(start_line)),
            };
            let trimmed = line.trim();

            if let Some(rest) = trimmed.strip_prefix('}') {
                if !rest.trim().is_empty() {
                    self.push_back_split(num, rest);
                }
                return Ok(());
            }

            // Check for child prim first, since def lines may contain property text
            if Specifier::from_keyword(first_word(trimmed)).is_some() {
                let child = self.parse_prim_spec(num, line, &prim.path)?;
                push_unique(&mut prim.children, child, num)?;
                continue;
            }

            let mut statement = self.collect_statement(num, line)?;
            // A property may share its line with the closing brace
            if let Some(pos) = find_unnested(&statement, '}') {
                let rest = statement.split_off(pos);
                self.lines.push_front((num, rest));
            }
            for part in split_unnested(&statement, ';') {
                if !part.trim().is_empty() {
                    parse_property(part, num, prim)?;
                }
            }
        }
    }
}

/// Parse a USDA string.
pub fn parse_usda(content: &str) -> ParseResult<Layer> {
    let mut parser = UsdaParser::new(content);
    parser.parse()
}

fn first_word(line: &str) -> &str {
    line.split(|c: char| c.is_whitespace() || c == '"').next().unwrap_or("")
}

fn push_unique(siblings: &mut Vec<Prim>, prim: Prim, line: usize) -> ParseResult<()> {
    if siblings.iter().any(|p| p.name == prim.name) {
        return Err(ParseError::DuplicatePrim {
            line,
            path: prim.path.to_string(),
        });
    }
    siblings.push(prim);
    Ok(())
}

// ============================================================================
// Bracket scanning
// ============================================================================

#[derive(Clone, Copy, Debug, Default)]
struct Depth {
    paren: i32,
    bracket: i32,
    brace: i32,
}

impl Depth {
    fn is_open(&self) -> bool {
        self.paren > 0 || self.bracket > 0 || self.brace > 0
    }

    fn is_zero(&self) -> bool {
        self.paren == 0 && self.bracket == 0 && self.brace == 0
    }
}

/// Walk the structural characters of `text`, skipping strings, asset
/// paths and comments. `visit` sees each character with the depth before
/// it is applied and can stop the walk by returning `true`.
///
/// Returns the final depth and whether a string was left open.
fn scan(text: &str, mut visit: impl FnMut(usize, u8, Depth) -> bool) -> (Depth, bool) {
    let bytes = text.as_bytes();
    let mut depth = Depth::default();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        match c {
            b'"' | b'\'' => {
                let triple = bytes[i..].starts_with(&[c, c, c]);
                match skip_string(bytes, i, triple) {
                    Some(end) => i = end,
                    None => return (depth, true),
                }
                continue;
            }
            b'@' => match bytes[i + 1..].iter().position(|&b| b == b'@') {
                Some(offset) => {
                    i += offset + 2;
                    continue;
                }
                None => return (depth, true),
            },
            b'#' => {
                i = skip_comment(bytes, i);
                continue;
            }
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                i = skip_comment(bytes, i);
                continue;
            }
            _ => {}
        }

        if visit(i, c, depth) {
            return (depth, false);
        }

        match c {
            b'(' => depth.paren += 1,
            b')' => depth.paren -= 1,
            b'[' => depth.bracket += 1,
            b']' => depth.bracket -= 1,
            b'{' => depth.brace += 1,
            b'}' => depth.brace -= 1,
            _ => {}
        }
        i += 1;
    }

    (depth, false)
}

/// Index just past the string starting at `start`, `None` if unterminated.
fn skip_string(bytes: &[u8], start: usize, triple: bool) -> Option<usize> {
    let quote = bytes[start];
    if triple {
        let mut i = start + 3;
        while i < bytes.len() {
            if bytes[i..].starts_with(&[quote, quote, quote]) {
                return Some(i + 3);
            }
            i += 1;
        }
        return None;
    }

    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b if b == quote => return Some(i + 1),
            b'\n' => return None,
            _ => i += 1,
        }
    }
    None
}

fn skip_comment(bytes: &[u8], start: usize) -> usize {
    bytes[start..]
        .iter()
        .position(|&b| b == b'\n')
        .map(|offset| start + offset)
        .unwrap_or(bytes.len())
}

/// Position of the first `target` that is not nested in any bracket.
fn find_unnested(text: &str, target: char) -> Option<usize> {
    let mut found = None;
    scan(text, |i, c, depth| {
        if c as char == target && depth.is_zero() {
            found = Some(i);
            true
        } else {
            false
        }
    });
    found
}

/// Split on every unnested `separator`.
fn split_unnested(text: &str, separator: char) -> Vec<&str> {
    let mut cuts = Vec::new();
    scan(text, |i, c, depth| {
        if c as char == separator && depth.is_zero() {
            cuts.push(i);
        }
        false
    });

    let mut parts = Vec::with_capacity(cuts.len() + 1);
    let mut start = 0;
    for cut in cuts {
        parts.push(&text[start..cut]);
        start = cut + 1;
    }
    parts.push(&text[start..]);
    parts
}

// ============================================================================
// Tokens
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
enum Token {
    Ident(String),
    Number(String),
    Str(String),
    Asset(String),
    Path(String),
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Colon,
    Equals,
    Semicolon,
}

fn is_ident_start(c: u8) -> bool {
    c == b'_' || c.is_ascii_alphabetic()
}

fn is_ident_char(c: u8) -> bool {
    c == b'_' || c == b':' || c == b'.' || c.is_ascii_alphanumeric()
}

fn tokenize(text: &str, line: usize) -> ParseResult<Vec<Token>> {
    let bytes = text.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    let error = |message: String| ParseError::Parse { line, message };

    while i < bytes.len() {
        let c = bytes[i];
        match c {
            b if b.is_ascii_whitespace() => i += 1,
            b'#' => i = skip_comment(bytes, i),
            b'/' if bytes.get(i + 1) == Some(&b'/') => i = skip_comment(bytes, i),
            b'(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            b')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            b'[' => {
                tokens.push(Token::LBracket);
                i += 1;
            }
            b']' => {
                tokens.push(Token::RBracket);
                i += 1;
            }
            b'{' => {
                tokens.push(Token::LBrace);
                i += 1;
            }
            b'}' => {
                tokens.push(Token::RBrace);
                i += 1;
            }
            b',' => {
                tokens.push(Token::Comma);
                i += 1;
            }
            b':' => {
                tokens.push(Token::Colon);
                i += 1;
            }
            b'=' => {
                tokens.push(Token::Equals);
                i += 1;
            }
            b';' => {
                tokens.push(Token::Semicolon);
                i += 1;
            }
            b'"' | b'\'' => {
                let triple = bytes[i..].starts_with(&[c, c, c]);
                let end = skip_string(bytes, i, triple)
                    .ok_or_else(|| error("Unterminated string".to_string()))?;
                let inner = if triple { &text[i + 3..end - 3] } else { &text[i + 1..end - 1] };
                tokens.push(Token::Str(unescape(inner)));
                i = end;
            }
            b'@' => {
                let offset = bytes[i + 1..]
                    .iter()
                    .position(|&b| b == b'@')
                    .ok_or_else(|| error("Unterminated asset path".to_string()))?;
                tokens.push(Token::Asset(text[i + 1..i + 1 + offset].to_string()));
                i += offset + 2;
            }
            b'<' => {
                let offset = bytes[i + 1..]
                    .iter()
                    .position(|&b| b == b'>')
                    .ok_or_else(|| error("Unterminated path".to_string()))?;
                tokens.push(Token::Path(text[i + 1..i + 1 + offset].to_string()));
                i += offset + 2;
            }
            b'-' | b'+' if bytes.get(i + 1).copied().is_some_and(is_ident_start) => {
                // -inf / +inf
                let start = i;
                i += 1;
                while i < bytes.len() && is_ident_char(bytes[i]) {
                    i += 1;
                }
                tokens.push(Token::Ident(text[start..i].to_string()));
            }
            b'-' | b'+' | b'.' | b'0'..=b'9' => {
                let start = i;
                i += 1;
                while i < bytes.len() {
                    let b = bytes[i];
                    let exponent_sign =
                        (b == b'-' || b == b'+') && matches!(bytes[i - 1], b'e' | b'E');
                    if b.is_ascii_digit() || b == b'.' || b == b'e' || b == b'E' || exponent_sign {
                        i += 1;
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Number(text[start..i].to_string()));
            }
            b if is_ident_start(b) => {
                let start = i;
                while i < bytes.len() && is_ident_char(bytes[i]) {
                    i += 1;
                }
                tokens.push(Token::Ident(text[start..i].to_string()));
            }
            other => {
                return Err(error(format!("Unexpected character '{}'", other as char)));
            }
        }
    }

    Ok(tokens)
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

/// Token stream with a read position.
struct Cursor {
    tokens: Vec<Token>,
    pos: usize,
    line: usize,
}

impl Cursor {
    fn new(tokens: Vec<Token>, line: usize) -> Self {
        Self { tokens, pos: 0, line }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.peek() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &Token) -> ParseResult<()> {
        match self.next() {
            Some(ref t) if t == token => Ok(()),
            other => Err(self.error(format!("Expected {:?}, found {:?}", token, other))),
        }
    }

    fn ident(&mut self) -> ParseResult<String> {
        match self.next() {
            Some(Token::Ident(s)) => Ok(s),
            other => Err(self.error(format!("Expected identifier, found {:?}", other))),
        }
    }

    fn peek_ident(&self) -> Option<&str> {
        match self.peek() {
            Some(Token::Ident(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Skip an optional `( ... )` metadata group, then require the end of
    /// the statement.
    fn finish(&mut self) -> ParseResult<()> {
        if self.eat(&Token::LParen) {
            let mut depth = 1;
            while depth > 0 {
                match self.next() {
                    Some(Token::LParen) => depth += 1,
                    Some(Token::RParen) => depth -= 1,
                    Some(_) => {}
                    None => return Err(self.error("Unclosed metadata".to_string())),
                }
            }
        }
        match self.next() {
            None => Ok(()),
            Some(token) => Err(self.error(format!("Unexpected trailing token {:?}", token))),
        }
    }

    fn error(&self, message: String) -> ParseError {
        ParseError::Parse {
            line: self.line,
            message,
        }
    }
}

// ============================================================================
// Literals
// ============================================================================

/// An untyped value as written in the file.
#[derive(Clone, Debug, PartialEq)]
enum Literal {
    Number(String),
    Str(String),
    Asset(String),
    Path(String),
    Ident(String),
    Tuple(Vec<Literal>),
    List(Vec<Literal>),
    Dict,
}

impl Literal {
    fn is_none(&self) -> bool {
        matches!(self, Literal::Ident(s) if s == "None")
    }
}

fn parse_literal(cursor: &mut Cursor) -> ParseResult<Literal> {
    match cursor.next() {
        Some(Token::Number(s)) => Ok(Literal::Number(s)),
        Some(Token::Str(s)) => Ok(Literal::Str(s)),
        Some(Token::Asset(s)) => Ok(Literal::Asset(s)),
        Some(Token::Path(s)) => Ok(Literal::Path(s)),
        Some(Token::Ident(s)) => Ok(Literal::Ident(s)),
        Some(Token::LParen) => parse_sequence(cursor, Token::RParen).map(Literal::Tuple),
        Some(Token::LBracket) => parse_sequence(cursor, Token::RBracket).map(Literal::List),
        Some(Token::LBrace) => {
            skip_braces(cursor)?;
            Ok(Literal::Dict)
        }
        other => Err(cursor.error(format!("Expected value, found {:?}", other))),
    }
}

fn parse_sequence(cursor: &mut Cursor, close: Token) -> ParseResult<Vec<Literal>> {
    let mut items = Vec::new();
    loop {
        if cursor.eat(&close) {
            return Ok(items);
        }
        items.push(parse_literal(cursor)?);
        if !cursor.eat(&Token::Comma) {
            cursor.expect(&close)?;
            return Ok(items);
        }
    }
}

/// Consume tokens up to the brace closing an already consumed `{`.
fn skip_braces(cursor: &mut Cursor) -> ParseResult<()> {
    let mut depth = 1;
    while depth > 0 {
        match cursor.next() {
            Some(Token::LBrace) => depth += 1,
            Some(Token::RBrace) => depth -= 1,
            Some(_) => {}
            None => return Err(cursor.error("Unclosed dictionary".to_string())),
        }
    }
    Ok(())
}

/// Parse `key = value` entries up to the closing parenthesis. A bare
/// string entry is recorded under `doc`.
fn parse_metadata(cursor: &mut Cursor) -> ParseResult<Vec<(String, Literal)>> {
    let mut entries = Vec::new();
    loop {
        match cursor.peek() {
            Some(Token::RParen) => {
                cursor.next();
                return Ok(entries);
            }
            Some(Token::Semicolon) => {
                cursor.next();
            }
            Some(Token::Str(_)) => {
                let doc = parse_literal(cursor)?;
                entries.push(("doc".to_string(), doc));
            }
            Some(Token::Ident(_)) => {
                let mut key = cursor.ident()?;
                if matches!(key.as_str(), "prepend" | "append" | "add" | "delete" | "reorder") {
                    key = cursor.ident()?;
                }
                cursor.expect(&Token::Equals)?;
                let value = parse_literal(cursor)?;
                entries.push((key, value));
            }
            other => {
                return Err(cursor.error(format!("Unexpected token in metadata: {:?}", other)));
            }
        }
    }
}

fn parse_layer_metadata(text: &str, line: usize) -> ParseResult<LayerMetadata> {
    let mut cursor = Cursor::new(tokenize(text, line)?, line);
    cursor.expect(&Token::LParen)?;

    let mut metadata = LayerMetadata::default();
    for (key, value) in parse_metadata(&mut cursor)? {
        match key.as_str() {
            "defaultPrim" => metadata.default_prim = literal_string(&value),
            "upAxis" => metadata.up_axis = literal_string(&value),
            "doc" => metadata.doc = literal_string(&value),
            "startTimeCode" => metadata.start_time_code = Some(literal_f64(&value, line)?),
            "endTimeCode" => metadata.end_time_code = Some(literal_f64(&value, line)?),
            "timeCodesPerSecond" => metadata.time_codes_per_second = literal_f64(&value, line)?,
            "framesPerSecond" => metadata.frames_per_second = Some(literal_f64(&value, line)?),
            "metersPerUnit" => metadata.meters_per_unit = Some(literal_f64(&value, line)?),
            other => log::trace!("Ignoring layer metadata '{}'", other),
        }
    }

    Ok(metadata)
}

fn parse_prim_header(header: &str, parent: &SdfPath, line: usize) -> ParseResult<Prim> {
    let mut cursor = Cursor::new(tokenize(header, line)?, line);

    let keyword = cursor.ident()?;
    let specifier = Specifier::from_keyword(&keyword)
        .ok_or_else(|| cursor.error(format!("Unknown specifier '{}'", keyword)))?;

    let type_name = match cursor.peek() {
        Some(Token::Ident(_)) => cursor.ident()?,
        _ => String::new(),
    };

    let name = match cursor.next() {
        Some(Token::Str(name)) => name,
        other => return Err(cursor.error(format!("Expected prim name, found {:?}", other))),
    };
    if !is_valid_identifier(&name) {
        return Err(cursor.error(format!("Invalid prim name \"{}\"", name)));
    }

    let mut prim = Prim::new(parent, &name, &type_name);
    prim.specifier = specifier;

    if cursor.eat(&Token::LParen) {
        for (key, value) in parse_metadata(&mut cursor)? {
            if key == "active" {
                prim.active = !matches!(&value, Literal::Ident(s) if s == "false")
                    && value != Literal::Number("0".to_string());
            }
        }
    }

    Ok(prim)
}

// ============================================================================
// Properties
// ============================================================================

fn parse_property(text: &str, line: usize, prim: &mut Prim) -> ParseResult<()> {
    let mut cursor = Cursor::new(tokenize(text, line)?, line);

    let mut custom = false;
    let mut uniform = false;
    loop {
        match cursor.peek_ident() {
            Some("custom") => custom = true,
            Some("uniform") => uniform = true,
            Some("varying") | Some("config") => {}
            Some("prepend") | Some("append") | Some("add") | Some("delete") => {}
            _ => break,
        }
        cursor.next();
    }

    let keyword = match cursor.peek_ident() {
        Some(keyword) => keyword.to_string(),
        None => {
            log::debug!("Skipping statement at line {}: {}", line, text.trim());
            return Ok(());
        }
    };

    match keyword.as_str() {
        "rel" => {
            cursor.next();
            parse_relationship(&mut cursor, prim)
        }
        "variantSet" | "variants" | "reorder" => {
            log::debug!("Skipping '{}' statement at line {}", keyword, line);
            Ok(())
        }
        _ => parse_attribute(&mut cursor, prim, custom, uniform),
    }
}

fn parse_relationship(cursor: &mut Cursor, prim: &mut Prim) -> ParseResult<()> {
    let name = cursor.ident()?;

    let mut targets = Vec::new();
    if cursor.eat(&Token::Equals) {
        let value = parse_literal(cursor)?;
        let paths = match value {
            Literal::Path(p) => vec![p],
            Literal::List(items) => items
                .into_iter()
                .filter_map(|item| match item {
                    Literal::Path(p) => Some(p),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        };
        for path in paths {
            match SdfPath::new(&path) {
                Some(target) => targets.push(target),
                None => log::warn!(
                    "Ignoring non-prim relationship target <{}> on {}",
                    path,
                    prim.path
                ),
            }
        }
    }

    cursor.finish()?;

    match prim.relationships.iter_mut().find(|r| r.name == name) {
        Some(existing) => existing.targets.extend(targets),
        None => prim.relationships.push(Relationship { name, targets }),
    }
    Ok(())
}

fn parse_attribute(
    cursor: &mut Cursor,
    prim: &mut Prim,
    custom: bool,
    uniform: bool,
) -> ParseResult<()> {
    let base_type = cursor.ident()?;
    let is_array = if cursor.eat(&Token::LBracket) {
        cursor.expect(&Token::RBracket)?;
        true
    } else {
        false
    };
    let full_name = cursor.ident()?;

    let (name, suffix) = match full_name.rsplit_once('.') {
        Some((name, suffix)) => (name.to_string(), Some(suffix.to_string())),
        None => (full_name.clone(), None),
    };

    if matches!(suffix.as_deref(), Some("connect") | Some("spline")) {
        log::debug!("Skipping {} on {}", full_name, prim.path);
        return Ok(());
    }
    let is_time_samples = match suffix.as_deref() {
        Some("timeSamples") => true,
        None => false,
        Some(other) => {
            return Err(cursor.error(format!("Unknown property suffix '.{}'", other)));
        }
    };

    let type_name = if is_array { format!("{}[]", base_type) } else { base_type.clone() };
    let value_type = ValueType::from_type_name(&base_type);
    if value_type.is_none() {
        log::debug!("Unsupported attribute type '{}' for {}.{}", type_name, prim.path, name);
    }

    let index = match prim.attributes.iter().position(|a| a.name == name) {
        Some(index) => index,
        None => {
            prim.attributes.push(Attribute::new(name.clone(), type_name.clone()));
            prim.attributes.len() - 1
        }
    };
    let line = cursor.line;
    let attr = &mut prim.attributes[index];
    attr.type_name = type_name;
    attr.custom |= custom;
    attr.uniform |= uniform;

    if !cursor.eat(&Token::Equals) {
        return cursor.finish();
    }

    if is_time_samples {
        cursor.expect(&Token::LBrace)?;
        loop {
            if cursor.eat(&Token::RBrace) {
                break;
            }
            let time = match cursor.next() {
                Some(Token::Number(t)) => parse_f64(&t, line)?,
                other => {
                    return Err(cursor.error(format!("Expected sample time, found {:?}", other)))
                }
            };
            cursor.expect(&Token::Colon)?;
            let literal = parse_literal(cursor)?;
            let value = match value_type {
                Some(ty) => literal_to_value(&literal, ty, is_array, line)?,
                None => None,
            };
            attr.time_samples.insert(time, value);
            if !cursor.eat(&Token::Comma) {
                cursor.expect(&Token::RBrace)?;
                break;
            }
        }
    } else {
        let literal = parse_literal(cursor)?;
        attr.default = match value_type {
            Some(ty) => literal_to_value(&literal, ty, is_array, line)?,
            None => None,
        };
    }

    // Attribute metadata is not needed for value queries
    cursor.finish()
}

// ============================================================================
// Literal conversion
// ============================================================================

fn parse_f64(text: &str, line: usize) -> ParseResult<f64> {
    match text {
        "inf" | "+inf" => Ok(f64::INFINITY),
        "-inf" => Ok(f64::NEG_INFINITY),
        "nan" => Ok(f64::NAN),
        _ => text.parse::<f64>().map_err(|_| ParseError::InvalidNumber {
            line,
            text: text.to_string(),
        }),
    }
}

fn literal_f64(literal: &Literal, line: usize) -> ParseResult<f64> {
    match literal {
        Literal::Number(s) | Literal::Ident(s) => parse_f64(s, line),
        other => Err(ParseError::Parse {
            line,
            message: format!("Expected number, found {:?}", other),
        }),
    }
}

fn literal_i64(literal: &Literal, line: usize) -> ParseResult<i64> {
    match literal {
        Literal::Number(s) => s.parse::<i64>().map_err(|_| ParseError::InvalidNumber {
            line,
            text: s.clone(),
        }),
        other => Err(ParseError::Parse {
            line,
            message: format!("Expected integer, found {:?}", other),
        }),
    }
}

fn literal_i32(literal: &Literal, line: usize) -> ParseResult<i32> {
    let value = literal_i64(literal, line)?;
    i32::try_from(value).map_err(|_| ParseError::InvalidNumber {
        line,
        text: value.to_string(),
    })
}

fn literal_bool(literal: &Literal, line: usize) -> ParseResult<bool> {
    match literal {
        Literal::Ident(s) if s == "true" => Ok(true),
        Literal::Ident(s) if s == "false" => Ok(false),
        Literal::Number(s) if s == "1" => Ok(true),
        Literal::Number(s) if s == "0" => Ok(false),
        other => Err(ParseError::Parse {
            line,
            message: format!("Expected bool, found {:?}", other),
        }),
    }
}

fn literal_string(literal: &Literal) -> Option<String> {
    match literal {
        Literal::Str(s) | Literal::Asset(s) | Literal::Ident(s) => Some(s.clone()),
        _ => None,
    }
}

fn literal_tuple(literal: &Literal, len: usize, line: usize) -> ParseResult<Vec<f64>> {
    match literal {
        Literal::Tuple(items) if items.len() == len => {
            items.iter().map(|item| literal_f64(item, line)).collect()
        }
        Literal::Tuple(items) => Err(ParseError::Parse {
            line,
            message: format!("Expected {} components, got {}", len, items.len()),
        }),
        other => Err(ParseError::Parse {
            line,
            message: format!("Expected tuple, found {:?}", other),
        }),
    }
}

fn literal_matrix(literal: &Literal, line: usize) -> ParseResult<DMat4> {
    let rows = match literal {
        Literal::Tuple(rows) if rows.len() == 4 => rows,
        other => {
            return Err(ParseError::Parse {
                line,
                message: format!("Expected 4x4 matrix, found {:?}", other),
            })
        }
    };
    let mut cols = [[0.0; 4]; 4];
    for (i, row) in rows.iter().enumerate() {
        let values = literal_tuple(row, 4, line)?;
        cols[i].copy_from_slice(&values);
    }
    // USD matrices are row-major with row vectors; each row becomes a glam column
    Ok(DMat4::from_cols_array_2d(&cols))
}

fn literal_to_scalar(literal: &Literal, ty: ValueType, line: usize) -> ParseResult<Value> {
    let value = match ty {
        ValueType::Bool => Value::Bool(literal_bool(literal, line)?),
        ValueType::Int => Value::Int(literal_i32(literal, line)?),
        ValueType::Int64 => Value::Int64(literal_i64(literal, line)?),
        ValueType::Float => Value::Float(literal_f64(literal, line)? as f32),
        ValueType::Double => Value::Double(literal_f64(literal, line)?),
        ValueType::String | ValueType::Token | ValueType::Asset => {
            let text = literal_string(literal).ok_or_else(|| ParseError::Parse {
                line,
                message: format!("Expected string, found {:?}", literal),
            })?;
            match ty {
                ValueType::String => Value::String(text),
                ValueType::Token => Value::Token(text),
                _ => Value::Asset(text),
            }
        }
        ValueType::Matrix4d => Value::Matrix4d(literal_matrix(literal, line)?),
        ValueType::Quatf | ValueType::Quatd => {
            // Written as (real, i, j, k)
            let q = literal_tuple(literal, 4, line)?;
            if ty == ValueType::Quatf {
                Value::Quatf(Quat::from_xyzw(q[1] as f32, q[2] as f32, q[3] as f32, q[0] as f32))
            } else {
                Value::Quatd(DQuat::from_xyzw(q[1], q[2], q[3], q[0]))
            }
        }
        tuple_type => {
            let len = tuple_type.tuple_len().unwrap_or(1);
            let v = literal_tuple(literal, len, line)?;
            match tuple_type {
                ValueType::Float2 => Value::Float2(Vec2::new(v[0] as f32, v[1] as f32)),
                ValueType::Float3 => {
                    Value::Float3(Vec3::new(v[0] as f32, v[1] as f32, v[2] as f32))
                }
                ValueType::Float4 => {
                    Value::Float4(Vec4::new(v[0] as f32, v[1] as f32, v[2] as f32, v[3] as f32))
                }
                ValueType::Double2 => Value::Double2(DVec2::new(v[0], v[1])),
                ValueType::Double3 => Value::Double3(DVec3::new(v[0], v[1], v[2])),
                ValueType::Double4 => Value::Double4(DVec4::new(v[0], v[1], v[2], v[3])),
                ValueType::Int2 => Value::Int2(IVec2::new(
                    int_component(v[0], line)?,
                    int_component(v[1], line)?,
                )),
                ValueType::Int3 => Value::Int3(IVec3::new(
                    int_component(v[0], line)?,
                    int_component(v[1], line)?,
                    int_component(v[2], line)?,
                )),
                ValueType::Int4 => Value::Int4(IVec4::new(
                    int_component(v[0], line)?,
                    int_component(v[1], line)?,
                    int_component(v[2], line)?,
                    int_component(v[3], line)?,
                )),
                other => {
                    return Err(ParseError::Parse {
                        line,
                        message: format!("Cannot read {:?} as a tuple", other),
                    })
                }
            }
        }
    };
    Ok(value)
}

fn int_component(value: f64, line: usize) -> ParseResult<i32> {
    if value.fract() == 0.0 && value >= i32::MIN as f64 && value <= i32::MAX as f64 {
        Ok(value as i32)
    } else {
        Err(ParseError::InvalidNumber {
            line,
            text: value.to_string(),
        })
    }
}

/// Convert a literal into a value of the declared type. `None` literals
/// (value blocks) and unsupported array element types yield `Ok(None)`.
fn literal_to_value(
    literal: &Literal,
    ty: ValueType,
    is_array: bool,
    line: usize,
) -> ParseResult<Option<Value>> {
    if literal.is_none() {
        return Ok(None);
    }
    if !is_array {
        return literal_to_scalar(literal, ty, line).map(Some);
    }

    let items = match literal {
        Literal::List(items) => items,
        other => {
            return Err(ParseError::Parse {
                line,
                message: format!("Expected array, found {:?}", other),
            })
        }
    };
    let scalars = items
        .iter()
        .map(|item| literal_to_scalar(item, ty, line))
        .collect::<ParseResult<Vec<_>>>()?;

    macro_rules! collect_array {
        ($variant:ident, $array:ident) => {
            Value::$array(
                scalars
                    .into_iter()
                    .filter_map(|v| match v {
                        Value::$variant(x) => Some(x),
                        _ => None,
                    })
                    .collect(),
            )
        };
    }

    let value = match ty {
        ValueType::Bool => collect_array!(Bool, BoolArray),
        ValueType::Int => collect_array!(Int, IntArray),
        ValueType::Float => collect_array!(Float, FloatArray),
        ValueType::Double => collect_array!(Double, DoubleArray),
        ValueType::String => collect_array!(String, StringArray),
        ValueType::Token => collect_array!(Token, TokenArray),
        ValueType::Float3 => collect_array!(Float3, Float3Array),
        ValueType::Double3 => collect_array!(Double3, Double3Array),
        ValueType::Int3 => collect_array!(Int3, Int3Array),
        other => {
            log::debug!("Unsupported array element type {:?} at line {}", other, line);
            return Ok(None);
        }
    };
    Ok(Some(value))
}
