//! Line classification: raw source text to classified structural [`Line`]s.
//!
//! A byte cursor walks the input once, tracking a 1-based physical line
//! counter. Blank lines and comments are skipped; bracketed headers and
//! key-value lines come out classified with their key paths split and their
//! value payloads parsed. Value syntax is deliberately shallow: single-line
//! strings, integers, floats, booleans, `null`, and (possibly multi-line)
//! value arrays. Multiline strings, inline tables, and date-times are
//! rejected with descriptive errors.

#[cfg(test)]
#[path = "./classify_tests.rs"]
mod tests;

use crate::error::{Error, ErrorKind};
use crate::line::Line;
use crate::path::{KeyPath, is_bare_key_byte};
use crate::value::{Payload, Scalar};

/// Classifies the whole input into structural lines.
pub fn classify(input: &str) -> Result<Vec<Line>, Error> {
    let mut c = Classifier::new(input);
    let mut lines = Vec::new();
    loop {
        c.eat_whitespace();
        if c.eat_comment()? {
            continue;
        }
        if c.eat_newline() {
            continue;
        }
        match c.peek_byte() {
            None => break,
            Some(b'[') => lines.push(c.table_header()?),
            Some(b'\r') => return Err(c.err(ErrorKind::Unexpected('\r'))),
            Some(_) => lines.push(c.key_value()?),
        }
    }
    Ok(lines)
}

struct Classifier<'a> {
    /// Raw input. The cursor only ever rests on UTF-8 char boundaries.
    input: &'a str,
    bytes: &'a [u8],
    cursor: usize,
    /// 1-based physical line of the cursor.
    line: u32,
}

impl<'a> Classifier<'a> {
    fn new(input: &'a str) -> Self {
        Classifier {
            input,
            bytes: input.as_bytes(),
            cursor: 0,
            line: 1,
        }
    }

    #[cold]
    fn err(&self, kind: ErrorKind) -> Error {
        Error::new(kind, Some(self.line))
    }

    // -- cursor operations --------------------------------------------------

    #[inline]
    fn peek_byte(&self) -> Option<u8> {
        self.bytes.get(self.cursor).copied()
    }

    #[inline]
    fn peek_byte_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.cursor + offset).copied()
    }

    #[inline]
    fn advance(&mut self) {
        self.cursor += 1;
    }

    #[inline]
    fn eat_byte(&mut self, b: u8) -> bool {
        if self.peek_byte() == Some(b) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_byte(&mut self, b: u8) -> Result<(), Error> {
        if self.eat_byte(b) {
            Ok(())
        } else {
            Err(self.err(ErrorKind::Wanted {
                expected: byte_describe(b),
                found: self.scan_token_desc(),
            }))
        }
    }

    /// Read the next character (with CRLF folding).
    fn next_char(&mut self) -> Option<char> {
        let i = self.cursor;
        let &b = self.bytes.get(i)?;

        if b == b'\r' && self.bytes.get(i + 1) == Some(&b'\n') {
            self.cursor = i + 2;
            return Some('\n');
        }

        if b < 0x80 {
            self.cursor = i + 1;
            Some(b as char)
        } else {
            let ch = self.input[i..].chars().next()?;
            self.cursor = i + ch.len_utf8();
            Some(ch)
        }
    }

    fn eat_whitespace(&mut self) {
        while let Some(b' ' | b'\t') = self.peek_byte() {
            self.advance();
        }
    }

    fn eat_comment(&mut self) -> Result<bool, Error> {
        if !self.eat_byte(b'#') {
            return Ok(false);
        }
        // Consume comment content (valid bytes: tab, 0x20..=0x7E, 0x80..=0xFF)
        while let Some(0x09 | 0x20..=0x7E | 0x80..) = self.peek_byte() {
            self.cursor += 1;
        }
        self.eat_newline_or_eof().map(|()| true)
    }

    fn eat_newline(&mut self) -> bool {
        match self.peek_byte() {
            Some(b'\n') => {
                self.advance();
                self.line += 1;
                true
            }
            Some(b'\r') if self.peek_byte_at(1) == Some(b'\n') => {
                self.cursor += 2;
                self.line += 1;
                true
            }
            _ => false,
        }
    }

    fn eat_newline_or_eof(&mut self) -> Result<(), Error> {
        if self.peek_byte().is_none() || self.eat_newline() {
            Ok(())
        } else {
            Err(self.err(ErrorKind::Wanted {
                expected: "newline",
                found: self.scan_token_desc(),
            }))
        }
    }

    /// Describes the "token" at the cursor for error messages.
    fn scan_token_desc(&self) -> &'static str {
        match self.peek_byte() {
            None => "eof",
            Some(b'\n' | b'\r') => "a newline",
            Some(b' ' | b'\t') => "whitespace",
            Some(b'#') => "a comment",
            Some(b'=') => "an equals",
            Some(b'.') => "a period",
            Some(b',') => "a comma",
            Some(b':') => "a colon",
            Some(b'+') => "a plus",
            Some(b'{') => "a left brace",
            Some(b'}') => "a right brace",
            Some(b'[') => "a left bracket",
            Some(b']') => "a right bracket",
            Some(b'\'' | b'"') => "a string",
            Some(b) if is_bare_key_byte(b) => "an identifier",
            Some(_) => "a character",
        }
    }

    // -- keylike parsing ----------------------------------------------------

    fn read_keylike(&mut self) -> &'a str {
        let start = self.cursor;
        while let Some(b) = self.peek_byte() {
            if !is_bare_key_byte(b) {
                break;
            }
            self.advance();
        }
        &self.input[start..self.cursor]
    }

    fn read_table_key(&mut self) -> Result<Box<str>, Error> {
        match self.peek_byte() {
            Some(q @ (b'"' | b'\'')) => {
                self.advance();
                if self.multiline_opener(q) {
                    return Err(self.err(ErrorKind::MultilineStringKey));
                }
                self.read_string(q)
            }
            Some(b) if is_bare_key_byte(b) => Ok(Box::from(self.read_keylike())),
            Some(_) => Err(self.err(ErrorKind::Wanted {
                expected: "a table key",
                found: self.scan_token_desc(),
            })),
            None => Err(self.err(ErrorKind::Wanted {
                expected: "a table key",
                found: "eof",
            })),
        }
    }

    // -- string parsing -----------------------------------------------------

    /// True if the cursor (just past an opening quote) sits on two more of
    /// the same quote, i.e. a multiline string opener.
    fn multiline_opener(&self, delim: u8) -> bool {
        self.peek_byte() == Some(delim) && self.peek_byte_at(1) == Some(delim)
    }

    /// Reads a single-line string after its opening quote. Escapes are only
    /// processed for basic (`"`) strings.
    fn read_string(&mut self, delim: u8) -> Result<Box<str>, Error> {
        let mut buf = String::new();
        loop {
            let Some(c) = self.next_char() else {
                return Err(self.err(ErrorKind::UnterminatedString));
            };
            match c {
                c if c == delim as char => return Ok(buf.into_boxed_str()),
                '\n' | '\r' => return Err(self.err(ErrorKind::InvalidCharInString(c))),
                '\\' if delim == b'"' => self.read_basic_escape(&mut buf)?,
                '\t' => buf.push('\t'),
                c if (c as u32) < 0x20 || c == '\u{7f}' => {
                    return Err(self.err(ErrorKind::InvalidCharInString(c)));
                }
                c => buf.push(c),
            }
        }
    }

    fn read_basic_escape(&mut self, buf: &mut String) -> Result<(), Error> {
        let Some(c) = self.next_char() else {
            return Err(self.err(ErrorKind::UnterminatedString));
        };
        match c {
            '"' => buf.push('"'),
            '\\' => buf.push('\\'),
            'b' => buf.push('\u{8}'),
            'f' => buf.push('\u{c}'),
            'n' => buf.push('\n'),
            'r' => buf.push('\r'),
            't' => buf.push('\t'),
            'e' => buf.push('\u{1b}'),
            'x' => buf.push(self.read_hex(2)?),
            'u' => buf.push(self.read_hex(4)?),
            'U' => buf.push(self.read_hex(8)?),
            _ => return Err(self.err(ErrorKind::InvalidEscape(c))),
        }
        Ok(())
    }

    fn read_hex(&mut self, n: usize) -> Result<char, Error> {
        let start = self.cursor;
        for _ in 0..n {
            let Some(b) = self.peek_byte() else {
                return Err(self.err(ErrorKind::UnterminatedString));
            };
            if !b.is_ascii_hexdigit() {
                let Some(c) = self.next_char() else {
                    return Err(self.err(ErrorKind::UnterminatedString));
                };
                return Err(self.err(ErrorKind::InvalidHexEscape(c)));
            }
            self.advance();
        }
        let val = u32::from_str_radix(&self.input[start..self.cursor], 16)
            .expect("hex digits verified above");
        match char::from_u32(val) {
            Some(ch) => Ok(ch),
            None => Err(self.err(ErrorKind::InvalidEscapeValue(val))),
        }
    }

    // -- value parsing ------------------------------------------------------

    fn value(&mut self) -> Result<Payload, Error> {
        let Some(byte) = self.peek_byte() else {
            return Err(self.err(ErrorKind::UnexpectedEof));
        };
        match byte {
            q @ (b'"' | b'\'') => {
                self.advance();
                if self.multiline_opener(q) {
                    return Err(self.err(ErrorKind::Wanted {
                        expected: "a single-line string",
                        found: "a multiline string",
                    }));
                }
                let s = self.read_string(q)?;
                Ok(Payload::Scalar(Scalar::String(s)))
            }
            b'[' => {
                self.advance();
                self.array_contents()
            }
            b'{' => Err(self.err(ErrorKind::Wanted {
                expected: "a value",
                found: "an inline table",
            })),
            b'+' => {
                self.advance();
                match self.peek_byte() {
                    Some(b) if is_bare_key_byte(b) => {
                        let s = self.read_keylike();
                        Ok(Payload::Scalar(self.number(s)?))
                    }
                    _ => Err(self.err(ErrorKind::InvalidNumber)),
                }
            }
            b if is_bare_key_byte(b) => {
                let key = self.read_keylike();
                match key {
                    "true" => Ok(Payload::Scalar(Scalar::Boolean(true))),
                    "false" => Ok(Payload::Scalar(Scalar::Boolean(false))),
                    "null" => Ok(Payload::Scalar(Scalar::Null)),
                    "inf" | "nan" => Ok(Payload::Scalar(self.number(key)?)),
                    _ => {
                        let first = key.chars().next().expect("keylike run is non-empty");
                        match first {
                            '-' | '0'..='9' => Ok(Payload::Scalar(self.number(key)?)),
                            _ => Err(self.err(ErrorKind::UnquotedString)),
                        }
                    }
                }
            }
            _ => Err(self.err(ErrorKind::Wanted {
                expected: "a value",
                found: self.scan_token_desc(),
            })),
        }
    }

    fn array_contents(&mut self) -> Result<Payload, Error> {
        let mut items = Vec::new();
        loop {
            self.eat_intermediate()?;
            if self.eat_byte(b']') {
                return Ok(Payload::Array(items));
            }
            items.push(self.value()?);
            self.eat_intermediate()?;
            if !self.eat_byte(b',') {
                break;
            }
        }
        self.eat_intermediate()?;
        self.expect_byte(b']')?;
        Ok(Payload::Array(items))
    }

    /// Whitespace, newlines, and comments between array items.
    fn eat_intermediate(&mut self) -> Result<(), Error> {
        loop {
            self.eat_whitespace();
            if self.eat_newline() {
                continue;
            }
            if !self.eat_comment()? {
                break;
            }
        }
        Ok(())
    }

    // -- number parsing -----------------------------------------------------

    /// Parses a numeric token already read by `read_keylike`. Continues
    /// reading from the cursor when the token is followed by a fractional
    /// part (`1.5` scans as `1`, `.`, `5e3`).
    fn number(&mut self, s: &'a str) -> Result<Scalar, Error> {
        if let Some(hex) = s.strip_prefix("0x") {
            self.integer(hex, 16)
        } else if let Some(oct) = s.strip_prefix("0o") {
            self.integer(oct, 8)
        } else if let Some(bin) = s.strip_prefix("0b") {
            self.integer(bin, 2)
        } else if s.contains('e') || s.contains('E') {
            self.float(s, None)
        } else if self.eat_byte(b'.') {
            match self.peek_byte() {
                Some(b) if is_bare_key_byte(b) => {
                    let frac = self.read_keylike();
                    self.float(s, Some(frac))
                }
                _ => Err(self.err(ErrorKind::InvalidNumber)),
            }
        } else {
            match s {
                "inf" => Ok(Scalar::Float(f64::INFINITY)),
                "-inf" => Ok(Scalar::Float(f64::NEG_INFINITY)),
                "nan" => Ok(Scalar::Float(f64::NAN.copysign(1.0))),
                "-nan" => Ok(Scalar::Float(f64::NAN.copysign(-1.0))),
                _ => self.integer(s, 10),
            }
        }
    }

    fn integer(&mut self, s: &str, radix: u32) -> Result<Scalar, Error> {
        let Some(cleaned) = strip_underscores(s) else {
            return Err(self.err(ErrorKind::InvalidNumber));
        };
        match i64::from_str_radix(cleaned.trim_start_matches('+'), radix) {
            Ok(v) => Ok(Scalar::Integer(v)),
            Err(_) => Err(self.err(ErrorKind::InvalidNumber)),
        }
    }

    fn float(&mut self, integral: &str, fraction: Option<&str>) -> Result<Scalar, Error> {
        let Some(mut cleaned) = strip_underscores(integral) else {
            return Err(self.err(ErrorKind::InvalidNumber));
        };
        if let Some(fraction) = fraction {
            let Some(frac) = strip_underscores(fraction) else {
                return Err(self.err(ErrorKind::InvalidNumber));
            };
            cleaned.push('.');
            cleaned.push_str(&frac);
        }
        match cleaned.trim_start_matches('+').parse::<f64>() {
            Ok(f) if f.is_finite() => Ok(Scalar::Float(f)),
            _ => Err(self.err(ErrorKind::InvalidNumber)),
        }
    }

    // -- line processing ----------------------------------------------------

    fn table_header(&mut self) -> Result<Line, Error> {
        let line_no = self.line;
        self.expect_byte(b'[')?;
        let is_array = self.eat_byte(b'[');

        self.eat_whitespace();
        let mut path = KeyPath::new();
        path.push(self.read_table_key()?);
        loop {
            self.eat_whitespace();
            if self.eat_byte(b'.') {
                self.eat_whitespace();
                path.push(self.read_table_key()?);
            } else {
                break;
            }
        }

        self.expect_byte(b']')?;
        if is_array {
            self.expect_byte(b']')?;
        }
        self.eat_whitespace();
        if !self.eat_comment()? {
            self.eat_newline_or_eof()?;
        }

        Ok(if is_array {
            Line::ArrayOfTables {
                path,
                line: line_no,
            }
        } else {
            Line::Table {
                path,
                line: line_no,
            }
        })
    }

    fn key_value(&mut self) -> Result<Line, Error> {
        let line_no = self.line;
        let mut path = KeyPath::new();
        path.push(self.read_table_key()?);
        self.eat_whitespace();
        while self.eat_byte(b'.') {
            self.eat_whitespace();
            path.push(self.read_table_key()?);
            self.eat_whitespace();
        }

        self.expect_byte(b'=')?;
        self.eat_whitespace();
        let payload = self.value()?;
        self.eat_whitespace();
        if !self.eat_comment()? {
            self.eat_newline_or_eof()?;
        }

        Ok(Line::KeyValue {
            path,
            payload,
            line: line_no,
        })
    }
}

/// Removes underscores, requiring each to sit between two ASCII
/// alphanumerics. Returns `None` when an underscore is misplaced.
fn strip_underscores(s: &str) -> Option<String> {
    let mut out = String::with_capacity(s.len());
    let mut prev = 0u8;
    for &b in s.as_bytes() {
        if b == b'_' {
            if !prev.is_ascii_alphanumeric() {
                return None;
            }
        } else {
            if prev == b'_' && !b.is_ascii_alphanumeric() {
                return None;
            }
            out.push(b as char);
        }
        prev = b;
    }
    if prev == b'_' { None } else { Some(out) }
}

fn byte_describe(b: u8) -> &'static str {
    match b {
        b'\n' => "a newline",
        b' ' | b'\t' => "whitespace",
        b'=' => "an equals",
        b'.' => "a period",
        b',' => "a comma",
        b':' => "a colon",
        b'+' => "a plus",
        b'{' => "a left brace",
        b'}' => "a right brace",
        b'[' => "a left bracket",
        b']' => "a right bracket",
        b'\'' | b'"' => "a string",
        _ if is_bare_key_byte(b) => "an identifier",
        _ => "a character",
    }
}
