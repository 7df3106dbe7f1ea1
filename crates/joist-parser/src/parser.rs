//! The recursive-descent scanner.
//!
//! A cursor walks the input byte range once, tracking `(line, column)` for
//! diagnostics. Containers nest through an explicit container-kind stack
//! bounded by [`MAX_DEPTH`]; statistics count values as they close.

use core::fmt::Write as _;
use std::time::Instant;

use joist_value::{Object, Value};

use crate::control::{Control, DupKey};
use crate::error::Error;
use crate::input::Input;
use crate::schema::Validate;
use crate::stats::Stats;

/// Deepest container nesting the parser will follow.
pub const MAX_DEPTH: usize = 1024;

/// Parse result: the document root plus the statistics gathered on the way.
#[derive(Debug)]
pub struct Output {
    pub root: Value,
    pub stats: Stats,
}

/// Parse one JSON document.
///
/// # Errors
///
/// The first violation aborts the parse; see [`Error`] for the taxonomy.
/// No partial tree is ever returned.
pub fn parse(input: &Input<'_>, ctrl: &Control) -> Result<Output, Error> {
    parse_inner(input, ctrl, None)
}

/// Parse one JSON document, invoking `validator` on every completed value.
///
/// # Errors
///
/// As [`parse`], plus [`Error::Schema`] when the validator rejects a value.
pub fn parse_with_validator(
    input: &Input<'_>,
    ctrl: &Control,
    validator: &dyn Validate,
) -> Result<Output, Error> {
    parse_inner(input, ctrl, Some(validator))
}

fn parse_inner(
    input: &Input<'_>,
    ctrl: &Control,
    validator: Option<&dyn Validate>,
) -> Result<Output, Error> {
    let started = Instant::now();
    let mut parser = Parser::new(input.bytes(), ctrl, validator);
    let root = parser.parse_document()?;
    let mut stats = parser.stats;
    stats.bytes = input.len() as u64;
    stats.duration_ns = u64::try_from(started.elapsed().as_nanos()).unwrap_or(u64::MAX);
    tracing::debug!(%stats, "parse complete");
    Ok(Output { root, stats })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    Object,
    Array,
}

struct Parser<'a> {
    bytes: &'a [u8],
    pos: usize,
    line: u64,
    /// Byte index where the current line starts; column = pos - line_begin + 1.
    line_begin: usize,
    ctrl: &'a Control,
    validator: Option<&'a dyn Validate>,
    stack: Vec<Container>,
    /// JSON-pointer path to the value being parsed; only maintained when a
    /// validator is present.
    path: String,
    stats: Stats,
}

impl<'a> Parser<'a> {
    fn new(bytes: &'a [u8], ctrl: &'a Control, validator: Option<&'a dyn Validate>) -> Self {
        Self {
            bytes,
            pos: 0,
            line: 1,
            line_begin: 0,
            ctrl,
            validator,
            stack: Vec::new(),
            path: String::new(),
            stats: Stats::default(),
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn advance(&mut self) {
        if self.bytes.get(self.pos) == Some(&b'\n') {
            self.line += 1;
            self.line_begin = self.pos + 1;
        }
        self.pos += 1;
    }

    fn col(&self) -> u64 {
        (self.pos - self.line_begin + 1) as u64
    }

    fn loc(&self) -> (u64, u64) {
        (self.line, self.col())
    }

    fn syntax(&self, reason: impl Into<String>) -> Error {
        self.syntax_at(self.loc(), reason)
    }

    #[allow(clippy::unused_self)]
    fn syntax_at(&self, (line, col): (u64, u64), reason: impl Into<String>) -> Error {
        Error::Syntax {
            line,
            col,
            reason: reason.into(),
        }
    }

    fn parse_document(&mut self) -> Result<Value, Error> {
        self.skip_trivia()?;
        if self.peek().is_none() {
            return Err(self.syntax("unexpected end of input"));
        }
        let root = self.parse_value()?;
        self.skip_trivia()?;
        if self.peek().is_some() {
            return Err(self.syntax("trailing garbage after document"));
        }
        Ok(root)
    }

    /// Skips whitespace and `//` / `/* */` comments.
    fn skip_trivia(&mut self) -> Result<(), Error> {
        loop {
            match self.peek() {
                Some(b' ' | b'\t' | b'\r' | b'\n') => self.advance(),
                Some(b'/') => match self.bytes.get(self.pos + 1) {
                    Some(b'/') => {
                        self.advance();
                        self.advance();
                        while let Some(b) = self.peek() {
                            self.advance();
                            if b == b'\n' {
                                break;
                            }
                        }
                    }
                    Some(b'*') => self.skip_block_comment()?,
                    _ => break,
                },
                _ => break,
            }
        }
        Ok(())
    }

    fn skip_block_comment(&mut self) -> Result<(), Error> {
        let open = self.loc();
        self.advance();
        self.advance();
        loop {
            match self.peek() {
                None => return Err(self.syntax_at(open, "unterminated block comment")),
                Some(b'*') if self.bytes.get(self.pos + 1) == Some(&b'/') => {
                    self.advance();
                    self.advance();
                    return Ok(());
                }
                Some(_) => self.advance(),
            }
        }
    }

    fn parse_value(&mut self) -> Result<Value, Error> {
        let value = match self.peek() {
            Some(b'{') => self.parse_object()?,
            Some(b'[') => self.parse_array()?,
            Some(b'"') => Value::Str(self.scan_quoted(b'"')?),
            Some(b'\'') if self.ctrl.allow_flexible_strings => {
                Value::Str(self.scan_quoted(b'\'')?)
            }
            Some(b'-' | b'0'..=b'9') => self.parse_number()?,
            Some(b't' | b'f' | b'n') => self.parse_literal()?,
            Some(b'T' | b'F' | b'N') if self.ctrl.allow_nocase_values => self.parse_literal()?,
            Some(b) => return Err(self.syntax(format!("unexpected byte '{}'", printable(b)))),
            None => return Err(self.syntax("unexpected end of input")),
        };
        self.closed(&value)?;
        Ok(value)
    }

    /// Counts a completed value and runs the schema hook, if any.
    fn closed(&mut self, value: &Value) -> Result<(), Error> {
        match value {
            Value::Null => self.stats.nulls += 1,
            Value::Bool(_) => self.stats.bools += 1,
            Value::Int(_) | Value::Uint(_) => self.stats.ints += 1,
            Value::Double(_) => self.stats.doubles += 1,
            Value::Str(_) => self.stats.strings += 1,
            Value::Array(_) => self.stats.arrays += 1,
            Value::Object(_) => self.stats.objects += 1,
        }
        if let Some(validator) = self.validator {
            validator
                .validate(&self.path, value)
                .map_err(|reason| Error::Schema {
                    path: self.path.clone(),
                    reason,
                })?;
        }
        Ok(())
    }

    fn open(&mut self, kind: Container, loc: (u64, u64)) -> Result<(), Error> {
        if self.stack.len() >= MAX_DEPTH {
            return Err(Error::DepthExceeded {
                line: loc.0,
                col: loc.1,
                limit: MAX_DEPTH,
            });
        }
        self.stack.push(kind);
        self.stats.max_depth = self.stats.max_depth.max(self.stack.len() as u64);
        Ok(())
    }

    fn close(&mut self) {
        self.stack.pop();
    }

    fn parse_object(&mut self) -> Result<Value, Error> {
        let open_loc = self.loc();
        self.open(Container::Object, open_loc)?;
        self.advance(); // '{'
        let mut obj = Object::new();

        self.skip_trivia()?;
        if self.peek() == Some(b'}') {
            self.advance();
        } else {
            loop {
                self.skip_trivia()?;
                let (key, key_loc) = self.parse_key()?;
                self.skip_trivia()?;
                if self.peek() == Some(b':') {
                    self.advance();
                } else {
                    return Err(self.syntax("expected ':' after object key"));
                }
                self.skip_trivia()?;

                let saved = self.push_path_key(&key);
                let value = self.parse_value()?;
                self.truncate_path(saved);
                self.install(&mut obj, key, value, key_loc)?;

                self.skip_trivia()?;
                match self.peek() {
                    Some(b',') => self.advance(),
                    Some(b'}') => {
                        self.advance();
                        break;
                    }
                    _ => return Err(self.syntax("expected ',' or '}'")),
                }
            }
        }

        self.close();
        Ok(Value::Object(obj))
    }

    /// Installs one parsed entry, honoring the duplicate-key policy. The key
    /// counter follows the entries actually kept, so it always equals the sum
    /// of final object sizes.
    fn install(
        &mut self,
        obj: &mut Object,
        key: String,
        value: Value,
        key_loc: (u64, u64),
    ) -> Result<(), Error> {
        if obj.contains_key(&key) {
            match self.ctrl.dup_key {
                DupKey::Reject => {
                    return Err(Error::DuplicateKey {
                        line: key_loc.0,
                        col: key_loc.1,
                        key,
                    });
                }
                DupKey::Accept => {
                    obj.insert(&key, value);
                }
                DupKey::Ignore => {}
                DupKey::Append => {
                    obj.push(&key, value);
                    self.stats.keys += 1;
                }
            }
        } else {
            obj.insert(&key, value);
            self.stats.keys += 1;
        }
        Ok(())
    }

    fn parse_array(&mut self) -> Result<Value, Error> {
        let open_loc = self.loc();
        self.open(Container::Array, open_loc)?;
        self.advance(); // '['
        let mut items = Vec::new();

        self.skip_trivia()?;
        if self.peek() == Some(b']') {
            self.advance();
        } else {
            loop {
                self.skip_trivia()?;
                if self.peek().is_none() {
                    return Err(self.syntax("expected value or ']'"));
                }

                let saved = self.push_path_index(items.len());
                let value = self.parse_value()?;
                self.truncate_path(saved);
                items.push(value);

                self.skip_trivia()?;
                match self.peek() {
                    Some(b',') => self.advance(),
                    Some(b']') => {
                        self.advance();
                        break;
                    }
                    _ => return Err(self.syntax("expected ',' or ']'")),
                }
            }
        }

        self.close();
        Ok(Value::Array(items))
    }

    /// Parses an object key. Returns the key text together with the location
    /// of its first content byte (for duplicate-key diagnostics).
    fn parse_key(&mut self) -> Result<(String, (u64, u64)), Error> {
        match self.peek() {
            Some(b'"') => {
                let loc = (self.line, self.col() + 1);
                Ok((self.scan_quoted(b'"')?, loc))
            }
            Some(b'\'') if self.ctrl.allow_flexible_keys => {
                let loc = (self.line, self.col() + 1);
                Ok((self.scan_quoted(b'\'')?, loc))
            }
            Some(b) if self.ctrl.allow_flexible_keys && is_ident_start(b) => {
                let loc = self.loc();
                let start = self.pos;
                while self.peek().is_some_and(is_ident_continue) {
                    self.advance();
                }
                let text = core::str::from_utf8(&self.bytes[start..self.pos])
                    .map_err(|_| Error::Internal("identifier key is not UTF-8".into()))?
                    .to_owned();
                Ok((text, loc))
            }
            _ => Err(self.syntax("expected object key")),
        }
    }

    /// Scans a quoted string body, decoding escapes, starting at the opening
    /// quote.
    fn scan_quoted(&mut self, quote: u8) -> Result<String, Error> {
        let open = self.loc();
        self.advance(); // opening quote
        let mut buf = Vec::new();
        loop {
            match self.peek() {
                None => return Err(self.syntax_at(open, "unterminated string")),
                Some(b) if b == quote => {
                    self.advance();
                    break;
                }
                Some(b'\\') => {
                    self.advance();
                    self.scan_escape(&mut buf, quote)?;
                }
                Some(b) if b < 0x20 => {
                    return Err(self.syntax(format!("control byte 0x{b:02x} in string")));
                }
                Some(b) => {
                    buf.push(b);
                    self.advance();
                }
            }
        }
        String::from_utf8(buf).map_err(|_| self.syntax_at(open, "string is not valid UTF-8"))
    }

    fn scan_escape(&mut self, buf: &mut Vec<u8>, quote: u8) -> Result<(), Error> {
        let Some(b) = self.peek() else {
            return Err(self.syntax("unterminated escape sequence"));
        };
        self.advance();
        match b {
            b'"' => buf.push(b'"'),
            b'\'' if quote == b'\'' => buf.push(b'\''),
            b'\\' => buf.push(b'\\'),
            b'/' => buf.push(b'/'),
            b'b' => buf.push(0x08),
            b'f' => buf.push(0x0c),
            b'n' => buf.push(b'\n'),
            b'r' => buf.push(b'\r'),
            b't' => buf.push(b'\t'),
            b'u' => {
                let ch = self.scan_unicode_escape()?;
                let mut utf8 = [0_u8; 4];
                buf.extend_from_slice(ch.encode_utf8(&mut utf8).as_bytes());
            }
            other => {
                return Err(self.syntax(format!("invalid escape '\\{}'", printable(other))));
            }
        }
        Ok(())
    }

    /// Decodes `XXXX` (and a following low surrogate when needed) after `\u`.
    fn scan_unicode_escape(&mut self) -> Result<char, Error> {
        let unit = self.scan_hex4()?;
        if (0xD800..0xDC00).contains(&unit) {
            // High surrogate: a low surrogate must follow immediately.
            if self.peek() == Some(b'\\') && self.bytes.get(self.pos + 1) == Some(&b'u') {
                self.advance();
                self.advance();
                let low = self.scan_hex4()?;
                if !(0xDC00..0xE000).contains(&low) {
                    return Err(self.syntax("expected low surrogate after high surrogate"));
                }
                let cp =
                    0x10000 + ((u32::from(unit) - 0xD800) << 10) + (u32::from(low) - 0xDC00);
                char::from_u32(cp)
                    .ok_or_else(|| Error::Internal("surrogate pair decoded out of range".into()))
            } else {
                Err(self.syntax("unpaired high surrogate in \\u escape"))
            }
        } else if (0xDC00..0xE000).contains(&unit) {
            Err(self.syntax("unpaired low surrogate in \\u escape"))
        } else {
            char::from_u32(u32::from(unit))
                .ok_or_else(|| Error::Internal("BMP code unit out of range".into()))
        }
    }

    fn scan_hex4(&mut self) -> Result<u16, Error> {
        let mut unit: u16 = 0;
        for _ in 0..4 {
            let Some(b) = self.peek() else {
                return Err(self.syntax("truncated \\u escape"));
            };
            let digit = match b {
                b'0'..=b'9' => b - b'0',
                b'a'..=b'f' => b - b'a' + 10,
                b'A'..=b'F' => b - b'A' + 10,
                _ => return Err(self.syntax("expected four hex digits in \\u escape")),
            };
            unit = unit * 16 + u16::from(digit);
            self.advance();
        }
        Ok(unit)
    }

    /// Matches `true` / `false` / `null`, case-insensitively when the nocase
    /// mode is on. The keyword must end at a non-identifier byte.
    fn parse_literal(&mut self) -> Result<Value, Error> {
        let loc = self.loc();
        let start = self.pos;
        while self.peek().is_some_and(is_ident_continue) {
            self.advance();
        }
        let word = &self.bytes[start..self.pos];
        if self.ctrl.allow_nocase_values {
            if word.eq_ignore_ascii_case(b"true") {
                return Ok(Value::Bool(true));
            }
            if word.eq_ignore_ascii_case(b"false") {
                return Ok(Value::Bool(false));
            }
            if word.eq_ignore_ascii_case(b"null") {
                return Ok(Value::Null);
            }
        } else {
            match word {
                b"true" => return Ok(Value::Bool(true)),
                b"false" => return Ok(Value::Bool(false)),
                b"null" => return Ok(Value::Null),
                _ => {}
            }
        }
        Err(self.syntax_at(loc, "expected 'true', 'false' or 'null'"))
    }

    /// Scans one number token and picks the narrowest carrier.
    ///
    /// Radix-prefixed (`0x`, `0b`) and octal (`0` + octal digits) forms are
    /// always accepted and yield unsigned integers; a lone `0` is decimal
    /// zero, and a leading-zero run containing `8` or `9` falls back to
    /// decimal. A fraction or exponent makes the number a double.
    fn parse_number(&mut self) -> Result<Value, Error> {
        let loc = self.loc();
        let start = self.pos;
        let negative = self.peek() == Some(b'-');
        if negative {
            self.advance();
        }

        if self.peek() == Some(b'0') {
            match self.bytes.get(self.pos + 1) {
                Some(b'x' | b'X') => {
                    self.advance();
                    self.advance();
                    return self.finish_radix(16, negative, start, loc);
                }
                Some(b'b' | b'B') => {
                    self.advance();
                    self.advance();
                    return self.finish_radix(2, negative, start, loc);
                }
                _ => {}
            }
        }

        let int_start = self.pos;
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.advance();
        }
        if self.pos == int_start {
            return Err(self.syntax_at(loc, "expected digits after '-'"));
        }
        let int_end = self.pos;

        let mut is_double = false;
        if self.peek() == Some(b'.') {
            is_double = true;
            self.advance();
            let frac_start = self.pos;
            while self.peek().is_some_and(|b| b.is_ascii_digit()) {
                self.advance();
            }
            if self.pos == frac_start {
                return Err(self.syntax("expected digits after decimal point"));
            }
        }
        if matches!(self.peek(), Some(b'e' | b'E')) {
            is_double = true;
            self.advance();
            if matches!(self.peek(), Some(b'+' | b'-')) {
                self.advance();
            }
            let exp_start = self.pos;
            while self.peek().is_some_and(|b| b.is_ascii_digit()) {
                self.advance();
            }
            if self.pos == exp_start {
                return Err(self.syntax("expected digits in exponent"));
            }
        }

        if is_double {
            let text = core::str::from_utf8(&self.bytes[start..self.pos])
                .map_err(|_| Error::Internal("number token is not UTF-8".into()))?;
            let parsed: f64 = text
                .parse()
                .map_err(|_| self.syntax_at(loc, format!("invalid number '{text}'")))?;
            return Ok(Value::Double(parsed));
        }

        let digits = &self.bytes[int_start..int_end];
        if digits.len() > 1 && digits[0] == b'0' && digits.iter().all(|b| is_radix_digit(*b, 8)) {
            let magnitude = self.accumulate(&digits[1..], 8, start, loc)?;
            return self.radix_carrier(magnitude, negative, start, loc);
        }

        let magnitude = self.accumulate(digits, 10, start, loc)?;
        self.decimal_carrier(magnitude, negative, start, loc)
    }

    fn finish_radix(
        &mut self,
        radix: u64,
        negative: bool,
        start: usize,
        loc: (u64, u64),
    ) -> Result<Value, Error> {
        let digits_start = self.pos;
        while self.peek().is_some_and(|b| is_radix_digit(b, radix)) {
            self.advance();
        }
        if self.pos == digits_start {
            return Err(self.syntax_at(loc, "expected digits after radix prefix"));
        }
        let magnitude = {
            let digits = &self.bytes[digits_start..self.pos];
            self.accumulate(digits, radix, start, loc)?
        };
        self.radix_carrier(magnitude, negative, start, loc)
    }

    /// Checked digit accumulation; overflow of the widest carrier is a
    /// numeric error at the literal.
    fn accumulate(
        &self,
        digits: &[u8],
        radix: u64,
        start: usize,
        loc: (u64, u64),
    ) -> Result<u64, Error> {
        let mut magnitude: u64 = 0;
        for &b in digits {
            magnitude = magnitude
                .checked_mul(radix)
                .and_then(|m| m.checked_add(u64::from(digit_value(b))))
                .ok_or_else(|| self.overflow(start, loc))?;
        }
        Ok(magnitude)
    }

    /// Decimal promotion: signed first, unsigned on positive overflow.
    fn decimal_carrier(
        &self,
        magnitude: u64,
        negative: bool,
        start: usize,
        loc: (u64, u64),
    ) -> Result<Value, Error> {
        if negative {
            return self.negate(magnitude, start, loc);
        }
        match i64::try_from(magnitude) {
            Ok(n) => Ok(Value::Int(n)),
            Err(_) => Ok(Value::Uint(magnitude)),
        }
    }

    /// Radix-prefixed and octal forms are unsigned unless negated.
    fn radix_carrier(
        &self,
        magnitude: u64,
        negative: bool,
        start: usize,
        loc: (u64, u64),
    ) -> Result<Value, Error> {
        if negative {
            self.negate(magnitude, start, loc)
        } else {
            Ok(Value::Uint(magnitude))
        }
    }

    #[allow(clippy::cast_possible_wrap)]
    fn negate(&self, magnitude: u64, start: usize, loc: (u64, u64)) -> Result<Value, Error> {
        const I64_MIN_MAGNITUDE: u64 = 1 << 63;
        if magnitude < I64_MIN_MAGNITUDE {
            Ok(Value::Int(-(magnitude as i64)))
        } else if magnitude == I64_MIN_MAGNITUDE {
            Ok(Value::Int(i64::MIN))
        } else {
            Err(self.overflow(start, loc))
        }
    }

    fn overflow(&self, start: usize, loc: (u64, u64)) -> Error {
        Error::Numeric {
            line: loc.0,
            col: loc.1,
            literal: String::from_utf8_lossy(&self.bytes[start..self.pos]).into_owned(),
        }
    }

    fn push_path_key(&mut self, key: &str) -> usize {
        if self.validator.is_none() {
            return 0;
        }
        let saved = self.path.len();
        self.path.push('/');
        self.path.push_str(key);
        saved
    }

    fn push_path_index(&mut self, index: usize) -> usize {
        if self.validator.is_none() {
            return 0;
        }
        let saved = self.path.len();
        let _ = write!(self.path, "/{index}");
        saved
    }

    fn truncate_path(&mut self, saved: usize) {
        if self.validator.is_some() {
            self.path.truncate(saved);
        }
    }
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_ident_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn is_radix_digit(b: u8, radix: u64) -> bool {
    match radix {
        2 => matches!(b, b'0' | b'1'),
        8 => matches!(b, b'0'..=b'7'),
        16 => b.is_ascii_hexdigit(),
        _ => b.is_ascii_digit(),
    }
}

fn digit_value(b: u8) -> u8 {
    match b {
        b'0'..=b'9' => b - b'0',
        b'a'..=b'f' => b - b'a' + 10,
        b'A'..=b'F' => b - b'A' + 10,
        _ => 0,
    }
}

fn printable(b: u8) -> String {
    if b.is_ascii_graphic() {
        char::from(b).to_string()
    } else {
        format!("0x{b:02x}")
    }
}

#[cfg(test)]
mod tests {
    use core::cell::RefCell;

    use super::*;

    fn parse_str(doc: &str) -> Result<Output, Error> {
        parse(&Input::from_bytes(doc.as_bytes()), &Control::default())
    }

    fn parse_with(doc: &str, ctrl: &Control) -> Result<Output, Error> {
        parse(&Input::from_bytes(doc.as_bytes()), ctrl)
    }

    #[test]
    fn simple_document_tree_and_stats() {
        let out = parse_str(r#"{"a":1,"b":[true,null,"x"]}"#).expect("parse");

        assert_eq!(out.root["a"], Value::Int(1));
        assert_eq!(out.root["b"].len(), 3);
        assert_eq!(out.root["b"][0], Value::Bool(true));
        assert_eq!(out.root["b"][1], Value::Null);
        assert_eq!(out.root["b"][2], Value::Str("x".into()));

        assert_eq!(out.stats.objects, 1);
        assert_eq!(out.stats.arrays, 1);
        assert_eq!(out.stats.ints, 1);
        assert_eq!(out.stats.bools, 1);
        assert_eq!(out.stats.nulls, 1);
        assert_eq!(out.stats.strings, 1);
        assert_eq!(out.stats.keys, 2);
        assert_eq!(out.stats.max_depth, 2);
        assert_eq!(out.stats.bytes, 27);
    }

    #[test]
    fn duplicate_key_reject_points_at_second_key() {
        let err = parse_str(r#"{"k":1,"k":2}"#).expect_err("must reject");
        match err {
            Error::DuplicateKey { line, col, key } => {
                assert_eq!((line, col), (1, 9));
                assert_eq!(key, "k");
            }
            other => panic!("expected DuplicateKey, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_key_accept_overwrites() {
        let ctrl = Control {
            dup_key: DupKey::Accept,
            ..Control::default()
        };
        let out = parse_with(r#"{"k":1,"k":2}"#, &ctrl).expect("parse");
        assert_eq!(out.root["k"], Value::Int(2));
        assert_eq!(out.root.len(), 1);
        assert_eq!(out.stats.keys, 1);
    }

    #[test]
    fn duplicate_key_ignore_keeps_first() {
        let ctrl = Control {
            dup_key: DupKey::Ignore,
            ..Control::default()
        };
        let out = parse_with(r#"{"k":1,"k":2}"#, &ctrl).expect("parse");
        assert_eq!(out.root["k"], Value::Int(1));
        assert_eq!(out.stats.keys, 1);
    }

    #[test]
    fn duplicate_key_append_keeps_both_in_order() {
        let ctrl = Control {
            dup_key: DupKey::Append,
            ..Control::default()
        };
        let out = parse_with(r#"{"k":1,"k":2}"#, &ctrl).expect("parse");

        let Value::Object(obj) = &out.root else {
            panic!("expected object root");
        };
        let entries: Vec<_> = obj.iter().collect();
        assert_eq!(
            entries,
            vec![("k", &Value::Int(1)), ("k", &Value::Int(2))]
        );
        assert_eq!(obj.get("k"), Some(&Value::Int(2)));
        assert_eq!(out.stats.keys, 2);
    }

    #[test]
    fn flexible_quoting_is_opt_in() {
        assert!(matches!(
            parse_str("{'a': 'b'}"),
            Err(Error::Syntax { .. })
        ));

        let ctrl = Control {
            allow_flexible_keys: true,
            allow_flexible_strings: true,
            ..Control::default()
        };
        let out = parse_with("{'a': 'b'}", &ctrl).expect("parse");
        assert_eq!(out.root["a"], Value::Str("b".into()));
    }

    #[test]
    fn unquoted_keys_under_flexible_mode() {
        let ctrl = Control {
            allow_flexible_keys: true,
            ..Control::default()
        };
        let out = parse_with(r#"{tag_1: "v"}"#, &ctrl).expect("parse");
        assert_eq!(out.root["tag_1"], Value::Str("v".into()));

        // Flexible strings alone do not unlock unquoted keys.
        let strings_only = Control {
            allow_flexible_strings: true,
            ..Control::default()
        };
        assert!(parse_with(r#"{tag: "v"}"#, &strings_only).is_err());
    }

    #[test]
    fn radix_prefixed_and_octal_integers() {
        let out = parse_str(r#"{"n": 0xFF, "m": 1e2}"#).expect("parse");
        assert!(out.root["n"].is_uint());
        assert_eq!(out.root["n"].as_u64(), Ok(255));
        assert_eq!(out.root["m"], Value::Double(100.0));

        let out = parse_str("[0b101, 0755, 0]").expect("parse");
        assert_eq!(out.root[0].as_u64(), Ok(5));
        assert_eq!(out.root[1].as_u64(), Ok(493));
        assert_eq!(out.root[2], Value::Int(0));

        // A leading-zero run with a non-octal digit reads as decimal.
        let out = parse_str("[09]").expect("parse");
        assert_eq!(out.root[0], Value::Int(9));

        let out = parse_str("[-0x10]").expect("parse");
        assert_eq!(out.root[0], Value::Int(-16));
    }

    #[test]
    fn numeric_promotion_follows_magnitude() {
        let out = parse_str("[9223372036854775807, 9223372036854775808]").expect("parse");
        assert_eq!(out.root[0], Value::Int(i64::MAX));
        assert!(out.root[1].is_uint());
        assert_eq!(out.root[1].as_u64(), Ok(9_223_372_036_854_775_808));

        let out = parse_str("[-9223372036854775808]").expect("parse");
        assert_eq!(out.root[0], Value::Int(i64::MIN));

        assert!(matches!(
            parse_str("[18446744073709551616]"),
            Err(Error::Numeric { .. })
        ));
        assert!(matches!(
            parse_str("[-9223372036854775809]"),
            Err(Error::Numeric { .. })
        ));
    }

    #[test]
    fn doubles_parse_fractions_and_exponents() {
        let out = parse_str("[1.5, -0.25, 2e-3, 1E+2]").expect("parse");
        assert_eq!(out.root[0], Value::Double(1.5));
        assert_eq!(out.root[1], Value::Double(-0.25));
        assert_eq!(out.root[2], Value::Double(0.002));
        assert_eq!(out.root[3], Value::Double(100.0));
        assert_eq!(out.stats.doubles, 4);
    }

    #[test]
    fn malformed_numbers_are_syntax_errors() {
        assert!(matches!(parse_str("[1.]"), Err(Error::Syntax { .. })));
        assert!(matches!(parse_str("[1e]"), Err(Error::Syntax { .. })));
        assert!(matches!(parse_str("[-]"), Err(Error::Syntax { .. })));
        assert!(matches!(parse_str("[0x]"), Err(Error::Syntax { .. })));
    }

    #[test]
    fn string_escapes_round_trip() {
        let out = parse_str(r#""line\nbreak""#).expect("parse");
        let Value::Str(s) = &out.root else {
            panic!("expected string root");
        };
        assert_eq!(s.len(), 10);
        assert_eq!(s.as_bytes()[4], b'\n');
        assert_eq!(out.root.to_str().expect("serialize"), r#""line\nbreak""#);
    }

    #[test]
    fn unicode_escapes_and_surrogate_pairs() {
        let out = parse_str(r#""\u0041\u00e9""#).expect("parse");
        assert_eq!(out.root, Value::Str("A\u{e9}".into()));

        let out = parse_str(r#""\uD83D\uDE00""#).expect("parse");
        assert_eq!(out.root, Value::Str("\u{1F600}".into()));

        // Raw multi-byte UTF-8 passes through untouched.
        let out = parse_str(r#""héllo""#).expect("parse");
        assert_eq!(out.root, Value::Str("héllo".into()));

        assert!(matches!(
            parse_str(r#""\uD83D""#),
            Err(Error::Syntax { .. })
        ));
        assert!(matches!(
            parse_str(r#""\uDE00""#),
            Err(Error::Syntax { .. })
        ));
        assert!(matches!(
            parse_str(r#""\uD83DA""#),
            Err(Error::Syntax { .. })
        ));
    }

    #[test]
    fn raw_control_bytes_are_rejected() {
        assert!(matches!(
            parse_str("\"a\nb\""),
            Err(Error::Syntax { .. })
        ));
        assert!(matches!(parse_str("\"open"), Err(Error::Syntax { .. })));
    }

    #[test]
    fn literals_match_strictly_by_default() {
        let out = parse_str("[true, false, null]").expect("parse");
        assert_eq!(out.root[0], Value::Bool(true));
        assert_eq!(out.root[1], Value::Bool(false));
        assert_eq!(out.root[2], Value::Null);

        assert!(parse_str("[True]").is_err());
        assert!(parse_str("[truex]").is_err());

        let ctrl = Control {
            allow_nocase_values: true,
            ..Control::default()
        };
        let out = parse_with("[True, FALSE, Null]", &ctrl).expect("parse");
        assert_eq!(out.root[0], Value::Bool(true));
        assert_eq!(out.root[1], Value::Bool(false));
        assert_eq!(out.root[2], Value::Null);
    }

    #[test]
    fn comments_are_trivia() {
        let doc = "// header\n{\"a\": /* inline */ 1, // trailing\n\"b\": 2}\n// footer";
        let out = parse_str(doc).expect("parse");
        assert_eq!(out.root["a"], Value::Int(1));
        assert_eq!(out.root["b"], Value::Int(2));

        assert!(matches!(
            parse_str("/* never closed"),
            Err(Error::Syntax { .. })
        ));
    }

    #[test]
    fn truncated_array_reports_expected_value() {
        let err = parse_str("[1,").expect_err("must fail");
        match err {
            Error::Syntax { line, col, reason } => {
                assert_eq!((line, col), (1, 4));
                assert_eq!(reason, "expected value or ']'");
            }
            other => panic!("expected Syntax, got {other:?}"),
        }
    }

    #[test]
    fn trailing_garbage_is_rejected() {
        let err = parse_str("{} extra").expect_err("must fail");
        match err {
            Error::Syntax { reason, .. } => {
                assert_eq!(reason, "trailing garbage after document");
            }
            other => panic!("expected Syntax, got {other:?}"),
        }
    }

    #[test]
    fn blank_input_is_rejected() {
        assert!(matches!(parse_str(""), Err(Error::Syntax { .. })));
        assert!(matches!(parse_str("  \n\t"), Err(Error::Syntax { .. })));
    }

    #[test]
    fn error_locations_track_newlines() {
        let err = parse_str("[\n1,\nx]").expect_err("must fail");
        assert_eq!(err.location(), Some((3, 1)));
    }

    #[test]
    fn nesting_beyond_the_bound_is_rejected() {
        let doc = "[".repeat(MAX_DEPTH + 1);
        let err = parse_str(&doc).expect_err("must fail");
        match err {
            Error::DepthExceeded { line, col, limit } => {
                assert_eq!(line, 1);
                assert_eq!(col, (MAX_DEPTH + 1) as u64);
                assert_eq!(limit, MAX_DEPTH);
            }
            other => panic!("expected DepthExceeded, got {other:?}"),
        }

        // One level inside the bound still parses.
        let ok = format!("{}{}", "[".repeat(MAX_DEPTH), "]".repeat(MAX_DEPTH));
        let out = parse_str(&ok).expect("parse");
        assert_eq!(out.stats.max_depth, MAX_DEPTH as u64);
    }

    struct PathRecorder {
        seen: RefCell<Vec<String>>,
    }

    impl Validate for PathRecorder {
        fn validate(&self, path: &str, _value: &Value) -> Result<(), String> {
            self.seen.borrow_mut().push(path.to_owned());
            Ok(())
        }
    }

    #[test]
    fn schema_hook_sees_every_value_with_its_path() {
        let recorder = PathRecorder {
            seen: RefCell::new(Vec::new()),
        };
        let input = Input::from_bytes(br#"{"a":1,"b":[true,null]}"#);
        parse_with_validator(&input, &Control::default(), &recorder).expect("parse");

        assert_eq!(
            *recorder.seen.borrow(),
            vec!["/a", "/b/0", "/b/1", "/b", ""]
        );
    }

    struct RejectBools;

    impl Validate for RejectBools {
        fn validate(&self, _path: &str, value: &Value) -> Result<(), String> {
            if value.is_bool() {
                Err("booleans are not allowed here".to_owned())
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn schema_hook_rejection_aborts_the_parse() {
        let input = Input::from_bytes(br#"{"flag":true}"#);
        let err = parse_with_validator(&input, &Control::default(), &RejectBools)
            .expect_err("must fail");
        match err {
            Error::Schema { path, reason } => {
                assert_eq!(path, "/flag");
                assert_eq!(reason, "booleans are not allowed here");
            }
            other => panic!("expected Schema, got {other:?}"),
        }
    }
}
