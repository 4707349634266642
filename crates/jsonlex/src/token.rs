//! Token model: typed views of lexical units with lazy interpretation.

#![allow(clippy::cast_possible_truncation)]

use std::{
    borrow::Cow,
    num::{ParseFloatError, ParseIntError},
    str::Chars,
};

use crate::escape::UnicodeEscapeBuffer;

/// Placeholder substituted for escapes that cannot be decoded.
const PLACEHOLDER: char = '?';

/// The lexical category of a [`Token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// A single structural character: `{` `}` `[` `]` `:` `,` `=`.
    Symbol,
    /// A maximal run of letters, digits, `_` and `.` not lexed as a number;
    /// carries the JSON keywords `null`, `true` and `false`.
    BareWord,
    /// A JSON number, validated against the number grammar during lexing.
    Number,
    /// A string literal. The raw text includes both surrounding quotes;
    /// decoding is a separate, explicit operation.
    StringLiteral,
}

/// One lexical unit of a JSON stream.
///
/// The text is a borrowed view into the tokenizer's window in the common
/// case, and an owned copy only when the token crossed a window boundary.
/// The borrow ties the token to the tokenizer, so a token cannot outlive the
/// scan that would overwrite its text; use [`Token::into_owned`] to retain
/// one.
///
/// Interpretation is lazy: classification methods compare the raw text, and
/// the numeric accessors parse on demand.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token<'a> {
    kind: TokenKind,
    text: Cow<'a, str>,
    line: usize,
    column: usize,
}

impl<'a> Token<'a> {
    pub(crate) fn new(kind: TokenKind, text: Cow<'a, str>, line: usize, column: usize) -> Self {
        Self {
            kind,
            text,
            line,
            column,
        }
    }

    /// The lexical category.
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// The raw token text. For string literals this includes both quotes.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// 1-based line of the token's first character.
    pub fn line(&self) -> usize {
        self.line
    }

    /// 1-based column of the token's first character.
    pub fn column(&self) -> usize {
        self.column
    }

    /// Detaches the token from the tokenizer's buffer for retention.
    pub fn into_owned(self) -> Token<'static> {
        Token {
            kind: self.kind,
            text: Cow::Owned(self.text.into_owned()),
            line: self.line,
            column: self.column,
        }
    }

    /// Whether the token is a structural character.
    pub fn is_symbol(&self) -> bool {
        self.kind == TokenKind::Symbol
    }

    /// The structural character, for `Symbol` tokens.
    pub fn symbol(&self) -> Option<char> {
        if self.is_symbol() {
            self.text.chars().next()
        } else {
            None
        }
    }

    /// Whether the token is the keyword `null`. Case-sensitive; any other
    /// bare word is not null.
    pub fn is_null(&self) -> bool {
        self.kind == TokenKind::BareWord && self.text == "null"
    }

    /// Whether the token is the keyword `true` or `false`.
    pub fn is_boolean(&self) -> bool {
        self.kind == TokenKind::BareWord && (self.text == "true" || self.text == "false")
    }

    /// `true` exactly when the token is the keyword `true`.
    pub fn boolean_value(&self) -> bool {
        self.kind == TokenKind::BareWord && self.text == "true"
    }

    /// Whether the token is a number with neither fraction nor exponent.
    pub fn is_integer(&self) -> bool {
        self.kind == TokenKind::Number && !self.text.contains(['.', 'e', 'E'])
    }

    /// Whether the token is a number of any shape.
    pub fn is_real(&self) -> bool {
        self.kind == TokenKind::Number
    }

    /// Parses the token text as `i64`. Overflow and non-integer text
    /// surface as `Err`.
    pub fn i64_value(&self) -> Result<i64, ParseIntError> {
        self.text.parse()
    }

    /// The `i64` value narrowed to `i32`, truncating two's-complement style
    /// without a separate bounds check.
    pub fn i32_value(&self) -> Result<i32, ParseIntError> {
        Ok(self.i64_value()? as i32)
    }

    /// The `i64` value narrowed to `i16`, truncating two's-complement style
    /// without a separate bounds check.
    pub fn i16_value(&self) -> Result<i16, ParseIntError> {
        Ok(self.i64_value()? as i16)
    }

    /// The `i64` value narrowed to `i8`, truncating two's-complement style
    /// without a separate bounds check.
    pub fn i8_value(&self) -> Result<i8, ParseIntError> {
        Ok(self.i64_value()? as i8)
    }

    /// Parses the token text as `f64`.
    pub fn f64_value(&self) -> Result<f64, ParseFloatError> {
        self.text.parse()
    }

    /// Decodes a string literal: strips the surrounding quotes and processes
    /// backslash escapes, including `\uXXXX` with UTF-16 surrogate pairing.
    ///
    /// Decoding is total: an unrecognized escape character, malformed or
    /// incomplete hex digits, and unpaired surrogate halves each become a
    /// single `?` and decoding continues.
    pub fn decode_json_literal(&self) -> String {
        let raw = self.text.as_ref();
        let body = raw.strip_prefix('"').unwrap_or(raw);
        let body = body.strip_suffix('"').unwrap_or(body);
        decode_literal_body(body)
    }
}

fn decode_literal_body(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some('/') => out.push('/'),
            Some('b') => out.push('\u{0008}'),
            Some('f') => out.push('\u{000C}'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('u') => match decode_unicode_escape(&mut chars) {
                Some(decoded) => out.push(decoded),
                None => out.push(PLACEHOLDER),
            },
            // Unknown escape or a dangling backslash.
            Some(_) | None => out.push(PLACEHOLDER),
        }
    }
    out
}

/// Decodes the four hex digits following `\u`, pairing a high surrogate with
/// an immediately following `\uXXXX` low half. `None` when the digits are
/// missing or malformed, or when a surrogate half stands alone; the full
/// escape width is consumed either way.
fn decode_unicode_escape(chars: &mut Chars<'_>) -> Option<char> {
    let unit = read_code_unit(chars)?;
    if let 0xD800..=0xDBFF = unit {
        let mut ahead = chars.clone();
        if ahead.next() == Some('\\') && ahead.next() == Some('u') {
            if let Some(low @ 0xDC00..=0xDFFF) = read_code_unit(&mut ahead) {
                *chars = ahead;
                let combined =
                    0x10000 + ((u32::from(unit) - 0xD800) << 10) + (u32::from(low) - 0xDC00);
                return char::from_u32(combined);
            }
        }
        return None;
    }
    if (0xDC00..=0xDFFF).contains(&unit) {
        return None;
    }
    char::from_u32(u32::from(unit))
}

/// Consumes up to four characters as hex digits of one escape. `None` when
/// the input ends early or any digit is not hex; invalid digits do not stop
/// consumption, matching the decoder's lossy recovery.
fn read_code_unit(chars: &mut Chars<'_>) -> Option<u16> {
    let mut escape = UnicodeEscapeBuffer::new();
    let mut unit = None;
    for _ in 0..4 {
        match escape.feed(chars.next()?) {
            Ok(done) => unit = done,
            Err(_) => unit = None,
        }
    }
    unit
}
