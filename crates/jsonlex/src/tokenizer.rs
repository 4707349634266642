//! The streaming tokenizer: grammar state machines and the one-token
//! lookahead protocol.
//!
//! Scanning is driven by a single character of lookahead (`Look`). Token
//! text is captured as a borrowed span of the line window for as long as
//! possible and spilled into owned storage exactly when the window is about
//! to turn over, so the hot path stays zero-copy while tokens longer than
//! the window remain correct.

use std::borrow::Cow;
use std::io::Read;

use crate::{
    error::{ErrorKind, TokenizerError},
    line_buffer::{CharAt, LineBuffer},
    options::TokenizerOptions,
    token::{Token, TokenKind},
};

type Result<T> = std::result::Result<T, TokenizerError>;

/// Single-character lookahead cell.
#[derive(Debug, Clone, Copy)]
enum Look {
    /// No character in flight; the next read pulls from the window.
    Consumed,
    Char(CharAt),
    Eof,
}

/// A scanned token before it is surfaced to the caller: text as a window
/// span when the token never crossed a window boundary, owned otherwise.
#[derive(Debug)]
struct Scanned {
    kind: TokenKind,
    text: RawText,
    line: usize,
    column: usize,
}

#[derive(Debug)]
enum RawText {
    Span { start: usize, end: usize },
    Owned(String),
}

/// Accumulates a token's text: a borrowed window span until the window is
/// about to be overwritten, an owned string after.
struct Capture {
    start: usize,
    end: usize,
    spilled: Option<String>,
}

impl Capture {
    /// An empty capture anchored at the given window offset.
    fn at(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
            spilled: None,
        }
    }

    /// Accepts one character into the capture.
    fn push(&mut self, c: CharAt) {
        debug_assert_eq!(c.offset, self.end, "token characters are window-contiguous");
        self.end = c.offset + c.len as usize;
    }

    /// Moves the pending span into owned storage; called right before the
    /// window turns over and invalidates the span's bytes.
    fn spill<R: Read>(&mut self, buffer: &LineBuffer<R>) {
        let text = self.spilled.get_or_insert_with(String::new);
        text.push_str(buffer.slice(self.start, self.end));
        self.start = 0;
        self.end = 0;
    }

    /// The text captured so far, as an owned copy. Error paths only.
    fn materialize<R: Read>(&self, buffer: &LineBuffer<R>) -> String {
        match &self.spilled {
            None => buffer.slice(self.start, self.end).to_string(),
            Some(text) => {
                let mut out = text.clone();
                out.push_str(buffer.slice(self.start, self.end));
                out
            }
        }
    }

    fn finish<R: Read>(self, buffer: &LineBuffer<R>) -> RawText {
        match self.spilled {
            None => RawText::Span {
                start: self.start,
                end: self.end,
            },
            Some(mut text) => {
                text.push_str(buffer.slice(self.start, self.end));
                RawText::Owned(text)
            }
        }
    }
}

fn is_bare_word_char(ch: char) -> bool {
    matches!(ch, 'a'..='z' | 'A'..='Z' | '0'..='9' | '_' | '.')
}

/// Streaming JSON tokenizer.
///
/// Reads from any [`Read`] source and produces one [`Token`] at a time, with
/// a single token of pushback so callers can [`peek`](Self::peek) and
/// [`expect`](Self::expect) without consuming. The tokenizer performs no
/// document-level validation; it only accepts JSON-formatted tokens.
///
/// Consecutive top-level JSON values on one stream must be separated by
/// newlines. A single value may spread over any number of lines, except that
/// string literals cannot contain a raw newline.
pub struct Tokenizer<R> {
    buffer: LineBuffer<R>,
    look: Look,
    pending: Option<Scanned>,
}

impl<R: Read> Tokenizer<R> {
    /// Creates a tokenizer with the default window size.
    pub fn new(source: R) -> Self {
        Self::with_options(source, TokenizerOptions::default())
    }

    /// Creates a tokenizer with explicit options.
    pub fn with_options(source: R, options: TokenizerOptions) -> Self {
        Self {
            buffer: LineBuffer::new(source, options.buffer_size),
            look: Look::Consumed,
            pending: None,
        }
    }

    /// Consumes the tokenizer, returning the underlying source. Buffered but
    /// unconsumed input is discarded.
    pub fn into_inner(self) -> R {
        self.buffer.into_inner()
    }

    /// 1-based line of the most recently read character.
    pub fn line(&self) -> usize {
        self.buffer.line()
    }

    /// 1-based column of the most recently read character.
    pub fn column(&self) -> usize {
        self.buffer.column()
    }

    /// Best-effort text of the current source line, for diagnostics. Empty
    /// when the window no longer holds the line from its start.
    pub fn last_line(&self) -> &str {
        self.buffer.last_line()
    }

    /// Whether another token is available before end of stream. Idempotent:
    /// the scanned token is buffered and repeated calls do not advance.
    pub fn has_next(&mut self) -> Result<bool> {
        if self.pending.is_none() {
            self.pending = self.scan()?;
        }
        Ok(self.pending.is_some())
    }

    /// Returns the next token, or `None` at a clean end of stream.
    pub fn next_token(&mut self) -> Result<Option<Token<'_>>> {
        if !self.has_next()? {
            return Ok(None);
        }
        Ok(Some(self.consume_pending()))
    }

    /// Returns the next token without consuming it.
    pub fn peek(&mut self, context: &str) -> Result<Token<'_>> {
        if !self.has_next()? {
            return Err(self.past_end_error(ErrorKind::UnexpectedEndOfStream(context.to_string())));
        }
        match &self.pending {
            Some(scanned) => Ok(self.pending_token(scanned)),
            None => unreachable!("has_next buffered a token"),
        }
    }

    /// Consumes and returns the next token of any kind.
    pub fn expect(&mut self, context: &str) -> Result<Token<'_>> {
        if !self.has_next()? {
            return Err(self.past_end_error(ErrorKind::UnexpectedEndOfStream(context.to_string())));
        }
        Ok(self.consume_pending())
    }

    /// Consumes the next token, requiring a string literal.
    pub fn expect_string(&mut self, context: &str) -> Result<Token<'_>> {
        self.expect_kind(context, "string literal", TokenKind::StringLiteral)
    }

    /// Consumes the next token, requiring a number.
    pub fn expect_number(&mut self, context: &str) -> Result<Token<'_>> {
        self.expect_kind(context, "number", TokenKind::Number)
    }

    fn expect_kind(&mut self, context: &str, wanted: &str, kind: TokenKind) -> Result<Token<'_>> {
        if !self.has_next()? {
            return Err(self.past_end_error(ErrorKind::UnexpectedEndOfStream(format!(
                "{context} ({wanted})"
            ))));
        }
        if self.pending.as_ref().map(|scanned| scanned.kind) != Some(kind) {
            return Err(self.mismatch(format!("{context} ({wanted})")));
        }
        Ok(self.consume_pending())
    }

    /// Consumes the next token, requiring one of the given symbol
    /// characters, and returns the matched symbol.
    ///
    /// # Panics
    ///
    /// If `symbols` is empty.
    pub fn expect_symbol(&mut self, context: &str, symbols: &[char]) -> Result<char> {
        assert!(!symbols.is_empty(), "no symbols to match");
        let expected = || {
            if let [only] = symbols {
                format!("{context} ('{only}')")
            } else {
                let list = symbols
                    .iter()
                    .map(char::to_string)
                    .collect::<Vec<_>>()
                    .join("', '");
                format!("{context} (one of ['{list}'])")
            }
        };
        if !self.has_next()? {
            return Err(self.past_end_error(ErrorKind::UnexpectedEndOfStream(expected())));
        }
        let matched = match &self.pending {
            Some(scanned) if scanned.kind == TokenKind::Symbol => self
                .pending_text(scanned)
                .chars()
                .next()
                .filter(|ch| symbols.contains(ch)),
            _ => None,
        };
        match matched {
            Some(ch) => {
                self.pending = None;
                Ok(ch)
            }
            None => Err(self.mismatch(expected())),
        }
    }

    /// Returns the remainder of the current line, leading and trailing
    /// whitespace trimmed. Handy for trailing-garbage checks after a
    /// top-level value. A token already buffered by [`has_next`](Self::has_next)
    /// stays buffered and is not part of the remainder.
    pub fn rest_of_line(&mut self) -> Result<String> {
        // The window may move while the rest of the line is read; a buffered
        // span must not be left pointing into it.
        if let Some(pending) = &mut self.pending {
            if let RawText::Span { start, end } = pending.text {
                pending.text = RawText::Owned(self.buffer.slice(start, end).to_string());
            }
        }
        let mut rest = String::new();
        loop {
            if matches!(self.look, Look::Consumed) {
                self.read_char()?;
            }
            match self.look {
                Look::Eof => break,
                Look::Char(c) => {
                    self.look = Look::Consumed;
                    if c.ch == '\n' {
                        break;
                    }
                    rest.push(c.ch);
                }
                Look::Consumed => unreachable!("read_char sets a character or end of stream"),
            }
        }
        Ok(rest.trim().to_string())
    }

    // --- scanning ---

    /// Scans the next token from the stream, skipping insignificant
    /// whitespace. `Ok(None)` at a clean end of stream.
    fn scan(&mut self) -> Result<Option<Scanned>> {
        loop {
            let c = match self.look {
                Look::Consumed => match self.read_char()? {
                    Look::Char(c) => c,
                    _ => return Ok(None),
                },
                Look::Char(c) => c,
                Look::Eof => return Ok(None),
            };
            match c.ch {
                ' ' | '\t' | '\r' | '\n' => self.look = Look::Consumed,
                '"' => return self.scan_string(c).map(Some),
                '-' | '0'..='9' => return self.scan_number(c).map(Some),
                '{' | '}' | '[' | ']' | ':' | ',' | '=' => {
                    self.look = Look::Consumed;
                    return Ok(Some(Scanned {
                        kind: TokenKind::Symbol,
                        text: RawText::Span {
                            start: c.offset,
                            end: c.offset + c.len as usize,
                        },
                        line: c.line,
                        column: c.column,
                    }));
                }
                'a'..='z' | 'A'..='Z' | '_' | '.' => return self.scan_bare_word(c).map(Some),
                ch => {
                    return Err(self.error_at(ErrorKind::IllegalCharacter(ch), c.line, c.column));
                }
            }
        }
    }

    fn scan_bare_word(&mut self, first: CharAt) -> Result<Scanned> {
        let first = self.enter_token(first)?;
        let mut capture = Capture::at(first.offset);
        let mut cur = first;
        loop {
            match self.accept(cur, &mut capture)? {
                Look::Char(c) if is_bare_word_char(c.ch) => cur = c,
                _ => break,
            }
        }
        Ok(Scanned {
            kind: TokenKind::BareWord,
            text: capture.finish(&self.buffer),
            line: first.line,
            column: first.column,
        })
    }

    fn scan_number(&mut self, first: CharAt) -> Result<Scanned> {
        let first = self.enter_token(first)?;
        let (line, column) = (first.line, first.column);
        let mut capture = Capture::at(first.offset);

        if first.ch == '-' {
            // Only base-10 decimals can be negative.
            match self.accept(first, &mut capture)? {
                Look::Char(c) if c.ch == '.' || c.ch.is_ascii_digit() => {}
                Look::Char(c) => {
                    return Err(self.error_at(
                        ErrorKind::MalformedNumber("no number after negative indicator".to_string()),
                        c.line,
                        c.column,
                    ));
                }
                _ => {
                    return Err(self.past_end_error(ErrorKind::MalformedNumber(
                        "negative indicator without number".to_string(),
                    )));
                }
            }
        }

        // Integer part.
        while let Look::Char(c) = self.look {
            if !c.ch.is_ascii_digit() {
                break;
            }
            self.accept(c, &mut capture)?;
        }
        // Fraction part; the digit run after the dot may be empty.
        if let Look::Char(c) = self.look {
            if c.ch == '.' {
                if let Look::Char(_) = self.accept(c, &mut capture)? {
                    while let Look::Char(d) = self.look {
                        if !d.ch.is_ascii_digit() {
                            break;
                        }
                        self.accept(d, &mut capture)?;
                    }
                }
            }
        }
        // Exponent part.
        if let Look::Char(c) = self.look {
            if c.ch == 'e' || c.ch == 'E' {
                if !matches!(self.accept(c, &mut capture)?, Look::Char(_)) {
                    let text = capture.materialize(&self.buffer);
                    return Err(self.past_end_error(ErrorKind::MalformedNumber(format!(
                        "badly terminated JSON exponent: '{text}'"
                    ))));
                }
                if let Look::Char(sign) = self.look {
                    if sign.ch == '+' || sign.ch == '-' {
                        self.accept(sign, &mut capture)?;
                    }
                }
                while let Look::Char(d) = self.look {
                    if !d.ch.is_ascii_digit() {
                        break;
                    }
                    self.accept(d, &mut capture)?;
                }
            }
        }

        // A number must be terminated by end of stream, whitespace, or a
        // symbol that may follow a value.
        match self.look {
            Look::Eof => {}
            Look::Char(c) if matches!(c.ch, ',' | '}' | ']' | ' ' | '\t' | '\n' | '\r') => {}
            Look::Char(c) => {
                let mut text = capture.materialize(&self.buffer);
                text.push(c.ch);
                return Err(self.error_at(
                    ErrorKind::MalformedNumber(format!(
                        "wrongly terminated JSON number: '{text}'"
                    )),
                    c.line,
                    c.column,
                ));
            }
            Look::Consumed => unreachable!("the lookahead always holds the terminator here"),
        }
        Ok(Scanned {
            kind: TokenKind::Number,
            text: capture.finish(&self.buffer),
            line,
            column,
        })
    }

    fn scan_string(&mut self, first: CharAt) -> Result<Scanned> {
        let first = self.enter_token(first)?;
        let (line, column) = (first.line, first.column);
        let mut capture = Capture::at(first.offset);
        capture.push(first);
        self.look = Look::Consumed;

        let mut escaped = false;
        loop {
            let c = match self.next_in_token(&mut capture)? {
                Look::Char(c) => c,
                _ => {
                    return Err(self.past_end_error(ErrorKind::MalformedString(
                        "unexpected end of stream in string literal",
                    )));
                }
            };
            if !escaped && c.ch == '\n' {
                return Err(self.error_at(
                    ErrorKind::MalformedString("unexpected newline in string literal"),
                    c.line,
                    c.column,
                ));
            }
            capture.push(c);
            self.look = Look::Consumed;
            if escaped {
                escaped = false;
            } else if c.ch == '\\' {
                escaped = true;
            } else if c.ch == '"' {
                break;
            }
        }
        Ok(Scanned {
            kind: TokenKind::StringLiteral,
            text: capture.finish(&self.buffer),
            line,
            column,
        })
    }

    /// Consolidation entry point for the multi-character machines: may slide
    /// the window, and returns the first character rebased to its new
    /// offset.
    fn enter_token(&mut self, mut first: CharAt) -> Result<CharAt> {
        let delta = match self.buffer.maybe_consolidate(first.offset) {
            Ok(delta) => delta,
            Err(err) => return Err(self.error(ErrorKind::Io(err))),
        };
        if delta > 0 {
            first.offset -= delta;
            self.look = Look::Char(first);
        }
        Ok(first)
    }

    /// Accepts the character into the capture and reads the one after it.
    fn accept(&mut self, c: CharAt, capture: &mut Capture) -> Result<Look> {
        capture.push(c);
        self.look = Look::Consumed;
        self.next_in_token(capture)
    }

    /// Reads the next character, spilling the capture first if the window is
    /// about to turn over under it.
    fn next_in_token(&mut self, capture: &mut Capture) -> Result<Look> {
        if self.buffer.exhausted() {
            capture.spill(&self.buffer);
        }
        self.read_char()
    }

    /// Pulls one character from the window into the lookahead cell.
    fn read_char(&mut self) -> Result<Look> {
        let next = match self.buffer.next_char() {
            Ok(next) => next,
            Err(err) => return Err(self.error(ErrorKind::Io(err))),
        };
        self.look = match next {
            Some(c) => Look::Char(c),
            None => Look::Eof,
        };
        Ok(self.look)
    }

    // --- surfacing tokens ---

    fn consume_pending(&mut self) -> Token<'_> {
        match self.pending.take() {
            Some(scanned) => {
                let text = match scanned.text {
                    RawText::Span { start, end } => Cow::Borrowed(self.buffer.slice(start, end)),
                    RawText::Owned(text) => Cow::Owned(text),
                };
                Token::new(scanned.kind, text, scanned.line, scanned.column)
            }
            None => unreachable!("a token was buffered by has_next"),
        }
    }

    fn pending_token<'s>(&'s self, scanned: &'s Scanned) -> Token<'s> {
        Token::new(
            scanned.kind,
            Cow::Borrowed(self.pending_text(scanned)),
            scanned.line,
            scanned.column,
        )
    }

    fn pending_text<'s>(&'s self, scanned: &'s Scanned) -> &'s str {
        match &scanned.text {
            RawText::Span { start, end } => self.buffer.slice(*start, *end),
            RawText::Owned(text) => text,
        }
    }

    // --- diagnostics ---

    fn last_line_opt(&self) -> Option<String> {
        let line = self.buffer.last_line();
        (!line.is_empty()).then(|| line.to_string())
    }

    /// An error at the current read position.
    fn error(&self, kind: ErrorKind) -> TokenizerError {
        self.error_at(kind, self.buffer.line(), self.buffer.column())
    }

    /// An error just past the last character; used for end-of-stream
    /// reports.
    fn past_end_error(&self, kind: ErrorKind) -> TokenizerError {
        self.error_at(kind, self.buffer.line(), self.buffer.column() + 1)
    }

    /// An error at an explicit position, with a best-effort source line.
    fn error_at(&self, kind: ErrorKind, line: usize, column: usize) -> TokenizerError {
        TokenizerError::new(kind, line, column, self.last_line_opt())
    }

    /// A mismatch error against the buffered token, reported at the token's
    /// own position.
    fn mismatch(&self, expected: String) -> TokenizerError {
        match &self.pending {
            Some(scanned) => {
                let found = self.pending_text(scanned).to_string();
                self.error_at(
                    ErrorKind::TokenMismatch { expected, found },
                    scanned.line,
                    scanned.column,
                )
            }
            None => unreachable!("mismatch is only raised against a buffered token"),
        }
    }
}

impl<R> std::fmt::Debug for Tokenizer<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tokenizer")
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}
