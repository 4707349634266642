use std::{fmt, io};

use thiserror::Error;

/// Error raised while tokenizing a JSON stream.
///
/// Carries the 1-based line and column of the offending position and, when
/// the internal window still holds the current line, the line text itself.
/// The plain [`Display`](fmt::Display) form is a single line; the alternate
/// form (`{:#}`) appends the source line with a column marker:
///
/// ```text
/// wrongly terminated JSON number: '12x' at 1:9
/// {"a": 12x4}
///         ^
/// ```
#[derive(Debug)]
pub struct TokenizerError {
    kind: ErrorKind,
    line: usize,
    column: usize,
    source_line: Option<String>,
}

impl TokenizerError {
    pub(crate) fn new(
        kind: ErrorKind,
        line: usize,
        column: usize,
        source_line: Option<String>,
    ) -> Self {
        Self {
            kind,
            line,
            column,
            source_line,
        }
    }

    /// What went wrong.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// 1-based line of the offending position.
    pub fn line(&self) -> usize {
        self.line
    }

    /// 1-based column of the offending position.
    pub fn column(&self) -> usize {
        self.column
    }

    /// Best-effort text of the offending source line. `None` when the line
    /// was no longer in the tokenizer's window at the time of the error.
    pub fn source_line(&self) -> Option<&str> {
        self.source_line.as_deref()
    }
}

impl fmt::Display for TokenizerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}:{}", self.kind, self.line, self.column)?;
        if f.alternate() {
            if let Some(source_line) = &self.source_line {
                write!(f, "\n{source_line}\n{:>width$}", '^', width = self.column)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for TokenizerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            ErrorKind::Io(err) => Some(err),
            _ => None,
        }
    }
}

fn codepoint(c: &char) -> u32 {
    *c as u32
}

/// The failure taxonomy of the tokenizer.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// A raw control or non-ASCII character appeared outside a string
    /// literal, or a printable character with no role in the token grammar.
    #[error("illegal character in JSON structure: '\\u{:04x}'", codepoint(.0))]
    IllegalCharacter(char),
    /// The number grammar was violated, or a number was improperly
    /// terminated. The message cites the offending partial text.
    #[error("{0}")]
    MalformedNumber(String),
    /// An unterminated string literal, or a raw newline inside one.
    #[error("{0}")]
    MalformedString(&'static str),
    /// An `expect*` call found no further tokens.
    #[error("expected {0}: got end of stream")]
    UnexpectedEndOfStream(String),
    /// The next token did not satisfy an `expect*` call's constraint.
    #[error("expected {expected}: but found '{found}'")]
    TokenMismatch {
        /// Description of what was requested, including the caller context.
        expected: String,
        /// Raw text of the token that was found instead.
        found: String,
    },
    /// The underlying character source failed.
    #[error(transparent)]
    Io(#[from] io::Error),
}
