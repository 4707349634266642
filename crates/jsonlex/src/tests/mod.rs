mod literals;
mod long_lines;
mod lookahead;

use crate::{Tokenizer, TokenizerError};

pub(crate) fn lexer(doc: &str) -> Tokenizer<&[u8]> {
    Tokenizer::new(doc.as_bytes())
}

pub(crate) fn assert_err_contains(
    err: &TokenizerError,
    expected_sub: &str,
    line: usize,
    column: usize,
) {
    let rendered = err.to_string();
    assert!(
        rendered.contains(expected_sub),
        "expected substring {expected_sub:?} in {rendered:?}"
    );
    assert_eq!(err.line(), line, "line of {rendered:?}");
    assert_eq!(err.column(), column, "column of {rendered:?}");
}
