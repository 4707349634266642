use super::lexer;
use crate::{Tokenizer, TokenizerOptions};

#[test]
fn ten_thousand_char_literal_in_default_window() {
    let body = "a".repeat(10_000);
    let doc = format!("\"{body}\"");
    let mut lexer = lexer(&doc);
    let token = lexer.expect_string("value").unwrap();
    assert_eq!(token.decode_json_literal(), body);
    assert_eq!((token.line(), token.column()), (1, 1));
    assert!(!lexer.has_next().unwrap());
}

#[test]
fn long_literal_in_a_tiny_window_with_multibyte_text() {
    let body = "é↓β".repeat(100);
    let doc = format!("\"{body}\"");
    let mut lexer = Tokenizer::with_options(doc.as_bytes(), TokenizerOptions { buffer_size: 32 });
    assert_eq!(
        lexer.expect_string("value").unwrap().decode_json_literal(),
        body
    );
}

#[test]
fn long_bare_word_survives_window_turnover() {
    let word = "x".repeat(200);
    let mut lexer = Tokenizer::with_options(word.as_bytes(), TokenizerOptions { buffer_size: 32 });
    let token = lexer.expect("value").unwrap();
    assert_eq!(token.text(), word);
}

#[test]
fn number_spanning_a_window_turnover_is_captured_whole() {
    let digits = "123456789012345678901234567890123456789";
    let mut lexer =
        Tokenizer::with_options(digits.as_bytes(), TokenizerOptions { buffer_size: 32 });
    let token = lexer.expect_number("value").unwrap();
    assert_eq!(token.text(), digits);
    assert!(token.i64_value().is_err());
}

#[test]
fn token_near_the_tail_of_a_full_line_stays_contiguous() {
    // The first line exactly fills the window and the keyword starts inside
    // the consolidation margin.
    let doc = format!("{}true\nfalse\n", " ".repeat(123));
    let mut lexer = Tokenizer::with_options(doc.as_bytes(), TokenizerOptions { buffer_size: 128 });
    let token = lexer.expect("first value").unwrap();
    assert_eq!(token.text(), "true");
    assert_eq!((token.line(), token.column()), (1, 124));
    // Consolidation slid the window away from the line start.
    assert_eq!(lexer.last_line(), "");
    let token = lexer.expect("second value").unwrap();
    assert_eq!(token.text(), "false");
    assert_eq!((token.line(), token.column()), (2, 1));
    assert!(!lexer.has_next().unwrap());
}

#[test]
fn error_on_a_line_longer_than_the_window_omits_the_line_text() {
    let doc = format!("{}12x", "[".repeat(60));
    let mut lexer = Tokenizer::with_options(doc.as_bytes(), TokenizerOptions { buffer_size: 32 });
    for _ in 0..60 {
        lexer.expect_symbol("nesting", &['[']).unwrap();
    }
    let err = lexer.expect_number("value").unwrap_err();
    assert_eq!(err.source_line(), None);
    assert_eq!((err.line(), err.column()), (1, 63));
}

#[test]
fn error_on_a_short_line_reproduces_the_line_text() {
    let mut lexer = lexer("[\n12x\n]");
    lexer.expect_symbol("list start", &['[']).unwrap();
    let err = lexer.expect_number("element").unwrap_err();
    assert_eq!(err.source_line(), Some("12x"));
    assert_eq!((err.line(), err.column()), (2, 3));
}
