use super::lexer;
use crate::ErrorKind;

#[test]
fn has_next_is_idempotent() {
    let mut lexer = lexer("true");
    assert!(lexer.has_next().unwrap());
    assert!(lexer.has_next().unwrap());
    let token = lexer.next_token().unwrap().unwrap();
    assert_eq!(token.text(), "true");
    assert!(!lexer.has_next().unwrap());
    assert!(!lexer.has_next().unwrap());
    assert!(lexer.next_token().unwrap().is_none());
}

#[test]
fn peek_does_not_consume() {
    let mut lexer = lexer("[1]");
    assert_eq!(lexer.peek("start").unwrap().symbol(), Some('['));
    assert_eq!(lexer.peek("start").unwrap().symbol(), Some('['));
    assert_eq!(lexer.expect_symbol("start", &['[']).unwrap(), '[');
    assert_eq!(lexer.peek("element").unwrap().text(), "1");
    let token = lexer.expect_number("element").unwrap();
    assert_eq!(token.i64_value().unwrap(), 1);
}

#[test]
fn peek_at_end_of_stream_fails() {
    let mut lexer = lexer("  ");
    let err = lexer.peek("value").unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::UnexpectedEndOfStream(_)));
}

#[test]
fn rest_of_line_returns_trailing_content_trimmed() {
    let mut lexer = lexer("[1]  trailing garbage here  \nnext");
    lexer.expect_symbol("start", &['[']).unwrap();
    lexer.expect_number("element").unwrap();
    lexer.expect_symbol("end", &[']']).unwrap();
    assert_eq!(lexer.rest_of_line().unwrap(), "trailing garbage here");
    let token = lexer.expect("next line").unwrap();
    assert_eq!(token.text(), "next");
    assert_eq!(token.line(), 2);
}

#[test]
fn rest_of_line_preserves_a_buffered_token() {
    let mut lexer = lexer("value extra stuff\n");
    assert!(lexer.has_next().unwrap());
    assert_eq!(lexer.rest_of_line().unwrap(), "extra stuff");
    let token = lexer.expect("buffered").unwrap();
    assert_eq!(token.text(), "value");
}

#[test]
fn rest_of_line_at_end_of_stream_is_empty() {
    let mut lexer = lexer("last");
    lexer.expect("value").unwrap();
    assert_eq!(lexer.rest_of_line().unwrap(), "");
}

#[test]
fn tokens_can_be_retained_as_owned() {
    let retained = {
        let mut lexer = lexer("\"keep me\"");
        lexer.expect_string("value").unwrap().into_owned()
    };
    assert_eq!(retained.decode_json_literal(), "keep me");
}
