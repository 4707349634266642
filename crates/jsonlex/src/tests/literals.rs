use rstest::rstest;

use super::lexer;
use crate::TokenKind;

#[test]
fn raw_text_keeps_the_quotes() {
    let mut lexer = lexer(r#""abc""#);
    let token = lexer.expect_string("value").unwrap();
    assert_eq!(token.kind(), TokenKind::StringLiteral);
    assert_eq!(token.text(), r#""abc""#);
    assert_eq!(token.decode_json_literal(), "abc");
}

#[test]
fn empty_literal() {
    let mut lexer = lexer(r#""""#);
    assert_eq!(lexer.expect_string("value").unwrap().decode_json_literal(), "");
}

#[test]
fn decodes_simple_escapes() {
    let mut lexer = lexer(r#""\n\t\"end""#);
    let token = lexer.expect_string("value").unwrap();
    assert_eq!(token.decode_json_literal(), "\n\t\"end");
}

#[test]
fn decodes_the_full_escape_table() {
    let mut lexer = lexer(r#""\"\\\/\b\f\n\r\t""#);
    assert_eq!(
        lexer.expect_string("value").unwrap().decode_json_literal(),
        "\"\\/\u{8}\u{c}\n\r\t"
    );
}

#[test]
fn decodes_mixed_unicode_and_raw_text() {
    let mut lexer = lexer(r#""\\↓ÑI©ôðé\b\f\r\n\t\"\u4f92""#);
    let token = lexer.expect_string("value").unwrap();
    assert_eq!(token.text(), r#""\\↓ÑI©ôðé\b\f\r\n\t\"\u4f92""#);
    assert_eq!(token.decode_json_literal(), "\\↓ÑI©ôðé\u{8}\u{c}\r\n\t\"侒");
}

#[rstest]
#[case(r#""\0""#, "?")]
#[case(r#""\q""#, "?")]
#[case(r#""\u01""#, "?")]
#[case(r#""\ubals""#, "?")]
#[case(r#""\ud800x""#, "?x")]
#[case(r#""\udc00""#, "?")]
fn bad_escapes_decode_to_placeholders(#[case] doc: &str, #[case] decoded: &str) {
    let mut lexer = lexer(doc);
    assert_eq!(
        lexer.expect_string("value").unwrap().decode_json_literal(),
        decoded
    );
}

#[test]
fn combines_surrogate_pairs() {
    let mut lexer = lexer(r#""\ud83d\ude00!""#);
    assert_eq!(
        lexer.expect_string("value").unwrap().decode_json_literal(),
        "😀!"
    );
}

#[test]
fn escaped_raw_newline_is_deferred_then_lossy() {
    let mut lexer = lexer("\"a\\\nb\"");
    assert_eq!(
        lexer.expect_string("value").unwrap().decode_json_literal(),
        "a?b"
    );
}

#[test]
fn raw_non_ascii_is_allowed_inside_literals_only() {
    let mut lexer = lexer("\"héllo\"");
    assert_eq!(
        lexer.expect_string("value").unwrap().decode_json_literal(),
        "héllo"
    );
}
