//! The literal pattern/input scenario table and the `Regex` facade's public
//! surface, exercised end to end rather than against any one internal
//! stage.

use posix_regex::Regex;

fn search(pattern: &str, input: &str) -> Option<(i32, i32)> {
    let re = Regex::compile(pattern).unwrap();
    re.search(input.as_bytes(), 0).map(|m| (m.start, m.length))
}

#[test]
fn identifier_pattern_matches_prefix() {
    assert_eq!(search("[a-zA-Z_$][0-9a-zA-Z_$]*", "abc"), Some((0, 3)));
    assert_eq!(search("[a-zA-Z_$][0-9a-zA-Z_$]*", "a101"), Some((0, 4)));
}

#[test]
fn identifier_pattern_rejects_leading_digit() {
    let re = Regex::compile("[a-zA-Z_$][0-9a-zA-Z_$]*").unwrap();
    assert!(re.search(b"10", 0).is_none());
}

#[test]
fn hex_prefix_pattern() {
    assert_eq!(search("0[xX]", "0x"), Some((0, 2)));
    let re = Regex::compile("0[xX]").unwrap();
    assert!(re.search(b"0", 0).is_none());
}

#[test]
fn binary_digits_plus_stops_at_first_non_member() {
    assert_eq!(search("[01]+", "0123456789"), Some((0, 2)));
}

#[test]
fn character_literal_with_optional_prefix() {
    assert_eq!(search(r"(L)?'([^\\\n]|(\\.))*?'", "L'a'"), Some((0, 4)));
}

#[test]
fn quoted_string_literal() {
    assert_eq!(search(r#""([^"\\\n]|\\.)*""#, "\"buptlxb\""), Some((0, 9)));
}

#[test]
fn regex_facade_exposes_both_interpreters_for_char_only_pattern() {
    let re = Regex::compile("[a-c]+").unwrap();
    assert!(re.poor().is_some());
    assert!(re.rich().is_match(b"abcba"));
    assert!(re.poor().unwrap().is_match(b"abcba"));
}

#[test]
fn regex_facade_falls_back_to_rich_for_anchored_pattern() {
    let re = Regex::compile("^[a-c]+$").unwrap();
    assert!(re.poor().is_none());
    assert!(re.is_match(b"abc"));
    assert!(!re.is_match(b"abcd"));
}

#[test]
fn compile_reports_parse_error_position() {
    let err = Regex::compile("(abc").unwrap_err();
    let message = err.to_string();
    assert!(message.contains("column"));
}
