//! Recursive-descent parser for the POSIX-flavored grammar:
//!
//! ```text
//! RE         = SimpleRE ("|" RE)?
//! SimpleRE   = BasicRE SimpleRE?
//! BasicRE    = ElementaryRE ("*" | "+" | "?") "?"?
//! ElementaryRE = "^" | "$" | "." | "(" RE ")" | "[" "^"? SetItems "]" | Char
//! ```
//!
//! Bracket-expression contents (`-`, `^`, `]`) and top-level text assign
//! different meaning to the same bytes, so this parser walks the pattern's
//! raw bytes with an explicit cursor rather than through a
//! context-independent token stream. Mirrors
//! `original_source/src/regex_expression.cpp`'s `parseRE`/`parseSimpleRE`/
//! `parseBasicRE`/`parseElementaryRE`/`parseSetItems`/`parseSetItem`/
//! `parseChar` family of functions, translated from null-`Expression::Ptr`
//! "nothing parsed here" sentinels to `Option<Ast>`.

use crate::core::ast::{self, Ast};
use crate::errors::{ParseError, ParseErrorKind};

const METACHARS: &[u8] = b"()+*?|";
const SELF_ESCAPABLE: &[u8] = b"-[]\\/^$.+*?|";

/// Parses a full pattern into an [`Ast`]. An empty pattern parses to
/// [`Ast::Empty`].
pub fn parse(pattern: &str) -> Result<Ast, ParseError> {
    let mut parser = Parser {
        bytes: pattern.as_bytes(),
        pos: 0,
    };
    let ast = parser.parse_re()?;
    Ok(ast.unwrap_or(Ast::Empty))
}

struct Parser<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn is_char(&mut self, c: u8) -> bool {
        if self.peek() == Some(c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn error_at(&self, pos: usize, kind: ParseErrorKind) -> ParseError {
        ParseError::new(pos + 1, kind)
    }

    /// `<char> ::= non-metacharacter | "\" metacharacter`
    fn parse_char(&mut self) -> Result<u8, ParseError> {
        let Some(c) = self.peek() else {
            // Reached only when a set item's trailing `-` runs off the end of
            // the pattern, e.g. `[a-`: the enclosing bracket expression never
            // got its `]`.
            return Err(self.error_at(self.pos, ParseErrorKind::UnclosedSet));
        };
        if self.is_char(b'\\') {
            let escaped = self.peek();
            let mapped = match escaped {
                Some(b'r') => Some(b'\r'),
                Some(b'n') => Some(b'\n'),
                Some(b't') => Some(b'\t'),
                Some(b) if SELF_ESCAPABLE.contains(&b) => Some(b),
                _ => None,
            };
            match mapped {
                Some(byte) => {
                    self.pos += 1;
                    Ok(byte)
                }
                None => Err(self.error_at(
                    self.pos,
                    ParseErrorKind::IllegalEscape(escaped.unwrap_or(0)),
                )),
            }
        } else {
            self.pos += 1;
            Ok(c)
        }
    }

    /// `<SetItem> ::= <range> | <char>`, `<range> ::= <char> "-" <char>`
    fn parse_set_item(&mut self) -> Result<Ast, ParseError> {
        let start = self.pos;
        let begin = self.parse_char()?;
        let end = if self.is_char(b'-') {
            self.parse_char()?
        } else {
            begin
        };
        if begin > end {
            return Err(self.error_at(start, ParseErrorKind::RangeOutOfOrder { begin, end }));
        }
        Ok(Ast::char_range(begin, end))
    }

    /// `<SetItems> ::= <SetItem> | <SetItem> <SetItems>`
    fn parse_set_items(&mut self) -> Result<Option<Ast>, ParseError> {
        if matches!(self.peek(), None | Some(b']')) {
            return Ok(None);
        }
        let item = self.parse_set_item()?;
        let right = self.parse_set_items()?;
        Ok(Some(match right {
            Some(right) => Ast::select(item, right),
            None => item,
        }))
    }

    /// `<ElementaryRE>`: returns `Ok(None)` when no atom starts here (end of
    /// input, or a metacharacter that belongs to an enclosing production).
    fn parse_elementary_re(&mut self) -> Result<Option<Ast>, ParseError> {
        match self.peek() {
            None => Ok(None),
            Some(b'^') => {
                self.pos += 1;
                Ok(Some(Ast::Begin))
            }
            Some(b'$') => {
                self.pos += 1;
                Ok(Some(Ast::End))
            }
            Some(b'.') => {
                self.pos += 1;
                Ok(Some(Ast::char_range(0x01, 0xFF)))
            }
            Some(b'[') => {
                self.pos += 1;
                let complementary = self.is_char(b'^');
                let items = self.parse_set_items()?;
                if !self.is_char(b']') {
                    return Err(self.error_at(self.pos, ParseErrorKind::UnclosedSet));
                }
                Ok(Some(Ast::set(items.unwrap_or(Ast::Empty), complementary)))
            }
            Some(b'(') => {
                self.pos += 1;
                let inner = self.parse_re()?;
                if !self.is_char(b')') {
                    return Err(self.error_at(self.pos, ParseErrorKind::UnclosedGroup));
                }
                Ok(Some(inner.unwrap_or(Ast::Empty)))
            }
            Some(c) if METACHARS.contains(&c) => Ok(None),
            Some(_) => {
                let byte = self.parse_char()?;
                Ok(Some(Ast::char(byte)))
            }
        }
    }

    /// `<BasicRE> ::= <ElementaryRE> ("*" | "+" | "?") "?"?`
    fn parse_basic_re(&mut self) -> Result<Option<Ast>, ParseError> {
        let Some(elementary) = self.parse_elementary_re()? else {
            return Ok(None);
        };
        if self.is_char(b'*') {
            let greedy = !self.is_char(b'?');
            Ok(Some(Ast::repeat(elementary, 0, ast::UNBOUNDED, greedy)))
        } else if self.is_char(b'+') {
            let greedy = !self.is_char(b'?');
            Ok(Some(Ast::repeat(elementary, 1, ast::UNBOUNDED, greedy)))
        } else if self.is_char(b'?') {
            let greedy = !self.is_char(b'?');
            Ok(Some(Ast::repeat(elementary, 0, 1, greedy)))
        } else {
            Ok(Some(elementary))
        }
    }

    /// `<SimpleRE> ::= <BasicRE> <SimpleRE>?` (right-associative concatenation)
    fn parse_simple_re(&mut self) -> Result<Option<Ast>, ParseError> {
        let Some(basic) = self.parse_basic_re()? else {
            return Ok(None);
        };
        let right = self.parse_simple_re()?;
        Ok(Some(match right {
            Some(right) => Ast::concat(basic, right),
            None => basic,
        }))
    }

    /// `<RE> ::= <SimpleRE> ("|" <RE>)?`
    ///
    /// An empty alternative (leading/trailing/doubled `|`) is represented as
    /// [`Ast::Empty`] rather than silently dropped, so `a|` matches `a` or
    /// the empty string, per the grammar's own stated
    /// `<RE-1> ::= "|" <SimpleRE> <RE-1> | epsilon` production.
    fn parse_re(&mut self) -> Result<Option<Ast>, ParseError> {
        let simple = self.parse_simple_re()?;
        if self.is_char(b'|') {
            let right = self.parse_re()?;
            let left = simple.unwrap_or(Ast::Empty);
            let right = right.unwrap_or(Ast::Empty);
            Ok(Some(Ast::select(left, right)))
        } else {
            Ok(simple)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(c: char) -> Ast {
        Ast::char(c as u8)
    }

    #[test]
    fn parses_single_literal() {
        assert_eq!(parse("a").unwrap(), lit('a'));
    }

    #[test]
    fn parses_concatenation() {
        assert_eq!(parse("ab").unwrap(), Ast::concat(lit('a'), lit('b')));
    }

    #[test]
    fn parses_alternation() {
        assert_eq!(parse("a|b").unwrap(), Ast::select(lit('a'), lit('b')));
    }

    #[test]
    fn parses_star_as_greedy_repeat() {
        assert_eq!(
            parse("a*").unwrap(),
            Ast::repeat(lit('a'), 0, ast::UNBOUNDED, true)
        );
    }

    #[test]
    fn parses_lazy_star() {
        assert_eq!(
            parse("a*?").unwrap(),
            Ast::repeat(lit('a'), 0, ast::UNBOUNDED, false)
        );
    }

    #[test]
    fn parses_plus_and_question() {
        assert_eq!(
            parse("a+").unwrap(),
            Ast::repeat(lit('a'), 1, ast::UNBOUNDED, true)
        );
        assert_eq!(parse("a?").unwrap(), Ast::repeat(lit('a'), 0, 1, true));
    }

    #[test]
    fn parses_grouping() {
        assert_eq!(
            parse("(a|b)*").unwrap(),
            Ast::repeat(Ast::select(lit('a'), lit('b')), 0, ast::UNBOUNDED, true)
        );
    }

    #[test]
    fn parses_nested_grouping() {
        assert_eq!(
            parse("((a))").unwrap(),
            lit('a'),
            "redundant grouping should not change the tree shape"
        );
    }

    #[test]
    fn parses_anchors_and_any() {
        assert_eq!(
            parse("^.$").unwrap(),
            Ast::concat(Ast::concat(Ast::Begin, Ast::char_range(0x01, 0xFF)), Ast::End)
        );
    }

    #[test]
    fn parses_bracket_expression() {
        assert_eq!(
            parse("[a-z]").unwrap(),
            Ast::set(Ast::char_range(b'a', b'z'), false)
        );
    }

    #[test]
    fn parses_negated_bracket_expression() {
        assert_eq!(
            parse("[^a-z]").unwrap(),
            Ast::set(Ast::char_range(b'a', b'z'), true)
        );
    }

    #[test]
    fn parses_bracket_with_multiple_items() {
        assert_eq!(
            parse("[ab]").unwrap(),
            Ast::set(Ast::select(lit('a'), lit('b')), false)
        );
    }

    #[test]
    fn parses_escaped_metacharacter() {
        assert_eq!(parse(r"\.").unwrap(), lit('.'));
        assert_eq!(parse(r"\n").unwrap(), Ast::char(b'\n'));
    }

    #[test]
    fn empty_pattern_is_empty_ast() {
        assert_eq!(parse("").unwrap(), Ast::Empty);
    }

    #[test]
    fn trailing_alternative_is_empty_not_dropped() {
        assert_eq!(parse("a|").unwrap(), Ast::select(lit('a'), Ast::Empty));
    }

    #[test]
    fn rejects_illegal_escape() {
        let err = parse(r"\q").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::IllegalEscape(b'q'));
    }

    #[test]
    fn rejects_range_out_of_order() {
        let err = parse("[z-a]").unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::RangeOutOfOrder {
                begin: b'z',
                end: b'a'
            }
        );
    }

    #[test]
    fn rejects_unclosed_group() {
        let err = parse("(a").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnclosedGroup);
    }

    #[test]
    fn rejects_unclosed_set() {
        let err = parse("[abc").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnclosedSet);
    }

    #[test]
    fn rejects_dangling_range_dash_at_end_of_pattern() {
        let err = parse("[a-").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnclosedSet);
    }

    #[test]
    fn complex_expression_has_top_level_concatenation() {
        let ast = parse("(a|b)*abb").unwrap();
        match ast {
            Ast::Concatenation { .. } => {}
            other => panic!("expected a top-level concatenation, got {other:?}"),
        }
    }
}
