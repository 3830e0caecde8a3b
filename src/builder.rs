//! Programmatic builder: combinators for hosts that want to construct an
//! [`Ast`] without going through the textual grammar in
//! [`crate::core::parser`].
//!
//! Grounded in `spec.md` §6's combinator list; there is no equivalent
//! surface in `original_source` (the C++ engine only ever builds `Ast` via
//! its text parser), so this module's shape follows the teacher's
//! `Ast::char`/`Ast::repeat`-style associated constructors, generalized into
//! free functions that read as a small fluent vocabulary.

use crate::core::ast::{self, Ast};
use crate::errors::BuildError;

/// Matches only the start-of-string anchor.
#[must_use]
pub fn begin() -> Ast {
    Ast::Begin
}

/// Matches only the end-of-string anchor.
#[must_use]
pub fn end() -> Ast {
    Ast::End
}

/// `[\x01-\xFF]`: any byte except NUL, matching what `.` expands to in the
/// textual grammar.
#[must_use]
pub fn any_char() -> Ast {
    range(0x01, 0xFF)
}

/// `[0-9]`.
#[must_use]
pub fn digit() -> Ast {
    range(b'0', b'9')
}

/// `[A-Za-z_]`.
#[must_use]
pub fn letter() -> Ast {
    union(vec![range(b'A', b'Z'), range(b'a', b'z'), literal(b'_')])
}

/// `[A-Za-z0-9_]`.
#[must_use]
pub fn word() -> Ast {
    union(vec![
        range(b'A', b'Z'),
        range(b'a', b'z'),
        range(b'0', b'9'),
        literal(b'_'),
    ])
}

/// A single literal byte.
#[must_use]
pub fn literal(byte: u8) -> Ast {
    Ast::char(byte)
}

/// An inclusive byte range, wrapped as a non-complementary set the way the
/// parser wraps a bracket expression's body.
#[must_use]
pub fn range(begin: u8, end: u8) -> Ast {
    Ast::set(Ast::char_range(begin, end), false)
}

/// `a.concat(b)`, i.e. `ab`.
#[must_use]
pub fn concat(left: Ast, right: Ast) -> Ast {
    Ast::concat(left, right)
}

/// `a|b`.
#[must_use]
pub fn alternate(left: Ast, right: Ast) -> Ast {
    Ast::select(left, right)
}

/// `child*` (greedy) or `child*?` (lazy).
#[must_use]
pub fn zero_or_more(child: Ast, greedy: bool) -> Ast {
    Ast::repeat(child, 0, ast::UNBOUNDED, greedy)
}

/// `child+` (greedy) or `child+?` (lazy).
#[must_use]
pub fn one_or_more(child: Ast, greedy: bool) -> Ast {
    Ast::repeat(child, 1, ast::UNBOUNDED, greedy)
}

/// `child?` (greedy) or `child??` (lazy).
#[must_use]
pub fn zero_or_one(child: Ast, greedy: bool) -> Ast {
    Ast::repeat(child, 0, 1, greedy)
}

/// `child{min,max}` (`max` of [`ast::UNBOUNDED`] for an open upper bound).
#[must_use]
pub fn repeat(child: Ast, min: u32, max: i32, greedy: bool) -> Ast {
    Ast::repeat(child, min, max, greedy)
}

/// Unions a sequence of set bodies (ranges, literals, or other sets) into a
/// single non-complementary set, left-folding them into the same
/// right-leaning `Select` chain [`crate::core::charset::normalize`] builds.
///
/// Each element of `members` must itself be a `Set`, a `CharRange`, or a
/// `Select`/`Concatenation` of those: anything a bracket expression could
/// contain. Passing an anchor or a `Repeat` is a caller error.
#[must_use]
pub fn union(members: Vec<Ast>) -> Ast {
    let mut bodies = members.into_iter().map(unwrap_set_body);
    let Some(first) = bodies.next() else {
        return Ast::set(Ast::Empty, false);
    };
    let body = bodies.fold(first, |acc, next| Ast::select(acc, next));
    Ast::set(body, false)
}

fn unwrap_set_body(ast: Ast) -> Ast {
    match ast {
        Ast::Set { child, .. } => *child,
        other => other,
    }
}

/// Flips a set's polarity: a positive set becomes `[^...]` and vice versa.
/// Fails if `ast` is not a `Set`.
pub fn complement(ast: Ast) -> Result<Ast, BuildError> {
    match ast {
        Ast::Set { child, complementary } => Ok(Ast::set(*child, !complementary)),
        other => Err(BuildError::MalformedSetForComplement(format!(
            "cannot complement a non-set node: {other:?}"
        ))),
    }
}
