//! Bracket-expression normalization and cross-set unification.
//!
//! Grounded in `original_source/src/regex_algorithm.cpp`'s
//! `SetNormalizationVisitor`, translated from double-dispatch visiting into
//! a plain recursive `match` over [`Ast`], per `SPEC_FULL.md`'s §9 note.
//! `SetUnificationVisitor` itself was not present in the retrieved original
//! sources (only its declaration at the call site in `regex_expression.cpp`
//! survives); §4.3's prose description of "one global disjoint alphabet,
//! each Set rewritten to reference only its atoms" is implemented directly
//! here, built on the same [`RangeList::marshal`] primitive normalization
//! uses.

use crate::core::ast::Ast;
use crate::core::range::{Range, RangeList};
use crate::errors::BuildError;

/// Walks every [`Ast::Set`] in the tree and replaces its child with a
/// canonical disjunction of disjoint ranges: the set's own members for a
/// positive set, or their complement over `[0x01, 0xFF]` for `[^...]`
/// (after which `complementary` is cleared, mirroring the original visitor
/// resolving the negation away during normalization).
///
/// Distinct elementary ranges are kept distinct rather than coalesced where
/// adjacent; see `SPEC_FULL.md` §4.2 for why this deliberately differs from
/// the literal original source.
pub fn normalize(ast: &mut Ast) -> Result<(), BuildError> {
    match ast {
        Ast::Empty | Ast::Begin | Ast::End | Ast::CharRange { .. } => Ok(()),
        Ast::Repeat { child, .. } => normalize(child),
        Ast::Concatenation { left, right } | Ast::Select { left, right } => {
            normalize(left)?;
            normalize(right)
        }
        Ast::Set {
            child,
            complementary,
        } => {
            let ranges = collect_set_ranges(child)?;
            let rebuilt = if *complementary {
                build_chain(ranges.complement().iter().copied().collect())
            } else {
                build_chain(ranges.iter().copied().collect())
            };
            *complementary = false;
            **child = rebuilt;
            Ok(())
        }
    }
}

/// Builds one global disjoint [`RangeList`] covering every [`Ast::Set`]'s
/// ranges (call after [`normalize`]), then rewrites each set's child to
/// reference only atoms of that global list. Returns the unified alphabet.
pub fn unify(ast: &mut Ast) -> Result<RangeList, BuildError> {
    let mut universe = RangeList::new();
    collect_universe(ast, &mut universe)?;
    rewrite_with_universe(ast, &universe)?;
    Ok(universe)
}

fn collect_universe(ast: &Ast, universe: &mut RangeList) -> Result<(), BuildError> {
    match ast {
        Ast::Empty | Ast::Begin | Ast::End | Ast::CharRange { .. } => Ok(()),
        Ast::Repeat { child, .. } => collect_universe(child, universe),
        Ast::Concatenation { left, right } | Ast::Select { left, right } => {
            collect_universe(left, universe)?;
            collect_universe(right, universe)
        }
        Ast::Set { child, .. } => {
            let ranges = collect_set_ranges(child)?;
            universe.merge(&ranges);
            Ok(())
        }
    }
}

fn rewrite_with_universe(ast: &mut Ast, universe: &RangeList) -> Result<(), BuildError> {
    match ast {
        Ast::Empty | Ast::Begin | Ast::End | Ast::CharRange { .. } => Ok(()),
        Ast::Repeat { child, .. } => rewrite_with_universe(child, universe),
        Ast::Concatenation { left, right } | Ast::Select { left, right } => {
            rewrite_with_universe(left, universe)?;
            rewrite_with_universe(right, universe)
        }
        Ast::Set { child, .. } => {
            let ranges = collect_set_ranges(child)?;
            let mut atoms: Vec<Range> = Vec::new();
            for r in ranges.iter() {
                atoms.extend(universe.iter().copied().filter(|g| r.fully_contains(*g)));
            }
            atoms.sort();
            atoms.dedup();
            **child = build_chain(atoms);
            Ok(())
        }
    }
}

/// Gathers the disjoint ranges that make up a set's body. After
/// [`normalize`], a set's child is always `Empty`, a single `CharRange`, or
/// a right-leaning chain of `Select(CharRange, ...)`: the only shapes the
/// parser or `normalize`/`unify` themselves ever build for a set body.
fn collect_set_ranges(ast: &Ast) -> Result<RangeList, BuildError> {
    let mut list = RangeList::new();
    collect_set_ranges_into(ast, &mut list)?;
    Ok(list)
}

fn collect_set_ranges_into(ast: &Ast, list: &mut RangeList) -> Result<(), BuildError> {
    match ast {
        Ast::Empty => Ok(()),
        Ast::CharRange { begin, end } => {
            list.marshal(Range::new(*begin, *end));
            Ok(())
        }
        Ast::Select { left, right } => {
            collect_set_ranges_into(left, list)?;
            collect_set_ranges_into(right, list)
        }
        other => Err(BuildError::MalformedSetForComplement(format!(
            "set body must be ranges joined by selection, found {other:?}"
        ))),
    }
}

/// Rebuilds a right-leaning `Select` chain of `CharRange` leaves from a
/// sequence of ranges, mirroring `SetNormalizationVisitor::rebuild`'s
/// prepend order.
fn build_chain(ranges: Vec<Range>) -> Ast {
    let mut iter = ranges.into_iter().rev();
    match iter.next() {
        None => Ast::Empty,
        Some(last) => iter.fold(Ast::char_range(last.begin, last.end), |acc, r| {
            Ast::select(Ast::char_range(r.begin, r.end), acc)
        }),
    }
}
