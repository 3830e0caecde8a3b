//! Thompson construction: [`Ast`] → ε-NFA.
//!
//! Ported from `original_source/src/regex_algorithm.cpp`'s
//! `EpsilonNfaVisitor`. Transition insertion order within this module is
//! load-bearing, not cosmetic: it is exactly the priority order the rich
//! interpreter backtracks in, so branches below add transitions in the same
//! sequence the original visitor does, including which edge out of a
//! repetition's pivot state is added first for greedy vs. lazy loops.

use crate::core::ast::{self, Ast};
use crate::core::automaton::{Automaton, StateId, TransitionKind};
use crate::errors::BuildError;

/// A fragment of automaton under construction: single entry and exit state.
#[derive(Debug, Clone, Copy)]
struct Frag {
    start: StateId,
    finish: StateId,
}

/// Builds a complete ε-NFA for `ast`. `ast` must already have gone through
/// [`crate::core::charset::normalize`]: a `Set` with `complementary: true`
/// is rejected rather than silently mishandled.
pub fn build(ast: &Ast) -> Result<Automaton, BuildError> {
    let mut automaton = Automaton::new();
    let frag = build_fragment(ast, &mut automaton)?;
    automaton.start_state = frag.start;
    automaton.set_accepted(frag.finish, true);
    Ok(automaton)
}

/// Links `a` before `b` with an epsilon edge, or returns `b` unchanged if
/// `a` is the empty identity fragment (used when unrolling zero copies of a
/// repetition). Mirrors `EpsilonNfaVisitor::connect`.
fn connect(a: Option<Frag>, b: Frag, automaton: &mut Automaton) -> Frag {
    match a {
        Some(a) => {
            automaton.add_transition(a.finish, b.start, TransitionKind::Epsilon);
            Frag {
                start: a.start,
                finish: b.finish,
            }
        }
        None => b,
    }
}

fn build_fragment(ast: &Ast, automaton: &mut Automaton) -> Result<Frag, BuildError> {
    match ast {
        Ast::Empty => {
            let s = automaton.add_state();
            Ok(Frag { start: s, finish: s })
        }
        Ast::CharRange { begin, end } => {
            let start = automaton.add_state();
            let finish = automaton.add_state();
            automaton.add_transition(
                start,
                finish,
                TransitionKind::Chars(crate::core::range::Range::new(*begin, *end)),
            );
            Ok(Frag { start, finish })
        }
        Ast::Begin => {
            let start = automaton.add_state();
            let finish = automaton.add_state();
            automaton.add_transition(start, finish, TransitionKind::BeginString);
            Ok(Frag { start, finish })
        }
        Ast::End => {
            let start = automaton.add_state();
            let finish = automaton.add_state();
            automaton.add_transition(start, finish, TransitionKind::EndString);
            Ok(Frag { start, finish })
        }
        Ast::Set { child, complementary } => {
            if *complementary {
                return Err(BuildError::MalformedSetForComplement(
                    "Thompson construction requires normalized (non-complementary) sets; call charset::normalize first".to_string(),
                ));
            }
            build_fragment(child, automaton)
        }
        Ast::Concatenation { left, right } => {
            let a = build_fragment(left, automaton)?;
            let b = build_fragment(right, automaton)?;
            Ok(connect(Some(a), b, automaton))
        }
        Ast::Select { left, right } => {
            let start = automaton.add_state();
            let finish = automaton.add_state();
            let a = build_fragment(left, automaton)?;
            let b = build_fragment(right, automaton)?;
            automaton.add_transition(start, a.start, TransitionKind::Epsilon);
            automaton.add_transition(start, b.start, TransitionKind::Epsilon);
            automaton.add_transition(a.finish, finish, TransitionKind::Epsilon);
            automaton.add_transition(b.finish, finish, TransitionKind::Epsilon);
            Ok(Frag { start, finish })
        }
        Ast::Repeat {
            child,
            min,
            max,
            greedy,
        } => build_repeat(child, *min, *max, *greedy, automaton),
    }
}

fn build_repeat(
    child: &Ast,
    min: u32,
    max: i32,
    greedy: bool,
    automaton: &mut Automaton,
) -> Result<Frag, BuildError> {
    let mut nfa: Option<Frag> = None;
    for _ in 0..min {
        let replica = build_fragment(child, automaton)?;
        nfa = Some(connect(nfa, replica, automaton));
    }

    if max == ast::UNBOUNDED {
        let replica = build_fragment(child, automaton)?;
        let nfa = nfa.unwrap_or_else(|| {
            let s = automaton.add_state();
            Frag { start: s, finish: s }
        });
        let begin = nfa.finish;
        let end = automaton.add_state();
        if greedy {
            automaton.add_transition(begin, replica.start, TransitionKind::Epsilon);
            automaton.add_transition(replica.finish, begin, TransitionKind::Epsilon);
            automaton.add_transition(begin, end, TransitionKind::Nop);
        } else {
            automaton.add_transition(begin, end, TransitionKind::Nop);
            automaton.add_transition(begin, replica.start, TransitionKind::Epsilon);
            automaton.add_transition(replica.finish, begin, TransitionKind::Epsilon);
        }
        Ok(Frag {
            start: nfa.start,
            finish: end,
        })
    } else if max > min as i32 {
        let mut nfa = nfa;
        for _ in min as i32..max {
            let replica = build_fragment(child, automaton)?;
            let begin = automaton.add_state();
            let end = automaton.add_state();
            if greedy {
                automaton.add_transition(begin, replica.start, TransitionKind::Epsilon);
                automaton.add_transition(replica.finish, end, TransitionKind::Epsilon);
                automaton.add_transition(begin, end, TransitionKind::Nop);
            } else {
                automaton.add_transition(begin, end, TransitionKind::Nop);
                automaton.add_transition(begin, replica.start, TransitionKind::Epsilon);
                automaton.add_transition(replica.finish, end, TransitionKind::Epsilon);
            }
            let wrapped = Frag { start: begin, finish: end };
            nfa = Some(connect(nfa, wrapped, automaton));
        }
        Ok(nfa.expect("max > min guarantees at least one unrolled copy"))
    } else {
        Ok(nfa.unwrap_or_else(|| {
            let s = automaton.add_state();
            Frag { start: s, finish: s }
        }))
    }
}
