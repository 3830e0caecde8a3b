//! Subset (powerset) construction: ε-NFA → DFA.
//!
//! Ported from `original_source/src/automaton.cpp`'s `epsilonClosure` and
//! `subset`. Two details carry over exactly because they are load-bearing,
//! not incidental:
//!
//! - Closure *identity* is the ordered sequence of first-visited states, not
//!   the unordered set. `original_source` keys its DFA-state dictionary on
//!   `State::List` (an ordered list) rather than `State::Set`; this crate
//!   uses [`indexmap::IndexMap`] keyed on `Vec<StateId>` for the same
//!   reason: the outbound transition order of each NFA state is its
//!   priority order, and two closures that visit the same states in a
//!   different order must stay distinct DFA states for the rich
//!   interpreter's priority to survive determinization.
//! - Outgoing categories are grouped by *exact* transition equality
//!   (`Chars` ranges compared for equality, not overlap; `BeginString` /
//!   `EndString` / `Nop` each collapse to one category regardless of which
//!   NFA state emitted them). This is why set normalization/unification
//!   (§4.2/§4.3) must happen before Thompson construction: subset
//!   construction here never splits overlapping ranges itself.

use indexmap::{IndexMap, IndexSet};
use std::collections::VecDeque;

use crate::core::automaton::{Automaton, StateId, TransitionKind};
use crate::core::range::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum CategoryKey {
    Chars(Range),
    BeginString,
    EndString,
    Nop,
}

fn category_key(kind: TransitionKind) -> CategoryKey {
    match kind {
        TransitionKind::Chars(r) => CategoryKey::Chars(r),
        TransitionKind::BeginString => CategoryKey::BeginString,
        TransitionKind::EndString => CategoryKey::EndString,
        TransitionKind::Nop => CategoryKey::Nop,
        TransitionKind::Epsilon => {
            unreachable!("epsilon transitions are filtered before category grouping")
        }
    }
}

fn category_kind(key: CategoryKey) -> TransitionKind {
    match key {
        CategoryKey::Chars(r) => TransitionKind::Chars(r),
        CategoryKey::BeginString => TransitionKind::BeginString,
        CategoryKey::EndString => TransitionKind::EndString,
        CategoryKey::Nop => TransitionKind::Nop,
    }
}

/// Recursive ε-closure of a single NFA state.
///
/// `visited` accumulates the ordered, deduplicated closure membership;
/// `categories` accumulates, in first-occurrence order, the non-epsilon
/// transitions reachable from the closure, each mapped to every target
/// state reached via a transition equal to that category. Returns whether
/// any state in the closure (including ones reached on an earlier call and
/// only re-touched now) is accepting.
fn epsilon_closure(
    state: StateId,
    nfa: &Automaton,
    is_epsilon: fn(TransitionKind) -> bool,
    visited: &mut IndexSet<StateId>,
    categories: &mut IndexMap<CategoryKey, Vec<StateId>>,
) -> bool {
    let self_accepted = nfa.get_state(state).accepted;
    if !visited.insert(state) {
        return self_accepted;
    }
    let mut accepted = self_accepted;
    for tid in nfa.outbounds(state).collect::<Vec<_>>() {
        let transition = nfa.get_transition(tid);
        if is_epsilon(transition.kind) {
            accepted |= epsilon_closure(transition.target, nfa, is_epsilon, visited, categories);
        } else {
            categories
                .entry(category_key(transition.kind))
                .or_default()
                .push(transition.target);
        }
    }
    accepted
}

/// Runs subset construction over `nfa`, producing a DFA.
///
/// `is_epsilon` selects the flavor: [`crate::core::automaton::poor_epsilon_checker`]
/// collapses `Nop` into ε (the poor interpreter has no notion of it);
/// [`crate::core::automaton::rich_epsilon_checker`] keeps `Nop` visible so
/// greedy/lazy priority survives into the DFA.
#[must_use]
pub fn build(nfa: &Automaton, is_epsilon: fn(TransitionKind) -> bool) -> Automaton {
    let mut dfa = Automaton::new();
    let dfa_start = dfa.add_state();
    dfa.start_state = dfa_start;

    let mut dict: IndexMap<Vec<StateId>, StateId> = IndexMap::new();
    let mut queue: VecDeque<(Vec<StateId>, IndexMap<CategoryKey, Vec<StateId>>)> = VecDeque::new();

    let mut visited = IndexSet::new();
    let mut categories = IndexMap::new();
    let accepted = epsilon_closure(nfa.start_state, nfa, is_epsilon, &mut visited, &mut categories);
    dfa.set_accepted(dfa_start, accepted);
    let start_states: Vec<StateId> = visited.into_iter().collect();
    dict.insert(start_states.clone(), dfa_start);
    queue.push_back((start_states, categories));

    while let Some((cur_states, cur_categories)) = queue.pop_front() {
        let source = dict[&cur_states];
        for (key, targets) in cur_categories {
            let mut visited = IndexSet::new();
            let mut categories = IndexMap::new();
            let mut accepted = false;
            for target in targets {
                accepted |= epsilon_closure(target, nfa, is_epsilon, &mut visited, &mut categories);
            }
            let next_states: Vec<StateId> = visited.into_iter().collect();
            let target_dfa_state = if let Some(&id) = dict.get(&next_states) {
                id
            } else {
                let id = dfa.add_state();
                dfa.set_accepted(id, accepted);
                dict.insert(next_states.clone(), id);
                queue.push_back((next_states, categories));
                id
            };
            dfa.add_transition(source, target_dfa_state, category_kind(key));
        }
    }

    dfa
}
