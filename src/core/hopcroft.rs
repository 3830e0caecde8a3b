//! DFA minimization.
//!
//! `minimize` is a worklist-based partition refinement, following the
//! teacher's `core/min.rs` idiom rather than `original_source`'s `split`
//! (which partitions by walking a single representative state's transitions
//! against the previous partition: workable but harder to follow than a
//! worklist). `brzozowski_minimize` is `SPEC_FULL.md`'s §4.6 addition, ported
//! directly from `original_source/src/automaton.cpp`'s `Brzozowski`:
//! reverse, determinize, trim, reverse, determinize again.

use std::collections::{HashSet, VecDeque};

use crate::core::automaton::{Automaton, StateId, TransitionKind};
use crate::core::powerset;

/// Minimizes `dfa` (a deterministic automaton with no epsilon transitions)
/// via Hopcroft-style partition refinement.
#[must_use]
pub fn minimize(dfa: &Automaton) -> Automaton {
    if dfa.state_count() <= 1 {
        return dfa.clone();
    }
    PartitionRefinement::new(dfa).run()
}

/// Minimizes `nfa` by Brzozowski's double-reversal method instead of
/// subset-construction-then-Hopcroft. Always yields a minimal DFA in one
/// pass of reverse/determinize/trim/reverse/determinize, at the cost of a
/// possible intermediate blowup the direct route avoids.
#[must_use]
pub fn brzozowski_minimize(nfa: &Automaton, is_epsilon: fn(TransitionKind) -> bool) -> Automaton {
    let reversed = nfa.reverse();
    let trimmed_dfa = powerset::build(&reversed, is_epsilon).reachable_trim();
    let reversed_again = trimmed_dfa.reverse();
    powerset::build(&reversed_again, is_epsilon).reachable_trim()
}

struct PartitionRefinement<'a> {
    dfa: &'a Automaton,
    alphabet: Vec<TransitionKind>,
    partitions: Vec<Vec<StateId>>,
    state_class: Vec<usize>,
    worklist: VecDeque<(usize, usize)>,
}

impl<'a> PartitionRefinement<'a> {
    fn new(dfa: &'a Automaton) -> Self {
        let mut alphabet: Vec<TransitionKind> = Vec::new();
        for state in dfa.state_ids() {
            for tid in dfa.outbounds(state) {
                let kind = dfa.get_transition(tid).kind;
                if !alphabet.contains(&kind) {
                    alphabet.push(kind);
                }
            }
        }

        let mut accepting = Vec::new();
        let mut rejecting = Vec::new();
        for state in dfa.state_ids() {
            if dfa.get_state(state).accepted {
                accepting.push(state);
            } else {
                rejecting.push(state);
            }
        }
        let mut partitions = Vec::new();
        if !accepting.is_empty() {
            partitions.push(accepting);
        }
        if !rejecting.is_empty() {
            partitions.push(rejecting);
        }

        let mut state_class = vec![0usize; dfa.state_count()];
        for (class, block) in partitions.iter().enumerate() {
            for &state in block {
                state_class[state as usize] = class;
            }
        }

        let mut worklist = VecDeque::new();
        for class_idx in 0..partitions.len() {
            for symbol_idx in 0..alphabet.len() {
                worklist.push_back((class_idx, symbol_idx));
            }
        }

        Self {
            dfa,
            alphabet,
            partitions,
            state_class,
            worklist,
        }
    }

    fn target(&self, state: StateId, symbol: TransitionKind) -> Option<StateId> {
        self.dfa
            .outbounds(state)
            .map(|tid| self.dfa.get_transition(tid))
            .find(|t| t.kind == symbol)
            .map(|t| t.target)
    }

    fn run(mut self) -> Automaton {
        while let Some((class_idx, symbol_idx)) = self.worklist.pop_front() {
            let symbol = self.alphabet[symbol_idx];
            let involved = self.collect_involved(class_idx, symbol);
            if involved.is_empty() {
                continue;
            }
            let splits = self.split_partitions(&involved);
            self.enqueue_splits(&splits);
        }
        self.build_minimized()
    }

    fn collect_involved(&self, class_idx: usize, symbol: TransitionKind) -> HashSet<StateId> {
        let mut involved = HashSet::new();
        for state in self.dfa.state_ids() {
            if let Some(dst) = self.target(state, symbol) {
                if self.state_class[dst as usize] == class_idx {
                    involved.insert(state);
                }
            }
        }
        involved
    }

    fn split_partitions(&mut self, involved: &HashSet<StateId>) -> Vec<usize> {
        let mut split_targets = Vec::new();
        let mut idx = 0;
        while idx < self.partitions.len() {
            let block = self.partitions[idx].as_slice();
            let (in_part, out_part): (Vec<StateId>, Vec<StateId>) =
                block.iter().partition(|s| involved.contains(s));
            if in_part.is_empty() || out_part.is_empty() {
                idx += 1;
                continue;
            }
            self.partitions[idx] = in_part;
            let new_idx = self.partitions.len();
            self.partitions.push(out_part);
            self.relabel(idx);
            self.relabel(new_idx);

            let smaller = if self.partitions[idx].len() < self.partitions[new_idx].len() {
                idx
            } else {
                new_idx
            };
            split_targets.push(smaller);
            idx += 1;
        }
        split_targets
    }

    fn relabel(&mut self, block_idx: usize) {
        for &state in &self.partitions[block_idx] {
            self.state_class[state as usize] = block_idx;
        }
    }

    fn enqueue_splits(&mut self, splits: &[usize]) {
        for &idx in splits {
            for symbol_idx in 0..self.alphabet.len() {
                self.worklist.push_back((idx, symbol_idx));
            }
        }
    }

    fn build_minimized(self) -> Automaton {
        let mut out = Automaton::new();
        for _ in &self.partitions {
            out.add_state();
        }
        for (idx, block) in self.partitions.iter().enumerate() {
            if block.iter().any(|&s| self.dfa.get_state(s).accepted) {
                out.set_accepted(idx as StateId, true);
            }
            if block.contains(&self.dfa.start_state) {
                out.start_state = idx as StateId;
            }
        }
        for (idx, block) in self.partitions.iter().enumerate() {
            let repr = block[0];
            for tid in self.dfa.outbounds(repr) {
                let t = self.dfa.get_transition(tid);
                let target_class = self.state_class[t.target as usize];
                out.add_transition(idx as StateId, target_class as StateId, t.kind);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::automaton::rich_epsilon_checker;
    use crate::core::{parser, thompson};

    fn minimized_dfa(pattern: &str) -> Automaton {
        let mut ast = parser::parse(pattern).unwrap();
        crate::core::charset::normalize(&mut ast).unwrap();
        crate::core::charset::unify(&mut ast).unwrap();
        let nfa = thompson::build(&ast).unwrap();
        let dfa = powerset::build(&nfa, rich_epsilon_checker);
        minimize(&dfa)
    }

    fn accepts(dfa: &Automaton, input: &[u8]) -> bool {
        let mut state = dfa.start_state;
        for &byte in input {
            let next = dfa
                .outbounds(state)
                .map(|tid| dfa.get_transition(tid))
                .find(|t| matches!(t.kind, TransitionKind::Chars(r) if r.contains(byte)));
            match next {
                Some(t) => state = t.target,
                None => return false,
            }
        }
        dfa.get_state(state).accepted
    }

    #[test]
    fn a_plus_a_star_minimizes_same_as_a_star() {
        let min1 = minimized_dfa("a+a*");
        let min2 = minimized_dfa("a*");
        assert_eq!(min1.state_count(), min2.state_count());
        for input in [&b""[..], b"a", b"aa", b"aaa"] {
            assert_eq!(accepts(&min1, input), accepts(&min2, input));
        }
    }

    #[test]
    fn redundant_union_branches_collapse() {
        let min1 = minimized_dfa("(a|b)(a|b)");
        let nfa = thompson::build(&{
            let mut ast = parser::parse("(a|b)(a|b)").unwrap();
            crate::core::charset::normalize(&mut ast).unwrap();
            crate::core::charset::unify(&mut ast).unwrap();
            ast
        })
        .unwrap();
        let unminimized = powerset::build(&nfa, rich_epsilon_checker);
        assert!(min1.state_count() <= unminimized.state_count());
        assert!(accepts(&min1, b"aa"));
        assert!(accepts(&min1, b"ab"));
        assert!(accepts(&min1, b"ba"));
        assert!(accepts(&min1, b"bb"));
        assert!(!accepts(&min1, b"a"));
    }

    #[test]
    fn brzozowski_agrees_with_hopcroft_route() {
        let mut ast = parser::parse("a*b").unwrap();
        crate::core::charset::normalize(&mut ast).unwrap();
        crate::core::charset::unify(&mut ast).unwrap();
        let nfa = thompson::build(&ast).unwrap();

        let hopcroft_route = minimize(&powerset::build(&nfa, rich_epsilon_checker));
        let brzozowski_route = brzozowski_minimize(&nfa, rich_epsilon_checker);

        assert_eq!(hopcroft_route.state_count(), brzozowski_route.state_count());
        for input in [&b""[..], b"b", b"ab", b"aab", b"aaab", b"a"] {
            assert_eq!(accepts(&hopcroft_route, input), accepts(&brzozowski_route, input));
        }
    }
}
