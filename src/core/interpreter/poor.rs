//! Table-driven matcher for `Chars`-only automata.
//!
//! Ported from `original_source/src/regex_interpreter.cpp`'s
//! `PoorInterpreter`: every distinct `Chars` range across the whole DFA is
//! marshaled into one shared, disjoint category list; each byte maps to a
//! category via a flat 256-entry table, and `transitionTable[state][category]`
//! gives the next state or the `InvalidState` sentinel.

use crate::core::automaton::{Automaton, TransitionKind};
use crate::core::interpreter::{MatchResult, INVALID_STATE};
use crate::core::range::{Range, RangeList};
use crate::errors::BuildError;

const CHAR_MAP_SIZE: usize = 256;

/// A compiled table-driven matcher. Built once from a `Chars`-only DFA,
/// then `match`/`search`/`search_head` run allocation-free byte scans.
#[derive(Debug, Clone)]
pub struct PoorInterpreter {
    char_map: [u16; CHAR_MAP_SIZE],
    transition_table: Vec<Vec<i32>>,
    accepted_states: Vec<bool>,
    start_state: i32,
}

impl PoorInterpreter {
    /// Compiles `dfa` into table form. Fails if `dfa` carries any non-`Chars`
    /// transition (anchors, `Nop`, or leftover `Epsilon`): those require the
    /// rich interpreter's backtracking.
    pub fn new(dfa: &Automaton) -> Result<Self, BuildError> {
        let mut ranges = RangeList::new();
        for state in dfa.state_ids() {
            for tid in dfa.outbounds(state) {
                match dfa.get_transition(tid).kind {
                    TransitionKind::Chars(r) => ranges.marshal(r),
                    other => {
                        return Err(BuildError::InvalidForPoorInterpreter(format!(
                            "poor interpreter requires a Chars-only automaton, found {other:?}"
                        )))
                    }
                }
            }
        }

        let categories: Vec<Range> = ranges.iter().copied().collect();
        let char_categories = categories.len() + 1;
        let sink_category = (char_categories - 1) as u16;

        let mut char_map = [sink_category; CHAR_MAP_SIZE];
        for (i, r) in categories.iter().enumerate() {
            for byte in r.begin..=r.end {
                char_map[byte as usize] = i as u16;
                if byte == u8::MAX {
                    break;
                }
            }
        }

        let state_count = dfa.state_count();
        let accepted_states: Vec<bool> = dfa
            .state_ids()
            .map(|id| dfa.get_state(id).accepted)
            .collect();
        let start_state = dfa.start_state as i32;

        let mut transition_table = vec![vec![INVALID_STATE; char_categories]; state_count];
        for state in dfa.state_ids() {
            for tid in dfa.outbounds(state) {
                let TransitionKind::Chars(transition_range) = dfa.get_transition(tid).kind else {
                    unreachable!("validated Chars-only above");
                };
                for (j, category_range) in categories.iter().enumerate() {
                    if transition_range.fully_contains(*category_range) {
                        transition_table[state as usize][j] = dfa.get_transition(tid).target as i32;
                    }
                }
            }
        }

        Ok(Self {
            char_map,
            transition_table,
            accepted_states,
            start_state,
        })
    }

    /// Whether `input` matches the whole pattern (anchored at both ends).
    #[must_use]
    pub fn is_match(&self, input: &[u8]) -> bool {
        self.search_head(input, 0)
            .is_some_and(|r| r.matched() && r.length as usize == input.len())
    }

    /// Finds the first `search_head`-style match starting at or after
    /// `offset`, scanning forward one byte at a time.
    #[must_use]
    pub fn search(&self, input: &[u8], mut offset: usize) -> Option<MatchResult> {
        if offset > input.len() {
            return None;
        }
        loop {
            if let Some(r) = self.search_head(input, offset) {
                if r.matched() {
                    return Some(r);
                }
            }
            if offset >= input.len() {
                return None;
            }
            offset += 1;
        }
    }

    /// Runs the table-driven scan anchored at `offset`, returning the
    /// longest prefix (from `offset`) that lands on an accepting state.
    #[must_use]
    pub fn search_head(&self, input: &[u8], offset: usize) -> Option<MatchResult> {
        if offset > input.len() {
            return None;
        }
        let mut current = self.start_state;
        let mut accepted_state = INVALID_STATE;
        let mut length: i32 = -1;
        let mut reading = offset;
        while current != INVALID_STATE {
            if self.accepted_states[current as usize] {
                accepted_state = current;
                length = (reading - offset) as i32;
            }
            if reading >= input.len() {
                break;
            }
            let category = self.char_map[input[reading] as usize];
            reading += 1;
            current = self.transition_table[current as usize][category as usize];
        }
        Some(MatchResult {
            start: offset as i32,
            length,
            terminate_state: current,
            accepted_state,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::automaton::poor_epsilon_checker;
    use crate::core::{charset, parser, powerset, thompson};

    fn compile(pattern: &str) -> PoorInterpreter {
        let mut ast = parser::parse(pattern).unwrap();
        charset::normalize(&mut ast).unwrap();
        charset::unify(&mut ast).unwrap();
        let nfa = thompson::build(&ast).unwrap();
        let dfa = powerset::build(&nfa, poor_epsilon_checker);
        PoorInterpreter::new(&dfa).unwrap()
    }

    #[test]
    fn matches_literal() {
        let m = compile("abc");
        assert!(m.is_match(b"abc"));
        assert!(!m.is_match(b"ab"));
        assert!(!m.is_match(b"abcd"));
    }

    #[test]
    fn matches_star_including_empty() {
        let m = compile("a*");
        assert!(m.is_match(b""));
        assert!(m.is_match(b"aaaa"));
        assert!(!m.is_match(b"aab"));
    }

    #[test]
    fn search_finds_embedded_match() {
        let m = compile("bc");
        let found = m.search(b"abcd", 0).unwrap();
        assert_eq!(found.start, 1);
        assert_eq!(found.length, 2);
    }

    #[test]
    fn search_head_requires_match_at_offset() {
        let m = compile("bc");
        assert!(!m.search_head(b"abcd", 0).unwrap().matched());
        assert!(m.search_head(b"abcd", 1).unwrap().matched());
    }

    #[test]
    fn rejects_automaton_with_anchors() {
        let mut ast = parser::parse("^a").unwrap();
        charset::normalize(&mut ast).unwrap();
        charset::unify(&mut ast).unwrap();
        let nfa = thompson::build(&ast).unwrap();
        let dfa = powerset::build(&nfa, poor_epsilon_checker);
        assert!(matches!(
            PoorInterpreter::new(&dfa),
            Err(BuildError::InvalidForPoorInterpreter(_))
        ));
    }

    #[test]
    fn set_matches_any_member() {
        let m = compile("[a-c]+");
        assert!(m.is_match(b"abcba"));
        assert!(!m.is_match(b"abcd"));
    }
}
