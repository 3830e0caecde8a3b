//! Backtracking matcher over any DFA, anchors and `Nop` priority included.
//!
//! Ported from `original_source/src/regex_interpreter.cpp`'s
//! `RichInterpreter`. A state only needs a saved backtrack point
//! (`needs_backtrack`) when it has more than one non-`Chars` outgoing edge,
//! or a mix of `Chars` and non-`Chars` edges: a state with a single
//! deterministic way forward never needs to remember an alternative.

use crate::core::automaton::{Automaton, StateId, TransitionKind};
use crate::core::interpreter::{MatchResult, INVALID_STATE};

#[derive(Debug, Clone, Copy)]
struct StatusSaver {
    state: StateId,
    reading: usize,
    transition_cursor: usize,
}

/// A compiled backtracking matcher.
#[derive(Debug, Clone)]
pub struct RichInterpreter {
    dfa: Automaton,
    needs_backtrack: Vec<bool>,
}

impl RichInterpreter {
    #[must_use]
    pub fn new(dfa: Automaton) -> Self {
        let needs_backtrack = dfa
            .state_ids()
            .map(|id| {
                let mut char_edges = 0u32;
                let mut non_char_edges = 0u32;
                for tid in dfa.outbounds(id) {
                    match dfa.get_transition(tid).kind {
                        TransitionKind::Chars(_) => char_edges += 1,
                        _ => non_char_edges += 1,
                    }
                }
                non_char_edges > 1 || (non_char_edges >= 1 && char_edges >= 1)
            })
            .collect();
        Self { dfa, needs_backtrack }
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

    /// Runs the backtracking scan anchored at `offset`.
    #[must_use]
    pub fn search_head(&self, input: &[u8], offset: usize) -> Option<MatchResult> {
        if offset > input.len() {
            return None;
        }

        let mut stack: Vec<StatusSaver> = Vec::new();
        let mut current = StatusSaver {
            state: self.dfa.start_state,
            reading: offset,
            transition_cursor: 0,
        };

        loop {
            let outbounds = self.dfa.get_state(current.state).outbounds.clone();
            let mut found = false;
            let mut idx = current.transition_cursor;
            let mut next_state = current.state;
            let mut next_reading = current.reading;

            while idx < outbounds.len() {
                let transition = self.dfa.get_transition(outbounds[idx]);
                let matched = match transition.kind {
                    TransitionKind::Chars(r) => {
                        if current.reading < input.len() && r.contains(input[current.reading]) {
                            next_reading = current.reading + 1;
                            true
                        } else {
                            false
                        }
                    }
                    TransitionKind::Nop => true,
                    TransitionKind::BeginString => offset == 0 && current.reading == offset,
                    TransitionKind::EndString => current.reading == input.len(),
                    TransitionKind::Epsilon => {
                        unreachable!("a determinized automaton carries no Epsilon transitions")
                    }
                };
                if matched {
                    found = true;
                    if self.needs_backtrack[current.state as usize] {
                        stack.push(StatusSaver {
                            state: current.state,
                            reading: current.reading,
                            transition_cursor: idx + 1,
                        });
                    }
                    next_state = transition.target;
                    break;
                }
                idx += 1;
            }

            if found {
                current = StatusSaver {
                    state: next_state,
                    reading: next_reading,
                    transition_cursor: 0,
                };
            }

            if self.dfa.get_state(current.state).accepted
                && (!found || current.reading == input.len())
            {
                break;
            }
            if !found {
                match stack.pop() {
                    Some(popped) => current = popped,
                    None => break,
                }
                if self.dfa.get_state(current.state).accepted {
                    break;
                }
            }
        }

        // `original_source` sets `acceptedState` to the terminate state
        // unconditionally, even on failure; that leaves no reliable sentinel
        // to distinguish a real accept from a dead end, so this crate honors
        // the spec's own stated `acceptedState = InvalidState` failure
        // contract instead.
        let matched = self.dfa.get_state(current.state).accepted;
        Some(MatchResult {
            start: offset as i32,
            length: if matched {
                (current.reading - offset) as i32
            } else {
                -1
            },
            terminate_state: current.state as i32,
            accepted_state: if matched { current.state as i32 } else { INVALID_STATE },
        })
    }
}
