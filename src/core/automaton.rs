//! The bipartite state/transition graph shared by every automaton stage
//! (ε-NFA, DFA, minimized DFA).
//!
//! Grounded in `original_source/include/finite_automaton.h`'s `State` /
//! `Transition` / `Automaton` classes. The original links states and
//! transitions with `shared_ptr`s, which is awkward in Rust once repetition
//! introduces cycles; here both live in arenas owned by `Automaton` and are
//! referred to by index, per `SPEC_FULL.md`'s §3/§9 notes.

use crate::core::range::Range;

pub type StateId = u32;
pub type TransitionId = u32;

/// The kind of condition a [`Transition`] checks before it may be taken.
///
/// Mirrors `Transition::Type` in `finite_automaton.h`. `Nop` consumes no
/// input and always succeeds, like `Epsilon`, but the rich interpreter
/// treats the two differently: `Nop` marks "this loop iteration stops here"
/// for greedy/lazy repetition, `Epsilon` is invisible bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionKind {
    Chars(Range),
    Epsilon,
    BeginString,
    EndString,
    Nop,
}

#[derive(Debug, Clone)]
pub struct Transition {
    pub source: StateId,
    pub target: StateId,
    pub kind: TransitionKind,
}

#[derive(Debug, Clone, Default)]
pub struct State {
    /// Transitions leading into this state, in the order they were added.
    pub inbounds: Vec<TransitionId>,
    /// Transitions leading out of this state, in the order they were added.
    /// This order is load-bearing: it is the priority order the rich
    /// interpreter and the priority-preserving closure rely on.
    pub outbounds: Vec<TransitionId>,
    pub accepted: bool,
}

/// An arena-backed automaton graph.
#[derive(Debug, Clone, Default)]
pub struct Automaton {
    states: Vec<State>,
    transitions: Vec<Transition>,
    pub start_state: StateId,
}

impl Automaton {
    #[must_use]
    pub fn new() -> Self {
        Self {
            states: Vec::new(),
            transitions: Vec::new(),
            start_state: 0,
        }
    }

    pub fn add_state(&mut self) -> StateId {
        let id = self.states.len() as StateId;
        self.states.push(State::default());
        id
    }

    pub fn add_transition(&mut self, source: StateId, target: StateId, kind: TransitionKind) -> TransitionId {
        let id = self.transitions.len() as TransitionId;
        self.transitions.push(Transition {
            source,
            target,
            kind,
        });
        self.states[source as usize].outbounds.push(id);
        self.states[target as usize].inbounds.push(id);
        id
    }

    #[must_use]
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    #[must_use]
    pub fn get_state(&self, id: StateId) -> &State {
        &self.states[id as usize]
    }

    pub fn get_state_mut(&mut self, id: StateId) -> &mut State {
        &mut self.states[id as usize]
    }

    #[must_use]
    pub fn get_transition(&self, id: TransitionId) -> &Transition {
        &self.transitions[id as usize]
    }

    #[must_use]
    pub fn state_ids(&self) -> impl Iterator<Item = StateId> {
        0..self.states.len() as StateId
    }

    pub fn set_accepted(&mut self, id: StateId, accepted: bool) {
        self.states[id as usize].accepted = accepted;
    }

    /// Transitions out of `state` whose kind is `Chars`.
    pub fn chars_out(&self, state: StateId) -> impl Iterator<Item = (TransitionId, Range)> + '_ {
        self.get_state(state)
            .outbounds
            .iter()
            .filter_map(move |&id| match self.get_transition(id).kind {
                TransitionKind::Chars(r) => Some((id, r)),
                _ => None,
            })
    }

    pub fn outbounds(&self, state: StateId) -> impl Iterator<Item = TransitionId> + '_ {
        self.get_state(state).outbounds.iter().copied()
    }

    /// Reverses every transition and flips start/accept roles.
    ///
    /// Ported from `original_source/src/automaton.cpp`'s `Automaton::reverse`:
    /// a fresh start state is added, epsilon-linked to every formerly
    /// accepting state (whose `accepted` flag is then cleared), the old
    /// start state becomes the sole accepting state, and every transition's
    /// `source`/`target` is swapped.
    #[must_use]
    pub fn reverse(&self) -> Automaton {
        let mut out = Automaton::new();
        for _ in 0..self.states.len() {
            out.add_state();
        }
        let new_start = out.add_state();
        out.start_state = new_start;

        for t in &self.transitions {
            out.add_transition(t.target, t.source, t.kind);
        }

        for id in self.state_ids() {
            if self.get_state(id).accepted {
                out.add_transition(new_start, id, TransitionKind::Epsilon);
            }
        }
        out.set_accepted(self.start_state, true);
        out
    }

    /// Drops every state and transition unreachable from `start_state`.
    ///
    /// Ported from `original_source/src/automaton.cpp`'s
    /// `Automaton::reachableTrim`.
    #[must_use]
    pub fn reachable_trim(&self) -> Automaton {
        let mut reachable = vec![false; self.states.len()];
        let mut stack = vec![self.start_state];
        reachable[self.start_state as usize] = true;
        while let Some(id) = stack.pop() {
            for &tid in &self.get_state(id).outbounds {
                let target = self.get_transition(tid).target;
                if !reachable[target as usize] {
                    reachable[target as usize] = true;
                    stack.push(target);
                }
            }
        }

        let mut remap = vec![0 as StateId; self.states.len()];
        let mut out = Automaton::new();
        for (old_id, &keep) in reachable.iter().enumerate() {
            if keep {
                remap[old_id] = out.add_state();
            }
        }
        out.start_state = remap[self.start_state as usize];

        for id in self.state_ids() {
            if !reachable[id as usize] {
                continue;
            }
            if self.get_state(id).accepted {
                out.set_accepted(remap[id as usize], true);
            }
            for &tid in &self.get_state(id).outbounds {
                let t = self.get_transition(tid);
                out.add_transition(remap[t.source as usize], remap[t.target as usize], t.kind);
            }
        }
        out
    }
}

/// Epsilon predicate used while determinizing for the poor interpreter:
/// treats both `Epsilon` and `Nop` as non-consuming, matching
/// `original_source`'s `poorEpsilonChecker`: the poor interpreter has no
/// notion of "stop here for priority" so `Nop` collapses into plain epsilon.
#[must_use]
pub fn poor_epsilon_checker(kind: TransitionKind) -> bool {
    matches!(kind, TransitionKind::Epsilon | TransitionKind::Nop)
}

/// Epsilon predicate used while determinizing for the rich interpreter:
/// only `Epsilon` is transparent; `Nop` is a real (zero-width) transition
/// that must survive into the DFA so the rich interpreter can see it and
/// stop a greedy/lazy loop at the right priority.
#[must_use]
pub fn rich_epsilon_checker(kind: TransitionKind) -> bool {
    matches!(kind, TransitionKind::Epsilon)
}
