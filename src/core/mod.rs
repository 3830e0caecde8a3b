//! The compiler pipeline: parse → normalize/unify → Thompson → powerset →
//! minimize → interpreters.

pub mod ast;
pub mod automaton;
pub mod charset;
pub mod hopcroft;
pub mod interpreter;
pub mod parser;
pub mod powerset;
pub mod range;
pub mod thompson;

use self::ast::Ast;
use self::automaton::{poor_epsilon_checker, rich_epsilon_checker, Automaton};
use self::interpreter::poor::PoorInterpreter;
use self::interpreter::rich::RichInterpreter;
use crate::errors::BuildError;

/// Aggregates every intermediate and final artifact produced while
/// compiling a pattern, the way the teacher's `BuildArtifacts` aggregates
/// `ast`/`nfa`/`dfa`/`min_dfa`, gathered here so a caller (or test) can
/// inspect any stage without recomputing it.
#[derive(Debug, Clone)]
pub struct BuildArtifacts {
    pub ast: Ast,
    pub nfa: Automaton,
    pub poor_dfa: Automaton,
    pub poor_min_dfa: Automaton,
    pub rich_dfa: Automaton,
    pub rich_min_dfa: Automaton,
}

impl BuildArtifacts {
    /// Runs the full pipeline: parse, normalize bracket classes, unify the
    /// alphabet across sets, then build and minimize both flavors of DFA.
    pub fn build(pattern: &str) -> Result<Self, BuildError> {
        let mut ast = parser::parse(pattern)?;
        charset::normalize(&mut ast)?;
        charset::unify(&mut ast)?;

        let nfa = thompson::build(&ast)?;

        let poor_dfa = powerset::build(&nfa, poor_epsilon_checker);
        let poor_min_dfa = hopcroft::minimize(&poor_dfa);

        let rich_dfa = powerset::build(&nfa, rich_epsilon_checker);
        let rich_min_dfa = hopcroft::minimize(&rich_dfa);

        Ok(Self {
            ast,
            nfa,
            poor_dfa,
            poor_min_dfa,
            rich_dfa,
            rich_min_dfa,
        })
    }

    /// Compiles the table-driven matcher from the minimized poor-flavor DFA.
    /// Fails if the pattern contains anchors or other non-`Chars`
    /// transitions the poor interpreter cannot express (see
    /// [`BuildError::InvalidForPoorInterpreter`]).
    pub fn poor_interpreter(&self) -> Result<PoorInterpreter, BuildError> {
        PoorInterpreter::new(&self.poor_min_dfa)
    }

    /// Builds the backtracking matcher from the minimized rich-flavor DFA.
    #[must_use]
    pub fn rich_interpreter(&self) -> RichInterpreter {
        RichInterpreter::new(self.rich_min_dfa.clone())
    }
}
