//! A POSIX-flavored byte-oriented regular expression engine: text or
//! builder-constructed patterns compiled through Thompson construction,
//! subset construction, and Hopcroft/Brzozowski minimization into either a
//! table-driven ("poor") or backtracking ("rich") matcher.
//!
//! The engine operates on raw bytes, not Unicode scalars, and excludes NUL
//! (`0x00`) from the matchable alphabet; see [`core::parser`]'s handling of
//! `.` and [`builder::any_char`].

pub mod builder;
pub mod core;
pub mod errors;

pub use crate::core::interpreter::poor::PoorInterpreter;
pub use crate::core::interpreter::rich::RichInterpreter;
pub use crate::core::interpreter::MatchResult;
pub use crate::core::BuildArtifacts;
pub use crate::errors::{BuildError, ParseError, ParseErrorKind};

/// A compiled pattern, bundling both interpreter flavors behind one handle.
///
/// Mirrors the teacher's `BuildArtifacts` aggregation pattern, generalized
/// with the two interpreter flavors §6 describes. `poor()` is `None` when
/// the pattern needs anchors or other non-`Chars` transitions the table-
/// driven matcher cannot express; `rich()` is always available.
#[derive(Debug, Clone)]
pub struct Regex {
    artifacts: BuildArtifacts,
    poor: Option<PoorInterpreter>,
    rich: RichInterpreter,
}

impl Regex {
    /// Parses and compiles `pattern`, building both DFA flavors and their
    /// interpreters eagerly.
    pub fn compile(pattern: &str) -> Result<Self, BuildError> {
        let artifacts = BuildArtifacts::build(pattern)?;
        let poor = artifacts.poor_interpreter().ok();
        let rich = artifacts.rich_interpreter();
        Ok(Self {
            artifacts,
            poor,
            rich,
        })
    }

    /// The table-driven matcher, if this pattern is expressible without
    /// anchors or other non-`Chars` transitions.
    #[must_use]
    pub fn poor(&self) -> Option<&PoorInterpreter> {
        self.poor.as_ref()
    }

    /// The backtracking matcher, always available.
    #[must_use]
    pub fn rich(&self) -> &RichInterpreter {
        &self.rich
    }

    /// Every intermediate artifact (AST, NFA, both DFA flavors) produced
    /// while compiling this pattern.
    #[must_use]
    pub fn artifacts(&self) -> &BuildArtifacts {
        &self.artifacts
    }

    /// Whether `input` matches the whole pattern. Prefers the table-driven
    /// matcher when available, falling back to backtracking.
    #[must_use]
    pub fn is_match(&self, input: &[u8]) -> bool {
        match &self.poor {
            Some(poor) => poor.is_match(input),
            None => self.rich.is_match(input),
        }
    }

    /// Finds the first match at or after `offset`.
    #[must_use]
    pub fn search(&self, input: &[u8], offset: usize) -> Option<MatchResult> {
        match &self.poor {
            Some(poor) => poor.search(input, offset),
            None => self.rich.search(input, offset),
        }
    }
}
