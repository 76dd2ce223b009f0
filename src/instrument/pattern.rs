//! Instruction sequence patterns.
//!
//! A [`Pattern`] is a short run of instruction matchers plus a search mode.
//! `First` and `Last` pick one occurrence when a body contains several;
//! `Unique` treats more than one occurrence as a failure, which is what a
//! splice point uses when firing twice per call would be wrong.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::opcode::{Instruction, OpCode};

/// Matcher for one instruction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Matcher {
    /// Any instruction at all.
    Any,
    /// Any instruction with this opcode.
    Op(OpCode),
    /// A call (virtual or not) to a method with this name suffix.
    Calls(String),
    /// A field load of exactly this field.
    LoadsField(String),
}

impl Matcher {
    #[must_use]
    pub fn matches(&self, instruction: &Instruction) -> bool {
        match self {
            Matcher::Any => true,
            Matcher::Op(op) => instruction.op == *op,
            Matcher::Calls(method) => instruction.calls(method),
            Matcher::LoadsField(field) => {
                instruction.op == OpCode::LdField
                    && matches!(&instruction.operand, super::Operand::Field(f) if f == field)
            }
        }
    }
}

/// Which occurrence of a pattern to use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SearchMode {
    #[default]
    First,
    Last,
    /// Exactly one occurrence must exist.
    Unique,
}

/// Half-open instruction range `[start, end)` covered by a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchSpan {
    pub start: usize,
    pub end: usize,
}

impl MatchSpan {
    /// Index of the last matched instruction.
    #[must_use]
    pub const fn last(self) -> usize {
        self.end - 1
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("pattern is empty")]
    Empty,
    #[error("pattern not found")]
    NotFound,
    #[error("pattern matched {0} times, expected exactly one")]
    Ambiguous(usize),
}

/// A sequence of instruction matchers.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Pattern {
    matchers: Vec<Matcher>,
    mode: SearchMode,
}

impl Pattern {
    /// Create an empty pattern using `mode`.
    #[must_use]
    pub fn new(mode: SearchMode) -> Self {
        Self {
            matchers: Vec::new(),
            mode,
        }
    }

    /// Pattern for the first call to `method`.
    pub fn first_call(method: impl Into<String>) -> Self {
        Self::new(SearchMode::First).then(Matcher::Calls(method.into()))
    }

    /// Pattern for the last call to `method`.
    pub fn last_call(method: impl Into<String>) -> Self {
        Self::new(SearchMode::Last).then(Matcher::Calls(method.into()))
    }

    /// Pattern for the one and only call to `method`.
    pub fn unique_call(method: impl Into<String>) -> Self {
        Self::new(SearchMode::Unique).then(Matcher::Calls(method.into()))
    }

    /// Append a matcher (builder pattern).
    #[must_use]
    pub fn then(mut self, matcher: Matcher) -> Self {
        self.matchers.push(matcher);
        self
    }

    #[must_use]
    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    /// Locate this pattern in `body`.
    pub fn find(&self, body: &[Instruction]) -> Result<MatchSpan, PatternError> {
        let width = self.matchers.len();
        if width == 0 {
            return Err(PatternError::Empty);
        }
        if body.len() < width {
            return Err(PatternError::NotFound);
        }

        let mut hits = (0..=body.len() - width).filter(|&start| {
            self.matchers
                .iter()
                .zip(&body[start..start + width])
                .all(|(m, i)| m.matches(i))
        });

        let start = match self.mode {
            SearchMode::First => hits.next(),
            SearchMode::Last => hits.last(),
            SearchMode::Unique => {
                let all: Vec<usize> = hits.collect();
                match all.len() {
                    0 => None,
                    1 => Some(all[0]),
                    n => return Err(PatternError::Ambiguous(n)),
                }
            }
        };

        start
            .map(|start| MatchSpan {
                start,
                end: start + width,
            })
            .ok_or(PatternError::NotFound)
    }
}
