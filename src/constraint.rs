//! Letter constraints used by query filters
//!
//! The positional syntax `<position><letter>` (e.g. `"5S"`) is parsed
//! with a small pest grammar. Positions are 1-based and count letters
//! only, ignoring separators.

use crate::encoder::char_at;
use crate::error::QueryError;
use pest::Parser;
use pest_derive::Parser;
use std::str::FromStr;

#[derive(Parser)]
#[grammar = "constraint.pest"]
struct ConstraintParser;

/// Requires `letter` at 1-based `position`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionalConstraint {
    pub position: usize,
    pub letter: char,
}

impl PositionalConstraint {
    pub fn new(position: usize, letter: char) -> Self {
        Self {
            position,
            letter: letter.to_ascii_lowercase(),
        }
    }

    /// Parse the compact `"5S"` form.
    ///
    /// Anything else, including position 0, is a `MalformedConstraint`.
    pub fn parse(input: &str) -> Result<Self, QueryError> {
        let malformed = || QueryError::MalformedConstraint(input.to_string());

        let mut pairs =
            ConstraintParser::parse(Rule::positional, input).map_err(|_| malformed())?;
        let Some(root) = pairs.next() else {
            return Err(malformed());
        };
        let mut inner = root.into_inner();
        let (Some(position), Some(letter)) = (inner.next(), inner.next()) else {
            return Err(malformed());
        };

        let position: usize = position.as_str().parse().map_err(|_| malformed())?;
        if position == 0 {
            return Err(malformed());
        }
        let letter = letter.as_str().chars().next().ok_or_else(malformed)?;

        Ok(Self::new(position, letter))
    }

    pub fn matches(&self, word: &str) -> bool {
        char_at(word, self.position) == Some(self.letter)
    }
}

impl FromStr for PositionalConstraint {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Case-insensitive set of ASCII letters a word must all contain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LetterSet(u32);

impl LetterSet {
    /// Collect the letters of `s`; other characters are ignored
    pub fn parse(s: &str) -> Self {
        Self(letter_mask(s))
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// True if `word` contains every letter of the set
    pub fn matches(&self, word: &str) -> bool {
        letter_mask(word) & self.0 == self.0
    }
}

fn letter_mask(s: &str) -> u32 {
    s.chars()
        .filter(char::is_ascii_alphabetic)
        .fold(0, |mask, c| {
            mask | 1 << (c.to_ascii_lowercase() as u8 - b'a')
        })
}
