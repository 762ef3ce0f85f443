use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::cell::CellState;

/// Rules of Conway's Game of Life.
pub const B3S23: RuleSet = RuleSet::from_bits(0b1000, 0b1100);

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RuleError {
    #[error("Empty rule")]
    Empty,

    #[error("Neighbour count {count} is out of range, expected 0 through 8")]
    OutOfRange { count: u32 },

    #[error("Unexpected character '{got}'")]
    InvalidChar { got: char },

    #[error("Expected 'b' or 's' before '{got}'")]
    MissingPrefix { got: char },

    #[error("The {part} part is defined twice")]
    Duplicate { part: &'static str },
}

/// # Representation
/// Life rules are represented as
/// ```notrust
/// |------birth------|
/// 0000_0000_0000_0000_0000_0000_0000_0000
///                     |----survival-----|
/// ```
///
/// # Examples
/// ```notrust
/// b3s23:                0000_0000_0000_1000_0000_0000_0000_1100
///
/// b0s0:                 0000_0000_0000_0001_0000_0000_0000_0001
/// b012345678s012345678: 0000_0001_1111_1111_0000_0001_1111_1111
/// ```
///
/// # Format
///
/// Either `b[0-8]*/s[0-8]*` (the slash and case are optional), or the nameless
/// `[0-8]*/[0-8]*` form, which lists survivals first: `23/3` is Life.
///
/// See: https://conwaylife.com/wiki/Rulestring
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct RuleSet {
    rule: u32,
}

impl Default for RuleSet {
    fn default() -> Self {
        B3S23
    }
}

impl RuleSet {
    /// Create a new `RuleSet` for the given births and survivals. For both `b` and
    /// `s`, numbers are set on a bit basis. For instance if bit `i` in `b` is on, it
    /// means `i` is included in the set of births. Any bit past the 8th is ignored.
    pub const fn from_bits(b: u16, s: u16) -> Self {
        let b = b & 0x1FF;
        let s = s & 0x1FF;

        Self {
            rule: (b as u32) << 16 | s as u32,
        }
    }

    /// Create a `RuleSet` from lists of neighbour counts, e.g. `RuleSet::new(&[2, 3], &[3])` for
    /// Life. Every count must be in `0..=8`.
    pub fn new(survival: &[u8], birth: &[u8]) -> Result<Self, RuleError> {
        let s = counts_to_bits(survival)?;
        let b = counts_to_bits(birth)?;

        Ok(Self::from_bits(b, s))
    }

    pub fn births(&self) -> u16 {
        ((self.rule & 0x1FF0000) >> 0x10) as u16
    }

    pub fn survivals(&self) -> u16 {
        (self.rule & 0x1FF) as u16
    }

    /// The next state of a cell in `state` with `neighbours` live cells in its Moore neighbourhood.
    pub fn transition(&self, state: CellState, neighbours: u8) -> CellState {
        let counts = match state {
            CellState::Alive => self.survivals(),
            CellState::Dead => self.births(),
        };

        CellState::from(neighbours <= 8 && counts & (1 << neighbours) != 0)
    }
}

fn counts_to_bits(counts: &[u8]) -> Result<u16, RuleError> {
    let mut n = 0;

    for &count in counts {
        if count > 8 {
            return Err(RuleError::OutOfRange {
                count: count as u32,
            });
        }

        n |= 1 << count;
    }

    Ok(n)
}

/// Convert the human readable neighbour counts to a packed bit representation
fn digits_to_bits(digits: &str) -> Result<u16, RuleError> {
    let mut n = 0;

    for c in digits.chars() {
        let count = c.to_digit(10).ok_or(RuleError::InvalidChar { got: c })?;
        if count > 8 {
            return Err(RuleError::OutOfRange { count });
        }

        n |= 1 << count;
    }

    Ok(n)
}

// Parse rules that look like 23/3, survivals first.
fn parse_nameless_rule(s: &str) -> Result<RuleSet, RuleError> {
    let Some((survivals, births)) = s.split_once('/') else {
        // No slash at all means a bare list of survivals.
        return Ok(RuleSet::from_bits(0, digits_to_bits(s)?));
    };

    let s = digits_to_bits(survivals)?;
    let b = digits_to_bits(births)?;

    Ok(RuleSet::from_bits(b, s))
}

impl FromStr for RuleSet {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        match s.chars().next() {
            None => return Err(RuleError::Empty),
            Some(c) if c.is_ascii_digit() || c == '/' => return parse_nameless_rule(s),
            Some(_) => {}
        }

        enum State {
            Start,
            Birth,
            Survival,
        }

        let mut state = State::Start;
        let (mut seen_b, mut seen_s) = (false, false);
        let (mut b, mut s_bits) = (0u16, 0u16);

        for c in s.chars() {
            match c {
                'b' | 'B' => {
                    if seen_b {
                        return Err(RuleError::Duplicate { part: "birth" });
                    }

                    seen_b = true;
                    state = State::Birth;
                }
                's' | 'S' => {
                    if seen_s {
                        return Err(RuleError::Duplicate { part: "survival" });
                    }

                    seen_s = true;
                    state = State::Survival;
                }
                '/' => {}
                n => {
                    let count = n.to_digit(10).ok_or(RuleError::InvalidChar { got: n })?;

                    if count > 8 {
                        return Err(RuleError::OutOfRange { count });
                    }

                    match state {
                        State::Start => return Err(RuleError::MissingPrefix { got: n }),
                        State::Birth => b |= 1 << count,
                        State::Survival => s_bits |= 1 << count,
                    }
                }
            }
        }

        Ok(RuleSet::from_bits(b, s_bits))
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = |bits: u16| -> String {
            (0..=8u8)
                .filter(|&i| bits & (1 << i) != 0)
                .map(|i| char::from(b'0' + i))
                .collect()
        };

        write!(f, "B{}/S{}", digits(self.births()), digits(self.survivals()))
    }
}

impl fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RuleSet({self})")
    }
}
