use thiserror::Error;

use crate::cell::Kind;
use crate::rule_set::RuleError;

pub type Result<T, E = LifeError> = std::result::Result<T, E>;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum LifeError {
    #[error("No rules installed, call `World::configure` first")]
    Unconfigured,

    #[error("We do not have a time machine (asked for t = {t})")]
    NoTimeMachine { t: i64 },

    #[error("A level {level} square can't go further forward than {horizon}, asked for {t}")]
    HorizonExceeded { level: u8, t: u64, horizon: u64 },

    #[error("A level {level} node has no future")]
    TooSmall { level: u8 },

    #[error("Quadrants must share a level, got {levels:?} (nw, ne, se, sw)")]
    MixedLevels { levels: [u8; 4] },

    #[error("A square of level {level} can't sit on quadrants that make it level {expected}")]
    WrongLevel { level: u8, expected: u8 },

    #[error("A {kind:?} square can't be built at level {level}")]
    InvalidKind { kind: Kind, level: u8 },

    #[error("Invalid rule: {0}")]
    InvalidRule(#[from] RuleError),

    #[error("Growing to level {level} would exceed the maximum level")]
    LevelOverflow { level: u32 },

    #[error("Can't crop a level {from} square to level {to}")]
    InvalidCrop { from: u8, to: u8 },

    #[error("Invalid pattern: {reason}")]
    InvalidPattern { reason: String },
}
