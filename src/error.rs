use chrono::{DateTime, Utc};
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StateError {
    /// The game has no start time.
    NotStarted,
    /// The game has no end time.
    NotFinished,
    EndBeforeStart {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    AlreadyFinished,
    TooManyInvisible {
        invisible: usize,
        len: usize,
    },
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StateError::NotStarted => write!(f, "game has no start time"),
            StateError::NotFinished => write!(f, "game has no end time"),
            StateError::EndBeforeStart { start, end } => {
                write!(f, "game ends at {end} before it starts at {start}")
            }
            StateError::AlreadyFinished => write!(f, "game end time is already set"),
            StateError::TooManyInvisible { invisible, len } => write!(
                f,
                "pile of {len} cards cannot hold {invisible} invisible cards"
            ),
        }
    }
}

impl std::error::Error for StateError {}
