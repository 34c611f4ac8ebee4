//! Error types for the engine core

use thiserror::Error;

use crate::WIDTH;

/// Faults surfaced by the position and search operations
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    #[error("column {column} is out of range, columns must be between 0 and {}", WIDTH - 1)]
    ColumnOutOfRange { column: usize },

    #[error("column {column} is full")]
    ColumnFull { column: usize },

    #[error("game is already over, there is no move to search for")]
    SearchOnTerminalPosition,

    #[error("search depth must be at least one ply")]
    ZeroDepth,

    #[error("could not parse '{character}' at index {index} as a column")]
    InvalidMoveCharacter { character: char, index: usize },
}

pub type Result<T, E = EngineError> = std::result::Result<T, E>;
