//! A depth-limited minimax agent for playing the board game 'Connect 4'
//!
//! This agent expands every position reachable within a fixed number of
//! plies, scores the leaves with a simple pattern heuristic and picks the
//! move that maximises that score under adversarial play.
//!
//! # Basic Usage
//!
//! ```
//! use connect4_minimax::{engine::Engine, position::Side};
//!
//!# use std::error::Error;
//!# fn main() -> Result<(), Box<dyn Error>> {
//! let mut engine = Engine::with_depth(4);
//! engine.apply_move(3, Side::PlayerTwo)?;
//! let (column, _score) = engine.best_move()?;
//!
//! assert!(column < connect4_minimax::WIDTH);
//! assert_eq!(engine.node_count(1), 7);
//!# Ok(())
//!# }
//! ```

use static_assertions::*;
pub use anyhow;

pub mod error;

pub mod position;

pub mod node;

pub mod tree;

pub mod engine;

pub mod protocol;

mod test;

pub use error::{EngineError, Result};

/// The width of the game board in tiles
pub const WIDTH: usize = 7;

/// The height of the game board in tiles
pub const HEIGHT: usize = 6;

/// The number of aligned tiles needed to win
pub const WIN_LENGTH: usize = 4;

/// The number of plies searched when choosing a move
pub const DEFAULT_DEPTH: usize = 7;

/// The name the engine reports to a coordinator
pub const ENGINE_NAME: &str = "connect4-minimax";

// a winning line has to fit on the board in every direction
const_assert!(WIN_LENGTH <= WIDTH && WIN_LENGTH <= HEIGHT);
const_assert!(DEFAULT_DEPTH > 0);
