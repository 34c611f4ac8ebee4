//! The engine holds the game being played and answers move requests

use log::{debug, info};

use crate::{
    error::Result,
    position::{Position, Side},
    tree::GameTree,
    DEFAULT_DEPTH, ENGINE_NAME,
};

/// Settings an engine is created with
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// The name reported to a coordinator
    pub name: String,
    /// The number of plies searched for every move
    pub depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            name: ENGINE_NAME.to_string(),
            depth: DEFAULT_DEPTH,
        }
    }
}

/// Plays as `Side::PlayerOne` against an opponent whose moves are relayed in
///
/// The engine owns the authoritative position. Every move request builds a
/// fresh [`GameTree`] from a copy of it, and the chosen move is played back
/// onto it.
pub struct Engine {
    config: EngineConfig,
    position: Position,
    last_score: Option<i32>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Creates an engine with the default name and search depth
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Creates an engine that searches `depth` plies
    pub fn with_depth(depth: usize) -> Self {
        Self::with_config(EngineConfig {
            depth,
            ..EngineConfig::default()
        })
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            position: Position::new(),
            last_score: None,
        }
    }

    /// Replaces the current position, for example to resume a game
    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn depth(&self) -> usize {
        self.config.depth
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    /// The score of the engine's last move, if it has moved yet
    pub fn score(&self) -> Option<i32> {
        self.last_score
    }

    /// Plays a move for `side` on the current position
    pub fn apply_move(&mut self, column: usize, side: Side) -> Result<()> {
        self.position.drop(column, side)?;
        debug!("{:?} played column {}\n{}", side, column, self.position);
        Ok(())
    }

    /// Searches the current position, plays the best move for the engine and
    /// returns its column and score
    pub fn best_move(&mut self) -> Result<(usize, i32)> {
        let mut tree = GameTree::new(&self.position, self.config.depth);
        let column = tree.best_move()?;
        let score = tree.best_score().unwrap_or_default();

        self.position.drop(column, Side::PlayerOne)?;
        self.last_score = Some(score);
        info!(
            "engine played column {} (score {}, {} nodes searched)",
            column, score, tree.nodes_searched
        );
        Ok((column, score))
    }

    /// Counts the leaves `depth` plies from the current position without
    /// changing it
    pub fn node_count(&self, depth: usize) -> u64 {
        GameTree::new(&self.position, depth).perft(depth)
    }
}
