//! A fully expanded game tree searched with minimax and alpha-beta pruning

use log::debug;

use std::time::Instant;

use crate::{
    error::{EngineError, Result},
    node::SearchNode,
    position::{Position, Side},
};

/// A game tree rooted at a copy of a position, with `Side::PlayerOne` to move
///
/// # Notes
/// The whole tree is built when the `GameTree` is created and is never
/// updated afterwards; a new tree is built for every search. The first
/// player maximises the score from [`evaluate`](crate::node::evaluate) and the
/// second player minimises it.
pub struct GameTree {
    root: SearchNode,
    depth: usize,
    best_score: Option<i32>,

    /// The number of nodes visited by the last search (for diagnostics only)
    pub nodes_searched: usize,
}

impl GameTree {
    /// Copies `position` and expands every line of play `depth` plies deep
    pub fn new(position: &Position, depth: usize) -> Self {
        let start = Instant::now();
        let root = SearchNode::expand(position.clone(), Side::PlayerOne, depth);
        debug!(
            "expanded game tree to depth {} in {:.3}ms",
            depth,
            start.elapsed().as_secs_f64() * 1000.0
        );

        Self {
            root,
            depth,
            best_score: None,
            nodes_searched: 0,
        }
    }

    pub fn root(&self) -> &SearchNode {
        &self.root
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The score of the move chosen by the last call to [`best_move`](Self::best_move)
    pub fn best_score(&self) -> Option<i32> {
        self.best_score
    }

    /// The number of nodes in the tree
    pub fn size(&self) -> usize {
        self.root.size()
    }

    /// Finds the column with the highest minimax score for the first player
    ///
    /// The root's children are scored one by one with a full window, and the
    /// first column with the strictly greatest score wins ties. The score is
    /// kept and can be read back with [`best_score`](Self::best_score).
    pub fn best_move(&mut self) -> Result<usize> {
        if self.root.position().is_terminal() {
            return Err(EngineError::SearchOnTerminalPosition);
        }
        if self.depth == 0 {
            return Err(EngineError::ZeroDepth);
        }

        let start = Instant::now();
        let mut nodes = 1;
        let mut best: Option<(usize, i32)> = None;

        let candidates = self
            .root
            .children()
            .iter()
            .filter_map(|child| child.column().map(|column| (column, child)));
        for (column, child) in candidates {
            // children are only ever created for playable columns
            debug_assert!(!self.root.position().is_full(column));

            let score =
                Self::alpha_beta(child, self.depth - 1, i32::MIN, i32::MAX, false, &mut nodes);
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((column, score));
            }
        }

        let (column, score) = best.ok_or(EngineError::SearchOnTerminalPosition)?;
        self.nodes_searched = nodes;
        self.best_score = Some(score);

        debug!(
            "searched {} nodes at depth {} in {:.3}ms, best column {} scores {}",
            nodes,
            self.depth,
            start.elapsed().as_secs_f64() * 1000.0,
            column,
            score
        );
        Ok(column)
    }

    /// Minimax search with alpha-beta pruning
    ///
    /// Returns the score of `node` as seen from `depth` plies above the
    /// leaves, with the first player to move if `maximising` is set.
    fn alpha_beta(
        node: &SearchNode,
        depth: usize,
        mut alpha: i32,
        mut beta: i32,
        maximising: bool,
        nodes: &mut usize,
    ) -> i32 {
        *nodes += 1;

        if depth == 0 || node.position().is_terminal() {
            return node.evaluate();
        }

        if maximising {
            let mut value = i32::MIN;
            for child in node.children() {
                value = value.max(Self::alpha_beta(child, depth - 1, alpha, beta, false, nodes));
                alpha = alpha.max(value);
                // the minimising player already has a better option elsewhere
                if alpha >= beta {
                    break;
                }
            }
            value
        } else {
            let mut value = i32::MAX;
            for child in node.children() {
                value = value.min(Self::alpha_beta(child, depth - 1, alpha, beta, true, nodes));
                beta = beta.min(value);
                if alpha >= beta {
                    break;
                }
            }
            value
        }
    }

    /// Counts the leaves reachable from the root within `depth` plies
    ///
    /// Unlike [`SearchNode::perft`], a request for depth 0 or from a finished
    /// game counts nothing and returns 0. Depths beyond the depth the tree was
    /// built with only see the leaves that were expanded.
    pub fn perft(&self, depth: usize) -> u64 {
        if depth == 0 || self.root.position().is_terminal() {
            return 0;
        }

        let start = Instant::now();
        let count = self.root.perft(depth);
        let elapsed = start.elapsed().as_secs_f64();
        debug!(
            "perft {}: {} leaves in {:.3}ms",
            depth,
            count,
            elapsed * 1000.0
        );
        count
    }
}
