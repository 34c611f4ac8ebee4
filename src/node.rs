//! Game tree nodes and the leaf evaluation heuristic

use crate::{
    position::{Position, Side},
    WIDTH,
};

/// Score contribution of a completed line of four
pub const WIN_SCORE: i32 = 100;
/// Score contribution of each line of three
pub const THREE_SCORE: i32 = 10;
/// Score contribution of each line of two
pub const TWO_SCORE: i32 = 1;

/// Scores a position from the point of view of `Side::PlayerOne`
///
/// Each side earns `WIN_SCORE` for a win plus a weighted count of its lines
/// of three and two, and the result is the first player's total minus the
/// second player's. Positive scores favour `Side::PlayerOne` whichever side
/// is to move.
pub fn evaluate(position: &Position) -> i32 {
    side_score(position, Side::PlayerOne) - side_score(position, Side::PlayerTwo)
}

fn side_score(position: &Position, side: Side) -> i32 {
    let win = if position.has_won(side) { WIN_SCORE } else { 0 };
    win + THREE_SCORE * position.count_run(side, 3) as i32
        + TWO_SCORE * position.count_run(side, 2) as i32
}

/// A position in the game tree together with every position one move away
///
/// A node without children is either a finished game or sits at the depth
/// limit of the tree, ask the position to tell the two apart.
#[derive(Clone, Debug)]
pub struct SearchNode {
    position: Position,
    // the column played to reach this node, None for the root
    column: Option<usize>,
    children: Vec<SearchNode>,
}

impl SearchNode {
    /// Creates an unexpanded node
    pub fn new(position: Position) -> Self {
        Self {
            position,
            column: None,
            children: Vec::new(),
        }
    }

    /// Creates a node and expands every line of play `depth` plies deep,
    /// with `side` to move first
    pub fn expand(position: Position, side: Side, depth: usize) -> Self {
        let mut node = Self::new(position);
        node.expand_children(side, depth);
        node
    }

    fn expand_children(&mut self, side: Side, depth: usize) {
        if depth == 0 || self.position.is_terminal() {
            return;
        }

        // children are kept in column order, the search relies on it
        for column in 0..WIDTH {
            let mut next = self.position.clone();
            if next.drop(column, side).is_err() {
                continue;
            }
            let mut child = Self::new(next);
            child.column = Some(column);
            child.expand_children(side.opponent(), depth - 1);
            self.children.push(child);
        }
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    /// The column played to reach this node from its parent
    pub fn column(&self) -> Option<usize> {
        self.column
    }

    pub fn children(&self) -> &[SearchNode] {
        &self.children
    }

    /// Heuristic score of this node's position, see [`evaluate`]
    pub fn evaluate(&self) -> i32 {
        evaluate(&self.position)
    }

    /// Counts the leaves reachable within `depth` plies
    ///
    /// A node at depth 0 or holding a finished game counts as one leaf.
    pub fn perft(&self, depth: usize) -> u64 {
        if depth == 0 || self.position.is_terminal() {
            return 1;
        }
        self.children
            .iter()
            .map(|child| child.perft(depth - 1))
            .sum()
    }

    /// The number of nodes in this subtree, including this one
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(SearchNode::size).sum::<usize>()
    }
}
