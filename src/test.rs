#[cfg(test)]
pub mod test {
    use anyhow::Result;

    use crate::{
        engine::Engine,
        node::{evaluate, SearchNode},
        position::{Cell, Position, Side},
        tree::GameTree,
        EngineError, HEIGHT, WIDTH,
    };

    use crate::position::Side::{PlayerOne as One, PlayerTwo as Two};

    fn play(position: &mut Position, moves: &[(usize, Side)]) -> Result<()> {
        for &(column, side) in moves {
            position.drop(column, side)?;
        }
        Ok(())
    }

    // plain minimax over the same tree, returning the chosen column, its
    // score and the number of nodes visited
    fn minimax_without_pruning(tree: &GameTree) -> (usize, i32, usize) {
        fn minimax(node: &SearchNode, depth: usize, maximising: bool, nodes: &mut usize) -> i32 {
            *nodes += 1;
            if depth == 0 || node.position().is_terminal() {
                return node.evaluate();
            }
            let scores = node
                .children()
                .iter()
                .map(|child| minimax(child, depth - 1, !maximising, nodes));
            if maximising {
                scores.max().unwrap()
            } else {
                scores.min().unwrap()
            }
        }

        let mut nodes = 1;
        let mut best: Option<(usize, i32)> = None;
        for child in tree.root().children() {
            let score = minimax(child, tree.depth() - 1, false, &mut nodes);
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((child.column().unwrap(), score));
            }
        }
        let (column, score) = best.unwrap();
        (column, score, nodes)
    }

    #[test]
    pub fn drop_respects_gravity() -> Result<()> {
        let mut position = Position::new();
        assert_eq!(position.drop(2, One)?, 0);
        assert_eq!(position.drop(2, Two)?, 1);
        assert_eq!(position.drop(3, Two)?, 0);

        assert_eq!(position.cell(0, 2), Cell::PlayerOne);
        assert_eq!(position.cell(1, 2), Cell::PlayerTwo);
        assert_eq!(position.cell(2, 2), Cell::Empty);
        assert_eq!(position.num_moves(), 3);
        Ok(())
    }

    #[test]
    pub fn drop_rejects_illegal_columns() -> Result<()> {
        let mut position = Position::new();
        assert_eq!(
            position.drop(WIDTH, One),
            Err(EngineError::ColumnOutOfRange { column: WIDTH })
        );

        for _ in 0..HEIGHT {
            position.drop(4, One)?;
        }
        assert!(position.is_full(4));
        assert!(!position.is_full(3));

        let before = position.clone();
        assert_eq!(position.drop(4, Two), Err(EngineError::ColumnFull { column: 4 }));
        assert_eq!(position, before);
        Ok(())
    }

    #[test]
    pub fn from_moves() -> Result<()> {
        let position = Position::from_moves("0121")?;
        assert_eq!(position.cell(0, 0), Cell::PlayerOne);
        assert_eq!(position.cell(0, 1), Cell::PlayerTwo);
        assert_eq!(position.cell(0, 2), Cell::PlayerOne);
        assert_eq!(position.cell(1, 1), Cell::PlayerTwo);
        assert_eq!(position.to_string().lines().last(), Some("XOX...."));

        assert_eq!(
            Position::from_moves("01a"),
            Err(EngineError::InvalidMoveCharacter {
                character: 'a',
                index: 2
            })
        );
        assert_eq!(
            Position::from_moves("7"),
            Err(EngineError::ColumnOutOfRange { column: 7 })
        );
        assert_eq!(
            Position::from_moves("0000000"),
            Err(EngineError::ColumnFull { column: 0 })
        );
        Ok(())
    }

    #[test]
    pub fn copies_are_independent() -> Result<()> {
        let original = Position::from_moves("3344")?;
        let mut copy = original.clone();
        copy.drop(5, One)?;

        assert_eq!(original.num_moves(), 4);
        assert_eq!(original.cell(0, 5), Cell::Empty);
        assert_eq!(copy.cell(0, 5), Cell::PlayerOne);
        Ok(())
    }

    #[test]
    pub fn horizontal_win() -> Result<()> {
        let mut position = Position::new();
        play(&mut position, &[(1, One), (2, One), (3, One), (4, One)])?;
        assert!(position.has_won(One));
        assert!(!position.has_won(Two));
        assert!(position.is_terminal());
        Ok(())
    }

    #[test]
    pub fn vertical_win() -> Result<()> {
        let mut position = Position::new();
        play(&mut position, &[(5, Two), (5, Two), (5, Two), (5, Two)])?;
        assert!(position.has_won(Two));
        assert!(!position.has_won(One));
        Ok(())
    }

    #[test]
    pub fn ascending_diagonal_win() -> Result<()> {
        let mut position = Position::new();
        play(
            &mut position,
            &[
                (0, One),
                (1, Two),
                (1, One),
                (2, Two),
                (2, Two),
                (2, One),
                (3, Two),
                (3, Two),
                (3, Two),
                (3, One),
            ],
        )?;
        assert!(position.has_won(One));
        assert!(!position.has_won(Two));
        Ok(())
    }

    #[test]
    pub fn descending_diagonal_win() -> Result<()> {
        let mut position = Position::new();
        play(
            &mut position,
            &[
                (6, One),
                (5, Two),
                (5, One),
                (4, Two),
                (4, Two),
                (4, One),
                (3, Two),
                (3, Two),
                (3, Two),
                (3, One),
            ],
        )?;
        assert!(position.has_won(One));
        assert!(!position.has_won(Two));
        Ok(())
    }

    #[test]
    pub fn several_wins_at_once() -> Result<()> {
        let mut position = Position::new();
        play(
            &mut position,
            &[(0, One), (1, One), (2, One), (3, One), (3, One), (3, One), (3, One)],
        )?;
        assert!(position.has_won(One));
        assert_eq!(position.count_run(One, 4), 2);
        Ok(())
    }

    #[test]
    pub fn near_misses_are_not_wins() -> Result<()> {
        // three in a row with a gap before the fourth
        let mut position = Position::new();
        play(&mut position, &[(0, One), (1, One), (2, One), (4, One)])?;
        assert!(!position.has_won(One));

        // three in a column capped by the opponent
        play(&mut position, &[(6, Two), (6, Two), (6, Two), (6, One)])?;
        assert!(!position.has_won(Two));
        assert!(!position.is_terminal());
        Ok(())
    }

    #[test]
    pub fn full_board_is_a_draw() -> Result<()> {
        let rows = ["XXOOXXO", "OOXXOOX"];
        let mut position = Position::new();
        for row in 0..HEIGHT {
            for (column, symbol) in rows[row % 2].chars().enumerate() {
                position.drop(column, if symbol == 'X' { One } else { Two })?;
            }
        }

        assert!(position.is_board_full());
        assert!(!position.has_won(One));
        assert!(!position.has_won(Two));
        assert!(position.is_terminal());
        assert!((0..WIDTH).all(|column| position.is_full(column)));
        Ok(())
    }

    #[test]
    pub fn runs_overlap() -> Result<()> {
        let mut row = Position::new();
        play(&mut row, &[(0, One), (1, One), (2, One), (3, One)])?;
        assert_eq!(row.count_run(One, 3), 2);
        assert_eq!(row.count_run(One, 2), 3);
        assert_eq!(row.count_run(Two, 2), 0);

        let mut column = Position::new();
        play(&mut column, &[(6, Two), (6, Two), (6, Two), (6, Two)])?;
        assert_eq!(column.count_run(Two, 3), 2);
        assert_eq!(column.count_run(Two, 2), 3);

        // both arms of the corner and the diagonal across it
        let mut corner = Position::new();
        play(&mut corner, &[(0, One), (1, One), (0, One)])?;
        assert_eq!(corner.count_run(One, 2), 3);
        assert_eq!(corner.count_run(One, 3), 0);
        Ok(())
    }

    #[test]
    pub fn evaluation() -> Result<()> {
        assert_eq!(evaluate(&Position::new()), 0);

        // 100 for the win, two lines of three and three lines of two
        let mut won = Position::new();
        play(&mut won, &[(0, One), (1, One), (2, One), (3, One)])?;
        assert_eq!(evaluate(&won), 123);

        let mut lost = Position::new();
        play(&mut lost, &[(0, Two), (1, Two), (2, Two), (3, Two)])?;
        assert_eq!(evaluate(&lost), -123);

        let mut mixed = Position::new();
        play(&mut mixed, &[(0, One), (0, One), (0, One), (6, Two), (5, Two)])?;
        assert_eq!(evaluate(&mixed), 10 + 2 - 1);
        Ok(())
    }

    #[test]
    pub fn expansion_order() -> Result<()> {
        let mut position = Position::new();
        for row in 0..HEIGHT {
            position.drop(2, if row % 2 == 0 { One } else { Two })?;
        }
        let root = SearchNode::expand(position, One, 2);

        let columns: Vec<_> = root.children().iter().filter_map(SearchNode::column).collect();
        assert_eq!(columns, vec![0, 1, 3, 4, 5, 6]);
        for child in root.children() {
            assert_eq!(child.children().len(), 6);
            assert!(child.children().iter().all(|leaf| leaf.children().is_empty()));
        }
        assert_eq!(root.size(), 1 + 6 + 36);
        Ok(())
    }

    #[test]
    pub fn terminal_nodes_are_not_expanded() -> Result<()> {
        let position = Position::from_moves("0101010")?;
        assert!(position.has_won(One));

        let root = SearchNode::expand(position, Two, 3);
        assert!(root.children().is_empty());
        assert_eq!(root.perft(3), 1);
        Ok(())
    }

    #[test]
    pub fn perft_empty_board() {
        let engine = Engine::new();
        let mut expected = 1;
        for depth in 1..=5 {
            expected *= WIDTH as u64;
            assert_eq!(engine.node_count(depth), expected);
        }
    }

    #[test]
    pub fn perft_depth_zero() {
        let root = SearchNode::expand(Position::new(), One, 0);
        assert_eq!(root.perft(0), 1);

        assert_eq!(GameTree::new(&Position::new(), 0).perft(0), 0);
        assert_eq!(Engine::new().node_count(0), 0);
    }

    #[test]
    pub fn perft_terminal_root() -> Result<()> {
        let position = Position::from_moves("0101010")?;
        let engine = Engine::new().with_position(position);
        assert_eq!(engine.node_count(0), 0);
        assert_eq!(engine.node_count(3), 0);
        Ok(())
    }

    #[test]
    pub fn perft_skips_full_columns() -> Result<()> {
        let position = Position::from_moves("000000")?;
        let engine = Engine::new().with_position(position);
        assert_eq!(engine.node_count(1), 6);
        assert_eq!(engine.node_count(2), 36);
        Ok(())
    }

    #[test]
    pub fn node_count_leaves_position_alone() -> Result<()> {
        let position = Position::from_moves("3342")?;
        let engine = Engine::new().with_position(position.clone());
        engine.node_count(4);
        assert_eq!(engine.position(), &position);
        Ok(())
    }

    #[test]
    pub fn takes_immediate_win() -> Result<()> {
        let mut engine = Engine::new();
        for _ in 0..3 {
            engine.apply_move(0, One)?;
            engine.apply_move(6, Two)?;
        }

        // 123 for the first player's four minus 12 for the second's three
        let (column, score) = engine.best_move()?;
        assert_eq!((column, score), (0, 111));
        assert_eq!(engine.score(), Some(111));
        assert!(engine.position().has_won(One));
        assert!(evaluate(engine.position()) > 100);
        Ok(())
    }

    #[test]
    pub fn blocks_immediate_loss() -> Result<()> {
        let mut engine = Engine::with_depth(2);
        for &column in [0, 2, 4].iter() {
            engine.apply_move(column, One)?;
            engine.apply_move(6, Two)?;
        }

        let (column, score) = engine.best_move()?;
        assert_eq!((column, score), (6, -14));
        assert_eq!(engine.position().cell(3, 6), Cell::PlayerOne);
        Ok(())
    }

    #[test]
    pub fn pruning_keeps_the_result() -> Result<()> {
        for &(moves, depth) in [
            ("", 5),
            ("3", 5),
            ("33", 4),
            ("0123", 4),
            ("334455", 4),
            ("3332", 5),
            ("00112", 4),
        ]
        .iter()
        {
            let mut tree = GameTree::new(&Position::from_moves(moves)?, depth);
            let column = tree.best_move()?;
            let (expected_column, expected_score, visited) = minimax_without_pruning(&tree);

            assert_eq!(column, expected_column, "moves '{}'", moves);
            assert_eq!(tree.best_score(), Some(expected_score), "moves '{}'", moves);
            assert!(tree.nodes_searched <= visited);
            assert_eq!(visited, tree.size());
        }
        Ok(())
    }

    #[test]
    pub fn pruning_visits_fewer_nodes() -> Result<()> {
        let mut tree = GameTree::new(&Position::new(), 5);
        tree.best_move()?;
        let (_, _, visited) = minimax_without_pruning(&tree);
        assert!(tree.nodes_searched < visited);
        Ok(())
    }

    #[test]
    pub fn search_errors() -> Result<()> {
        let mut tree = GameTree::new(&Position::new(), 0);
        assert_eq!(tree.best_move(), Err(EngineError::ZeroDepth));
        assert_eq!(tree.best_score(), None);

        let won = Position::from_moves("0101010")?;
        let mut engine = Engine::new().with_position(won.clone());
        assert_eq!(engine.best_move(), Err(EngineError::SearchOnTerminalPosition));
        assert_eq!(engine.position(), &won);
        assert_eq!(engine.score(), None);
        Ok(())
    }

    #[test]
    pub fn best_move_plays_on_the_position() -> Result<()> {
        let mut engine = Engine::with_depth(3);
        engine.apply_move(3, Two)?;
        let (column, _) = engine.best_move()?;

        assert_eq!(engine.position().num_moves(), 2);
        let row = if column == 3 { 1 } else { 0 };
        assert_eq!(engine.position().cell(row, column), Cell::PlayerOne);
        Ok(())
    }

    #[test]
    pub fn display() -> Result<()> {
        let mut output = Vec::new();
        Position::from_moves("3")?.display(&mut output)?;
        let output = String::from_utf8(output)?;
        assert!(output.contains("0123456"));
        Ok(())
    }
}
