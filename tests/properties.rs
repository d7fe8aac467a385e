//! Property tests for the board and rotation engine

use cattris::Settings;
use cattris::sim::{
    Action, Board, CatRole, Cell, GameState, Piece, PieceKind, Rgba, Special, apply_action, tick,
};
use glam::IVec2;
use proptest::prelude::*;

const W: usize = 10;
const H: usize = 20;

fn block() -> Option<Cell> {
    Some(Cell::new(Rgba(0xaaaaaaff), CatRole::Body, Special::None))
}

fn board_from(rows: &[Vec<bool>]) -> Board {
    let mut board = Board::new(W, H);
    for (y, row) in rows.iter().enumerate() {
        for (x, &filled) in row.iter().enumerate() {
            if filled {
                board.set(x as i32, y as i32, block());
            }
        }
    }
    board
}

fn occupancy(board: &Board) -> Vec<Vec<bool>> {
    board
        .rows()
        .iter()
        .map(|row| row.iter().map(Option::is_some).collect())
        .collect()
}

/// Rows that are often full, sometimes partially filled
fn row_strategy() -> impl Strategy<Value = Vec<bool>> {
    prop_oneof![
        Just(vec![true; W]),
        prop::collection::vec(any::<bool>(), W),
        Just(vec![false; W]),
    ]
}

fn kind_strategy() -> impl Strategy<Value = PieceKind> {
    prop::sample::select(PieceKind::ALL.to_vec())
}

fn action_strategy() -> impl Strategy<Value = Action> {
    prop::sample::select(vec![
        Action::MoveLeft,
        Action::MoveRight,
        Action::SoftDrop,
        Action::Rotate,
        Action::HardDrop,
    ])
}

proptest! {
    #[test]
    fn clear_removes_exactly_the_full_rows(rows in prop::collection::vec(row_strategy(), H)) {
        let mut board = board_from(&rows);
        let full = rows.iter().filter(|row| row.iter().all(|&c| c)).count();

        // Surviving rows keep their order and settle at the bottom
        let mut expected: Vec<Vec<bool>> = vec![vec![false; W]; full];
        expected.extend(rows.iter().filter(|row| !row.iter().all(|&c| c)).cloned());

        prop_assert_eq!(board.clear_lines(), full);
        prop_assert_eq!(occupancy(&board), expected);
    }

    #[test]
    fn rows_above_a_clear_shift_by_the_count(
        above in prop::collection::vec(prop::collection::vec(any::<bool>(), W), 10),
        cleared in 1usize..=4,
    ) {
        // Rows 0..10 random but never full, then `cleared` full rows at the bottom
        let mut rows: Vec<Vec<bool>> = above
            .into_iter()
            .map(|mut row| { row[0] = false; row })
            .collect();
        rows.resize(H - cleared, vec![false; W]);
        rows.extend(std::iter::repeat_n(vec![true; W], cleared));

        let mut board = board_from(&rows);
        prop_assert_eq!(board.clear_lines(), cleared);

        let after = occupancy(&board);
        for y in 0..cleared {
            prop_assert!(after[y].iter().all(|&c| !c));
        }
        for y in 0..H - cleared {
            prop_assert_eq!(&after[y + cleared], &rows[y]);
        }
    }

    #[test]
    fn double_rotation_restores_roles(kind in kind_strategy(), x in 2i32..6, y in 0i32..14) {
        let board = Board::new(W, H);
        let mut piece = Piece::new(kind, Special::None);
        piece.pos = IVec2::new(x, y);
        let roles = piece.roles.clone();

        prop_assert!(piece.rotate(&board));
        prop_assert!(piece.rotate(&board));
        prop_assert_eq!(piece.roles, roles);
    }

    #[test]
    fn out_of_bounds_always_collides(
        kind in kind_strategy(),
        turns in 0usize..4,
        x in -5i32..15,
        y in -5i32..25,
    ) {
        let board = Board::new(W, H);
        let mut piece = Piece::new(kind, Special::None);
        for _ in 0..turns {
            piece.roles = piece.rotated_roles();
        }
        piece.pos = IVec2::new(x, y);

        let outside = piece
            .cells()
            .any(|(p, _)| p.x < 0 || p.x >= W as i32 || p.y >= H as i32);
        prop_assert_eq!(board.collides(&piece), outside);
    }

    #[test]
    fn same_seed_same_game(
        seed in any::<u64>(),
        actions in prop::collection::vec(prop::option::of(action_strategy()), 1..200),
    ) {
        let mut a = GameState::new(seed, Settings::default());
        let mut b = GameState::new(seed, Settings::default());
        a.start();
        b.start();

        for action in &actions {
            for state in [&mut a, &mut b] {
                if let Some(action) = action {
                    apply_action(state, *action);
                }
                tick(state, 120.0);
            }
        }
        prop_assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn score_never_decreases(
        seed in any::<u64>(),
        actions in prop::collection::vec(action_strategy(), 1..200),
    ) {
        let mut state = GameState::new(seed, Settings::default());
        state.start();
        let mut last = state.score();
        for action in actions {
            apply_action(&mut state, action);
            tick(&mut state, 300.0);
            prop_assert!(state.score() >= last);
            last = state.score();
        }
    }
}
