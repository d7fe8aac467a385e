//! Board grid, collision, merging and line clearing
//!
//! The board is `height` rows of `width` cells, row 0 at the top. Its size is
//! fixed at construction; only cell contents ever change.

use std::fmt;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::piece::{CatRole, Piece, Rgba, Special};

/// A settled cell, baked in from a landed piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub color: Rgba,
    pub role: CatRole,
    /// Special behavior of the piece this cell came from
    pub special: Special,
}

impl Cell {
    pub fn new(color: Rgba, role: CatRole, special: Special) -> Self {
        Self {
            color,
            role,
            special,
        }
    }

    /// Whether the cell came from an unmovable piece
    pub fn is_immobile(&self) -> bool {
        self.special == Special::Unmovable
    }
}

/// The playfield
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    width: usize,
    height: usize,
    rows: Vec<Vec<Option<Cell>>>,
}

impl Board {
    /// Create an empty board
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            rows: vec![vec![None; width]; height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Rows from top to bottom
    pub fn rows(&self) -> &[Vec<Option<Cell>>] {
        &self.rows
    }

    fn index(&self, x: i32, y: i32) -> Option<(usize, usize)> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some((x as usize, y as usize))
    }

    /// Cell at (x, y); `None` when empty or out of bounds
    pub fn get(&self, x: i32, y: i32) -> Option<&Cell> {
        let (x, y) = self.index(x, y)?;
        self.rows[y][x].as_ref()
    }

    /// Overwrite the cell at (x, y). Returns false if out of bounds.
    pub fn set(&mut self, x: i32, y: i32, cell: Option<Cell>) -> bool {
        match self.index(x, y) {
            Some((x, y)) => {
                self.rows[y][x] = cell;
                true
            }
            None => false,
        }
    }

    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        self.get(x, y).is_some()
    }

    /// Whether every column of row `y` is occupied
    pub fn is_row_full(&self, y: usize) -> bool {
        self.rows
            .get(y)
            .is_some_and(|row| row.iter().all(Option::is_some))
    }

    /// Whether the board holds no cells at all
    pub fn is_empty(&self) -> bool {
        self.rows.iter().flatten().all(Option::is_none)
    }

    /// Empty every cell
    pub fn clear(&mut self) {
        for cell in self.rows.iter_mut().flatten() {
            *cell = None;
        }
    }

    /// Whether `pos` is outside the walls or floor, or on a settled cell.
    /// Positions above the top edge are free.
    fn blocked(&self, pos: IVec2) -> bool {
        if pos.x < 0 || pos.x as usize >= self.width || pos.y >= self.height as i32 {
            return true;
        }
        pos.y >= 0 && self.is_occupied(pos.x, pos.y)
    }

    /// Whether `piece` at its current position overlaps walls, floor or cells
    pub fn collides(&self, piece: &Piece) -> bool {
        piece.cells().any(|(pos, _)| self.blocked(pos))
    }

    /// Bake `piece` into the grid. Cells above the top edge are dropped.
    pub fn merge(&mut self, piece: &Piece) {
        for (pos, role) in piece.cells() {
            if pos.y < 0 {
                continue;
            }
            let cell = Cell::new(piece.color, role, piece.special);
            if !self.set(pos.x, pos.y, Some(cell)) {
                log::warn!("Merged cell ({}, {}) is off the board", pos.x, pos.y);
            }
        }
    }

    /// Remove full rows and collapse the rows above them.
    ///
    /// Scans bottom to top; a full row is emptied and bumps the running count,
    /// any other row moves down by the count so far. Returns the rows cleared.
    pub fn clear_lines(&mut self) -> usize {
        let mut cleared = 0;
        for y in (0..self.height).rev() {
            if self.is_row_full(y) {
                self.rows[y].fill(None);
                cleared += 1;
            } else if cleared > 0 {
                let row = std::mem::replace(&mut self.rows[y], vec![None; self.width]);
                self.rows[y + cleared] = row;
            }
        }
        cleared
    }
}

impl fmt::Display for Board {
    /// One line per row: `.` for empty, the role glyph otherwise
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            let line: String = row
                .iter()
                .map(|cell| cell.map_or('.', |c| c.role.glyph()))
                .collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::piece::PieceKind;

    fn block() -> Option<Cell> {
        Some(Cell::new(Rgba(0xffffffff), CatRole::Body, Special::None))
    }

    fn fill_row_except(board: &mut Board, y: i32, gap: Option<i32>) {
        for x in 0..board.width() as i32 {
            if Some(x) != gap {
                board.set(x, y, block());
            }
        }
    }

    #[test]
    fn test_board_new_empty() {
        let board = Board::new(10, 20);
        assert_eq!(board.width(), 10);
        assert_eq!(board.height(), 20);
        assert!(board.is_empty());
        assert_eq!(board.rows().len(), 20);
        assert!(board.rows().iter().all(|row| row.len() == 10));
    }

    #[test]
    fn test_set_out_of_bounds() {
        let mut board = Board::new(10, 20);
        assert!(!board.set(-1, 0, block()));
        assert!(!board.set(10, 0, block()));
        assert!(!board.set(0, 20, block()));
        assert!(board.set(9, 19, block()));
        assert!(board.is_occupied(9, 19));
        assert!(board.get(0, -1).is_none());
    }

    #[test]
    fn test_collides_with_walls_and_floor() {
        let board = Board::new(10, 20);
        let mut piece = Piece::new(PieceKind::Four, Special::None);

        piece.pos = IVec2::new(-1, 0);
        assert!(board.collides(&piece));
        piece.pos = IVec2::new(7, 0);
        assert!(board.collides(&piece));
        piece.pos = IVec2::new(6, 20);
        assert!(board.collides(&piece));
        piece.pos = IVec2::new(6, 19);
        assert!(!board.collides(&piece));
    }

    #[test]
    fn test_cells_above_top_never_collide() {
        let mut board = Board::new(10, 20);
        fill_row_except(&mut board, 0, None);
        let mut piece = Piece::new(PieceKind::Q, Special::None);
        piece.pos = IVec2::new(4, -2);
        assert!(!board.collides(&piece));
        piece.pos = IVec2::new(4, -1);
        assert!(board.collides(&piece));
    }

    #[test]
    fn test_merge_writes_color_role_special() {
        let mut board = Board::new(10, 20);
        let mut piece = Piece::new(PieceKind::T, Special::Unmovable);
        piece.pos = IVec2::new(3, 18);
        board.merge(&piece);

        let head = board.get(4, 18).unwrap();
        assert_eq!(head.role, CatRole::Head);
        assert_eq!(head.color, piece.color);
        assert!(head.is_immobile());
        assert_eq!(board.get(3, 19).unwrap().role, CatRole::Tail);
        assert!(board.get(3, 18).is_none());
    }

    #[test]
    fn test_merge_skips_rows_above_top() {
        let mut board = Board::new(10, 20);
        let mut piece = Piece::new(PieceKind::Q, Special::None);
        piece.pos = IVec2::new(0, -1);
        board.merge(&piece);
        assert!(board.is_occupied(0, 0));
        assert!(board.is_occupied(1, 0));
        assert_eq!(board.rows().iter().flatten().flatten().count(), 2);
    }

    #[test]
    fn test_almost_full_row_is_kept() {
        let mut board = Board::new(10, 20);
        fill_row_except(&mut board, 19, Some(9));
        let before = board.clone();
        assert_eq!(board.clear_lines(), 0);
        assert_eq!(board, before);
    }

    #[test]
    fn test_filling_last_cell_clears_and_shifts() {
        let mut board = Board::new(10, 20);
        fill_row_except(&mut board, 19, Some(9));
        board.set(2, 18, block());
        board.set(5, 10, block());

        board.set(9, 19, block());
        assert_eq!(board.clear_lines(), 1);

        assert!(board.is_occupied(2, 19));
        assert!(board.is_occupied(5, 11));
        assert!(!board.is_occupied(5, 10));
        assert_eq!(board.rows().iter().flatten().flatten().count(), 2);
        assert!(board.rows()[0].iter().all(Option::is_none));
    }

    #[test]
    fn test_clear_with_gap_between_full_rows() {
        let mut board = Board::new(4, 6);
        fill_row_except(&mut board, 5, None);
        fill_row_except(&mut board, 4, Some(0));
        fill_row_except(&mut board, 3, None);
        board.set(1, 2, block());

        assert_eq!(board.clear_lines(), 2);
        let expected = "....\n....\n....\n....\n.B..\n.BBB\n";
        assert_eq!(board.to_string(), expected);
    }

    #[test]
    fn test_display() {
        let mut board = Board::new(3, 2);
        let mut piece = Piece::new(PieceKind::S, Special::None);
        piece.pos = IVec2::new(0, 0);
        board.merge(&piece);
        assert_eq!(board.to_string(), "HB.\n.LT\n");
    }
}
