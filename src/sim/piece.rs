//! Piece catalog and the rotation engine
//!
//! A piece is a small matrix of cat roles. Empty slots are `None`; every
//! occupied slot names the part of the cat drawn there, so rotation has to
//! carry roles along with the cells.

use std::fmt;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::board::Board;
use crate::consts::KICK_OFFSETS;

/// Which part of a cat a cell shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CatRole {
    Head,
    Body,
    /// Body segment of a piece standing in a single column
    BodySide,
    Tail,
    Legs,
}

impl CatRole {
    /// Single-character tag used in text dumps
    pub fn glyph(self) -> char {
        match self {
            CatRole::Head => 'H',
            CatRole::Body => 'B',
            CatRole::BodySide => 'b',
            CatRole::Tail => 'T',
            CatRole::Legs => 'L',
        }
    }
}

/// Special behavior attached to a spawned piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Special {
    #[default]
    None,
    /// Rotation input is ignored
    Unrotatable,
    /// Horizontal movement input is ignored
    Unmovable,
    /// Every timed drop is a hard drop
    HardDrop,
}

impl Special {
    /// The three special kinds, in draw order
    pub const KINDS: [Special; 3] = [Special::Unrotatable, Special::Unmovable, Special::HardDrop];

    pub fn is_special(self) -> bool {
        self != Special::None
    }

    /// Replacement used when a draw repeats the previous special
    pub fn next_in_cycle(self) -> Special {
        match self {
            Special::Unmovable => Special::Unrotatable,
            Special::Unrotatable => Special::HardDrop,
            Special::HardDrop => Special::Unmovable,
            Special::None => Special::None,
        }
    }

    /// Banner text shown when a piece of this kind becomes active
    pub fn banner(self) -> Option<&'static str> {
        match self {
            Special::None => None,
            Special::Unrotatable => Some("UNROTATABLE!"),
            Special::Unmovable => Some("UNMOVABLE!"),
            Special::HardDrop => Some("HARD DROP!"),
        }
    }
}

/// Packed `0xRRGGBBAA` color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba(pub u32);

impl Rgba {
    /// CSS hex notation (`#rrggbbaa`)
    pub fn to_css(self) -> String {
        format!("#{:08x}", self.0)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:08x}", self.0)
    }
}

/// Color every special piece is drawn with
pub const SPECIAL_COLOR: Rgba = Rgba(0x333333ff);

/// Row-major matrix of roles; `None` marks an empty slot
pub type RoleGrid = Vec<Vec<Option<CatRole>>>;

/// The seven piece templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    Four,
    Q,
    T,
    L,
    L2,
    S,
    S2,
}

impl PieceKind {
    pub const ALL: [PieceKind; 7] = [
        PieceKind::Four,
        PieceKind::Q,
        PieceKind::T,
        PieceKind::L,
        PieceKind::L2,
        PieceKind::S,
        PieceKind::S2,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PieceKind::Four => "4",
            PieceKind::Q => "Q",
            PieceKind::T => "T",
            PieceKind::L => "L",
            PieceKind::L2 => "L2",
            PieceKind::S => "S",
            PieceKind::S2 => "S2",
        }
    }

    pub fn color(self) -> Rgba {
        match self {
            PieceKind::Four => Rgba(0xff6666ff),
            PieceKind::Q => Rgba(0x0044ffff),
            PieceKind::T => Rgba(0x99ff99ff),
            PieceKind::L => Rgba(0xffcc66ff),
            PieceKind::L2 => Rgba(0xff7b00ff),
            PieceKind::S => Rgba(0xf266ffff),
            PieceKind::S2 => Rgba(0x62cdffff),
        }
    }

    /// Spawn orientation of the template
    pub fn roles(self) -> RoleGrid {
        use CatRole::{Body as B, Head as H, Legs as L, Tail as T};
        let rows: &[&[Option<CatRole>]] = match self {
            PieceKind::Four => &[&[Some(H), Some(B), Some(B), Some(T)]],
            PieceKind::Q => &[&[Some(H), Some(B)], &[Some(L), Some(T)]],
            PieceKind::T => &[&[None, Some(H), None], &[Some(T), Some(B), Some(L)]],
            PieceKind::L => &[&[Some(H), None, None], &[Some(T), Some(B), Some(L)]],
            PieceKind::L2 => &[&[None, None, Some(H)], &[Some(L), Some(B), Some(T)]],
            PieceKind::S => &[&[Some(H), Some(B), None], &[None, Some(L), Some(T)]],
            PieceKind::S2 => &[&[None, Some(B), Some(H)], &[Some(T), Some(L), None]],
        };
        rows.iter().map(|row| row.to_vec()).collect()
    }
}

/// A falling piece
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub roles: RoleGrid,
    pub color: Rgba,
    /// Board position of the matrix's top-left slot
    pub pos: IVec2,
    pub special: Special,
}

impl Piece {
    /// Create a piece in spawn orientation at the board origin
    pub fn new(kind: PieceKind, special: Special) -> Self {
        Self {
            kind,
            roles: kind.roles(),
            color: if special.is_special() {
                SPECIAL_COLOR
            } else {
                kind.color()
            },
            pos: IVec2::ZERO,
            special,
        }
    }

    /// Matrix width in slots
    pub fn width(&self) -> usize {
        self.roles.first().map_or(0, Vec::len)
    }

    /// Matrix height in slots
    pub fn height(&self) -> usize {
        self.roles.len()
    }

    /// Occupied slots as (matrix offset, role)
    pub fn local_cells(&self) -> impl Iterator<Item = (IVec2, CatRole)> + '_ {
        self.roles.iter().enumerate().flat_map(|(r, row)| {
            row.iter().enumerate().filter_map(move |(c, role)| {
                role.map(|role| (IVec2::new(c as i32, r as i32), role))
            })
        })
    }

    /// Occupied cells as (board coordinate, role)
    pub fn cells(&self) -> impl Iterator<Item = (IVec2, CatRole)> + '_ {
        self.local_cells().map(move |(offset, role)| (self.pos + offset, role))
    }

    /// The role matrix after one rotation.
    ///
    /// Rotation is a transpose: the role at `(r, c)` moves to `(c, r)`. A
    /// result that is a single column relabels `Body` as `BodySide`, a single
    /// row turns `BodySide` back into `Body`, so two rotations are an identity.
    pub fn rotated_roles(&self) -> RoleGrid {
        let (height, width) = (self.height(), self.width());
        let mut rotated: RoleGrid = (0..width)
            .map(|c| (0..height).map(|r| self.roles[r][c]).collect())
            .collect();

        let relabel = match (rotated.len(), height) {
            (_, 1) => Some((CatRole::Body, CatRole::BodySide)),
            (1, _) => Some((CatRole::BodySide, CatRole::Body)),
            _ => None,
        };
        if let Some((from, to)) = relabel {
            for role in rotated.iter_mut().flatten().flatten() {
                if *role == from {
                    *role = to;
                }
            }
        }
        rotated
    }

    /// Try to move by `delta`; keeps the old position on collision
    pub fn try_shift(&mut self, board: &Board, delta: IVec2) -> bool {
        self.pos += delta;
        if board.collides(self) {
            self.pos -= delta;
            false
        } else {
            true
        }
    }

    /// Rotate with kick fallback.
    ///
    /// Tries each horizontal offset of [`KICK_OFFSETS`] in turn and keeps the
    /// first placement that fits. Unrotatable pieces never rotate.
    pub fn rotate(&mut self, board: &Board) -> bool {
        if self.special == Special::Unrotatable {
            return false;
        }

        let rotated = self.rotated_roles();
        let original = std::mem::replace(&mut self.roles, rotated);
        let origin = self.pos;

        for &dx in &KICK_OFFSETS {
            self.pos = origin + IVec2::new(dx, 0);
            if !board.collides(self) {
                return true;
            }
        }

        self.roles = original;
        self.pos = origin;
        false
    }
}
