//! Piece generator
//!
//! Uniform draws from the catalog with a cap on repeats, plus the timed
//! special-piece rules that kick in once the score is high enough.

use glam::IVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::piece::{Piece, PieceKind, Special};
use crate::consts::REPEAT_LIMIT;
use crate::settings::Settings;

/// Seeded source of new pieces
#[derive(Debug, Clone)]
pub struct PieceGenerator {
    rng: Pcg32,
    /// Template of the previous draw and how many times in a row it came up
    last_kind: Option<PieceKind>,
    repeat_count: u32,
    /// Most recent special kind handed out
    last_special: Special,
    /// Play time of the most recent special spawn
    last_special_at_ms: Option<f64>,
}

impl PieceGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            last_kind: None,
            repeat_count: 0,
            last_special: Special::None,
            last_special_at_ms: None,
        }
    }

    /// Forget repeat and special history (new game); the RNG stream continues
    pub fn reset(&mut self) {
        self.last_kind = None;
        self.repeat_count = 0;
        self.last_special = Special::None;
        self.last_special_at_ms = None;
    }

    /// Draw a template, re-drawing when it would be the third in a row
    pub fn draw_kind(&mut self) -> PieceKind {
        let mut kind = self.random_kind();

        if self.last_kind == Some(kind) {
            self.repeat_count += 1;
        } else {
            self.last_kind = Some(kind);
            self.repeat_count = 1;
        }

        if self.repeat_count >= REPEAT_LIMIT {
            let repeated = kind;
            while kind == repeated {
                kind = self.random_kind();
            }
            self.last_kind = Some(kind);
            self.repeat_count = 1;
        }

        kind
    }

    fn random_kind(&mut self) -> PieceKind {
        PieceKind::ALL[self.rng.random_range(0..PieceKind::ALL.len())]
    }

    /// Decide whether the next spawn is special.
    ///
    /// Nothing happens below the score threshold. Above it the first spawn is
    /// special, then one every [`Settings::special_interval_ms`] of play time.
    /// A kind equal to the previous special is advanced along the cycle.
    pub fn roll_special(&mut self, score: u64, now_ms: f64, settings: &Settings) -> Special {
        if score < settings.special_score_threshold {
            return Special::None;
        }

        let due = match self.last_special_at_ms {
            None => true,
            Some(at) => now_ms - at >= settings.special_interval_ms(score),
        };
        if !due {
            return Special::None;
        }

        let mut special = Special::KINDS[self.rng.random_range(0..Special::KINDS.len())];
        if special == self.last_special {
            special = special.next_in_cycle();
        }

        self.last_special = special;
        self.last_special_at_ms = Some(now_ms);
        log::debug!("Special piece {:?} at score {} ({} ms)", special, score, now_ms);
        special
    }

    /// Produce the next piece at its spawn position.
    ///
    /// Pieces spawn on row 0, horizontally centered; unmovable specials land
    /// in a random column where they fit.
    pub fn spawn(&mut self, score: u64, now_ms: f64, settings: &Settings) -> Piece {
        let kind = self.draw_kind();
        let special = self.roll_special(score, now_ms, settings);
        let mut piece = Piece::new(kind, special);

        let width = piece.width();
        let x = if special == Special::Unmovable {
            self.rng.random_range(0..=settings.cols.saturating_sub(width)) as i32
        } else {
            centered_column(settings.cols, width)
        };
        piece.pos = IVec2::new(x, 0);

        log::trace!("Spawned {} at column {}", kind.name(), x);
        piece
    }
}

/// Left column that centers a piece of `width` on a board of `cols`
pub fn centered_column(cols: usize, width: usize) -> i32 {
    (cols as f64 / 2.0 - (width as f64 / 2.0).ceil()).floor() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_column() {
        assert_eq!(centered_column(10, 4), 3);
        assert_eq!(centered_column(10, 3), 3);
        assert_eq!(centered_column(10, 2), 4);
        assert_eq!(centered_column(9, 2), 3);
    }

    #[test]
    fn test_no_three_in_a_row() {
        let mut generator = PieceGenerator::new(7);
        let kinds: Vec<_> = (0..5000).map(|_| generator.draw_kind()).collect();
        for window in kinds.windows(3) {
            assert!(
                !(window[0] == window[1] && window[1] == window[2]),
                "three {} in a row",
                window[0].name()
            );
        }
        // Doubles are still allowed
        assert!(kinds.windows(2).any(|w| w[0] == w[1]));
    }

    #[test]
    fn test_every_template_appears() {
        let mut generator = PieceGenerator::new(3);
        let kinds: Vec<_> = (0..500).map(|_| generator.draw_kind()).collect();
        for kind in PieceKind::ALL {
            assert!(kinds.contains(&kind), "{} never drawn", kind.name());
        }
    }

    #[test]
    fn test_same_seed_same_pieces() {
        let settings = Settings::default();
        let mut a = PieceGenerator::new(42);
        let mut b = PieceGenerator::new(42);
        for i in 0..100 {
            let now = i as f64 * 1000.0;
            assert_eq!(a.spawn(i * 10, now, &settings), b.spawn(i * 10, now, &settings));
        }
    }

    #[test]
    fn test_no_specials_below_threshold() {
        let settings = Settings::default();
        let mut generator = PieceGenerator::new(1);
        for i in 0..50 {
            let piece = generator.spawn(99, i as f64 * 60_000.0, &settings);
            assert_eq!(piece.special, Special::None);
        }
    }

    #[test]
    fn test_first_special_is_immediate_then_timed() {
        let settings = Settings::default();
        let mut generator = PieceGenerator::new(1);

        assert!(generator.roll_special(100, 0.0, &settings).is_special());
        // Interval at score 100 is 24.9 s
        assert_eq!(generator.roll_special(100, 24_000.0, &settings), Special::None);
        assert!(generator.roll_special(100, 24_900.0, &settings).is_special());
    }

    #[test]
    fn test_interval_floor_at_high_score() {
        let settings = Settings::default();
        let mut generator = PieceGenerator::new(9);
        assert!(generator.roll_special(50_000, 0.0, &settings).is_special());
        assert_eq!(generator.roll_special(50_000, 4_999.0, &settings), Special::None);
        assert!(generator.roll_special(50_000, 5_000.0, &settings).is_special());
    }

    #[test]
    fn test_specials_never_repeat_back_to_back() {
        let settings = Settings::default();
        let mut generator = PieceGenerator::new(11);
        let mut previous = Special::None;
        for i in 0..200 {
            let special = generator.roll_special(30_000, i as f64 * 5_000.0, &settings);
            assert!(special.is_special());
            assert_ne!(special, previous);
            previous = special;
        }
    }

    #[test]
    fn test_special_color_and_spawn_column() {
        let settings = Settings::default();
        let mut generator = PieceGenerator::new(5);
        for i in 0..300 {
            let piece = generator.spawn(30_000, i as f64 * 5_000.0, &settings);
            assert_eq!(piece.pos.y, 0);
            let x = piece.pos.x;
            assert!(x >= 0 && x as usize + piece.width() <= settings.cols);
            if piece.special != Special::Unmovable {
                assert_eq!(x, centered_column(settings.cols, piece.width()));
            }
            assert_eq!(piece.color, super::super::piece::SPECIAL_COLOR);
        }
    }

    #[test]
    fn test_reset_forgets_special_timer() {
        let settings = Settings::default();
        let mut generator = PieceGenerator::new(2);
        assert!(generator.roll_special(200, 0.0, &settings).is_special());
        assert_eq!(generator.roll_special(200, 10.0, &settings), Special::None);
        generator.reset();
        assert!(generator.roll_special(200, 10.0, &settings).is_special());
    }
}
