//! Scramble engine for the puzzle grid
//!
//! A shuffle of difficulty `level` applies exactly `level` independent
//! random scrolls, each a uniform flat choice among the eight primitives
//! the platform animates (each row forward, each column forward). No
//! de-duplication is attempted; a step may exactly undo the previous one.
//! The recorded sequence is returned so the scramble is provably solvable
//! by replaying the inverses in reverse order.

use crate::grid::{Direction, PuzzleGrid, RotateOp, GRID_SIZE};
use log::debug;
use rand::{rngs::StdRng, Rng, RngCore, SeedableRng};

/// RandMode controls random generator behaviour. May be predictable for
/// testing or truly random for gameplay.
pub enum RandMode {
    Predictable,
    RandomUniform,
}

pub struct SlideRand {
    rng: Box<dyn RngCore>,
    rand_mode: RandMode,
}

impl SlideRand {
    pub fn new(rm: RandMode) -> SlideRand {
        SlideRand {
            rng: Box::new(rand::thread_rng()),
            rand_mode: rm,
        }
    }

    pub fn new_uniform() -> SlideRand {
        SlideRand::new(RandMode::RandomUniform)
    }

    pub fn new_predictable(seed: u64) -> SlideRand {
        SlideRand {
            rng: Box::new(StdRng::seed_from_u64(seed)),
            rand_mode: RandMode::Predictable,
        }
    }

    pub fn is_predictable(&self) -> bool {
        matches!(self.rand_mode, RandMode::Predictable)
    }

    /// One uniformly random scroll among the eight shuffle primitives.
    pub fn gen_scroll(&mut self) -> RotateOp {
        let r: usize = self.rng.gen_range(0..GRID_SIZE * 2);
        if r < GRID_SIZE {
            RotateOp::Row(r, Direction::Forward)
        } else {
            RotateOp::Column(r - GRID_SIZE, Direction::Forward)
        }
    }

    /// A sequence of `level` independent random scrolls.
    pub fn scroll_sequence(&mut self, level: u8) -> Vec<RotateOp> {
        (0..level).map(|_| self.gen_scroll()).collect()
    }
}

/// Scramble `grid` with exactly `level` random scrolls and return the moves
/// that were applied, in order.
pub fn shuffle(grid: &mut PuzzleGrid, rng: &mut SlideRand, level: u8) -> Vec<RotateOp> {
    let moves = rng.scroll_sequence(level);
    debug!(
        "shuffling level {} ({} moves, predictable={})",
        level,
        moves.len(),
        rng.is_predictable()
    );
    for op in &moves {
        grid.apply(*op);
    }
    moves
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shuffle_level_zero_leaves_grid_solved() {
        let mut grid = PuzzleGrid::new();
        let mut rng = SlideRand::new_predictable(1);
        let moves = shuffle(&mut grid, &mut rng, 0);
        assert!(moves.is_empty());
        assert!(grid.is_solved());
    }

    #[test]
    fn shuffle_records_exactly_level_moves() {
        let mut grid = PuzzleGrid::new();
        let mut rng = SlideRand::new_predictable(2);
        let moves = shuffle(&mut grid, &mut rng, 9);
        assert_eq!(moves.len(), 9);
    }

    #[test]
    fn recorded_moves_reverse_the_scramble() {
        let mut grid = PuzzleGrid::new();
        let mut rng = SlideRand::new_predictable(42);
        let moves = shuffle(&mut grid, &mut rng, 3);
        for op in moves.iter().rev() {
            grid.apply(op.inverse());
        }
        assert!(grid.is_solved());
    }

    #[test]
    fn predictable_seed_repeats_the_sequence() {
        let mut a = SlideRand::new_predictable(7);
        let mut b = SlideRand::new_predictable(7);
        assert_eq!(a.scroll_sequence(6), b.scroll_sequence(6));
    }

    #[test]
    fn shuffle_only_uses_forward_scrolls() {
        let mut rng = SlideRand::new_predictable(3);
        for op in rng.scroll_sequence(64) {
            match op {
                RotateOp::Row(n, Direction::Forward) | RotateOp::Column(n, Direction::Forward) => {
                    assert!(n < GRID_SIZE)
                }
                other => panic!("unexpected shuffle move {:?}", other),
            }
        }
    }
}
