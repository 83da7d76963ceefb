#[macro_use]
extern crate lazy_static;

pub mod catalog;
pub mod config;
pub mod game;
pub mod grid;
pub mod image;
pub mod input;
pub mod input_terminal;
pub mod labels;
pub mod picker;
pub mod render;
pub mod shuffle;
pub mod vdu;

#[cfg(test)]
mod tests {
    use crate::grid::PuzzleGrid;
    use crate::image::{PuzzleImage, IMAGE_BYTES};
    use crate::shuffle::{shuffle, SlideRand};

    use test_log::test;

    #[test]
    fn smoke_scramble_and_reverse() {
        // build a synthetic image, scramble a grid, undo the scramble
        let image = PuzzleImage::from_bytes(vec![0x55; IMAGE_BYTES]).unwrap();
        assert_eq!(image.bytes().len(), IMAGE_BYTES);

        let mut grid = PuzzleGrid::new();
        let mut rng = SlideRand::new_predictable(99);
        let moves = shuffle(&mut grid, &mut rng, 5);
        log::info!("scramble: {:?}", moves);
        for op in moves.iter().rev() {
            grid.apply(op.inverse());
        }
        assert!(grid.is_solved());
    }
}
