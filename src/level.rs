use rand::{Rng, RngCore};

/// Draws node heights.
///
/// A new node starts at height 1 and is promoted one level at a time with
/// probability `1 / branching_inverse`, up to `max_height`. The draw does not
/// depend on how many elements the list holds.
#[derive(Debug, Clone)]
pub(crate) struct LevelGenerator<R> {
    rng: R,
    branching_inverse: u32,
    max_height: usize,
}

impl<R: RngCore> LevelGenerator<R> {
    /// # Panics
    /// - if `branching_inverse` or `max_height` is zero.
    pub(crate) fn new(rng: R, branching_inverse: u32, max_height: usize) -> Self {
        assert!(branching_inverse > 0, "branching inverse must be positive");
        assert!(max_height > 0, "max height must be at least 1");
        Self {
            rng,
            branching_inverse,
            max_height,
        }
    }

    pub(crate) fn next_height(&mut self) -> usize {
        let mut height = 1;
        while height < self.max_height && self.rng.gen_range(0..self.branching_inverse) == 0 {
            height += 1;
        }
        height
    }

    pub(crate) fn set_branching_inverse(&mut self, branching_inverse: u32) {
        assert!(branching_inverse > 0, "branching inverse must be positive");
        self.branching_inverse = branching_inverse;
    }

    pub(crate) fn set_max_height(&mut self, max_height: usize) {
        assert!(max_height > 0, "max height must be at least 1");
        self.max_height = max_height;
    }
}
