//! Random sources for maze generation.
//!
//! Carving order and secondary goal selection are the only random decisions the generator makes.
//! Both go through the [`RandomSource`] trait so a game can use a real generator while tests can
//! replay a fixed script and assert exact layouts.

use rand::{rngs::StdRng, seq::SliceRandom as _, Rng, SeedableRng as _};

use crate::grid::Direction;

/// Supplier of the random decisions taken while generating a maze.
pub trait RandomSource {
    /// Reorders the carving directions tried from a freshly carved cell.
    fn shuffle_directions(&mut self, directions: &mut [Direction]);

    /// Returns an index in `0..len`. Callers never pass a zero `len`.
    fn choose_index(&mut self, len: usize) -> usize;
}

impl<T: RandomSource + ?Sized> RandomSource for &mut T {
    fn shuffle_directions(&mut self, directions: &mut [Direction]) {
        (**self).shuffle_directions(directions);
    }

    fn choose_index(&mut self, len: usize) -> usize {
        (**self).choose_index(len)
    }
}

/// [`RandomSource`] backed by any [`rand`] generator.
#[derive(Clone, Debug)]
pub struct RngSource<R = StdRng> {
    /// Underlying generator.
    rng: R,
}

impl RngSource {
    /// Builds a source seeded from the operating system.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Builds a reproducible source from a fixed seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RngSource<R> {
    /// Wraps an existing generator.
    pub const fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn shuffle_directions(&mut self, directions: &mut [Direction]) {
        directions.shuffle(&mut self.rng);
    }

    fn choose_index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len.max(1))
    }
}

/// Deterministic source replaying a fixed script.
///
/// Each call to [`RandomSource::shuffle_directions`] consumes the next scripted order; once the
/// script runs out the directions are left as given. Index choices work the same way and fall back
/// to `0`.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct ScriptedSource {
    /// Direction orders handed out one per carved cell.
    orders: std::collections::VecDeque<[Direction; 4]>,
    /// Indices handed out one per choice.
    picks: std::collections::VecDeque<usize>,
}

#[cfg(test)]
impl ScriptedSource {
    /// Builds a script from direction orders and index choices.
    pub(crate) fn new(orders: Vec<[Direction; 4]>, picks: Vec<usize>) -> Self {
        Self {
            orders: orders.into(),
            picks: picks.into(),
        }
    }
}

#[cfg(test)]
impl RandomSource for ScriptedSource {
    fn shuffle_directions(&mut self, directions: &mut [Direction]) {
        if let Some(order) = self.orders.pop_front() {
            for (slot, direction) in directions.iter_mut().zip(order) {
                *slot = direction;
            }
        }
    }

    fn choose_index(&mut self, len: usize) -> usize {
        self.picks.pop_front().unwrap_or_default() % len.max(1)
    }
}
