//! Expansion of a candidate pool of starting configurations to exactly the
//! requested number of search runs.
//!
//! Three policies are supported:
//! - `none`: the pool must already cover the requested count
//! - `tile`: the pool is repeated cyclically
//! - `random`: the shortfall is filled with seeded uniform draws
//!
//! Whatever the policy, the result is exactly `num_reads` configurations in
//! canonical index order, and any surplus is cut by a fixed truncation step
//! after expansion. All random draws happen here, sequentially, before any
//! search run is dispatched; that ordering is what makes a seeded call
//! reproducible.

use crate::error::SamplerError;
use ndarray::Array1;
use smolprng::{Algorithm, PRNG};
use std::str::FromStr;

/// The expansion policy reconciling a candidate pool with the requested run
/// count.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum InitialStatesGenerator {
    /// Fail unless the pool already holds at least `num_reads` entries.
    None,
    /// Repeat the pool cyclically up to `num_reads` entries.
    Tile,
    /// Use the pool first, then fill the shortfall with random draws.
    #[default]
    Random,
}

impl FromStr for InitialStatesGenerator {
    type Err = SamplerError;

    fn from_str(s: &str) -> Result<Self, SamplerError> {
        match s {
            "none" => Ok(Self::None),
            "tile" => Ok(Self::Tile),
            "random" => Ok(Self::Random),
            _ => Err(SamplerError::UnknownGenerator(s.to_string())),
        }
    }
}

impl InitialStatesGenerator {
    /// Expands `pool` to exactly `num_reads` bipolar configurations of
    /// length `num_variables`, already in canonical index order.
    ///
    /// # Errors
    ///
    /// - `InvalidNumReads` when `num_reads` is zero, for any policy
    /// - `InsufficientInitialStates` for `none` with too few entries
    /// - `EmptyInitialStates` for `tile` with an empty pool
    pub fn expand<T: Algorithm>(
        self,
        pool: &[Array1<i8>],
        num_reads: usize,
        num_variables: usize,
        prng: &mut PRNG<T>,
    ) -> Result<Vec<Array1<i8>>, SamplerError> {
        if num_reads == 0 {
            return Err(SamplerError::InvalidNumReads);
        }

        let states = match self {
            Self::None => none_generator(pool, num_reads)?,
            Self::Tile => tile_generator(pool, num_reads)?,
            Self::Random => random_generator(pool, num_reads, num_variables, prng),
        };

        Ok(truncate(states, num_reads))
    }
}

fn none_generator(
    pool: &[Array1<i8>],
    num_reads: usize,
) -> Result<Vec<Array1<i8>>, SamplerError> {
    if pool.len() < num_reads {
        return Err(SamplerError::InsufficientInitialStates);
    }
    Ok(pool.to_vec())
}

fn tile_generator(
    pool: &[Array1<i8>],
    num_reads: usize,
) -> Result<Vec<Array1<i8>>, SamplerError> {
    if pool.is_empty() {
        return Err(SamplerError::EmptyInitialStates);
    }

    // wrap back to the start of the pool until the target count is reached
    let mut states = Vec::with_capacity(num_reads.max(pool.len()));
    for i in 0..num_reads.max(pool.len()) {
        states.push(pool[i % pool.len()].clone());
    }
    Ok(states)
}

fn random_generator<T: Algorithm>(
    pool: &[Array1<i8>],
    num_reads: usize,
    num_variables: usize,
    prng: &mut PRNG<T>,
) -> Vec<Array1<i8>> {
    let mut states = pool.to_vec();

    // fill the shortfall one configuration at a time, drawing coordinates
    // in canonical index order
    while states.len() < num_reads {
        let mut s = Array1::<i8>::zeros(num_variables);
        for i in 0..num_variables {
            s[i] = match prng.gen_u64() & 1 {
                1 => 1,
                _ => -1,
            };
        }
        states.push(s);
    }

    states
}

fn truncate(mut states: Vec<Array1<i8>>, num_reads: usize) -> Vec<Array1<i8>> {
    states.truncate(num_reads);
    states
}
