//! Single-start tabu search over Boolean configurations.
//!
//! The kernel works on the dense symmetric integer matrix assembled by the
//! tabu adapter: recently flipped variables are tabu for `tenure`
//! iterations, an aspiration rule overrides the tabu status of any move
//! that would beat the incumbent, and the search keeps moving (uphill if it
//! must) until the time budget expires. It always returns the best
//! configuration found, never fails.

use ndarray::{Array1, Array2};
use std::time::{Duration, Instant};

/// Evaluates `x^T Q x` over the integer matrix.
fn evaluate(q: &Array2<i64>, x: &Array1<i8>) -> i64 {
    let n = x.len();
    let mut e = 0;
    for i in 0..n {
        if x[i] == 0 {
            continue;
        }
        for j in 0..n {
            e += q[[i, j]] * i64::from(x[j]);
        }
    }
    e
}

/// The energy change of flipping variable `i` in `x`.
fn flip_gain(q: &Array2<i64>, x: &Array1<i8>, i: usize) -> i64 {
    let mut field = q[[i, i]];
    for j in 0..x.len() {
        if j != i {
            field += 2 * q[[i, j]] * i64::from(x[j]);
        }
    }
    (1 - 2 * i64::from(x[i])) * field
}

/// Runs tabu search from `x_0` until `timeout` expires and returns the best
/// Boolean configuration found (which can be `x_0` itself).
pub fn tabu_search(
    q: &Array2<i64>,
    x_0: &Array1<i8>,
    tenure: usize,
    timeout: Duration,
) -> Array1<i8> {
    let n = x_0.len();
    if n == 0 {
        return x_0.clone();
    }

    let start = Instant::now();

    let mut x = x_0.clone();
    let mut energy = evaluate(q, &x);
    let mut best_x = x.clone();
    let mut best_energy = energy;

    // iteration index until which each variable stays tabu
    let mut tabu_until = vec![0_usize; n];
    let mut iteration = 0_usize;

    while start.elapsed() < timeout {
        iteration += 1;

        // best admissible move: non-tabu, or tabu but beating the incumbent
        let mut chosen: Option<(usize, i64)> = None;
        let mut fallback: Option<(usize, i64)> = None;
        for i in 0..n {
            let delta = flip_gain(q, &x, i);
            let aspirates = energy + delta < best_energy;
            if tabu_until[i] <= iteration || aspirates {
                if chosen.map_or(true, |(_, d)| delta < d) {
                    chosen = Some((i, delta));
                }
            }
            if fallback.map_or(true, |(_, d)| delta < d) {
                fallback = Some((i, delta));
            }
        }

        // when every move is tabu and none aspirates, take the least bad one
        let (i, delta) = match chosen.or(fallback) {
            Some(step) => step,
            None => break,
        };

        x[i] = 1 - x[i];
        energy += delta;
        tabu_until[i] = iteration + tenure;

        if energy < best_energy {
            best_energy = energy;
            best_x = x.clone();
        }
    }

    best_x
}
