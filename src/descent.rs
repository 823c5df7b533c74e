//! Steepest descent over bipolar configurations.
//!
//! One run flips the single variable with the most negative energy delta
//! until no flip is strictly improving. The kernel keeps the local fields
//! incremental, so a flip costs a walk of the flipped variable's
//! neighborhood rather than a full re-evaluation.

use crate::canonical::CanonicalProblem;
use ndarray::Array1;
use sprs::CsMat;

/// Runs one steepest descent from `s_0` and returns the locally optimal
/// configuration with its bipolar energy (offset excluded).
///
/// `adjacency` is the symmetric coupler matrix of `problem`, built once per
/// sample call and shared read-only across runs.
pub fn steepest_descent(
    problem: &CanonicalProblem,
    adjacency: &CsMat<f64>,
    s_0: &Array1<i8>,
) -> (Array1<i8>, f64) {
    let n = problem.num_variables();
    let mut s = s_0.clone();

    // local fields f_i = h_i + sum_j J_ij s_j
    let s_f = s.mapv(f64::from);
    let mut fields = adjacency * &s_f + &problem.linear;

    loop {
        // flipping s_i changes the energy by -2 s_i f_i; take the steepest
        let mut best = 0;
        let mut best_delta = 0.0;
        for i in 0..n {
            let delta = -2.0 * f64::from(s[i]) * fields[i];
            if delta < best_delta {
                best_delta = delta;
                best = i;
            }
        }

        // converged once no flip is strictly improving
        if best_delta >= 0.0 {
            break;
        }

        s[best] = -s[best];

        if let Some(row) = adjacency.outer_view(best) {
            for (j, weight) in row.iter() {
                fields[j] += 2.0 * weight * f64::from(s[best]);
            }
        }
    }

    let energy = problem.energy(&s);
    (s, energy)
}
