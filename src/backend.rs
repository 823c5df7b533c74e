//! The capability boundary between the normalization layer and the search
//! kernels.
//!
//! A backend is an interface with one operation: run one local search from
//! one canonical bipolar starting configuration and return a configuration
//! with its energy. Each concrete adapter does its per-call setup once at
//! construction (adjacency for descent, the dense integer matrix for tabu)
//! so that the per-run operation is a pure function over shared read-only
//! state and can be fanned out in parallel.

use crate::canonical::CanonicalProblem;
use crate::descent;
use crate::tabu;
use crate::vartype::{binary_to_spin, spin_to_binary};
use ndarray::{Array1, Array2};
use sprs::CsMat;
use std::time::Duration;

/// One local-search run: canonical bipolar start in, canonical bipolar
/// configuration and energy (offset excluded) out.
pub trait SearchBackend: Sync {
    fn run(&self, problem: &CanonicalProblem, start: &Array1<i8>) -> (Array1<i8>, f64);
}

/// Steepest descent adapter. No tuning parameters beyond the arrays
/// themselves; deterministic given its inputs.
pub struct SteepestDescentBackend {
    adjacency: CsMat<f64>,
}

impl SteepestDescentBackend {
    pub fn new(problem: &CanonicalProblem) -> Self {
        Self {
            adjacency: problem.to_adjacency(),
        }
    }
}

impl SearchBackend for SteepestDescentBackend {
    fn run(&self, problem: &CanonicalProblem, start: &Array1<i8>) -> (Array1<i8>, f64) {
        descent::steepest_descent(problem, &self.adjacency, start)
    }
}

/// Tabu adapter, carrying the kernel's tuning parameters and the dense
/// integer matrix it searches over.
pub struct TabuBackend {
    qubo: Array2<i64>,
    tenure: usize,
    timeout: Duration,
}

impl TabuBackend {
    /// Assembles the dense symmetric Boolean-convention matrix
    /// `M = 0.5*U + (0.5*U)^T`, where U is upper triangular with the linear
    /// terms on its diagonal, scales it by `scale_factor`, and truncates
    /// the entries to integers. The scaling is part of the caller's
    /// contract: it sets the precision at which non-integer coefficients
    /// survive the truncation.
    pub fn new(
        problem: &CanonicalProblem,
        tenure: usize,
        timeout: Duration,
        scale_factor: f64,
    ) -> Self {
        let n = problem.num_variables();

        // bipolar (h, J) to Boolean (a, b): a_i = 2 h_i - 2 sum_j J_ij,
        // b_ij = 4 J_ij; the offset shift is not needed here because run
        // energies are evaluated on the bipolar problem
        let mut incident = vec![0.0; n];
        let mut u = Array2::<f64>::zeros((n, n));
        for k in 0..problem.num_couplers() {
            let (a, b) = (problem.coupler_starts[k], problem.coupler_ends[k]);
            let weight = problem.coupler_weights[k];
            u[[a, b]] += 4.0 * weight;
            incident[a] += weight;
            incident[b] += weight;
        }
        for i in 0..n {
            u[[i, i]] = 2.0 * problem.linear[i] - 2.0 * incident[i];
        }

        let symmetric = (&u + &u.t()) * 0.5;
        let qubo = symmetric.mapv(|v| (v * scale_factor) as i64);

        Self {
            qubo,
            tenure,
            timeout,
        }
    }
}

impl SearchBackend for TabuBackend {
    fn run(&self, problem: &CanonicalProblem, start: &Array1<i8>) -> (Array1<i8>, f64) {
        let x_0 = spin_to_binary(start);
        let x = tabu::tabu_search(&self.qubo, &x_0, self.tenure, self.timeout);
        let s = binary_to_spin(&x);
        let energy = problem.energy(&s);
        (s, energy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bqm::Bqm;
    use crate::canonical::canonicalize;

    fn canonical(bqm: &Bqm) -> CanonicalProblem {
        canonicalize(bqm).1
    }

    #[test]
    fn test_tabu_matrix_symmetrization() {
        // E_spin = -0.5 s_a + s_b - s_a s_b converts to
        // E_bin = x_a + 4 x_b - 4 x_a x_b - 1.5
        let bqm = Bqm::from_ising(
            vec![("a", -0.5), ("b", 1.0)],
            vec![(("a", "b"), -1.0)],
        )
        .unwrap();
        let problem = canonical(&bqm);
        let adapter = TabuBackend::new(&problem, 0, Duration::from_millis(1), 1.0);

        assert_eq!(adapter.qubo[[0, 0]], 1);
        assert_eq!(adapter.qubo[[1, 1]], 4);
        // the -4 coupling is split across both triangles
        assert_eq!(adapter.qubo[[0, 1]], -2);
        assert_eq!(adapter.qubo[[1, 0]], -2);
    }

    #[test]
    fn test_tabu_scale_factor_sets_precision() {
        let bqm = Bqm::from_ising(vec![("a", 0.25)], vec![]).unwrap();
        let problem = canonical(&bqm);

        // a = 2 * 0.25 = 0.5, lost entirely at unit scale
        let unit = TabuBackend::new(&problem, 0, Duration::from_millis(1), 1.0);
        assert_eq!(unit.qubo[[0, 0]], 0);

        let scaled = TabuBackend::new(&problem, 0, Duration::from_millis(1), 100.0);
        assert_eq!(scaled.qubo[[0, 0]], 50);
    }

    #[test]
    fn test_tabu_run_reports_bipolar_energy() {
        let bqm = Bqm::from_ising(
            vec![("a", -0.5), ("b", 1.0)],
            vec![(("a", "b"), -1.0)],
        )
        .unwrap();
        let problem = canonical(&bqm);
        let adapter = TabuBackend::new(&problem, 1, Duration::from_millis(20), 1.0);

        let start = Array1::from_vec(vec![1, 1]);
        let (s, e) = adapter.run(&problem, &start);
        assert!(s.iter().all(|v| *v == -1 || *v == 1));
        assert_eq!(e, problem.energy(&s));
        // the 20 ms budget is plenty for two variables
        assert_eq!(e, -1.5);
    }

    #[test]
    fn test_descent_run_matches_kernel_contract() {
        let bqm = Bqm::from_ising(vec![("a", 1.0)], vec![]).unwrap();
        let problem = canonical(&bqm);
        let adapter = SteepestDescentBackend::new(&problem);
        let (s, e) = adapter.run(&problem, &Array1::from_vec(vec![1]));
        assert_eq!(s, Array1::from_vec(vec![-1]));
        assert_eq!(e, -1.0);
    }
}
