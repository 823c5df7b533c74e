//! Canonicalization of a labeled model into a dense, consecutively indexed
//! form.
//!
//! Every sample call starts here: the model's labels are mapped onto
//! `0..N-1`, its coefficients are flattened into arrays in the bipolar
//! convention, and everything downstream (expansion, search, assembly) works
//! purely in canonical index space until the response is relabeled at the
//! very end.

use crate::bqm::{Bqm, Variable};
use crate::vartype::Vartype;
use ndarray::Array1;
use sprs::{CsMat, TriMat};

/// A bijection between original variable labels and canonical indices,
/// valid for the duration of one sample call.
///
/// The canonical order is the sorted label order. When the labels are
/// exactly `Index(0)..Index(N-1)` the map is the identity and lookups skip
/// the search.
#[derive(Clone, Debug)]
pub struct CanonicalMap {
    labels: Vec<Variable>,
    identity: bool,
}

impl CanonicalMap {
    pub fn build(bqm: &Bqm) -> Self {
        // BTreeMap keys come out already sorted
        let labels: Vec<Variable> = bqm.variables().cloned().collect();
        let identity = labels
            .iter()
            .enumerate()
            .all(|(i, v)| *v == Variable::Index(i));
        Self { labels, identity }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub const fn is_identity(&self) -> bool {
        self.identity
    }

    /// The original label of a canonical index.
    pub fn label(&self, index: usize) -> &Variable {
        &self.labels[index]
    }

    pub fn labels(&self) -> &[Variable] {
        &self.labels
    }

    /// The canonical index of an original label, or `None` for a label that
    /// is not part of the model.
    pub fn index(&self, label: &Variable) -> Option<usize> {
        if self.identity {
            return match label {
                Variable::Index(i) if *i < self.labels.len() => Some(*i),
                _ => None,
            };
        }
        self.labels.binary_search(label).ok()
    }
}

/// The dense canonical form of a model, always in the bipolar convention.
///
/// The coupler arrays are parallel and enumerate every nonzero quadratic
/// term exactly once, with `coupler_starts[k] < coupler_ends[k]`. The offset
/// already folds in any shift introduced by converting a Boolean model to
/// the bipolar convention.
#[derive(Clone, Debug)]
pub struct CanonicalProblem {
    pub linear: Array1<f64>,
    pub coupler_starts: Vec<usize>,
    pub coupler_ends: Vec<usize>,
    pub coupler_weights: Vec<f64>,
    pub offset: f64,
}

impl CanonicalProblem {
    pub fn num_variables(&self) -> usize {
        self.linear.len()
    }

    pub fn num_couplers(&self) -> usize {
        self.coupler_weights.len()
    }

    /// Evaluates the bipolar energy of a canonical configuration, without
    /// the offset. The offset is reapplied once by the result assembler.
    pub fn energy(&self, s: &Array1<i8>) -> f64 {
        let mut e = 0.0;
        for i in 0..self.linear.len() {
            e += self.linear[i] * f64::from(s[i]);
        }
        for k in 0..self.coupler_weights.len() {
            e += self.coupler_weights[k]
                * f64::from(s[self.coupler_starts[k]])
                * f64::from(s[self.coupler_ends[k]]);
        }
        e
    }

    /// Builds the symmetric sparse adjacency of the couplers, with each
    /// weight stored in both triangles, for kernels that walk neighborhoods.
    pub fn to_adjacency(&self) -> CsMat<f64> {
        let n = self.num_variables();
        let mut triplets = TriMat::<f64>::new((n, n));
        for k in 0..self.coupler_weights.len() {
            let (a, b) = (self.coupler_starts[k], self.coupler_ends[k]);
            triplets.add_triplet(a, b, self.coupler_weights[k]);
            triplets.add_triplet(b, a, self.coupler_weights[k]);
        }
        triplets.to_csr()
    }
}

/// Maps a model to its canonical index map and dense bipolar coefficient
/// arrays.
///
/// An empty model canonicalizes to empty arrays; callers short-circuit to an
/// empty response without invoking any search.
pub fn canonicalize(bqm: &Bqm) -> (CanonicalMap, CanonicalProblem) {
    let map = CanonicalMap::build(bqm);
    let spin = bqm.change_vartype(Vartype::Spin);

    let mut linear = Array1::<f64>::zeros(map.len());
    for (v, bias) in spin.linear() {
        // every linear key is a model variable, so the lookup cannot miss
        if let Some(i) = map.index(v) {
            linear[i] = *bias;
        }
    }

    let mut coupler_starts = Vec::new();
    let mut coupler_ends = Vec::new();
    let mut coupler_weights = Vec::new();
    for ((u, v), weight) in spin.quadratic() {
        if *weight == 0.0 {
            continue;
        }
        if let (Some(i), Some(j)) = (map.index(u), map.index(v)) {
            coupler_starts.push(i.min(j));
            coupler_ends.push(i.max(j));
            coupler_weights.push(*weight);
        }
    }

    let problem = CanonicalProblem {
        linear,
        coupler_starts,
        coupler_ends,
        coupler_weights,
        offset: spin.offset(),
    };

    (map, problem)
}
