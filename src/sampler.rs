//! The sample pipeline and the two samplers built on it.
//!
//! Both samplers share one request/response contract: canonicalize the
//! model, reconcile vartypes, expand the candidate starting states to the
//! requested read count, run one local search per read, and relabel the
//! results back into the caller's variables and vartype. The only
//! difference between the samplers is the backend adapter handed to the
//! pipeline.

use crate::backend::{SearchBackend, SteepestDescentBackend, TabuBackend};
use crate::bqm::{Bqm, Variable};
use crate::canonical::{canonicalize, CanonicalMap, CanonicalProblem};
use crate::error::SamplerError;
use crate::initial_states::InitialStatesGenerator;
use crate::sampleset::{SampleRecord, SampleSet};
use crate::utils;
use crate::vartype::{convert_sample, Vartype};
use ndarray::Array1;
use rayon::prelude::*;
use smolprng::{JsfLarge, PRNG};
use std::collections::HashMap;
use std::time::Duration;

/// Options shared by every sample call.
pub struct SampleOptions {
    /// Number of reads; defaults to the number of initial states, or 1 if
    /// none are given.
    pub num_reads: Option<usize>,
    /// Zero or more candidate starting states, one per read.
    pub initial_states: Option<SampleSet>,
    /// How `initial_states` is reconciled with `num_reads`.
    pub initial_states_generator: InitialStatesGenerator,
    /// PRNG seed; a fresh one is drawn from entropy when absent.
    pub seed: Option<u32>,
    /// Deprecated alias for `initial_states`. Honored identically, with a
    /// deprecation notice on stderr.
    pub init_solution: Option<SampleSet>,
}

impl SampleOptions {
    pub const fn new() -> Self {
        Self {
            num_reads: None,
            initial_states: None,
            initial_states_generator: InitialStatesGenerator::Random,
            seed: None,
            init_solution: None,
        }
    }

    fn resolve_initial_states(&self) -> Option<&SampleSet> {
        if let Some(states) = &self.init_solution {
            eprintln!("warning: 'init_solution' is deprecated in favor of 'initial_states'");
            return Some(states);
        }
        self.initial_states.as_ref()
    }
}

impl Default for SampleOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Reorders every pool configuration into canonical index order and
/// converts it to the bipolar convention.
///
/// # Errors
///
/// Returns `VariableMismatch` unless the pool's label set equals the
/// model's and every record has one value per declared variable. A pool
/// with no records is accepted as-is.
fn canonical_pool(
    pool: &SampleSet,
    map: &CanonicalMap,
) -> Result<Vec<Array1<i8>>, SamplerError> {
    if pool.is_empty() {
        return Ok(Vec::new());
    }

    let width = pool.variables().len();
    if pool.records().iter().any(|r| r.sample.len() != width) {
        return Err(SamplerError::VariableMismatch);
    }

    let mut positions: HashMap<&Variable, usize> =
        HashMap::with_capacity(pool.variables().len());
    for (j, v) in pool.variables().iter().enumerate() {
        positions.insert(v, j);
    }
    if positions.len() != map.len() {
        return Err(SamplerError::VariableMismatch);
    }

    // pool column index for each canonical index
    let mut order = Vec::with_capacity(map.len());
    for i in 0..map.len() {
        match positions.get(map.label(i)) {
            Some(j) => order.push(*j),
            None => return Err(SamplerError::VariableMismatch),
        }
    }

    let states = pool
        .records()
        .iter()
        .map(|record| {
            let reordered = Array1::from_shape_fn(map.len(), |i| record.sample[order[i]]);
            convert_sample(&reordered, pool.vartype(), Vartype::Spin)
        })
        .collect();
    Ok(states)
}

/// The shared pipeline. `make_backend` builds the per-call adapter once the
/// canonical problem is known; it runs after validation, so a failed call
/// never constructs a backend.
fn sample_with<B, F>(
    bqm: &Bqm,
    options: &SampleOptions,
    make_backend: F,
) -> Result<SampleSet, SamplerError>
where
    B: SearchBackend,
    F: FnOnce(&CanonicalProblem) -> Result<B, SamplerError>,
{
    let (map, problem) = canonicalize(bqm);

    // an empty model short-circuits to an empty response for any num_reads
    if map.is_empty() {
        return Ok(SampleSet::empty(bqm.vartype()));
    }

    let pool = match options.resolve_initial_states() {
        Some(set) => canonical_pool(set, &map)?,
        None => Vec::new(),
    };

    let num_reads = match options.num_reads {
        Some(r) => r,
        None => pool.len().max(1),
    };
    if num_reads == 0 {
        return Err(SamplerError::InvalidNumReads);
    }

    let seed = options.seed.unwrap_or_else(utils::random_seed);
    let mut prng = PRNG {
        generator: JsfLarge::from(u64::from(seed)),
    };

    let starts =
        options
            .initial_states_generator
            .expand(&pool, num_reads, map.len(), &mut prng)?;

    let backend = make_backend(&problem)?;

    // every PRNG draw is done; the runs are independent pure computations
    // over the shared canonical arrays
    let results: Vec<(Array1<i8>, f64)> = starts
        .par_iter()
        .map(|start| backend.run(&problem, start))
        .collect();

    let records = results
        .into_iter()
        .map(|(s, energy)| SampleRecord {
            sample: convert_sample(&s, Vartype::Spin, bqm.vartype()),
            energy: energy + problem.offset,
            num_occurrences: 1,
        })
        .collect();

    Ok(SampleSet::from_records(
        map.labels().to_vec(),
        records,
        bqm.vartype(),
    ))
}

/// Steepest descent sampler: one descent run per read.
#[derive(Default)]
pub struct SteepestDescentSampler;

impl SteepestDescentSampler {
    pub const fn new() -> Self {
        Self
    }

    /// Samples the model, one steepest descent run per read.
    ///
    /// # Errors
    ///
    /// Validation errors per [`SamplerError`]; no run starts if any occurs.
    pub fn sample(
        &self,
        bqm: &Bqm,
        options: &SampleOptions,
    ) -> Result<SampleSet, SamplerError> {
        sample_with(bqm, options, |problem| {
            Ok(SteepestDescentBackend::new(problem))
        })
    }
}

/// Tabu search sampler: one tabu run per read, with the tuning parameters
/// carried by the sampler itself.
pub struct TabuSampler {
    /// Tabu tenure; defaults to a quarter of the variable count, capped at
    /// 20. Must lie in `[0, num_variables - 1]` when set.
    pub tenure: Option<usize>,
    /// Time budget per run; on expiry a run returns its best configuration
    /// found so far.
    pub timeout: Duration,
    /// Scaling applied to the coefficients before integer truncation.
    pub scale_factor: f64,
}

impl TabuSampler {
    pub const fn new() -> Self {
        Self {
            tenure: None,
            timeout: Duration::from_millis(20),
            scale_factor: 1.0,
        }
    }

    pub fn set_tenure(&mut self, tenure: usize) {
        self.tenure = Some(tenure);
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    pub fn set_scale_factor(&mut self, scale_factor: f64) {
        self.scale_factor = scale_factor;
    }

    /// Samples the model, one tabu run per read.
    ///
    /// # Errors
    ///
    /// Validation errors per [`SamplerError`], including `InvalidTenure`
    /// when the configured tenure is out of range for the model.
    pub fn sample(
        &self,
        bqm: &Bqm,
        options: &SampleOptions,
    ) -> Result<SampleSet, SamplerError> {
        sample_with(bqm, options, |problem| {
            let n = problem.num_variables();
            let tenure = match self.tenure {
                Some(t) => {
                    if t >= n {
                        return Err(SamplerError::InvalidTenure(n - 1));
                    }
                    t
                }
                None => 20.min(n / 4),
            };
            Ok(TabuBackend::new(
                problem,
                tenure,
                self.timeout,
                self.scale_factor,
            ))
        })
    }
}

impl Default for TabuSampler {
    fn default() -> Self {
        Self::new()
    }
}
