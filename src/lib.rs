//! # Talos: local search samplers for binary quadratic models
//!
//! Talos approximates low-energy configurations of binary quadratic models
//! (Ising or QUBO) with two interchangeable local-search samplers behind a
//! single request/response contract:
//!
//! - [`SteepestDescentSampler`], which runs one steepest descent per read
//! - [`TabuSampler`], which runs one time-budgeted tabu search per read
//!
//! Both samplers canonicalize the model's arbitrary variable labels onto a
//! dense index space, reconcile the bipolar and Boolean variable
//! conventions, and expand any caller-supplied starting states to the
//! requested read count under one of three policies (`none`, `tile`,
//! `random`) before fanning the independent runs out in parallel.

pub mod backend;
pub mod bqm;
pub mod canonical;
pub mod descent;
pub mod error;
pub mod initial_states;
pub mod sampler;
pub mod sampleset;
pub mod tabu;
pub mod utils;
pub mod vartype;

pub use crate::bqm::{Bqm, Variable};
pub use crate::error::SamplerError;
pub use crate::initial_states::InitialStatesGenerator;
pub use crate::sampler::{SampleOptions, SteepestDescentSampler, TabuSampler};
pub use crate::sampleset::{SampleRecord, SampleSet};
pub use crate::vartype::Vartype;

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array1;
    use std::collections::BTreeMap;

    fn two_var_spin() -> Bqm {
        Bqm::from_ising(
            vec![("a", -0.5), ("b", 1.0)],
            vec![(("a", "b"), -1.0)],
        )
        .unwrap()
    }

    #[test]
    fn test_end_to_end_seeded_descent() {
        // one read, no initial states, random policy, fixed seed
        let bqm = two_var_spin();
        let mut options = SampleOptions::new();
        options.num_reads = Some(1);
        options.seed = Some(0);

        let sampler = SteepestDescentSampler::new();
        let result = sampler.sample(&bqm, &options).unwrap();
        assert_eq!(result.len(), 1);

        // the reported energy matches an independent evaluation of the
        // returned configuration
        let record = &result.records()[0];
        assert_eq!(record.energy, bqm.energy(&result.sample_map(0)));

        // both one-flip-optimal configurations of this model
        assert!(record.energy == -1.5 || record.energy == -0.5);

        // the same seed reproduces the call bit for bit
        let again = sampler.sample(&bqm, &options).unwrap();
        assert_eq!(result, again);
    }

    #[test]
    fn test_empty_model_returns_empty_response() {
        let bqm = Bqm::new(Vartype::Spin);
        let mut options = SampleOptions::new();
        options.num_reads = Some(10);

        let descent = SteepestDescentSampler::new().sample(&bqm, &options).unwrap();
        assert!(descent.is_empty());
        assert_eq!(descent.vartype(), Vartype::Spin);

        let tabu = TabuSampler::new().sample(&bqm, &options).unwrap();
        assert!(tabu.is_empty());
    }

    #[test]
    fn test_none_policy_through_sampler() {
        let bqm = two_var_spin();
        let variables = vec![Variable::from("a"), Variable::from("b")];

        let mut options = SampleOptions::new();
        options.num_reads = Some(2);
        options.initial_states_generator = InitialStatesGenerator::None;
        options.initial_states = Some(SampleSet::from_samples(
            variables.clone(),
            vec![Array1::from_vec(vec![1, 1])],
            Vartype::Spin,
        ));

        assert_eq!(
            SteepestDescentSampler::new().sample(&bqm, &options),
            Err(SamplerError::InsufficientInitialStates)
        );

        options.initial_states = Some(SampleSet::from_samples(
            variables,
            vec![Array1::from_vec(vec![1, 1]), Array1::from_vec(vec![-1, -1])],
            Vartype::Spin,
        ));
        let result = SteepestDescentSampler::new().sample(&bqm, &options).unwrap();
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_tile_policy_through_sampler() {
        let bqm = two_var_spin();
        let mut options = SampleOptions::new();
        options.num_reads = Some(5);
        options.initial_states_generator = InitialStatesGenerator::Tile;
        options.initial_states = Some(SampleSet::from_samples(
            vec![Variable::from("a"), Variable::from("b")],
            vec![Array1::from_vec(vec![-1, -1]), Array1::from_vec(vec![1, 1])],
            Vartype::Spin,
        ));

        let result = SteepestDescentSampler::new().sample(&bqm, &options).unwrap();
        assert_eq!(result.len(), 5);

        // both pool entries are already one-flip optimal, so the tiling
        // order shows through in the energies
        let energies: Vec<f64> = result.records().iter().map(|r| r.energy).collect();
        assert_eq!(energies, vec![-1.5, -0.5, -1.5, -0.5, -1.5]);
    }

    #[test]
    fn test_energy_invariant_under_relabeling() {
        // the same model expressed under three label orderings
        let labelings: Vec<(Variable, Variable, Variable)> = vec![
            ("a".into(), "b".into(), "c".into()),
            ("c".into(), "a".into(), "b".into()),
            (0usize.into(), 2usize.into(), 1usize.into()),
        ];

        let mut energies = Vec::new();
        for (u, v, w) in labelings {
            let bqm = Bqm::from_ising(
                vec![(u.clone(), 0.5), (v.clone(), -1.0), (w.clone(), 0.25)],
                vec![((u.clone(), v.clone()), -1.0), ((v.clone(), w.clone()), 2.0)],
            )
            .unwrap();

            // the configuration u=1, v=-1, w=1, permuted along with labels
            let mut sample = BTreeMap::new();
            sample.insert(u, 1);
            sample.insert(v, -1);
            sample.insert(w, 1);
            energies.push(bqm.energy(&sample));
        }

        assert!(energies.iter().all(|e| *e == energies[0]));
    }

    #[test]
    fn test_random_policy_reproducible_across_samplers_of_same_kind() {
        let bqm = Bqm::from_ising(
            vec![(0usize, 0.1), (1usize, -0.3), (2usize, 0.2), (3usize, 0.0)],
            vec![
                ((0usize, 1usize), -1.0),
                ((1usize, 2usize), 0.5),
                ((2usize, 3usize), -0.75),
            ],
        )
        .unwrap();

        let mut options = SampleOptions::new();
        options.num_reads = Some(8);
        options.seed = Some(1234);

        let sampler = SteepestDescentSampler::new();
        let first = sampler.sample(&bqm, &options).unwrap();
        let second = sampler.sample(&bqm, &options).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 8);

        // every record's energy checks out against the model
        for i in 0..first.len() {
            assert_eq!(
                first.records()[i].energy,
                bqm.energy(&first.sample_map(i))
            );
        }
    }

    #[test]
    fn test_binary_model_round_trips_through_sampler() {
        // E(x) = -x_a - x_b + 2 x_a x_b has minima at the two mixed states
        let bqm = Bqm::from_qubo(vec![
            (("a", "a"), -1.0),
            (("b", "b"), -1.0),
            (("a", "b"), 2.0),
        ])
        .unwrap();

        let mut options = SampleOptions::new();
        options.num_reads = Some(4);
        options.seed = Some(5);

        let result = SteepestDescentSampler::new().sample(&bqm, &options).unwrap();
        assert_eq!(result.vartype(), Vartype::Binary);
        for record in result.records() {
            assert!(record.sample.iter().all(|v| *v == 0 || *v == 1));
        }
        assert_eq!(result.first().unwrap().energy, -1.0);
    }

    #[test]
    fn test_tabu_sampler_end_to_end() {
        let bqm = two_var_spin();
        let mut options = SampleOptions::new();
        options.num_reads = Some(3);
        options.seed = Some(0);

        let result = TabuSampler::new().sample(&bqm, &options).unwrap();
        assert_eq!(result.len(), 3);
        for i in 0..result.len() {
            assert_eq!(
                result.records()[i].energy,
                bqm.energy(&result.sample_map(i))
            );
        }
        // 20 ms per read is plenty to reach the ground state of 2 variables
        assert_eq!(result.first().unwrap().energy, -1.5);
    }

    #[test]
    fn test_sorted_relabeling_in_response() {
        let bqm = Bqm::from_ising(
            vec![("z", 1.0), ("a", 1.0), ("m", 1.0)],
            vec![],
        )
        .unwrap();
        let mut options = SampleOptions::new();
        options.seed = Some(0);

        let result = SteepestDescentSampler::new().sample(&bqm, &options).unwrap();
        assert_eq!(
            result.variables(),
            &[Variable::from("a"), Variable::from("m"), Variable::from("z")]
        );
        // independent fields with positive bias all descend to -1
        assert_eq!(result.records()[0].sample, Array1::from_vec(vec![-1, -1, -1]));
        assert_eq!(result.records()[0].energy, -3.0);
    }
}
