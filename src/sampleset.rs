use crate::bqm::Variable;
use crate::vartype::{convert_sample, Vartype};
use ndarray::Array1;
use std::collections::BTreeMap;

/// One completed run: a configuration, its offset-adjusted energy, and an
/// occurrence count. Duplicate configurations are not merged, so the count
/// is 1 for every record a sampler produces.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleRecord {
    pub sample: Array1<i8>,
    pub energy: f64,
    pub num_occurrences: usize,
}

/// An ordered collection of samples over a shared variable order and
/// vartype, used both for caller-supplied candidate starting states and
/// for the response of a sample call. Every record's configuration is
/// column-aligned to the declared variable order.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleSet {
    variables: Vec<Variable>,
    records: Vec<SampleRecord>,
    vartype: Vartype,
}

impl SampleSet {
    /// A sample set with no variables and no records.
    pub const fn empty(vartype: Vartype) -> Self {
        Self {
            variables: Vec::new(),
            records: Vec::new(),
            vartype,
        }
    }

    /// Builds a sample set from raw configurations, one record per
    /// configuration, with zero energy and occurrence count 1. This is the
    /// constructor used for candidate pools, where energies are ignored.
    pub fn from_samples(
        variables: Vec<Variable>,
        samples: Vec<Array1<i8>>,
        vartype: Vartype,
    ) -> Self {
        let records = samples
            .into_iter()
            .map(|sample| SampleRecord {
                sample,
                energy: 0.0,
                num_occurrences: 1,
            })
            .collect();
        Self {
            variables,
            records,
            vartype,
        }
    }

    pub fn from_records(
        variables: Vec<Variable>,
        records: Vec<SampleRecord>,
        vartype: Vartype,
    ) -> Self {
        Self {
            variables,
            records,
            vartype,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub const fn vartype(&self) -> Vartype {
        self.vartype
    }

    pub fn records(&self) -> &[SampleRecord] {
        &self.records
    }

    /// The lowest-energy record, if any.
    pub fn first(&self) -> Option<&SampleRecord> {
        self.records
            .iter()
            .min_by(|a, b| a.energy.partial_cmp(&b.energy).unwrap())
    }

    /// A label-keyed view of one record's configuration.
    pub fn sample_map(&self, index: usize) -> BTreeMap<Variable, i8> {
        self.variables
            .iter()
            .cloned()
            .zip(self.records[index].sample.iter().copied())
            .collect()
    }

    /// Returns a copy with every configuration converted to the requested
    /// vartype. Energies are model-relative and unchanged by the
    /// conversion.
    pub fn change_vartype(&self, vartype: Vartype) -> Self {
        if vartype == self.vartype {
            return self.clone();
        }
        let records = self
            .records
            .iter()
            .map(|r| SampleRecord {
                sample: convert_sample(&r.sample, self.vartype, vartype),
                energy: r.energy,
                num_occurrences: r.num_occurrences,
            })
            .collect();
        Self {
            variables: self.variables.clone(),
            records,
            vartype,
        }
    }
}
