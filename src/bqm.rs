//! The binary quadratic model type and its variable labels.
//!
//! A `Bqm` is a set of arbitrarily labeled variables with linear and
//! quadratic coefficients, a scalar offset, and a vartype tag. It is the
//! caller-owned, read-only input of every sample call.

use crate::error::SamplerError;
use crate::vartype::Vartype;
use std::collections::BTreeMap;
use std::fmt;

/// A variable label: a dense index or a name.
///
/// The derived `Ord` is total, indices order numerically, names
/// lexicographically, and all indices sort before all names. Because every
/// pair of labels is comparable, the canonical variable order is always the
/// sorted order.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Variable {
    Index(usize),
    Name(String),
}

impl From<usize> for Variable {
    fn from(i: usize) -> Self {
        Self::Index(i)
    }
}

impl From<&str> for Variable {
    fn from(s: &str) -> Self {
        Self::Name(s.to_string())
    }
}

impl From<String> for Variable {
    fn from(s: String) -> Self {
        Self::Name(s)
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "{i}"),
            Self::Name(s) => write!(f, "{s}"),
        }
    }
}

/// A binary quadratic model: linear terms, pair interactions, an offset and
/// a vartype.
///
/// Quadratic keys are stored with the lesser label first, so each unordered
/// pair appears exactly once. Both coefficient maps are `BTreeMap`s, which
/// keeps iteration (and therefore energy summation order) deterministic
/// across processes.
#[derive(Clone, Debug, PartialEq)]
pub struct Bqm {
    linear: BTreeMap<Variable, f64>,
    quadratic: BTreeMap<(Variable, Variable), f64>,
    offset: f64,
    vartype: Vartype,
}

impl Bqm {
    pub fn new(vartype: Vartype) -> Self {
        Self {
            linear: BTreeMap::new(),
            quadratic: BTreeMap::new(),
            offset: 0.0,
            vartype,
        }
    }

    /// Builds a bipolar model from linear biases and pair couplings.
    ///
    /// # Errors
    ///
    /// Returns `SelfLoop` if any coupling pairs a variable with itself.
    pub fn from_ising<V: Into<Variable>>(
        linear: Vec<(V, f64)>,
        quadratic: Vec<((V, V), f64)>,
    ) -> Result<Self, SamplerError> {
        let mut bqm = Self::new(Vartype::Spin);
        for (v, bias) in linear {
            bqm.add_linear(v, bias);
        }
        for ((u, v), weight) in quadratic {
            bqm.add_quadratic(u, v, weight)?;
        }
        Ok(bqm)
    }

    /// Builds a Boolean model from a QUBO coefficient list. Diagonal entries
    /// are linear terms.
    ///
    /// # Errors
    ///
    /// This function never errors; the signature matches `from_ising` for
    /// uniformity at the call sites.
    pub fn from_qubo<V: Into<Variable>>(
        coefficients: Vec<((V, V), f64)>,
    ) -> Result<Self, SamplerError> {
        let mut bqm = Self::new(Vartype::Binary);
        for ((u, v), weight) in coefficients {
            let u = u.into();
            let v = v.into();
            if u == v {
                bqm.add_linear(u, weight);
            } else {
                bqm.add_quadratic(u, v, weight)?;
            }
        }
        Ok(bqm)
    }

    /// Adds a variable with zero bias if it is not already present.
    pub fn add_variable<V: Into<Variable>>(&mut self, v: V) {
        self.linear.entry(v.into()).or_insert(0.0);
    }

    /// Adds to the linear bias of a variable, inserting it if needed.
    pub fn add_linear<V: Into<Variable>>(&mut self, v: V, bias: f64) {
        *self.linear.entry(v.into()).or_insert(0.0) += bias;
    }

    /// Adds to the coupling of an unordered pair, inserting both variables
    /// if needed.
    ///
    /// # Errors
    ///
    /// Returns `SelfLoop` when both labels are the same variable.
    pub fn add_quadratic<V: Into<Variable>>(
        &mut self,
        u: V,
        v: V,
        weight: f64,
    ) -> Result<(), SamplerError> {
        let u = u.into();
        let v = v.into();
        if u == v {
            return Err(SamplerError::SelfLoop);
        }

        self.linear.entry(u.clone()).or_insert(0.0);
        self.linear.entry(v.clone()).or_insert(0.0);

        // normalize the key so each unordered pair is stored once
        let key = match u < v {
            true => (u, v),
            false => (v, u),
        };
        *self.quadratic.entry(key).or_insert(0.0) += weight;
        Ok(())
    }

    pub fn set_offset(&mut self, offset: f64) {
        self.offset = offset;
    }

    pub const fn offset(&self) -> f64 {
        self.offset
    }

    pub const fn vartype(&self) -> Vartype {
        self.vartype
    }

    pub fn num_variables(&self) -> usize {
        self.linear.len()
    }

    pub fn is_empty(&self) -> bool {
        self.linear.is_empty()
    }

    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.linear.keys()
    }

    pub fn contains(&self, v: &Variable) -> bool {
        self.linear.contains_key(v)
    }

    pub const fn linear(&self) -> &BTreeMap<Variable, f64> {
        &self.linear
    }

    pub const fn quadratic(&self) -> &BTreeMap<(Variable, Variable), f64> {
        &self.quadratic
    }

    /// Evaluates the energy of a fully specified sample in the model's own
    /// vartype, including the offset.
    ///
    /// # Panics
    ///
    /// Panics if the sample does not assign a value to every variable of the
    /// model.
    pub fn energy(&self, sample: &BTreeMap<Variable, i8>) -> f64 {
        let mut e = self.offset;
        for (v, bias) in &self.linear {
            e += bias * f64::from(sample[v]);
        }
        for ((u, v), weight) in &self.quadratic {
            e += weight * f64::from(sample[u]) * f64::from(sample[v]);
        }
        e
    }

    /// Returns an equivalent model in the requested vartype.
    ///
    /// The quadratic-form substitution updates the linear terms and the
    /// offset so that every configuration keeps its energy under the
    /// matching configuration conversion.
    pub fn change_vartype(&self, vartype: Vartype) -> Self {
        if vartype == self.vartype {
            return self.clone();
        }

        // per-variable sum of incident coupling weights
        let mut incident: BTreeMap<&Variable, f64> = BTreeMap::new();
        for ((u, v), weight) in &self.quadratic {
            *incident.entry(u).or_insert(0.0) += weight;
            *incident.entry(v).or_insert(0.0) += weight;
        }

        let mut converted = Self::new(vartype);
        match vartype {
            Vartype::Spin => {
                // x = (s + 1) / 2
                let mut offset = self.offset;
                for (v, bias) in &self.linear {
                    let adj = incident.get(v).copied().unwrap_or(0.0);
                    converted
                        .linear
                        .insert(v.clone(), 0.5 * bias + 0.25 * adj);
                    offset += 0.5 * bias;
                }
                for ((u, v), weight) in &self.quadratic {
                    converted
                        .quadratic
                        .insert((u.clone(), v.clone()), 0.25 * weight);
                    offset += 0.25 * weight;
                }
                converted.offset = offset;
            }
            Vartype::Binary => {
                // s = 2x - 1
                let mut offset = self.offset;
                for (v, bias) in &self.linear {
                    let adj = incident.get(v).copied().unwrap_or(0.0);
                    converted
                        .linear
                        .insert(v.clone(), 2.0 * bias - 2.0 * adj);
                    offset -= bias;
                }
                for ((u, v), weight) in &self.quadratic {
                    converted
                        .quadratic
                        .insert((u.clone(), v.clone()), 4.0 * weight);
                    offset += weight;
                }
                converted.offset = offset;
            }
        }

        converted
    }
}
