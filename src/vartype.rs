//! The two binary-variable conventions and the elementwise conversions
//! between them. The conversions are exact inverses of each other in
//! integer arithmetic, so round-tripping a configuration never drifts.

use crate::error::SamplerError;
use ndarray::Array1;
use std::str::FromStr;

/// The value domain convention of a model or configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Vartype {
    /// Bipolar convention, variables take values in {-1, +1}.
    Spin,
    /// Boolean convention, variables take values in {0, 1}.
    Binary,
}

impl FromStr for Vartype {
    type Err = SamplerError;

    fn from_str(s: &str) -> Result<Self, SamplerError> {
        match s {
            "SPIN" | "spin" => Ok(Self::Spin),
            "BINARY" | "binary" => Ok(Self::Binary),
            _ => Err(SamplerError::UnknownVartype(s.to_string())),
        }
    }
}

/// Converts a Boolean configuration to the bipolar convention, bit by bit.
pub fn binary_to_spin(x: &Array1<i8>) -> Array1<i8> {
    x.mapv(|b| 2 * b - 1)
}

/// Converts a bipolar configuration to the Boolean convention, spin by spin.
pub fn spin_to_binary(s: &Array1<i8>) -> Array1<i8> {
    s.mapv(|v| (v + 1) / 2)
}

/// Converts a configuration between conventions. A same-convention request is
/// a copy.
pub fn convert_sample(x: &Array1<i8>, from: Vartype, to: Vartype) -> Array1<i8> {
    match (from, to) {
        (Vartype::Binary, Vartype::Spin) => binary_to_spin(x),
        (Vartype::Spin, Vartype::Binary) => spin_to_binary(x),
        _ => x.clone(),
    }
}
