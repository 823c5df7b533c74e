use thiserror::Error;

/// Everything that can go wrong while building a model or servicing a sample
/// call. All of these surface before any search run starts; a failed call
/// never returns a partial sample set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SamplerError {
    #[error("'num_reads' should be a positive integer")]
    InvalidNumReads,

    #[error("insufficient number of initial states given")]
    InsufficientInitialStates,

    #[error("cannot tile an empty set of initial states")]
    EmptyInitialStates,

    #[error("mismatch between variables in 'initial_states' and the model")]
    VariableMismatch,

    #[error("interactions must couple two distinct variables")]
    SelfLoop,

    #[error("'tenure' should be an integer in range [0, {0}]")]
    InvalidTenure(usize),

    #[error("unknown value for 'initial_states_generator': '{0}'")]
    UnknownGenerator(String),

    #[error("unknown vartype: '{0}'")]
    UnknownVartype(String),
}
