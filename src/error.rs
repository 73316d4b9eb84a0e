//! Error taxonomy for configuration composition.
//!
//! Every error is raised synchronously at the offending call; no operation
//! leaves the registry, graph, or sequence in a partially mutated state.

/// Errors raised while composing a coupled-model configuration
#[derive(Debug, thiserror::Error)]
pub enum CouplingError {
    /// A tag that does not name a known model family, or an entry placed
    /// under a slot that does not match its family
    #[error("invalid model slot: {0}")]
    InvalidSlot(String),

    /// A component declared with zero processors
    #[error("invalid processor count for {slot}: {count}")]
    InvalidProcessorCount { slot: String, count: u32 },

    /// A connection or mediation endpoint with no registered component
    #[error("no {0} component in registry")]
    UnknownSlot(String),

    /// A connection from a slot to itself
    #[error("cannot connect {0} to itself")]
    SelfConnection(String),

    /// A fully specified mediation with no phase functions
    ///
    /// The endpoint fields deliberately avoid the name `source`, which
    /// thiserror reserves for error chaining.
    #[error("mediation {from} -> {to} requires at least one phase function")]
    EmptyPhaseList { from: String, to: String },

    /// A mediation with neither a source nor a target
    #[error("mediation requires a source or a target")]
    MissingMediationEndpoint,

    /// A sequence override entry that matches no registered component,
    /// connection, or mediator phase
    #[error("sequence entry \"{0}\" does not match any component, connection, or phase")]
    UnknownSequenceReference(String),

    /// An attribute value outside the boolean/integer/float/string set
    #[error("unsupported value for attribute \"{name}\": {value}")]
    UnsupportedAttributeType { name: String, value: String },
}

/// Convenience alias used throughout the composition engine
pub type Result<T> = std::result::Result<T, CouplingError>;
