//! Transition decoding errors

use thiserror::Error;

/// A wire-form transition that could not be turned into an [`Intent`].
///
/// [`Intent`]: super::Intent
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransitionError {
    /// The transition names a type this store does not know
    #[error("Unknown transition type '{kind}'")]
    UnknownTransition {
        /// The unrecognised `type` value
        kind: String,
    },

    /// The transition has no `type` field
    #[error("Transition is missing its 'type' field: {content}")]
    MissingType {
        /// The offending payload, as JSON
        content: String,
    },

    /// The type is known but the payload does not fit it
    #[error("Malformed '{kind}' transition: {reason}")]
    Malformed {
        /// The transition type
        kind: String,
        /// Why the payload was rejected
        reason: String,
    },
}
