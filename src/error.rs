//! Error type shared by the library and the CLI.
//!
//! Expansion, ordering and matching are total over well-formed input, so most
//! variants belong to the edges of the crate: literal parsing, model loading
//! and queries against an ordering.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A queried complex matches nothing in the current ordering, neither
    /// exactly nor through compatibility.
    #[error("complex {complex} is out of scope of the model")]
    ComplexOutOfScope { complex: String },

    #[error("invalid agent notation '{input}': {reason}")]
    Notation { input: String, reason: String },

    #[error("rate parameter '{name}' has no value")]
    UnboundParameter { name: String },

    /// A species leaf met a state vector, or a coordinate leaf met species
    /// counts.
    #[error("cannot evaluate {node} against {expected}")]
    RateValuation { node: String, expected: &'static str },

    #[error("malformed rule #{rule}: {reason}")]
    MalformedRule { rule: usize, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn notation(input: &str, reason: impl Into<String>) -> Self {
        Error::Notation { input: input.to_string(), reason: reason.into() }
    }
}
