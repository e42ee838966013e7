//! Error types for the fetch facade.
//!
//! # Design
//! Response classification never fails: a non-200 status becomes an error
//! envelope and an unparsable JSON body becomes `None`. `FetchError` only
//! covers the two things that can go wrong around classification: the
//! caller's data could not be encoded, or the transport never produced a
//! response.

use std::error::Error as StdError;

/// Errors returned by the request model and the dispatcher.
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    /// The request data could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The request data serialized to something other than a key/value map.
    #[error("request data must be a key/value map, got {kind}")]
    InvalidData { kind: &'static str },

    /// The transport failed before a status code was received.
    #[error("transport failed: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),
}

impl FetchError {
    pub fn transport<E>(error: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        FetchError::Transport(error.into())
    }
}
