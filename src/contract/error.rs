//! Error types for the contract checker

use thiserror::Error;

/// Why a scenario did not pass.
#[derive(Debug, Error)]
pub enum ContractError {
    /// A seeding procedure failed, either with a non-success status or before any
    /// response arrived. Aborts the scenario.
    #[error(
        "fixture procedure {procedure} failed{}: {body}",
        .status.map(|s| format!(" with status {}", s)).unwrap_or_default()
    )]
    Fixture {
        procedure: String,
        /// None when the call never got a response
        status: Option<u16>,
        /// Response body text, or the transport error message
        body: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// Transport-level failure (connect, timeout, TLS)
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("{request}: response body is not JSON ({source}): {body}")]
    Decode {
        request: String,
        body: String,
        #[source]
        source: serde_json::Error,
    },

    /// The endpoint answered, but not the way the contract says it should
    #[error("{check}: expected {expected}, got {actual}")]
    Violation {
        check: String,
        expected: String,
        actual: String,
    },
}

impl ContractError {
    pub fn violation(
        check: impl Into<String>,
        expected: impl std::fmt::Display,
        actual: impl std::fmt::Display,
    ) -> Self {
        Self::Violation {
            check: check.into(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    pub(crate) fn fixture_transport(procedure: &str, source: reqwest::Error) -> Self {
        Self::Fixture {
            procedure: procedure.to_string(),
            status: None,
            body: source.to_string(),
            source: Some(source),
        }
    }

    /// True when the scenario never reached the endpoint under test.
    pub fn is_fixture_failure(&self) -> bool {
        matches!(self, Self::Fixture { .. })
    }
}

pub type Result<T> = std::result::Result<T, ContractError>;
