//! Result and error types for Mimica.

use thiserror::Error;

/// Result type for Mimica operations
pub type MockResult<T> = Result<T, MockError>;

/// Errors that can occur while configuring, invoking or verifying a mock
#[derive(Debug, Error)]
pub enum MockError {
    /// A strict mock was invoked and no setup matched the call
    #[error("{mock}.{method}{arguments} was invoked but no setup matched (strict mode)")]
    UnconfiguredInvocation {
        /// Mock name
        mock: String,
        /// Invoked method
        method: String,
        /// Rendered argument tuple
        arguments: String,
    },

    /// One or more verification expectations were not met
    #[error("verification failed for {mock}:\n  {}", failures.join("\n  "))]
    VerificationFailed {
        /// Mock (or repository) name
        mock: String,
        /// One line per unmet expectation
        failures: Vec<String>,
    },

    /// A setup configured with `fails_with` was invoked
    #[error("{mock}.{method} failed: {message}")]
    Raised {
        /// Mock name
        mock: String,
        /// Invoked method
        method: String,
        /// Configured failure message
        message: String,
    },

    /// The configured value is not of the type the caller asked for
    #[error("setup for {mock}.{method} does not produce a `{expected}`")]
    ReturnTypeMismatch {
        /// Mock name
        mock: String,
        /// Invoked method
        method: String,
        /// Requested return type
        expected: &'static str,
    },

    /// A computed value or callback expected different argument types
    #[error("setup for {mock}.{method} expects arguments of type `{expected}`")]
    ArgumentTypeMismatch {
        /// Mock name
        mock: String,
        /// Invoked method
        method: String,
        /// Argument type the setup was declared with
        expected: &'static str,
    },

    /// A matcher could not be built
    #[error("Invalid matcher: {message}")]
    InvalidMatcher {
        /// Error message
        message: String,
    },

    /// Configuration could not be loaded
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl MockError {
    /// True for a strict-mode miss
    #[must_use]
    pub const fn is_unconfigured(&self) -> bool {
        matches!(self, Self::UnconfiguredInvocation { .. })
    }

    /// True for an unmet verification expectation
    #[must_use]
    pub const fn is_verification_failure(&self) -> bool {
        matches!(self, Self::VerificationFailed { .. })
    }

    /// True when the call or setup used types the setup was not declared for
    #[must_use]
    pub const fn is_type_mismatch(&self) -> bool {
        matches!(
            self,
            Self::ReturnTypeMismatch { .. } | Self::ArgumentTypeMismatch { .. }
        )
    }

    /// Unmet expectations carried by a verification failure
    #[must_use]
    pub fn failures(&self) -> &[String] {
        match self {
            Self::VerificationFailed { failures, .. } => failures,
            _ => &[],
        }
    }
}
