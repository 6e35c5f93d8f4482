//! Error taxonomy for the monitoring pipeline.
//!
//! Each variant maps to one recovery policy:
//!
//! - [`PipelineError::Config`]: settings file missing or unparseable;
//!   recovered locally by falling back to defaults.
//! - [`PipelineError::Validation`]: non-numeric or out-of-invariant editor
//!   input; the active settings stay untouched and the user is re-prompted.
//! - [`PipelineError::Producer`]: a fault inside the sensor source's tick;
//!   fatal to the background task, which halts itself and surfaces the
//!   fault through its health state.
//! - [`PipelineError::AlertLog`]: a failed append to the durable alert log;
//!   reported and swallowed, the in-memory feed update still proceeds.

use thiserror::Error;

/// A specialized `Result` for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Errors raised by the monitoring pipeline and its settings store.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum PipelineError {
    /// Settings document missing, unparseable, or violating an invariant.
    #[error("configuration error: {message}")]
    Config {
        /// Description of the configuration problem.
        message: String,
    },

    /// Candidate settings input failed numeric validation.
    #[error("invalid value for {field}: {message}")]
    Validation {
        /// The offending input field, so the editor can re-prompt.
        field: String,
        /// What was wrong with it.
        message: String,
    },

    /// The sensor source's background task failed.
    #[error("sensor producer fault: {message}")]
    Producer {
        /// Description of the fault.
        message: String,
    },

    /// Appending to the durable alert log failed.
    #[error("alert log append failed: {0}")]
    AlertLog(#[from] std::io::Error),
}

impl PipelineError {
    /// Creates a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a validation error for an editor field.
    #[must_use]
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates a producer fault.
    #[must_use]
    pub fn producer(message: impl Into<String>) -> Self {
        Self::Producer {
            message: message.into(),
        }
    }

    /// Returns `true` if the pipeline recovers from this error locally and
    /// keeps running. Producer faults are the one fatal-to-task case.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Config { .. } | Self::Validation { .. } | Self::AlertLog(_) => true,
            Self::Producer { .. } => false,
        }
    }
}
