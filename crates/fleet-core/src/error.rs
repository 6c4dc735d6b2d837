//! Error types for the fleet metadata layer

use crate::status::ErrorCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, FleetError>;

#[derive(Error, Debug)]
pub enum FleetError {
    #[error("Probe not found: {probe_id}")]
    ProbeNotFound { probe_id: String },

    #[error("Probe already exists: {name} ({probe_id})")]
    ProbeAlreadyExists { name: String, probe_id: String },

    #[error("Agent not found: {agent_id}")]
    AgentNotFound { agent_id: String },

    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    #[error("Not implemented: {operation}")]
    Unimplemented { operation: String },

    #[error("Store operation failed: {reason}")]
    Store { reason: String },

    #[error("Agent communication failed for {agent_id}: {reason}")]
    AgentCommunication { agent_id: String, reason: String },

    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
}

impl FleetError {
    pub fn store(reason: impl Into<String>) -> Self {
        Self::Store {
            reason: reason.into(),
        }
    }

    pub fn unimplemented(operation: impl Into<String>) -> Self {
        Self::Unimplemented {
            operation: operation.into(),
        }
    }

    /// Status code reported to callers for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::ProbeNotFound { .. } | Self::AgentNotFound { .. } => ErrorCode::NotFound,
            Self::ProbeAlreadyExists { .. } => ErrorCode::AlreadyExists,
            Self::InvalidArgument { .. } => ErrorCode::InvalidArgument,
            Self::Unimplemented { .. } => ErrorCode::Unimplemented,
            Self::Store { .. } | Self::AgentCommunication { .. } | Self::Serialization { .. } => {
                ErrorCode::Internal
            }
        }
    }
}
