//! Request and response types for the metadata service surface

use crate::agent::{Agent, AgentDataInfo, AgentId, AgentStatus};
use crate::probe::{LifecycleState, ProbeId, ProbeProgram};
use crate::schema::Schema;
use crate::status::{ErrorCode, Status};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaResponse {
    pub schema: Schema,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaByAgentRequest {
    pub agent_id: AgentId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaByAgentResponse {
    pub schema: Schema,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentMetadata {
    pub agent: Agent,
    pub status: AgentStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentInfoResponse {
    pub info: Vec<AgentMetadata>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentTableMetadata {
    pub agent_id: AgentId,
    pub schema: Schema,
    pub data_info: AgentDataInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentTableMetadataResponse {
    pub metadata_by_agent: Vec<AgentTableMetadata>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterProbeRequest {
    pub probe_name: String,
    pub program: ProbeProgram,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterProbeResponse {
    pub probe_id: ProbeId,
    pub status: Status,
}

impl RegisterProbeResponse {
    pub fn already_exists(&self) -> bool {
        self.status.err_code == ErrorCode::AlreadyExists
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetProbeInfoRequest {
    pub probe_ids: Vec<ProbeId>,
}

/// Fleet-wide view of one probe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeState {
    pub probe_id: ProbeId,
    pub state: LifecycleState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetProbeInfoResponse {
    pub probes: Vec<ProbeState>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvictProbeRequest {
    pub probe_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvictProbeResponse {
    pub status: Status,
}

/// Body of every error response from the HTTP surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: ErrorCode,
}
