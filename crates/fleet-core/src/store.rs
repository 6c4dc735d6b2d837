//! Contracts for the external stores the coordination layer reads from
//!
//! All fleet state lives behind these traits. Implementations are expected to
//! be safe to share across concurrent requests; nothing here retries.

use crate::agent::{Agent, AgentDataInfo, AgentId};
use crate::error::Result;
use crate::probe::{AgentProbeStatus, Probe, ProbeCreation, ProbeId, ProbeProgram};
use crate::schema::TableSchema;
use async_trait::async_trait;
use std::collections::HashMap;

/// Canonical list of currently active agents.
#[async_trait]
pub trait AgentSource: Send + Sync {
    async fn active_agents(&self) -> Result<Vec<Agent>>;
}

/// Probe definitions, keyed by id and deduplicated by name.
#[async_trait]
pub trait ProbeStore: Send + Sync {
    /// Creates a probe unless one with `name` exists, in which case the
    /// existing id comes back as [`ProbeCreation::AlreadyExists`].
    async fn create_probe(&self, name: &str, program: &ProbeProgram) -> Result<ProbeCreation>;

    async fn get_probe(&self, probe_id: &ProbeId) -> Result<Option<Probe>>;
}

/// Per-agent probe programs and the states agents report back.
#[async_trait]
pub trait ProbeStateStore: Send + Sync {
    /// States in the order the store holds them. Empty means nobody has reported yet.
    async fn states_for_probe(&self, probe_id: &ProbeId) -> Result<Vec<AgentProbeStatus>>;

    async fn set_probe_program(
        &self,
        agent_id: &AgentId,
        probe_id: &ProbeId,
        program: &ProbeProgram,
    ) -> Result<()>;
}

/// Schemas and per-agent data info computed by the metadata store.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    async fn computed_schemas(&self) -> Result<Vec<TableSchema>>;

    async fn agents_data_info(&self) -> Result<HashMap<AgentId, AgentDataInfo>>;
}
