//! In-memory store implementations
//!
//! Concurrent maps (sharded `DashMap`s and a `parking_lot` lock) behind every
//! collaborator contract, so the service can run standalone and tests can
//! drive fleet state directly.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use fleet_core::agent::timestamp_ns;
use fleet_core::{
    Agent, AgentDataInfo, AgentId, AgentProbeStatus, AgentSource, FleetError, MetadataStore, Probe,
    ProbeCreation, ProbeId, ProbeProgram, ProbeStateStore, ProbeStore, Result, TableSchema,
};
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::debug;

/// Active agents keyed by id.
#[derive(Debug, Default)]
pub struct InMemoryAgentSource {
    agents: DashMap<AgentId, Agent>,
}

impl InMemoryAgentSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert(&self, agent: Agent) {
        self.agents.insert(agent.id(), agent);
    }

    /// Records a heartbeat for a known agent.
    pub fn heartbeat(&self, agent_id: &AgentId, at: DateTime<Utc>) -> Result<()> {
        let mut agent = self
            .agents
            .get_mut(agent_id)
            .ok_or_else(|| FleetError::AgentNotFound {
                agent_id: agent_id.to_string(),
            })?;
        agent.last_heartbeat_ns = timestamp_ns(at);
        Ok(())
    }

    pub fn remove(&self, agent_id: &AgentId) -> Option<Agent> {
        self.agents.remove(agent_id).map(|(_, agent)| agent)
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

#[async_trait]
impl AgentSource for InMemoryAgentSource {
    async fn active_agents(&self) -> Result<Vec<Agent>> {
        let mut agents: Vec<Agent> = self.agents.iter().map(|e| e.value().clone()).collect();
        agents.sort_by_key(|a| (a.create_time_ns, a.id()));
        Ok(agents)
    }
}

/// Probe definitions with a name index for deduplication.
#[derive(Debug, Default)]
pub struct InMemoryProbeStore {
    probes: DashMap<ProbeId, Probe>,
    names: DashMap<String, ProbeId>,
}

impl InMemoryProbeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.probes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }
}

#[async_trait]
impl ProbeStore for InMemoryProbeStore {
    async fn create_probe(&self, name: &str, program: &ProbeProgram) -> Result<ProbeCreation> {
        // The name entry stays locked until the probe is stored, so two
        // concurrent creates of one name cannot both succeed.
        match self.names.entry(name.to_string()) {
            Entry::Occupied(existing) => Ok(ProbeCreation::AlreadyExists(*existing.get())),
            Entry::Vacant(slot) => {
                let probe = Probe::new(name, program.clone());
                let id = probe.id;
                self.probes.insert(id, probe);
                slot.insert(id);
                Ok(ProbeCreation::Created(id))
            }
        }
    }

    async fn get_probe(&self, probe_id: &ProbeId) -> Result<Option<Probe>> {
        Ok(self.probes.get(probe_id).map(|p| p.value().clone()))
    }
}

/// Programs handed to agents and the states they report back.
#[derive(Debug, Default)]
pub struct InMemoryProbeStateStore {
    states: DashMap<ProbeId, Vec<AgentProbeStatus>>,
    programs: DashMap<(AgentId, ProbeId), ProbeProgram>,
}

impl InMemoryProbeStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores an agent's report, replacing its previous one in place.
    pub fn report(&self, status: AgentProbeStatus) {
        let mut reports = self.states.entry(status.probe_id).or_default();
        match reports.iter_mut().find(|r| r.agent_id == status.agent_id) {
            Some(existing) => *existing = status,
            None => reports.push(status),
        }
    }

    pub fn program_for(&self, agent_id: &AgentId, probe_id: &ProbeId) -> Option<ProbeProgram> {
        self.programs
            .get(&(*agent_id, *probe_id))
            .map(|p| p.value().clone())
    }
}

#[async_trait]
impl ProbeStateStore for InMemoryProbeStateStore {
    async fn states_for_probe(&self, probe_id: &ProbeId) -> Result<Vec<AgentProbeStatus>> {
        Ok(self
            .states
            .get(probe_id)
            .map(|r| r.value().clone())
            .unwrap_or_default())
    }

    async fn set_probe_program(
        &self,
        agent_id: &AgentId,
        probe_id: &ProbeId,
        program: &ProbeProgram,
    ) -> Result<()> {
        self.programs.insert((*agent_id, *probe_id), program.clone());
        debug!(agent_id = %agent_id, probe_id = %probe_id, "Stored probe program");
        Ok(())
    }
}

/// Computed schemas and per-agent data info.
#[derive(Debug, Default)]
pub struct InMemoryMetadataStore {
    schemas: RwLock<Vec<TableSchema>>,
    data_info: DashMap<AgentId, AgentDataInfo>,
}

impl InMemoryMetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_schemas(&self, schemas: Vec<TableSchema>) {
        *self.schemas.write() = schemas;
    }

    pub fn set_data_info(&self, agent_id: AgentId, info: AgentDataInfo) {
        self.data_info.insert(agent_id, info);
    }
}

#[async_trait]
impl MetadataStore for InMemoryMetadataStore {
    async fn computed_schemas(&self) -> Result<Vec<TableSchema>> {
        Ok(self.schemas.read().clone())
    }

    async fn agents_data_info(&self) -> Result<HashMap<AgentId, AgentDataInfo>> {
        Ok(self
            .data_info
            .iter()
            .map(|e| (*e.key(), e.value().clone()))
            .collect())
    }
}
