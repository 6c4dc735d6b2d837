//! Coordination facade
//!
//! Every call pulls a fresh snapshot from the stores; nothing is cached
//! between requests.

use fleet_core::api::{
    AgentInfoResponse, AgentMetadata, AgentTableMetadata, AgentTableMetadataResponse,
    EvictProbeRequest, EvictProbeResponse, GetProbeInfoRequest, GetProbeInfoResponse,
    ProbeState, RegisterProbeRequest, RegisterProbeResponse, SchemaByAgentRequest,
    SchemaByAgentResponse, SchemaResponse,
};
use fleet_core::{
    AgentId, AgentSource, Clock, FleetError, HealthEvaluator, LifecycleState, MetadataStore,
    ProbeCreation, Result, Schema, Status, SystemClock,
};
use probe_engine::{aggregate_probe_state, ProbeManager};
use std::sync::Arc;
use tracing::{debug, info, instrument};

pub struct MetadataServer {
    agents: Arc<dyn AgentSource>,
    probe_manager: ProbeManager,
    metadata: Arc<dyn MetadataStore>,
    clock: Arc<dyn Clock>,
    health: HealthEvaluator,
}

impl std::fmt::Debug for MetadataServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetadataServer")
            .field("probe_manager", &self.probe_manager)
            .field("health", &self.health)
            .finish_non_exhaustive()
    }
}

impl MetadataServer {
    pub fn new(
        agents: Arc<dyn AgentSource>,
        probe_manager: ProbeManager,
        metadata: Arc<dyn MetadataStore>,
    ) -> Self {
        Self::with_clock(agents, probe_manager, metadata, Arc::new(SystemClock))
    }

    pub fn with_clock(
        agents: Arc<dyn AgentSource>,
        probe_manager: ProbeManager,
        metadata: Arc<dyn MetadataStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            agents,
            probe_manager,
            metadata,
            clock,
            health: HealthEvaluator::default(),
        }
    }

    pub fn with_health_evaluator(mut self, health: HealthEvaluator) -> Self {
        self.health = health;
        self
    }

    async fn schema(&self) -> Result<Schema> {
        let tables = self.metadata.computed_schemas().await?;
        Ok(Schema::aggregate(&tables))
    }

    #[instrument(skip(self))]
    pub async fn get_schemas(&self) -> Result<SchemaResponse> {
        let schema = self.schema().await?;
        debug!(tables = schema.len(), "Serving fleet schema");
        Ok(SchemaResponse { schema })
    }

    #[instrument(skip(self), fields(agent_id = %req.agent_id))]
    pub async fn get_schema_by_agent(
        &self,
        req: SchemaByAgentRequest,
    ) -> Result<SchemaByAgentResponse> {
        Err(FleetError::unimplemented("GetSchemaByAgent"))
    }

    /// Every active agent with its health as of one clock reading.
    #[instrument(skip(self))]
    pub async fn get_agent_info(&self) -> Result<AgentInfoResponse> {
        let agents = self.agents.active_agents().await?;
        let now = self.clock.now();

        let info = agents
            .into_iter()
            .map(|agent| {
                let status = self.health.evaluate_agent(&agent, now).to_status();
                AgentMetadata { agent, status }
            })
            .collect();

        Ok(AgentInfoResponse { info })
    }

    /// One entry per agent with data info. All agents are assumed to share
    /// the fleet schema, so each entry carries the same copy.
    #[instrument(skip(self))]
    pub async fn get_agent_table_metadata(&self) -> Result<AgentTableMetadataResponse> {
        let schema = self.schema().await?;
        let data_infos = self.metadata.agents_data_info().await?;

        let mut entries: Vec<(AgentId, _)> = data_infos.into_iter().collect();
        entries.sort_by_key(|(agent_id, _)| *agent_id);

        let metadata_by_agent = entries
            .into_iter()
            .map(|(agent_id, data_info)| AgentTableMetadata {
                agent_id,
                schema: schema.clone(),
                data_info,
            })
            .collect();

        Ok(AgentTableMetadataResponse { metadata_by_agent })
    }

    /// Creates the probe and hands it to the agents active right now. A name
    /// that is already registered short-circuits before the fleet is read.
    #[instrument(skip(self, req), fields(probe_name = %req.probe_name))]
    pub async fn register_probe(&self, req: RegisterProbeRequest) -> Result<RegisterProbeResponse> {
        let probe_id = match self
            .probe_manager
            .create_probe(&req.probe_name, &req.program)
            .await?
        {
            ProbeCreation::Created(id) => id,
            ProbeCreation::AlreadyExists(id) => {
                return Ok(RegisterProbeResponse {
                    probe_id: id,
                    status: Status::already_exists(),
                });
            }
        };

        let agents = self.agents.active_agents().await?;
        let agent_ids: Vec<AgentId> = agents.iter().map(|a| a.id()).collect();

        self.probe_manager
            .register_probe(&agent_ids, &probe_id, &req.program)
            .await?;

        info!(probe_id = %probe_id, agents = agent_ids.len(), "Probe registered");
        Ok(RegisterProbeResponse {
            probe_id,
            status: Status::ok(),
        })
    }

    /// Per-id lookups in request order. An unknown id yields a NOT_FOUND
    /// entry rather than failing the batch.
    #[instrument(skip(self, req), fields(probes = req.probe_ids.len()))]
    pub async fn get_probe_info(&self, req: GetProbeInfoRequest) -> Result<GetProbeInfoResponse> {
        let mut probes = Vec::with_capacity(req.probe_ids.len());

        for probe_id in req.probe_ids {
            if self.probe_manager.get_probe_info(&probe_id).await?.is_none() {
                probes.push(ProbeState {
                    probe_id,
                    state: LifecycleState::Unknown,
                    status: Some(Status::not_found()),
                });
                continue;
            }

            let agent_states = self.probe_manager.get_probe_states(&probe_id).await?;
            let (state, status) = aggregate_probe_state(&agent_states);
            probes.push(ProbeState {
                probe_id,
                state,
                status,
            });
        }

        Ok(GetProbeInfoResponse { probes })
    }

    #[instrument(skip(self), fields(probe_name = %req.probe_name))]
    pub async fn evict_probe(&self, req: EvictProbeRequest) -> Result<EvictProbeResponse> {
        Err(FleetError::unimplemented("EvictProbe"))
    }
}
