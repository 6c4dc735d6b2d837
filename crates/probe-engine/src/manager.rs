//! Probe lifecycle management
//!
//! Creation is idempotent on the probe name. Registration fans the program out
//! to an agent list the caller snapshotted beforehand: agents that join after
//! the snapshot never receive the probe, and agents that leave mid fan-out may
//! receive a program they never run. Membership is deliberately not re-read here.

use fleet_core::{
    AgentId, AgentProbeStatus, FleetError, Probe, ProbeCreation, ProbeId, ProbeProgram,
    ProbeStateStore, ProbeStore, Result,
};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

#[derive(Clone)]
pub struct ProbeManager {
    probes: Arc<dyn ProbeStore>,
    states: Arc<dyn ProbeStateStore>,
}

impl std::fmt::Debug for ProbeManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProbeManager").finish_non_exhaustive()
    }
}

impl ProbeManager {
    pub fn new(probes: Arc<dyn ProbeStore>, states: Arc<dyn ProbeStateStore>) -> Self {
        Self { probes, states }
    }

    /// Creates a probe named `name`, or reports the id of the existing one.
    #[instrument(skip(self, program))]
    pub async fn create_probe(&self, name: &str, program: &ProbeProgram) -> Result<ProbeCreation> {
        if name.trim().is_empty() {
            return Err(FleetError::InvalidArgument {
                reason: "probe name must not be empty".to_string(),
            });
        }

        let creation = self.probes.create_probe(name, program).await?;
        match creation {
            ProbeCreation::Created(id) => info!(probe_id = %id, "Probe '{}' created", name),
            ProbeCreation::AlreadyExists(id) => {
                info!(probe_id = %id, "Probe '{}' already exists", name)
            }
        }
        Ok(creation)
    }

    /// Hands `program` to every agent in `agent_ids`, in order. Stops at the
    /// first agent that cannot be updated; agents before it keep the program.
    #[instrument(skip(self, agent_ids, program), fields(probe_id = %probe_id, agents = agent_ids.len()))]
    pub async fn register_probe(
        &self,
        agent_ids: &[AgentId],
        probe_id: &ProbeId,
        program: &ProbeProgram,
    ) -> Result<()> {
        for agent_id in agent_ids {
            if let Err(err) = self.states.set_probe_program(agent_id, probe_id, program).await {
                warn!(agent_id = %agent_id, error = %err, "Probe fan-out aborted");
                return Err(err);
            }
            debug!(agent_id = %agent_id, "Probe program delivered");
        }

        info!(
            "Probe {} registered on {} agent(s)",
            probe_id,
            agent_ids.len()
        );
        Ok(())
    }

    /// `None` when no probe has this id.
    pub async fn get_probe_info(&self, probe_id: &ProbeId) -> Result<Option<Probe>> {
        self.probes.get_probe(probe_id).await
    }

    /// Every agent's last report for the probe; empty until someone reports.
    pub async fn get_probe_states(&self, probe_id: &ProbeId) -> Result<Vec<AgentProbeStatus>> {
        self.states.states_for_probe(probe_id).await
    }
}
