//! # Metadata Service
//!
//! Answers fleet queries (agent health, schemas, probe status) by composing
//! the core components over snapshots pulled from the external stores.

pub mod config;
pub mod routes;
pub mod server;

pub use config::ServiceConfig;
pub use routes::router;
pub use server::MetadataServer;

use fleet_core::{Clock, HealthEvaluator};
use probe_engine::{
    InMemoryAgentSource, InMemoryMetadataStore, InMemoryProbeStateStore, InMemoryProbeStore,
    ProbeManager,
};
use std::sync::Arc;

/// A full set of in-memory stores, for running standalone and for tests.
#[derive(Debug, Default, Clone)]
pub struct InMemoryFleet {
    pub agents: Arc<InMemoryAgentSource>,
    pub probes: Arc<InMemoryProbeStore>,
    pub states: Arc<InMemoryProbeStateStore>,
    pub metadata: Arc<InMemoryMetadataStore>,
}

impl InMemoryFleet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn server(&self, clock: Arc<dyn Clock>, health: HealthEvaluator) -> MetadataServer {
        let probe_manager = ProbeManager::new(self.probes.clone(), self.states.clone());
        MetadataServer::with_clock(
            self.agents.clone(),
            probe_manager,
            self.metadata.clone(),
            clock,
        )
        .with_health_evaluator(health)
    }
}
