pub use fleet_core;

mod aggregate;
mod manager;
pub mod memory;

pub use aggregate::{aggregate_probe_state, StateCounts};
pub use manager::ProbeManager;
pub use memory::{InMemoryAgentSource, InMemoryMetadataStore, InMemoryProbeStateStore, InMemoryProbeStore};

// Re-export core types for convenience
pub use fleet_core::{
    AgentProbeStatus, FleetError, LifecycleState, Probe, ProbeCreation, ProbeId, ProbeProgram,
    Result, Status,
};
