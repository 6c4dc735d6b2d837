//! # Fleet Core
//!
//! Core types and traits for the fleet metadata coordination layer.
//!
//! ## What lives here
//! - Agent identity and heartbeat-based health classification
//! - Probe, per-agent probe status and lifecycle state types
//! - Fleet-wide schema aggregation
//! - Collaborator contracts for the external stores and the clock
//! - Request/response types shared by the service and the CLI

pub mod agent;
pub mod api;
pub mod clock;
pub mod error;
pub mod health;
pub mod probe;
pub mod schema;
pub mod status;
pub mod store;

pub use agent::{Agent, AgentDataInfo, AgentId, AgentInfo, AgentState, AgentStatus};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{FleetError, Result};
pub use health::{AgentHealth, HealthEvaluator, UNHEALTHY_AGENT_THRESHOLD};
pub use probe::{AgentProbeStatus, LifecycleState, Probe, ProbeCreation, ProbeId, ProbeProgram};
pub use schema::{ColumnInfo, ColumnSchema, DataType, Relation, Schema, SemanticType, TableSchema};
pub use status::{ErrorCode, Status};
pub use store::{AgentSource, MetadataStore, ProbeStateStore, ProbeStore};

/// Current crate version for compatibility checks
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build information for telemetry and debugging
pub const BUILD_INFO: &str = concat!(
    "Fleet ",
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("CARGO_PKG_NAME"),
    ")"
);

/// Standard API endpoints for the metadata service
pub mod endpoints {
    pub const HEALTH: &str = "/health";
    pub const API_V1_SCHEMAS: &str = "/api/v1/schemas";
    pub const API_V1_AGENTS: &str = "/api/v1/agents";
    pub const API_V1_AGENT_TABLES: &str = "/api/v1/agents/tables";
    pub const API_V1_AGENT_SCHEMA: &str = "/api/v1/agents/{id}/schema";
    pub const API_V1_PROBES: &str = "/api/v1/probes";
    pub const API_V1_PROBE_INFO: &str = "/api/v1/probes/info";
    pub const API_V1_PROBE_EVICT: &str = "/api/v1/probes/evict";
}
