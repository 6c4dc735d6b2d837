//! Probe types

use crate::agent::AgentId;
use crate::error::Result;
use crate::status::Status;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use std::fmt;
use uuid::Uuid;

pub type ProbeId = Uuid;

/// Instrumentation program handed to agents, kept as the exact JSON text it
/// arrived as. The coordination layer never looks inside.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProbeProgram(Box<RawValue>);

impl ProbeProgram {
    /// Wraps JSON text verbatim after checking that it is well-formed.
    pub fn from_json(json: impl Into<String>) -> Result<Self> {
        Ok(Self(RawValue::from_string(json.into())?))
    }

    pub fn from_value<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        Ok(Self(serde_json::value::to_raw_value(value)?))
    }

    pub fn as_json(&self) -> &str {
        self.0.get()
    }
}

impl PartialEq for ProbeProgram {
    fn eq(&self, other: &Self) -> bool {
        self.as_json() == other.as_json()
    }
}

impl Eq for ProbeProgram {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Probe {
    pub id: ProbeId,
    pub name: String,
    pub program: ProbeProgram,
    pub created_at: DateTime<Utc>,
}

impl Probe {
    pub fn new(name: impl Into<String>, program: ProbeProgram) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            program,
            created_at: Utc::now(),
        }
    }
}

/// Lifecycle of a probe on one agent, or across the fleet.
///
/// Tags this version does not know deserialize to `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LifecycleState {
    Pending,
    Running,
    Failed,
    Evicted,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "PENDING",
            Self::Running => "RUNNING",
            Self::Failed => "FAILED",
            Self::Evicted => "EVICTED",
            Self::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

/// What one agent last reported about one probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentProbeStatus {
    pub agent_id: AgentId,
    pub probe_id: ProbeId,
    pub state: LifecycleState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
}

impl AgentProbeStatus {
    pub fn new(agent_id: AgentId, probe_id: ProbeId, state: LifecycleState) -> Self {
        Self {
            agent_id,
            probe_id,
            state,
            status: None,
        }
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }
}

/// Outcome of creating a probe by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeCreation {
    Created(ProbeId),
    /// A probe with this name was already registered; carries its id.
    AlreadyExists(ProbeId),
}

impl ProbeCreation {
    pub fn probe_id(&self) -> ProbeId {
        match self {
            Self::Created(id) | Self::AlreadyExists(id) => *id,
        }
    }
}
