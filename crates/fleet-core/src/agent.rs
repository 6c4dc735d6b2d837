//! Agent types

use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use uuid::Uuid;

pub type AgentId = Uuid;

/// Health classification derived from heartbeat age. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgentState {
    Healthy,
    Unresponsive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentInfo {
    pub agent_id: AgentId,
    pub hostname: String,
}

/// Snapshot of a fleet member as reported by the active-agent source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub info: AgentInfo,
    /// Nanoseconds since the Unix epoch.
    pub last_heartbeat_ns: i64,
    /// Nanoseconds since the Unix epoch.
    pub create_time_ns: i64,
}

impl Agent {
    pub fn new(agent_id: AgentId, hostname: impl Into<String>, last_heartbeat: DateTime<Utc>) -> Self {
        let ns = timestamp_ns(last_heartbeat);
        Self {
            info: AgentInfo {
                agent_id,
                hostname: hostname.into(),
            },
            last_heartbeat_ns: ns,
            create_time_ns: ns,
        }
    }

    pub fn id(&self) -> AgentId {
        self.info.agent_id
    }

    pub fn last_heartbeat(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_nanos(self.last_heartbeat_ns)
    }
}

/// Health status attached to an agent in info responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentStatus {
    pub ns_since_last_heartbeat: i64,
    pub state: AgentState,
}

/// Opaque per-agent data-collection metadata, attached to responses as the
/// exact JSON text the metadata store produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentDataInfo(Box<RawValue>);

impl AgentDataInfo {
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

impl PartialEq for AgentDataInfo {
    fn eq(&self, other: &Self) -> bool {
        self.as_json() == other.as_json()
    }
}

/// Nanoseconds since the epoch, saturating outside the representable range.
pub fn timestamp_ns(at: DateTime<Utc>) -> i64 {
    at.timestamp_nanos_opt().unwrap_or(if at.timestamp() < 0 {
        i64::MIN
    } else {
        i64::MAX
    })
}
