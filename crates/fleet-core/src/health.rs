//! Heartbeat-based agent health classification

use crate::agent::{Agent, AgentState, AgentStatus};
use chrono::{DateTime, TimeDelta, Utc};

/// An agent whose last heartbeat is older than this is unresponsive.
pub const UNHEALTHY_AGENT_THRESHOLD: TimeDelta = TimeDelta::seconds(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentHealth {
    /// Time since the last heartbeat. Negative when the heartbeat is ahead of `now`.
    pub elapsed: TimeDelta,
    pub state: AgentState,
}

impl AgentHealth {
    pub fn to_status(self) -> AgentStatus {
        AgentStatus {
            ns_since_last_heartbeat: self.elapsed.num_nanoseconds().unwrap_or(i64::MAX),
            state: self.state,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthEvaluator {
    threshold: TimeDelta,
}

impl HealthEvaluator {
    pub fn new(threshold: TimeDelta) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> TimeDelta {
        self.threshold
    }

    /// Classifies a heartbeat against `now`. An age of exactly the threshold is still healthy.
    pub fn evaluate(&self, last_heartbeat: DateTime<Utc>, now: DateTime<Utc>) -> AgentHealth {
        let elapsed = now.signed_duration_since(last_heartbeat);
        let state = if elapsed > self.threshold {
            AgentState::Unresponsive
        } else {
            AgentState::Healthy
        };
        AgentHealth { elapsed, state }
    }

    pub fn evaluate_agent(&self, agent: &Agent, now: DateTime<Utc>) -> AgentHealth {
        self.evaluate(agent.last_heartbeat(), now)
    }
}

impl Default for HealthEvaluator {
    fn default() -> Self {
        Self::new(UNHEALTHY_AGENT_THRESHOLD)
    }
}
