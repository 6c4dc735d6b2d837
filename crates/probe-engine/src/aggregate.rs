//! Fleet-wide probe state aggregation
//!
//! Each agent reports its own state for a probe. The fleet verdict is picked by
//! strict precedence, first match wins:
//!
//! 1. nothing reported: `Pending`
//! 2. any `Evicted`: `Evicted`
//! 3. any `Running`: `Running`
//! 4. any `Pending`: `Pending`
//! 5. any `Failed`: `Failed`, with the status of the first failed agent in input order
//! 6. otherwise `Unknown`
//!
//! Only rule 5 looks at input order.

use fleet_core::{AgentProbeStatus, LifecycleState, Status};
use serde::{Deserialize, Serialize};

/// Per-state tallies over one probe's agent reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateCounts {
    pub pending: usize,
    pub running: usize,
    pub failed: usize,
    pub evicted: usize,
    pub unknown: usize,
}

impl StateCounts {
    pub fn tally(states: &[AgentProbeStatus]) -> Self {
        let mut counts = Self::default();
        for s in states {
            match s.state {
                LifecycleState::Pending => counts.pending += 1,
                LifecycleState::Running => counts.running += 1,
                LifecycleState::Failed => counts.failed += 1,
                LifecycleState::Evicted => counts.evicted += 1,
                LifecycleState::Unknown => counts.unknown += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.pending + self.running + self.failed + self.evicted + self.unknown
    }
}

pub fn aggregate_probe_state(states: &[AgentProbeStatus]) -> (LifecycleState, Option<Status>) {
    if states.is_empty() {
        return (LifecycleState::Pending, None);
    }

    let counts = StateCounts::tally(states);

    if counts.evicted > 0 {
        return (LifecycleState::Evicted, None);
    }
    if counts.running > 0 {
        return (LifecycleState::Running, None);
    }
    if counts.pending > 0 {
        return (LifecycleState::Pending, None);
    }
    if counts.failed > 0 {
        let status = states
            .iter()
            .find(|s| s.state == LifecycleState::Failed)
            .and_then(|s| s.status.clone());
        return (LifecycleState::Failed, status);
    }

    (LifecycleState::Unknown, None)
}
