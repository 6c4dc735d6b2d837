//! Plain-text rendering of service responses

use chrono::TimeDelta;
use fleet_core::api::{
    AgentInfoResponse, AgentTableMetadataResponse, GetProbeInfoResponse, RegisterProbeResponse,
    SchemaResponse,
};
use fleet_core::{AgentState, Schema};
use std::fmt::Write;

fn since(ns: i64) -> String {
    let delta = TimeDelta::nanoseconds(ns);
    if delta < TimeDelta::zero() {
        return "in the future".to_string();
    }
    let secs = delta.num_seconds();
    if secs < 60 {
        format!("{}.{:03}s ago", secs, delta.subsec_nanos() / 1_000_000)
    } else if secs < 3_600 {
        format!("{}m{:02}s ago", secs / 60, secs % 60)
    } else {
        format!("{}h{:02}m ago", secs / 3_600, (secs % 3_600) / 60)
    }
}

pub fn agents(resp: &AgentInfoResponse) -> String {
    let mut out = String::new();
    let unresponsive = resp
        .info
        .iter()
        .filter(|a| a.status.state == AgentState::Unresponsive)
        .count();
    let _ = writeln!(
        out,
        "🤖 {} agent(s), {} unresponsive",
        resp.info.len(),
        unresponsive
    );
    for entry in &resp.info {
        let state = match entry.status.state {
            AgentState::Healthy => "HEALTHY",
            AgentState::Unresponsive => "UNRESPONSIVE",
        };
        let _ = writeln!(
            out,
            "  {}  {:<24} {:<13} last heartbeat {}",
            entry.agent.info.agent_id,
            entry.agent.info.hostname,
            state,
            since(entry.status.ns_since_last_heartbeat)
        );
    }
    out
}

fn schema_tables(out: &mut String, schema: &Schema, indent: &str) {
    let mut names: Vec<&String> = schema.relation_map.keys().collect();
    names.sort();
    for name in names {
        let relation = &schema.relation_map[name];
        let _ = writeln!(out, "{}{} ({} columns)", indent, name, relation.columns.len());
        for column in &relation.columns {
            let _ = writeln!(
                out,
                "{}  - {}: {:?} [{:?}] {}",
                indent,
                column.column_name,
                column.column_type,
                column.column_semantic_type,
                column.column_desc
            );
        }
    }
}

pub fn schema(resp: &SchemaResponse) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "📋 {} table(s)", resp.schema.len());
    schema_tables(&mut out, &resp.schema, "  ");
    out
}

pub fn agent_tables(resp: &AgentTableMetadataResponse) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "📋 Table metadata for {} agent(s)", resp.metadata_by_agent.len());
    for entry in &resp.metadata_by_agent {
        let _ = writeln!(
            out,
            "  {}  {} table(s)  data info: {}",
            entry.agent_id,
            entry.schema.len(),
            entry.data_info.as_json()
        );
    }
    out
}

pub fn registration(name: &str, resp: &RegisterProbeResponse) -> String {
    if resp.already_exists() {
        format!("⚠️  Probe '{}' already exists as {}\n", name, resp.probe_id)
    } else {
        format!("🚀 Probe '{}' registered as {}\n", name, resp.probe_id)
    }
}

pub fn probe_info(resp: &GetProbeInfoResponse) -> String {
    let mut out = String::new();
    for probe in &resp.probes {
        let _ = write!(out, "{}  {}", probe.probe_id, probe.state);
        if let Some(status) = &probe.status {
            let _ = write!(out, "  {}", status.err_code);
            if !status.msg.is_empty() {
                let _ = write!(out, ": {}", status.msg);
            }
        }
        out.push('\n');
    }
    out
}
