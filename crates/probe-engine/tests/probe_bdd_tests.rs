use cucumber::{given, then, when, World};
use fleet_core::{AgentId, ErrorCode};
use probe_engine::*;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, World)]
#[world(init = Self::new)]
struct ProbeEngineWorld {
    probes: Arc<InMemoryProbeStore>,
    states: Arc<InMemoryProbeStateStore>,
    manager: ProbeManager,
    reports: Vec<AgentProbeStatus>,
    verdict: Option<(LifecycleState, Option<Status>)>,
    snapshot: Vec<AgentId>,
    late_agent: Option<AgentId>,
    first_creation: Option<ProbeCreation>,
    last_creation: Option<ProbeCreation>,
    fan_out: Option<Result<()>>,
}

impl ProbeEngineWorld {
    fn new() -> Self {
        let probes = Arc::new(InMemoryProbeStore::new());
        let states = Arc::new(InMemoryProbeStateStore::new());
        Self {
            manager: ProbeManager::new(probes.clone(), states.clone()),
            probes,
            states,
            reports: Vec::new(),
            verdict: None,
            snapshot: Vec::new(),
            late_agent: None,
            first_creation: None,
            last_creation: None,
            fan_out: None,
        }
    }

    fn probe_id(&self) -> ProbeId {
        self.last_creation.expect("no probe created").probe_id()
    }
}

fn program() -> ProbeProgram {
    ProbeProgram::from_value(&json!({ "tracepoints": [{ "symbol": "net/http.(*conn).serve" }] })).unwrap()
}

/// Parses `STATE` or `STATE:message` tokens.
fn parse_report(token: &str, probe_id: ProbeId) -> AgentProbeStatus {
    let (state, msg) = match token.split_once(':') {
        Some((state, msg)) => (state, Some(msg)),
        None => (token, None),
    };
    let state: LifecycleState = serde_json::from_value(json!(state.trim())).unwrap();
    let report = AgentProbeStatus::new(Uuid::new_v4(), probe_id, state);
    match msg {
        Some(msg) => report.with_status(Status::new(ErrorCode::Internal, msg)),
        None => report,
    }
}

#[given(expr = "a probe whose agents report {string}")]
async fn given_reports(world: &mut ProbeEngineWorld, reports: String) {
    let probe_id = Uuid::new_v4();
    world.reports = reports
        .split(',')
        .filter(|t| !t.trim().is_empty())
        .map(|t| parse_report(t, probe_id))
        .collect();
}

#[when("I aggregate the probe state")]
async fn when_aggregate(world: &mut ProbeEngineWorld) {
    world.verdict = Some(aggregate_probe_state(&world.reports));
}

#[then(expr = "the probe state should be {string}")]
async fn then_state(world: &mut ProbeEngineWorld, expected: String) {
    let (state, _) = world.verdict.as_ref().expect("not aggregated");
    assert_eq!(state.to_string(), expected);
}

#[then("there should be no diagnostic status")]
async fn then_no_diagnostic(world: &mut ProbeEngineWorld) {
    let (_, status) = world.verdict.as_ref().expect("not aggregated");
    assert!(status.is_none(), "unexpected diagnostic {status:?}");
}

#[then(expr = "the diagnostic message should be {string}")]
async fn then_diagnostic(world: &mut ProbeEngineWorld, expected: String) {
    let (_, status) = world.verdict.as_ref().expect("not aggregated");
    assert_eq!(status.as_ref().expect("no diagnostic").msg, expected);
}

#[given("a probe manager backed by in-memory stores")]
async fn given_manager(world: &mut ProbeEngineWorld) {
    assert!(world.probes.is_empty());
}

#[given(expr = "I create a probe named {string}")]
async fn given_probe_created(world: &mut ProbeEngineWorld, name: String) {
    create_probe(world, name).await;
}

#[when(expr = "I create a probe named {string}")]
async fn create_probe(world: &mut ProbeEngineWorld, name: String) {
    let creation = world
        .manager
        .create_probe(&name, &program())
        .await
        .expect("create failed");
    if world.first_creation.is_none() {
        world.first_creation = Some(creation);
    }
    world.last_creation = Some(creation);
}

#[then("the probe should be created")]
async fn then_created(world: &mut ProbeEngineWorld) {
    assert!(matches!(world.last_creation, Some(ProbeCreation::Created(_))));
}

#[then(expr = "the probe {string} should be retrievable")]
async fn then_retrievable(world: &mut ProbeEngineWorld, name: String) {
    let probe = world
        .manager
        .get_probe_info(&world.probe_id())
        .await
        .unwrap()
        .expect("probe missing");
    assert_eq!(probe.name, name);
    assert_eq!(probe.program, program());
}

#[then("the probe should already exist with the original id")]
async fn then_already_exists(world: &mut ProbeEngineWorld) {
    let original = world.first_creation.expect("no first creation").probe_id();
    assert_eq!(
        world.last_creation,
        Some(ProbeCreation::AlreadyExists(original))
    );
    assert_eq!(world.probes.len(), 1);
}

#[given(expr = "a snapshot of {int} active agents")]
async fn given_snapshot(world: &mut ProbeEngineWorld, count: usize) {
    world.snapshot = (0..count).map(|_| Uuid::new_v4()).collect();
}

#[when("I fan the probe out to the snapshot")]
async fn when_fan_out(world: &mut ProbeEngineWorld) {
    let probe_id = world.probe_id();
    let result = world
        .manager
        .register_probe(&world.snapshot, &probe_id, &program())
        .await;
    world.fan_out = Some(result);
}

#[when(expr = "{int} agent joins after the snapshot")]
async fn when_agent_joins(world: &mut ProbeEngineWorld, _count: usize) {
    world.late_agent = Some(Uuid::new_v4());
}

#[then("every agent in the snapshot should hold the program")]
async fn then_snapshot_holds(world: &mut ProbeEngineWorld) {
    let probe_id = world.probe_id();
    for agent in &world.snapshot {
        assert_eq!(world.states.program_for(agent, &probe_id), Some(program()));
    }
}

#[then("the late agent should not hold the program")]
async fn then_late_agent_missing(world: &mut ProbeEngineWorld) {
    let late = world.late_agent.expect("no late agent");
    assert!(world.states.program_for(&late, &world.probe_id()).is_none());
}

#[then("the fan-out should succeed")]
async fn then_fan_out_ok(world: &mut ProbeEngineWorld) {
    assert!(matches!(world.fan_out, Some(Ok(()))));
}

#[then("no probe states should be reported yet")]
async fn then_no_states(world: &mut ProbeEngineWorld) {
    let states = world
        .manager
        .get_probe_states(&world.probe_id())
        .await
        .unwrap();
    assert!(states.is_empty());
    assert_eq!(aggregate_probe_state(&states).0, LifecycleState::Pending);
}

#[tokio::main]
async fn main() {
    ProbeEngineWorld::cucumber()
        .fail_on_skipped()
        .run_and_exit("tests/features")
        .await;
}
