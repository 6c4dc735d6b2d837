//! BDD Tests for Fleet Core

use chrono::{DateTime, TimeDelta, Utc};
use cucumber::{given, then, when, World};
use fleet_core::*;
use uuid::Uuid;

#[derive(Debug, World)]
#[world(init = Self::new)]
struct FleetWorld {
    clock: ManualClock,
    evaluator: HealthEvaluator,
    agent: Option<Agent>,
    health: Option<AgentHealth>,
    tables: Vec<TableSchema>,
    schema: Option<Schema>,
}

impl FleetWorld {
    fn new() -> Self {
        Self {
            clock: ManualClock::new(Utc::now()),
            evaluator: HealthEvaluator::default(),
            agent: None,
            health: None,
            tables: Vec::new(),
            schema: None,
        }
    }
}

fn split_columns(columns: &str) -> Vec<String> {
    columns
        .split(',')
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}

#[given("a clock frozen at a known instant")]
async fn given_frozen_clock(world: &mut FleetWorld) {
    let instant: DateTime<Utc> = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
    world.clock.set(instant);
}

#[given(expr = "the unhealthy threshold is {int} seconds")]
async fn given_threshold(world: &mut FleetWorld, secs: i64) {
    world.evaluator = HealthEvaluator::new(TimeDelta::seconds(secs));
}

#[given(expr = "an agent whose last heartbeat was {int} seconds ago")]
async fn given_agent_heartbeat(world: &mut FleetWorld, age: i64) {
    let last = world.clock.now() - TimeDelta::seconds(age);
    world.agent = Some(Agent::new(Uuid::new_v4(), "node-1", last));
}

#[when(expr = "the clock advances by {int} seconds")]
async fn when_clock_advances(world: &mut FleetWorld, secs: i64) {
    world.clock.advance(TimeDelta::seconds(secs));
}

#[when("I evaluate the agent's health")]
async fn when_evaluate_health(world: &mut FleetWorld) {
    let agent = world.agent.as_ref().expect("no agent set up");
    world.health = Some(world.evaluator.evaluate_agent(agent, world.clock.now()));
}

#[then(expr = "the agent should be {string}")]
async fn then_agent_state(world: &mut FleetWorld, expected: String) {
    let health = world.health.expect("health not evaluated");
    let state = serde_json::to_value(health.state).unwrap();
    assert_eq!(state.as_str().unwrap(), expected);
}

#[then(expr = "the time since last heartbeat should be {int} seconds")]
async fn then_elapsed(world: &mut FleetWorld, secs: i64) {
    let health = world.health.expect("health not evaluated");
    assert_eq!(health.elapsed, TimeDelta::seconds(secs));
    assert_eq!(
        health.to_status().ns_since_last_heartbeat,
        secs * 1_000_000_000
    );
}

#[given(expr = "the metadata store reports table {string} with columns {string}")]
async fn given_table(world: &mut FleetWorld, name: String, columns: String) {
    world.tables.push(TableSchema {
        name,
        columns: split_columns(&columns)
            .into_iter()
            .map(|name| ColumnSchema {
                name,
                data_type: DataType::String,
                desc: String::new(),
                semantic_type: SemanticType::StNone,
            })
            .collect(),
    });
}

#[when("I aggregate the schemas")]
async fn when_aggregate(world: &mut FleetWorld) {
    world.schema = Some(Schema::aggregate(&world.tables));
}

#[then(expr = "the schema should contain {int} tables")]
async fn then_table_count(world: &mut FleetWorld, count: usize) {
    assert_eq!(world.schema.as_ref().unwrap().len(), count);
}

#[then(expr = "table {string} should have columns {string}")]
async fn then_table_columns(world: &mut FleetWorld, name: String, columns: String) {
    let relation = world
        .schema
        .as_ref()
        .unwrap()
        .relation(&name)
        .expect("table missing from schema");
    let actual: Vec<String> = relation
        .columns
        .iter()
        .map(|c| c.column_name.clone())
        .collect();
    assert_eq!(actual, split_columns(&columns));
}

#[tokio::main]
async fn main() {
    FleetWorld::cucumber()
        .fail_on_skipped()
        .run_and_exit("tests/features")
        .await;
}
