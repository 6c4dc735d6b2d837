use chrono::TimeDelta;
use fleet_core::HealthEvaluator;
use serde::Deserialize;
use tracing::info;

const DEFAULT_CONFIG_FILE: &str = "metadata-service.toml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub health: HealthConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8081
}

#[derive(Debug, Clone, Deserialize)]
pub struct HealthConfig {
    /// Heartbeat age, in seconds, past which an agent is reported unresponsive.
    #[serde(default = "default_unhealthy_agent_threshold_secs")]
    pub unhealthy_agent_threshold_secs: u64,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            unhealthy_agent_threshold_secs: default_unhealthy_agent_threshold_secs(),
        }
    }
}

fn default_unhealthy_agent_threshold_secs() -> u64 {
    fleet_core::UNHEALTHY_AGENT_THRESHOLD.num_seconds() as u64
}

impl ServiceConfig {
    /// Reads `$CONFIG_FILE` (or `metadata-service.toml`). A missing file means defaults.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.into());
        match std::fs::read_to_string(&path) {
            Ok(s) => Self::load_from_str(&s),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No config file at {}, using defaults", path);
                let config = Self::default();
                config.validate()?;
                Ok(config)
            }
            Err(e) => Err(anyhow::anyhow!("failed to read {}: {}", path, e)),
        }
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: ServiceConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(!self.server.host.is_empty(), "server.host must be non-empty");
        anyhow::ensure!(
            self.health.unhealthy_agent_threshold_secs > 0,
            "health.unhealthy_agent_threshold_secs must be > 0"
        );
        anyhow::ensure!(
            self.health.unhealthy_agent_threshold_secs <= i64::MAX as u64 / 1_000,
            "health.unhealthy_agent_threshold_secs is too large, got {}",
            self.health.unhealthy_agent_threshold_secs
        );
        Ok(())
    }

    /// Host and port to listen on. The host may be an IP literal or a name
    /// such as `localhost`; it is resolved when the listener binds.
    pub fn bind_target(&self) -> (&str, u16) {
        (self.server.host.as_str(), self.server.port)
    }

    pub fn health_evaluator(&self) -> HealthEvaluator {
        HealthEvaluator::new(TimeDelta::seconds(
            self.health.unhealthy_agent_threshold_secs as i64,
        ))
    }
}
