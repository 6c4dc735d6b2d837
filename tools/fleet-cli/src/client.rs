//! Thin HTTP client for the metadata service

use anyhow::{anyhow, Context};
use fleet_core::api::{
    AgentInfoResponse, AgentTableMetadataResponse, ErrorBody, EvictProbeRequest,
    EvictProbeResponse, GetProbeInfoRequest, GetProbeInfoResponse, RegisterProbeRequest,
    RegisterProbeResponse, SchemaResponse,
};
use fleet_core::{endpoints, ProbeId, ProbeProgram};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

pub struct MetadataClient {
    base_url: String,
    http: reqwest::Client,
}

impl MetadataClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> anyhow::Result<T> {
        let status = response.status();
        let body = response.text().await.context("failed to read response body")?;
        if !status.is_success() {
            return Err(match serde_json::from_str::<ErrorBody>(&body) {
                Ok(err) => anyhow!("server returned {} ({}): {}", status, err.code, err.error),
                Err(_) => anyhow!("server returned {}: {}", status, body),
            });
        }
        serde_json::from_str(&body).with_context(|| format!("unexpected response body: {body}"))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> anyhow::Result<T> {
        let response = self
            .http
            .get(self.url(path))
            .send()
            .await
            .with_context(|| format!("failed to reach {}", self.base_url))?;
        Self::decode(response).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> anyhow::Result<T> {
        let response = self
            .http
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .with_context(|| format!("failed to reach {}", self.base_url))?;
        Self::decode(response).await
    }

    pub async fn health(&self) -> anyhow::Result<Value> {
        self.get(endpoints::HEALTH).await
    }

    pub async fn agents(&self) -> anyhow::Result<AgentInfoResponse> {
        self.get(endpoints::API_V1_AGENTS).await
    }

    pub async fn agent_tables(&self) -> anyhow::Result<AgentTableMetadataResponse> {
        self.get(endpoints::API_V1_AGENT_TABLES).await
    }

    pub async fn schema(&self) -> anyhow::Result<SchemaResponse> {
        self.get(endpoints::API_V1_SCHEMAS).await
    }

    pub async fn register_probe(
        &self,
        probe_name: String,
        program: ProbeProgram,
    ) -> anyhow::Result<RegisterProbeResponse> {
        let req = RegisterProbeRequest {
            probe_name,
            program,
        };
        self.post(endpoints::API_V1_PROBES, &req).await
    }

    pub async fn probe_info(&self, probe_ids: Vec<ProbeId>) -> anyhow::Result<GetProbeInfoResponse> {
        self.post(endpoints::API_V1_PROBE_INFO, &GetProbeInfoRequest { probe_ids })
            .await
    }

    pub async fn evict_probe(&self, probe_name: String) -> anyhow::Result<EvictProbeResponse> {
        self.post(endpoints::API_V1_PROBE_EVICT, &EvictProbeRequest { probe_name })
            .await
    }
}
