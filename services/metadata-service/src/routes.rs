//! JSON-over-HTTP surface for the coordination facade

use crate::server::MetadataServer;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use fleet_core::api::{
    AgentInfoResponse, AgentTableMetadataResponse, ErrorBody, EvictProbeRequest,
    EvictProbeResponse, GetProbeInfoRequest, GetProbeInfoResponse, RegisterProbeRequest,
    RegisterProbeResponse, SchemaByAgentRequest, SchemaByAgentResponse, SchemaResponse,
};
use fleet_core::{endpoints, AgentId, ErrorCode, FleetError, VERSION};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{instrument, warn};

/// A facade error on its way out as an HTTP response.
#[derive(Debug)]
pub struct ApiError(FleetError);

impl From<FleetError> for ApiError {
    fn from(err: FleetError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.0.code();
        let status = match code {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::AlreadyExists => StatusCode::CONFLICT,
            ErrorCode::InvalidArgument => StatusCode::BAD_REQUEST,
            ErrorCode::Unimplemented => StatusCode::NOT_IMPLEMENTED,
            ErrorCode::Ok | ErrorCode::Internal | ErrorCode::Unknown => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        if status.is_server_error() && code != ErrorCode::Unimplemented {
            warn!(error = %self.0, "Request failed");
        }
        let body = ErrorBody {
            error: self.0.to_string(),
            code,
        };
        (status, Json(body)).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

pub fn router(server: Arc<MetadataServer>) -> Router {
    Router::new()
        .route(endpoints::HEALTH, get(health_check))
        .route(endpoints::API_V1_SCHEMAS, get(get_schemas))
        .route(endpoints::API_V1_AGENTS, get(get_agent_info))
        .route(endpoints::API_V1_AGENT_TABLES, get(get_agent_table_metadata))
        .route(endpoints::API_V1_AGENT_SCHEMA, get(get_schema_by_agent))
        .route(endpoints::API_V1_PROBES, post(register_probe))
        .route(endpoints::API_V1_PROBE_INFO, post(get_probe_info))
        .route(endpoints::API_V1_PROBE_EVICT, post(evict_probe))
        .with_state(server)
}

#[instrument]
async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "metadata-service",
        "version": VERSION
    }))
}

async fn get_schemas(State(server): State<Arc<MetadataServer>>) -> ApiResult<SchemaResponse> {
    Ok(Json(server.get_schemas().await?))
}

async fn get_agent_info(State(server): State<Arc<MetadataServer>>) -> ApiResult<AgentInfoResponse> {
    Ok(Json(server.get_agent_info().await?))
}

async fn get_agent_table_metadata(
    State(server): State<Arc<MetadataServer>>,
) -> ApiResult<AgentTableMetadataResponse> {
    Ok(Json(server.get_agent_table_metadata().await?))
}

async fn get_schema_by_agent(
    State(server): State<Arc<MetadataServer>>,
    Path(agent_id): Path<AgentId>,
) -> ApiResult<SchemaByAgentResponse> {
    let resp = server
        .get_schema_by_agent(SchemaByAgentRequest { agent_id })
        .await?;
    Ok(Json(resp))
}

async fn register_probe(
    State(server): State<Arc<MetadataServer>>,
    Json(req): Json<RegisterProbeRequest>,
) -> ApiResult<RegisterProbeResponse> {
    Ok(Json(server.register_probe(req).await?))
}

async fn get_probe_info(
    State(server): State<Arc<MetadataServer>>,
    Json(req): Json<GetProbeInfoRequest>,
) -> ApiResult<GetProbeInfoResponse> {
    Ok(Json(server.get_probe_info(req).await?))
}

async fn evict_probe(
    State(server): State<Arc<MetadataServer>>,
    Json(req): Json<EvictProbeRequest>,
) -> ApiResult<EvictProbeResponse> {
    Ok(Json(server.evict_probe(req).await?))
}
