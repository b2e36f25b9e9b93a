//! API Client - the sole network boundary of the dashboard.
//!
//! Every outbound payload is serialized first and the resulting JSON is
//! validated, so the bytes that pass the precondition are exactly the bytes
//! that get sent. A failed precondition returns `ApiError::Validation`
//! without touching the transport.
//!
//! # Usage
//!
//! ```ignore
//! use axabsent_core::{ApiClient, ClientConfig};
//!
//! let client = ApiClient::from_config(&ClientConfig::from_env()?)?;
//! let entities = client.get_absolute_entities().await?;
//! ```

use crate::config::ClientConfig;
use crate::constants::routes;
use crate::error::ApiError;
use crate::model::{
    AbsoluteEntity, ForceType, InteractionPayload, SimulationKind, SimulationParameters,
    SimulationRequest, SimulationResponse, SurfacePlot, Topology, VectorField,
};
use crate::validation::{
    is_valid_absolute_entity, is_valid_interaction_payload, is_valid_matrix_shape,
    is_valid_resource_name, is_valid_simulation_config, is_valid_simulation_parameters,
};
use axabsent_env::{HttpRequest, HttpTransport, ReqwestTransport};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Typed client for the AxAbsEnt REST API.
///
/// Generic over the transport so the same client code runs against
/// `ReqwestTransport` in production and `MockTransport` in tests. One
/// attempt per call; retry policy belongs to the caller.
pub struct ApiClient<T: HttpTransport> {
    transport: Arc<T>,
}

impl<T: HttpTransport> Clone for ApiClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
        }
    }
}

impl ApiClient<ReqwestTransport> {
    /// Builds a production client from configuration.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        let transport = ReqwestTransport::shared(config.base_url.clone(), config.timeout)?;
        Ok(Self::new(transport))
    }
}

impl<T: HttpTransport> ApiClient<T> {
    pub fn new(transport: Arc<T>) -> Self {
        Self { transport }
    }

    /// Returns the underlying transport.
    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    // =========================================================================
    // ENTITIES & INTERACTIONS
    // =========================================================================

    /// `GET /absolute`.
    ///
    /// A payload that is not an array yields an empty list. Elements are
    /// summaries as often as full entities; missing `signature`/`properties`
    /// decode empty and unknown keys stay in `extra`. Only a non-object
    /// element fails the listing.
    pub async fn get_absolute_entities(&self) -> Result<Vec<AbsoluteEntity>, ApiError> {
        let body = self.send(HttpRequest::get(routes::ABSOLUTES)).await?;
        if !body.is_array() {
            debug!("entity list payload is not an array, treating as empty");
            return Ok(Vec::new());
        }
        decode(body)
    }

    /// `POST /absolute`. Returns the backend's created representation verbatim.
    pub async fn create_absolute_entity(&self, absolute: &AbsoluteEntity) -> Result<Value, ApiError> {
        let body = encode(absolute)?;
        if !is_valid_absolute_entity(&body) {
            return Err(ApiError::validation("Invalid Absolute Entity format."));
        }
        self.send(HttpRequest::post(routes::ABSOLUTES, body)).await
    }

    /// `POST /interaction`. The backend assigns the id and initial status.
    ///
    /// Returns the backend's representation verbatim; read it with
    /// [`crate::model::Interaction::from_backend`].
    pub async fn create_interaction(&self, payload: &InteractionPayload) -> Result<Value, ApiError> {
        let body = encode(payload)?;
        if !is_valid_interaction_payload(&body) {
            return Err(ApiError::validation("Invalid Interaction Payload."));
        }
        self.send(HttpRequest::post(routes::INTERACTIONS, body)).await
    }

    // =========================================================================
    // SIMULATION
    // =========================================================================

    /// `POST /simulation/run` with a `{config: {...}}` body.
    ///
    /// The precondition checks `request.config`; a request without one is
    /// rejected locally.
    pub async fn run_simulation(
        &self,
        request: &SimulationRequest,
    ) -> Result<SimulationResponse, ApiError> {
        let body = encode(request)?;
        if !is_valid_simulation_config(body.get("config").unwrap_or(&Value::Null)) {
            return Err(ApiError::validation("Invalid Simulation Configuration."));
        }
        let response = self.send(HttpRequest::post(routes::SIMULATION_RUN, body)).await?;
        Ok(SimulationResponse::new(response))
    }

    /// `POST /simulation/run` with a `{type, parameters}` body.
    pub async fn run_parameterized_simulation(
        &self,
        kind: SimulationKind,
        parameters: &SimulationParameters,
    ) -> Result<SimulationResponse, ApiError> {
        let body = encode(&SimulationRequest::parameterized(kind, parameters.clone()))?;
        if !is_valid_simulation_parameters(body.get("parameters").unwrap_or(&Value::Null)) {
            return Err(ApiError::validation("Invalid simulation parameters."));
        }
        let response = self.send(HttpRequest::post(routes::SIMULATION_RUN, body)).await?;
        Ok(SimulationResponse::new(response))
    }

    /// `GET /simulation/results`: names of stored result files.
    ///
    /// Accepts a bare array of names, an array of metadata objects with a
    /// `filename` key, or `{"files": [...]}`. Anything else is empty.
    pub async fn list_simulation_results(&self) -> Result<Vec<String>, ApiError> {
        let body = self.send(HttpRequest::get(routes::SIMULATION_RESULTS)).await?;
        let entries = match &body {
            Value::Array(entries) => entries.as_slice(),
            Value::Object(map) => map
                .get("files")
                .and_then(Value::as_array)
                .map_or(&[][..], Vec::as_slice),
            _ => &[],
        };

        Ok(entries
            .iter()
            .filter_map(|entry| match entry {
                Value::String(name) => Some(name.clone()),
                Value::Object(meta) => meta.get("filename").and_then(Value::as_str).map(str::to_string),
                _ => None,
            })
            .collect())
    }

    /// `GET /simulation/results/{filename}`.
    ///
    /// Reads the nested `data` object when the backend wraps the plot in
    /// result metadata.
    pub async fn get_simulation_result(&self, filename: &str) -> Result<SurfacePlot, ApiError> {
        if !is_valid_resource_name(filename) {
            return Err(ApiError::validation("Invalid result file name."));
        }
        let path = format!("{}/{}", routes::SIMULATION_RESULTS, filename);
        let mut body = self.send(HttpRequest::get(path)).await?;

        let plot = match body.get_mut("data") {
            Some(data) if data.is_object() => data.take(),
            _ => body,
        };
        decode(plot)
    }

    // =========================================================================
    // FORCES & TOPOLOGY
    // =========================================================================

    /// `GET /forces/field?type=...`. All four matrices must share one shape.
    pub async fn get_force_field(&self, force: ForceType) -> Result<VectorField, ApiError> {
        let request = HttpRequest::get(routes::FORCE_FIELD).with_query("type", force.name());
        let body = self.send(request).await?;

        let rows = body.get("X").and_then(Value::as_array).map(Vec::len);
        let cols = body
            .get("X")
            .and_then(|x| x.get(0))
            .and_then(Value::as_array)
            .map(Vec::len);
        let consistent = match (rows, cols) {
            (Some(rows), Some(cols)) => ["X", "Y", "U", "V"].iter().all(|key| {
                body.get(*key).is_some_and(|m| {
                    m.as_array().is_some_and(|r| r.len() == rows) && is_valid_matrix_shape(m, cols)
                })
            }),
            _ => false,
        };
        if !consistent {
            warn!(force = %force, "force field matrices have mismatched shapes");
            return Err(ApiError::invalid_response("force field matrices have mismatched shapes"));
        }
        decode(body)
    }

    /// `GET /interactions/topology`.
    pub async fn get_interaction_topology(&self) -> Result<Topology, ApiError> {
        let body = self.send(HttpRequest::get(routes::TOPOLOGY)).await?;
        decode(body)
    }

    // =========================================================================
    // PLUMBING
    // =========================================================================

    async fn send(&self, request: HttpRequest) -> Result<Value, ApiError> {
        let method = request.method;
        let path = request.path.clone();
        debug!(%method, %path, "api request");

        match self.transport.send(request).await {
            Ok(response) => Ok(response.body),
            Err(err) => {
                let err = ApiError::from(err);
                warn!(%method, %path, code = %err.code(), "api request failed: {}", err);
                Err(err)
            }
        }
    }
}

fn encode<P: Serialize>(payload: &P) -> Result<Value, ApiError> {
    serde_json::to_value(payload).map_err(|e| ApiError::validation(e.to_string()))
}

fn decode<R: DeserializeOwned>(body: Value) -> Result<R, ApiError> {
    serde_json::from_value(body).map_err(|e| ApiError::invalid_response(e.to_string()))
}
