//! Simulation Service - one run as a single client-visible transaction.
//!
//! Failures past the local precondition are folded into the returned
//! [`SimulationResultPackage`], so callers get one shape regardless of outcome.

use crate::api::ApiClient;
use crate::constants::{status_messages, MISSING_VALUE};
use crate::error::{ApiError, ErrorCode};
use crate::formatting::{format_duration, format_entropy};
use crate::model::{SimulationConfig, SimulationRequest};
use crate::validation::is_valid_simulation_config;
use axabsent_env::{Clock, HttpTransport};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

/// Request and response of a run, kept for traceability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugBundle {
    pub run_id: Uuid,
    pub input: SimulationRequest,
    pub response: Value,
}

/// Outcome of [`SimulationService::execute_simulation`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResultPackage {
    /// Backend `success` flag (false when absent or on failure)
    pub success: bool,

    /// Formatted entropy, `—` when unknown
    pub entropy: String,

    pub curvature_flux: Vec<f64>,

    /// Formatted wall-clock runtime, `—` on failure
    pub runtime: String,

    /// Backend payload exactly as received
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<Value>,

    /// Failure message if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<ErrorCode>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug: Option<DebugBundle>,
}

impl SimulationResultPackage {
    fn failed(err: &ApiError) -> Self {
        Self {
            success: false,
            entropy: MISSING_VALUE.to_string(),
            curvature_flux: Vec::new(),
            runtime: MISSING_VALUE.to_string(),
            raw: None,
            error: Some(err.to_string()),
            error_code: Some(err.code()),
            debug: None,
        }
    }
}

/// Runs simulations through an [`ApiClient`], timing them with an
/// injectable [`Clock`].
pub struct SimulationService<T: HttpTransport, C: Clock> {
    client: Arc<ApiClient<T>>,
    clock: Arc<C>,
}

impl<T: HttpTransport, C: Clock> SimulationService<T, C> {
    pub fn new(client: Arc<ApiClient<T>>, clock: Arc<C>) -> Self {
        Self { client, clock }
    }

    /// Executes one run for the given entities and interaction.
    ///
    /// Returns `Err` only when the selection fails validation; in that case
    /// nothing is sent and `on_progress` is never called. Every other failure
    /// is reported through `on_progress` and the returned package.
    pub async fn execute_simulation<F>(
        &self,
        entity_ids: &[String],
        interaction_id: &str,
        mut on_progress: F,
    ) -> Result<SimulationResultPackage, ApiError>
    where
        F: FnMut(&str),
    {
        let request = SimulationRequest::for_config(SimulationConfig::new(
            entity_ids.to_vec(),
            interaction_id,
        ));
        let config = serde_json::to_value(&request.config)
            .map_err(|e| ApiError::validation(e.to_string()))?;
        if !is_valid_simulation_config(&config) {
            return Err(ApiError::validation("Invalid Simulation Configuration."));
        }

        let run_id = Uuid::new_v4();
        let span = info_span!("simulation", %run_id, entities = entity_ids.len());

        async {
            on_progress(status_messages::SIMULATION_RUNNING);
            let started = self.clock.now();
            let outcome = self.client.run_simulation(&request).await;
            let elapsed = self.clock.now().saturating_sub(started);

            match outcome {
                Ok(response) => {
                    info!(elapsed_ms = elapsed.as_millis() as u64, "simulation completed");
                    Ok(SimulationResultPackage {
                        success: response.success(),
                        entropy: format_entropy(response.entropy()),
                        curvature_flux: response.curvature_flux(),
                        runtime: format_duration(elapsed),
                        raw: Some(response.raw().clone()),
                        error: None,
                        error_code: None,
                        debug: Some(DebugBundle {
                            run_id,
                            input: request.clone(),
                            response: response.into_raw(),
                        }),
                    })
                }
                Err(err) => {
                    warn!(code = %err.code(), "simulation failed: {}", err);
                    on_progress(&format!("Simulation failed: {}", err));
                    Ok(SimulationResultPackage::failed(&err))
                }
            }
        }
        .instrument(span)
        .await
    }
}
