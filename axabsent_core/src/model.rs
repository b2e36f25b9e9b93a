//! Wire-level domain types exchanged with the AxAbsEnt backend.
//!
//! Field names follow the backend's JSON (camelCase for the dashboard
//! routes, upper-case `X/Y/U/V` for force fields). Optional fields are
//! `Option` with `#[serde(default)]` so missing keys never fail decoding;
//! the documented defaults are applied by accessors, not by coercion.

use crate::constants::{MAX_RESOLUTION, MAX_STEPS, MIN_RESOLUTION, MIN_STEPS};
use crate::formatting::format_absolute_label;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// =============================================================================
// ENTITIES & INTERACTIONS
// =============================================================================

/// An absolute entity: an id, a symmetric signature matrix and free-form
/// scalar properties.
///
/// Listings may carry a summary instead of the full entity (`entropy`,
/// `signature_shape`, `labels`), so everything but the shape of the known
/// keys is optional on decode and unknown keys are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbsoluteEntity {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub signature: Vec<Vec<f64>>,
    #[serde(default)]
    pub properties: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AbsoluteEntity {
    /// Creates an entity with no properties.
    pub fn new(id: impl Into<String>, signature: Vec<Vec<f64>>) -> Self {
        Self {
            id: id.into(),
            signature,
            properties: Map::new(),
            extra: Map::new(),
        }
    }

    /// Adds a property.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Short display label, e.g. `𝔄-ABS-01`.
    pub fn label(&self) -> String {
        format_absolute_label(&self.id)
    }
}

/// A proposed directed interaction between two distinct entities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionPayload {
    pub source_id: String,
    pub target_id: String,
    pub operator_type: String,
}

impl InteractionPayload {
    pub fn new(
        source_id: impl Into<String>,
        target_id: impl Into<String>,
        operator_type: impl Into<String>,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            target_id: target_id.into(),
            operator_type: operator_type.into(),
        }
    }
}

/// Lifecycle status of an interaction. Owned and transitioned by the
/// backend; the client only displays it, so unknown values are kept as
/// `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InteractionStatus {
    Initialized,
    Entangled,
    Collapsed,
    Resonant,
    Decohered,
    Other(String),
}

impl InteractionStatus {
    pub fn name(&self) -> &str {
        match self {
            InteractionStatus::Initialized => "initialized",
            InteractionStatus::Entangled => "entangled",
            InteractionStatus::Collapsed => "collapsed",
            InteractionStatus::Resonant => "resonant",
            InteractionStatus::Decohered => "decohered",
            InteractionStatus::Other(name) => name,
        }
    }
}

impl From<String> for InteractionStatus {
    fn from(name: String) -> Self {
        match name.as_str() {
            "initialized" => InteractionStatus::Initialized,
            "entangled" => InteractionStatus::Entangled,
            "collapsed" => InteractionStatus::Collapsed,
            "resonant" => InteractionStatus::Resonant,
            "decohered" => InteractionStatus::Decohered,
            _ => InteractionStatus::Other(name),
        }
    }
}

impl From<InteractionStatus> for String {
    fn from(status: InteractionStatus) -> Self {
        status.name().to_string()
    }
}

impl std::fmt::Display for InteractionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// An interaction as the backend reports it.
///
/// The create endpoint only guarantees `interactionId` and `status`; every
/// field is optional and unknown keys are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interaction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interaction_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<InteractionStatus>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Interaction {
    /// Reads a backend payload without failing.
    ///
    /// Known keys are picked up when they hold a string (or a number, for
    /// ids); anything else, including mistyped known keys, lands in `extra`.
    pub fn from_backend(payload: &Value) -> Self {
        let mut interaction = Interaction::default();
        let Some(fields) = payload.as_object() else {
            return interaction;
        };

        for (key, value) in fields {
            let text = match value {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) if key != "status" && key != "operatorType" => Some(n.to_string()),
                _ => None,
            };
            let slot = match key.as_str() {
                "interactionId" => &mut interaction.interaction_id,
                "sourceId" => &mut interaction.source_id,
                "targetId" => &mut interaction.target_id,
                "operatorType" => &mut interaction.operator_type,
                "status" => {
                    match text {
                        Some(name) => interaction.status = Some(InteractionStatus::from(name)),
                        None => {
                            interaction.extra.insert(key.clone(), value.clone());
                        }
                    }
                    continue;
                }
                _ => {
                    interaction.extra.insert(key.clone(), value.clone());
                    continue;
                }
            };
            match text {
                Some(text) => *slot = Some(text),
                None => {
                    interaction.extra.insert(key.clone(), value.clone());
                }
            }
        }
        interaction
    }
}

// =============================================================================
// SIMULATION REQUESTS
// =============================================================================

/// Entity/interaction selection for a simulation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub entities: Vec<String>,
    pub interaction: String,
}

impl SimulationConfig {
    pub fn new(entities: Vec<String>, interaction: impl Into<String>) -> Self {
        Self {
            entities,
            interaction: interaction.into(),
        }
    }
}

/// Simulation kinds the backend can compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationKind {
    TransfiniteChain,
    AbsoluteEvolution,
    VacuumFluctuation,
}

impl SimulationKind {
    /// Returns a list of all kinds.
    pub fn all() -> Vec<SimulationKind> {
        vec![
            SimulationKind::TransfiniteChain,
            SimulationKind::AbsoluteEvolution,
            SimulationKind::VacuumFluctuation,
        ]
    }

    /// Returns the wire name.
    pub fn name(&self) -> &'static str {
        match self {
            SimulationKind::TransfiniteChain => "transfinite_chain",
            SimulationKind::AbsoluteEvolution => "absolute_evolution",
            SimulationKind::VacuumFluctuation => "vacuum_fluctuation",
        }
    }
}

impl std::fmt::Display for SimulationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for SimulationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "transfinite_chain" | "transfinite" => Ok(SimulationKind::TransfiniteChain),
            "absolute_evolution" | "evolution" => Ok(SimulationKind::AbsoluteEvolution),
            "vacuum_fluctuation" | "vacuum" => Ok(SimulationKind::VacuumFluctuation),
            _ => Err(format!("Unknown simulation kind: {}", s)),
        }
    }
}

/// Grid/step parameters for a parameterised run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationParameters {
    /// Points per grid dimension (10..=1000)
    pub resolution: u64,
    /// Number of simulation steps (1..=10000)
    pub steps: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            resolution: 100,
            steps: 300,
            seed: None,
        }
    }
}

impl SimulationParameters {
    /// Returns true when both ranges match what the backend accepts.
    pub fn in_bounds(&self) -> bool {
        (MIN_RESOLUTION..=MAX_RESOLUTION).contains(&self.resolution)
            && (MIN_STEPS..=MAX_STEPS).contains(&self.steps)
    }
}

/// Body of `POST /simulation/run`.
///
/// Two shapes share the route: `{config: {...}}` (entity/interaction
/// selection) and `{type, parameters}`. The `config` nesting is part of the
/// wire contract and is kept as is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationRequest {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<SimulationKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<SimulationParameters>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<SimulationConfig>,
}

impl SimulationRequest {
    /// Wraps an entity/interaction selection.
    pub fn for_config(config: SimulationConfig) -> Self {
        Self {
            config: Some(config),
            ..Default::default()
        }
    }

    /// Builds a `{type, parameters}` request.
    pub fn parameterized(kind: SimulationKind, parameters: SimulationParameters) -> Self {
        Self {
            kind: Some(kind),
            parameters: Some(parameters),
            config: None,
        }
    }
}

// =============================================================================
// SIMULATION RESPONSES
// =============================================================================

/// Verbatim backend answer to a simulation run, with defaulted accessors.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResponse {
    raw: Value,
}

impl SimulationResponse {
    pub fn new(raw: Value) -> Self {
        Self { raw }
    }

    /// `success`, false when absent or not a boolean.
    pub fn success(&self) -> bool {
        self.raw.get("success").and_then(Value::as_bool).unwrap_or(false)
    }

    /// `entropy`, `None` when absent or not a number.
    pub fn entropy(&self) -> Option<f64> {
        self.raw.get("entropy").and_then(Value::as_f64)
    }

    /// `curvatureFlux`, empty when absent. Non-numeric entries read as 0.
    pub fn curvature_flux(&self) -> Vec<f64> {
        self.raw
            .get("curvatureFlux")
            .and_then(Value::as_array)
            .map(|values| values.iter().map(|v| v.as_f64().unwrap_or(0.0)).collect())
            .unwrap_or_default()
    }

    /// The backend payload exactly as received.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn into_raw(self) -> Value {
        self.raw
    }
}

/// One stored simulation result, ready for a surface plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfacePlot {
    #[serde(default)]
    pub x: Vec<f64>,
    #[serde(default)]
    pub y: Vec<f64>,
    #[serde(default)]
    pub z: Vec<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

// =============================================================================
// FORCES & TOPOLOGY
// =============================================================================

/// The four fundamental forces the backend can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForceType {
    Gravity,
    Electromagnetic,
    Strong,
    Weak,
}

impl ForceType {
    pub fn all() -> Vec<ForceType> {
        vec![
            ForceType::Gravity,
            ForceType::Electromagnetic,
            ForceType::Strong,
            ForceType::Weak,
        ]
    }

    /// Query-string name.
    pub fn name(&self) -> &'static str {
        match self {
            ForceType::Gravity => "gravity",
            ForceType::Electromagnetic => "electromagnetic",
            ForceType::Strong => "strong",
            ForceType::Weak => "weak",
        }
    }

    /// Human-readable name.
    pub fn display_name(&self) -> &'static str {
        match self {
            ForceType::Gravity => "Gravity",
            ForceType::Electromagnetic => "Electromagnetic",
            ForceType::Strong => "Strong Nuclear",
            ForceType::Weak => "Weak Nuclear",
        }
    }
}

impl std::fmt::Display for ForceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for ForceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gravity" => Ok(ForceType::Gravity),
            "electromagnetic" | "em" => Ok(ForceType::Electromagnetic),
            "strong" | "strong nuclear" => Ok(ForceType::Strong),
            "weak" | "weak nuclear" => Ok(ForceType::Weak),
            _ => Err(format!("Unknown force type: {}", s)),
        }
    }
}

/// A 2D vector field sampled on a mesh grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorField {
    #[serde(rename = "X")]
    pub x: Vec<Vec<f64>>,
    #[serde(rename = "Y")]
    pub y: Vec<Vec<f64>>,
    #[serde(rename = "U")]
    pub u: Vec<Vec<f64>>,
    #[serde(rename = "V")]
    pub v: Vec<Vec<f64>>,
}

impl VectorField {
    /// Returns (rows, cols) of the mesh.
    pub fn shape(&self) -> (usize, usize) {
        (self.x.len(), self.x.first().map_or(0, Vec::len))
    }
}

/// A node of the backend interaction topology.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopologyNode {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entropy: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature_rank: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// A directed link of the backend interaction topology.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyLink {
    pub source: String,
    pub target: String,
    #[serde(default, alias = "operator", skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Interaction graph as served by `GET /interactions/topology`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Topology {
    #[serde(default)]
    pub nodes: Vec<TopologyNode>,
    #[serde(default, alias = "edges")]
    pub links: Vec<TopologyLink>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entity_wire_shape() {
        let entity = AbsoluteEntity::new("abs-1", vec![vec![1.0]]).with_property("mass", 1.0);
        let value = serde_json::to_value(&entity).unwrap();
        assert_eq!(
            value,
            json!({"id": "abs-1", "signature": [[1.0]], "properties": {"mass": 1.0}})
        );

        let decoded: AbsoluteEntity =
            serde_json::from_value(json!({"id": "abs-2", "signature": [[2]]})).unwrap();
        assert!(decoded.properties.is_empty());
        assert_eq!(decoded.signature, vec![vec![2.0]]);
    }

    #[test]
    fn test_interaction_payload_camel_case() {
        let payload = InteractionPayload::new("abs-1", "abs-2", "entanglement");
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({"sourceId": "abs-1", "targetId": "abs-2", "operatorType": "entanglement"})
        );
    }

    #[test]
    fn test_interaction_keeps_unknown_keys() {
        let interaction: Interaction = serde_json::from_value(json!({
            "interactionId": "int-101",
            "status": "initialized",
            "createdAt": "2024-01-01"
        }))
        .unwrap();

        assert_eq!(interaction.interaction_id.as_deref(), Some("int-101"));
        assert_eq!(interaction.status, Some(InteractionStatus::Initialized));
        assert_eq!(interaction.extra.get("createdAt"), Some(&json!("2024-01-01")));
        assert!(interaction.source_id.is_none());
    }

    #[test]
    fn test_entity_listing_summary_decodes() {
        let entity: AbsoluteEntity = serde_json::from_value(json!({
            "id": "abs-1",
            "entropy": 1.392,
            "signature_shape": [128, 1],
            "labels": ["gravity"]
        }))
        .unwrap();

        assert_eq!(entity.id, "abs-1");
        assert!(entity.signature.is_empty());
        assert_eq!(entity.extra["entropy"], json!(1.392));
        assert_eq!(entity.extra["signature_shape"], json!([128, 1]));
        assert_eq!(
            serde_json::to_value(&entity).unwrap()["labels"],
            json!(["gravity"])
        );
    }

    #[test]
    fn test_unknown_status_is_kept() {
        let status: InteractionStatus = serde_json::from_value(json!("pending")).unwrap();
        assert_eq!(status, InteractionStatus::Other("pending".into()));
        assert_eq!(status.name(), "pending");
        assert_eq!(serde_json::to_value(&status).unwrap(), json!("pending"));

        let status: InteractionStatus = serde_json::from_value(json!("entangled")).unwrap();
        assert_eq!(status, InteractionStatus::Entangled);
    }

    #[test]
    fn test_interaction_from_backend_is_lenient() {
        let interaction = Interaction::from_backend(&json!({
            "interactionId": 101,
            "status": "pending",
            "sourceId": null,
            "operatorType": "entanglement",
            "createdAt": "2024-01-01"
        }));

        assert_eq!(interaction.interaction_id.as_deref(), Some("101"));
        assert_eq!(interaction.status, Some(InteractionStatus::Other("pending".into())));
        assert_eq!(interaction.operator_type.as_deref(), Some("entanglement"));
        assert!(interaction.source_id.is_none());
        assert_eq!(interaction.extra.get("sourceId"), Some(&Value::Null));
        assert_eq!(interaction.extra.get("createdAt"), Some(&json!("2024-01-01")));

        assert_eq!(Interaction::from_backend(&json!("ok")), Interaction::default());
    }

    #[test]
    fn test_simulation_request_shapes() {
        let request = SimulationRequest::for_config(SimulationConfig::new(
            vec!["abs-1".into(), "abs-2".into()],
            "int-101",
        ));
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"config": {"entities": ["abs-1", "abs-2"], "interaction": "int-101"}})
        );

        let request = SimulationRequest::parameterized(
            SimulationKind::TransfiniteChain,
            SimulationParameters::default(),
        );
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"type": "transfinite_chain", "parameters": {"resolution": 100, "steps": 300}})
        );
    }

    #[test]
    fn test_simulation_response_defaults() {
        let response = SimulationResponse::new(json!({"timeElapsed": 120}));
        assert!(!response.success());
        assert_eq!(response.entropy(), None);
        assert!(response.curvature_flux().is_empty());

        let response = SimulationResponse::new(json!({
            "success": true,
            "entropy": 0.041,
            "curvatureFlux": [0.0001, "bad", 0.0003]
        }));
        assert!(response.success());
        assert_eq!(response.entropy(), Some(0.041));
        assert_eq!(response.curvature_flux(), vec![0.0001, 0.0, 0.0003]);
    }

    #[test]
    fn test_parameter_bounds() {
        assert!(SimulationParameters::default().in_bounds());
        let too_coarse = SimulationParameters { resolution: 5, ..Default::default() };
        assert!(!too_coarse.in_bounds());
        let too_long = SimulationParameters { steps: 10_001, ..Default::default() };
        assert!(!too_long.in_bounds());
    }

    #[test]
    fn test_force_type_parse() {
        assert_eq!("Gravity".parse::<ForceType>(), Ok(ForceType::Gravity));
        assert_eq!("WEAK".parse::<ForceType>(), Ok(ForceType::Weak));
        assert!("dark".parse::<ForceType>().is_err());
        assert_eq!(ForceType::Strong.display_name(), "Strong Nuclear");
    }

    #[test]
    fn test_topology_aliases() {
        let topology: Topology = serde_json::from_value(json!({
            "nodes": [{"id": "uuid-1", "entropy": 1.23, "signature_rank": 128, "label": "gravity-node"}],
            "edges": [{"source": "uuid-1", "target": "uuid-2", "operator": "Selection"}]
        }))
        .unwrap();

        assert_eq!(topology.nodes[0].signature_rank, Some(128));
        assert_eq!(topology.links[0].label.as_deref(), Some("Selection"));
    }
}
