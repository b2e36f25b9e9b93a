//! AxAbsEnt Core - Typed client and presentation layer for the AxAbsEnt engine
//!
//! Sits between a dashboard front end and the AxAbsEnt REST backend:
//! 1. **Validation**: outbound payloads are checked locally before any request
//! 2. **API Client**: one typed method per backend route, errors normalized
//!    into a small taxonomy (`ErrorCode`)
//! 3. **Simulation Service**: a run as one transaction with progress reporting
//! 4. **Visualization**: pure transforms into graph/heatmap/tooltip structures

pub mod api;
pub mod config;
pub mod constants;
pub mod error;
pub mod formatting;
pub mod model;
pub mod simulation;
pub mod validation;
pub mod visualization;

// Re-export key types for convenience
pub use api::ApiClient;
pub use config::{ClientConfig, ConfigError};
pub use error::{ApiError, ErrorCode};
pub use model::{
    AbsoluteEntity, ForceType, Interaction, InteractionPayload, InteractionStatus,
    SimulationConfig, SimulationKind, SimulationParameters, SimulationRequest,
    SimulationResponse, SurfacePlot, Topology, TopologyLink, TopologyNode, VectorField,
};
pub use simulation::{DebugBundle, SimulationResultPackage, SimulationService};
pub use visualization::{ForceFieldGrid, GraphEdge, GraphModel, GraphNode};
