//! Fixed values shared by the client, formatters and visualization.

use std::time::Duration;

/// Default backend base URL (API prefix included).
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// Client-wide request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Backend routes, relative to the API base URL.
pub mod routes {
    pub const ABSOLUTES: &str = "/absolute";
    pub const INTERACTIONS: &str = "/interaction";
    pub const SIMULATION_RUN: &str = "/simulation/run";
    pub const SIMULATION_RESULTS: &str = "/simulation/results";
    pub const FORCE_FIELD: &str = "/forces/field";
    pub const TOPOLOGY: &str = "/interactions/topology";
}

/// Progress messages reported to the UI.
pub mod status_messages {
    pub const FETCHING_DATA: &str = "Fetching data from AxAbsEnt engine...";
    pub const SIMULATION_RUNNING: &str = "Simulation in progress...";
    pub const VISUALIZING_RESULTS: &str = "Rendering quantum curvature projection...";
}

/// Default number of decimal digits for displayed numbers.
pub const UI_PRECISION: usize = 5;

/// Digits used for entropy values.
pub const ENTROPY_PRECISION: usize = 7;

/// Digits used for matrix cells.
pub const MATRIX_PRECISION: usize = 3;

/// Unit glyph appended to entropy values.
pub const ENTROPY_UNIT: &str = "𝓗";

/// Prefix glyph for absolute entity labels.
pub const ABSOLUTE_LABEL_PREFIX: &str = "𝔄-";

/// Placeholder for a missing value.
pub const MISSING_VALUE: &str = "—";

/// Placeholder for a missing time.
pub const MISSING_TIME: &str = "–";

pub const NODE_COLOR: &str = "#8884d8";
pub const EDGE_COLOR: &str = "#82ca9d";
pub const NEUTRAL_FORCE_COLOR: &str = "#CCCCCC";

/// Force type → plot color. Keys are upper-case.
pub const FORCE_COLORS: [(&str, &str); 4] = [
    ("GRAVITY", "#4B8BBE"),         // blue
    ("ELECTROMAGNETIC", "#E69F00"), // orange
    ("STRONG", "#D55E00"),          // red
    ("WEAK", "#009E73"),            // green
];

/// Bounds accepted by the backend for parameterised runs.
pub const MIN_RESOLUTION: u64 = 10;
pub const MAX_RESOLUTION: u64 = 1000;
pub const MIN_STEPS: u64 = 1;
pub const MAX_STEPS: u64 = 10_000;

/// Grid defaults for the heatmap builders.
pub const DEFAULT_FIELD_RESOLUTION: usize = 25;
pub const DEFAULT_ENTROPY_WIDTH: usize = 10;
pub const DEFAULT_ENTROPY_HEIGHT: usize = 10;
