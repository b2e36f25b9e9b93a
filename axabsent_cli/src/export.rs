//! JSON exporter for simulation runs.
//!
//! Bundles a result package with its plot-ready grids so a run can be
//! rendered or diffed offline.

use axabsent_core::visualization::{default_entropy_map, default_force_field_map};
use axabsent_core::{ForceFieldGrid, SimulationResultPackage};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use uuid::Uuid;

/// Complete export of one simulation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardExport {
    /// Run identifier (from the debug bundle when the run succeeded)
    pub run_id: Uuid,

    pub entities: Vec<String>,
    pub interaction: String,

    pub package: SimulationResultPackage,

    /// Curvature flux wrapped onto the default 25×25 grid
    pub force_field: ForceFieldGrid,

    /// Curvature flux laid out on the default 10×10 grid, 5-decimal cells
    pub entropy_map: Vec<Vec<f64>>,
}

impl DashboardExport {
    /// Creates an export from a finished run.
    pub fn new(entities: &[String], interaction: &str, package: SimulationResultPackage) -> Self {
        let run_id = package
            .debug
            .as_ref()
            .map_or_else(Uuid::new_v4, |debug| debug.run_id);

        Self {
            run_id,
            entities: entities.to_vec(),
            interaction: interaction.to_string(),
            force_field: default_force_field_map(&package.curvature_flux),
            entropy_map: default_entropy_map(&package.curvature_flux),
            package,
        }
    }

    /// Writes to a JSON file.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn package(flux: Vec<f64>) -> SimulationResultPackage {
        SimulationResultPackage {
            success: true,
            entropy: "0.0410000 𝓗".into(),
            curvature_flux: flux,
            runtime: "0m 1s".into(),
            raw: None,
            error: None,
            error_code: None,
            debug: None,
        }
    }

    #[test]
    fn test_export_grids() {
        let export = DashboardExport::new(&["abs-1".into()], "int-1", package(vec![1.0, 2.0, 3.0]));

        assert_eq!(export.force_field.z.len(), 25);
        assert_eq!(export.force_field.z[0][..4], [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(export.entropy_map[0][..4], [1.0, 2.0, 3.0, 0.0]);
        assert_eq!(export.interaction, "int-1");
    }

    #[test]
    fn test_write_to_file() {
        let export = DashboardExport::new(&["abs-1".into()], "int-1", package(vec![0.5]));
        let path = std::env::temp_dir().join(format!("axabsent-export-{}.json", Uuid::new_v4()));

        export.write_to_file(&path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["package"]["curvatureFlux"], serde_json::json!([0.5]));
        assert_eq!(value["run_id"], serde_json::json!(export.run_id.to_string()));
    }
}
