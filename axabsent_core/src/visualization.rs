//! Visualization Module - Presentation-Ready Transforms
//! ====================================================
//!
//! Pure, deterministic transforms from domain data to the structures the
//! dashboard plots: an interaction graph, a force-field heatmap, an entropy
//! grid and node/edge tooltips. No I/O.

use crate::constants::{
    DEFAULT_ENTROPY_HEIGHT, DEFAULT_ENTROPY_WIDTH, DEFAULT_FIELD_RESOLUTION, EDGE_COLOR,
    FORCE_COLORS, NEUTRAL_FORCE_COLOR, NODE_COLOR, UI_PRECISION,
};
use crate::formatting::{format_absolute_label, format_number};
use crate::model::{AbsoluteEntity, Interaction};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// =============================================================================
// INTERACTION GRAPH
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    pub properties: Map<String, Value>,
    pub signature: Vec<Vec<f64>>,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub id: Option<String>,
    pub source: Option<String>,
    pub target: Option<String>,
    /// Upper-cased operator type
    pub label: String,
    pub color: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphModel {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

/// One node per entity and one edge per interaction, in input order.
pub fn build_interaction_graph(
    absolutes: &[AbsoluteEntity],
    interactions: &[Interaction],
) -> GraphModel {
    let nodes = absolutes
        .iter()
        .map(|entity| GraphNode {
            id: entity.id.clone(),
            label: format_absolute_label(&entity.id),
            properties: entity.properties.clone(),
            signature: entity.signature.clone(),
            color: NODE_COLOR.to_string(),
        })
        .collect();

    let edges = interactions
        .iter()
        .map(|interaction| GraphEdge {
            id: interaction.interaction_id.clone(),
            source: interaction.source_id.clone(),
            target: interaction.target_id.clone(),
            label: interaction
                .operator_type
                .as_deref()
                .unwrap_or_default()
                .to_uppercase(),
            color: EDGE_COLOR.to_string(),
        })
        .collect();

    GraphModel { nodes, edges }
}

// =============================================================================
// HEATMAPS
// =============================================================================

/// A heatmap: axis coordinates plus `z[row][col]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForceFieldGrid {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<Vec<f64>>,
}

/// `resolution × resolution` grid over `[0, 1)`, wrapping the flux
/// sequence cyclically. Empty flux (or NaN samples) fill with 0.
pub fn build_force_field_map(curvature_flux: &[f64], resolution: usize) -> ForceFieldGrid {
    let axis: Vec<f64> = (0..resolution)
        .map(|i| i as f64 / resolution as f64)
        .collect();

    let sample = |k: usize| match curvature_flux.len() {
        0 => 0.0,
        len => {
            let v = curvature_flux[k % len];
            if v.is_nan() {
                0.0
            } else {
                v
            }
        }
    };

    let z = (0..resolution)
        .map(|i| (0..resolution).map(|j| sample(i * resolution + j)).collect())
        .collect();

    ForceFieldGrid {
        x: axis.clone(),
        y: axis,
        z,
    }
}

/// [`build_force_field_map`] at the dashboard's default resolution.
pub fn default_force_field_map(curvature_flux: &[f64]) -> ForceFieldGrid {
    build_force_field_map(curvature_flux, DEFAULT_FIELD_RESOLUTION)
}

/// Plot color for a force type, case-insensitive; neutral gray if unknown.
pub fn get_force_color(force_type: &str) -> &'static str {
    let key = force_type.to_uppercase();
    FORCE_COLORS
        .iter()
        .find(|(name, _)| *name == key)
        .map_or(NEUTRAL_FORCE_COLOR, |(_, color)| *color)
}

/// `height × width` grid filled row-major; missing cells are 0 and every
/// cell is rounded to 5 decimals.
pub fn build_entropy_map(entropy: &[f64], width: usize, height: usize) -> Vec<Vec<f64>> {
    (0..height)
        .map(|row| {
            (0..width)
                .map(|col| {
                    let value = entropy.get(row * width + col).copied().unwrap_or(0.0);
                    round_display(value)
                })
                .collect()
        })
        .collect()
}

/// [`build_entropy_map`] at the default 10×10 size.
pub fn default_entropy_map(entropy: &[f64]) -> Vec<Vec<f64>> {
    build_entropy_map(entropy, DEFAULT_ENTROPY_WIDTH, DEFAULT_ENTROPY_HEIGHT)
}

fn round_display(value: f64) -> f64 {
    format_number(value, UI_PRECISION).parse().unwrap_or(value)
}

// =============================================================================
// TOOLTIPS
// =============================================================================

/// One `key: value` line per numeric, string or array entry, in key order.
///
/// Other value types are skipped. `None` and non-objects give `""`.
pub fn format_tooltip(item: Option<&Value>) -> String {
    let Some(Value::Object(fields)) = item else {
        return String::new();
    };

    fields
        .iter()
        .filter_map(|(key, value)| match value {
            Value::Number(n) => n
                .as_f64()
                .map(|n| format!("{}: {}", key, format_number(n, UI_PRECISION))),
            Value::String(s) => Some(format!("{}: {}", key, s)),
            Value::Array(values) => Some(format!("{}: [{} values]", key, values.len())),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use serde_json::json;

    #[test]
    fn test_force_field_wraps_flux() {
        let grid = build_force_field_map(&[1.0, 2.0, 3.0], 2);
        assert_eq!(grid.z, vec![vec![1.0, 2.0], vec![3.0, 1.0]]);
        assert_eq!(grid.x, vec![0.0, 0.5]);
        assert_eq!(grid.x, grid.y);
    }

    #[test]
    fn test_force_field_empty_flux() {
        let grid = build_force_field_map(&[], 3);
        assert_eq!(grid.z.len(), 3);
        assert!(grid.z.iter().flatten().all(|v| *v == 0.0));

        let grid = build_force_field_map(&[f64::NAN, 2.0], 1);
        assert_eq!(grid.z, vec![vec![0.0]]);

        assert!(build_force_field_map(&[1.0], 0).z.is_empty());
    }

    #[test]
    fn test_default_force_field_size() {
        let grid = default_force_field_map(&[0.5]);
        assert_eq!(grid.z.len(), 25);
        assert_eq!(grid.z[24].len(), 25);
        assert_relative_eq!(grid.x[24], 0.96, epsilon = 1e-12);
    }

    #[test]
    fn test_force_colors() {
        assert_eq!(get_force_color("gravity"), "#4B8BBE");
        assert_eq!(get_force_color("Electromagnetic"), "#E69F00");
        assert_eq!(get_force_color("STRONG"), "#D55E00");
        assert_eq!(get_force_color("weak"), "#009E73");
        assert_eq!(get_force_color("dark energy"), "#CCCCCC");
        assert_eq!(get_force_color(""), "#CCCCCC");
    }

    #[test]
    fn test_entropy_map() {
        let map = build_entropy_map(&[0.123456789, 1.0, 2.5], 2, 2);
        assert_eq!(map.len(), 2);
        assert_relative_eq!(map[0][0], 0.12346, epsilon = 1e-12);
        assert_relative_eq!(map[0][1], 1.0);
        assert_relative_eq!(map[1][0], 2.5);
        assert_eq!(map[1][1], 0.0);

        // 1/64 sits exactly on a tie at five places
        let map = build_entropy_map(&[0.015_625], 1, 1);
        assert_eq!(map[0][0], 0.01563);

        let map = default_entropy_map(&[]);
        assert_eq!(map.len(), 10);
        assert!(map.iter().all(|row| row.len() == 10));
    }

    #[test]
    fn test_interaction_graph() {
        let entities = vec![
            AbsoluteEntity::new("abs-123456", vec![vec![1.0]]).with_property("mass", 1.0),
            AbsoluteEntity::new("abs-2", vec![vec![2.0]]),
        ];
        let interactions = vec![Interaction {
            interaction_id: Some("int-101".into()),
            source_id: Some("abs-123456".into()),
            target_id: Some("abs-2".into()),
            operator_type: Some("entanglement".into()),
            ..Default::default()
        }];

        let graph = build_interaction_graph(&entities, &interactions);
        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.nodes[0].label, "𝔄-ABS-12");
        assert_eq!(graph.nodes[0].color, "#8884d8");
        assert_eq!(graph.nodes[0].properties["mass"], json!(1.0));
        assert_eq!(graph.nodes[1].id, "abs-2");

        assert_eq!(graph.edges[0].label, "ENTANGLEMENT");
        assert_eq!(graph.edges[0].color, "#82ca9d");
        assert_eq!(graph.edges[0].target.as_deref(), Some("abs-2"));
    }

    #[test]
    fn test_graph_keeps_duplicates() {
        let entity = AbsoluteEntity::new("abs-1", vec![vec![1.0]]);
        let graph = build_interaction_graph(&[entity.clone(), entity], &[Interaction::default()]);
        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.edges[0].label, "");
    }

    #[test]
    fn test_format_tooltip() {
        let item = json!({
            "id": "abs-1",
            "entropy": 0.5,
            "signature": [[1, 0], [0, 1]],
            "active": true,
            "meta": {"k": 1},
            "note": null
        });
        assert_eq!(
            format_tooltip(Some(&item)),
            "id: abs-1\nentropy: 0.50000\nsignature: [2 values]"
        );
        assert_eq!(
            format_tooltip(Some(&json!({"entropy": 0.015_625}))),
            "entropy: 0.01563"
        );
        assert_eq!(format_tooltip(None), "");
        assert_eq!(format_tooltip(Some(&json!(42))), "");
        assert_eq!(format_tooltip(Some(&json!({}))), "");
    }
}
