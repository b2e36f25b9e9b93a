//! Validation Module - Outbound Payload Gates
//! ==========================================
//!
//! Predicates run against the exact JSON that is about to cross the network
//! boundary. Every function is total: `null`, wrong-typed, ragged or empty
//! input yields `false`, never a panic.
//!
//! Usage:
//! ```ignore
//! use axabsent_core::validation::is_valid_absolute_entity;
//!
//! let body = serde_json::to_value(&entity)?;
//! if !is_valid_absolute_entity(&body) {
//!     return Err(ApiError::validation("Invalid Absolute Entity format."));
//! }
//! ```

use crate::constants::{MAX_RESOLUTION, MAX_STEPS, MIN_RESOLUTION, MIN_STEPS};
use serde_json::Value;

// =============================================================================
// MATRICES
// =============================================================================

/// Signature matrix check: non-empty, square, all-numeric and symmetric.
pub fn is_valid_signature_matrix(matrix: &Value) -> bool {
    let Some(rows) = matrix.as_array() else {
        return false;
    };
    let n = rows.len();
    if n == 0 {
        return false;
    }

    // Shape and type first, so the symmetry pass never indexes a short row.
    let mut cells: Vec<Vec<f64>> = Vec::with_capacity(n);
    for row in rows {
        let Some(row) = row.as_array().filter(|r| r.len() == n) else {
            return false;
        };
        let Some(numbers) = row.iter().map(Value::as_f64).collect::<Option<Vec<f64>>>() else {
            return false;
        };
        cells.push(numbers);
    }

    (0..n).all(|i| (i + 1..n).all(|j| cells[i][j] == cells[j][i]))
}

/// True iff every row is an array of exactly `expected_cols` elements.
///
/// An empty matrix passes vacuously.
pub fn is_valid_matrix_shape(matrix: &Value, expected_cols: usize) -> bool {
    matrix.as_array().is_some_and(|rows| {
        rows.iter()
            .all(|row| row.as_array().is_some_and(|r| r.len() == expected_cols))
    })
}

/// A bare number, or an array whose every element is a number.
pub fn is_numeric_input(value: &Value) -> bool {
    match value {
        Value::Number(_) => true,
        Value::Array(values) => values.iter().all(Value::is_number),
        _ => false,
    }
}

// =============================================================================
// PAYLOADS
// =============================================================================

/// Entity check: an object with a non-empty string `id` and a valid
/// `signature`.
pub fn is_valid_absolute_entity(entity: &Value) -> bool {
    let Some(entity) = entity.as_object() else {
        return false;
    };
    let has_id = entity
        .get("id")
        .and_then(Value::as_str)
        .is_some_and(|id| !id.is_empty());
    let has_signature = entity.get("signature").is_some_and(is_valid_signature_matrix);
    has_id && has_signature
}

/// Interaction check: distinct non-empty `sourceId`/`targetId` and a
/// non-empty `operatorType`.
pub fn is_valid_interaction_payload(payload: &Value) -> bool {
    let field = |key: &str| {
        payload
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    };

    match (field("sourceId"), field("targetId"), field("operatorType")) {
        (Some(source), Some(target), Some(_)) => source != target,
        _ => false,
    }
}

/// Config check: `entities` is a non-empty array of strings and
/// `interaction` is a string.
pub fn is_valid_simulation_config(config: &Value) -> bool {
    let entities_ok = config
        .get("entities")
        .and_then(Value::as_array)
        .is_some_and(|ids| !ids.is_empty() && ids.iter().all(Value::is_string));
    let interaction_ok = config.get("interaction").is_some_and(Value::is_string);
    entities_ok && interaction_ok
}

/// Parameter check for `{type, parameters}` runs.
///
/// `resolution` and `steps` are optional (the backend defaults them) but
/// must be integers in range when present; `seed` must be an integer.
pub fn is_valid_simulation_parameters(parameters: &Value) -> bool {
    let Some(parameters) = parameters.as_object() else {
        return false;
    };
    let in_range = |key: &str, min: u64, max: u64| match parameters.get(key) {
        None => true,
        Some(v) => v.as_u64().is_some_and(|n| (min..=max).contains(&n)),
    };
    let seed_ok = match parameters.get("seed") {
        None | Some(Value::Null) => true,
        Some(v) => v.is_i64() || v.is_u64(),
    };

    in_range("resolution", MIN_RESOLUTION, MAX_RESOLUTION)
        && in_range("steps", MIN_STEPS, MAX_STEPS)
        && seed_ok
}

/// Gate for a single URL path segment (result file names).
pub fn is_valid_resource_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name
            .chars()
            .any(|c| matches!(c, '/' | '\\' | '?' | '#' | '%') || c.is_whitespace() || c.is_control())
}

// =============================================================================
// TESTS
// =============================================================================
