//! Display formatting for numbers, durations, matrices and labels.
//!
//! All functions are pure and total. Output is locale independent.

use crate::constants::{
    ABSOLUTE_LABEL_PREFIX, ENTROPY_PRECISION, ENTROPY_UNIT, MATRIX_PRECISION, MISSING_TIME,
    MISSING_VALUE,
};
use crate::model::Interaction;
use std::time::Duration;

/// Fixed-precision rendering of a number.
///
/// Rounds the exact decimal value of `value`, with ties going away from
/// zero (`2.5` gives `"3"`, `0.125` at two places gives `"0.13"`). Values
/// such as `1.005` sit just below the tie in binary and round down.
///
/// NaN renders as `"NaN"` and infinities as `"Infinity"`/`"-Infinity"`.
/// Negative zero renders as zero.
pub fn format_number(value: f64, precision: usize) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    let digits = round_half_up(value.abs(), precision);
    if value < 0.0 {
        format!("-{}", digits)
    } else {
        digits
    }
}

/// Non-negative `magnitude` rounded to `precision` places, ties up.
fn round_half_up(magnitude: f64, precision: usize) -> String {
    // A finite f64 never has more than 1074 fractional decimal digits,
    // so this expansion is exact and can be truncated safely.
    let exact = format!("{:.*}", (precision + 1).max(1074), magnitude);
    let (whole, fraction) = exact.split_once('.').unwrap_or((exact.as_str(), ""));

    let mut digits: Vec<u8> = whole
        .bytes()
        .chain(fraction.bytes().take(precision))
        .collect();
    if fraction.as_bytes().get(precision).map_or(false, |d| *d >= b'5') {
        carry(&mut digits);
    }

    let split = digits.len() - precision;
    let mut text: String = digits[..split].iter().map(|&d| char::from(d)).collect();
    if precision > 0 {
        text.push('.');
        text.extend(digits[split..].iter().map(|&d| char::from(d)));
    }
    text
}

/// Adds one unit in the last place to a string of ASCII digits.
fn carry(digits: &mut Vec<u8>) {
    for d in digits.iter_mut().rev() {
        if *d == b'9' {
            *d = b'0';
        } else {
            *d += 1;
            return;
        }
    }
    digits.insert(0, b'1');
}

/// Milliseconds as `"{m}m {s}s"`, floor-dividing to whole seconds.
pub fn format_time(ms: f64) -> String {
    if !ms.is_finite() {
        return MISSING_TIME.to_string();
    }
    let seconds = (ms / 1000.0).floor() as i64;
    let minutes = seconds.div_euclid(60);
    let remaining = seconds % 60;
    format!("{}m {}s", minutes, remaining)
}

/// `format_time` for a measured duration.
pub fn format_duration(duration: Duration) -> String {
    format_time(duration.as_millis() as f64)
}

pub fn format_entropy(entropy: Option<f64>) -> String {
    match entropy {
        Some(e) => format!("{} {}", format_number(e, ENTROPY_PRECISION), ENTROPY_UNIT),
        None => MISSING_VALUE.to_string(),
    }
}

/// Tab-separated cells (3 decimals), newline-separated rows.
pub fn format_matrix(matrix: Option<&[Vec<f64>]>) -> String {
    let Some(matrix) = matrix else {
        return MISSING_VALUE.to_string();
    };
    matrix
        .iter()
        .map(|row| {
            row.iter()
                .map(|cell| format_number(*cell, MATRIX_PRECISION))
                .collect::<Vec<_>>()
                .join("\t")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Short label for an entity id: prefix glyph + first 6 chars upper-cased.
pub fn format_absolute_label(id: &str) -> String {
    if id.is_empty() {
        return "Unknown Absolute".to_string();
    }
    format!("{}{}", ABSOLUTE_LABEL_PREFIX, prefix(id, 6).to_uppercase())
}

/// `"{OPERATOR} [{src4} → {tgt4}]"`.
pub fn format_interaction_label(interaction: &Interaction) -> String {
    if interaction.interaction_id.as_deref().map_or(true, str::is_empty) {
        return "Unnamed Interaction".to_string();
    }
    let operator = interaction
        .operator_type
        .as_deref()
        .filter(|op| !op.is_empty())
        .unwrap_or("Interaction")
        .to_uppercase();
    let endpoint = |id: &Option<String>| id.as_deref().map_or("?".to_string(), |s| prefix(s, 4));

    format!(
        "{} [{} → {}]",
        operator,
        endpoint(&interaction.source_id),
        endpoint(&interaction.target_id)
    )
}

pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// First `n` characters (not bytes).
fn prefix(s: &str, n: usize) -> String {
    s.chars().take(n).collect()
}
