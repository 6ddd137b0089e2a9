//! Agronomic condition alerts for a soil sample.
//!
//! Unlike [`crate::validation`], which rejects physically implausible input,
//! these thresholds grade plausible readings against what the crop needs.

use serde::Serialize;

use crate::models::{SensorField, SoilSample};

// ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Critical,
    Warning,
    Optimal,
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SoilAlert {
    // ---
    pub level: AlertLevel,
    pub field: SensorField,
    pub value: f64,
    pub message: String,
}

/// Grade every parameter present on the sample. Missing parameters produce
/// no alert.
pub fn soil_alerts(sample: &impl SoilSample) -> Vec<SoilAlert> {
    // ---
    SensorField::ALL
        .iter()
        .filter_map(|&field| {
            sample.value(field).map(|value| {
                let (level, message) = grade(field, value);
                SoilAlert {
                    level,
                    field,
                    value,
                    message,
                }
            })
        })
        .collect()
}

fn grade(field: SensorField, v: f64) -> (AlertLevel, String) {
    // ---
    use AlertLevel::*;

    let label = field.label();
    let unit = field.unit();
    match field {
        SensorField::Ph => {
            if !(5.0..=7.5).contains(&v) {
                (Critical, format!("{label} {v} is outside the tolerable range (5.0-7.5)"))
            } else if v < 5.5 || v > 7.0 {
                (Warning, format!("{label} {v} is at warning level (5.0-5.5 or 7.0-7.5)"))
            } else {
                (Optimal, format!("{label} {v} is within the optimal range (5.5-7.0)"))
            }
        }
        SensorField::Temperature => banded(label, unit, v, (5.0, 35.0), (15.0, 25.0)),
        SensorField::Humidity => banded(label, unit, v, (20.0, 90.0), (40.0, 70.0)),
        SensorField::Nitrogen => nutrient(label, unit, v, 10.0, (15.0, 40.0), 50.0),
        SensorField::Phosphorus => nutrient(label, unit, v, 8.0, (12.0, 30.0), 30.0),
        SensorField::Potassium => nutrient(label, unit, v, 0.2, (0.3, 0.8), 0.8),
    }
}

/// Critical outside `limits`, optimal inside `optimal`, informational between.
fn banded(
    label: &str,
    unit: &str,
    v: f64,
    limits: (f64, f64),
    optimal: (f64, f64),
) -> (AlertLevel, String) {
    // ---
    if v < limits.0 || v > limits.1 {
        (
            AlertLevel::Critical,
            format!("{label} {v}{unit} is outside the tolerable range ({}-{}{unit})", limits.0, limits.1),
        )
    } else if (optimal.0..=optimal.1).contains(&v) {
        (
            AlertLevel::Optimal,
            format!("{label} {v}{unit} is within the optimal range ({}-{}{unit})", optimal.0, optimal.1),
        )
    } else {
        (
            AlertLevel::Info,
            format!("{label} {v}{unit} is outside the optimal range ({}-{}{unit})", optimal.0, optimal.1),
        )
    }
}

/// Critically low below `low`, optimal inside `optimal`, high above `high`.
fn nutrient(
    label: &str,
    unit: &str,
    v: f64,
    low: f64,
    optimal: (f64, f64),
    high: f64,
) -> (AlertLevel, String) {
    // ---
    if v < low {
        (
            AlertLevel::Critical,
            format!("{label} {v} {unit} is critically low (<{low} {unit})"),
        )
    } else if (optimal.0..=optimal.1).contains(&v) {
        (
            AlertLevel::Optimal,
            format!("{label} {v} {unit} is within the optimal range ({}-{} {unit})", optimal.0, optimal.1),
        )
    } else if v > high {
        (AlertLevel::Warning, format!("{label} {v} {unit} is high (>{high} {unit})"))
    } else {
        (
            AlertLevel::Info,
            format!("{label} {v} {unit} is outside the optimal range ({}-{} {unit})", optimal.0, optimal.1),
        )
    }
}
