//! Client-side soil measurement core for the NutriSoil console.
//!
//! Pure, synchronous building blocks consumed by the measurement views and
//! entry forms:
//! - [`weekly`] – bucket readings into Monday-anchored weeks and average them
//! - [`rut`] – Chilean identity number checksum validation
//! - [`validation`] – plausible-range checks for measurement form fields
//! - [`format`] – fixed-precision rendering with a `--` placeholder
//! - [`alerts`] – agronomic grading of a reading or weekly average
//! - [`report`] – weekly rows combining the above for display
//!
//! Nothing here performs I/O or holds shared state; every function can be
//! called concurrently without coordination.

pub mod alerts;
pub mod format;
pub mod models;
pub mod report;
pub mod rut;
pub mod validation;
pub mod weekly;

pub use alerts::{soil_alerts, AlertLevel, SoilAlert};
pub use format::{format_number, NO_DATA};
pub use models::{FieldValue, Measurement, Origin, SensorField, SoilSample, WeekSummary};
pub use report::{build_report, WeekRow, WeeklyReport};
pub use rut::validate_identity_number;
pub use validation::{validate_field, validate_form, FormErrors, MeasurementForm, ValidationRange};
pub use weekly::{aggregate_by_week, aggregate_field_by_week, week_start};
