//! Weekly aggregation of soil measurements.
//!
//! Measurements are bucketed by the Monday of the calendar week their
//! timestamp falls in (read in the timestamp's own offset, no conversion),
//! and each bucket is reduced to one [`WeekSummary`] of per-parameter means.
//! Output is newest week first; callers rely on index 0 being the latest.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};

use crate::models::{Measurement, SensorField, SoilSample, WeekSummary};

// ---

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    // ---
    let offset = i64::from(date.weekday().num_days_from_monday());
    date - Duration::days(offset)
}

/// Round to one decimal place, half away from zero on the scaled binary
/// value. Magnitudes too large to scale have no fractional digits and are
/// returned unchanged.
pub fn round_one_decimal(value: f64) -> f64 {
    // ---
    let scaled = value * 10.0;
    if scaled.is_finite() {
        scaled.round() / 10.0
    } else {
        value
    }
}

/// Group measurements into Monday-anchored weeks and average each parameter.
///
/// A parameter missing on a member is left out of that parameter's mean only.
/// When no member of a week has the parameter its average is `None`.
/// Empty input yields an empty vector.
pub fn aggregate_by_week(measurements: &[Measurement]) -> Vec<WeekSummary> {
    // ---
    let mut buckets: BTreeMap<NaiveDate, Vec<&Measurement>> = BTreeMap::new();
    for m in measurements {
        buckets
            .entry(week_start(m.timestamp.date_naive()))
            .or_default()
            .push(m);
    }

    tracing::debug!(
        "Grouped {} measurements into {} weeks",
        measurements.len(),
        buckets.len()
    );

    buckets
        .into_iter()
        .rev()
        .filter_map(|(week, members)| summarize(week, &members))
        .collect()
}

/// Aggregate only the measurements belonging to one field ("predio").
pub fn aggregate_field_by_week(measurements: &[Measurement], field_id: i64) -> Vec<WeekSummary> {
    // ---
    let owned: Vec<Measurement> = measurements
        .iter()
        .filter(|m| m.field_id == Some(field_id))
        .cloned()
        .collect();
    aggregate_by_week(&owned)
}

/// Reduce one bucket. Returns `None` only for an empty bucket, which grouping
/// never produces.
fn summarize(week: NaiveDate, members: &[&Measurement]) -> Option<WeekSummary> {
    // ---
    let first_timestamp = members.iter().map(|m| m.timestamp).min()?;
    let last_timestamp = members.iter().map(|m| m.timestamp).max()?;

    let avg = |field: SensorField| {
        let values: Vec<f64> = members.iter().filter_map(|m| m.value(field)).collect();
        mean(values).map(round_one_decimal)
    };

    Some(WeekSummary {
        week_start: week,
        measurement_count: members.len(),
        first_timestamp,
        last_timestamp,
        ph: avg(SensorField::Ph),
        temperature: avg(SensorField::Temperature),
        humidity: avg(SensorField::Humidity),
        nitrogen: avg(SensorField::Nitrogen),
        phosphorus: avg(SensorField::Phosphorus),
        potassium: avg(SensorField::Potassium),
    })
}

/// Arithmetic mean with a fixed summation order.
///
/// Values are sorted and summed with Neumaier compensation, so the result is
/// identical for any permutation of the input. If the plain sum overflows,
/// each value is divided by the count before summing. The result is always
/// within `[min, max]` of the inputs.
fn mean(mut values: Vec<f64>) -> Option<f64> {
    // ---
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);

    let (min, max) = (values[0], values[values.len() - 1]);
    let n = values.len() as f64;

    let total = compensated_sum(values.iter().copied());
    let avg = if total.is_finite() {
        total / n
    } else {
        tracing::debug!("Sum of {} values overflowed, averaging scaled values", values.len());
        compensated_sum(values.iter().map(|v| v / n))
    };

    Some(avg.clamp(min, max))
}

/// Neumaier summation. Stops at the first non-finite partial sum so the
/// compensation term never turns an overflow into NaN.
fn compensated_sum(values: impl Iterator<Item = f64>) -> f64 {
    // ---
    let mut sum = 0.0_f64;
    let mut compensation = 0.0_f64;
    for v in values {
        let t = sum + v;
        if !t.is_finite() {
            return t;
        }
        if sum.abs() >= v.abs() {
            compensation += (sum - t) + v;
        } else {
            compensation += (v - t) + sum;
        }
        sum = t;
    }
    sum + compensation
}
