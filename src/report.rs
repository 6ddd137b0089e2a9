//! Weekly report assembly: summaries rendered for display with their alerts.

use chrono::NaiveDate;
use serde::Serialize;

use crate::alerts::{soil_alerts, SoilAlert};
use crate::format::format_number;
use crate::models::{Measurement, SensorField, SoilSample, WeekSummary};
use crate::weekly::{aggregate_by_week, aggregate_field_by_week};

// ---

/// One display row per week, newest first.
#[derive(Debug, Clone, Serialize)]
pub struct WeekRow {
    // ---
    pub week_start: NaiveDate,
    pub measurement_count: usize,
    pub ph: String,
    pub temperature: String,
    pub humidity: String,
    pub nitrogen: String,
    pub phosphorus: String,
    pub potassium: String,
    pub alerts: Vec<SoilAlert>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeeklyReport {
    pub field_id: Option<i64>,
    pub measurement_count: usize,
    pub weeks: Vec<WeekRow>,
}

impl WeekRow {
    fn from_summary(summary: &WeekSummary, decimals: usize) -> Self {
        // ---
        let fmt = |field: SensorField| format_number(summary.value(field), decimals);
        WeekRow {
            week_start: summary.week_start,
            measurement_count: summary.measurement_count,
            ph: fmt(SensorField::Ph),
            temperature: fmt(SensorField::Temperature),
            humidity: fmt(SensorField::Humidity),
            nitrogen: fmt(SensorField::Nitrogen),
            phosphorus: fmt(SensorField::Phosphorus),
            potassium: fmt(SensorField::Potassium),
            alerts: soil_alerts(summary),
        }
    }
}

/// Aggregate `measurements` (optionally only those of `field_id`) and render
/// each week with `decimals` digits.
#[tracing::instrument(skip(measurements), fields(input = measurements.len()))]
pub fn build_report(measurements: &[Measurement], field_id: Option<i64>, decimals: usize) -> WeeklyReport {
    // ---
    let summaries = match field_id {
        Some(id) => aggregate_field_by_week(measurements, id),
        None => aggregate_by_week(measurements),
    };

    let weeks: Vec<WeekRow> = summaries
        .iter()
        .map(|s| WeekRow::from_summary(s, decimals))
        .collect();

    tracing::info!("Report built with {} weeks", weeks.len());

    WeeklyReport {
        field_id,
        measurement_count: summaries.iter().map(|s| s.measurement_count).sum(),
        weeks,
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::alerts::AlertLevel;
    use crate::models::Origin;
    use chrono::DateTime;

    fn create_test_measurement(timestamp: &str, field_id: i64, ph: Option<f64>) -> Measurement {
        // ---
        Measurement {
            timestamp: DateTime::parse_from_rfc3339(timestamp).unwrap(),
            ph,
            temperature: Some(18.25),
            humidity: None,
            nitrogen: Some(20.0),
            phosphorus: Some(15.0),
            potassium: Some(0.5),
            field_id: Some(field_id),
            origin: Origin::Sensor,
        }
    }

    #[test]
    fn test_report_rows_are_formatted() {
        // ---
        let data = vec![
            create_test_measurement("2025-10-06T08:00:00Z", 1, Some(6.0)),
            create_test_measurement("2025-10-14T08:00:00Z", 1, Some(4.5)),
        ];

        let report = build_report(&data, None, 1);
        assert_eq!(report.measurement_count, 2);
        assert_eq!(report.weeks.len(), 2);

        let latest = &report.weeks[0];
        assert_eq!(latest.week_start.to_string(), "2025-10-13");
        assert_eq!(latest.ph, "4.5");
        assert_eq!(latest.temperature, "18.3");
        assert_eq!(latest.humidity, "--");
        assert_eq!(latest.potassium, "0.5");
        assert_eq!(latest.alerts[0].level, AlertLevel::Critical);
    }

    #[test]
    fn test_report_filtered_by_field() {
        // ---
        let data = vec![
            create_test_measurement("2025-10-06T08:00:00Z", 1, Some(6.0)),
            create_test_measurement("2025-10-06T09:00:00Z", 2, Some(7.0)),
        ];

        let report = build_report(&data, Some(2), 2);
        assert_eq!(report.field_id, Some(2));
        assert_eq!(report.measurement_count, 1);
        assert_eq!(report.weeks[0].ph, "7.00");
    }

    #[test]
    fn test_empty_report() {
        // ---
        let report = build_report(&[], None, 1);
        assert!(report.weeks.is_empty());
        assert_eq!(report.measurement_count, 0);
    }
}
