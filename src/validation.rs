//! Range validation for measurement entry.
//!
//! Each soil parameter has a physically plausible range. A value outside it
//! produces a message naming the parameter and its bounds. Empty and
//! unparsable values pass here: whether a field is required is the caller's
//! concern.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{FieldValue, SensorField};

// ---

/// Plausible bounds for one parameter, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidationRange {
    pub field: SensorField,
    pub min: f64,
    pub max: f64,
    /// Decimal places used when rendering the bounds in messages.
    pub precision: usize,
}

impl ValidationRange {
    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Message shown when a value falls outside the range.
    pub fn message(&self) -> String {
        // ---
        let unit = self.field.unit();
        let mut msg = format!(
            "{} must be between {:.p$} and {:.p$}",
            self.field.label(),
            self.min,
            self.max,
            p = self.precision
        );
        if !unit.is_empty() {
            msg.push(' ');
            msg.push_str(unit);
        }
        msg
    }
}

pub const RANGES: [ValidationRange; 6] = [
    ValidationRange { field: SensorField::Ph, min: 4.0, max: 9.0, precision: 1 },
    ValidationRange { field: SensorField::Temperature, min: -5.0, max: 45.0, precision: 0 },
    ValidationRange { field: SensorField::Humidity, min: 0.0, max: 100.0, precision: 0 },
    ValidationRange { field: SensorField::Nitrogen, min: 0.0, max: 100.0, precision: 0 },
    ValidationRange { field: SensorField::Phosphorus, min: 0.0, max: 100.0, precision: 0 },
    ValidationRange { field: SensorField::Potassium, min: 0.0, max: 3.0, precision: 1 },
];

pub fn range_for(field: SensorField) -> &'static ValidationRange {
    // RANGES is declared in SensorField::ALL order
    &RANGES[field as usize]
}

/// Check one field by name. Returns the error message, or `None` when the
/// value is in range, empty, unparsable, or the name is not a sensor field.
pub fn validate_field(field_name: &str, value: impl Into<FieldValue>) -> Option<String> {
    // ---
    let field = field_name.parse::<SensorField>().ok()?;
    check(field, &value.into())
}

fn check(field: SensorField, value: &FieldValue) -> Option<String> {
    // ---
    let number = value.as_number()?;
    let range = range_for(field);
    if range.contains(number) {
        None
    } else {
        tracing::debug!("{} value {} outside [{}, {}]", field, number, range.min, range.max);
        Some(range.message())
    }
}

/// The six numeric inputs of the measurement entry form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeasurementForm {
    // ---
    #[serde(default)]
    pub ph: FieldValue,
    #[serde(default, alias = "temperatura")]
    pub temperature: FieldValue,
    #[serde(default, alias = "humedad")]
    pub humidity: FieldValue,
    #[serde(default, alias = "nitrogeno")]
    pub nitrogen: FieldValue,
    #[serde(default, alias = "fosforo")]
    pub phosphorus: FieldValue,
    #[serde(default, alias = "potasio")]
    pub potassium: FieldValue,
}

impl MeasurementForm {
    pub fn get(&self, field: SensorField) -> &FieldValue {
        match field {
            SensorField::Ph => &self.ph,
            SensorField::Temperature => &self.temperature,
            SensorField::Humidity => &self.humidity,
            SensorField::Nitrogen => &self.nitrogen,
            SensorField::Phosphorus => &self.phosphorus,
            SensorField::Potassium => &self.potassium,
        }
    }
}

/// Field-keyed error messages for a whole form.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<SensorField, String>);

impl FormErrors {
    /// Submission may proceed only when this is true.
    pub fn is_valid(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: SensorField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SensorField, &str)> {
        self.0.iter().map(|(f, m)| (*f, m.as_str()))
    }
}

/// Validate every field of the form.
pub fn validate_form(form: &MeasurementForm) -> FormErrors {
    // ---
    let errors: BTreeMap<SensorField, String> = SensorField::ALL
        .iter()
        .filter_map(|&field| check(field, form.get(field)).map(|msg| (field, msg)))
        .collect();

    if !errors.is_empty() {
        tracing::info!("Measurement form rejected with {} field errors", errors.len());
    }
    FormErrors(errors)
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    #[test]
    fn test_ph_in_range() {
        // ---
        assert_eq!(validate_field("ph", 5.4), None);
        assert_eq!(validate_field("ph", 4.0), None);
        assert_eq!(validate_field("ph", 9.0), None);
    }

    #[test]
    fn test_ph_out_of_range_message() {
        // ---
        let msg = validate_field("ph", 10_i32).unwrap();
        assert!(msg.contains("pH"));
        assert!(msg.contains("4.0"));
        assert!(msg.contains("9.0"));
        assert_eq!(msg, "pH must be between 4.0 and 9.0");
    }

    #[test]
    fn test_empty_and_unparsable_are_not_range_errors() {
        // ---
        assert_eq!(validate_field("ph", ""), None);
        assert_eq!(validate_field("ph", FieldValue::Null), None);
        assert_eq!(validate_field("ph", "abc"), None);
        assert_eq!(validate_field("ph", None::<f64>), None);
    }

    #[test]
    fn test_text_values_are_parsed() {
        // ---
        assert_eq!(validate_field("humedad", "55"), None);
        assert_eq!(
            validate_field("humedad", "101"),
            Some("Humidity must be between 0 and 100 %".to_string())
        );
    }

    #[test]
    fn test_text_with_units_is_range_checked() {
        // ---
        assert_eq!(validate_field("nitrogen", "40 ppm"), None);
        assert_eq!(
            validate_field("nitrogen", "120 ppm"),
            Some("Nitrogen must be between 0 and 100 ppm".to_string())
        );
        assert!(validate_field("ph", "9,5").is_none());
        assert!(validate_field("ph", "12,5").is_some());
    }

    #[test]
    fn test_bounds_per_field() {
        // ---
        assert_eq!(validate_field("temperature", -5.0), None);
        assert!(validate_field("temperature", -5.1).is_some());
        assert_eq!(validate_field("temperature", 45.0), None);
        assert!(validate_field("temperature", 45.1).is_some());

        assert_eq!(validate_field("potassium", 3.0), None);
        assert_eq!(
            validate_field("potassium", 3.01),
            Some("Potassium must be between 0.0 and 3.0 cmol/kg".to_string())
        );
        assert!(validate_field("nitrogen", -1.0).is_some());
        assert!(validate_field("phosphorus", 100.5).is_some());
    }

    #[test]
    fn test_unknown_field_has_no_rule() {
        // ---
        assert_eq!(validate_field("salinity", 9999.0), None);
    }

    #[test]
    fn test_range_table_matches_field_order() {
        // ---
        for field in SensorField::ALL {
            assert_eq!(range_for(field).field, field);
        }
    }

    #[test]
    fn test_validate_form() {
        // ---
        let form = MeasurementForm {
            ph: 3.5.into(),
            temperature: "18".into(),
            humidity: "".into(),
            nitrogen: 150.0.into(),
            phosphorus: "oops".into(),
            potassium: 0.4.into(),
        };

        let errors = validate_form(&form);
        assert!(!errors.is_valid());
        assert_eq!(errors.len(), 2);
        assert!(errors.get(SensorField::Ph).is_some());
        assert!(errors.get(SensorField::Nitrogen).is_some());
        assert_eq!(errors.get(SensorField::Humidity), None);

        let fields: Vec<SensorField> = errors.iter().map(|(f, _)| f).collect();
        assert_eq!(fields, vec![SensorField::Ph, SensorField::Nitrogen]);
    }

    #[test]
    fn test_empty_form_is_valid() {
        // ---
        assert!(validate_form(&MeasurementForm::default()).is_valid());
    }
}
