//! Data models shared by the aggregation, validation and alert modules.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

// ---

/// Optional sign, mantissa with at least one digit, optional exponent.
static LEADING_NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?)").expect("valid regex")
});

/// Read the number at the start of `text`, ignoring whatever follows it, so
/// `"12.5 ppm"` is 12.5 and `"7,5"` is 7. Returns `None` when the text does
/// not start with a number or the number is not finite.
pub fn parse_leading_number(text: &str) -> Option<f64> {
    // ---
    let caps = LEADING_NUMBER_RE.captures(text)?;
    caps.get(1)?
        .as_str()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}

/// One of the six soil parameters a measurement can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorField {
    Ph,
    Temperature,
    Humidity,
    Nitrogen,
    Phosphorus,
    Potassium,
}

impl SensorField {
    /// All fields in display order.
    pub const ALL: [SensorField; 6] = [
        SensorField::Ph,
        SensorField::Temperature,
        SensorField::Humidity,
        SensorField::Nitrogen,
        SensorField::Phosphorus,
        SensorField::Potassium,
    ];

    /// Human readable label.
    pub fn label(self) -> &'static str {
        match self {
            SensorField::Ph => "pH",
            SensorField::Temperature => "Temperature",
            SensorField::Humidity => "Humidity",
            SensorField::Nitrogen => "Nitrogen",
            SensorField::Phosphorus => "Phosphorus",
            SensorField::Potassium => "Potassium",
        }
    }

    /// Unit suffix, empty for pH.
    pub fn unit(self) -> &'static str {
        match self {
            SensorField::Ph => "",
            SensorField::Temperature => "°C",
            SensorField::Humidity => "%",
            SensorField::Nitrogen | SensorField::Phosphorus => "ppm",
            SensorField::Potassium => "cmol/kg",
        }
    }
}

impl fmt::Display for SensorField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a field name matches none of the six sensor fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownField(pub String);

impl fmt::Display for UnknownField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown sensor field '{}'", self.0)
    }
}

impl std::error::Error for UnknownField {}

impl FromStr for SensorField {
    type Err = UnknownField;

    /// Accepts English names and the measurement API's Spanish keys, in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // ---
        match s.trim().to_ascii_lowercase().as_str() {
            "ph" => Ok(SensorField::Ph),
            "temperature" | "temperatura" => Ok(SensorField::Temperature),
            "humidity" | "humedad" => Ok(SensorField::Humidity),
            "nitrogen" | "nitrogeno" => Ok(SensorField::Nitrogen),
            "phosphorus" | "fosforo" => Ok(SensorField::Phosphorus),
            "potassium" | "potasio" => Ok(SensorField::Potassium),
            _ => Err(UnknownField(s.to_string())),
        }
    }
}

/// How a measurement entered the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    #[default]
    Manual,
    #[serde(alias = "wemos")]
    Sensor,
}

/// A single soil reading, either typed in by hand or pushed by a sensor.
///
/// Every numeric parameter is optional. Values that arrive as something other
/// than a finite number (or a string holding one) deserialize as `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    // ---
    #[serde(alias = "fecha")]
    pub timestamp: DateTime<FixedOffset>,

    #[serde(default, deserialize_with = "lenient_number")]
    pub ph: Option<f64>,

    #[serde(default, alias = "temperatura", deserialize_with = "lenient_number")]
    pub temperature: Option<f64>,

    #[serde(default, alias = "humedad", deserialize_with = "lenient_number")]
    pub humidity: Option<f64>,

    #[serde(default, alias = "nitrogeno", deserialize_with = "lenient_number")]
    pub nitrogen: Option<f64>,

    #[serde(default, alias = "fosforo", deserialize_with = "lenient_number")]
    pub phosphorus: Option<f64>,

    #[serde(default, alias = "potasio", deserialize_with = "lenient_number")]
    pub potassium: Option<f64>,

    #[serde(default, alias = "predio")]
    pub field_id: Option<i64>,

    #[serde(default, alias = "origen")]
    pub origin: Origin,
}

/// Averaged readings for one Monday-anchored week.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekSummary {
    // ---
    pub week_start: NaiveDate,
    pub measurement_count: usize,
    pub first_timestamp: DateTime<FixedOffset>,
    pub last_timestamp: DateTime<FixedOffset>,

    /// `None` means no member of the week carried the parameter.
    pub ph: Option<f64>,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub nitrogen: Option<f64>,
    pub phosphorus: Option<f64>,
    pub potassium: Option<f64>,
}

/// Anything that exposes per-parameter soil values.
pub trait SoilSample {
    fn value(&self, field: SensorField) -> Option<f64>;
}

impl SoilSample for Measurement {
    fn value(&self, field: SensorField) -> Option<f64> {
        match field {
            SensorField::Ph => self.ph,
            SensorField::Temperature => self.temperature,
            SensorField::Humidity => self.humidity,
            SensorField::Nitrogen => self.nitrogen,
            SensorField::Phosphorus => self.phosphorus,
            SensorField::Potassium => self.potassium,
        }
    }
}

impl SoilSample for WeekSummary {
    fn value(&self, field: SensorField) -> Option<f64> {
        match field {
            SensorField::Ph => self.ph,
            SensorField::Temperature => self.temperature,
            SensorField::Humidity => self.humidity,
            SensorField::Nitrogen => self.nitrogen,
            SensorField::Phosphorus => self.phosphorus,
            SensorField::Potassium => self.potassium,
        }
    }
}

/// A raw form input: what a user typed, a number from an API, or nothing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    #[default]
    Null,
}

impl FieldValue {
    /// Parse to a finite number, or `None` when empty or unparsable.
    pub fn as_number(&self) -> Option<f64> {
        // ---
        match self {
            FieldValue::Number(n) => Some(*n).filter(|n| n.is_finite()),
            FieldValue::Text(s) => parse_leading_number(s),
            FieldValue::Null => None,
        }
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<i32> for FieldValue {
    fn from(n: i32) -> Self {
        FieldValue::Number(f64::from(n))
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(FieldValue::Null, Into::into)
    }
}

/// Deserialize a number that may arrive as a JSON number, a numeric string,
/// or anything else (which becomes `None`).
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    // ---
    let value = serde_json::Value::deserialize(deserializer)?;
    let number = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => parse_leading_number(&s),
        _ => None,
    };
    Ok(number.filter(|n| n.is_finite()))
}
