//! Measurement fields, per-field validation, and the submission gate.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Inclusive numeric bounds a measurement must satisfy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldRange {
    pub min: f64,
    pub max: f64,
}

/// The seven measurement fields, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Field {
    N,
    P,
    K,
    Temperature,
    Humidity,
    Ph,
    Rainfall,
}

impl Field {
    /// Form order, which is also the serialization order of
    /// [`MeasurementForm`].
    pub const ALL: [Field; 7] = [
        Field::N,
        Field::P,
        Field::K,
        Field::Temperature,
        Field::Humidity,
        Field::Ph,
        Field::Rainfall,
    ];

    /// Wire and display name of the field.
    pub fn name(self) -> &'static str {
        match self {
            Field::N => "N",
            Field::P => "P",
            Field::K => "K",
            Field::Temperature => "temperature",
            Field::Humidity => "humidity",
            Field::Ph => "ph",
            Field::Rainfall => "rainfall",
        }
    }

    /// Inclusive bounds accepted for this field.
    pub fn range(self) -> FieldRange {
        match self {
            Field::N => FieldRange { min: 0.0, max: 200.0 },
            Field::P => FieldRange { min: 0.0, max: 150.0 },
            Field::K => FieldRange { min: 0.0, max: 150.0 },
            Field::Temperature => FieldRange { min: 0.0, max: 50.0 },
            Field::Humidity => FieldRange { min: 0.0, max: 100.0 },
            Field::Ph => FieldRange { min: 0.0, max: 14.0 },
            Field::Rainfall => FieldRange { min: 0.0, max: 500.0 },
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The seven string-encoded measurements, serialized in form order.
///
/// Values stay strings end to end; parsing happens only inside
/// [`validate`] and the submission gate, and the request body carries
/// the raw text the user typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MeasurementForm {
    #[serde(rename = "N")]
    pub n: String,
    #[serde(rename = "P")]
    pub p: String,
    #[serde(rename = "K")]
    pub k: String,
    pub temperature: String,
    pub humidity: String,
    pub ph: String,
    pub rainfall: String,
}

impl MeasurementForm {
    /// Store the raw input for one field, replacing the previous value.
    pub fn set(&mut self, field: Field, raw: impl Into<String>) {
        *self.slot_mut(field) = raw.into();
    }

    /// The raw input currently held for one field.
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::N => &self.n,
            Field::P => &self.p,
            Field::K => &self.k,
            Field::Temperature => &self.temperature,
            Field::Humidity => &self.humidity,
            Field::Ph => &self.ph,
            Field::Rainfall => &self.rainfall,
        }
    }

    fn slot_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::N => &mut self.n,
            Field::P => &mut self.p,
            Field::K => &mut self.k,
            Field::Temperature => &mut self.temperature,
            Field::Humidity => &mut self.humidity,
            Field::Ph => &mut self.ph,
            Field::Rainfall => &mut self.rainfall,
        }
    }
}

/// Per-field validation outcomes.
///
/// An empty entry means the field was checked and passed; an absent
/// entry means the field was never checked. Recording an outcome
/// touches only that field, so messages for other fields survive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    entries: BTreeMap<Field, String>,
}

impl ValidationErrors {
    /// Merge one field's outcome, overwriting only that field's entry.
    pub fn record(&mut self, field: Field, outcome: Option<String>) {
        self.entries.insert(field, outcome.unwrap_or_default());
    }

    /// The message recorded for a field, if the field failed its check.
    pub fn message(&self, field: Field) -> Option<&str> {
        self.entries
            .get(&field)
            .map(String::as_str)
            .filter(|message| !message.is_empty())
    }

    /// True when no recorded entry carries a message.
    pub fn is_clean(&self) -> bool {
        self.entries.values().all(String::is_empty)
    }
}

/// Check one raw input against its field's bounds.
///
/// Returns the inline message when the value does not parse as a number
/// or falls outside the inclusive range, `None` when it is acceptable.
pub fn validate(field: Field, raw: &str) -> Option<String> {
    let range = field.range();
    let accepted = raw
        .trim()
        .parse::<f64>()
        .ok()
        .is_some_and(|value| (range.min..=range.max).contains(&value));
    if accepted {
        None
    } else {
        Some(format!("Enter between {} - {}", range.min, range.max))
    }
}

/// The submission gate: true only when every recorded entry is clean and
/// every field holds a parseable value.
///
/// A field that was never touched holds no value, so an all-clean but
/// incomplete form still does not submit.
pub fn submittable(form: &MeasurementForm, errors: &ValidationErrors) -> bool {
    errors.is_clean()
        && Field::ALL.iter().all(|field| {
            form.value(*field)
                .trim()
                .parse::<f64>()
                .ok()
                .is_some_and(f64::is_finite)
        })
}
