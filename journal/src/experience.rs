//! Experience and ingestion records.
//!
//! An experience is one logged session; it holds one or more ingestions.
//! Records serialize with the camelCase field names and unix-millisecond
//! timestamps of the on-device document, so journals written by earlier
//! app versions load unchanged. Every experience carries a stable generated
//! id; lookups go through the id, never the display title.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::mass::Mass;

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Where an experience took place.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Location {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

/// One substance-dose-route-time event within an experience.
///
/// Immutable once created; experiences only ever append.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingestion {
    pub substance_name: String,
    pub dose: Mass,
    pub units: String,
    pub administration_route: String,
    /// Defaults to the epoch when an old document omits it; consumers fall
    /// back to the parent experience's dates.
    #[serde(default, with = "chrono::serde::ts_milliseconds")]
    pub time: DateTime<Utc>,
    #[serde(default)]
    pub notes: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub creation_date: DateTime<Utc>,
    #[serde(default)]
    pub consumer_name: Option<String>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_dose_an_estimate: bool,
    #[serde(default)]
    pub estimated_dose_standard_deviation: Option<f64>,
    #[serde(default)]
    pub custom_unit_id: Option<i64>,
    #[serde(default)]
    pub stomach_fullness: Option<String>,
}

impl Ingestion {
    pub fn new(
        substance_name: impl Into<String>,
        dose: Mass,
        units: impl Into<String>,
        administration_route: impl Into<String>,
        time: DateTime<Utc>,
    ) -> Self {
        Self {
            substance_name: substance_name.into(),
            dose,
            units: units.into(),
            administration_route: administration_route.into(),
            time,
            notes: String::new(),
            creation_date: Utc::now(),
            consumer_name: None,
            end_time: None,
            is_dose_an_estimate: false,
            estimated_dose_standard_deviation: None,
            custom_unit_id: None,
            stomach_fullness: None,
        }
    }

    /// Builder: attach free-text notes.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Builder: record who consumed, when logging for someone else.
    pub fn with_consumer(mut self, consumer: impl Into<String>) -> Self {
        self.consumer_name = Some(consumer.into());
        self
    }
}

/// A user-logged session containing one or more ingestions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    /// Stable identifier, generated at creation. Documents written before
    /// ids existed get one assigned on load.
    #[serde(default = "new_id")]
    pub id: String,
    pub title: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub creation_date: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub sort_date: DateTime<Utc>,
    #[serde(default)]
    pub ingestions: Vec<Ingestion>,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub ratings: Vec<serde_json::Value>,
    #[serde(default)]
    pub timed_notes: Vec<serde_json::Value>,
}

impl Experience {
    pub fn new(title: impl Into<String>, sort_date: DateTime<Utc>) -> Self {
        Self {
            id: new_id(),
            title: title.into(),
            creation_date: Utc::now(),
            sort_date,
            ingestions: Vec::new(),
            location: None,
            is_favorite: false,
            text: String::new(),
            ratings: Vec::new(),
            timed_notes: Vec::new(),
        }
    }

    /// Append an ingestion. The only supported mutation.
    pub fn append(&mut self, ingestion: Ingestion) {
        self.ingestions.push(ingestion);
    }

    /// Distinct substance names in first-ingestion order.
    pub fn substance_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for ingestion in &self.ingestions {
            if !names.contains(&ingestion.substance_name) {
                names.push(ingestion.substance_name.clone());
            }
        }
        names
    }

    /// Distinct consumer names across ingestions, in order.
    pub fn consumer_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for ingestion in &self.ingestions {
            if let Some(consumer) = &ingestion.consumer_name {
                if !names.contains(consumer) {
                    names.push(consumer.clone());
                }
            }
        }
        names
    }

    /// Creation time of the latest-appended ingestion.
    pub fn last_ingestion_created(&self) -> Option<DateTime<Utc>> {
        self.ingestions.last().map(|i| i.creation_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn make_ingestion(substance: &str) -> Ingestion {
        Ingestion::new(
            substance,
            Mass::parse("100mg").unwrap(),
            "mg",
            "oral",
            Utc.timestamp_millis_opt(1_700_000_000_000).unwrap(),
        )
    }

    #[test]
    fn test_experiences_get_distinct_ids() {
        let now = Utc::now();
        let a = Experience::new("Friday", now);
        let b = Experience::new("Friday", now);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_substance_names_dedupe_in_order() {
        let mut exp = Experience::new("Test", Utc::now());
        exp.append(make_ingestion("Caffeine"));
        exp.append(make_ingestion("Theanine"));
        exp.append(make_ingestion("Caffeine"));

        assert_eq!(exp.substance_names(), vec!["Caffeine", "Theanine"]);
    }

    #[test]
    fn test_wire_format_uses_camel_case_millis() {
        let mut exp = Experience::new("Wire", Utc.timestamp_millis_opt(1_700_000_000_000).unwrap());
        exp.append(make_ingestion("MDMA").with_consumer("me"));

        let json = serde_json::to_value(&exp).unwrap();
        assert!(json.get("sortDate").unwrap().is_i64());
        assert!(json.get("isFavorite").is_some());
        let ing = &json.get("ingestions").unwrap()[0];
        assert_eq!(ing.get("substanceName").unwrap(), "MDMA");
        assert!(ing.get("administrationRoute").is_some());
        assert!(ing.get("time").unwrap().is_i64());
    }

    #[test]
    fn test_pre_id_documents_get_an_id_on_load() {
        let json = r#"{
            "title": "Old entry",
            "creationDate": 1700000000000,
            "sortDate": 1700000000000,
            "ingestions": []
        }"#;
        let exp: Experience = serde_json::from_str(json).unwrap();
        assert!(!exp.id.is_empty());
    }
}
