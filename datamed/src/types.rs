//! Raw shapes of the bundled reference dataset.
//!
//! The dataset is a single JSON document mapping a lowercased substance key
//! to up to two independently-sourced records: one from TripSit and one from
//! PsychonautWiki. Either side may be missing, and inside a record any field
//! may be missing, so everything here is serde-defaulted. Numeric dosage
//! bounds stay `Option<f64>`: `None` means "unbounded", not zero.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The whole raw dataset, keyed by lowercased substance name.
pub type RawSubstanceData = BTreeMap<String, RawSubstanceEntry>;

/// One raw dataset entry: the two source records for a substance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawSubstanceEntry {
    /// TripSit record, if that source covers the substance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tripsit: Option<SubstanceDataContent>,
    /// PsychonautWiki record, if that source covers the substance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub psychonautwiki: Option<SubstanceDataContent>,
}

/// A single source's view of one substance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubstanceDataContent {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub pretty_name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub properties: Properties,
    #[serde(default)]
    pub timing: Timing,
    #[serde(default)]
    pub dosage: Dosage,
    /// Simple effect names.
    #[serde(default)]
    pub effects: Vec<String>,
    /// Effects with links and categories, when the source provides them.
    #[serde(default)]
    pub effects_detailed: Vec<DetailedEffect>,
    #[serde(default)]
    pub interactions: Interactions,
    #[serde(default)]
    pub links: Links,
    #[serde(default)]
    pub legal_status: LegalStatus,
    #[serde(default)]
    pub metadata: Metadata,
}

/// Free-text safety and chemistry notes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Properties {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub avoid: String,
    #[serde(default)]
    pub test_kits: String,
    #[serde(default)]
    pub half_life: String,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub note: String,
}

/// An effect with its wiki link and category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetailedEffect {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub category: String,
}

/// A declared phase window: a range string like `"1-2"` (or a single
/// number) plus its unit, `"hours"` or `"minutes"`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimingValue {
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub unit: String,
}

/// Per-route timing windows for the three phases.
///
/// Each map is keyed by administration route (`"oral"`, `"insufflated"`,
/// ...). A substance with no timing data has three empty maps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timing {
    #[serde(default)]
    pub onset: BTreeMap<String, TimingValue>,
    #[serde(default)]
    pub duration: BTreeMap<String, TimingValue>,
    #[serde(default)]
    pub aftereffects: BTreeMap<String, TimingValue>,
}

impl Timing {
    /// True when no phase declares any route.
    pub fn is_empty(&self) -> bool {
        self.onset.is_empty() && self.duration.is_empty() && self.aftereffects.is_empty()
    }
}

/// A min/max dosage band. `max: None` leaves the band open-ended.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DoseRange {
    #[serde(default)]
    pub min: f64,
    #[serde(default)]
    pub max: Option<f64>,
}

/// Dosage bands for one administration route, in the route's `units`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DosageRoute {
    #[serde(default)]
    pub units: String,
    #[serde(default)]
    pub threshold: Option<f64>,
    #[serde(default)]
    pub light: Option<DoseRange>,
    #[serde(default)]
    pub common: Option<DoseRange>,
    #[serde(default)]
    pub strong: Option<DoseRange>,
    #[serde(default)]
    pub heavy: Option<f64>,
}

/// Dosage bands keyed by route, plus overall bioavailability when known.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dosage {
    #[serde(default)]
    pub routes: BTreeMap<String, DosageRoute>,
    #[serde(default)]
    pub bioavailability: Option<f64>,
}

/// Interaction name lists, one per severity level.
///
/// Entries name other substances or whole categories ("maois").
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Interactions {
    #[serde(default)]
    pub dangerous: Vec<String>,
    #[serde(default, rename = "unsafe")]
    pub unsafe_: Vec<String>,
    #[serde(default)]
    pub caution: Vec<String>,
}

/// External link collections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Links {
    #[serde(default)]
    pub experiences: Vec<String>,
    #[serde(default)]
    pub research: Vec<String>,
    #[serde(default)]
    pub wikipedia: Vec<String>,
    #[serde(default)]
    pub general: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegalStatus {
    #[serde(default)]
    pub international: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default)]
    pub last_updated: String,
    #[serde(default)]
    pub source_url: String,
    #[serde(default)]
    pub confidence_score: Option<f64>,
}
