//! Two-source record merge.
//!
//! The dataset carries up to two partial records per substance. The merge
//! folds them into one canonical [`SubstanceRecord`] with fixed precedence:
//! PsychonautWiki is the primary source, TripSit the secondary. The rules
//! are deterministic and total — absent data on both sides always resolves
//! to a defined empty value, never an error.

use crate::types::*;

/// The canonical merged view of one substance.
///
/// Built once per dataset load and immutable afterwards; never persisted.
/// Both raw sources are retained for traceability.
#[derive(Debug, Clone, Default)]
pub struct SubstanceRecord {
    /// Lowercased dataset key this record was merged under.
    pub key: String,
    pub name: String,
    pub pretty_name: String,
    pub aliases: Vec<String>,
    pub categories: Vec<String>,
    pub effects: Vec<String>,
    pub effects_detailed: Vec<DetailedEffect>,
    pub properties: Properties,
    pub timing: Timing,
    pub dosage: Dosage,
    pub interactions: Interactions,
    pub links: Links,
    pub legal_status: LegalStatus,
    pub metadata: Metadata,
    /// Raw PsychonautWiki source record.
    pub primary: Option<SubstanceDataContent>,
    /// Raw TripSit source record.
    pub secondary: Option<SubstanceDataContent>,
}

impl SubstanceRecord {
    /// Dosage bands for a route, case-insensitive on the route name.
    pub fn dosage_for_route(&self, route: &str) -> Option<&DosageRoute> {
        let wanted = route.to_lowercase();
        self.dosage
            .routes
            .iter()
            .find(|(r, _)| r.to_lowercase() == wanted)
            .map(|(_, v)| v)
    }
}

/// Union of two string lists: primary entries first, then unseen secondary
/// entries. Duplicates are exact-string matches only.
fn merge_lists(primary: &[String], secondary: &[String]) -> Vec<String> {
    let mut merged: Vec<String> = Vec::with_capacity(primary.len() + secondary.len());
    for item in primary.iter().chain(secondary.iter()) {
        if !merged.contains(item) {
            merged.push(item.clone());
        }
    }
    merged
}

/// First non-empty string of the pair, else empty.
fn first_non_empty(primary: &str, secondary: &str) -> String {
    if !primary.is_empty() {
        primary.to_string()
    } else {
        secondary.to_string()
    }
}

/// Merge the two source records for `key` into one canonical record.
///
/// Precedence rules:
/// - scalars (`name`, `pretty_name`): primary, else secondary, else the key
///   itself (`pretty_name` additionally falls back to the resolved name);
/// - set-valued fields: union, primary-then-secondary insertion order;
/// - `properties` strings: primary, else secondary, else `""`;
/// - `effects_detailed`: primary wholesale if non-empty, else secondary;
/// - `timing`, `dosage`, `links`, `legal_status`: primary wholesale if
///   present, else secondary, else the empty default;
/// - `metadata`: primary wholesale else secondary, with `source_url`
///   coalesced across both.
pub fn merge_substance(
    key: &str,
    primary: Option<&SubstanceDataContent>,
    secondary: Option<&SubstanceDataContent>,
) -> SubstanceRecord {
    let empty = SubstanceDataContent::default();
    let p = primary.unwrap_or(&empty);
    let s = secondary.unwrap_or(&empty);

    let name = {
        let n = first_non_empty(&p.name, &s.name);
        if n.is_empty() {
            key.to_string()
        } else {
            n
        }
    };
    let pretty_name = {
        let n = first_non_empty(&p.pretty_name, &s.pretty_name);
        if n.is_empty() {
            name.clone()
        } else {
            n
        }
    };

    let effects_detailed = if !p.effects_detailed.is_empty() {
        p.effects_detailed.clone()
    } else {
        s.effects_detailed.clone()
    };

    let timing = if !p.timing.is_empty() {
        p.timing.clone()
    } else {
        s.timing.clone()
    };
    let dosage = if !p.dosage.routes.is_empty() || p.dosage.bioavailability.is_some() {
        p.dosage.clone()
    } else {
        s.dosage.clone()
    };
    let links = if p.links != Links::default() {
        p.links.clone()
    } else {
        s.links.clone()
    };
    let legal_status = if !p.legal_status.international.is_empty() {
        p.legal_status.clone()
    } else {
        s.legal_status.clone()
    };

    let mut metadata = if p.metadata != Metadata::default() {
        p.metadata.clone()
    } else {
        s.metadata.clone()
    };
    metadata.source_url = first_non_empty(&p.metadata.source_url, &s.metadata.source_url);

    SubstanceRecord {
        key: key.to_string(),
        name,
        pretty_name,
        aliases: merge_lists(&p.aliases, &s.aliases),
        categories: merge_lists(&p.categories, &s.categories),
        effects: merge_lists(&p.effects, &s.effects),
        effects_detailed,
        properties: Properties {
            summary: first_non_empty(&p.properties.summary, &s.properties.summary),
            avoid: first_non_empty(&p.properties.avoid, &s.properties.avoid),
            test_kits: first_non_empty(&p.properties.test_kits, &s.properties.test_kits),
            half_life: first_non_empty(&p.properties.half_life, &s.properties.half_life),
            warnings: merge_lists(&p.properties.warnings, &s.properties.warnings),
            note: first_non_empty(&p.properties.note, &s.properties.note),
        },
        timing,
        dosage,
        interactions: Interactions {
            dangerous: merge_lists(&p.interactions.dangerous, &s.interactions.dangerous),
            unsafe_: merge_lists(&p.interactions.unsafe_, &s.interactions.unsafe_),
            caution: merge_lists(&p.interactions.caution, &s.interactions.caution),
        },
        links,
        legal_status,
        metadata,
        primary: primary.cloned(),
        secondary: secondary.cloned(),
    }
}
