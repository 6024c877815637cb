//! Quick-add free-text parsing.
//!
//! The search bar doubles as a logging shortcut: a query like
//! `"caffeine 80mg oral morning coffee"` is recognized token-by-token
//! against the bundled substance and route name lists plus a dose pattern,
//! and becomes an ingestion without opening the full entry form.

use std::sync::LazyLock;

use chrono::{DateTime, Duration, Utc};
use regex::Regex;
use tracing::debug;

use crate::experience::{Experience, Ingestion};
use crate::mass::{Mass, MassError};

/// Dose token: `<number><prefix?>g`, e.g. `80mg`, `1.5g`, `200ug`.
static DOSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+(?:\.\d+)?)(m|mc|u|k)?g$").unwrap());

/// Ingestions logged within this window of the latest experience get
/// appended to it instead of opening a new one.
const APPEND_WINDOW_HOURS: i64 = 24;

/// Which quick-add fields the query has matched so far. Drives the
/// "to quick-add, please specify ..." hint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuickAddPartial {
    pub substance: bool,
    pub dose: bool,
    pub units: bool,
    pub route: bool,
    pub title: bool,
}

/// A fully-recognized quick-add request.
#[derive(Debug, Clone, PartialEq)]
pub struct QuickAdd {
    /// Substance name, uppercased the way the log displays it.
    pub substance: String,
    pub dose: f64,
    /// Full unit suffix: `g`, `mg`, `mcg`, `ug`, or `kg`.
    pub units: String,
    pub route: String,
    /// Optional title for a newly-created experience.
    pub title: String,
    /// A trailing `|n...` title segment forces a new experience even
    /// inside the append window.
    pub force_new: bool,
}

/// Outcome of parsing one query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuickAddParse {
    pub partial: QuickAddPartial,
    /// Present only when substance, dose+units, and route all matched.
    pub quick_add: Option<QuickAdd>,
}

/// Where an applied quick-add landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuickAddOutcome {
    /// Appended to an existing experience, identified by id.
    AppendedTo { id: String, title: String },
    /// Created a new experience.
    Created { id: String, title: String },
}

fn full_units(prefix: Option<&str>) -> String {
    format!("{}g", prefix.unwrap_or(""))
}

/// Recognize a free-text query against the known substance and route lists.
pub fn parse_quick_add(query: &str, substances: &[String], routes: &[String]) -> QuickAddParse {
    let parts: Vec<&str> = query.split_whitespace().collect();

    let mut partial = QuickAddPartial::default();
    let mut substance: Option<String> = None;
    let mut dose: Option<f64> = None;
    let mut units: Option<String> = None;
    let mut route: Option<String> = None;

    for part in &parts {
        if let Some(captures) = DOSE_RE.captures(part) {
            if let Ok(number) = captures[1].parse::<f64>() {
                dose = Some(number);
                units = Some(full_units(captures.get(2).map(|m| m.as_str())));
                partial.dose = true;
                partial.units = true;
            }
        }
        if substances.iter().any(|s| s.eq_ignore_ascii_case(part)) {
            substance = Some(part.to_uppercase());
            partial.substance = true;
        }
        if routes.iter().any(|r| r.eq_ignore_ascii_case(part)) {
            route = Some(part.to_string());
            partial.route = true;
        }
    }

    let mut title = String::new();
    let mut force_new = false;
    if parts.len() >= 4 {
        title = parts[3..].join(" ");
        partial.title = true;
        // "... | new" marker splits off the end of the title.
        if let Some(split_at) = title.rfind('|') {
            let marker = title[split_at + 1..].trim();
            if marker.to_lowercase().starts_with('n') {
                force_new = true;
                title = title[..split_at].trim().to_string();
            }
        }
    }

    let quick_add = match (substance, dose, units, route) {
        (Some(substance), Some(dose), Some(units), Some(route)) => Some(QuickAdd {
            substance,
            dose,
            units,
            route,
            title,
            force_new,
        }),
        _ => None,
    };

    QuickAddParse { partial, quick_add }
}

impl QuickAdd {
    /// Build the ingestion this quick-add describes, timestamped `now`.
    pub fn to_ingestion(&self, now: DateTime<Utc>) -> Result<Ingestion, MassError> {
        let dose = Mass::parse(&format!("{}{}", self.dose, self.units))?;
        Ok(Ingestion::new(
            self.substance.clone(),
            dose,
            self.units.clone(),
            self.route.clone(),
            now,
        ))
    }
}

/// Apply a quick-add to the journal.
///
/// Appends to the most recent experience when its latest ingestion was
/// created inside the trailing 24-hour window and the request does not
/// force a new experience; otherwise creates a new titled experience. The
/// append target is selected by experience id.
pub fn apply_quick_add(
    experiences: &mut Vec<Experience>,
    quick_add: &QuickAdd,
    now: DateTime<Utc>,
) -> Result<QuickAddOutcome, MassError> {
    let ingestion = quick_add.to_ingestion(now)?;

    let window_start = now - Duration::hours(APPEND_WINDOW_HOURS);
    let target_id = experiences
        .last()
        .filter(|recent| {
            !quick_add.force_new
                && recent
                    .last_ingestion_created()
                    .is_some_and(|created| created >= window_start)
        })
        .map(|recent| recent.id.clone());

    if let Some(target) = target_id.and_then(|id| experiences.iter_mut().find(|e| e.id == id)) {
        target.append(ingestion);
        debug!(substance = %quick_add.substance, experience = %target.title, "quick-add appended");
        return Ok(QuickAddOutcome::AppendedTo {
            id: target.id.clone(),
            title: target.title.clone(),
        });
    }

    let title = if quick_add.title.is_empty() {
        format!("Quick Add: {}", quick_add.substance)
    } else {
        quick_add.title.clone()
    };
    let mut experience = Experience::new(title, now);
    experience.append(ingestion);
    let outcome = QuickAddOutcome::Created {
        id: experience.id.clone(),
        title: experience.title.clone(),
    };
    debug!(substance = %quick_add.substance, experience = %experience.title, "quick-add created experience");
    experiences.push(experience);
    Ok(outcome)
}
