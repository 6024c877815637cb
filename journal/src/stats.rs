//! Aggregate usage statistics.
//!
//! One fold over the full experience list produces the all-time ranked
//! usage list and the "trophy stand" top substance for the all-time,
//! trailing-year, and trailing-month windows. Every helper receives its
//! inputs explicitly; there is no shared snapshot state.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use tracing::warn;

use crate::experience::Experience;
use crate::mass::Mass;

/// All-time usage of one substance.
#[derive(Debug, Clone)]
pub struct SubstanceStat {
    pub name: String,
    pub count: u32,
    /// Cumulative dose across every parseable ingestion.
    pub total_dose: Mass,
}

/// The most-used substance within one window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopSubstance {
    pub substance: String,
    pub count: u32,
}

/// Top substance per trailing window. `None` when the window saw nothing.
#[derive(Debug, Clone, Default)]
pub struct TopSubstances {
    pub all_time: Option<TopSubstance>,
    pub year: Option<TopSubstance>,
    pub month: Option<TopSubstance>,
}

/// Output of [`aggregate`].
#[derive(Debug, Clone, Default)]
pub struct UsageStats {
    /// All-time per-substance usage, ranked descending by count (stable).
    pub ranked: Vec<SubstanceStat>,
    pub top: TopSubstances,
}

/// Insertion-ordered frequency counter. Order decides tie-breaks: the
/// substance encountered first during the fold wins.
#[derive(Debug, Default)]
struct Counter {
    order: Vec<String>,
    counts: HashMap<String, u32>,
}

impl Counter {
    fn bump(&mut self, name: &str) {
        if !self.counts.contains_key(name) {
            self.order.push(name.to_string());
        }
        *self.counts.entry(name.to_string()).or_insert(0) += 1;
    }

    fn top(&self) -> Option<TopSubstance> {
        let mut best: Option<TopSubstance> = None;
        for name in &self.order {
            let count = self.counts[name];
            if best.as_ref().is_none_or(|b| count > b.count) {
                best = Some(TopSubstance {
                    substance: name.clone(),
                    count,
                });
            }
        }
        best
    }
}

/// Fold the experience list into usage statistics as of `now`.
///
/// Each ingestion is attributed to its own timestamp, falling back to the
/// parent experience's sort date, then its creation date. A dose that
/// fails to re-parse is skipped for the cumulative total but still counts
/// toward frequency.
pub fn aggregate(experiences: &[Experience], now: DateTime<Utc>) -> UsageStats {
    let one_year_ago = now - Duration::days(365);
    let one_month_ago = now - Duration::days(30);

    let mut all_time = Counter::default();
    let mut year = Counter::default();
    let mut month = Counter::default();
    let mut doses: HashMap<String, Mass> = HashMap::new();

    for experience in experiences {
        for ingestion in &experience.ingestions {
            let name = ingestion.substance_name.as_str();
            let time = if ingestion.time.timestamp_millis() != 0 {
                ingestion.time
            } else if experience.sort_date.timestamp_millis() != 0 {
                experience.sort_date
            } else {
                experience.creation_date
            };

            all_time.bump(name);
            if time > one_year_ago {
                year.bump(name);
            }
            if time > one_month_ago {
                month.bump(name);
            }

            let total = doses.entry(name.to_string()).or_insert_with(Mass::zero);
            let dose_str = format!("{}{}", ingestion.dose.adjusted, ingestion.dose.unit);
            if let Err(error) = total.add(&dose_str) {
                warn!(substance = name, dose = %dose_str, %error, "skipping unparseable dose");
            }
        }
    }

    let mut ranked: Vec<SubstanceStat> = all_time
        .order
        .iter()
        .map(|name| SubstanceStat {
            name: name.clone(),
            count: all_time.counts[name],
            total_dose: doses.remove(name).unwrap_or_else(Mass::zero),
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count));

    UsageStats {
        ranked,
        top: TopSubstances {
            all_time: all_time.top(),
            year: year.top(),
            month: month.top(),
        },
    }
}
