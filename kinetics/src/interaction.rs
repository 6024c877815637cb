//! Combination-interaction detection.
//!
//! Scans every unordered pair of substances in an experience against the
//! merged reference interaction lists. A list entry matches the other
//! substance by name or by any of its categories, case-insensitively, so
//! "ssris" on one side catches a substance categorised as an SSRI on the
//! other. A substance missing from the reference data declares no lists
//! of its own but can still be flagged by name from the other side.

use serde::Serialize;
use tracing::debug;

use datamed::{SubstanceIndex, SubstanceRecord};

/// Interaction severity, most severe first. The derived ordering drives
/// the sort of scan findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionLevel {
    Dangerous,
    Unsafe,
    Caution,
}

impl InteractionLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionLevel::Dangerous => "dangerous",
            InteractionLevel::Unsafe => "unsafe",
            InteractionLevel::Caution => "caution",
        }
    }
}

/// One flagged pair. `substance_a` sorts before `substance_b`
/// alphabetically, so the pair is canonical regardless of which side's
/// reference list produced the match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InteractionFinding {
    pub level: InteractionLevel,
    pub substance_a: String,
    pub substance_b: String,
    /// The reference list entry that matched, for display.
    pub note: String,
}

/// Result of scanning one set of substances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InteractionScan {
    /// Distinct substances considered, known to the reference data or not.
    pub substances_checked: usize,
    pub findings: Vec<InteractionFinding>,
}

impl InteractionScan {
    /// True when fewer than two substances were present, which is
    /// different from two-plus substances with no known interactions.
    pub fn nothing_to_check(&self) -> bool {
        self.substances_checked < 2
    }
}

/// One scan participant: canonical display name plus its merged record,
/// when the reference data has one.
struct Participant<'a> {
    display: String,
    record: Option<&'a SubstanceRecord>,
}

impl Participant<'_> {
    fn identity(&self) -> String {
        self.display.to_lowercase()
    }

    fn interaction_lists(&self) -> [(InteractionLevel, &[String]); 3] {
        match self.record {
            Some(record) => [
                (InteractionLevel::Dangerous, record.interactions.dangerous.as_slice()),
                (InteractionLevel::Unsafe, record.interactions.unsafe_.as_slice()),
                (InteractionLevel::Caution, record.interactions.caution.as_slice()),
            ],
            None => [
                (InteractionLevel::Dangerous, &[]),
                (InteractionLevel::Unsafe, &[]),
                (InteractionLevel::Caution, &[]),
            ],
        }
    }

    /// Does `entry` from the other side's interaction list refer to us?
    fn matches(&self, entry: &str) -> bool {
        let entry = entry.to_lowercase();
        if entry == self.identity() {
            return true;
        }
        let Some(record) = self.record else {
            return false;
        };
        entry == record.name.to_lowercase()
            || record
                .categories
                .iter()
                .any(|category| category.to_lowercase() == entry)
    }
}

/// Scan a set of substance names for known interactions.
///
/// Names are deduplicated case-insensitively; a name absent from the
/// reference data still participates under its own spelling. Each flagged
/// pair appears at most once per level, and findings come back sorted
/// most severe first, stable within a level.
pub fn detect_interactions(index: &SubstanceIndex, names: &[String]) -> InteractionScan {
    let mut participants: Vec<Participant<'_>> = Vec::new();
    for name in names {
        let record = index.get(name);
        if record.is_none() {
            debug!(substance = %name, "not in reference data, matching by name only");
        }
        let participant = Participant {
            display: record
                .map(|r| r.pretty_name.clone())
                .unwrap_or_else(|| name.clone()),
            record,
        };
        if !participants
            .iter()
            .any(|p| p.identity() == participant.identity())
        {
            participants.push(participant);
        }
    }

    let mut findings: Vec<InteractionFinding> = Vec::new();
    for (i, a) in participants.iter().enumerate() {
        for b in &participants[i + 1..] {
            let (first, second) = if a.identity() <= b.identity() {
                (a, b)
            } else {
                (b, a)
            };
            // Sides scan in canonical pair order, not input order, so the
            // recorded entry is the same whichever way the names came in.
            for (side, other) in [(first, second), (second, first)] {
                for (level, entries) in side.interaction_lists() {
                    for entry in entries {
                        if !other.matches(entry) {
                            continue;
                        }
                        let duplicate = findings.iter().any(|f| {
                            f.level == level
                                && f.substance_a == first.display
                                && f.substance_b == second.display
                        });
                        if !duplicate {
                            findings.push(InteractionFinding {
                                level,
                                substance_a: first.display.clone(),
                                substance_b: second.display.clone(),
                                note: entry.clone(),
                            });
                        }
                    }
                }
            }
        }
    }

    findings.sort_by_key(|f| f.level);

    InteractionScan {
        substances_checked: participants.len(),
        findings,
    }
}
