//! Experience timeline and cumulative doses.
//!
//! Everything the experience screen needs beyond the curves: per-ingestion
//! active windows for the log rows, the overall start/end/progress of the
//! session, and per-substance cumulative doses. "Now" is always an
//! explicit argument; the periodic refresh poll belongs to the caller.

use chrono::{DateTime, Duration, Utc};
use tracing::warn;

use datamed::SubstanceIndex;
use journal::{Experience, Ingestion, Mass};

use crate::curve::{substance_curves, CurveInput};
use crate::timing::{total_active_minutes, FALLBACK_ACTIVE_MINUTES};

/// When one ingestion is felt, from its own timestamp through the mean of
/// its declared phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestionWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl IngestionWindow {
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        now >= self.start && now <= self.end
    }
}

/// Overall session timeline, clamped progress included.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExperienceTimeline {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub elapsed: Duration,
    pub remaining: Duration,
    /// 0.0 at the first ingestion, 1.0 once everything has worn off.
    pub progress: f64,
}

/// Cumulative dose of one substance within a single experience.
#[derive(Debug, Clone)]
pub struct CumulativeDose {
    pub substance: String,
    pub total: Mass,
    /// Units and route of the first ingestion, kept for display.
    pub units: String,
    pub route: String,
}

/// The mean-based active window of one ingestion.
///
/// A substance that is unknown, has no timing data, or declares nothing
/// usable for this route gets the fixed 60-minute fallback window.
pub fn ingestion_window(index: &SubstanceIndex, ingestion: &Ingestion) -> IngestionWindow {
    let minutes = index
        .get(&ingestion.substance_name)
        .map(|record| {
            total_active_minutes(
                &record.timing,
                &ingestion.administration_route.to_lowercase(),
            )
        })
        .filter(|&m| m > 0.0)
        .unwrap_or(FALLBACK_ACTIVE_MINUTES);

    IngestionWindow {
        start: ingestion.time,
        end: ingestion.time + Duration::milliseconds((minutes * 60_000.0) as i64),
    }
}

/// Overall timeline of an experience as of `now`.
///
/// Start is the earliest ingestion; end is the latest curve end (the
/// max-based chart variant), so the header matches the rendered chart.
/// `None` for an experience with no ingestions.
pub fn experience_timeline(
    index: &SubstanceIndex,
    experience: &Experience,
    now: DateTime<Utc>,
) -> Option<ExperienceTimeline> {
    let start = experience.ingestions.iter().map(|i| i.time).min()?;

    let mut end = start;
    for ingestion in &experience.ingestions {
        let curves = substance_curves(index, CurveInput::ByIngestion(ingestion));
        let hours = curves
            .iter()
            .map(|c| c.total_hours())
            .fold(0.0_f64, f64::max);
        let ingestion_end = if hours > 0.0 {
            ingestion.time + Duration::milliseconds((hours * 3_600_000.0) as i64)
        } else {
            // No chart data for this substance: fall back to one hour.
            ingestion.time + Duration::hours(1)
        };
        end = end.max(ingestion_end);
    }

    let total = end - start;
    if total <= Duration::zero() {
        return Some(ExperienceTimeline {
            start,
            end,
            elapsed: Duration::zero(),
            remaining: Duration::zero(),
            progress: 1.0,
        });
    }

    let elapsed = now - start;
    let remaining = end - now;
    let progress = (elapsed.num_milliseconds() as f64 / total.num_milliseconds() as f64)
        .clamp(0.0, 1.0);

    Some(ExperienceTimeline {
        start,
        end,
        elapsed,
        remaining,
        progress,
    })
}

/// Per-substance cumulative doses within one experience, in
/// first-ingestion order. A dose that fails to re-parse is skipped for
/// the total but the substance still appears.
pub fn cumulative_doses(experience: &Experience) -> Vec<CumulativeDose> {
    let mut totals: Vec<CumulativeDose> = Vec::new();

    for ingestion in &experience.ingestions {
        let dose_str = format!("{}{}", ingestion.dose.adjusted, ingestion.dose.unit);
        match totals
            .iter_mut()
            .find(|c| c.substance == ingestion.substance_name)
        {
            Some(entry) => {
                if let Err(error) = entry.total.add(&dose_str) {
                    warn!(substance = %ingestion.substance_name, %error, "skipping unparseable dose");
                }
            }
            None => {
                let mut total = Mass::zero();
                if let Err(error) = total.add(&dose_str) {
                    warn!(substance = %ingestion.substance_name, %error, "skipping unparseable dose");
                }
                totals.push(CumulativeDose {
                    substance: ingestion.substance_name.clone(),
                    total,
                    units: ingestion.units.clone(),
                    route: ingestion.administration_route.clone(),
                });
            }
        }
    }

    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const DATASET: &str = r#"{
        "caffeine": {
            "tripsit": {
                "name": "caffeine",
                "timing": {
                    "onset": {"oral": {"value": "10-20", "unit": "minutes"}},
                    "duration": {"oral": {"value": "2-4", "unit": "hours"}},
                    "aftereffects": {"oral": {"value": "1-2", "unit": "hours"}}
                }
            }
        }
    }"#;

    fn index() -> SubstanceIndex {
        SubstanceIndex::from_json(DATASET).unwrap()
    }

    fn t0() -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_700_000_000_000).unwrap()
    }

    fn ingestion(substance: &str, dose: &str, time: DateTime<Utc>) -> Ingestion {
        Ingestion::new(substance, Mass::parse(dose).unwrap(), "mg", "oral", time)
    }

    #[test]
    fn test_ingestion_window_uses_mean_phases() {
        let ing = ingestion("caffeine", "80mg", t0());
        let window = ingestion_window(&index(), &ing);

        // 15 + 180 + 90 minutes.
        assert_eq!(window.end - window.start, Duration::minutes(285));
        assert!(window.is_active(t0() + Duration::hours(2)));
        assert!(!window.is_active(t0() + Duration::hours(6)));
    }

    #[test]
    fn test_unknown_substance_gets_fallback_window() {
        let ing = ingestion("mystery", "80mg", t0());
        let window = ingestion_window(&index(), &ing);
        assert_eq!(window.end - window.start, Duration::minutes(60));
    }

    #[test]
    fn test_experience_timeline_progress_clamps() {
        let mut exp = Experience::new("Coffee", t0());
        exp.append(ingestion("caffeine", "80mg", t0()));

        let halfway = experience_timeline(&index(), &exp, t0() + Duration::hours(2)).unwrap();
        assert!(halfway.progress > 0.0 && halfway.progress < 1.0);
        assert!(halfway.remaining > Duration::zero());

        let done = experience_timeline(&index(), &exp, t0() + Duration::days(1)).unwrap();
        assert_eq!(done.progress, 1.0);

        let before = experience_timeline(&index(), &exp, t0() - Duration::hours(1)).unwrap();
        assert_eq!(before.progress, 0.0);
    }

    #[test]
    fn test_empty_experience_has_no_timeline() {
        let exp = Experience::new("Empty", t0());
        assert!(experience_timeline(&index(), &exp, t0()).is_none());
    }

    #[test]
    fn test_cumulative_doses_accumulate_per_substance() {
        let mut exp = Experience::new("Session", t0());
        exp.append(ingestion("caffeine", "80mg", t0()));
        exp.append(ingestion("caffeine", "0.1g", t0() + Duration::hours(1)));
        exp.append(ingestion("theanine", "200mg", t0()));

        let doses = cumulative_doses(&exp);
        assert_eq!(doses.len(), 2);
        assert_eq!(doses[0].substance, "caffeine");
        assert!((doses[0].total.base - 180.0).abs() < 1e-9);
        assert_eq!(doses[1].substance, "theanine");
        assert_eq!(doses[0].route, "oral");
    }
}
