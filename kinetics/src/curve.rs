//! Intensity-curve generation.
//!
//! Turns one ingestion (or a bare substance name) into the four-point
//! time/intensity curves an area chart renders: flat at zero until the
//! onset ends, a plateau at the dose tier through the peak, back to zero
//! at the end of the after-effects.

use serde::Serialize;

use datamed::SubstanceIndex;
use journal::Ingestion;

use crate::tier::{classify_dose, DEFAULT_TIER};
use crate::timing::{phase_hours_max, phase_hours_min, TimingPhase};

/// What to build a curve for.
///
/// The caller picks the variant explicitly: a specific logged ingestion
/// (dose and route known), or a substance on its own, which falls back to
/// one curve per declared route.
#[derive(Debug, Clone, Copy)]
pub enum CurveInput<'a> {
    BySubstanceName(&'a str),
    ByIngestion(&'a Ingestion),
}

/// One plottable point: hours from the first ingestion, intensity tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurvePoint {
    pub time: f64,
    pub intensity: f64,
}

/// The four-point curve for one substance on one route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubstanceCurve {
    pub substance: String,
    pub route: String,
    pub points: [CurvePoint; 4],
}

impl SubstanceCurve {
    /// Chart series key, `substance|route`.
    pub fn key(&self) -> String {
        format!("{}|{}", self.substance, self.route)
    }

    /// Hours from start to the end of the after-effects.
    pub fn total_hours(&self) -> f64 {
        self.points[3].time
    }
}

fn four_points(onset: f64, duration: f64, after: f64, tier: f64) -> [CurvePoint; 4] {
    [
        CurvePoint {
            time: 0.0,
            intensity: 0.0,
        },
        CurvePoint {
            time: onset,
            intensity: tier,
        },
        CurvePoint {
            time: onset + duration,
            intensity: tier,
        },
        CurvePoint {
            time: onset + duration + after,
            intensity: 0.0,
        },
    ]
}

/// Build the intensity curves for one input.
///
/// Unknown substances and substances with no timing data yield an empty
/// vec — absence, not a zeroed curve. An ingestion yields one curve for
/// its route; a bare substance name yields one per route declared under
/// `timing.onset`, at the conservative default tier.
pub fn substance_curves(index: &SubstanceIndex, input: CurveInput<'_>) -> Vec<SubstanceCurve> {
    let name = match input {
        CurveInput::BySubstanceName(name) => name.to_lowercase(),
        CurveInput::ByIngestion(ingestion) => ingestion.substance_name.to_lowercase(),
    };
    let Some(record) = index.get(&name) else {
        tracing::debug!(substance = %name, "no reference record, no curve");
        return Vec::new();
    };
    if record.timing.is_empty() {
        tracing::debug!(substance = %name, "no timing data, no curve");
        return Vec::new();
    }

    match input {
        CurveInput::ByIngestion(ingestion) => {
            let route = ingestion.administration_route.to_lowercase();
            let tier = classify_dose(&ingestion.dose, record.dosage_for_route(&route)) as f64;

            let onset = phase_hours_max(&record.timing, TimingPhase::Onset, &route);
            let duration = phase_hours_max(&record.timing, TimingPhase::Duration, &route);
            let after = phase_hours_min(&record.timing, TimingPhase::Aftereffects, &route, tier);

            vec![SubstanceCurve {
                substance: name,
                route,
                points: four_points(onset, duration, after, tier),
            }]
        }
        CurveInput::BySubstanceName(_) => {
            let tier = DEFAULT_TIER as f64;
            record
                .timing
                .onset
                .keys()
                .map(|route| {
                    let onset = phase_hours_max(&record.timing, TimingPhase::Onset, route);
                    let duration = phase_hours_max(&record.timing, TimingPhase::Duration, route);
                    let after =
                        phase_hours_min(&record.timing, TimingPhase::Aftereffects, route, 0.0);
                    SubstanceCurve {
                        substance: name.clone(),
                        route: route.clone(),
                        points: four_points(onset, duration, after, tier),
                    }
                })
                .collect()
        }
    }
}

/// Curves for every ingestion of an experience, in ingestion order.
pub fn experience_curves(index: &SubstanceIndex, ingestions: &[Ingestion]) -> Vec<SubstanceCurve> {
    ingestions
        .iter()
        .flat_map(|ingestion| substance_curves(index, CurveInput::ByIngestion(ingestion)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use journal::Mass;

    const DATASET: &str = r#"{
        "mdma": {
            "psychonautwiki": {
                "name": "mdma",
                "pretty_name": "MDMA",
                "timing": {
                    "onset": {"oral": {"value": "30-60", "unit": "minutes"}},
                    "duration": {"oral": {"value": "3-5", "unit": "hours"}},
                    "aftereffects": {"oral": {"value": "1-6", "unit": "hours"}}
                },
                "dosage": {
                    "routes": {
                        "oral": {
                            "units": "mg",
                            "threshold": 30,
                            "light": {"min": 30, "max": 75},
                            "common": {"min": 75, "max": 125},
                            "strong": {"min": 125, "max": 180},
                            "heavy": 200
                        }
                    }
                }
            }
        },
        "dmt": {
            "tripsit": {
                "name": "dmt",
                "timing": {
                    "onset": {
                        "smoked": {"value": "0-1", "unit": "minutes"},
                        "oral": {"value": "15-30", "unit": "minutes"}
                    },
                    "duration": {
                        "smoked": {"value": "5-15", "unit": "minutes"},
                        "oral": {"value": "2-4", "unit": "hours"}
                    },
                    "aftereffects": {
                        "smoked": {"value": "15-30", "unit": "minutes"},
                        "oral": {"value": "1-2", "unit": "hours"}
                    }
                }
            }
        },
        "mystery": {
            "tripsit": {"name": "mystery"}
        }
    }"#;

    fn index() -> SubstanceIndex {
        SubstanceIndex::from_json(DATASET).unwrap()
    }

    fn ingestion(substance: &str, dose: &str, route: &str) -> Ingestion {
        Ingestion::new(
            substance,
            Mass::parse(dose).unwrap(),
            "mg",
            route,
            Utc::now(),
        )
    }

    #[test]
    fn test_ingestion_curve_has_four_points_at_dose_tier() {
        let ing = ingestion("MDMA", "100mg", "oral");
        let curves = substance_curves(&index(), CurveInput::ByIngestion(&ing));

        assert_eq!(curves.len(), 1);
        let curve = &curves[0];
        assert_eq!(curve.key(), "mdma|oral");

        // 100mg oral is a common dose: tier 2.
        let points = &curve.points;
        assert_eq!(points[0], CurvePoint { time: 0.0, intensity: 0.0 });
        assert_eq!(points[1].intensity, 2.0);
        assert_eq!(points[2].intensity, 2.0);
        assert_eq!(points[3].intensity, 0.0);

        // Onset: max(30,60) minutes -> 1.0h. Peak ends at 1.0 + 5.0.
        assert_eq!(points[1].time, 1.0);
        assert_eq!(points[2].time, 6.0);
        // After-effects: min 1h stretched 2/5 toward max 6h -> 3h.
        assert_eq!(points[3].time, 9.0);
    }

    #[test]
    fn test_by_name_emits_one_curve_per_route() {
        let curves = substance_curves(&index(), CurveInput::BySubstanceName("DMT"));

        assert_eq!(curves.len(), 2);
        let mut keys: Vec<String> = curves.iter().map(|c| c.key()).collect();
        keys.sort();
        assert_eq!(keys, vec!["dmt|oral", "dmt|smoked"]);
        // No dose to classify: conservative default tier.
        assert!(curves.iter().all(|c| c.points[1].intensity == 4.0));
    }

    #[test]
    fn test_no_timing_data_means_no_curve() {
        assert!(substance_curves(&index(), CurveInput::BySubstanceName("mystery")).is_empty());
        assert!(substance_curves(&index(), CurveInput::BySubstanceName("unknown")).is_empty());
    }

    #[test]
    fn test_experience_curves_cover_all_ingestions() {
        let ingestions = vec![
            ingestion("MDMA", "100mg", "oral"),
            ingestion("mystery", "10mg", "oral"),
        ];
        let curves = experience_curves(&index(), &ingestions);
        // The substance without timing data contributes nothing.
        assert_eq!(curves.len(), 1);
    }
}
