//! Dose-tier classification.
//!
//! Maps an ingested dose against a route's declared dosage bands to a
//! discrete intensity tier: 0 none through 5 beyond-heavy. The dose is
//! compared through its `adjusted` value, in the same units the route's
//! bands declare.

use datamed::DosageRoute;
use journal::Mass;

/// Tier assumed when a route declares no dosage bands at all. Assuming
/// strong-to-heavy avoids understating risk in the rendered curve.
pub const DEFAULT_TIER: u8 = 4;

/// Classify a dose against a route's bands. First match wins, ascending;
/// the threshold boundary is inclusive. Absent bounds skip their rung.
pub fn classify_dose(dose: &Mass, bands: Option<&DosageRoute>) -> u8 {
    let Some(bands) = bands else {
        return DEFAULT_TIER;
    };
    let amount = dose.adjusted;

    if bands.threshold.is_some_and(|t| amount <= t) {
        0
    } else if band_max(&bands.light).is_some_and(|m| amount <= m) {
        1
    } else if band_max(&bands.common).is_some_and(|m| amount <= m) {
        2
    } else if band_max(&bands.strong).is_some_and(|m| amount <= m) {
        3
    } else if bands.heavy.is_some_and(|h| amount <= h) {
        4
    } else {
        5
    }
}

fn band_max(range: &Option<datamed::DoseRange>) -> Option<f64> {
    range.as_ref().and_then(|r| r.max)
}
