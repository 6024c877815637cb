//! Timing resolution.
//!
//! Substances declare per-route phase windows as range strings like
//! `"1-2"` plus a unit. Two resolution variants exist because they serve
//! different call sites:
//!
//! - the mean-based minutes variant drives "is this ingestion still
//!   active" checks in the log;
//! - the max-based hours variant drives chart curves, biased toward the
//!   longest plausible window. Its minutes-to-hours multiplier is `0.016`,
//!   an approximation of 1/60 that existing charts were rendered with;
//!   changing it would shift curve geometry users have already seen.
//!
//! After-effects additionally have a min-based variant with a tier-scaled
//! adjustment; the max/min asymmetry between peak and comedown is
//! intentional and must not be "fixed" here.

use datamed::{Timing, TimingValue};

/// Fallback active window for substances with no timing data, minutes.
pub const FALLBACK_ACTIVE_MINUTES: f64 = 60.0;

/// Hours multiplier applied when a phase is declared in minutes.
const MINUTES_TO_HOURS: f64 = 0.016;

/// The three phases of a timing profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimingPhase {
    Onset,
    Duration,
    Aftereffects,
}

fn phase_entry<'a>(timing: &'a Timing, phase: TimingPhase, route: &str) -> Option<&'a TimingValue> {
    let map = match phase {
        TimingPhase::Onset => &timing.onset,
        TimingPhase::Duration => &timing.duration,
        TimingPhase::Aftereffects => &timing.aftereffects,
    };
    let wanted = route.to_lowercase();
    map.iter()
        .find(|(r, _)| r.to_lowercase() == wanted)
        .map(|(_, v)| v)
}

/// Split a range string on `-` into its numeric parts. Unparseable parts
/// read as zero; an empty string reads as a single zero.
fn split_range(value: &str) -> Vec<f64> {
    value
        .split('-')
        .map(|part| part.trim().parse::<f64>().unwrap_or(0.0))
        .collect()
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn hours_multiplier(unit: &str) -> f64 {
    if unit == "hours" {
        1.0
    } else {
        MINUTES_TO_HOURS
    }
}

/// Mean of the declared range, in minutes. Absent phase data reads as 0.
pub fn phase_minutes(timing: &Timing, phase: TimingPhase, route: &str) -> f64 {
    let Some(entry) = phase_entry(timing, phase, route) else {
        return 0.0;
    };
    let parts = split_range(&entry.value);
    let avg = if parts.len() > 1 {
        (parts[0] + parts[1]) / 2.0
    } else {
        parts.first().copied().unwrap_or(0.0)
    };
    if entry.unit == "hours" {
        avg * 60.0
    } else {
        avg
    }
}

/// Maximum of the declared range, in hours, rounded to one decimal.
/// Absent phase data reads as 0.
pub fn phase_hours_max(timing: &Timing, phase: TimingPhase, route: &str) -> f64 {
    let Some(entry) = phase_entry(timing, phase, route) else {
        return 0.0;
    };
    let max = split_range(&entry.value)
        .into_iter()
        .fold(0.0_f64, f64::max);
    round1(max * hours_multiplier(&entry.unit))
}

/// Minimum of the declared range, in hours, nudged toward the maximum by
/// `adjustment / 5` of the spread. `adjustment` is a dose tier (0–5): a
/// heavier dose stretches the rendered comedown toward its upper bound.
pub fn phase_hours_min(timing: &Timing, phase: TimingPhase, route: &str, adjustment: f64) -> f64 {
    let Some(entry) = phase_entry(timing, phase, route) else {
        return 0.0;
    };
    let parts = split_range(&entry.value);
    let multiplier = hours_multiplier(&entry.unit);
    let min = round1(parts.iter().copied().fold(f64::INFINITY, f64::min) * multiplier);
    let min = if min.is_finite() { min } else { 0.0 };
    let max = phase_hours_max(timing, phase, route);
    let diff = (max - min).max(0.0);
    min + (diff / 5.0) * adjustment
}

/// Total mean-based active window for a route, in minutes.
pub fn total_active_minutes(timing: &Timing, route: &str) -> f64 {
    phase_minutes(timing, TimingPhase::Onset, route)
        + phase_minutes(timing, TimingPhase::Duration, route)
        + phase_minutes(timing, TimingPhase::Aftereffects, route)
}
