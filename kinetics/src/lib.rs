//! Dose/timing computation for the journal.
//!
//! Pure functions over reference data ([`datamed`]) and logged entries
//! ([`journal`]): no I/O, no clocks. Callers pass `now` explicitly.
//!
//! # Key Components
//!
//! - [`timing`]: resolves per-route phase windows (three variants with
//!   deliberately different range handling)
//! - [`classify_dose`]: maps a dose against a route's bands to a 0–5 tier
//! - [`substance_curves`]: four-point intensity curves for the area chart
//! - [`experience_timeline`] / [`ingestion_window`]: session progress and
//!   per-ingestion active windows
//! - [`detect_interactions`]: pairwise scan against the merged reference
//!   interaction lists
//!
//! # Example
//!
//! ```ignore
//! use kinetics::{substance_curves, CurveInput};
//!
//! let curves = substance_curves(&index, CurveInput::ByIngestion(&ingestion));
//! for curve in &curves {
//!     println!("{}: {} hours", curve.key(), curve.total_hours());
//! }
//! ```

pub mod curve;
pub mod interaction;
pub mod tier;
pub mod timeline;
pub mod timing;

pub use curve::{experience_curves, substance_curves, CurveInput, CurvePoint, SubstanceCurve};
pub use interaction::{detect_interactions, InteractionFinding, InteractionLevel, InteractionScan};
pub use tier::{classify_dose, DEFAULT_TIER};
pub use timeline::{
    cumulative_doses, experience_timeline, ingestion_window, CumulativeDose, ExperienceTimeline,
    IngestionWindow,
};
pub use timing::{
    phase_hours_max, phase_hours_min, phase_minutes, total_active_minutes, TimingPhase,
    FALLBACK_ACTIVE_MINUTES,
};
