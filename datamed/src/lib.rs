//! Bundled substance reference database.
//!
//! The app ships a static JSON dataset combining two harm-reduction
//! sources (TripSit and PsychonautWiki) per substance. This crate owns:
//!
//! - [`types`]: serde mirrors of the raw dataset shapes
//! - [`merge`]: the deterministic two-source merge into one canonical
//!   [`SubstanceRecord`] per substance
//! - [`index`]: the read-only [`SubstanceIndex`] built once at load, with
//!   case-insensitive lookup and substring search
//!
//! Everything here is pure and synchronous; the dataset is read by the
//! caller and handed in as a string or parsed value.

pub mod index;
pub mod merge;
pub mod types;

pub use index::SubstanceIndex;
pub use merge::{merge_substance, SubstanceRecord};
pub use types::*;
