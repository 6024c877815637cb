//! The experience journal.
//!
//! Everything the journal side of the app computes over, without any UI:
//!
//! - [`mass`]: the [`Mass`] quantity type with unit auto-scaling and
//!   lossless accumulation in a milligram base
//! - [`experience`]: [`Experience`] / [`Ingestion`] records with stable ids
//!   and the on-device wire format
//! - [`store`]: the whole-document JSON experience store
//! - [`quickadd`]: free-text quick-add recognition and application
//! - [`stats`]: the all-time ranked usage list and trailing-window trophies
//! - [`config`]: paths and polling cadence
//!
//! All computations are synchronous pure functions; only [`store`] touches
//! the filesystem, and it owns nothing beyond read-whole / write-whole of
//! one document.

pub mod config;
pub mod experience;
pub mod mass;
pub mod quickadd;
pub mod stats;
pub mod store;

pub use config::JournalConfig;
pub use experience::{Experience, Ingestion, Location};
pub use mass::{Mass, MassError};
pub use quickadd::{
    apply_quick_add, parse_quick_add, QuickAdd, QuickAddOutcome, QuickAddParse, QuickAddPartial,
};
pub use stats::{aggregate, SubstanceStat, TopSubstance, TopSubstances, UsageStats};
pub use store::{ExperienceStore, StoreError};
