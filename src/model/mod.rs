//! Core data model for EOL lookups.
//!
//! [`Fingerprint`] is the normalized identity used for caching and
//! single-flight coalescing; [`Asset`] is a per-request inventory item;
//! [`LookupResult`] is a single provider's normalized answer; [`Plan`]
//! describes the cascade used to answer one asset; [`AggregateReport`]
//! collects every asset's outcome for a request.

mod asset;
mod fingerprint;
mod lookup_result;
mod plan;
mod report;

pub use asset::Asset;
pub use fingerprint::{Fingerprint, ItemKind};
pub use lookup_result::{derive_status_risk, LookupResult, Risk, Status};
pub use plan::{Plan, StopRule};
pub use report::{AggregateReport, Category, ReportEntry};
