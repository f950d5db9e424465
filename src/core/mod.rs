//! Core business logic module
//!
//! This module contains the reconciliation components, leaves first:
//! - `amount` - Numeric value parser for monetary display text
//! - `schema` - Layout detection (named vendor layouts, generic inference)
//! - `normalizer` - Raw rows to canonical records
//! - `matcher` - Two-phase exact/approximate matching engine
//! - `aggregator` - Result assembly and summary counts
//! - `traits` - Pluggable layout strategies and match observers
//! - `diagnostics` - Observer that forwards to `tracing`

pub mod aggregator;
pub mod amount;
pub mod diagnostics;
pub mod matcher;
pub mod normalizer;
pub mod schema;
pub mod traits;

pub use diagnostics::TracingObserver;
pub use matcher::{reconcile, MatchingEngine, DEFAULT_TOLERANCE, EXACT_EPSILON};
pub use normalizer::Normalizer;
pub use schema::{ColumnMapping, DetectedSchema, Layout, SchemaDetector, Validation};
pub use traits::{MatchObserver, NoopObserver, SchemaStrategy};
