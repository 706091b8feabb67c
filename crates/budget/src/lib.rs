//! Scenario application and budget-delta computation engine.
//!
//! Owns the mutable budget state, the snapshot/restore discipline that
//! keeps scenarios independent, the funding-constraint registry and the
//! applier itself. Everything downstream of the deltas lives in other
//! crates.

pub mod applier;
pub mod constraints;
pub mod error;
pub mod snapshot;
pub mod store;

pub use applier::apply_scenario;
pub use constraints::ConstraintRegistry;
pub use error::{BudgetError, Result};
pub use snapshot::Snapshot;
pub use store::BudgetStore;
