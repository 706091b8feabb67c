//! Loaders for the persisted configuration inputs: funding constraints,
//! scenario list, strategic goals and the snapshot budget table. Each
//! entity is parsed into its canonical type exactly once, here at the
//! boundary.

pub mod budget_table;
pub mod constraints;
pub mod error;
pub mod goals;
pub mod scenarios;

pub use budget_table::load_budget_table;
pub use constraints::load_funding_constraints;
pub use error::{ConfigError, Result};
pub use goals::load_strategic_goals;
pub use scenarios::ScenarioList;
