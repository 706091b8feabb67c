use std::fs;
use std::path::Path;

use models::StrategicGoal;
use serde::Deserialize;

use crate::error::{ConfigError, Result};

#[derive(Debug, Deserialize)]
struct GoalsFile {
    goals: Vec<StrategicGoal>,
}

/// Loads the strategic goals file: `{"goals": [...]}` with priority,
/// goal_type and horizon constrained at the type level.
pub fn load_strategic_goals<P: AsRef<Path>>(path: P) -> Result<Vec<StrategicGoal>> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
    let file: GoalsFile = serde_json::from_str(&raw).map_err(|e| ConfigError::json(path, e))?;
    Ok(file.goals)
}
