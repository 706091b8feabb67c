use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use budget::ConstraintRegistry;
use models::FundingSource;

use crate::error::{ConfigError, Result};

/// Loads the funding constraints file: a JSON object mapping each funding
/// source to its categories, locked flag and note.
pub fn load_funding_constraints<P: AsRef<Path>>(path: P) -> Result<ConstraintRegistry> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
    let sources: BTreeMap<String, FundingSource> =
        serde_json::from_str(&raw).map_err(|e| ConfigError::json(path, e))?;

    if sources.is_empty() {
        return Err(ConfigError::Invalid(format!(
            "{} declares no funding sources",
            path.display()
        )));
    }
    Ok(ConstraintRegistry::from_sources(sources))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_funding_constraints() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "Title I Grant": {{
                    "categories": ["Reading Coaches", "Tutoring"],
                    "locked": true,
                    "note": "Federal funds, no reallocation"
                }},
                "General Fund": {{
                    "categories": ["Math Teachers", "Smartboards"],
                    "locked": false
                }}
            }}"#
        )
        .unwrap();

        let registry = load_funding_constraints(file.path()).unwrap();
        assert!(registry.is_locked("Reading Coaches"));
        assert!(!registry.is_locked("Math Teachers"));
        assert!(registry.is_valid_category("Smartboards"));
        assert_eq!(
            registry.notes(),
            ["Title I Grant: Federal funds, no reallocation"]
        );
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = load_funding_constraints("no/such/file.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_malformed_json_is_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = load_funding_constraints(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Json { .. }));
    }

    #[test]
    fn test_empty_object_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{}}").unwrap();
        let err = load_funding_constraints(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }
}
