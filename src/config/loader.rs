//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the attendance
//! policy from YAML files.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{EngineError, EngineResult};

use super::types::{PolicyConfig, PolicyFile, ShiftCatalog};

/// Loads and provides access to the attendance policy.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── policy.yaml   # Rest days, payroll arithmetic, data availability
/// └── shifts.yaml   # Shift catalog keyed by shift type
/// ```
///
/// # Example
///
/// ```no_run
/// use attendance_payroll::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default")?;
/// println!("Rest days: {:?}", loader.policy().rest_days.weekdays());
/// # Ok::<(), attendance_payroll::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    policy: PolicyConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` on success, or an error if:
    /// - Either file is missing (`ConfigNotFound`)
    /// - Either file contains invalid YAML or values (`ConfigParseError`)
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let policy = Self::load_yaml::<PolicyFile>(&path.join("policy.yaml"))?;
        let shifts = Self::load_yaml::<ShiftCatalog>(&path.join("shifts.yaml"))?;

        if policy.payroll.per_day_divisor <= rust_decimal::Decimal::ZERO {
            return Err(EngineError::ConfigParseError {
                path: path.join("policy.yaml").display().to_string(),
                message: format!(
                    "payroll.per_day_divisor must be positive, got {}",
                    policy.payroll.per_day_divisor
                ),
            });
        }

        debug!(
            path = %path.display(),
            shifts = shifts.shifts.len(),
            "Loaded policy configuration"
        );

        Ok(Self {
            policy: PolicyConfig::new(policy, shifts),
        })
    }

    /// Wraps an already-built policy.
    pub fn from_policy(policy: PolicyConfig) -> Self {
        Self { policy }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the loaded policy.
    pub fn policy(&self) -> &PolicyConfig {
        &self.policy
    }

    /// Consumes the loader, returning the policy.
    pub fn into_policy(self) -> PolicyConfig {
        self.policy
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::from_policy(PolicyConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::RoundingMode;
    use chrono::Weekday;
    use rust_decimal::Decimal;
    use std::path::PathBuf;

    fn config_path() -> &'static str {
        "./config/default"
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "attendance-payroll-{}-{}",
            name,
            uuid::Uuid::new_v4()
        ));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_load_default_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let policy = result.unwrap().into_policy();
        assert_eq!(policy.rest_days.weekdays(), &[Weekday::Sun]);
        assert_eq!(policy.payroll.per_day_divisor, Decimal::from(30));
        assert_eq!(policy.payroll.rounding, RoundingMode::Bankers);
        assert!(policy.data_available_from.is_none());
    }

    #[test]
    fn test_default_files_match_built_in_policy() {
        let loaded = ConfigLoader::load(config_path()).unwrap();
        assert_eq!(loaded.policy(), ConfigLoader::default().policy());
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        let result = ConfigLoader::load("/nonexistent/path");

        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("policy.yaml"));
            }
            _ => panic!("Expected ConfigNotFound error"),
        }
    }

    #[test]
    fn test_missing_shift_file_returns_error() {
        let dir = scratch_dir("no-shifts");
        fs::write(dir.join("policy.yaml"), "rest_days: [sunday]\n").unwrap();

        match ConfigLoader::load(&dir) {
            Err(EngineError::ConfigNotFound { path }) => assert!(path.contains("shifts.yaml")),
            other => panic!("Expected ConfigNotFound error, got {:?}", other),
        }
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_malformed_yaml_returns_parse_error() {
        let dir = scratch_dir("malformed");
        fs::write(dir.join("policy.yaml"), "rest_days: [noday]\n").unwrap();
        fs::write(dir.join("shifts.yaml"), "shifts: {}\n").unwrap();

        let err = ConfigLoader::load(&dir).unwrap_err();
        assert_eq!(err.code(), "CONFIG_PARSE_ERROR");
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_non_positive_divisor_rejected() {
        let dir = scratch_dir("divisor");
        fs::write(dir.join("policy.yaml"), "payroll:\n  per_day_divisor: 0\n").unwrap();
        fs::write(dir.join("shifts.yaml"), "shifts: {}\n").unwrap();

        match ConfigLoader::load(&dir) {
            Err(EngineError::ConfigParseError { message, .. }) => {
                assert!(message.contains("per_day_divisor"));
            }
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_custom_shift_file() {
        let dir = scratch_dir("custom");
        fs::write(dir.join("policy.yaml"), "data_available_from: \"03-06-2024\"\n").unwrap();
        fs::write(
            dir.join("shifts.yaml"),
            "shifts:\n  Split:\n    expected_login: \"07:00\"\n    expected_logout: \"19:00\"\n    required_minimum_minutes: 600\n",
        )
        .unwrap();

        let loader = ConfigLoader::load(&dir).unwrap();
        let split = loader.policy().shifts.get("split").unwrap();
        assert_eq!(split.required_minimum_minutes, 600);
        assert!(loader.policy().data_available_from.is_some());
        fs::remove_dir_all(dir).unwrap();
    }
}
