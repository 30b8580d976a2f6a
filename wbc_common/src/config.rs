//! Configuration loading traits and types.
//!
//! Every value the control loop needs before it can serve comes from one
//! TOML file. Missing required values abort startup.
//!
//! # TOML Example
//!
//! ```toml
//! iterations = 10
//! frame_id = "base_link"
//! joint_names = ["l_elbow_flex_joint", "r_elbow_flex_joint"]
//!
//! [solver]
//! kind = "proportional"
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::consts::{DEFAULT_ITERATIONS, DEFAULT_JOINT_SUFFIX};
use crate::solver::SolverSpec;

/// Error type for configuration loading operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Configuration file not found at specified path.
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    /// TOML parsing failed.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// A required parameter is absent.
    #[error("Parameter '{0}' not found")]
    MissingParameter(&'static str),

    /// Semantic validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// Trait for loading configuration from TOML files.
///
/// # Contract
///
/// - Returns `ConfigError::FileNotFound` if the file does not exist
/// - Returns `ConfigError::ParseError` if TOML syntax is invalid
pub trait ConfigLoader: Sized + serde::de::DeserializeOwned {
    /// Load configuration from a TOML file.
    fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound(path.to_path_buf())
            } else {
                ConfigError::ParseError(format!("{}: {e}", path.display()))
            }
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

// Any serde-deserializable struct can be loaded from TOML.
impl<T: serde::de::DeserializeOwned> ConfigLoader for T {}

// ─── Raw Controller Config ──────────────────────────────────────────

/// Controller configuration as written in the TOML file.
///
/// Required values are optional here so that their absence is reported by
/// name from [`ControllerConfig::validate`] rather than as a parse error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Solver iteration budget per start/update call.
    #[serde(default = "default_iterations")]
    pub iterations: u32,

    /// Reference frame every accepted goal must be expressed in.
    pub frame_id: Option<String>,

    /// Tracked joints, in state-vector order.
    pub joint_names: Option<Vec<String>>,

    /// Trailing token stripped from joint names to derive command channels.
    #[serde(default = "default_joint_suffix")]
    pub joint_suffix: String,

    /// Inline solver description.
    pub solver: Option<SolverSpec>,

    /// Solver description file, relative to the config file's directory.
    pub solver_file: Option<PathBuf>,
}

fn default_iterations() -> u32 {
    DEFAULT_ITERATIONS
}

fn default_joint_suffix() -> String {
    DEFAULT_JOINT_SUFFIX.to_string()
}

// ─── Validated Config ───────────────────────────────────────────────

/// Complete validated configuration, ready for runtime use.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedConfig {
    pub iterations: u32,
    pub frame_id: String,
    pub joint_names: Vec<String>,
    pub joint_suffix: String,
    pub solver: SolverSpec,
}

impl ControllerConfig {
    /// Resolve required values and check bounds.
    ///
    /// `base_dir` anchors a relative `solver_file`.
    ///
    /// # Errors
    ///
    /// - `MissingParameter` for an absent `frame_id`, `joint_names`, or solver description
    /// - `ValidationError` for a zero budget, empty/duplicate joint names,
    ///   an empty frame, or both `solver` and `solver_file` set
    pub fn validate(self, base_dir: &Path) -> Result<ValidatedConfig, ConfigError> {
        if self.iterations == 0 {
            return Err(ConfigError::ValidationError(
                "iterations must be a positive integer".to_string(),
            ));
        }

        let frame_id = self
            .frame_id
            .ok_or(ConfigError::MissingParameter("frame_id"))?;
        if frame_id.is_empty() {
            return Err(ConfigError::ValidationError(
                "frame_id cannot be empty".to_string(),
            ));
        }

        let joint_names = self
            .joint_names
            .ok_or(ConfigError::MissingParameter("joint_names"))?;
        validate_joint_names(&joint_names)?;

        let solver = match (self.solver, self.solver_file) {
            (Some(_), Some(_)) => {
                return Err(ConfigError::ValidationError(
                    "specify either [solver] or solver_file, not both".to_string(),
                ));
            }
            (Some(spec), None) => spec,
            (None, Some(file)) => {
                let path = resolve_path(base_dir, &file);
                let spec = SolverSpec::load(&path)?;
                debug!("Loaded solver description from {}", path.display());
                spec
            }
            (None, None) => return Err(ConfigError::MissingParameter("solver")),
        };

        Ok(ValidatedConfig {
            iterations: self.iterations,
            frame_id,
            joint_names,
            joint_suffix: self.joint_suffix,
            solver,
        })
    }
}

/// Check that joint names are present, non-empty, and unique.
fn validate_joint_names(names: &[String]) -> Result<(), ConfigError> {
    if names.is_empty() {
        return Err(ConfigError::ValidationError(
            "joint_names cannot be empty".to_string(),
        ));
    }
    let mut seen = HashSet::new();
    for name in names {
        if name.is_empty() {
            return Err(ConfigError::ValidationError(
                "joint_names contains an empty name".to_string(),
            ));
        }
        if !seen.insert(name.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "duplicate joint name '{name}'"
            )));
        }
    }
    Ok(())
}

/// Resolve a possibly relative path against a base directory.
fn resolve_path(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

// ─── Loading Functions ──────────────────────────────────────────────

/// Load and validate the controller configuration file.
pub fn load_controller_config(path: &Path) -> Result<ValidatedConfig, ConfigError> {
    let raw = ControllerConfig::load(path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    raw.validate(base_dir)
}

/// Parse and validate a controller configuration from a TOML string.
pub fn controller_config_from_str(
    content: &str,
    base_dir: &Path,
) -> Result<ValidatedConfig, ConfigError> {
    let raw: ControllerConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    raw.validate(base_dir)
}
