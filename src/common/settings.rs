use crate::common::{HarnessError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_PREFIX: &str = "OPSFILE_SEMANTICS";

#[derive(Debug, Clone, Deserialize)]
pub struct HarnessSettings {
    #[serde(default)]
    pub cf_deployment_home: Option<PathBuf>,

    #[serde(default = "default_bosh_binary")]
    pub bosh_binary: String,

    #[serde(default = "default_manifest_file")]
    pub manifest_file: String,

    #[serde(default = "default_operations_dir")]
    pub operations_dir: String,

    #[serde(default)]
    pub vars_file: Option<PathBuf>,

    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_bosh_binary() -> String {
    "bosh".to_string()
}

fn default_manifest_file() -> String {
    "cf-deployment.yml".to_string()
}

fn default_operations_dir() -> String {
    "operations".to_string()
}

/// Values given on the command line; they win over every other source.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub config_file: Option<PathBuf>,
    pub cf_deployment_home: Option<PathBuf>,
    pub bosh_binary: Option<String>,
    pub vars_file: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
}

impl HarnessSettings {
    /// Layers defaults, an optional config file, `OPSFILE_SEMANTICS_*`
    /// environment variables and CLI overrides, in that order.
    pub fn load(overrides: SettingsOverrides) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = &overrides.config_file {
            if !path.exists() {
                return Err(HarnessError::ConfigError(format!(
                    "config file {} does not exist",
                    path.display()
                )));
            }
            builder = builder.add_source(config::File::from(path.as_path()));
        }

        builder = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .set_override_option(
                "cf_deployment_home",
                overrides.cf_deployment_home.map(|p| p.to_string_lossy().to_string()),
            )?
            .set_override_option("bosh_binary", overrides.bosh_binary)?
            .set_override_option(
                "vars_file",
                overrides.vars_file.map(|p| p.to_string_lossy().to_string()),
            )?
            .set_override_option("timeout_secs", overrides.timeout_secs)?;

        let settings: HarnessSettings = builder
            .build()?
            .try_deserialize()
            .map_err(|e| HarnessError::ConfigError(format!("Failed to parse settings: {}", e)))?;

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.bosh_binary.trim().is_empty() {
            return Err(HarnessError::ConfigError("bosh_binary must not be empty".to_string()));
        }
        if self.timeout_secs == Some(0) {
            return Err(HarnessError::ConfigError("timeout_secs must be positive".to_string()));
        }
        if Path::new(&self.manifest_file).is_absolute()
            || Path::new(&self.operations_dir).is_absolute()
        {
            return Err(HarnessError::ConfigError(
                "manifest_file and operations_dir are relative to the fixture root".to_string(),
            ));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
