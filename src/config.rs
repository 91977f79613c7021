//! TOML configuration for runs and workloads.
//!
//! ```toml
//! admission = "on-arrival"
//!
//! [mlq]
//! quantum = 3
//! fallback_tier = 2
//! classes = [{ max_priority = 1, tier = 0 }, { max_priority = 3, tier = 1 }]
//!
//! [mlfq]
//! tiers = 3
//! base_quantum = 2
//! ```
//!
//! Every key is optional. Workloads are a list of `[[jobs]]` tables.

use serde::Deserialize;
use std::{fs, path::Path};
use thiserror::Error;

use crate::{
    core::{Ticks, Tier},
    error::SimError,
    scheduler::{ClassTable, MlfqScheduler, MlqScheduler, PriorityClass},
    sim::{Admission, Job},
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    Invalid(#[from] SimError),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    pub admission: Admission,
    pub mlq: MlqConfig,
    pub mlfq: MlfqConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MlqConfig {
    pub quantum: Ticks,
    pub fallback_tier: Tier,
    pub classes: Vec<PriorityClass>,
}

impl Default for MlqConfig {
    fn default() -> Self {
        let table = ClassTable::default();
        Self {
            quantum: 3,
            fallback_tier: table.fallback(),
            classes: table.classes().to_vec(),
        }
    }
}

impl MlqConfig {
    pub fn build(&self) -> Result<MlqScheduler, SimError> {
        let classes = ClassTable::new(self.classes.clone(), self.fallback_tier);
        MlqScheduler::new(self.quantum, classes)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MlfqConfig {
    pub tiers: usize,
    pub base_quantum: Ticks,
}

impl Default for MlfqConfig {
    fn default() -> Self {
        Self {
            tiers: 3,
            base_quantum: 2,
        }
    }
}

impl MlfqConfig {
    pub fn build(&self) -> Result<MlfqScheduler, SimError> {
        MlfqScheduler::new(self.tiers, self.base_quantum)
    }
}

impl SimConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_str(&read(path.as_ref())?)
    }

    // Both policies are built once so bad parameters surface at load time
    pub fn validate(&self) -> Result<(), SimError> {
        self.mlq.build()?;
        self.mlfq.build()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Workload {
    #[serde(default)]
    pub jobs: Vec<Job>,
}

impl Workload {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_str(&read(path.as_ref())?)
    }
}

fn read(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })
}
