//! Data model: raw loader records and their resolved, dense-index forms.

use std::path::PathBuf;

use anyhow::{bail, Result};
use serde::Deserialize;

/// A host as declared in the experiment XML.
#[derive(Debug, Clone)]
pub struct HostConfig {
    pub name: String,
    pub cpu_cores: u32,
    pub ram: u64,
}

/// An experiment: its hosts (in document order, which fixes host indices)
/// and the path of its task CSV.
#[derive(Debug, Clone)]
pub struct ExperimentConfig {
    pub hosts: Vec<HostConfig>,
    pub tasks_path: PathBuf,
}

/// One row of the task CSV, as deserialized. Numeric fields are kept signed
/// so that a negative value is reported as a validation error rather than a
/// parse error.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskRecord {
    #[serde(rename = "TASK_NAME")]
    pub name: String,
    #[serde(rename = "TASK_HOST")]
    pub host: String,
    #[serde(rename = "TASK_INITIAL_SLEEP_TIME")]
    pub initial_sleep_time: i64,
    #[serde(rename = "TASK_RUN_TIME")]
    pub run_time: i64,
    #[serde(rename = "TASK_RAM")]
    pub ram: i64,
    #[serde(rename = "TASK_NETWORK_TIME")]
    pub network_time: i64,
    #[serde(rename = "TASK_DEPENDENCY")]
    pub dependency: Option<String>,
}

impl TaskRecord {
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            bail!("TASK_NAME cannot be empty");
        }
        if self.initial_sleep_time < 0 {
            bail!("initial sleep time must be >= 0, got {}", self.initial_sleep_time);
        }
        if self.run_time < 0 {
            bail!("run time must be >= 0, got {}", self.run_time);
        }
        if self.ram < 0 {
            bail!("RAM must be >= 0, got {}", self.ram);
        }
        if self.network_time < 0 {
            bail!("network time must be >= 0, got {}", self.network_time);
        }
        Ok(())
    }
}

/// A task with every name reference resolved to a dense index. This is the
/// form the simulation works with; name maps stay at the parsing boundary.
#[derive(Debug, Clone)]
pub struct TaskSpec {
    pub name: String,
    pub index: usize,
    pub host_index: usize,
    pub initial_sleep: f64,
    pub run_time: f64,
    pub ram_demand: u64,
    /// Transfer duration charged to successors on other hosts.
    pub network_time: f64,
    pub predecessor: Option<usize>,
}
