//! Task execution simulator.
//!
//! Loads experiment definitions (hosts from XML, tasks from CSV), then runs
//! every task as a cooperative process over [`tasksim_core`], contending for
//! CPU cores, RAM and directed network links, and reports makespan and
//! per-host utilization.

pub mod cluster;
pub mod config;
pub mod model;
pub mod monitoring;
pub mod process;
pub mod simulation;
pub mod workload;

pub use model::{ExperimentConfig, HostConfig, TaskRecord, TaskSpec};
pub use monitoring::SimulationMetrics;
pub use simulation::ClusterSimulation;
