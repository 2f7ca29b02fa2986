//! Simulation orchestration: resolves the experiment into dense-index form,
//! builds the cluster, spawns one process per task and runs to quiescence.

use std::collections::HashMap;
use std::rc::Rc;

use anyhow::{anyhow, ensure, Result};
use log::info;
use sugars::rc;
use tasksim_core::{Event, Simulation};

use crate::cluster::{Host, LinkMatrix};
use crate::model::{ExperimentConfig, TaskRecord, TaskSpec};
use crate::monitoring::{HostMetrics, SimulationMetrics};
use crate::process::run_task;

pub struct ClusterSimulation {
    sim: Simulation,
    hosts: Rc<Vec<Rc<Host>>>,
    links: Rc<LinkMatrix>,
    tasks: Rc<Vec<TaskSpec>>,
    completed: Rc<Vec<Event>>,
}

impl std::fmt::Debug for ClusterSimulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClusterSimulation").finish_non_exhaustive()
    }
}

impl ClusterSimulation {
    /// Resolves host and task names to dense indices and builds the cluster.
    /// Fails on unknown references and on a task demanding more RAM than its
    /// host owns (such a task could never run).
    pub fn new(experiment: &ExperimentConfig, records: &[TaskRecord]) -> Result<Self> {
        let sim = Simulation::new();
        let ctx = sim.context();

        let mut host_index = HashMap::with_capacity(experiment.hosts.len());
        for (index, host) in experiment.hosts.iter().enumerate() {
            host_index.insert(host.name.as_str(), index);
        }

        let mut task_index = HashMap::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            task_index.insert(record.name.as_str(), index);
        }

        let mut tasks = Vec::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            let host_idx = *host_index.get(record.host.as_str()).ok_or_else(|| {
                anyhow!(
                    "task '{}' references unknown host '{}'",
                    record.name,
                    record.host
                )
            })?;
            let predecessor = record
                .dependency
                .as_deref()
                .map(|dep| {
                    task_index.get(dep).copied().ok_or_else(|| {
                        anyhow!("task '{}' has undefined dependency: '{}'", record.name, dep)
                    })
                })
                .transpose()?;

            let host = &experiment.hosts[host_idx];
            ensure!(
                record.ram as u64 <= host.ram,
                "task '{}' demands {} RAM but host '{}' has capacity {}",
                record.name,
                record.ram,
                host.name,
                host.ram
            );

            tasks.push(TaskSpec {
                name: record.name.clone(),
                index,
                host_index: host_idx,
                initial_sleep: record.initial_sleep_time as f64,
                run_time: record.run_time as f64,
                ram_demand: record.ram as u64,
                network_time: record.network_time as f64,
                predecessor,
            });
        }

        let hosts: Vec<Rc<Host>> = experiment
            .hosts
            .iter()
            .map(|config| rc!(Host::new(&ctx, config)))
            .collect();
        let links = rc!(LinkMatrix::new(&ctx, hosts.len()));
        let completed: Vec<Event> = tasks.iter().map(|_| ctx.event()).collect();

        Ok(Self {
            sim,
            hosts: rc!(hosts),
            links,
            tasks: rc!(tasks),
            completed: rc!(completed),
        })
    }

    /// Runs every task process to quiescence and reports the metrics.
    pub fn run(&mut self, verbose: bool) -> SimulationMetrics {
        info!("======================================================================");
        info!("Starting simulation with {} tasks", self.tasks.len());
        info!("======================================================================");

        for task in self.tasks.iter() {
            self.sim.spawn(run_task(
                self.sim.context(),
                task.index,
                self.tasks.clone(),
                self.hosts.clone(),
                self.links.clone(),
                self.completed.clone(),
            ));
        }

        self.sim.step_until_no_events();

        let metrics = self.collect_metrics();
        metrics.report(verbose);
        metrics
    }

    /// Current simulation time.
    pub fn time(&self) -> f64 {
        self.sim.time()
    }

    pub fn hosts(&self) -> &[Rc<Host>] {
        &self.hosts
    }

    pub fn completion_events(&self) -> &[Event] {
        &self.completed
    }

    fn collect_metrics(&self) -> SimulationMetrics {
        let simulation_time = self.sim.time();

        let mut cpu_work_per_host = vec![0.0; self.hosts.len()];
        for task in self.tasks.iter() {
            cpu_work_per_host[task.host_index] += task.run_time;
        }

        let hosts = self
            .hosts
            .iter()
            .zip(cpu_work_per_host)
            .map(|(host, cpu_work)| HostMetrics {
                name: host.name.clone(),
                cpu_cores: host.cpu_cores,
                cpu_work,
                cpu_available: host.cpu_cores as f64 * simulation_time,
            })
            .collect();

        SimulationMetrics {
            simulation_time,
            hosts,
        }
    }
}
