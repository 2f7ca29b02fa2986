//! Hosts and the directed link table.

use log::info;
use tasksim_core::{Container, Semaphore, SimulationContext};

use crate::model::HostConfig;

/// A compute host: a CPU semaphore with one slot per core and a RAM
/// container that starts full.
pub struct Host {
    pub name: String,
    pub cpu_cores: u32,
    pub ram_capacity: u64,
    pub cpu: Semaphore,
    pub ram: Container,
}

impl Host {
    pub fn new(ctx: &SimulationContext, config: &HostConfig) -> Self {
        info!(
            "Host {} initialized: {} CPU cores, {} RAM units",
            config.name, config.cpu_cores, config.ram
        );
        Self {
            name: config.name.clone(),
            cpu_cores: config.cpu_cores,
            ram_capacity: config.ram,
            cpu: Semaphore::new(ctx.clone(), config.cpu_cores),
            ram: Container::new(ctx.clone(), config.ram, config.ram),
        }
    }
}

/// Dense table of directed host-to-host links. Each ordered pair of distinct
/// hosts gets its own capacity-1 semaphore, so a direction carries at most
/// one in-flight transfer.
pub struct LinkMatrix {
    host_count: usize,
    links: Vec<Option<Semaphore>>,
}

impl LinkMatrix {
    pub fn new(ctx: &SimulationContext, host_count: usize) -> Self {
        let mut links = Vec::with_capacity(host_count * host_count);
        for from in 0..host_count {
            for to in 0..host_count {
                links.push(if from == to {
                    None
                } else {
                    Some(Semaphore::new(ctx.clone(), 1))
                });
            }
        }
        info!(
            "Network initialized with {} directional links for {} hosts",
            host_count * host_count.saturating_sub(1),
            host_count
        );
        Self { host_count, links }
    }

    /// The semaphore guarding the directed link `from -> to`. Indices come
    /// from setup-time resolution, so a bad pair is a programming error.
    pub fn link(&self, from: usize, to: usize) -> &Semaphore {
        assert!(
            from < self.host_count && to < self.host_count,
            "link ({}, {}) is out of range for {} hosts",
            from,
            to,
            self.host_count
        );
        self.links[from * self.host_count + to]
            .as_ref()
            .unwrap_or_else(|| panic!("no link from host {} to itself", from))
    }
}
