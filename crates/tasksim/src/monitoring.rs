//! Post-run metrics and their report.

use colored::Colorize;
use log::info;

/// Per-host CPU accounting for one finished run.
#[derive(Debug, Clone)]
pub struct HostMetrics {
    pub name: String,
    pub cpu_cores: u32,
    /// Total run time of the tasks placed on this host.
    pub cpu_work: f64,
    /// `cpu_cores * simulation_time`.
    pub cpu_available: f64,
}

impl HostMetrics {
    pub fn idle(&self) -> f64 {
        self.cpu_available - self.cpu_work
    }

    /// Utilization in percent; 0 when no CPU time was available.
    pub fn utilization(&self) -> f64 {
        if self.cpu_available > 0.0 {
            self.cpu_work / self.cpu_available * 100.0
        } else {
            0.0
        }
    }
}

/// Aggregate metrics of one finished run.
#[derive(Debug, Clone)]
pub struct SimulationMetrics {
    /// Virtual time at which the event queue drained.
    pub simulation_time: f64,
    pub hosts: Vec<HostMetrics>,
}

impl SimulationMetrics {
    pub fn total_cpu_cores(&self) -> u32 {
        self.hosts.iter().map(|h| h.cpu_cores).sum()
    }

    pub fn cpu_work_total(&self) -> f64 {
        self.hosts.iter().map(|h| h.cpu_work).sum()
    }

    pub fn cpu_available_total(&self) -> f64 {
        self.hosts.iter().map(|h| h.cpu_available).sum()
    }

    pub fn idle_total(&self) -> f64 {
        self.cpu_available_total() - self.cpu_work_total()
    }

    /// Overall utilization in percent; 0 when no CPU time was available.
    pub fn utilization(&self) -> f64 {
        let available = self.cpu_available_total();
        if available > 0.0 {
            self.cpu_work_total() / available * 100.0
        } else {
            0.0
        }
    }

    /// Logs the closing report. Verbose mode adds per-host blocks; it never
    /// changes the numbers themselves.
    pub fn report(&self, verbose: bool) {
        let rule = "======================================================================";
        let line = "----------------------------------------------------------------------";

        info!("{}", rule);
        let headline = format!("Simulation completed at t={}", fmt_time(self.simulation_time));
        info!("{}", headline.as_str().bold());
        info!("{}", rule);

        if verbose {
            info!("");
            info!("Host Statistics:");
            info!("{}", line);
            for host in &self.hosts {
                info!("{} ({} cores):", host.name, host.cpu_cores);
                info!("  CPU work time:      {}", fmt_time(host.cpu_work));
                info!(
                    "  CPU available time: {} ({} cores x {})",
                    fmt_time(host.cpu_available),
                    host.cpu_cores,
                    fmt_time(self.simulation_time)
                );
                info!("  CPU idle time:      {}", fmt_time(host.idle()));
                info!("  CPU utilization:    {:.2}%", host.utilization());
            }
            info!("{}", line);
        }

        info!("");
        info!("Overall Statistics:");
        info!("{}", line);
        info!("Total CPU cores:        {}", self.total_cpu_cores());
        info!("Total CPU work time:    {}", fmt_time(self.cpu_work_total()));
        if verbose {
            info!("Total CPU available:    {}", fmt_time(self.cpu_available_total()));
            info!("  Breakdown:");
            for host in &self.hosts {
                info!(
                    "    {}: {} cores x {} = {}",
                    host.name,
                    host.cpu_cores,
                    fmt_time(self.simulation_time),
                    fmt_time(host.cpu_available)
                );
            }
        } else {
            info!(
                "Total CPU available:    {} ({} cores x {})",
                fmt_time(self.cpu_available_total()),
                self.total_cpu_cores(),
                fmt_time(self.simulation_time)
            );
        }
        info!("Total CPU idle time:    {}", fmt_time(self.idle_total()));
        info!("CPU utilization:        {:.2}%", self.utilization());
        info!("{}", rule);
    }
}

/// Whole-valued times print as integers, fractional ones with two decimals.
fn fmt_time(t: f64) -> String {
    if t.fract() == 0.0 {
        format!("{}", t as i64)
    } else {
        format!("{:.2}", t)
    }
}
