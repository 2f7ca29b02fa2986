//! The per-task cooperative process.

use std::rc::Rc;

use log::{debug, info};
use tasksim_core::{Event, SimulationContext};

use crate::cluster::{Host, LinkMatrix};
use crate::model::TaskSpec;

/// Runs one task through its phases: initial sleep, predecessor wait,
/// cross-host transfer, RAM, CPU, execution, release, completion signal.
///
/// A cross-host transfer is charged the *predecessor's* network time (the
/// time to emit its output) and holds the directed link predecessor-host ->
/// task-host exclusively for that long.
pub async fn run_task(
    ctx: SimulationContext,
    index: usize,
    tasks: Rc<Vec<TaskSpec>>,
    hosts: Rc<Vec<Rc<Host>>>,
    links: Rc<LinkMatrix>,
    completed: Rc<Vec<Event>>,
) {
    let task = &tasks[index];
    let host = &hosts[task.host_index];

    if task.initial_sleep > 0.0 {
        debug!(
            "[{}]\t[t={}]\tTask {}: sleeping for {} time units",
            host.name,
            ctx.time(),
            task.name,
            task.initial_sleep
        );
        ctx.sleep(task.initial_sleep).await;
    }

    if let Some(pred_index) = task.predecessor {
        let pred = &tasks[pred_index];
        debug!(
            "[{}]\t[t={}]\tTask {}: waiting for dependency {}",
            host.name,
            ctx.time(),
            task.name,
            pred.name
        );
        completed[pred_index].wait().await;

        if pred.host_index != task.host_index && pred.network_time > 0.0 {
            let pred_host = &hosts[pred.host_index];
            let link = links.link(pred.host_index, task.host_index);
            debug!(
                "[{}]\t[t={}]\tTask {}: waiting for network transmission from {} ({} time units)",
                host.name,
                ctx.time(),
                task.name,
                pred.name,
                pred.network_time
            );
            let slot = link.request().await;
            debug!(
                "[NETWORK]\t[t={}]\tTransmission started: {} -> {} ({} time units)",
                ctx.time(),
                pred_host.name,
                host.name,
                pred.network_time
            );
            ctx.sleep(pred.network_time).await;
            debug!(
                "[NETWORK]\t[t={}]\tTransmission completed: {} -> {}",
                ctx.time(),
                pred_host.name,
                host.name
            );
            link.release(slot);
        }
    }

    debug!(
        "[{}]\t[t={}]\tTask {}: ready to execute",
        host.name,
        ctx.time(),
        task.name
    );

    debug!(
        "[{}]\t[t={}]\tTask {}: waiting for {} RAM units",
        host.name,
        ctx.time(),
        task.name,
        task.ram_demand
    );
    host.ram.get(task.ram_demand).wait().await;

    debug!(
        "[{}]\t[t={}]\tTask {}: waiting for CPU core",
        host.name,
        ctx.time(),
        task.name
    );
    let cpu_token = host.cpu.request().await;

    info!(
        "[{}]\t[t={}]\tTask {}: started execution (CPU acquired, {} RAM allocated)",
        host.name,
        ctx.time(),
        task.name,
        task.ram_demand
    );

    ctx.sleep(task.run_time).await;

    info!(
        "[{}]\t[t={}]\tTask {}: finished execution",
        host.name,
        ctx.time(),
        task.name
    );

    // Releases happen at the same instant, CPU first, then RAM; the put's
    // completion is not awaited before the task signals.
    host.cpu.release(cpu_token);
    host.ram.put(task.ram_demand);

    debug!(
        "[{}]\t[t={}]\tTask {}: released {} RAM units",
        host.name,
        ctx.time(),
        task.name,
        task.ram_demand
    );

    completed[index].trigger();
}
