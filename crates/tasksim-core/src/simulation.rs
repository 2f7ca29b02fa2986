//! Simulation facade and run loop.

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;
use std::sync::mpsc::{channel, Receiver};

use log::trace;

use crate::async_core::shared_state::EventFuture;
use crate::async_core::task::Task;
use crate::event::{Event, EventState};
use crate::state::{ScheduledItem, SimulationState};

/// Owns the virtual clock, the event queue, and the cooperative executor.
pub struct Simulation {
    sim_state: Rc<RefCell<SimulationState>>,
    task_receiver: Receiver<Rc<Task>>,
}

impl Simulation {
    pub fn new() -> Self {
        let (task_sender, task_receiver) = channel();
        Self {
            sim_state: Rc::new(RefCell::new(SimulationState::new(task_sender))),
            task_receiver,
        }
    }

    /// Returns a cloneable handle for components and processes.
    pub fn context(&self) -> SimulationContext {
        SimulationContext {
            sim_state: self.sim_state.clone(),
        }
    }

    /// Current simulation time.
    pub fn time(&self) -> f64 {
        self.sim_state.borrow().time()
    }

    /// Total number of scheduled entries so far (also the next event id).
    pub fn event_count(&self) -> u64 {
        self.sim_state.borrow().event_count()
    }

    /// Enqueues a cooperative process. It gets its first poll on the next
    /// scheduler step.
    pub fn spawn(&self, future: impl Future<Output = ()> + 'static) {
        self.sim_state.borrow_mut().spawn(future);
    }

    /// Executes one scheduler step: polls ready processes, then pops the
    /// earliest queue entry and handles it. Returns `false` once the queue
    /// has drained.
    pub fn step(&mut self) -> bool {
        self.process_ready_tasks();
        let next = self.sim_state.borrow_mut().next_scheduled();
        let Some(entry) = next else {
            return false;
        };
        match entry.item {
            ScheduledItem::Fire(inner) => {
                trace!("[t={}] fire event #{}", entry.time, entry.seq);
                self.sim_state.borrow_mut().trigger(&inner);
                let mut event = inner.borrow_mut();
                if event.state == EventState::Triggered {
                    event.state = EventState::Processed;
                }
            }
            ScheduledItem::Resume(shared) => {
                shared.borrow_mut().set_completed();
            }
        }
        self.process_ready_tasks();
        true
    }

    /// Runs the simulation to quiescence.
    pub fn step_until_no_events(&mut self) {
        while self.step() {}
    }

    fn process_ready_tasks(&self) {
        while let Ok(task) = self.task_receiver.try_recv() {
            task.poll();
        }
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}

/// Cloneable handle to the simulation state, held by resources and processes.
#[derive(Clone)]
pub struct SimulationContext {
    sim_state: Rc<RefCell<SimulationState>>,
}

impl SimulationContext {
    /// Current simulation time.
    pub fn time(&self) -> f64 {
        self.sim_state.borrow().time()
    }

    /// Creates a fresh pending event. It fires only when explicitly
    /// triggered.
    pub fn event(&self) -> Event {
        let id = self.sim_state.borrow_mut().next_id();
        Event::new(id, self.sim_state.clone())
    }

    /// Creates an event scheduled to fire at `time() + delay`. Panics on a
    /// negative (or NaN) delay.
    pub fn timeout(&self, delay: f64) -> Event {
        let event = self.event();
        self.sim_state
            .borrow_mut()
            .schedule_fire(delay, event.inner());
        event
    }

    /// Suspends the calling process for `delay` units of virtual time.
    pub fn sleep(&self, delay: f64) -> EventFuture {
        self.timeout(delay).wait()
    }

    /// Enqueues a cooperative process.
    pub fn spawn(&self, future: impl Future<Output = ()> + 'static) {
        self.sim_state.borrow_mut().spawn(future);
    }
}
