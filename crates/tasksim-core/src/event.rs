//! One-shot simulation events.

use std::cell::RefCell;
use std::rc::Rc;

use crate::async_core::shared_state::{EventFuture, SharedState};
use crate::state::SimulationState;

/// Monotonically increasing event identifier, shared with the scheduler's
/// sequence counter.
pub type EventId = u64;

/// Lifecycle of a one-shot event.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EventState {
    /// Created, not yet fired; waiters may register.
    Pending,
    /// Fired; waiter resumes are enqueued.
    Triggered,
    /// A scheduled firing has been consumed by the run loop.
    Processed,
    /// Cancelled before firing; resource queues skip it.
    Aborted,
}

pub(crate) struct EventInner {
    pub state: EventState,
    pub waiters: Vec<Rc<RefCell<SharedState>>>,
}

/// Handle to a one-shot event. Clones refer to the same event, so a handle
/// can be stored by a resource queue while the owning process awaits it.
#[derive(Clone)]
pub struct Event {
    id: EventId,
    inner: Rc<RefCell<EventInner>>,
    sim_state: Rc<RefCell<SimulationState>>,
}

impl Event {
    pub(crate) fn new(id: EventId, sim_state: Rc<RefCell<SimulationState>>) -> Self {
        Self {
            id,
            inner: Rc::new(RefCell::new(EventInner {
                state: EventState::Pending,
                waiters: Vec::new(),
            })),
            sim_state,
        }
    }

    pub(crate) fn inner(&self) -> Rc<RefCell<EventInner>> {
        self.inner.clone()
    }

    pub fn id(&self) -> EventId {
        self.id
    }

    pub fn state(&self) -> EventState {
        self.inner.borrow().state
    }

    /// Whether the event has fired (triggered or already processed).
    pub fn is_triggered(&self) -> bool {
        matches!(self.state(), EventState::Triggered | EventState::Processed)
    }

    pub fn is_aborted(&self) -> bool {
        self.state() == EventState::Aborted
    }

    /// Fires the event. Each registered waiter is resumed as its own
    /// zero-delay scheduler step, in registration order. Idempotent on an
    /// already-fired event; a no-op on an aborted one.
    pub fn trigger(&self) {
        self.sim_state.borrow_mut().trigger(&self.inner);
    }

    /// Cancels a pending event. Registered waiters are discarded and resource
    /// queues holding this event will skip it.
    pub fn abort(&self) {
        let mut inner = self.inner.borrow_mut();
        if inner.state == EventState::Pending {
            inner.state = EventState::Aborted;
            inner.waiters.clear();
        }
    }

    /// Returns a future that resolves once the event has fired.
    ///
    /// Waiting on an already-fired event resumes on the next scheduler step.
    /// Waiting on an aborted event is a programming error.
    pub fn wait(&self) -> EventFuture {
        let state = Rc::new(RefCell::new(SharedState::default()));
        let mut inner = self.inner.borrow_mut();
        match inner.state {
            EventState::Pending => inner.waiters.push(state.clone()),
            EventState::Triggered | EventState::Processed => {
                drop(inner);
                self.sim_state.borrow_mut().schedule_resume(state.clone());
            }
            EventState::Aborted => panic!("waiting on an aborted event"),
        }
        EventFuture { state }
    }
}
