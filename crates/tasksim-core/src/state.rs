use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::future::Future;
use std::rc::Rc;
use std::sync::mpsc::Sender;

use crate::async_core::shared_state::SharedState;
use crate::async_core::task::Task;
use crate::event::{EventInner, EventState};
use crate::log::log_incorrect_usage;

pub(crate) enum ScheduledItem {
    /// A timeout event reaching its fire time.
    Fire(Rc<RefCell<EventInner>>),
    /// A zero-delay wake-up of a single registered waiter.
    Resume(Rc<RefCell<SharedState>>),
}

pub(crate) struct Scheduled {
    pub time: f64,
    pub seq: u64,
    pub item: ScheduledItem,
}

impl PartialEq for Scheduled {
    fn eq(&self, other: &Self) -> bool {
        self.seq == other.seq
    }
}

impl Eq for Scheduled {}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Scheduled {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for the max-heap. The sequence number breaks time ties so
        // that same-instant entries pop in insertion order even under
        // floating-point time.
        other
            .time
            .partial_cmp(&self.time)
            .unwrap()
            .then(other.seq.cmp(&self.seq))
    }
}

pub(crate) struct SimulationState {
    clock: f64,
    queue: BinaryHeap<Scheduled>,
    event_count: u64,
    task_sender: Sender<Rc<Task>>,
}

impl SimulationState {
    pub fn new(task_sender: Sender<Rc<Task>>) -> Self {
        Self {
            clock: 0.0,
            queue: BinaryHeap::new(),
            event_count: 0,
            task_sender,
        }
    }

    pub fn time(&self) -> f64 {
        self.clock
    }

    pub fn event_count(&self) -> u64 {
        self.event_count
    }

    pub fn next_id(&mut self) -> u64 {
        let id = self.event_count;
        self.event_count += 1;
        id
    }

    /// Schedules `inner` to fire at `clock + delay`.
    pub fn schedule_fire(&mut self, delay: f64, inner: Rc<RefCell<EventInner>>) {
        // `!(delay >= 0)` also rejects NaN, which would poison the heap order.
        if !(delay >= 0.0) {
            log_incorrect_usage(self.clock, &format!("invalid timeout delay {}", delay));
            panic!("timeout delay must be non-negative, got {}", delay);
        }
        let seq = self.next_id();
        self.queue.push(Scheduled {
            time: self.clock + delay,
            seq,
            item: ScheduledItem::Fire(inner),
        });
    }

    /// Schedules a zero-delay resume of one waiter at the current time.
    pub fn schedule_resume(&mut self, state: Rc<RefCell<SharedState>>) {
        let seq = self.next_id();
        self.queue.push(Scheduled {
            time: self.clock,
            seq,
            item: ScheduledItem::Resume(state),
        });
    }

    /// Pops the earliest entry and advances the clock to it.
    pub fn next_scheduled(&mut self) -> Option<Scheduled> {
        let entry = self.queue.pop()?;
        self.clock = entry.time;
        Some(entry)
    }

    /// Fires an event: pending waiters each get their own zero-delay resume
    /// step, in registration order. Triggering a fired or aborted event is a
    /// no-op.
    pub fn trigger(&mut self, inner: &Rc<RefCell<EventInner>>) {
        let mut event = inner.borrow_mut();
        if event.state != EventState::Pending {
            return;
        }
        event.state = EventState::Triggered;
        let waiters: Vec<_> = event.waiters.drain(..).collect();
        drop(event);
        for waiter in waiters {
            self.schedule_resume(waiter);
        }
    }

    pub fn spawn(&mut self, future: impl Future<Output = ()> + 'static) {
        let task = Rc::new(Task::new(future, self.task_sender.clone()));
        self.task_sender.send(task).expect("channel is closed");
    }
}
