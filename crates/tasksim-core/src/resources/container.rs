//! A container holding a continuous resource, such as RAM.

use std::cell::RefCell;
use std::collections::VecDeque;

use log::debug;

use crate::event::Event;
use crate::simulation::SimulationContext;

struct QueuedRequest {
    amount: u64,
    event: Event,
}

struct ContainerInner {
    level: u64,
    get_queue: VecDeque<QueuedRequest>,
    put_queue: VecDeque<QueuedRequest>,
}

/// A resource with a level bounded by `[0, capacity]` and blocking FIFO
/// `get`/`put`.
///
/// Waiters are served strictly in enqueue order: an unsatisfiable head
/// blocks the whole queue, which keeps makespans reproducible. Requests
/// whose event was aborted are skipped silently.
pub struct Container {
    ctx: SimulationContext,
    capacity: u64,
    inner: RefCell<ContainerInner>,
}

impl Container {
    /// Creates a container with the given capacity and initial level.
    /// Panics if `init > capacity`.
    pub fn new(ctx: SimulationContext, capacity: u64, init: u64) -> Self {
        assert!(
            init <= capacity,
            "initial level {} exceeds capacity {}",
            init,
            capacity
        );
        Self {
            ctx,
            capacity,
            inner: RefCell::new(ContainerInner {
                level: init,
                get_queue: VecDeque::new(),
                put_queue: VecDeque::new(),
            }),
        }
    }

    pub fn level(&self) -> u64 {
        self.inner.borrow().level
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Takes `amount` out of the container. The returned event fires once the
    /// level covers the request; if it already does, the deduction happens
    /// now and the event fires synchronously.
    pub fn get(&self, amount: u64) -> Event {
        assert!(
            amount <= self.capacity,
            "get of {} exceeds container capacity {}",
            amount,
            self.capacity
        );
        let event = self.ctx.event();
        if amount == 0 {
            event.trigger();
            return event;
        }
        let mut inner = self.inner.borrow_mut();
        if inner.level >= amount {
            inner.level -= amount;
            event.trigger();
            self.process_put_queue(&mut inner);
        } else {
            debug!(
                "[t={}] container get({}) blocked at level {}",
                self.ctx.time(),
                amount,
                inner.level
            );
            inner.get_queue.push_back(QueuedRequest {
                amount,
                event: event.clone(),
            });
        }
        event
    }

    /// Puts `amount` back into the container. The returned event fires once
    /// there is room for it.
    pub fn put(&self, amount: u64) -> Event {
        assert!(
            amount <= self.capacity,
            "put of {} exceeds container capacity {}",
            amount,
            self.capacity
        );
        let event = self.ctx.event();
        if amount == 0 {
            event.trigger();
            return event;
        }
        let mut inner = self.inner.borrow_mut();
        if inner.level + amount <= self.capacity {
            inner.level += amount;
            event.trigger();
            self.process_get_queue(&mut inner);
        } else {
            debug!(
                "[t={}] container put({}) blocked at level {}",
                self.ctx.time(),
                amount,
                inner.level
            );
            inner.put_queue.push_back(QueuedRequest {
                amount,
                event: event.clone(),
            });
        }
        event
    }

    fn process_get_queue(&self, inner: &mut ContainerInner) {
        while let Some(head) = inner.get_queue.front() {
            if head.event.is_aborted() {
                inner.get_queue.pop_front();
                continue;
            }
            if inner.level < head.amount {
                break;
            }
            inner.level -= head.amount;
            let head = inner.get_queue.pop_front().unwrap();
            head.event.trigger();
        }
    }

    fn process_put_queue(&self, inner: &mut ContainerInner) {
        while let Some(head) = inner.put_queue.front() {
            if head.event.is_aborted() {
                inner.put_queue.pop_front();
                continue;
            }
            if inner.level + head.amount > self.capacity {
                break;
            }
            inner.level += head.amount;
            let head = inner.put_queue.pop_front().unwrap();
            head.event.trigger();
        }
    }
}
