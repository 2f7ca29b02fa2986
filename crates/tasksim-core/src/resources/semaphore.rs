//! A counting semaphore with FIFO waiters.

use std::cell::RefCell;
use std::collections::VecDeque;

use crate::event::Event;
use crate::simulation::SimulationContext;

struct SemaphoreInner {
    available: u32,
    queue: VecDeque<Event>,
}

/// A resource with `slots` discrete units, acquired via [`request`] and
/// returned via [`release`].
///
/// [`request`]: Semaphore::request
/// [`release`]: Semaphore::release
pub struct Semaphore {
    ctx: SimulationContext,
    slots: u32,
    inner: RefCell<SemaphoreInner>,
}

/// Proof of a granted slot. Consumed by [`Semaphore::release`], so a grant
/// cannot be released twice.
#[must_use = "a granted slot must be released"]
pub struct SlotToken {
    _priv: (),
}

impl Semaphore {
    pub fn new(ctx: SimulationContext, slots: u32) -> Self {
        Self {
            ctx,
            slots,
            inner: RefCell::new(SemaphoreInner {
                available: slots,
                queue: VecDeque::new(),
            }),
        }
    }

    pub fn slots(&self) -> u32 {
        self.slots
    }

    pub fn available(&self) -> u32 {
        self.inner.borrow().available
    }

    /// Acquires one slot, suspending in FIFO order while none is free.
    pub async fn request(&self) -> SlotToken {
        let event = self.ctx.event();
        {
            let mut inner = self.inner.borrow_mut();
            if inner.available > 0 {
                inner.available -= 1;
                event.trigger();
            } else {
                inner.queue.push_back(event.clone());
            }
        }
        event.wait().await;
        SlotToken { _priv: () }
    }

    /// Returns a slot and hands it to the first live waiter, if any.
    pub fn release(&self, token: SlotToken) {
        drop(token);
        let mut inner = self.inner.borrow_mut();
        assert!(
            inner.available < self.slots,
            "semaphore released more times than acquired"
        );
        inner.available += 1;
        while let Some(waiter) = inner.queue.pop_front() {
            if waiter.is_aborted() {
                continue;
            }
            inner.available -= 1;
            waiter.trigger();
            break;
        }
    }
}
