use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::sync::mpsc::Sender;
use std::task::Context;

use super::waker::{waker_ref, RcWake};

/// A spawned cooperative process.
///
/// The future lives in a `RefCell` so the executor can take it out for the
/// duration of a poll; waking re-sends the task onto the executor channel.
pub(crate) struct Task {
    future: RefCell<Option<Pin<Box<dyn Future<Output = ()>>>>>,
    task_sender: Sender<Rc<Task>>,
}

impl Task {
    pub fn new(future: impl Future<Output = ()> + 'static, task_sender: Sender<Rc<Task>>) -> Self {
        Self {
            future: RefCell::new(Some(Box::pin(future))),
            task_sender,
        }
    }

    /// Polls the task once. A finished future is dropped; a pending one is
    /// put back to wait for its next wake-up.
    pub fn poll(self: &Rc<Self>) {
        let mut slot = self.future.borrow_mut();
        if let Some(mut future) = slot.take() {
            let waker = waker_ref(self);
            let mut cx = Context::from_waker(&waker);
            if future.as_mut().poll(&mut cx).is_pending() {
                *slot = Some(future);
            }
        }
    }
}

impl RcWake for Task {
    fn wake_by_ref(rc_self: &Rc<Self>) {
        rc_self
            .task_sender
            .send(rc_self.clone())
            .expect("channel is closed");
    }
}
