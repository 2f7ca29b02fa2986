use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

/// Completion flag shared between a suspended process and the scheduler.
///
/// The scheduler completes it when the awaited event fires (or when a
/// zero-delay resume entry is popped); the process side polls it through
/// [`EventFuture`].
pub(crate) struct SharedState {
    pub completed: bool,
    pub waker: Option<Waker>,
}

impl Default for SharedState {
    fn default() -> Self {
        Self {
            completed: false,
            waker: None,
        }
    }
}

impl SharedState {
    pub fn set_completed(&mut self) {
        if self.completed {
            return;
        }
        self.completed = true;
        if let Some(waker) = self.waker.take() {
            waker.wake()
        }
    }
}

/// Future side of an awaited [`Event`](crate::Event).
///
/// Resolves once the scheduler completes the shared state. Each call to
/// `Event::wait` produces an independent future, so multiple processes can
/// wait on the same event.
pub struct EventFuture {
    pub(crate) state: Rc<RefCell<SharedState>>,
}

impl Future for EventFuture {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context) -> Poll<Self::Output> {
        let mut state = self.state.borrow_mut();
        if !state.completed {
            state.waker = Some(cx.waker().clone());
            return Poll::Pending;
        }
        Poll::Ready(())
    }
}
