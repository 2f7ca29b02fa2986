//! `Waker` plumbing for `Rc`-based tasks.
//!
//! Simulation tasks are single-threaded and hold `Rc`/`RefCell` state, so
//! they cannot satisfy the `Send + Sync` bound of `futures::task::ArcWake`.
//! This module provides the equivalent raw-vtable machinery over `Rc`.

use std::marker::PhantomData;
use std::mem::ManuallyDrop;
use std::ops::Deref;
use std::rc::Rc;
use std::task::{RawWaker, RawWakerVTable, Waker};

pub(crate) trait RcWake {
    fn wake_by_ref(rc_self: &Rc<Self>);

    fn wake(self: Rc<Self>)
    where
        Self: Sized,
    {
        Self::wake_by_ref(&self)
    }
}

/// A `Waker` that borrows the task instead of bumping its reference count.
pub(crate) struct WakerRef<'a> {
    waker: ManuallyDrop<Waker>,
    _marker: PhantomData<&'a ()>,
}

impl Deref for WakerRef<'_> {
    type Target = Waker;

    fn deref(&self) -> &Waker {
        &self.waker
    }
}

pub(crate) fn waker_ref<W: RcWake>(wake: &Rc<W>) -> WakerRef<'_> {
    let ptr = Rc::as_ptr(wake) as *const ();
    let waker = ManuallyDrop::new(unsafe { Waker::from_raw(RawWaker::new(ptr, waker_vtable::<W>())) });
    WakerRef {
        waker,
        _marker: PhantomData,
    }
}

fn waker_vtable<W: RcWake>() -> &'static RawWakerVTable {
    &RawWakerVTable::new(
        clone_rc_raw::<W>,
        wake_rc_raw::<W>,
        wake_by_ref_rc_raw::<W>,
        drop_rc_raw::<W>,
    )
}

unsafe fn increase_refcount<T: RcWake>(data: *const ()) {
    // Retain the Rc without dropping the original reference.
    let rc = ManuallyDrop::new(Rc::<T>::from_raw(data as *const T));
    let _rc_clone: ManuallyDrop<_> = rc.clone();
}

unsafe fn clone_rc_raw<T: RcWake>(data: *const ()) -> RawWaker {
    increase_refcount::<T>(data);
    RawWaker::new(data, waker_vtable::<T>())
}

unsafe fn wake_rc_raw<T: RcWake>(data: *const ()) {
    let rc: Rc<T> = Rc::from_raw(data as *const T);
    RcWake::wake(rc);
}

unsafe fn wake_by_ref_rc_raw<T: RcWake>(data: *const ()) {
    let rc = ManuallyDrop::new(Rc::<T>::from_raw(data as *const T));
    RcWake::wake_by_ref(&rc);
}

unsafe fn drop_rc_raw<T: RcWake>(data: *const ()) {
    drop(Rc::<T>::from_raw(data as *const T))
}
