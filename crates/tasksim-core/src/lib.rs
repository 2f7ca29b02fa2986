//! Single-threaded discrete-event simulation engine.
//!
//! The engine drives cooperative processes (plain `async` functions) over
//! virtual time. Processes suspend on one-shot [`Event`]s, timeouts, and the
//! blocking resource primitives in [`resources`]; the scheduler resumes them
//! deterministically in (fire time, sequence number) order.

mod async_core;
mod log;
mod state;

pub mod event;
pub mod resources;
pub mod simulation;

pub use async_core::shared_state::EventFuture;
pub use event::{Event, EventId, EventState};
pub use resources::container::Container;
pub use resources::semaphore::{Semaphore, SlotToken};
pub use simulation::{Simulation, SimulationContext};
