#![no_std]
//! Runtime registry mapping interrupt lines to handlers.
//!
//! Task-context code attaches and detaches handlers at runtime; the
//! hardware interrupt entry point calls [`Registry::dispatch`] to route
//! the event to whichever handler is currently bound to the line.
//!
//! All structural mutation and lookup happen inside a blocking mutex.
//! Instantiated with `CriticalSectionRawMutex`, that mutex *is* the
//! "interrupts disabled" critical section, which is what makes the
//! table safe to read from interrupt context on a single core. The
//! design is deliberately not lock-free; the progress argument rests on
//! the critical section, not on atomics.

mod registry;

pub use registry::{Handler, IsrContext, Registry};
