#![no_std]
//! Transaction layer for an SPI bus shared between concurrent tasks.
//!
//! One [`SharedSpi`] exists per physical bus. It owns the hardware
//! handle behind an async mutex and the two completion signals that
//! interrupt context posts when a deferred transfer finishes. Any
//! number of [`SpiDevice`]s borrow the bus, each adding its own
//! chip-select line and an optional configuration check that restores
//! bus parameters another device may have changed.
//!
//! Every transfer runs the same bracket: lock the bus (bounded wait),
//! run the configuration check, assert chip select, move the command
//! and data phases, then de-assert chip select and release the lock on
//! every exit path. Deferred transfers additionally wait, bounded, on
//! the direction's completion signal, posted from interrupt context
//! through an [`irq_registry::Registry`].

mod bus;
mod completion;
mod device;
mod error;
mod hal;

pub use bus::SharedSpi;
pub use completion::{RxComplete, TxComplete};
pub use device::SpiDevice;
pub use error::TxnError;
pub use hal::{HalError, SpiHal};
