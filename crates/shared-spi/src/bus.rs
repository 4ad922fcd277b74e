use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::Mutex;
use embassy_sync::signal::Signal;

/// One physical SPI bus: the hardware handle plus its synchronization
/// state.
///
/// The mutex serializes whole transactions, so no two transactions ever
/// overlap on the wire. The two signals carry completion of deferred
/// transfers from interrupt context to the waiting task, one per
/// direction. Exactly one post resolves exactly one wait: the waiter
/// resets the signal before starting the transfer, so a stale or
/// duplicate post cannot leak into the next transaction.
///
/// Construct one per bus at system init and share it by reference
/// through [`SpiDevice`](crate::SpiDevice) bindings; it is never
/// copied. Dropping it requires all device bindings to be gone first,
/// which the borrow checker enforces.
pub struct SharedSpi<M: RawMutex, HW> {
    pub(crate) hw: Mutex<M, HW>,
    pub(crate) tx_done: Signal<M, ()>,
    pub(crate) rx_done: Signal<M, ()>,
}

impl<M: RawMutex, HW> SharedSpi<M, HW> {
    pub const fn new(hw: HW) -> Self {
        Self {
            hw: Mutex::new(hw),
            tx_done: Signal::new(),
            rx_done: Signal::new(),
        }
    }

    /// Post transmit completion. Non-blocking, callable from interrupt
    /// context.
    pub fn complete_tx(&self) {
        self.tx_done.signal(());
    }

    /// Post receive completion (also used for full-duplex completion).
    /// Non-blocking, callable from interrupt context.
    pub fn complete_rx(&self) {
        self.rx_done.signal(());
    }
}
