use embassy_sync::blocking_mutex::raw::RawMutex;
use irq_registry::{Handler, IsrContext};

use crate::bus::SharedSpi;

/// Registry handler posting transmit completion for one bus.
///
/// Register it on the line that carries the peripheral's transmit-done
/// interrupt. It wakes the task parked on the signal, so it requests a
/// preempt to let that task run on interrupt return.
pub struct TxComplete<M: RawMutex + 'static, HW: 'static>(
    pub &'static SharedSpi<M, HW>,
);

impl<M: RawMutex + Sync, HW: Send> Handler for TxComplete<M, HW> {
    fn on_interrupt(&self, _line: u16, cx: &mut IsrContext) {
        self.0.complete_tx();
        cx.request_preempt();
    }
}

/// Registry handler posting receive (and full-duplex) completion for
/// one bus.
pub struct RxComplete<M: RawMutex + 'static, HW: 'static>(
    pub &'static SharedSpi<M, HW>,
);

impl<M: RawMutex + Sync, HW: Send> Handler for RxComplete<M, HW> {
    fn on_interrupt(&self, _line: u16, cx: &mut IsrContext) {
        self.0.complete_rx();
        cx.request_preempt();
    }
}
