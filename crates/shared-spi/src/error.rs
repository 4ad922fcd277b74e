use crate::hal::HalError;

/// Status of a failed bus transaction.
///
/// Every variant is recoverable and local to the failed call; the bus
/// lock is released and chip select restored before any of these is
/// returned. Retrying is the caller's decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TxnError {
    /// The hardware reported a fault during a phase.
    Hardware,
    /// No such device. Reserved for integration layers that resolve
    /// devices by lookup; the core never produces it.
    NoDevice,
    /// The bus lock could not be taken within the lock timeout, or the
    /// hardware rejected the phase as busy.
    Busy,
    /// A phase did not complete within the transfer timeout.
    Timeout,
    /// A registration-time conflict, e.g. a completion handler line
    /// already bound in the interrupt registry.
    AlreadyExists,
}

impl From<HalError> for TxnError {
    fn from(err: HalError) -> Self {
        match err {
            HalError::Fault => TxnError::Hardware,
            HalError::Busy => TxnError::Busy,
            HalError::Timeout => TxnError::Timeout,
        }
    }
}
