use embassy_time::Duration;

/// Error reported by the hardware layer for a single operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HalError {
    /// The peripheral reported a fault.
    Fault,
    /// The peripheral is occupied by another operation.
    Busy,
    /// A blocking operation ran past its timeout.
    Timeout,
}

/// Hardware seam for one SPI peripheral.
///
/// The blocking operations poll the peripheral to completion within
/// `timeout`. The `start_` operations hand the buffer to the
/// peripheral's DMA engine and return immediately; completion arrives
/// later as a hardware interrupt, which the integration routes to
/// [`SharedSpi::complete_tx`](crate::SharedSpi::complete_tx) or
/// [`complete_rx`](crate::SharedSpi::complete_rx) for the bus that owns
/// this peripheral.
///
/// Implementations are exclusively owned by one [`SharedSpi`]; callers
/// only ever reach them with the bus lock held.
pub trait SpiHal {
    fn write(
        &mut self,
        buf: &[u8],
        timeout: Duration,
    ) -> Result<(), HalError>;

    fn read(
        &mut self,
        buf: &mut [u8],
        timeout: Duration,
    ) -> Result<(), HalError>;

    /// Full-duplex exchange: clock `tx` out while filling `rx`.
    fn transfer(
        &mut self,
        tx: &[u8],
        rx: &mut [u8],
        timeout: Duration,
    ) -> Result<(), HalError>;

    fn start_write(&mut self, buf: &[u8]) -> Result<(), HalError>;

    fn start_read(&mut self, buf: &mut [u8]) -> Result<(), HalError>;

    /// Full-duplex deferred exchange. Completion posts on the receive
    /// direction.
    fn start_transfer(
        &mut self,
        tx: &[u8],
        rx: &mut [u8],
    ) -> Result<(), HalError>;

    /// Cancel whatever the peripheral is doing, including an in-flight
    /// deferred transfer.
    fn abort(&mut self) -> Result<(), HalError>;
}
