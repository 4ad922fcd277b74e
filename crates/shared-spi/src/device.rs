use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::MutexGuard;
use embassy_time::{with_timeout, Duration};
use embedded_hal::digital::OutputPin;

use crate::bus::SharedSpi;
use crate::error::TxnError;
use crate::hal::SpiHal;

/// Scoped chip-select bracket: asserted on construction, de-asserted
/// on drop, so every exit path of a transaction, normal or early-error,
/// restores the line exactly once.
///
/// Select lines are driven active-low. Pin writes are treated as
/// infallible; a GPIO that can fail to toggle has no sane recovery
/// here.
struct SelectGuard<'p, CS: OutputPin> {
    pin: Option<&'p mut CS>,
}

impl<'p, CS: OutputPin> SelectGuard<'p, CS> {
    fn assert(mut pin: Option<&'p mut CS>) -> Self {
        if let Some(pin) = pin.as_deref_mut() {
            let _ = pin.set_low();
        }
        Self { pin }
    }
}

impl<CS: OutputPin> Drop for SelectGuard<'_, CS> {
    fn drop(&mut self) {
        if let Some(pin) = self.pin.as_deref_mut() {
            let _ = pin.set_high();
        }
    }
}

/// One device on a shared bus: a non-owning reference to the bus, the
/// device's chip-select line, and an optional configuration check.
///
/// The configuration check runs with the bus lock held, immediately
/// before each transaction, and may reprogram bus parameters (clock
/// rate, bit order, polarity) that another device sharing the bus has
/// changed. It must not block.
///
/// Pass `cs: None` when bus arbitration happens externally and no
/// select line is wired to this device.
pub struct SpiDevice<'a, M: RawMutex, HW, CS> {
    bus: &'a SharedSpi<M, HW>,
    cs: Option<CS>,
    config_check: Option<fn(&mut HW)>,
}

impl<'a, M: RawMutex, HW: SpiHal, CS: OutputPin> SpiDevice<'a, M, HW, CS> {
    pub fn new(bus: &'a SharedSpi<M, HW>, cs: Option<CS>) -> Self {
        Self { bus, cs, config_check: None }
    }

    /// Install the pre-transaction configuration check.
    pub fn set_config_check(&mut self, check: fn(&mut HW)) {
        self.config_check = Some(check);
    }

    /// Remove the pre-transaction configuration check.
    pub fn clear_config_check(&mut self) {
        self.config_check = None;
    }

    /// Take the bus lock within `timeout`; `Busy` on expiry, with no
    /// side effects. Dropping the guard releases the lock.
    async fn acquire(
        &self,
        timeout: Duration,
    ) -> Result<MutexGuard<'a, M, HW>, TxnError> {
        with_timeout(timeout, self.bus.hw.lock())
            .await
            .map_err(|_| TxnError::Busy)
    }

    /// Blocking write: optional command phase, then optional data
    /// phase. An empty slice skips its phase; a failed command phase
    /// skips the data phase. Chip select and the bus lock are restored
    /// on every path.
    pub async fn write(
        &mut self,
        cmd: &[u8],
        data: &[u8],
        lock_timeout: Duration,
        xfer_timeout: Duration,
    ) -> Result<(), TxnError> {
        let mut hw = self.acquire(lock_timeout).await?;
        if let Some(check) = self.config_check {
            check(&mut hw);
        }
        let _select = SelectGuard::assert(self.cs.as_mut());

        if !cmd.is_empty() {
            hw.write(cmd, xfer_timeout)?;
        }
        if !data.is_empty() {
            hw.write(data, xfer_timeout)?;
        }
        Ok(())
    }

    /// Blocking command-then-read: write `cmd`, then fill `data`.
    pub async fn read(
        &mut self,
        cmd: &[u8],
        data: &mut [u8],
        lock_timeout: Duration,
        xfer_timeout: Duration,
    ) -> Result<(), TxnError> {
        let mut hw = self.acquire(lock_timeout).await?;
        if let Some(check) = self.config_check {
            check(&mut hw);
        }
        let _select = SelectGuard::assert(self.cs.as_mut());

        if !cmd.is_empty() {
            hw.write(cmd, xfer_timeout)?;
        }
        if !data.is_empty() {
            hw.read(data, xfer_timeout)?;
        }
        Ok(())
    }

    /// Blocking full-duplex exchange under the same bracket.
    pub async fn transfer(
        &mut self,
        tx: &[u8],
        rx: &mut [u8],
        lock_timeout: Duration,
        xfer_timeout: Duration,
    ) -> Result<(), TxnError> {
        let mut hw = self.acquire(lock_timeout).await?;
        if let Some(check) = self.config_check {
            check(&mut hw);
        }
        let _select = SelectGuard::assert(self.cs.as_mut());

        if !tx.is_empty() {
            hw.transfer(tx, rx, xfer_timeout)?;
        }
        Ok(())
    }

    /// Deferred write: each phase hands its buffer to the hardware and
    /// awaits transmit completion, posted from interrupt context,
    /// within `xfer_timeout`. A completion timeout still de-asserts
    /// chip select and releases the lock.
    pub async fn write_async(
        &mut self,
        cmd: &[u8],
        data: &[u8],
        lock_timeout: Duration,
        xfer_timeout: Duration,
    ) -> Result<(), TxnError> {
        let bus = self.bus;
        let mut hw = self.acquire(lock_timeout).await?;
        if let Some(check) = self.config_check {
            check(&mut hw);
        }
        let _select = SelectGuard::assert(self.cs.as_mut());

        if !cmd.is_empty() {
            Self::tx_phase(bus, &mut hw, cmd, xfer_timeout).await?;
        }
        if !data.is_empty() {
            Self::tx_phase(bus, &mut hw, data, xfer_timeout).await?;
        }
        Ok(())
    }

    /// Deferred command-then-read.
    pub async fn read_async(
        &mut self,
        cmd: &[u8],
        data: &mut [u8],
        lock_timeout: Duration,
        xfer_timeout: Duration,
    ) -> Result<(), TxnError> {
        let bus = self.bus;
        let mut hw = self.acquire(lock_timeout).await?;
        if let Some(check) = self.config_check {
            check(&mut hw);
        }
        let _select = SelectGuard::assert(self.cs.as_mut());

        if !cmd.is_empty() {
            Self::tx_phase(bus, &mut hw, cmd, xfer_timeout).await?;
        }
        if !data.is_empty() {
            Self::rx_phase(bus, &mut hw, data, xfer_timeout).await?;
        }
        Ok(())
    }

    /// Responder-role write. No chip-select bracket: in this role the
    /// select line belongs to the remote master.
    // TODO: hold the transfer until the hal reports the select line
    // active, once SpiHal grows select-edge events.
    pub async fn slave_write(
        &mut self,
        buf: &[u8],
        lock_timeout: Duration,
        xfer_timeout: Duration,
    ) -> Result<(), TxnError> {
        let mut hw = self.acquire(lock_timeout).await?;
        if let Some(check) = self.config_check {
            check(&mut hw);
        }
        if !buf.is_empty() {
            hw.write(buf, xfer_timeout)?;
        }
        Ok(())
    }

    /// Responder-role read.
    pub async fn slave_read(
        &mut self,
        buf: &mut [u8],
        lock_timeout: Duration,
        xfer_timeout: Duration,
    ) -> Result<(), TxnError> {
        let mut hw = self.acquire(lock_timeout).await?;
        if let Some(check) = self.config_check {
            check(&mut hw);
        }
        if !buf.is_empty() {
            hw.read(buf, xfer_timeout)?;
        }
        Ok(())
    }

    /// Responder-role full-duplex exchange.
    pub async fn slave_exchange(
        &mut self,
        tx: &[u8],
        rx: &mut [u8],
        lock_timeout: Duration,
        xfer_timeout: Duration,
    ) -> Result<(), TxnError> {
        let mut hw = self.acquire(lock_timeout).await?;
        if let Some(check) = self.config_check {
            check(&mut hw);
        }
        if !tx.is_empty() {
            hw.transfer(tx, rx, xfer_timeout)?;
        }
        Ok(())
    }

    /// Deferred responder-role write.
    pub async fn slave_write_async(
        &mut self,
        buf: &[u8],
        lock_timeout: Duration,
        xfer_timeout: Duration,
    ) -> Result<(), TxnError> {
        let bus = self.bus;
        let mut hw = self.acquire(lock_timeout).await?;
        if let Some(check) = self.config_check {
            check(&mut hw);
        }
        if !buf.is_empty() {
            Self::tx_phase(bus, &mut hw, buf, xfer_timeout).await?;
        }
        Ok(())
    }

    /// Deferred responder-role read.
    pub async fn slave_read_async(
        &mut self,
        buf: &mut [u8],
        lock_timeout: Duration,
        xfer_timeout: Duration,
    ) -> Result<(), TxnError> {
        let bus = self.bus;
        let mut hw = self.acquire(lock_timeout).await?;
        if let Some(check) = self.config_check {
            check(&mut hw);
        }
        if !buf.is_empty() {
            Self::rx_phase(bus, &mut hw, buf, xfer_timeout).await?;
        }
        Ok(())
    }

    /// Deferred responder-role exchange. Completion posts on the
    /// receive direction.
    pub async fn slave_exchange_async(
        &mut self,
        tx: &[u8],
        rx: &mut [u8],
        lock_timeout: Duration,
        xfer_timeout: Duration,
    ) -> Result<(), TxnError> {
        let bus = self.bus;
        let mut hw = self.acquire(lock_timeout).await?;
        if let Some(check) = self.config_check {
            check(&mut hw);
        }
        if !tx.is_empty() {
            bus.rx_done.reset();
            hw.start_transfer(tx, rx)?;
            with_timeout(xfer_timeout, bus.rx_done.wait())
                .await
                .map_err(|_| TxnError::Timeout)?;
        }
        Ok(())
    }

    /// Cancel any in-flight hardware operation and force chip select
    /// inactive. Does not interrupt a peer task blocked inside its own
    /// transfer; that call observes the abort as a hardware error or
    /// timeout on its own path.
    pub async fn abort(
        &mut self,
        lock_timeout: Duration,
    ) -> Result<(), TxnError> {
        let mut hw = self.acquire(lock_timeout).await?;
        let result = hw.abort();
        if let Some(cs) = self.cs.as_mut() {
            let _ = cs.set_high();
        }
        result.map_err(TxnError::from)
    }

    /// One deferred transmit phase: arm the signal, start the
    /// transfer, await completion. Resetting first discards any stale
    /// post, keeping one post paired with one wait.
    async fn tx_phase(
        bus: &SharedSpi<M, HW>,
        hw: &mut HW,
        buf: &[u8],
        timeout: Duration,
    ) -> Result<(), TxnError> {
        bus.tx_done.reset();
        hw.start_write(buf)?;
        with_timeout(timeout, bus.tx_done.wait())
            .await
            .map_err(|_| TxnError::Timeout)?;
        Ok(())
    }

    /// One deferred receive phase.
    async fn rx_phase(
        bus: &SharedSpi<M, HW>,
        hw: &mut HW,
        buf: &mut [u8],
        timeout: Duration,
    ) -> Result<(), TxnError> {
        bus.rx_done.reset();
        hw.start_read(buf)?;
        with_timeout(timeout, bus.rx_done.wait())
            .await
            .map_err(|_| TxnError::Timeout)?;
        Ok(())
    }
}
