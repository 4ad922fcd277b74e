use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use heapless::Vec;

/// Per-dispatch context handed to a handler.
///
/// A handler that wakes a higher-priority task calls
/// [`request_preempt`](Self::request_preempt) so the interrupt return
/// path can switch to that task immediately instead of resuming the
/// interrupted one.
pub struct IsrContext {
    preempt: bool,
}

impl IsrContext {
    fn new() -> Self {
        Self { preempt: false }
    }

    /// Ask the scheduler to preempt into a woken task on interrupt return.
    pub fn request_preempt(&mut self) {
        self.preempt = true;
    }

    /// Whether a preempt has been requested so far.
    pub fn preempt_requested(&self) -> bool {
        self.preempt
    }
}

/// An interrupt handler capability.
///
/// Runs in interrupt context: it must not block, and anything it wakes
/// is signalled through non-blocking primitives. `Sync` because the
/// same handler value is reachable from both task and interrupt
/// context.
pub trait Handler: Sync {
    fn on_interrupt(&self, line: u16, cx: &mut IsrContext);
}

#[derive(Clone, Copy)]
struct Entry {
    line: u16,
    handler: &'static dyn Handler,
}

/// Registry of up to `N` (line, handler) bindings.
///
/// `M` selects the critical-section flavor: `CriticalSectionRawMutex`
/// on the target, `NoopRawMutex` where a single-threaded test already
/// rules out concurrent access.
pub struct Registry<M: RawMutex, const N: usize> {
    entries: Mutex<M, RefCell<Vec<Entry, N>>>,
}

impl<M: RawMutex, const N: usize> Registry<M, N> {
    pub const fn new() -> Self {
        Self { entries: Mutex::new(RefCell::new(Vec::new())) }
    }

    /// Bind `handler` to `line`.
    ///
    /// Returns false, without mutating the table, if the line is
    /// already bound or the table is full. Callers must check the
    /// result; a dropped registration means completions on that line
    /// go nowhere.
    pub fn register(
        &self,
        line: u16,
        handler: &'static dyn Handler,
    ) -> bool {
        self.entries.lock(|cell| {
            let mut entries = cell.borrow_mut();
            if entries.iter().any(|e| e.line == line) {
                return false;
            }
            entries.push(Entry { line, handler }).is_ok()
        })
    }

    /// Remove the binding for `line`, if any.
    pub fn unregister(&self, line: u16) {
        self.entries.lock(|cell| {
            let mut entries = cell.borrow_mut();
            if let Some(at) = entries.iter().position(|e| e.line == line) {
                entries.swap_remove(at);
            }
        });
    }

    /// Interrupt-context entry point: route the event for `line`.
    ///
    /// Returns whether the handler requested a preempt; the caller
    /// feeds that to the scheduler on interrupt return. An unbound line
    /// is a no-op returning false -- a stray interrupt must not fault.
    pub fn dispatch(&self, line: u16) -> bool {
        // Look up under the critical section, invoke outside it to keep
        // the section short. The handler reference stays valid: it is
        // 'static, and nothing can unregister it while we are still in
        // interrupt context on this core.
        let handler = self.entries.lock(|cell| {
            cell.borrow()
                .iter()
                .find(|e| e.line == line)
                .map(|e| e.handler)
        });

        match handler {
            Some(handler) => {
                let mut cx = IsrContext::new();
                handler.on_interrupt(line, &mut cx);
                cx.preempt_requested()
            }
            None => false,
        }
    }

    /// Number of live bindings.
    pub fn len(&self) -> usize {
        self.entries.lock(|cell| cell.borrow().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<M: RawMutex, const N: usize> Default for Registry<M, N> {
    fn default() -> Self {
        Self::new()
    }
}
