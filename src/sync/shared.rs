//! ISR-safe scheduler wrapper using critical sections.

use super::primitives::CriticalSectionCell;
use crate::driver::scheduler::Scheduler;

/// ISR-safe scheduler wrapper.
///
/// All access goes through `critical_section::with()`, disabling
/// interrupts for the duration of the closure, so doorbell and status
/// producers in interrupt handlers can share the scheduler with the cycle
/// loop.
///
/// # Example
///
/// ```ignore
/// static SCHED: SharedScheduler<64, 4, 16> = SharedScheduler::new();
///
/// // Interrupt handler:
/// SCHED.with(|s| {
///     s.doorbell(queue).ok();
/// });
///
/// // Main loop:
/// SCHED.with(|s| {
///     s.tick();
///     s.poll_tx_request()
/// });
/// ```
pub struct SharedScheduler<const QUEUES: usize, const CHANNELS: usize, const OP_SLOTS: usize> {
    inner: CriticalSectionCell<Scheduler<QUEUES, CHANNELS, OP_SLOTS>>,
}

impl<const QUEUES: usize, const CHANNELS: usize, const OP_SLOTS: usize>
    SharedScheduler<QUEUES, CHANNELS, OP_SLOTS>
{
    /// Create a new shared scheduler (const, suitable for static
    /// initialization).
    pub const fn new() -> Self {
        Self {
            inner: CriticalSectionCell::new(Scheduler::new()),
        }
    }

    /// Execute a closure with exclusive access to the scheduler.
    ///
    /// Interrupts are disabled for the duration of the closure.
    #[inline]
    pub fn with<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&mut Scheduler<QUEUES, CHANNELS, OP_SLOTS>) -> R,
    {
        self.inner.with(f)
    }

    /// Try to execute a closure, returning `None` if already borrowed.
    #[inline]
    pub fn try_with<R, F>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&mut Scheduler<QUEUES, CHANNELS, OP_SLOTS>) -> R,
    {
        self.inner.try_with(f)
    }
}

impl<const QUEUES: usize, const CHANNELS: usize, const OP_SLOTS: usize> Default
    for SharedScheduler<QUEUES, CHANNELS, OP_SLOTS>
{
    fn default() -> Self {
        Self::new()
    }
}

/// Small shared scheduler configuration.
pub type SharedSchedulerSmall = SharedScheduler<16, 1, 8>;

/// Default shared scheduler configuration.
pub type SharedSchedulerDefault = SharedScheduler<64, 4, 16>;

/// Large shared scheduler configuration.
pub type SharedSchedulerLarge = SharedScheduler<1024, 8, 32>;
