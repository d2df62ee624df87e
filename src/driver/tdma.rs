//! TDMA timeslot gating for the scheduler.
//!
//! Given a time-of-day feed and a four-parameter plan (`start`,
//! `schedule_period`, `timeslot_period`, `active_period`), the gate derives
//! the current timeslot index, start/end pulses, and an active level that
//! is high only during the leading `active_period` of each slot; the tail
//! forms a guard interval. The gate observes queue state, it never mutates
//! it: it couples to the scheduler either through the global gate level
//! ([`crate::Scheduler::set_gate`]) or through per-queue timeslot masks
//! ([`TdmaControl`]) feeding the out-of-band control stream.
//!
//! Time is carried as PTP-style timestamps (48-bit seconds, nanoseconds,
//! 16-bit fractional nanoseconds). The time source may step; steps are
//! reported through the `step` flag (or detected as a jump wider than one
//! timeslot) and drop the lock, deasserting the gate until realignment.

use super::error::{TdmaError, TdmaResult};
use super::event::QueueCtrl;
use super::scheduler::Scheduler;
use crate::internal::constants::{FNS_PER_NS, MAX_MASKED_TIMESLOTS, MAX_TIMESLOTS, NS_PER_S};
use crate::internal::regmap::{
    TDMA_ACTIVE_PERIOD_OFFSET, TDMA_CTRL_ENABLE, TDMA_CTRL_ERROR, TDMA_CTRL_LOCKED,
    TDMA_CTRL_OFFSET, TDMA_CTRL_SLOT_COUNT_SHIFT, TDMA_PERIOD_FNS_OFFSET, TDMA_PERIOD_NS_OFFSET,
    TDMA_RB_TYPE, TDMA_RB_VERSION, TDMA_START_FNS_OFFSET, TDMA_START_NS_OFFSET,
    TDMA_START_SEC_H_OFFSET, TDMA_START_SEC_L_OFFSET, TDMA_TS_PERIOD_OFFSET,
};

// =============================================================================
// Timestamp
// =============================================================================

/// PTP-style time-of-day value: seconds, nanoseconds, fractional ns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timestamp {
    /// Seconds (48 bits used)
    pub sec: u64,
    /// Nanoseconds within the second
    pub ns: u32,
    /// Fractional nanoseconds (1/65536 ns units)
    pub fns: u16,
}

impl Timestamp {
    /// The zero timestamp.
    pub const ZERO: Self = Self {
        sec: 0,
        ns: 0,
        fns: 0,
    };

    /// Create a timestamp from its fields.
    #[must_use]
    pub const fn new(sec: u64, ns: u32, fns: u16) -> Self {
        Self { sec, ns, fns }
    }

    /// Create a timestamp from whole nanoseconds.
    #[must_use]
    pub const fn from_ns(ns: u64) -> Self {
        Self {
            sec: ns / NS_PER_S,
            ns: (ns % NS_PER_S) as u32,
            fns: 0,
        }
    }

    /// Total fractional nanoseconds.
    #[must_use]
    pub const fn to_fns(self) -> u128 {
        (self.sec as u128 * NS_PER_S as u128 + self.ns as u128) * FNS_PER_NS as u128
            + self.fns as u128
    }

    /// Rebuild from total fractional nanoseconds.
    #[must_use]
    pub const fn from_fns(total: u128) -> Self {
        let ns_total = total / FNS_PER_NS as u128;
        Self {
            sec: (ns_total / NS_PER_S as u128) as u64,
            ns: (ns_total % NS_PER_S as u128) as u32,
            fns: (total % FNS_PER_NS as u128) as u16,
        }
    }
}

// =============================================================================
// Schedule Parameters
// =============================================================================

/// TDMA plan parameters, as programmed through the register block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TdmaSchedule {
    /// First schedule start; past values are aligned forward
    pub start: Timestamp,
    /// Schedule repetition period
    pub schedule_period: Timestamp,
    /// Timeslot length in nanoseconds
    pub timeslot_period_ns: u32,
    /// Active portion of each timeslot in nanoseconds
    pub active_period_ns: u32,
}

impl TdmaSchedule {
    /// Create an empty plan.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            start: Timestamp::ZERO,
            schedule_period: Timestamp::ZERO,
            timeslot_period_ns: 0,
            active_period_ns: 0,
        }
    }

    /// Set the schedule start
    #[must_use]
    pub const fn with_start(mut self, start: Timestamp) -> Self {
        self.start = start;
        self
    }

    /// Set the schedule period
    #[must_use]
    pub const fn with_schedule_period(mut self, period: Timestamp) -> Self {
        self.schedule_period = period;
        self
    }

    /// Set the timeslot period in nanoseconds
    #[must_use]
    pub const fn with_timeslot_period(mut self, ns: u32) -> Self {
        self.timeslot_period_ns = ns;
        self
    }

    /// Set the active period in nanoseconds
    #[must_use]
    pub const fn with_active_period(mut self, ns: u32) -> Self {
        self.active_period_ns = ns;
        self
    }
}

// =============================================================================
// TDMA Gate
// =============================================================================

/// Timeslot gate driven by an external time-of-day source.
pub struct TdmaGate {
    /// Gate participates in scheduling
    enabled: bool,
    /// Programmed plan
    schedule: TdmaSchedule,
    /// Plan validated and derived values computed
    armed: bool,
    /// Alignment to the time source completed
    locked: bool,
    /// Oversized plan or time-source step
    error: bool,
    /// Slots per schedule
    slot_count: u32,
    /// Derived period values in fractional nanoseconds
    schedule_period_fns: u128,
    slot_period_fns: u128,
    active_period_fns: u128,
    /// Start of the schedule instance containing `last_now`
    schedule_start_fns: u128,
    /// Slot the gate is currently in, `None` before the schedule starts
    current_slot: Option<u32>,
    /// Pulse outputs for the most recent `advance`
    slot_start: bool,
    slot_end: bool,
    /// Active level
    active: bool,
    /// Previous time sample, for discontinuity detection
    last_now: Option<u128>,
    /// Register shadow words, latched into `schedule` on the trigger write
    shadow_start_fns: u32,
    shadow_start_ns: u32,
    shadow_start_sec_l: u32,
    shadow_period_fns: u32,
}

impl TdmaGate {
    /// Create a disarmed gate. Const-compatible.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            enabled: false,
            schedule: TdmaSchedule::new(),
            armed: false,
            locked: false,
            error: false,
            slot_count: 0,
            schedule_period_fns: 0,
            slot_period_fns: 0,
            active_period_fns: 0,
            schedule_start_fns: 0,
            current_slot: None,
            slot_start: false,
            slot_end: false,
            active: false,
            last_now: None,
            shadow_start_fns: 0,
            shadow_start_ns: 0,
            shadow_start_sec_l: 0,
            shadow_period_fns: 0,
        }
    }

    // =========================================================================
    // Outputs
    // =========================================================================

    /// Current timeslot index (0 before the first slot boundary is seen).
    #[inline(always)]
    pub fn timeslot_index(&self) -> u32 {
        self.current_slot.unwrap_or(0)
    }

    /// Active level: high during the leading active period of each slot.
    #[inline(always)]
    pub fn timeslot_active(&self) -> bool {
        self.active
    }

    /// A slot boundary was crossed by the most recent `advance`.
    #[inline(always)]
    pub fn timeslot_start(&self) -> bool {
        self.slot_start
    }

    /// The previous slot ended during the most recent `advance`.
    #[inline(always)]
    pub fn timeslot_end(&self) -> bool {
        self.slot_end
    }

    /// Alignment to the time source has completed.
    #[inline(always)]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Plan refused to arm or the time source stepped.
    #[inline(always)]
    pub fn has_error(&self) -> bool {
        self.error
    }

    /// Slots per schedule.
    #[inline(always)]
    pub fn timeslot_count(&self) -> u32 {
        self.slot_count
    }

    /// Gate enable.
    #[inline(always)]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Programmed plan.
    #[inline(always)]
    pub fn schedule(&self) -> &TdmaSchedule {
        &self.schedule
    }

    // =========================================================================
    // Control
    // =========================================================================

    /// Validate a plan and derive the slot layout.
    ///
    /// A timeslot period longer than the schedule period is clamped to it;
    /// an active period longer than the timeslot period is clamped to it
    /// (the longer value loses). The slot count rounds up, so the final
    /// slot is truncated by the schedule boundary rather than a sliver
    /// slot being appended after it.
    ///
    /// # Errors
    /// - `InvalidPeriod` - schedule or timeslot period is zero
    /// - `TooManyTimeslots` - the plan needs more slots than the status
    ///   register can report; the gate refuses to arm and sets `error`
    pub fn arm(&mut self, schedule: TdmaSchedule) -> TdmaResult<()> {
        self.armed = false;
        self.locked = false;
        self.active = false;
        self.current_slot = None;
        self.last_now = None;

        let schedule_period_fns = schedule.schedule_period.to_fns();
        if schedule_period_fns == 0 || schedule.timeslot_period_ns == 0 {
            self.error = true;
            return Err(TdmaError::InvalidPeriod);
        }

        let mut slot_period_fns = schedule.timeslot_period_ns as u128 * FNS_PER_NS as u128;
        if slot_period_fns > schedule_period_fns {
            slot_period_fns = schedule_period_fns;
        }
        let mut active_period_fns = schedule.active_period_ns as u128 * FNS_PER_NS as u128;
        if active_period_fns > slot_period_fns {
            active_period_fns = slot_period_fns;
        }

        let slot_count = schedule_period_fns.div_ceil(slot_period_fns);
        if slot_count > MAX_TIMESLOTS as u128 {
            self.error = true;
            return Err(TdmaError::TooManyTimeslots);
        }

        self.schedule = schedule;
        self.schedule_period_fns = schedule_period_fns;
        self.slot_period_fns = slot_period_fns;
        self.active_period_fns = active_period_fns;
        self.slot_count = slot_count as u32;
        self.armed = true;
        self.error = false;

        #[cfg(feature = "defmt")]
        defmt::info!("tdma armed: {} slots", self.slot_count);
        Ok(())
    }

    /// Set the gate enable. A disabled gate holds its outputs low.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.active = false;
            self.slot_start = false;
            self.slot_end = false;
        }
    }

    /// Feed a time sample and update the outputs.
    ///
    /// `step` reports a deliberate step of the time source; jumps wider
    /// than one timeslot are detected as steps too. Either drops the lock
    /// and deasserts the gate; the next sample realigns, never silently
    /// mid-schedule.
    pub fn advance(&mut self, now: Timestamp, step: bool) {
        self.slot_start = false;
        self.slot_end = false;
        if !self.enabled || !self.armed {
            self.active = false;
            return;
        }

        let now_fns = now.to_fns();
        if self.locked {
            let jumped = match self.last_now {
                Some(last) => now_fns.abs_diff(last) > self.slot_period_fns,
                None => false,
            };
            if step || jumped {
                // Deassert now; the next sample realigns. Never silently
                // re-align mid-schedule.
                self.locked = false;
                self.error = true;
                self.active = false;
                self.current_slot = None;
                self.last_now = Some(now_fns);

                #[cfg(feature = "defmt")]
                defmt::warn!("tdma time source step, gate deasserted");
                #[cfg(feature = "log")]
                log::warn!("tdma time source step, gate deasserted");
                return;
            }
        }
        self.last_now = Some(now_fns);

        if !self.locked {
            self.align(now_fns);
            self.locked = true;
            self.error = false;
        }

        if now_fns < self.schedule_start_fns {
            self.active = false;
            return;
        }

        let mut offset = now_fns - self.schedule_start_fns;
        while offset >= self.schedule_period_fns {
            self.schedule_start_fns += self.schedule_period_fns;
            offset -= self.schedule_period_fns;
        }

        // Each boundary is computed from the schedule start, never from the
        // previous slot, so rounding error cannot accumulate.
        let index = ((offset / self.slot_period_fns) as u32).min(self.slot_count - 1);
        if self.current_slot != Some(index) {
            self.slot_end = self.current_slot.is_some();
            self.slot_start = true;
            self.current_slot = Some(index);
        }

        let in_slot = offset - index as u128 * self.slot_period_fns;
        self.active = in_slot < self.active_period_fns;
    }

    /// Align the schedule to the time source.
    ///
    /// A future start is taken as-is. A past start keeps its phase and is
    /// moved forward into the schedule instance containing `now`, so no
    /// slots are lost.
    fn align(&mut self, now_fns: u128) {
        let start = self.schedule.start.to_fns();
        let period = self.schedule_period_fns;
        self.schedule_start_fns = if start > now_fns {
            start
        } else {
            let aligned = now_fns - (now_fns % period) + (start % period);
            if aligned > now_fns {
                aligned - period
            } else {
                aligned
            }
        };
        self.current_slot = None;
    }

    // =========================================================================
    // Register Block
    // =========================================================================

    /// Read a TDMA block register.
    pub fn ctrl_read(&self, offset: u32) -> u32 {
        match offset {
            0x00 => TDMA_RB_TYPE,
            0x04 => TDMA_RB_VERSION,
            TDMA_CTRL_OFFSET => {
                let mut word = 0;
                if self.enabled {
                    word |= TDMA_CTRL_ENABLE;
                }
                if self.locked {
                    word |= TDMA_CTRL_LOCKED;
                }
                if self.error {
                    word |= TDMA_CTRL_ERROR;
                }
                word | (self.slot_count << TDMA_CTRL_SLOT_COUNT_SHIFT)
            }
            TDMA_START_FNS_OFFSET => self.shadow_start_fns,
            TDMA_START_NS_OFFSET => self.shadow_start_ns,
            TDMA_START_SEC_L_OFFSET => self.schedule.start.sec as u32,
            TDMA_START_SEC_H_OFFSET => (self.schedule.start.sec >> 32) as u32,
            TDMA_PERIOD_FNS_OFFSET => self.shadow_period_fns,
            TDMA_PERIOD_NS_OFFSET => self.schedule.schedule_period.ns,
            TDMA_TS_PERIOD_OFFSET => self.schedule.timeslot_period_ns,
            TDMA_ACTIVE_PERIOD_OFFSET => self.schedule.active_period_ns,
            _ => 0,
        }
    }

    /// Write a TDMA block register.
    ///
    /// The schedule start latches on the seconds-high write and the
    /// schedule period on the nanoseconds write; the other period words
    /// apply immediately. Setting the enable bit (re)arms the plan; an
    /// oversized plan refuses to arm and sets the error bit.
    pub fn ctrl_write(&mut self, offset: u32, value: u32) {
        match offset {
            TDMA_CTRL_OFFSET => {
                if value & TDMA_CTRL_ENABLE != 0 {
                    let plan = self.schedule;
                    let _ = self.arm(plan);
                    self.set_enabled(self.armed);
                } else {
                    self.set_enabled(false);
                }
            }
            TDMA_START_FNS_OFFSET => self.shadow_start_fns = value,
            TDMA_START_NS_OFFSET => self.shadow_start_ns = value,
            TDMA_START_SEC_L_OFFSET => self.shadow_start_sec_l = value,
            TDMA_START_SEC_H_OFFSET => {
                self.schedule.start = Timestamp {
                    sec: (u64::from(value) << 32) | u64::from(self.shadow_start_sec_l),
                    ns: self.shadow_start_ns,
                    fns: self.shadow_start_fns as u16,
                };
            }
            TDMA_PERIOD_FNS_OFFSET => self.shadow_period_fns = value,
            TDMA_PERIOD_NS_OFFSET => {
                self.schedule.schedule_period = Timestamp {
                    sec: 0,
                    ns: value,
                    fns: self.shadow_period_fns as u16,
                };
            }
            TDMA_TS_PERIOD_OFFSET => self.schedule.timeslot_period_ns = value,
            TDMA_ACTIVE_PERIOD_OFFSET => self.schedule.active_period_ns = value,
            _ => {}
        }
    }
}

impl Default for TdmaGate {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Per-Queue Timeslot Control
// =============================================================================

/// Drives the scheduler's out-of-band control stream from the gate's
/// timeslot index, one enable bit per (queue, timeslot).
///
/// Queues keep their default all-ones mask unless one is programmed, and
/// untouched queues never receive control events. On a slot change (or a
/// lock loss, which pauses every managed queue) the changed enables are
/// pushed into the control stream; `sync` resumes where backpressure
/// stopped it, so a slot change over many queues drains across calls.
pub struct TdmaControl<const QUEUES: usize> {
    /// Per-queue timeslot masks, bit i = enabled in slot i
    masks: [u64; QUEUES],
    /// Slot the scheduler currently reflects
    applied_slot: Option<u32>,
    /// Slot the gate currently reports
    pending_slot: Option<u32>,
    /// Resume point for a partially pushed update
    cursor: usize,
}

impl<const QUEUES: usize> TdmaControl<QUEUES> {
    /// Create a controller with every queue enabled in every slot.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            masks: [u64::MAX; QUEUES],
            applied_slot: None,
            pending_slot: None,
            cursor: 0,
        }
    }

    /// Program the timeslot mask for a queue. Bit i enables the queue
    /// during timeslot i; masks cover the first 64 slots.
    pub fn set_queue_timeslots(&mut self, queue: u16, mask: u64) {
        if let Some(slot) = self.masks.get_mut(queue as usize) {
            *slot = mask;
        }
    }

    /// Get the timeslot mask for a queue.
    pub fn queue_timeslots(&self, queue: u16) -> u64 {
        self.masks.get(queue as usize).copied().unwrap_or(u64::MAX)
    }

    /// Sample the gate.
    ///
    /// # Errors
    /// - `MaskTooNarrow` - the armed plan has more slots than a mask can
    ///   describe; every managed queue is paused until re-armed
    pub fn observe(&mut self, gate: &TdmaGate) -> TdmaResult<()> {
        if gate.is_enabled() && gate.is_locked() {
            if gate.timeslot_count() > MAX_MASKED_TIMESLOTS {
                self.set_pending(None);
                return Err(TdmaError::MaskTooNarrow);
            }
            self.set_pending(Some(gate.timeslot_index()));
        } else {
            // Gate down: pause managed queues until re-lock.
            self.set_pending(None);
        }
        Ok(())
    }

    fn set_pending(&mut self, slot: Option<u32>) {
        if self.pending_slot != slot {
            self.pending_slot = slot;
            self.cursor = 0;
        }
    }

    /// Push the control events implied by the last `observe` into the
    /// scheduler, as far as the control stream allows. Returns `true` when
    /// the scheduler fully reflects the pending slot.
    pub fn sync<const C: usize, const S: usize>(
        &mut self,
        sched: &mut Scheduler<QUEUES, C, S>,
    ) -> bool {
        if self.applied_slot == self.pending_slot {
            return true;
        }
        while self.cursor < QUEUES {
            let queue = self.cursor as u16;
            let mask = self.masks[self.cursor];
            if mask != u64::MAX {
                let desired = Self::slot_bit(mask, self.pending_slot);
                let previous = Self::slot_bit(mask, self.applied_slot);
                let first_sync = self.applied_slot.is_none() && self.pending_slot.is_some();
                if desired != previous || first_sync {
                    let pushed = sched.queue_control(QueueCtrl {
                        queue,
                        enable: desired,
                    });
                    if pushed.is_err() {
                        // Control stream full: resume from here next call.
                        return false;
                    }
                }
            }
            self.cursor += 1;
        }
        self.applied_slot = self.pending_slot;
        self.cursor = 0;
        true
    }

    fn slot_bit(mask: u64, slot: Option<u32>) -> bool {
        match slot {
            Some(s) if s < 64 => mask & (1u64 << s) != 0,
            _ => false,
        }
    }
}

impl<const QUEUES: usize> Default for TdmaControl<QUEUES> {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn ten_slot_gate() -> TdmaGate {
        let mut gate = TdmaGate::new();
        gate.arm(
            TdmaSchedule::new()
                .with_start(Timestamp::ZERO)
                .with_schedule_period(Timestamp::from_ns(1_000_000))
                .with_timeslot_period(100_000)
                .with_active_period(90_000),
        )
        .unwrap();
        gate.set_enabled(true);
        gate
    }

    #[test]
    fn timestamp_round_trips_through_fns() {
        let ts = Timestamp::new(12, 345_678_901, 777);
        assert_eq!(Timestamp::from_fns(ts.to_fns()), ts);
        assert_eq!(Timestamp::from_ns(1_500_000_000), Timestamp::new(1, 500_000_000, 0));
    }

    #[test]
    fn timestamp_ordering_matches_value() {
        let a = Timestamp::new(1, 999_999_999, 0);
        let b = Timestamp::new(2, 0, 0);
        assert!(a < b);
        assert!(a.to_fns() < b.to_fns());
    }

    #[test]
    fn ten_slot_schedule_gates_each_slot() {
        let mut gate = ten_slot_gate();

        // Sweep two full schedules in 5 us steps and check index and level
        // against the closed form.
        for t in (0..2_000_000u64).step_by(5_000) {
            gate.advance(Timestamp::from_ns(t), false);
            let in_schedule = t % 1_000_000;
            assert_eq!(
                gate.timeslot_index(),
                (in_schedule / 100_000) as u32,
                "index at t={t}"
            );
            assert_eq!(
                gate.timeslot_active(),
                in_schedule % 100_000 < 90_000,
                "level at t={t}"
            );
        }
        assert!(gate.is_locked());
        assert!(!gate.has_error());
        assert_eq!(gate.timeslot_count(), 10);
    }

    #[test]
    fn index_steps_exactly_on_slot_boundaries() {
        let mut gate = ten_slot_gate();
        gate.advance(Timestamp::from_ns(50_000), false);
        gate.advance(Timestamp::from_ns(99_999), false);
        assert_eq!(gate.timeslot_index(), 0);
        assert!(!gate.timeslot_start());

        gate.advance(Timestamp::from_ns(100_000), false);
        assert_eq!(gate.timeslot_index(), 1);
        assert!(gate.timeslot_start());
        assert!(gate.timeslot_end());

        gate.advance(Timestamp::from_ns(100_001), false);
        assert!(!gate.timeslot_start());
        assert!(!gate.timeslot_end());
    }

    #[test]
    fn guard_interval_is_inactive() {
        let mut gate = ten_slot_gate();
        gate.advance(Timestamp::from_ns(89_999), false);
        assert!(gate.timeslot_active());
        gate.advance(Timestamp::from_ns(90_000), false);
        assert!(!gate.timeslot_active());
        gate.advance(Timestamp::from_ns(99_999), false);
        assert!(!gate.timeslot_active());
    }

    #[test]
    fn future_start_keeps_gate_low_until_start() {
        let mut gate = TdmaGate::new();
        gate.arm(
            TdmaSchedule::new()
                .with_start(Timestamp::from_ns(500_000))
                .with_schedule_period(Timestamp::from_ns(1_000_000))
                .with_timeslot_period(100_000)
                .with_active_period(100_000),
        )
        .unwrap();
        gate.set_enabled(true);

        gate.advance(Timestamp::from_ns(400_000), false);
        assert!(!gate.timeslot_active());
        assert!(gate.is_locked());

        gate.advance(Timestamp::from_ns(500_000), false);
        assert!(gate.timeslot_active());
        assert_eq!(gate.timeslot_index(), 0);
    }

    #[test]
    fn past_start_aligns_forward_preserving_phase() {
        let mut gate = TdmaGate::new();
        gate.arm(
            TdmaSchedule::new()
                .with_start(Timestamp::from_ns(50_000))
                .with_schedule_period(Timestamp::from_ns(1_000_000))
                .with_timeslot_period(100_000)
                .with_active_period(100_000),
        )
        .unwrap();
        gate.set_enabled(true);

        // At t = 10.25 ms the schedule instance began at 10.05 ms; the
        // offset is 200 us, i.e. slot 2.
        gate.advance(Timestamp::from_ns(10_250_000), false);
        assert!(gate.is_locked());
        assert_eq!(gate.timeslot_index(), 2);
        assert!(gate.timeslot_active());
    }

    #[test]
    fn longer_timeslot_than_schedule_is_clamped() {
        let mut gate = TdmaGate::new();
        gate.arm(
            TdmaSchedule::new()
                .with_schedule_period(Timestamp::from_ns(100_000))
                .with_timeslot_period(500_000)
                .with_active_period(1_000_000),
        )
        .unwrap();
        gate.set_enabled(true);

        assert_eq!(gate.timeslot_count(), 1);
        gate.advance(Timestamp::from_ns(50_000), false);
        assert_eq!(gate.timeslot_index(), 0);
        // Active period clamps to the slot: always active.
        assert!(gate.timeslot_active());
    }

    #[test]
    fn uneven_schedule_truncates_final_slot() {
        let mut gate = TdmaGate::new();
        gate.arm(
            TdmaSchedule::new()
                .with_schedule_period(Timestamp::from_ns(1_050_000))
                .with_timeslot_period(100_000)
                .with_active_period(100_000),
        )
        .unwrap();
        gate.set_enabled(true);
        assert_eq!(gate.timeslot_count(), 11);

        gate.advance(Timestamp::from_ns(1_049_000), false);
        assert_eq!(gate.timeslot_index(), 10);

        // The truncated slot ends at the schedule boundary.
        gate.advance(Timestamp::from_ns(1_050_000), false);
        assert_eq!(gate.timeslot_index(), 0);
        assert!(gate.timeslot_start());
    }

    #[test]
    fn zero_period_refuses_to_arm() {
        let mut gate = TdmaGate::new();
        assert_eq!(
            gate.arm(TdmaSchedule::new()),
            Err(TdmaError::InvalidPeriod)
        );
        assert!(gate.has_error());
        gate.set_enabled(true);
        gate.advance(Timestamp::from_ns(1_000), false);
        assert!(!gate.timeslot_active());
    }

    #[test]
    fn oversized_plan_refuses_to_arm() {
        let mut gate = TdmaGate::new();
        let result = gate.arm(
            TdmaSchedule::new()
                .with_schedule_period(Timestamp::from_ns(1_000_000_000))
                .with_timeslot_period(1_000)
                .with_active_period(1_000),
        );
        assert_eq!(result, Err(TdmaError::TooManyTimeslots));
        assert!(gate.has_error());
        assert!(!gate.is_locked());
    }

    #[test]
    fn step_drops_lock_and_relocks() {
        let mut gate = ten_slot_gate();
        gate.advance(Timestamp::from_ns(10_000), false);
        assert!(gate.is_locked());
        assert!(gate.timeslot_active());

        // Explicit step signal.
        gate.advance(Timestamp::from_ns(20_000), true);
        assert!(!gate.timeslot_active());
        assert!(gate.has_error());

        // Next sample realigns.
        gate.advance(Timestamp::from_ns(25_000), false);
        assert!(gate.is_locked());
        assert!(!gate.has_error());
        assert!(gate.timeslot_active());
    }

    #[test]
    fn wide_jump_detected_as_step() {
        let mut gate = ten_slot_gate();
        gate.advance(Timestamp::from_ns(10_000), false);
        gate.advance(Timestamp::from_ns(15_000), false);
        assert!(gate.is_locked());

        // A jump of more than one timeslot period.
        gate.advance(Timestamp::from_ns(500_000), false);
        assert!(gate.has_error());
        assert!(!gate.timeslot_active());

        gate.advance(Timestamp::from_ns(505_000), false);
        assert!(gate.is_locked());
        assert!(!gate.has_error());
    }

    #[test]
    fn disabled_gate_holds_outputs_low() {
        let mut gate = ten_slot_gate();
        gate.advance(Timestamp::from_ns(10_000), false);
        assert!(gate.timeslot_active());

        gate.set_enabled(false);
        assert!(!gate.timeslot_active());
        gate.advance(Timestamp::from_ns(20_000), false);
        assert!(!gate.timeslot_active());
    }

    // =========================================================================
    // Register Block
    // =========================================================================

    #[test]
    fn register_block_programs_and_arms_plan() {
        let mut gate = TdmaGate::new();
        gate.ctrl_write(TDMA_START_FNS_OFFSET, 0);
        gate.ctrl_write(TDMA_START_NS_OFFSET, 0);
        gate.ctrl_write(TDMA_START_SEC_L_OFFSET, 0);
        gate.ctrl_write(TDMA_START_SEC_H_OFFSET, 0);
        gate.ctrl_write(TDMA_PERIOD_FNS_OFFSET, 0);
        gate.ctrl_write(TDMA_PERIOD_NS_OFFSET, 1_000_000);
        gate.ctrl_write(TDMA_TS_PERIOD_OFFSET, 100_000);
        gate.ctrl_write(TDMA_ACTIVE_PERIOD_OFFSET, 90_000);
        gate.ctrl_write(TDMA_CTRL_OFFSET, TDMA_CTRL_ENABLE);

        let status = gate.ctrl_read(TDMA_CTRL_OFFSET);
        assert!(status & TDMA_CTRL_ENABLE != 0);
        assert_eq!(status >> TDMA_CTRL_SLOT_COUNT_SHIFT, 10);

        gate.advance(Timestamp::from_ns(10_000), false);
        assert!(gate.ctrl_read(TDMA_CTRL_OFFSET) & TDMA_CTRL_LOCKED != 0);
        assert!(gate.timeslot_active());
    }

    #[test]
    fn start_is_latched_on_sec_high_write() {
        let mut gate = TdmaGate::new();
        gate.ctrl_write(TDMA_START_NS_OFFSET, 777);
        // Not latched yet.
        assert_eq!(gate.schedule().start, Timestamp::ZERO);
        gate.ctrl_write(TDMA_START_SEC_L_OFFSET, 5);
        gate.ctrl_write(TDMA_START_SEC_H_OFFSET, 0);
        assert_eq!(gate.schedule().start, Timestamp::new(5, 777, 0));
    }

    #[test]
    fn oversized_plan_sets_error_bit_via_registers() {
        let mut gate = TdmaGate::new();
        gate.ctrl_write(TDMA_PERIOD_NS_OFFSET, 1_000_000_000);
        gate.ctrl_write(TDMA_TS_PERIOD_OFFSET, 1_000);
        gate.ctrl_write(TDMA_CTRL_OFFSET, TDMA_CTRL_ENABLE);

        let status = gate.ctrl_read(TDMA_CTRL_OFFSET);
        assert!(status & TDMA_CTRL_ERROR != 0);
        assert!(status & TDMA_CTRL_ENABLE == 0);
    }

    #[test]
    fn register_block_reports_type_and_version() {
        let gate = TdmaGate::new();
        assert_eq!(gate.ctrl_read(0x00), TDMA_RB_TYPE);
        assert_eq!(gate.ctrl_read(0x04), TDMA_RB_VERSION);
    }

    // =========================================================================
    // Per-Queue Control
    // =========================================================================

    #[test]
    fn control_pushes_enables_on_slot_change() {
        use crate::driver::config::SchedConfig;

        let mut sched: Scheduler<16, 1, 8> = Scheduler::new();
        sched.init(SchedConfig::new()).unwrap();
        sched.run_init();
        sched.set_enabled(true);

        let mut gate = ten_slot_gate();
        let mut ctrl: TdmaControl<16> = TdmaControl::new();
        // Queue 2 may only transmit during slot 0.
        ctrl.set_queue_timeslots(2, 0b1);

        sched
            .queue_command(2, crate::QueueCommand::SetEnable(true).encode())
            .unwrap();
        sched.doorbell(2).unwrap();

        // Slot 0: queue runs.
        gate.advance(Timestamp::from_ns(10_000), false);
        ctrl.observe(&gate).unwrap();
        assert!(ctrl.sync(&mut sched));
        let mut got = None;
        for _ in 0..20 {
            sched.tick();
            if let Some(req) = sched.poll_tx_request() {
                got = Some(req);
                break;
            }
        }
        assert!(got.is_some());

        // Slot 1: queue paused; a fresh doorbell must not produce a request.
        gate.advance(Timestamp::from_ns(110_000), false);
        ctrl.observe(&gate).unwrap();
        assert!(ctrl.sync(&mut sched));
        // Let the pause land and discard fetches already in flight.
        for _ in 0..10 {
            sched.tick();
        }
        while sched.poll_tx_request().is_some() {}
        sched.doorbell(2).unwrap();
        for _ in 0..20 {
            sched.tick();
            assert!(sched.poll_tx_request().is_none());
        }

        // Jumping to the next schedule is wider than one slot: the gate
        // treats it as a step and realigns on the following sample.
        gate.advance(Timestamp::from_ns(1_005_000), false);
        gate.advance(Timestamp::from_ns(1_010_000), false);
        assert!(gate.is_locked());
        ctrl.observe(&gate).unwrap();
        assert!(ctrl.sync(&mut sched));
        let mut got = None;
        for _ in 0..20 {
            sched.tick();
            if let Some(req) = sched.poll_tx_request() {
                got = Some(req);
                break;
            }
        }
        assert!(got.is_some());
    }

    #[test]
    fn control_pauses_managed_queues_on_lock_loss() {
        let mut gate = ten_slot_gate();
        let mut ctrl: TdmaControl<16> = TdmaControl::new();
        ctrl.set_queue_timeslots(1, 0b1);

        gate.advance(Timestamp::from_ns(10_000), false);
        ctrl.observe(&gate).unwrap();
        // Step: lock lost, pending drops to none.
        gate.advance(Timestamp::from_ns(10_000), true);
        ctrl.observe(&gate).unwrap();
        assert_eq!(ctrl.pending_slot, None);
    }

    #[test]
    fn control_ignores_unmanaged_queues() {
        use crate::driver::config::SchedConfig;

        let mut sched: Scheduler<16, 1, 8> = Scheduler::new();
        sched.init(SchedConfig::new()).unwrap();
        sched.run_init();
        sched.set_enabled(true);

        let mut gate = ten_slot_gate();
        let mut ctrl: TdmaControl<16> = TdmaControl::new();

        gate.advance(Timestamp::from_ns(10_000), false);
        ctrl.observe(&gate).unwrap();
        assert!(ctrl.sync(&mut sched));

        // No masks programmed: no control events, queue state untouched.
        sched
            .queue_command(3, crate::QueueCommand::SetEnable(true).encode())
            .unwrap();
        sched.doorbell(3).unwrap();
        let mut got = false;
        for _ in 0..20 {
            sched.tick();
            if sched.poll_tx_request().is_some() {
                got = true;
                break;
            }
        }
        assert!(got);
    }

    #[test]
    fn oversized_plan_rejects_masked_control() {
        let mut gate = TdmaGate::new();
        gate.arm(
            TdmaSchedule::new()
                .with_schedule_period(Timestamp::from_ns(10_000_000))
                .with_timeslot_period(100_000)
                .with_active_period(100_000),
        )
        .unwrap();
        gate.set_enabled(true);
        gate.advance(Timestamp::from_ns(1_000), false);
        assert_eq!(gate.timeslot_count(), 100);

        let mut ctrl: TdmaControl<4> = TdmaControl::new();
        ctrl.set_queue_timeslots(0, 0b1);
        assert_eq!(ctrl.observe(&gate), Err(TdmaError::MaskTooNarrow));
    }
}
