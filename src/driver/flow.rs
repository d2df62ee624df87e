//! Per-channel flow-control accounting.
//!
//! Each channel (one port/traffic-class pair) tracks the packets and bytes
//! it has in flight and derives from them a fetch credit window that gates
//! request admission. Two windows are accounted:
//!
//! 1. **Fetch window**: between request admission and the dequeue/start
//!    report. Packet counts only; lengths are unknown, so the data limit is
//!    estimated with the per-packet data budget.
//! 2. **Transmit window**: between fetch start and the finish report.
//!    Packet counts plus measured lengths in credits.
//!
//! All counters are wrapping monotonic pairs (consumed/released); in-flight
//! quantities are their differences modulo the counter width, so the
//! arithmetic never underflows. A release without a matching consume is a
//! protocol violation by the upstream blocks, not something the accountant
//! defends against.

use super::config::ChannelConfig;
use crate::internal::constants::{DEFAULT_FC_SCALE, FETCH_CREDIT_STEPS};

// =============================================================================
// Channel Accountant
// =============================================================================

/// Flow-control state of one scheduler channel.
pub struct ChannelAccountant {
    /// Limits, budgets, dest hint
    config: ChannelConfig,
    /// Credit size exponent
    fc_scale: u8,
    /// Fetches admitted
    fetch_consumed: u16,
    /// Fetches retired (failed, or promoted to the transmit window)
    fetch_released: u16,
    /// Packets entered into the transmit window
    tx_consumed: u16,
    /// Packets retired from the transmit window
    tx_released: u16,
    /// Credits entered into the transmit window
    credits_consumed: u32,
    /// Credits retired from the transmit window
    credits_released: u32,
    /// Upper edge of the fetch credit window
    fetch_fc_lim: u16,
}

impl ChannelAccountant {
    /// Create an idle accountant with scale-derived defaults.
    /// Const-compatible; `configure` applies the real settings at init.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            config: ChannelConfig::for_scale(DEFAULT_FC_SCALE),
            fc_scale: DEFAULT_FC_SCALE,
            fetch_consumed: 0,
            fetch_released: 0,
            tx_consumed: 0,
            tx_released: 0,
            credits_consumed: 0,
            credits_released: 0,
            fetch_fc_lim: 0,
        }
    }

    /// Apply a configuration and clear all counters.
    pub fn configure(&mut self, config: ChannelConfig, fc_scale: u8) {
        self.config = config;
        self.fc_scale = fc_scale;
        self.reset();
    }

    /// Clear the in-flight counters and the credit window.
    pub fn reset(&mut self) {
        self.fetch_consumed = 0;
        self.fetch_released = 0;
        self.tx_consumed = 0;
        self.tx_released = 0;
        self.credits_consumed = 0;
        self.credits_released = 0;
        self.fetch_fc_lim = 0;
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Current configuration.
    #[inline(always)]
    pub fn config(&self) -> &ChannelConfig {
        &self.config
    }

    /// Mutable configuration access, for register writes.
    ///
    /// Takes effect at the next credit refresh; in-flight accounting is
    /// unaffected.
    #[inline(always)]
    pub fn config_mut(&mut self) -> &mut ChannelConfig {
        &mut self.config
    }

    /// Packets in the fetch window.
    #[inline(always)]
    #[must_use]
    pub fn pkts_in_fetch(&self) -> u16 {
        self.fetch_consumed.wrapping_sub(self.fetch_released)
    }

    /// Packets in the transmit window.
    #[inline(always)]
    #[must_use]
    pub fn pkts_in_tx(&self) -> u16 {
        self.tx_consumed.wrapping_sub(self.tx_released)
    }

    /// Credits in the transmit window.
    #[inline(always)]
    #[must_use]
    pub fn credits_in_tx(&self) -> u32 {
        self.credits_consumed.wrapping_sub(self.credits_released)
    }

    /// Channel has packets anywhere in flight.
    #[inline(always)]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.pkts_in_fetch() != 0 || self.pkts_in_tx() != 0
    }

    /// Channel has packets in the fetch window.
    #[inline(always)]
    #[must_use]
    pub fn fetch_active(&self) -> bool {
        self.pkts_in_fetch() != 0
    }

    /// Fetch credit is available (refresh has granted headroom).
    #[inline(always)]
    #[must_use]
    pub fn fetch_available(&self) -> bool {
        self.config.enabled && self.fetch_fc_lim.wrapping_sub(self.fetch_consumed) != 0
    }

    /// Convert a byte length to credits, rounding up.
    #[inline(always)]
    #[must_use]
    pub fn credits(&self, len: u32) -> u32 {
        len.div_ceil(1u32 << self.fc_scale)
    }

    // =========================================================================
    // Credit Generation
    // =========================================================================

    /// Refresh the fetch credit window.
    ///
    /// Grants the largest step k of {8, 4, 2, 1} such that k more fetches
    /// keep the channel within both the packet limit and the data limit,
    /// the latter estimated as `pkts_in_fetch * data_budget` plus the
    /// measured transmit-window credits. Called once per cycle.
    pub fn refresh(&mut self) {
        let in_fetch = u32::from(self.pkts_in_fetch());
        let in_tx = u32::from(self.pkts_in_tx());
        let credits_in_tx = u64::from(self.credits_in_tx());
        let budget = u64::from(self.config.data_budget);

        let mut grant = 0u16;
        for k in FETCH_CREDIT_STEPS {
            let pkts_ok = in_fetch + in_tx + u32::from(k) <= u32::from(self.config.pkt_limit);
            let data_ok = (u64::from(in_fetch) + u64::from(k)) * budget + credits_in_tx
                <= u64::from(self.config.data_limit);
            if pkts_ok && data_ok {
                grant = k;
                break;
            }
        }
        self.fetch_fc_lim = self.fetch_consumed.wrapping_add(grant);
    }

    // =========================================================================
    // Update Events
    // =========================================================================

    /// Account an admitted request into the fetch window.
    pub fn fetch_consume(&mut self) {
        self.fetch_consumed = self.fetch_consumed.wrapping_add(1);
    }

    /// Retire a fetch that produced no bytes on the wire (scheduling
    /// failure, empty dequeue, or fetch error).
    pub fn fetch_release(&mut self) {
        self.fetch_released = self.fetch_released.wrapping_add(1);
    }

    /// Promote a successfully started fetch into the transmit window,
    /// recording its measured length.
    ///
    /// Exactly one fetch credit is returned per start event.
    pub fn tx_consume(&mut self, len: u32) {
        self.fetch_released = self.fetch_released.wrapping_add(1);
        self.tx_consumed = self.tx_consumed.wrapping_add(1);
        self.credits_consumed = self.credits_consumed.wrapping_add(self.credits(len));
    }

    /// Retire a finished packet from the transmit window.
    pub fn tx_release(&mut self, len: u32) {
        self.tx_released = self.tx_released.wrapping_add(1);
        self.credits_released = self.credits_released.wrapping_add(self.credits(len));
    }
}

impl Default for ChannelAccountant {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
