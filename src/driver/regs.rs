//! Control register block for the scheduler.
//!
//! This is the device side of the register surface: a 32-bit little-endian
//! word view over the scheduler's configuration and status, with the block
//! header at offset 0, channel register groups from `SCHED_CH_BASE`, and
//! the per-queue command region at `SCHED_QUEUE_REGION_BASE` (one word per
//! queue, strided by the queue stride register).
//!
//! Writes to read-only registers are acknowledged and ignored; reads of
//! unmapped offsets return zero. Queue-region accesses travel through the
//! scheduler's pipeline and therefore cost cycles, like any real register
//! access does over a bus.

use super::error::EventResult;
use super::scheduler::Scheduler;
use crate::internal::regmap::{
    CH_CTRL_ACTIVE, CH_CTRL_ENABLE, CH_CTRL_FC_AVAILABLE, CH_CTRL_FETCH_ACTIVE, CH_CTRL_OFFSET,
    CH_CTRL_PRIMED, CH_DATA_LIMIT_OFFSET, CH_DEST_BUDGET_OFFSET, CH_LIMIT_OFFSET, SCHED_CH_BASE,
    SCHED_CH_STRIDE, SCHED_CONFIG_FC_SCALE_SHIFT, SCHED_CONFIG_OFFSET, SCHED_CONFIG_PORT_SHIFT,
    SCHED_CONFIG_TC_SHIFT, SCHED_CTRL_ACTIVE, SCHED_CTRL_ENABLE, SCHED_CTRL_OFFSET,
    SCHED_NEXT_OFFSET, SCHED_QUEUE_BASE_OFFSET, SCHED_QUEUE_COUNT_OFFSET, SCHED_QUEUE_REGION_BASE,
    SCHED_QUEUE_STRIDE, SCHED_QUEUE_STRIDE_OFFSET, SCHED_RB_TYPE, SCHED_RB_VERSION,
    SCHED_TYPE_OFFSET, SCHED_VERSION_OFFSET,
};

// =============================================================================
// Register File
// =============================================================================

/// Word-addressed view over a scheduler.
///
/// # Example
/// ```ignore
/// let mut regs = RegisterFile::new(&mut sched);
/// regs.write(0x18, 1)?;                    // global enable
/// let status = regs.read(0x1000 + 3 * 4);  // queue 3 packed status
/// ```
pub struct RegisterFile<'a, const QUEUES: usize, const CHANNELS: usize, const OP_SLOTS: usize> {
    sched: &'a mut Scheduler<QUEUES, CHANNELS, OP_SLOTS>,
}

impl<'a, const QUEUES: usize, const CHANNELS: usize, const OP_SLOTS: usize>
    RegisterFile<'a, QUEUES, CHANNELS, OP_SLOTS>
{
    /// Create a register view over a scheduler.
    pub fn new(sched: &'a mut Scheduler<QUEUES, CHANNELS, OP_SLOTS>) -> Self {
        Self { sched }
    }

    /// Decompose an offset into (channel, register-within-group).
    fn channel_reg(offset: u32) -> Option<(usize, u32)> {
        let end = SCHED_CH_BASE + CHANNELS as u32 * SCHED_CH_STRIDE;
        if (SCHED_CH_BASE..end).contains(&offset) {
            let rel = offset - SCHED_CH_BASE;
            Some(((rel / SCHED_CH_STRIDE) as usize, rel % SCHED_CH_STRIDE))
        } else {
            None
        }
    }

    /// Decompose an offset into a queue index.
    fn queue_reg(offset: u32) -> Option<u16> {
        let end = SCHED_QUEUE_REGION_BASE + QUEUES as u32 * SCHED_QUEUE_STRIDE;
        if (SCHED_QUEUE_REGION_BASE..end).contains(&offset) {
            Some(((offset - SCHED_QUEUE_REGION_BASE) / SCHED_QUEUE_STRIDE) as u16)
        } else {
            None
        }
    }

    /// Read a register. Unmapped offsets read as zero.
    pub fn read(&mut self, offset: u32) -> u32 {
        if let Some(queue) = Self::queue_reg(offset) {
            return self.sched.queue_status(queue).unwrap_or(0);
        }
        if let Some((channel, reg)) = Self::channel_reg(offset) {
            return self.read_channel(channel, reg);
        }
        match offset {
            SCHED_TYPE_OFFSET => SCHED_RB_TYPE,
            SCHED_VERSION_OFFSET => SCHED_RB_VERSION,
            SCHED_NEXT_OFFSET => 0,
            SCHED_QUEUE_BASE_OFFSET => SCHED_QUEUE_REGION_BASE,
            SCHED_QUEUE_COUNT_OFFSET => QUEUES as u32,
            SCHED_QUEUE_STRIDE_OFFSET => SCHED_QUEUE_STRIDE,
            SCHED_CTRL_OFFSET => {
                let mut word = 0;
                if self.sched.is_enabled() {
                    word |= SCHED_CTRL_ENABLE;
                }
                if self.sched.is_active() {
                    word |= SCHED_CTRL_ACTIVE;
                }
                word
            }
            SCHED_CONFIG_OFFSET => {
                let config = self.sched.config();
                (u32::from(config.tc_count) << SCHED_CONFIG_TC_SHIFT)
                    | (u32::from(config.port_count) << SCHED_CONFIG_PORT_SHIFT)
                    | (u32::from(config.fc_scale) << SCHED_CONFIG_FC_SCALE_SHIFT)
            }
            _ => 0,
        }
    }

    /// Write a register. Read-only and unmapped offsets are acknowledged
    /// and ignored.
    ///
    /// # Errors
    /// - `Backpressure` - a queue-region write found the command FIFO full
    pub fn write(&mut self, offset: u32, value: u32) -> EventResult<()> {
        if let Some(queue) = Self::queue_reg(offset) {
            return self.sched.queue_command(queue, value);
        }
        if let Some((channel, reg)) = Self::channel_reg(offset) {
            self.write_channel(channel, reg, value);
            return Ok(());
        }
        if offset == SCHED_CTRL_OFFSET {
            self.sched.set_enabled(value & SCHED_CTRL_ENABLE != 0);
        }
        Ok(())
    }

    fn read_channel(&self, channel: usize, reg: u32) -> u32 {
        let Some(acct) = self.sched.channel(channel) else {
            return 0;
        };
        match reg {
            CH_CTRL_OFFSET => {
                let mut word = 0;
                if acct.config().enabled {
                    word |= CH_CTRL_ENABLE;
                }
                if acct.is_active() {
                    word |= CH_CTRL_ACTIVE;
                }
                if acct.fetch_active() {
                    word |= CH_CTRL_FETCH_ACTIVE;
                }
                if acct.fetch_available() {
                    word |= CH_CTRL_FC_AVAILABLE;
                }
                let primed = acct.config().enabled
                    && self.sched.is_enabled()
                    && self.sched.gate_open()
                    && acct.fetch_available()
                    && self.sched.tx_output_ready();
                if primed {
                    word |= CH_CTRL_PRIMED;
                }
                word
            }
            CH_DEST_BUDGET_OFFSET => {
                u32::from(acct.config().dest) | (u32::from(acct.config().pkt_budget) << 16)
            }
            CH_LIMIT_OFFSET => {
                u32::from(acct.config().data_budget) | (u32::from(acct.config().pkt_limit) << 16)
            }
            CH_DATA_LIMIT_OFFSET => acct.config().data_limit,
            _ => 0,
        }
    }

    fn write_channel(&mut self, channel: usize, reg: u32, value: u32) {
        let Some(acct) = self.sched.channel_mut(channel) else {
            return;
        };
        let config = acct.config_mut();
        match reg {
            CH_CTRL_OFFSET => config.enabled = value & CH_CTRL_ENABLE != 0,
            CH_DEST_BUDGET_OFFSET => {
                config.dest = (value & 0xFFFF) as u16;
                config.pkt_budget = (value >> 16) as u16;
            }
            CH_LIMIT_OFFSET => {
                config.data_budget = (value & 0xFFFF) as u16;
                config.pkt_limit = (value >> 16) as u16;
            }
            CH_DATA_LIMIT_OFFSET => config.data_limit = value,
            _ => {}
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
