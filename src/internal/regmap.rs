//! Register block layout: offsets and bit definitions.
//!
//! The crate is the device side of these blocks; the constants here define
//! the 32-bit little-endian word layout that the register files in
//! `driver::regs` and `driver::tdma` decode.

// =============================================================================
// Scheduler Block Header
// =============================================================================

/// Block type identifier (read-only).
pub const SCHED_RB_TYPE: u32 = 0x0000_C040;

/// Block version, packed major.minor.patch.meta.
pub const SCHED_RB_VERSION: u32 = 0x00_01_00_00;

/// Block type register.
pub const SCHED_TYPE_OFFSET: u32 = 0x00;

/// Block version register.
pub const SCHED_VERSION_OFFSET: u32 = 0x04;

/// Next-block pointer register.
pub const SCHED_NEXT_OFFSET: u32 = 0x08;

/// Offset-to-queue-region register.
pub const SCHED_QUEUE_BASE_OFFSET: u32 = 0x0C;

/// Queue count register (read-only).
pub const SCHED_QUEUE_COUNT_OFFSET: u32 = 0x10;

/// Queue stride register (read-only).
pub const SCHED_QUEUE_STRIDE_OFFSET: u32 = 0x14;

/// Scheduler control/status register.
pub const SCHED_CTRL_OFFSET: u32 = 0x18;

/// Scheduler geometry register.
pub const SCHED_CONFIG_OFFSET: u32 = 0x1C;

/// Per-queue command region base.
pub const SCHED_QUEUE_REGION_BASE: u32 = 0x1000;

/// Per-queue command register stride in bytes.
pub const SCHED_QUEUE_STRIDE: u32 = 4;

// Scheduler control bits
/// Global scheduler enable (read-write).
pub const SCHED_CTRL_ENABLE: u32 = 1 << 0;
/// Scheduler has work in flight (read-only).
pub const SCHED_CTRL_ACTIVE: u32 = 1 << 16;

// Scheduler geometry fields
/// Traffic class count shift (bits 7:0).
pub const SCHED_CONFIG_TC_SHIFT: u32 = 0;
/// Port count shift (bits 15:8).
pub const SCHED_CONFIG_PORT_SHIFT: u32 = 8;
/// Flow-control scale exponent shift (bits 23:16).
pub const SCHED_CONFIG_FC_SCALE_SHIFT: u32 = 16;

// =============================================================================
// Channel Registers
// =============================================================================

/// First channel register group.
pub const SCHED_CH_BASE: u32 = 0x20;

/// Stride between channel register groups.
pub const SCHED_CH_STRIDE: u32 = 0x10;

/// Channel control/status word offset within a group.
pub const CH_CTRL_OFFSET: u32 = 0x0;
/// Channel dest (15:0) / packet budget (31:16) word.
pub const CH_DEST_BUDGET_OFFSET: u32 = 0x4;
/// Channel data budget (15:0) / packet limit (31:16) word.
pub const CH_LIMIT_OFFSET: u32 = 0x8;
/// Channel data limit word.
pub const CH_DATA_LIMIT_OFFSET: u32 = 0xC;

// Channel control bits
/// Channel enable (read-write).
pub const CH_CTRL_ENABLE: u32 = 1 << 0;
/// Channel has packets in flight (read-only).
pub const CH_CTRL_ACTIVE: u32 = 1 << 16;
/// Channel has packets in the fetch window (read-only).
pub const CH_CTRL_FETCH_ACTIVE: u32 = 1 << 17;
/// Channel fetch credit available (read-only).
pub const CH_CTRL_FC_AVAILABLE: u32 = 1 << 18;
/// Channel is primed to issue (read-only).
pub const CH_CTRL_PRIMED: u32 = 1 << 19;

// =============================================================================
// Queue Command Opcodes
// =============================================================================

/// Set port traffic class: opcode in bits 31:16, port 15:8, TC 7:0.
pub const CMD_SET_PORT_TC: u32 = 0x8001;
/// Set port enable: opcode in bits 31:16, port 15:8, enable 7:0.
pub const CMD_SET_PORT_ENABLE: u32 = 0x8002;
/// Set port pause: opcode in bits 31:16, port 15:8, pause 7:0.
pub const CMD_SET_PORT_PAUSE: u32 = 0x8003;
/// Set queue enable: opcode in bits 31:8, enable 7:0.
pub const CMD_SET_QUEUE_ENABLE: u32 = 0x40_0001;
/// Set queue pause: opcode in bits 31:8, pause 7:0.
pub const CMD_SET_QUEUE_PAUSE: u32 = 0x40_0002;

// Queue status word bits (byte 0; port bytes are defined with `PortCtrl`)
/// Queue enable flag.
pub const QUEUE_STATUS_ENABLE: u32 = 1 << 0;
/// Queue pause flag.
pub const QUEUE_STATUS_PAUSE: u32 = 1 << 1;
/// Queue active flag.
pub const QUEUE_STATUS_ACTIVE: u32 = 1 << 2;
/// Queue scheduled flag.
pub const QUEUE_STATUS_SCHEDULED: u32 = 1 << 3;

// =============================================================================
// TDMA Block
// =============================================================================

/// TDMA block type identifier (read-only).
pub const TDMA_RB_TYPE: u32 = 0x0000_C060;

/// TDMA block version, packed major.minor.patch.meta.
pub const TDMA_RB_VERSION: u32 = 0x00_01_00_00;

/// TDMA control/status register.
pub const TDMA_CTRL_OFFSET: u32 = 0x0C;

/// Schedule start, fractional nanoseconds.
pub const TDMA_START_FNS_OFFSET: u32 = 0x10;
/// Schedule start, nanoseconds.
pub const TDMA_START_NS_OFFSET: u32 = 0x14;
/// Schedule start, seconds low word.
pub const TDMA_START_SEC_L_OFFSET: u32 = 0x18;
/// Schedule start, seconds high word; writing latches the full start.
pub const TDMA_START_SEC_H_OFFSET: u32 = 0x1C;

/// Schedule period, fractional nanoseconds.
pub const TDMA_PERIOD_FNS_OFFSET: u32 = 0x20;
/// Schedule period, nanoseconds; writing latches the full period.
pub const TDMA_PERIOD_NS_OFFSET: u32 = 0x24;

/// Timeslot period in nanoseconds.
pub const TDMA_TS_PERIOD_OFFSET: u32 = 0x28;
/// Active period in nanoseconds.
pub const TDMA_ACTIVE_PERIOD_OFFSET: u32 = 0x2C;

// TDMA control bits
/// TDMA enable (read-write).
pub const TDMA_CTRL_ENABLE: u32 = 1 << 0;
/// Schedule alignment complete (read-only).
pub const TDMA_CTRL_LOCKED: u32 = 1 << 8;
/// Schedule fault: oversized plan or time-source step (read-only).
pub const TDMA_CTRL_ERROR: u32 = 1 << 9;
/// Timeslot count shift (bits 31:16, read-only).
pub const TDMA_CTRL_SLOT_COUNT_SHIFT: u32 = 16;
