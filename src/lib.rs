//! NIC TX Packet Scheduler
//!
//! A `no_std`, `no_alloc` Rust implementation of a round-robin NIC transmit
//! scheduler with per-channel flow control and TDMA timeslot gating.
//!
//! Each cycle the scheduler decides which of up to 2^N transmit queues may
//! hand a packet to the MAC, subject to per-channel flow-control credits
//! and per-queue/per-port state. It moves metadata only (queue indexes,
//! tags, destination hints), never payload bytes.
//!
//! # Architecture
//!
//! The core is organized as five cooperating pieces:
//!
//! 1. **Queue state store**: one small record per queue, the scheduler's
//!    only persistent memory, updated through a fixed-depth pipeline with
//!    a write-forwarding network for read-during-write coherence
//! 2. **Ready ring**: a bounded FIFO of eligible queue indexes whose
//!    strict insertion order is the round-robin fairness
//! 3. **Flow-control accounting** ([`driver::flow`]): per-channel packet
//!    and credit windows gating request issue
//! 4. **Cycle engine** ([`driver::scheduler`]): strict-priority event
//!    arbitration across init, host, doorbell, completion, control, and
//!    request sources
//! 5. **TDMA gate** ([`driver::tdma`]): an optional timeslot overlay,
//!    driven by a PTP-style time feed, gating globally or per queue
//!
//! The register surface ([`driver::regs`]) exposes configuration and
//! status as a 32-bit word-addressed block; this crate is the device side.
//!
//! # Example
//!
//! ```ignore
//! use nic_txsched::{SchedConfig, Scheduler, QueueCommand};
//!
//! let mut sched: Scheduler<64, 4, 16> = Scheduler::new();
//! sched.init(SchedConfig::new().with_ports(2).with_tcs(2))?;
//! sched.run_init();
//! sched.set_enabled(true);
//!
//! sched.queue_command(3, QueueCommand::SetEnable(true).encode())?;
//! sched.doorbell(3)?;
//! loop {
//!     sched.tick();
//!     if let Some(req) = sched.poll_tx_request() {
//!         // hand (req.queue, req.dest, req.tag) to the TX engine
//!         break;
//!     }
//! }
//! ```
//!
//! # Features
//!
//! - `defmt`: Enable defmt formatting for status and error types
//! - `log`: Enable log output at fault paths
//! - `critical-section`: Enable the ISR-safe [`SharedScheduler`] wrapper

#![no_std]
#![deny(missing_docs)]
#![deny(unsafe_op_in_unsafe_fn)]
// Clippy lint levels live here; thresholds and config are in clippy.toml.
#![deny(clippy::correctness)]
#![warn(
    clippy::suspicious,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::cloned_instead_of_copied,
    clippy::explicit_iter_loop,
    clippy::implicit_clone,
    clippy::inconsistent_struct_constructor,
    clippy::manual_assert,
    clippy::manual_let_else,
    clippy::match_same_arms,
    clippy::needless_pass_by_value,
    clippy::semicolon_if_nothing_returned,
    clippy::uninlined_format_args,
    clippy::unnested_or_patterns,
    clippy::std_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::alloc_instead_of_core
)]
#![allow(
    clippy::similar_names,
    clippy::too_many_arguments,
    clippy::struct_excessive_bools,
    clippy::fn_params_excessive_bools,
    clippy::type_complexity,
    clippy::must_use_candidate,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::cast_lossless,
    clippy::module_name_repetitions,
    clippy::wildcard_imports,
    clippy::items_after_statements
)]

// =============================================================================
// Modules
// =============================================================================

pub mod driver;

// Internal implementation details (pub(crate) only)
mod internal;

#[cfg(feature = "critical-section")]
#[cfg_attr(docsrs, doc(cfg(feature = "critical-section")))]
pub mod sync;

// Test utilities (only available during testing)
#[cfg(test)]
pub mod testing;

// =============================================================================
// Re-exports
// =============================================================================

pub use driver::config::{ChannelConfig, SchedConfig, State};
pub use driver::error::{
    ConfigError, ConfigResult, Error, EventError, EventResult, Result, TdmaError, TdmaResult,
};
pub use driver::event::{
    DequeueStatus, FinishStatus, PortStatus, QueueCommand, QueueCtrl, QueueStatus, StartStatus,
    TxRequest,
};
pub use driver::flow::ChannelAccountant;
pub use driver::regs::RegisterFile;
pub use driver::scheduler::{Scheduler, SchedulerDefault, SchedulerLarge, SchedulerSmall};
pub use driver::tdma::{TdmaControl, TdmaGate, TdmaSchedule, Timestamp};

// Re-export sync types when critical-section is enabled
#[cfg(feature = "critical-section")]
pub use sync::{
    SharedScheduler, SharedSchedulerDefault, SharedSchedulerLarge, SharedSchedulerSmall,
};

/// Shared sizing constants.
///
/// These are grouped into a dedicated module to keep the top-level facade
/// focused on driver types.
pub mod constants {
    pub use crate::internal::constants::{
        // Stream depths
        COMPLETION_FIFO_DEPTH,
        CTRL_FIFO_DEPTH,
        DOORBELL_FIFO_DEPTH,
        TX_REQUEST_FIFO_DEPTH,
        // Flow control
        DEFAULT_FC_SCALE,
        DEFAULT_PKT_LIMIT,
        FETCH_CREDIT_STEPS,
        MAX_FRAME_SIZE,
        MTU,
        // Hierarchy
        MAX_PORTS,
        MAX_TCS,
        // Pipeline geometry
        PIPELINE_DEPTH,
        // TDMA
        MAX_MASKED_TIMESLOTS,
        MAX_TIMESLOTS,
    };
}
