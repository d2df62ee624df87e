//! Core scheduler components.
//!
//! This module contains the building blocks for configuring and operating
//! the TX packet scheduler.
//!
//! # Overview
//!
//! - [`config`]: Configuration types and builder patterns
//! - [`error`]: Error types and result aliases
//! - [`event`]: Stream payloads and the queue command/status encoding
//! - [`scheduler`]: The scheduler core and its cycle engine
//! - [`flow`]: Per-channel flow-control accounting
//! - [`regs`]: The control register block
//! - [`tdma`]: TDMA timeslot gating and per-queue timeslot control
//!
//! # Usage
//!
//! ```ignore
//! use nic_txsched::driver::{SchedConfig, Scheduler};
//!
//! let mut sched: Scheduler<64, 4, 16> = Scheduler::new();
//! sched.init(SchedConfig::new().with_ports(2).with_tcs(2))?;
//! sched.run_init();
//! sched.set_enabled(true);
//! ```

// Submodules
pub mod config;
pub mod error;
pub mod event;
pub mod flow;
pub mod regs;
pub mod scheduler;
pub mod tdma;

// Re-exports for convenience
pub use config::{ChannelConfig, SchedConfig, State};
pub use error::{
    ConfigError, ConfigResult, Error, EventError, EventResult, Result, TdmaError, TdmaResult,
};
pub use event::{
    DequeueStatus, FinishStatus, PortStatus, QueueCommand, QueueCtrl, QueueStatus, StartStatus,
    TxRequest,
};
pub use flow::ChannelAccountant;
pub use regs::RegisterFile;
pub use scheduler::{Scheduler, SchedulerDefault, SchedulerLarge, SchedulerSmall};
pub use tdma::{TdmaControl, TdmaGate, TdmaSchedule, Timestamp};
