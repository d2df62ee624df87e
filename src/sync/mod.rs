//! ISR-safe shared access to the scheduler.
//!
//! Doorbells and status events typically arrive from interrupt context
//! while the cycle engine runs in the main loop; [`SharedScheduler`] wraps
//! a scheduler in a critical-section cell so both sides can reach it.
//!
//! Available with the `critical-section` feature.

mod primitives;
mod shared;

pub use primitives::CriticalSectionCell;
pub use shared::{SharedScheduler, SharedSchedulerDefault, SharedSchedulerLarge, SharedSchedulerSmall};
