//! Stage registers of the state-update pipeline.
//!
//! An event is admitted together with the record it read, spends
//! `PIPELINE_STAGES` cycles in flight, and surfaces at the commit end. While
//! it is in flight, commits by older events may rewrite the same record; the
//! forwarding network patches the carried copy of every younger in-flight
//! stage with a matching address, so each event always commits against the
//! freshest data without stalling the pipeline.

use super::constants::PIPELINE_STAGES;
use super::state::QueueRecord;
use crate::driver::event::QueueCommand;

// =============================================================================
// Pipeline Events
// =============================================================================

/// Completion flavors carried by the status streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionKind {
    /// Fetch found the queue empty; no bytes went to the wire
    DequeueEmpty {
        /// Tag echoed from the originating request
        tag: u16,
    },
    /// Fetch failed; no bytes went to the wire
    DequeueError {
        /// Tag echoed from the originating request
        tag: u16,
    },
    /// Transmission finished
    Finish {
        /// Tag echoed from the originating request
        tag: u16,
        /// Transmitted length in bytes
        len: u32,
    },
}

/// Event kinds serialized through the pipeline, one per pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipeEvent {
    /// Init walk: clear the record
    Init,
    /// Host command write against the queue register
    HostWrite(QueueCommand),
    /// Host read of the queue register
    HostRead,
    /// New descriptors available
    Doorbell,
    /// Status event closing an in-flight operation
    Completion(CompletionKind),
    /// Out-of-band pause/enable from an external controller
    QueueCtrl {
        /// `true` re-enables the queue, `false` pauses it
        enable: bool,
    },
    /// Transmit request popped from the ready ring
    Request {
        /// Operation slot reserved at admit
        slot: u8,
        /// Channel whose fetch credit was consumed at admit
        channel: u16,
    },
}

/// One in-flight pipeline entry: the event, its target, and the record as
/// read at admit (kept fresh by forwarding).
#[derive(Debug, Clone, Copy)]
pub struct Stage {
    /// Event being carried
    pub event: PipeEvent,
    /// Target queue index
    pub queue: u16,
    /// Carried record data
    pub record: QueueRecord,
}

// =============================================================================
// Pipeline
// =============================================================================

/// The stage register file between admit and commit.
///
/// Index 0 is the freshly admitted entry; the highest index is next to
/// commit. Bubbles (empty slots) flow through naturally.
pub struct Pipeline {
    stages: [Option<Stage>; PIPELINE_STAGES],
}

impl Pipeline {
    /// Create an empty pipeline. Const-compatible.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            stages: [const { None }; PIPELINE_STAGES],
        }
    }

    /// Number of entries in flight.
    #[must_use]
    pub fn occupancy(&self) -> usize {
        self.stages.iter().filter(|s| s.is_some()).count()
    }

    /// Check whether nothing is in flight.
    #[inline(always)]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.iter().all(|s| s.is_none())
    }

    /// Shift the pipeline by one cycle, returning the entry that reached
    /// the commit end. Must be called exactly once per cycle, before admit.
    pub fn advance(&mut self) -> Option<Stage> {
        let out = self.stages[PIPELINE_STAGES - 1].take();
        for i in (1..PIPELINE_STAGES).rev() {
            self.stages[i] = self.stages[i - 1].take();
        }
        out
    }

    /// Place a freshly admitted entry into stage 0.
    ///
    /// Returns `false` if the slot is still occupied (caller skipped
    /// `advance` or admitted twice in one cycle).
    pub fn admit(&mut self, stage: Stage) -> bool {
        if self.stages[0].is_some() {
            return false;
        }
        self.stages[0] = Some(stage);
        true
    }

    /// Forward a committed write into every in-flight entry carrying the
    /// same address.
    pub fn forward(&mut self, queue: u16, record: QueueRecord) {
        for stage in self.stages.iter_mut().flatten() {
            if stage.queue == queue {
                stage.record = record;
            }
        }
    }

    /// Drop everything in flight (reset path).
    pub fn clear(&mut self) {
        self.stages = [const { None }; PIPELINE_STAGES];
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
