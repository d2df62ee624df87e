//! Core TX scheduler implementation.
//!
//! This module contains the main [`Scheduler`] structure and its cycle
//! engine:
//!
//! - Initialization and the init walk over the queue store
//! - Event source arbitration (admit stage) and commit-stage mutations
//! - Round-robin selection through the ready ring
//! - Credit-gated transmit request issue
//! - The doorbell/dequeue/start/finish status protocol
//!
//! One call to [`Scheduler::tick`] is one cycle: the pipeline shifts, the
//! entry reaching the commit end mutates the queue store, and the admit
//! stage selects the highest-priority pending event source. Strict source
//! priority keeps control events ahead of dataplane events; the transmit
//! request source comes last because it is self-sustaining.
//!
//! For per-channel credit accounting, see the [`flow`](super::flow) module.
//! For the register surface, see the [`regs`](super::regs) module.

use super::config::{SchedConfig, State};
use super::error::{ConfigError, ConfigResult, EventError, EventResult};
use super::event::{
    DequeueStatus, FinishStatus, QueueCommand, QueueCtrl, StartStatus, TxRequest,
};
use super::flow::ChannelAccountant;
use crate::internal::constants::{
    COMPLETION_FIFO_DEPTH, CTRL_FIFO_DEPTH, DOORBELL_FIFO_DEPTH, HOST_FIFO_DEPTH, PIPELINE_DEPTH,
    TX_REQUEST_FIFO_DEPTH,
};
use crate::internal::fifo::Fifo;
use crate::internal::op_table::OpTable;
use crate::internal::pipeline::{CompletionKind, PipeEvent, Pipeline, Stage};
use crate::internal::state::{QueueRecord, StateStore};

// =============================================================================
// Scheduler
// =============================================================================

/// Round-robin TX packet scheduler.
///
/// # Type Parameters
/// * `QUEUES` - Number of transmit queues (a power of two)
/// * `CHANNELS` - Number of (port, traffic class) channels
/// * `OP_SLOTS` - Maximum concurrent in-flight requests (8..=32 typical)
///
/// # Example
/// ```ignore
/// let mut sched: Scheduler<16, 1, 8> = Scheduler::new();
/// sched.init(SchedConfig::new())?;
/// sched.run_init();
/// sched.set_enabled(true);
///
/// sched.queue_command(3, QueueCommand::SetEnable(true).encode())?;
/// sched.doorbell(3)?;
/// loop {
///     sched.tick();
///     if let Some(req) = sched.poll_tx_request() {
///         // hand (req.queue, req.dest, req.tag) to the TX engine
///         break;
///     }
/// }
/// ```
pub struct Scheduler<const QUEUES: usize, const CHANNELS: usize, const OP_SLOTS: usize> {
    /// Lifecycle state
    state: State,
    /// Active configuration
    config: SchedConfig,
    /// Host enable bit; gates request admission only
    enabled: bool,
    /// TDMA gate level; `true` when no gate is attached
    gate_open: bool,
    /// Queue state store
    store: StateStore<QUEUES>,
    /// State-update pipeline
    pipeline: Pipeline,
    /// Ready ring: queue indexes eligible to transmit, round-robin order
    ready: Fifo<u16, QUEUES>,
    /// In-flight operation slots
    ops: OpTable<OP_SLOTS>,
    /// Per-channel flow-control accountants
    channels: [ChannelAccountant; CHANNELS],
    /// Doorbell input stream
    doorbells: Fifo<u16, DOORBELL_FIFO_DEPTH>,
    /// Dequeue status input stream (failures only reach the pipeline)
    dequeues: Fifo<DequeueStatus, COMPLETION_FIFO_DEPTH>,
    /// Fetch-start status input stream
    starts: Fifo<StartStatus, COMPLETION_FIFO_DEPTH>,
    /// Finish status input stream
    finishes: Fifo<FinishStatus, COMPLETION_FIFO_DEPTH>,
    /// Out-of-band queue control stream
    queue_ctrl: Fifo<QueueCtrl, CTRL_FIFO_DEPTH>,
    /// Pending host command writes
    host_writes: Fifo<(u16, QueueCommand), HOST_FIFO_DEPTH>,
    /// Pending host status reads
    host_reads: Fifo<u16, HOST_FIFO_DEPTH>,
    /// Most recent completed host read
    read_latch: Option<(u16, u32)>,
    /// Transmit request output stream
    tx_requests: Fifo<TxRequest, TX_REQUEST_FIFO_DEPTH>,
    /// Requests admitted but not yet committed
    pending_requests: usize,
    /// Number of records with the scheduled flag set
    scheduled_count: usize,
    /// Init walk progress
    init_cursor: usize,
}

impl<const QUEUES: usize, const CHANNELS: usize, const OP_SLOTS: usize>
    Scheduler<QUEUES, CHANNELS, OP_SLOTS>
{
    /// Create a new scheduler instance.
    ///
    /// This is a const function suitable for static initialization.
    /// The scheduler is created in the `Uninitialized` state.
    pub const fn new() -> Self {
        Self {
            state: State::Uninitialized,
            config: SchedConfig::new(),
            enabled: false,
            gate_open: true,
            store: StateStore::new(),
            pipeline: Pipeline::new(),
            ready: Fifo::new(),
            ops: OpTable::new(),
            channels: [const { ChannelAccountant::new() }; CHANNELS],
            doorbells: Fifo::new(),
            dequeues: Fifo::new(),
            starts: Fifo::new(),
            finishes: Fifo::new(),
            queue_ctrl: Fifo::new(),
            host_writes: Fifo::new(),
            host_reads: Fifo::new(),
            read_latch: None,
            tx_requests: Fifo::new(),
            pending_requests: 0,
            scheduled_count: 0,
            init_cursor: 0,
        }
    }

    // =========================================================================
    // State Accessors
    // =========================================================================

    /// Get the current lifecycle state
    #[inline(always)]
    pub fn state(&self) -> State {
        self.state
    }

    /// Get the active configuration
    #[inline(always)]
    pub fn config(&self) -> &SchedConfig {
        &self.config
    }

    /// Check the host enable bit
    #[inline(always)]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Check the TDMA gate level
    #[inline(always)]
    pub fn gate_open(&self) -> bool {
        self.gate_open
    }

    /// Check whether operations are in flight.
    ///
    /// Stays true after a disable until every outstanding operation has
    /// drained; re-enabling resumes from the state held in the queue store.
    #[inline(always)]
    pub fn is_active(&self) -> bool {
        !self.ops.is_empty() || !self.pipeline.is_empty()
    }

    /// Number of queues currently scheduled (present in the ready ring or
    /// being re-enqueued this pass).
    #[inline(always)]
    pub fn active_queue_count(&self) -> usize {
        self.scheduled_count
    }

    /// Number of transmit queues.
    #[inline(always)]
    pub const fn queue_count(&self) -> usize {
        QUEUES
    }

    /// Number of channels.
    #[inline(always)]
    pub const fn channel_count(&self) -> usize {
        CHANNELS
    }

    /// Inspect a channel's flow-control accountant.
    pub fn channel(&self, channel: usize) -> Option<&ChannelAccountant> {
        self.channels.get(channel)
    }

    /// Mutable access to a channel's accountant, for register writes.
    pub fn channel_mut(&mut self, channel: usize) -> Option<&mut ChannelAccountant> {
        self.channels.get_mut(channel)
    }

    /// Transmit requests waiting in the output stream.
    #[inline(always)]
    pub fn tx_requests_pending(&self) -> usize {
        self.tx_requests.len()
    }

    /// Check whether the output stream can accept another request.
    #[inline(always)]
    pub fn tx_output_ready(&self) -> bool {
        self.tx_requests.len() + self.pending_requests < self.tx_requests.capacity()
    }

    // =========================================================================
    // Initialization and Control
    // =========================================================================

    /// Initialize the scheduler with the given configuration.
    ///
    /// Applies the channel template to every channel and starts the init
    /// walk that clears the queue store; call [`tick`](Self::tick) (or
    /// [`run_init`](Self::run_init)) until the state reaches `Running`.
    /// Every other event source is held off while the walk is in progress.
    ///
    /// # Errors
    /// - `AlreadyInitialized` - the scheduler was already initialized
    /// - validation errors from [`SchedConfig::validate`]
    pub fn init(&mut self, config: SchedConfig) -> ConfigResult<()> {
        if self.state != State::Uninitialized {
            return Err(ConfigError::AlreadyInitialized);
        }
        config.validate(CHANNELS)?;
        self.config = config;
        for channel in &mut self.channels {
            channel.configure(config.channel, config.fc_scale);
        }
        self.begin_walk();

        #[cfg(feature = "defmt")]
        defmt::info!(
            "scheduler init: {} queues, {} channels, {} op slots",
            QUEUES,
            CHANNELS,
            OP_SLOTS
        );
        Ok(())
    }

    /// Restart the init walk, discarding all queue and stream state.
    ///
    /// Channel configuration is preserved; counters are cleared.
    ///
    /// # Errors
    /// - `NotInitialized` - `init` has not been called
    pub fn reset(&mut self) -> ConfigResult<()> {
        if self.state == State::Uninitialized {
            return Err(ConfigError::NotInitialized);
        }
        for channel in &mut self.channels {
            channel.reset();
        }
        self.begin_walk();
        Ok(())
    }

    fn begin_walk(&mut self) {
        self.state = State::Initializing;
        self.init_cursor = 0;
        self.pipeline.clear();
        self.ready.clear();
        self.ops.clear();
        self.doorbells.clear();
        self.dequeues.clear();
        self.starts.clear();
        self.finishes.clear();
        self.queue_ctrl.clear();
        self.host_writes.clear();
        self.host_reads.clear();
        self.tx_requests.clear();
        self.read_latch = None;
        self.pending_requests = 0;
        self.scheduled_count = 0;
    }

    /// Run cycles until the init walk completes.
    pub fn run_init(&mut self) {
        while self.state == State::Initializing {
            self.tick();
        }
    }

    /// Set the host enable bit.
    ///
    /// Disabling stops admitting new transmit requests but does not flush
    /// in-flight operations.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Set the TDMA gate level. A closed gate suppresses request admission
    /// exactly like the enable bit; queue state is untouched.
    pub fn set_gate(&mut self, open: bool) {
        self.gate_open = open;
    }

    /// Reconfigure one channel in place.
    ///
    /// # Errors
    /// - `InvalidChannel` - index out of range
    pub fn configure_channel(
        &mut self,
        channel: usize,
        config: super::config::ChannelConfig,
    ) -> ConfigResult<()> {
        let fc_scale = self.config.fc_scale;
        let accountant = self
            .channels
            .get_mut(channel)
            .ok_or(ConfigError::InvalidChannel)?;
        accountant.configure(config, fc_scale);
        Ok(())
    }

    // =========================================================================
    // Event Streams
    // =========================================================================

    /// Signal that new descriptors are available on a queue.
    ///
    /// # Errors
    /// - `QueueOutOfRange` - queue index beyond the queue count
    /// - `Backpressure` - doorbell FIFO full; retry after cycles have run
    pub fn doorbell(&mut self, queue: u16) -> EventResult<()> {
        self.check_queue(queue)?;
        if !self.doorbells.push(queue) {
            return Err(EventError::Backpressure);
        }
        Ok(())
    }

    /// Deliver a dequeue status from the queue manager.
    ///
    /// Successful dequeues carry no state change (the start report performs
    /// the accounting) and are absorbed without consuming a pipeline pass.
    ///
    /// # Errors
    /// - `QueueOutOfRange` / `Backpressure`
    pub fn dequeue_status(&mut self, status: DequeueStatus) -> EventResult<()> {
        self.check_queue(status.queue)?;
        if !status.empty && !status.error {
            return Ok(());
        }
        if !self.dequeues.push(status) {
            return Err(EventError::Backpressure);
        }
        Ok(())
    }

    /// Deliver a fetch-start status from the TX engine.
    ///
    /// # Errors
    /// - `QueueOutOfRange` / `Backpressure`
    pub fn start_status(&mut self, status: StartStatus) -> EventResult<()> {
        self.check_queue(status.queue)?;
        if !self.starts.push(status) {
            return Err(EventError::Backpressure);
        }
        Ok(())
    }

    /// Deliver a transmission-finished status from the TX engine.
    ///
    /// # Errors
    /// - `QueueOutOfRange` / `Backpressure`
    pub fn finish(&mut self, status: FinishStatus) -> EventResult<()> {
        self.check_queue(status.queue)?;
        if !self.finishes.push(status) {
            return Err(EventError::Backpressure);
        }
        Ok(())
    }

    /// Deliver an out-of-band pause/enable from an external controller.
    ///
    /// # Errors
    /// - `QueueOutOfRange` / `Backpressure`
    pub fn queue_control(&mut self, ctrl: QueueCtrl) -> EventResult<()> {
        self.check_queue(ctrl.queue)?;
        if !self.queue_ctrl.push(ctrl) {
            return Err(EventError::Backpressure);
        }
        Ok(())
    }

    /// Write a raw command word to a queue's command register.
    ///
    /// Unknown opcodes are acknowledged and dropped.
    ///
    /// # Errors
    /// - `QueueOutOfRange` / `Backpressure`
    pub fn queue_command(&mut self, queue: u16, word: u32) -> EventResult<()> {
        self.check_queue(queue)?;
        let Some(command) = QueueCommand::decode(word) else {
            #[cfg(feature = "defmt")]
            defmt::warn!("queue {} command 0x{:08x} unknown, dropped", queue, word);
            #[cfg(feature = "log")]
            log::warn!("queue {queue} command {word:#010x} unknown, dropped");
            return Ok(());
        };
        if !self.host_writes.push((queue, command)) {
            return Err(EventError::Backpressure);
        }
        Ok(())
    }

    /// Read a queue's packed status word.
    ///
    /// The read travels through the pipeline like any other event, so it
    /// observes writes still in flight. Cycles are run until the read
    /// completes.
    ///
    /// # Errors
    /// - `QueueOutOfRange` / `Backpressure`
    /// - `ReadStalled` - the read did not complete within its cycle bound
    pub fn queue_status(&mut self, queue: u16) -> EventResult<u32> {
        self.check_queue(queue)?;
        if !self.host_reads.push(queue) {
            return Err(EventError::Backpressure);
        }
        self.read_latch = None;

        // Ahead of a read: the init walk and queued host writes, each one
        // pipeline pass. Everything else is lower priority.
        let bound = (QUEUES + HOST_FIFO_DEPTH + 4) * PIPELINE_DEPTH;
        for _ in 0..bound {
            self.tick();
            if let Some((q, word)) = self.read_latch {
                if q == queue {
                    self.read_latch = None;
                    return Ok(word);
                }
            }
        }
        Err(EventError::ReadStalled)
    }

    /// Take the next transmit request from the output stream.
    pub fn poll_tx_request(&mut self) -> Option<TxRequest> {
        self.tx_requests.pop()
    }

    fn check_queue(&self, queue: u16) -> EventResult<()> {
        if (queue as usize) < QUEUES {
            Ok(())
        } else {
            Err(EventError::QueueOutOfRange)
        }
    }

    // =========================================================================
    // Cycle Engine
    // =========================================================================

    /// Advance one cycle.
    pub fn tick(&mut self) {
        if self.state == State::Uninitialized {
            return;
        }

        // Fetch-start reports only touch channel accounting; they do not
        // occupy a pipeline pass.
        while let Some(start) = self.starts.pop() {
            self.apply_start(start);
        }

        for channel in &mut self.channels {
            channel.refresh();
        }

        if let Some(stage) = self.pipeline.advance() {
            self.commit(stage);
        }
        self.admit();
    }

    /// Resolve the channel a queue issues on: its egress port and that
    /// port's traffic class. With no port explicitly enabled the queue
    /// falls back to port 0 (the reset default); port enables steer, they
    /// do not gate.
    fn channel_of(&self, record: &QueueRecord) -> u16 {
        let port_count = self.config.port_count as usize;
        let port = record.egress_port(port_count).unwrap_or(0);
        let tc = record.ports[port].tc.min(self.config.tc_count - 1);
        let channel = port as u16 * u16::from(self.config.tc_count) + u16::from(tc);
        channel.min(CHANNELS as u16 - 1)
    }

    fn apply_start(&mut self, start: StartStatus) {
        let record = self.store.read(start.queue as usize);
        let channel = self.channel_of(&record) as usize;
        if start.error {
            self.channels[channel].fetch_release();
        } else {
            self.channels[channel].tx_consume(start.len);
        }
    }

    // =========================================================================
    // Admit Stage
    // =========================================================================

    fn admit(&mut self) {
        // Source 1: init walk. Holds off everything else so no event can
        // observe a half-initialized store.
        if self.state == State::Initializing {
            if self.init_cursor < QUEUES {
                let queue = self.init_cursor as u16;
                self.init_cursor += 1;
                self.admit_event(PipeEvent::Init, queue);
            } else if self.pipeline.is_empty() {
                self.state = State::Running;
            }
            return;
        }

        // Source 2: host register writes.
        if let Some((queue, command)) = self.host_writes.pop() {
            self.admit_event(PipeEvent::HostWrite(command), queue);
            return;
        }

        // Source 3: host register reads.
        if let Some(queue) = self.host_reads.pop() {
            self.admit_event(PipeEvent::HostRead, queue);
            return;
        }

        // Source 4: doorbells.
        if let Some(queue) = self.doorbells.pop() {
            self.admit_event(PipeEvent::Doorbell, queue);
            return;
        }

        // Source 5: completions, finishes ahead of dequeue failures.
        if let Some(fin) = self.finishes.pop() {
            self.admit_event(
                PipeEvent::Completion(CompletionKind::Finish {
                    tag: fin.tag,
                    len: fin.len,
                }),
                fin.queue,
            );
            return;
        }
        if let Some(dq) = self.dequeues.pop() {
            let kind = if dq.error {
                CompletionKind::DequeueError { tag: dq.tag }
            } else {
                CompletionKind::DequeueEmpty { tag: dq.tag }
            };
            self.admit_event(PipeEvent::Completion(kind), dq.queue);
            return;
        }

        // Source 6: out-of-band control.
        if let Some(ctrl) = self.queue_ctrl.pop() {
            self.admit_event(PipeEvent::QueueCtrl {
                enable: ctrl.enable,
            }, ctrl.queue);
            return;
        }

        // Source 7: transmit requests.
        self.try_admit_request();
    }

    fn admit_event(&mut self, event: PipeEvent, queue: u16) {
        let record = self.store.read(queue as usize);
        let admitted = self.pipeline.admit(Stage {
            event,
            queue,
            record,
        });
        debug_assert!(admitted);
    }

    fn try_admit_request(&mut self) {
        if !self.enabled || !self.gate_open {
            return;
        }
        if !self.tx_output_ready() || !self.ops.has_free() {
            return;
        }
        let Some(&queue) = self.ready.peek() else {
            return;
        };
        let record = self.store.read(queue as usize);
        let channel = self.channel_of(&record);

        // A credit-starved head holds the ring; a head that lost its
        // eligibility is admitted anyway so the commit stage drains it.
        if record.schedulable() && !self.channels[channel as usize].fetch_available() {
            return;
        }

        let Some(slot) = self.ops.alloc(queue) else {
            return;
        };
        self.ready.pop();
        self.channels[channel as usize].fetch_consume();
        self.pending_requests += 1;
        let admitted = self.pipeline.admit(Stage {
            event: PipeEvent::Request { slot, channel },
            queue,
            record,
        });
        debug_assert!(admitted);
    }

    // =========================================================================
    // Commit Stage
    // =========================================================================

    fn commit(&mut self, stage: Stage) {
        let queue = stage.queue;
        let mut record = stage.record;

        match stage.event {
            PipeEvent::Init => {
                record = QueueRecord::new();
            }
            PipeEvent::HostWrite(command) => {
                self.apply_command(&mut record, command);
                self.enqueue_if_eligible(queue, &mut record);
            }
            PipeEvent::HostRead => {
                let word = record.status_word(self.config.port_count as usize);
                self.read_latch = Some((queue, word));
                return;
            }
            PipeEvent::Doorbell => {
                record.active = true;
                record.generation = record.generation.wrapping_add(1);
                if let Some(tail) = record.tail_op {
                    self.ops.set_doorbell_pending(tail, queue);
                }
                self.enqueue_if_eligible(queue, &mut record);
            }
            PipeEvent::QueueCtrl { enable } => {
                record.paused = !enable;
                self.enqueue_if_eligible(queue, &mut record);
            }
            PipeEvent::Completion(kind) => {
                self.commit_completion(queue, &mut record, kind);
            }
            PipeEvent::Request { slot, channel } => {
                self.commit_request(queue, &mut record, slot, channel);
            }
        }

        self.store.write(queue as usize, record);
        self.pipeline.forward(queue, record);
    }

    fn apply_command(&self, record: &mut QueueRecord, command: QueueCommand) {
        match command {
            QueueCommand::SetPortTc { port, tc } => {
                let tc = tc.min(self.config.tc_count - 1);
                if let Some(p) = self.port_mut(record, port) {
                    p.tc = tc;
                }
            }
            QueueCommand::SetPortEnable { port, enable } => {
                if let Some(p) = self.port_mut(record, port) {
                    p.enable = enable;
                }
            }
            QueueCommand::SetPortPause { port, pause } => {
                if let Some(p) = self.port_mut(record, port) {
                    p.pause = pause;
                }
            }
            QueueCommand::SetEnable(enable) => {
                record.enabled = enable;
            }
            QueueCommand::SetPause(pause) => {
                record.paused = pause;
            }
        }
    }

    /// Port commands beyond the configured port count are dropped.
    fn port_mut<'a>(
        &self,
        record: &'a mut QueueRecord,
        port: u8,
    ) -> Option<&'a mut crate::internal::state::PortCtrl> {
        if (port as usize) < self.config.port_count as usize {
            record.ports.get_mut(port as usize)
        } else {
            None
        }
    }

    fn enqueue_if_eligible(&mut self, queue: u16, record: &mut QueueRecord) {
        if record.schedulable() && !record.scheduled {
            record.scheduled = true;
            let pushed = self.ready.push(queue);
            debug_assert!(pushed);
            self.scheduled_count += 1;
        }
    }

    fn commit_completion(&mut self, queue: u16, record: &mut QueueRecord, kind: CompletionKind) {
        // No operation in flight: a stale or duplicated status. Drop it.
        let Some(head) = self.ops.head_of(queue) else {
            return;
        };
        let released = self.ops.release_head(head);
        if record.tail_op == Some(head) {
            record.tail_op = None;
        }

        let channel = self.channel_of(record) as usize;
        let (tag, failed) = match kind {
            CompletionKind::DequeueEmpty { tag } | CompletionKind::DequeueError { tag } => {
                self.channels[channel].fetch_release();
                (tag, true)
            }
            CompletionKind::Finish { tag, len } => {
                self.channels[channel].tx_release(len);
                (tag, false)
            }
        };

        // A completion with a stale tag must not clear `active`: a newer
        // doorbell has already re-armed the queue.
        if failed && tag == record.generation {
            record.active = false;
        }
        // Completion on an administratively disabled queue invalidates its
        // pending work; re-enabling requires a fresh doorbell.
        if !record.enabled {
            record.active = false;
        }
        if released.doorbell_pending {
            record.active = true;
            self.enqueue_if_eligible(queue, record);
        }
        if self.ops.head_of(queue).is_none() {
            for port in &mut record.ports {
                port.scheduled = false;
            }
        }
    }

    fn commit_request(&mut self, queue: u16, record: &mut QueueRecord, slot: u8, channel: u16) {
        self.pending_requests -= 1;

        if record.schedulable() {
            let request = TxRequest {
                queue,
                dest: self.channels[channel as usize].config().dest,
                tag: record.generation,
            };
            let pushed = self.tx_requests.push(request);
            debug_assert!(pushed);

            self.ops.link_tail(slot, record.tail_op);
            record.tail_op = Some(slot);

            // Round-robin continuation: back to the tail of the ring.
            record.scheduled = true;
            let pushed = self.ready.push(queue);
            debug_assert!(pushed);

            let port_count = self.config.port_count as usize;
            let port = record.egress_port(port_count).unwrap_or(0);
            record.ports[port].scheduled = true;
        } else {
            // Eligibility was lost while the request was in flight: drain
            // the ring entry and return the reservation.
            self.ops.free_unlinked(slot);
            self.channels[channel as usize].fetch_release();
            if record.scheduled {
                record.scheduled = false;
                self.scheduled_count -= 1;
            }
        }
    }
}

impl<const QUEUES: usize, const CHANNELS: usize, const OP_SLOTS: usize> Default
    for Scheduler<QUEUES, CHANNELS, OP_SLOTS>
{
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Type Aliases
// =============================================================================

/// Small scheduler: 16 queues, one channel, 8 op slots.
pub type SchedulerSmall = Scheduler<16, 1, 8>;

/// Default scheduler: 64 queues, 4 channels, 16 op slots.
pub type SchedulerDefault = Scheduler<64, 4, 16>;

/// Large scheduler: 1024 queues, 8 channels, 32 op slots.
pub type SchedulerLarge = Scheduler<1024, 8, 32>;

// =============================================================================
// Test Support
// =============================================================================

#[cfg(test)]
impl<const QUEUES: usize, const CHANNELS: usize, const OP_SLOTS: usize>
    Scheduler<QUEUES, CHANNELS, OP_SLOTS>
{
    /// Check the structural invariants after every test step.
    pub(crate) fn assert_consistent(&self) {
        assert_eq!(
            self.scheduled_count,
            self.store.scheduled_count(),
            "scheduled flag count out of sync"
        );
        // A queue appears in the ready ring at most once.
        let mut seen = [false; QUEUES];
        for &q in self.ready.iter() {
            assert!(!seen[q as usize], "queue {q} in ready ring twice");
            seen[q as usize] = true;
            assert!(
                self.store.read(q as usize).scheduled,
                "queue {q} in ready ring without scheduled flag"
            );
        }
    }

    pub(crate) fn record(&self, queue: u16) -> QueueRecord {
        self.store.read(queue as usize)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
