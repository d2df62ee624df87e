//! Test utilities.
//!
//! Only available during testing. Provides a scripted time source for the
//! TDMA gate and a minimal queue-manager/TX-engine stand-in that echoes
//! status events back to the scheduler.

use crate::driver::event::{DequeueStatus, FinishStatus, StartStatus};
use crate::driver::scheduler::Scheduler;
use crate::driver::tdma::Timestamp;

/// Time source producing evenly spaced samples.
pub struct StepClock {
    now_ns: u64,
    step_ns: u64,
}

impl StepClock {
    /// Create a clock starting at zero.
    pub fn new(step_ns: u64) -> Self {
        Self { now_ns: 0, step_ns }
    }

    /// Current sample without advancing.
    pub fn now(&self) -> Timestamp {
        Timestamp::from_ns(self.now_ns)
    }

    /// Advance by one step and return the new sample.
    pub fn next(&mut self) -> Timestamp {
        self.now_ns += self.step_ns;
        self.now()
    }

    /// Jump forward, as a stepping PHC would.
    pub fn jump(&mut self, delta_ns: u64) {
        self.now_ns += delta_ns;
    }
}

/// Minimal downstream stand-in: owns per-queue descriptor counts, consumes
/// transmit requests, and answers with dequeue/start/finish statuses.
pub struct EchoEngine<const QUEUES: usize> {
    depth: [usize; QUEUES],
    frame_len: u32,
}

impl<const QUEUES: usize> EchoEngine<QUEUES> {
    /// Create an engine with empty queues.
    pub fn new(frame_len: u32) -> Self {
        Self {
            depth: [0; QUEUES],
            frame_len,
        }
    }

    /// Make descriptors available on a queue (pair with a doorbell).
    pub fn fill(&mut self, queue: u16, count: usize) {
        self.depth[queue as usize % QUEUES] += count;
    }

    /// Remaining descriptors on a queue.
    pub fn depth(&self, queue: u16) -> usize {
        self.depth[queue as usize % QUEUES]
    }

    /// Consume pending transmit requests and push the matching statuses.
    /// Returns the number of packets completed.
    pub fn service<const C: usize, const S: usize>(
        &mut self,
        sched: &mut Scheduler<QUEUES, C, S>,
    ) -> usize {
        let mut completed = 0;
        while let Some(req) = sched.poll_tx_request() {
            let depth = &mut self.depth[req.queue as usize % QUEUES];
            if *depth == 0 {
                sched
                    .dequeue_status(DequeueStatus {
                        queue: req.queue,
                        tag: req.tag,
                        empty: true,
                        error: false,
                    })
                    .unwrap();
                continue;
            }
            *depth -= 1;
            sched
                .start_status(StartStatus {
                    queue: req.queue,
                    tag: req.tag,
                    len: self.frame_len,
                    error: false,
                })
                .unwrap();
            sched
                .finish(FinishStatus {
                    queue: req.queue,
                    tag: req.tag,
                    len: self.frame_len,
                })
                .unwrap();
            completed += 1;
        }
        completed
    }
}

// =============================================================================
// End-To-End Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::config::SchedConfig;
    use crate::driver::event::QueueCommand;
    use crate::driver::scheduler::SchedulerSmall;

    #[test]
    fn step_clock_advances_evenly() {
        let mut clock = StepClock::new(5_000);
        assert_eq!(clock.now(), Timestamp::from_ns(0));
        assert_eq!(clock.next(), Timestamp::from_ns(5_000));
        assert_eq!(clock.next(), Timestamp::from_ns(10_000));
        clock.jump(1_000_000);
        assert_eq!(clock.now(), Timestamp::from_ns(1_010_000));
    }

    #[test]
    fn scheduler_drains_mixed_backlog_through_echo_engine() {
        let mut sched = SchedulerSmall::new();
        sched.init(SchedConfig::new()).unwrap();
        sched.run_init();
        sched.set_enabled(true);

        let mut engine: EchoEngine<16> = EchoEngine::new(1000);
        let backlog = [(1u16, 5usize), (4, 3), (9, 7)];
        for (queue, count) in backlog {
            sched
                .queue_command(queue, QueueCommand::SetEnable(true).encode())
                .unwrap();
            engine.fill(queue, count);
            sched.doorbell(queue).unwrap();
        }

        let mut completed = 0;
        for _ in 0..2_000 {
            sched.tick();
            completed += engine.service(&mut sched);
            if completed == 15 && !sched.is_active() && sched.active_queue_count() == 0 {
                break;
            }
        }
        assert_eq!(completed, 15);

        // Every queue ran dry and went idle.
        for (queue, _) in backlog {
            assert_eq!(engine.depth(queue), 0);
            let status =
                crate::driver::event::QueueStatus::from_raw(sched.queue_status(queue).unwrap());
            assert!(!status.active, "queue {queue} still active");
            assert!(!status.scheduled, "queue {queue} still scheduled");
        }
        assert_eq!(sched.active_queue_count(), 0);
        assert_eq!(sched.channel(0).unwrap().pkts_in_fetch(), 0);
        assert_eq!(sched.channel(0).unwrap().pkts_in_tx(), 0);
    }
}
