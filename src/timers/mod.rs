use std::time::{Duration, Instant};

use crate::node::configuration::NodeTimings;

/// Identity of the three single-shot timers driving the election.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Display)]
pub enum TimerId {
    /// Own address broadcast (candidate) or follower polling (leader).
    Interval,

    /// No liveness signal from the leader for too long.
    LeaderTimeout,

    /// Highest observed address has been stable long enough to settle.
    LeaderThreshold,
}

impl TimerId {
    pub const ALL: [TimerId; 3] = [
        TimerId::Interval,
        TimerId::LeaderTimeout,
        TimerId::LeaderThreshold,
    ];

    fn index(self) -> usize {
        match self {
            TimerId::Interval => 0,
            TimerId::LeaderTimeout => 1,
            TimerId::LeaderThreshold => 2,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct TimerEntry {
    delay: Duration,
    deadline: Option<Instant>,
}

/// Fixed table of the election timers. Each entry holds its configured delay
/// and the pending deadline, if any. At most one delivery is pending per timer.
#[derive(Clone, Debug)]
pub struct TimerRegistry {
    entries: [TimerEntry; 3],
}

impl TimerRegistry {
    pub fn new(timings: &NodeTimings) -> TimerRegistry {
        let entry = |delay| TimerEntry {
            delay,
            deadline: None,
        };

        TimerRegistry {
            entries: [
                entry(timings.message_interval),
                entry(timings.leader_timeout),
                entry(timings.leader_threshold),
            ],
        }
    }

    /// Cancels the pending delivery (if any) and installs a new deadline after the configured delay.
    pub fn schedule(&mut self, id: TimerId) {
        self.schedule_at(id, Instant::now());
    }

    fn schedule_at(&mut self, id: TimerId, now: Instant) {
        let entry = &mut self.entries[id.index()];
        entry.deadline = Some(now + entry.delay);

        trace!("Timer {} scheduled in {:?}", id, entry.delay);
    }

    pub fn cancel(&mut self, id: TimerId) {
        let entry = &mut self.entries[id.index()];
        if entry.deadline.take().is_some() {
            trace!("Timer {} cancelled", id);
        }
    }

    pub fn cancel_all(&mut self) {
        for id in TimerId::ALL.iter() {
            self.cancel(*id);
        }
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.entries[id.index()].deadline.is_some()
    }

    pub fn delay(&self, id: TimerId) -> Duration {
        self.entries[id.index()].delay
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.iter().filter_map(|entry| entry.deadline).min()
    }

    /// Returns the earliest timer whose deadline has passed and clears it.
    pub fn take_expired(&mut self, now: Instant) -> Option<TimerId> {
        let expired = TimerId::ALL
            .iter()
            .filter_map(|id| match self.entries[id.index()].deadline {
                Some(deadline) if deadline <= now => Some((deadline, *id)),
                _ => None,
            })
            .min_by_key(|(deadline, _)| *deadline)
            .map(|(_, id)| id);

        if let Some(id) = expired {
            self.entries[id.index()].deadline = None;
        }

        expired
    }
}
