use std::time::Instant;

use rayon::prelude::*;

use super::event::{ElectionEvent, RawEvent};
use super::fusion::SensorFusion;
use super::roster::{FollowerRoster, Registration};
use super::ElectionPhase;
use crate::communication::{Sensor, SensorValue, Transport};
use crate::errors::ElectError;
use crate::node::address::NodeAddress;
use crate::node::configuration::{NodeLimits, NodeTimings};
use crate::timers::{TimerId, TimerRegistry};


/// Election and aggregation state machine. Consumes one event at a time and
/// reacts with transport calls and timer (re)arms. It is the only owner of the
/// election state.
#[derive(Debug)]
pub struct ElectionStateMachine<Tr, Sn>
where
    Tr: Transport,
    Sn: Sensor,
{
    own_address: NodeAddress,
    phase: ElectionPhase,
    timers: TimerRegistry,
    limits: NodeLimits,
    transport: Tr,
    sensor: Sn,
}

impl<Tr, Sn> ElectionStateMachine<Tr, Sn>
where
    Tr: Transport,
    Sn: Sensor,
{
    /// Creates the state machine in the initial (reset) state with interval and threshold timers armed.
    pub fn new(
        own_address: NodeAddress,
        transport: Tr,
        sensor: Sn,
        timings: &NodeTimings,
        limits: NodeLimits,
    ) -> ElectionStateMachine<Tr, Sn> {
        let mut machine = ElectionStateMachine {
            own_address,
            phase: ElectionPhase::Candidate,
            timers: TimerRegistry::new(timings),
            limits,
            transport,
            sensor,
        };

        machine.reset();
        machine
    }

    pub fn own_address(&self) -> NodeAddress {
        self.own_address
    }

    pub fn phase(&self) -> &ElectionPhase {
        &self.phase
    }

    pub fn is_leader(&self) -> bool {
        if let ElectionPhase::Leader { .. } = self.phase {
            return true;
        }
        false
    }

    pub fn is_settled(&self) -> bool {
        match self.phase {
            ElectionPhase::Follower { .. } | ElectionPhase::Leader { .. } => true,
            ElectionPhase::Candidate | ElectionPhase::AwaitingSettle { .. } => false,
        }
    }

    /// Highest address observed since the last reset. A leader reports itself.
    pub fn highest_seen(&self) -> NodeAddress {
        match &self.phase {
            ElectionPhase::AwaitingSettle { highest_seen } => *highest_seen,
            ElectionPhase::Follower { leader } => *leader,
            ElectionPhase::Candidate | ElectionPhase::Leader { .. } => self.own_address,
        }
    }

    pub fn roster(&self) -> Option<&FollowerRoster> {
        if let ElectionPhase::Leader { roster, .. } = &self.phase {
            return Some(roster);
        }
        None
    }

    pub fn fusion(&self) -> Option<&SensorFusion> {
        if let ElectionPhase::Leader { fusion, .. } = &self.phase {
            return Some(fusion);
        }
        None
    }

    pub fn timers(&self) -> &TimerRegistry {
        &self.timers
    }

    pub fn next_timer_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    /// Handles every timer expired by `now`, earliest first.
    pub fn fire_expired_timers(&mut self, now: Instant) {
        while let Some(id) = self.timers.take_expired(now) {
            self.handle(ElectionEvent::from(id));
        }
    }

    /// Decodes and handles a producer message. Invalid messages are reported and ignored.
    pub fn dispatch(&mut self, raw: &RawEvent) {
        match ElectionEvent::decode(raw) {
            Ok(event) => self.handle(event),
            Err(err) => warn!(
                "Node {} Invalid event {}: {}",
                self.own_address, raw, err
            ),
        }
    }

    pub fn handle(&mut self, event: ElectionEvent) {
        debug!("Node {} [{}] + {}", self.own_address, self.phase, event);

        match event {
            ElectionEvent::IntervalTick => self.on_interval(),
            ElectionEvent::Broadcast(address) => self.on_broadcast(address),
            ElectionEvent::LeaderAlive => self.timers.schedule(TimerId::LeaderTimeout),
            ElectionEvent::LeaderTimeout => self.on_leader_timeout(),
            ElectionEvent::NodeRegistration(address) => self.on_registration(address),
            ElectionEvent::SensorValue(value) => self.on_sensor_value(value),
            ElectionEvent::LeaderThreshold => self.on_threshold(),
        }
    }

    /// Returns to the initial candidate phase: role, roster and fusion state are
    /// dropped, interval and threshold timers re-armed, leader timeout cancelled.
    pub fn reset(&mut self) {
        debug!("Node {} Resetting...", self.own_address);

        self.phase = ElectionPhase::Candidate;
        self.timers.cancel_all();
        self.timers.schedule(TimerId::Interval);
        self.timers.schedule(TimerId::LeaderThreshold);
    }

    fn on_interval(&mut self) {
        let mut poll_errors = Vec::new();
        if let ElectionPhase::Leader { roster, fusion } = &mut self.phase {
            fusion.begin_cycle(self.sensor.read());

            let transport = &self.transport;
            let results: Vec<Result<(), ElectError>> = roster
                .followers()
                .par_iter()
                .map(|follower| transport.fetch_peer_sensor(follower))
                .collect();

            poll_errors = results.into_iter().filter_map(|res| res.err()).collect();
        } else if let Err(err) = self.transport.broadcast_identity(&self.own_address) {
            error!("Node {} Cannot broadcast identity: {}", self.own_address, err);
        }

        if !poll_errors.is_empty() {
            for err in poll_errors {
                error!("Node {} Follower poll failed: {}", self.own_address, err);
            }
            info!("Node {} Stepping down as leader", self.own_address);

            self.reset();
            return;
        }

        self.timers.schedule(TimerId::Interval);
    }

    fn on_broadcast(&mut self, address: NodeAddress) {
        if self.is_settled() {
            debug!(
                "Node {} Reset by broadcast from {}",
                self.own_address, address
            );
            self.reset();
            return;
        }

        if address == self.own_address {
            trace!("Node {} Own broadcast ignored", self.own_address);
            return;
        }

        if self.own_address < address {
            debug!("Node {} Received higher address {}", self.own_address, address);
            self.timers.cancel(TimerId::Interval);
        }

        let highest_seen = match &self.phase {
            ElectionPhase::Candidate => Some(address),
            ElectionPhase::AwaitingSettle { highest_seen } if *highest_seen < address => {
                Some(address)
            }
            _ => None,
        };

        if let Some(highest_seen) = highest_seen {
            self.phase = ElectionPhase::AwaitingSettle { highest_seen };
            self.timers.schedule(TimerId::LeaderThreshold);
        }
    }

    fn on_threshold(&mut self) {
        match self.phase {
            ElectionPhase::AwaitingSettle { highest_seen } if self.own_address < highest_seen => {
                self.become_follower(highest_seen)
            }
            ElectionPhase::Candidate | ElectionPhase::AwaitingSettle { .. } => warn!(
                "Node {} Leader cannot be alone in channel",
                self.own_address
            ),
            ElectionPhase::Follower { .. } | ElectionPhase::Leader { .. } => trace!(
                "Node {} Threshold ignored while settled",
                self.own_address
            ),
        }
    }

    fn become_follower(&mut self, leader: NodeAddress) {
        self.phase = ElectionPhase::Follower { leader };
        self.timers.cancel(TimerId::Interval);
        self.timers.cancel(TimerId::LeaderThreshold);
        self.timers.schedule(TimerId::LeaderTimeout);

        info!("Node {} Status changed to Follower of {}", self.own_address, leader);

        if let Err(err) = self.transport.register_with(&leader, &self.own_address) {
            error!(
                "Node {} Registration with {} failed: {}",
                self.own_address, leader, err
            );
        }
    }

    fn on_registration(&mut self, follower: NodeAddress) {
        if let ElectionPhase::Leader { roster, .. } = &mut self.phase {
            match roster.register(follower) {
                Ok(Registration::Added) => {
                    info!("Node {} Follower {} registered", self.own_address, follower)
                }
                Ok(Registration::AlreadyRegistered) => {
                    debug!("Node {} Follower {} already registered", self.own_address, follower)
                }
                Err(err) => {
                    error!("Node {} too many nodes received: {}", self.own_address, err);
                    return;
                }
            }
        } else {
            let mut roster = FollowerRoster::new(self.limits.max_nodes);
            if let Err(err) = roster.register(follower) {
                error!("Node {} too many nodes received: {}", self.own_address, err);
                return;
            }

            self.phase = ElectionPhase::Leader {
                roster,
                fusion: SensorFusion::new(self.limits.fusion_weight),
            };
            self.timers.cancel(TimerId::LeaderThreshold);
            self.timers.cancel(TimerId::LeaderTimeout);

            info!(
                "Node {} Status changed to Leader, first follower {}",
                self.own_address, follower
            );
        }

        self.timers.schedule(TimerId::Interval);
    }

    fn on_sensor_value(&mut self, value: SensorValue) {
        let mut aggregate = None;
        if let ElectionPhase::Leader { roster, fusion } = &mut self.phase {
            fusion.add_sample(value);
            if fusion.samples_received() >= roster.len() {
                aggregate = Some(fusion.aggregate());
                fusion.clear();
            }
        } else {
            trace!("Node {} Sensor value ignored, not a leader", self.own_address);
        }

        if let Some(value) = aggregate {
            info!("Node {} Publishing sensor aggregate {}", self.own_address, value);

            if let Err(err) = self.transport.broadcast_aggregate(value) {
                error!("Node {} Cannot broadcast aggregate: {}", self.own_address, err);
            }
        }
    }

    fn on_leader_timeout(&mut self) {
        if let ElectionPhase::Follower { leader } = self.phase {
            info!(
                "Node {} Leader {} awaiting time elapsed. Starting new election",
                self.own_address, leader
            );
            self.reset();
        } else {
            debug!("Node {} Leader timeout ignored in {}", self.own_address, self.phase);
        }
    }
}
