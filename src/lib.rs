//! # Highest-address leader election with sensor aggregation
//!
//! A fixed-size group of peers elects as leader the node with the numerically
//! highest address. The leader polls its followers for sensor readings, fuses them
//! with an exponentially weighted average and publishes the result to the group.
//! Followers watch the leader liveness and start a new election when it disappears.

#![warn(missing_debug_implementations, unsafe_code)]

#[macro_use]
extern crate log;
#[macro_use]
extern crate crossbeam_channel;
#[macro_use]
extern crate derive_more;

mod common;
mod communication;
mod election;
mod errors;
mod node;
mod timers;

pub use common::WorkerPool;
pub use communication::event_queue::{EventQueue, InboundMessage};
pub use communication::{AggregateValue, InboundEventChannels, Sensor, SensorValue, Transport};
pub use election::event::{tags, ElectionEvent, RawEvent};
pub use election::fusion::SensorFusion;
pub use election::machine::ElectionStateMachine;
pub use election::roster::{FollowerRoster, Registration};
pub use election::ElectionPhase;
pub use errors::{new_err, ElectError};
pub use node::address::NodeAddress;
pub use node::configuration::{NodeConfiguration, NodeLimits, NodeTimings};
pub use timers::{TimerId, TimerRegistry};

pub type NodeWorker = common::ElectWorker;

/// Validates the configuration, resolves the node address and starts the node event loop.
pub fn start_node<Tr, Sn>(node_config: NodeConfiguration<Tr, Sn>) -> Result<NodeWorker, ElectError>
where
    Tr: Transport + InboundEventChannels,
    Sn: Sensor,
{
    node_config.limits.validate()?;
    let own_address = node_config.transport.resolve_own_address()?;

    debug!("Own address: [{}]", own_address);

    Ok(common::run_worker(
        node::start,
        node::NodeStartingParams {
            own_address,
            node_config,
        },
    ))
}
