use crossbeam_channel::Receiver;
use std::sync::Arc;

use crate::errors::ElectError;
use crate::node::address::NodeAddress;

pub mod event_queue;

use event_queue::InboundMessage;

/// Raw sensor reading.
pub type SensorValue = i32;

/// Fused sensor estimate as published to the group.
pub type AggregateValue = i32;

/// Outbound side of the node's network. Implementations own the wire format
/// and must bound every call with their own timeout.
pub trait Transport: Clone + Send + Sync + 'static {
    /// Resolves the node's own address. Called once at start.
    fn resolve_own_address(&self) -> Result<NodeAddress, ElectError>;

    /// Announces the node address to the group.
    fn broadcast_identity(&self, own_address: &NodeAddress) -> Result<(), ElectError>;

    /// Publishes the fused sensor estimate to the group.
    fn broadcast_aggregate(&self, value: AggregateValue) -> Result<(), ElectError>;

    /// Issues a sensor request to the follower. The reading arrives later as
    /// a sensor value event; the result only tells whether the request was issued.
    fn fetch_peer_sensor(&self, peer: &NodeAddress) -> Result<(), ElectError>;

    /// Asks the prospective leader to add this node to its roster.
    fn register_with(&self, leader: &NodeAddress, own_address: &NodeAddress) -> Result<(), ElectError>;
}

/// Inbound side of the node's network: the queue producers deliver events into.
pub trait InboundEventChannels: Send + 'static {
    fn inbound_event_rx(&self) -> Receiver<InboundMessage>;
}

/// Local sensor hardware.
pub trait Sensor: Send + Sync + 'static {
    fn read(&self) -> SensorValue;
}

/// A sensor shared between the node and the transport answering peer sensor requests.
impl<S: Sensor + ?Sized> Sensor for Arc<S> {
    fn read(&self) -> SensorValue {
        (**self).read()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicI32, Ordering};

    struct IncrementingSensor(AtomicI32);

    impl Sensor for IncrementingSensor {
        fn read(&self) -> SensorValue {
            self.0.fetch_add(1, Ordering::SeqCst)
        }
    }

    #[test]
    fn shared_sensor_reads_one_source() {
        let sensor = Arc::new(IncrementingSensor(AtomicI32::new(5)));
        let node_side = sensor.clone();
        let network_side: Arc<dyn Sensor> = sensor;

        assert_eq!(node_side.read(), 5);
        assert_eq!(network_side.read(), 6);
        assert_eq!(node_side.read(), 7);
    }
}
