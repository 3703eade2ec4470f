use std::time::Instant;

use crossbeam_channel::Receiver;

use crate::communication::{InboundEventChannels, Sensor, Transport};
use crate::election::machine::ElectionStateMachine;
use address::NodeAddress;
use configuration::NodeConfiguration;

pub mod address;
pub mod configuration;

pub struct NodeStartingParams<Tr, Sn>
where
    Tr: Transport + InboundEventChannels,
    Sn: Sensor,
{
    pub own_address: NodeAddress,
    pub node_config: NodeConfiguration<Tr, Sn>,
}

/// Node event loop. Drains the inbound queue and the expired timers one event
/// at a time until termination is requested.
pub fn start<Tr, Sn>(params: NodeStartingParams<Tr, Sn>, terminate_worker_rx: Receiver<()>)
where
    Tr: Transport + InboundEventChannels,
    Sn: Sensor,
{
    let own_address = params.own_address;
    let node_config = params.node_config;
    let inbound_event_rx = node_config.transport.inbound_event_rx();

    let mut machine = ElectionStateMachine::new(
        own_address,
        node_config.transport,
        node_config.sensor,
        &node_config.timings,
        node_config.limits,
    );

    info!("Node {} started", own_address);

    loop {
        let timer_rx = match machine.next_timer_deadline() {
            Some(deadline) => {
                crossbeam_channel::after(deadline.saturating_duration_since(Instant::now()))
            }
            None => crossbeam_channel::never::<Instant>(),
        };

        select!(
            recv(terminate_worker_rx) -> res  => {
                if res.is_err() {
                    error!("Abnormal exit for node {} event loop", own_address);
                }
                break
            },
            recv(inbound_event_rx) -> message_result => {
                match message_result {
                    Ok(message) => {
                        machine.dispatch(&message.event);
                        message.complete();
                    },
                    Err(err) => {
                        error!("Node {} inbound event channel closed: {}", own_address, err);
                        break
                    }
                }
            },
            recv(timer_rx) -> _  => {
                machine.fire_expired_timers(Instant::now());
            },
        );
    }

    info!("Node {} shutting down", own_address);
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::communication::event_queue::{EventQueue, InboundMessage};
    use crate::communication::{AggregateValue, InboundEventChannels, Sensor, SensorValue, Transport};
    use crate::election::event::{tags, RawEvent};
    use crate::errors::ElectError;
    use crate::node::address::NodeAddress;
    use crate::node::configuration::{NodeConfiguration, NodeLimits, NodeTimings};

    #[derive(Clone, Debug)]
    struct QueueTransport {
        address: NodeAddress,
        queue: EventQueue,
    }

    impl Transport for QueueTransport {
        fn resolve_own_address(&self) -> Result<NodeAddress, ElectError> {
            Ok(self.address)
        }

        fn broadcast_identity(&self, _own_address: &NodeAddress) -> Result<(), ElectError> {
            Ok(())
        }

        fn broadcast_aggregate(&self, _value: AggregateValue) -> Result<(), ElectError> {
            Ok(())
        }

        fn fetch_peer_sensor(&self, _peer: &NodeAddress) -> Result<(), ElectError> {
            Ok(())
        }

        fn register_with(&self, _leader: &NodeAddress, _own_address: &NodeAddress) -> Result<(), ElectError> {
            Ok(())
        }
    }

    impl InboundEventChannels for QueueTransport {
        fn inbound_event_rx(&self) -> crossbeam_channel::Receiver<InboundMessage> {
            self.queue.inbound_rx()
        }
    }

    #[derive(Debug)]
    struct ZeroSensor;

    impl Sensor for ZeroSensor {
        fn read(&self) -> SensorValue {
            0
        }
    }

    #[test]
    fn inbound_events_are_acknowledged() {
        let queue = EventQueue::new("node test".to_string(), 2, Duration::from_millis(500));
        let node_config = NodeConfiguration {
            transport: QueueTransport {
                address: NodeAddress::from(20u128),
                queue: queue.clone(),
            },
            sensor: ZeroSensor,
            timings: NodeTimings::default(),
            limits: NodeLimits::default(),
        };

        let worker = crate::start_node(node_config).unwrap();

        assert_eq!(queue.deliver(RawEvent::broadcast(&NodeAddress::from(30u128))), Ok(()));
        assert_eq!(queue.deliver(RawEvent::new(0x1234, String::new())), Ok(()));
        assert_eq!(
            queue.deliver(RawEvent::new(tags::BROADCAST, "not-an-address".to_string())),
            Ok(())
        );

        // still consuming after the invalid events
        assert_eq!(queue.deliver(RawEvent::sensor_value(7)), Ok(()));
        assert_eq!(queue.deliver(RawEvent::leader_alive()), Ok(()));

        worker.terminate();
        assert!(worker.join_handle.join().is_ok());
    }
}
