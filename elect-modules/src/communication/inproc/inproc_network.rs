use crossbeam_channel::{Receiver, Sender};
use parking_lot::Mutex;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use elect::{
    new_err, AggregateValue, ElectError, EventQueue, InboundEventChannels, InboundMessage,
    NodeAddress, RawEvent, Sensor, Transport,
};

enum Delivery {
    Event { to: NodeAddress, event: RawEvent },
    SensorRequest { leader: NodeAddress, follower: NodeAddress },
}

struct Endpoint {
    queue: EventQueue,
    sensor: Arc<dyn Sensor>,
    connected: bool,
}

#[derive(Default)]
struct NetworkState {
    endpoints: HashMap<NodeAddress, Endpoint>,
    published: Vec<(NodeAddress, AggregateValue)>,
}

/// In-memory broadcast network. Deliveries are performed by a dispatcher thread
/// in send order, so a node never blocks on its own peers while handling an event.
#[derive(Clone)]
pub struct InProcNetwork {
    timeout: Duration,
    queue_capacity: usize,
    state: Arc<Mutex<NetworkState>>,
    delivery_tx: Sender<Delivery>,
}

impl fmt::Debug for InProcNetwork {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let state = self.state.lock();
        write!(
            f,
            "InProcNetwork {{ timeout: {:?}, nodes: {} }}",
            self.timeout,
            state.endpoints.len()
        )
    }
}

impl InProcNetwork {
    /// Creates the network with the event delivery timeout and per-node queue capacity.
    pub fn new(timeout: Duration, queue_capacity: usize) -> InProcNetwork {
        let (delivery_tx, delivery_rx): (Sender<Delivery>, Receiver<Delivery>) =
            crossbeam_channel::unbounded();
        let state = Arc::new(Mutex::new(NetworkState::default()));

        let dispatcher_state = state.clone();
        thread::spawn(move || dispatch_deliveries(dispatcher_state, delivery_rx));

        InProcNetwork {
            timeout,
            queue_capacity,
            state,
            delivery_tx,
        }
    }

    /// Attaches a node and returns its transport. The network answers the leader's
    /// sensor requests for this node from `sensor`: share the node's own sensor
    /// (e.g. an `Arc`) so both sides read the same source.
    pub fn add_node<Sn: Sensor>(&self, address: NodeAddress, sensor: Sn) -> InProcTransport {
        let queue = EventQueue::new(
            format!("Inbound events NodeAddress={}", address),
            self.queue_capacity,
            self.timeout,
        );

        let mut state = self.state.lock();
        if state.endpoints.contains_key(&address) {
            warn!("In-process network - add duplicate node:{}", address)
        }
        state.endpoints.insert(
            address,
            Endpoint {
                queue: queue.clone(),
                sensor: Arc::new(sensor),
                connected: true,
            },
        );

        InProcTransport {
            address,
            network: self.clone(),
            queue,
        }
    }

    /// Cuts the node off: nothing is delivered to or accepted from it.
    pub fn disconnect(&self, address: &NodeAddress) {
        self.set_connected(address, false)
    }

    pub fn connect(&self, address: &NodeAddress) {
        self.set_connected(address, true)
    }

    fn set_connected(&self, address: &NodeAddress, connected: bool) {
        let mut state = self.state.lock();
        if let Some(endpoint) = state.endpoints.get_mut(address) {
            endpoint.connected = connected;
        }
    }

    /// Aggregates published so far, with the publishing node.
    pub fn published_aggregates(&self) -> Vec<(NodeAddress, AggregateValue)> {
        self.state.lock().published.clone()
    }

    fn is_connected(&self, address: &NodeAddress) -> bool {
        let state = self.state.lock();
        let connected = state
            .endpoints
            .get(address)
            .map(|endpoint| endpoint.connected);

        connected.unwrap_or(false)
    }

    fn check_route(&self, from: &NodeAddress, to: &NodeAddress) -> Result<(), ElectError> {
        if !self.is_connected(from) {
            return new_err(format!("Node {} is disconnected", from), String::new());
        }
        if !self.is_connected(to) {
            return new_err(format!("Node {} is unreachable", to), String::new());
        }
        Ok(())
    }

    fn enqueue(&self, delivery: Delivery) -> Result<(), ElectError> {
        if let Err(err) = self.delivery_tx.send(delivery) {
            return new_err("Network dispatcher stopped".to_string(), err.to_string());
        }
        Ok(())
    }

    fn broadcast(&self, from: NodeAddress, event: RawEvent) -> Result<(), ElectError> {
        if !self.is_connected(&from) {
            trace!("Broadcast from disconnected node {} dropped", from);
            return Ok(());
        }

        let receivers: Vec<NodeAddress> = {
            let state = self.state.lock();
            state
                .endpoints
                .keys()
                .cloned()
                .filter(|address| *address != from)
                .collect()
        };

        for to in receivers {
            self.enqueue(Delivery::Event {
                to,
                event: event.clone(),
            })?;
        }
        Ok(())
    }

    fn send(&self, from: NodeAddress, to: NodeAddress, event: RawEvent) -> Result<(), ElectError> {
        self.check_route(&from, &to)?;
        self.enqueue(Delivery::Event { to, event })
    }

    fn request_sensor(&self, leader: NodeAddress, follower: NodeAddress) -> Result<(), ElectError> {
        self.check_route(&leader, &follower)?;
        self.enqueue(Delivery::SensorRequest { leader, follower })
    }

    fn publish(&self, from: NodeAddress, value: AggregateValue) {
        if !self.is_connected(&from) {
            trace!("Aggregate from disconnected node {} dropped", from);
            return;
        }
        info!("Node {} published sensor aggregate {}", from, value);

        self.state.lock().published.push((from, value));
    }
}

fn dispatch_deliveries(state: Arc<Mutex<NetworkState>>, delivery_rx: Receiver<Delivery>) {
    let endpoint_queue = |address: &NodeAddress| {
        let state = state.lock();
        let endpoint = state
            .endpoints
            .get(address)
            .filter(|endpoint| endpoint.connected)
            .map(|endpoint| (endpoint.queue.clone(), endpoint.sensor.clone()));

        endpoint
    };

    for delivery in delivery_rx.iter() {
        match delivery {
            Delivery::Event { to, event } => {
                if let Some((queue, _)) = endpoint_queue(&to) {
                    deliver(&queue, to, event);
                }
            }
            Delivery::SensorRequest { leader, follower } => {
                let follower_endpoint = endpoint_queue(&follower);
                if let Some((queue, sensor)) = follower_endpoint {
                    deliver(&queue, follower, RawEvent::leader_alive());

                    if let Some((leader_queue, _)) = endpoint_queue(&leader) {
                        deliver(&leader_queue, leader, RawEvent::sensor_value(sensor.read()));
                    }
                }
            }
        }
    }

    trace!("In-process network dispatcher stopped");
}

fn deliver(queue: &EventQueue, to: NodeAddress, event: RawEvent) {
    if let Err(err) = queue.deliver(event) {
        warn!("Delivery to node {} failed: {}", to, err);
    }
}

/// Transport of one node attached to an InProcNetwork.
#[derive(Clone, Debug)]
pub struct InProcTransport {
    address: NodeAddress,
    network: InProcNetwork,
    queue: EventQueue,
}

impl Transport for InProcTransport {
    fn resolve_own_address(&self) -> Result<NodeAddress, ElectError> {
        Ok(self.address)
    }

    fn broadcast_identity(&self, own_address: &NodeAddress) -> Result<(), ElectError> {
        trace!("Node {} broadcasting identity", self.address);
        self.network
            .broadcast(self.address, RawEvent::broadcast(own_address))
    }

    fn broadcast_aggregate(&self, value: AggregateValue) -> Result<(), ElectError> {
        self.network.publish(self.address, value);
        Ok(())
    }

    fn fetch_peer_sensor(&self, peer: &NodeAddress) -> Result<(), ElectError> {
        trace!("Node {} requesting sensor value from {}", self.address, peer);
        self.network.request_sensor(self.address, *peer)
    }

    fn register_with(&self, leader: &NodeAddress, own_address: &NodeAddress) -> Result<(), ElectError> {
        trace!("Node {} registering with {}", self.address, leader);
        self.network
            .send(self.address, *leader, RawEvent::node_registration(own_address))
    }
}

impl InboundEventChannels for InProcTransport {
    fn inbound_event_rx(&self) -> Receiver<InboundMessage> {
        self.queue.inbound_rx()
    }
}
