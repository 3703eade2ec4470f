use std::collections::HashMap;
use std::time::Duration;

use elect::{AggregateValue, NodeAddress, NodeWorker, SensorValue};
use elect_modules::InProcNetwork;

use super::{create_node_inproc, get_case_timings, wait_for};

pub struct CaseGroup {
    pub network: InProcNetwork,
    pub node_workers: HashMap<NodeAddress, NodeWorker>,
}

pub fn start_initial_group(nodes: Vec<(NodeAddress, SensorValue)>) -> CaseGroup {
    let timings = get_case_timings();
    let network = InProcNetwork::new(timings.communication_timeout, 10);

    let mut group = CaseGroup {
        network,
        node_workers: HashMap::new(),
    };

    for (address, reading) in nodes {
        group.add_new_node(address, reading);
    }

    group
}

impl CaseGroup {
    pub fn add_new_node(&mut self, address: NodeAddress, reading: SensorValue) {
        info!("Starting node {} with reading {}", address, reading);

        let node_worker = create_node_inproc(&self.network, address, reading);
        self.node_workers.insert(address, node_worker);
    }

    /// Node that published the latest aggregate, if any.
    pub fn latest_publisher(&self) -> Option<NodeAddress> {
        self.network
            .published_aggregates()
            .last()
            .map(|(leader, _)| *leader)
    }

    /// Waits until the given node publishes an aggregate after the already recorded ones.
    pub fn wait_for_aggregate_from(&self, leader: NodeAddress, limit: Duration) -> bool {
        let recorded = self.network.published_aggregates().len();

        wait_for(limit, || {
            self.network
                .published_aggregates()
                .iter()
                .skip(recorded)
                .any(|(publisher, _)| *publisher == leader)
        })
    }

    pub fn published_values(&self) -> Vec<AggregateValue> {
        self.network
            .published_aggregates()
            .into_iter()
            .map(|(_, value)| value)
            .collect()
    }

    pub fn terminate(self) {
        let mut handles = Vec::new();
        for (_, node_worker) in self.node_workers {
            node_worker.terminate();
            handles.push(node_worker.join_handle);
        }

        for handle in handles {
            let thread = handle.join();
            if thread.is_err() {
                panic!("worker panicked!")
            }
        }
    }
}
