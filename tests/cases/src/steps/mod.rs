use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use elect::{NodeAddress, NodeConfiguration, NodeLimits, NodeTimings, NodeWorker, SensorValue};
use elect_modules::{FixedSensor, InProcNetwork};

pub mod group;

pub fn sleep(millis: u64) {
    thread::sleep(Duration::from_millis(millis));
}

pub fn address(text: &str) -> NodeAddress {
    text.parse().expect("valid node address")
}

/// Short timers keeping a healthy margin between the broadcast period and the
/// settle and liveness delays.
pub fn get_case_timings() -> NodeTimings {
    NodeTimings {
        message_interval: Duration::from_millis(300),
        leader_timeout: Duration::from_millis(1500),
        leader_threshold: Duration::from_millis(1000),
        communication_timeout: Duration::from_millis(500),
    }
}

pub fn create_node_inproc(
    network: &InProcNetwork,
    address: NodeAddress,
    reading: SensorValue,
) -> NodeWorker {
    let sensor = Arc::new(FixedSensor::new(reading));
    let node_config = NodeConfiguration {
        transport: network.add_node(address, sensor.clone()),
        sensor,
        timings: get_case_timings(),
        limits: NodeLimits::default(),
    };

    elect::start_node(node_config).expect("node started")
}

/// Polls the condition until it holds or the deadline passes.
pub fn wait_for<F: Fn() -> bool>(limit: Duration, condition: F) -> bool {
    let deadline = Instant::now() + limit;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        sleep(50);
    }

    condition()
}
