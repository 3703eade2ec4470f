#[macro_use]
extern crate log;
extern crate chrono;
extern crate env_logger;

use std::io::Write;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use chrono::prelude::{DateTime, Local};

extern crate elect;
extern crate elect_modules;

use elect::{NodeAddress, NodeConfiguration, NodeLimits, NodeTimings, WorkerPool};
use elect_modules::{InProcNetwork, RandomizedSensor};

fn init_logger() {
    env_logger::builder()
        .format(|buf, record| {
            let now: DateTime<Local> = Local::now();
            writeln!(
                buf,
                "{:5}: {} - {}",
                record.level(),
                now.format("%H:%M:%S.%3f").to_string(),
                record.args()
            )
        })
        .init();
}

fn main() {
    init_logger();

    let timings = NodeTimings::default();
    let limits = NodeLimits::default();
    let network = InProcNetwork::new(timings.communication_timeout, limits.event_queue_capacity);

    let addresses: Vec<NodeAddress> = ["fe80::a", "fe80::14", "fe80::1e"]
        .iter()
        .filter_map(|address| match address.parse::<NodeAddress>() {
            Ok(address) => Some(address),
            Err(err) => {
                error!("Invalid node address {}: {}", address, err);
                None
            }
        })
        .collect();

    let mut pool = WorkerPool::new(Vec::new());
    for address in addresses {
        let sensor = Arc::new(RandomizedSensor::new(-20, 40));
        let node_config = NodeConfiguration {
            transport: network.add_node(address, sensor.clone()),
            sensor,
            timings,
            limits,
        };

        match elect::start_node(node_config) {
            Ok(worker) => pool.push(worker),
            Err(err) => error!("Node {} failed to start: {}", address, err),
        }
    }

    info!("Group started");

    let mut reported = 0;
    loop {
        thread::sleep(get_report_period());

        let published = network.published_aggregates();
        for (leader, value) in published.iter().skip(reported) {
            info!("Leader {} published aggregate {}", leader, value);
        }
        reported = published.len();
    }
}

fn get_report_period() -> Duration {
    Duration::from_secs(5)
}
