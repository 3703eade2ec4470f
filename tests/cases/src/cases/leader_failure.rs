use std::time::Duration;

use crate::steps;

pub fn run() {
    let first_leader = steps::address("fe80::1e");
    let second_leader = steps::address("fe80::14");
    let nodes = vec![
        (steps::address("fe80::a"), 10),
        (second_leader, 20),
        (first_leader, 30),
    ];

    let group = steps::group::start_initial_group(nodes);

    let published = group.wait_for_aggregate_from(first_leader, Duration::from_secs(10));
    assert!(published, "initial leader publishes aggregates");

    info!("Disconnecting leader {}", first_leader);
    group.network.disconnect(&first_leader);

    let published = group.wait_for_aggregate_from(second_leader, Duration::from_secs(15));
    assert!(published, "next highest address takes over");

    steps::sleep(1000);
    assert_eq!(group.latest_publisher(), Some(second_leader));

    group.terminate();

    info!("Leader failure case finished");
}
