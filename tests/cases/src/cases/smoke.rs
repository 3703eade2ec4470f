use std::time::Duration;

use crate::steps;

pub fn run() {
    let highest = steps::address("fe80::1e");
    let nodes = vec![
        (steps::address("fe80::a"), 100),
        (steps::address("fe80::14"), 100),
        (highest, 100),
    ];

    let group = steps::group::start_initial_group(nodes);

    let published = group.wait_for_aggregate_from(highest, Duration::from_secs(10));
    assert!(published, "highest address node publishes aggregates");

    steps::sleep(1000);

    assert_eq!(group.latest_publisher(), Some(highest));
    assert!(group.published_values().iter().all(|value| *value == 100));

    group.terminate();

    info!("Smoke case finished");
}
