use std::time::Duration;

use crate::steps;

pub fn run() {
    let initial_leader = steps::address("fe80::14");
    let late_node = steps::address("fe80::1e");
    let nodes = vec![(steps::address("fe80::a"), 5), (initial_leader, 15)];

    let mut group = steps::group::start_initial_group(nodes);

    let published = group.wait_for_aggregate_from(initial_leader, Duration::from_secs(10));
    assert!(published, "initial leader publishes aggregates");

    // a higher address joining makes the settled group start over
    group.add_new_node(late_node, 25);

    let published = group.wait_for_aggregate_from(late_node, Duration::from_secs(15));
    assert!(published, "late node with the highest address takes over");

    steps::sleep(1000);
    assert_eq!(group.latest_publisher(), Some(late_node));

    group.terminate();

    info!("Late joiner case finished");
}
