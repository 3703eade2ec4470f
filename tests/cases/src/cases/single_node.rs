use crate::steps;

pub fn run() {
    let group = steps::group::start_initial_group(vec![(steps::address("fe80::1"), 7)]);

    steps::sleep(3000);

    // a lone node never settles, so nothing gets published
    assert_eq!(group.latest_publisher(), None);

    group.terminate();

    info!("Single node case finished");
}
