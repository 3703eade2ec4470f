pub mod late_joiner;
pub mod leader_failure;
pub mod single_node;
pub mod smoke;
