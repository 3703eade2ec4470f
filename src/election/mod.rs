pub mod event;
pub mod fusion;
pub mod machine;
pub mod roster;

use crate::node::address::NodeAddress;
use fusion::SensorFusion;
use roster::FollowerRoster;

/// Election phase of the node. Each phase carries only the state valid in it.
#[derive(Clone, Debug, PartialEq, Display)]
pub enum ElectionPhase {
    /// Broadcasting own address, no peer seen since the last reset.
    #[display(fmt = "Candidate")]
    Candidate,

    /// Peer broadcasts seen; waiting for the highest address to stabilize.
    #[display(fmt = "AwaitingSettle (highest seen {})", highest_seen)]
    AwaitingSettle { highest_seen: NodeAddress },

    /// Registered with the leader, watching its liveness.
    #[display(fmt = "Follower of {}", leader)]
    Follower { leader: NodeAddress },

    /// Polls the roster and publishes the fused sensor estimate.
    #[display(fmt = "Leader of {} followers", "roster.len()")]
    Leader {
        roster: FollowerRoster,
        fusion: SensorFusion,
    },
}
