use crate::errors::{new_err, Result};
use crate::node::address::NodeAddress;

/// Result of a follower registration.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Registration {
    Added,
    AlreadyRegistered,
}

/// Leader's bounded list of registered followers for the current round.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FollowerRoster {
    capacity: usize,
    followers: Vec<NodeAddress>,
}

impl FollowerRoster {
    pub fn new(capacity: usize) -> FollowerRoster {
        FollowerRoster {
            capacity,
            followers: Vec::with_capacity(capacity),
        }
    }

    /// Appends the follower. Fails when the roster is full, even for a known follower.
    pub fn register(&mut self, follower: NodeAddress) -> Result<Registration> {
        if self.is_full() {
            return new_err(
                format!("Cannot register follower {}", follower),
                format!("roster is full ({} nodes)", self.capacity),
            );
        }

        if self.followers.contains(&follower) {
            return Ok(Registration::AlreadyRegistered);
        }

        self.followers.push(follower);
        Ok(Registration::Added)
    }

    pub fn is_full(&self) -> bool {
        self.followers.len() >= self.capacity
    }

    pub fn len(&self) -> usize {
        self.followers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.followers.is_empty()
    }

    pub fn followers(&self) -> &[NodeAddress] {
        &self.followers
    }
}
