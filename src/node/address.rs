use std::net::Ipv6Addr;
use std::str::FromStr;

use crate::errors::{new_err, ElectError};

/// Network address of a node. Addresses are compared numerically: the highest
/// address observed during a settling round wins the leadership.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Display)]
#[display(fmt = "{}", _0)]
pub struct NodeAddress(Ipv6Addr);

impl From<Ipv6Addr> for NodeAddress {
    fn from(address: Ipv6Addr) -> Self {
        NodeAddress(address)
    }
}

impl From<u128> for NodeAddress {
    fn from(value: u128) -> Self {
        NodeAddress(Ipv6Addr::from(value))
    }
}

impl FromStr for NodeAddress {
    type Err = ElectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().parse::<Ipv6Addr>() {
            Ok(address) => Ok(NodeAddress(address)),
            Err(err) => new_err(format!("Invalid node address '{}'", s), err.to_string()),
        }
    }
}
