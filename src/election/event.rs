use crate::communication::SensorValue;
use crate::errors::{new_err, Result};
use crate::node::address::NodeAddress;
use crate::timers::TimerId;

/// Message type tags understood by the election node.
pub mod tags {
    pub const INTERVAL_TICK: u16 = 0x4601;
    pub const BROADCAST: u16 = 0x4602;
    pub const LEADER_ALIVE: u16 = 0x4603;
    pub const LEADER_TIMEOUT: u16 = 0x4604;
    pub const NODE_REGISTRATION: u16 = 0x4605;
    pub const SENSOR_VALUE: u16 = 0x4606;
    pub const LEADER_THRESHOLD: u16 = 0x4607;
}

/// Tagged message as enqueued by a producer. The payload is textual
/// (an address or a sensor reading) and is validated on decoding.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Display)]
#[display(fmt = "tag={:#x} payload='{}'", tag, payload)]
pub struct RawEvent {
    pub tag: u16,
    pub payload: String,
}

impl RawEvent {
    pub fn new(tag: u16, payload: String) -> RawEvent {
        RawEvent { tag, payload }
    }

    pub fn broadcast(address: &NodeAddress) -> RawEvent {
        RawEvent::new(tags::BROADCAST, address.to_string())
    }

    pub fn node_registration(address: &NodeAddress) -> RawEvent {
        RawEvent::new(tags::NODE_REGISTRATION, address.to_string())
    }

    pub fn sensor_value(value: SensorValue) -> RawEvent {
        RawEvent::new(tags::SENSOR_VALUE, value.to_string())
    }

    pub fn leader_alive() -> RawEvent {
        RawEvent::new(tags::LEADER_ALIVE, String::new())
    }
}

/// Every event the election state machine reacts to.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Display)]
pub enum ElectionEvent {
    #[display(fmt = "interval tick")]
    IntervalTick,
    #[display(fmt = "broadcast from {}", _0)]
    Broadcast(NodeAddress),
    #[display(fmt = "leader alive")]
    LeaderAlive,
    #[display(fmt = "leader timeout")]
    LeaderTimeout,
    #[display(fmt = "registration from {}", _0)]
    NodeRegistration(NodeAddress),
    #[display(fmt = "sensor value {}", _0)]
    SensorValue(SensorValue),
    #[display(fmt = "leader threshold")]
    LeaderThreshold,
}

impl ElectionEvent {
    /// Decodes a producer message. Unknown tags and malformed payloads are rejected.
    pub fn decode(raw: &RawEvent) -> Result<ElectionEvent> {
        let event = match raw.tag {
            tags::INTERVAL_TICK => ElectionEvent::IntervalTick,
            tags::BROADCAST => ElectionEvent::Broadcast(raw.payload.parse()?),
            tags::LEADER_ALIVE => ElectionEvent::LeaderAlive,
            tags::LEADER_TIMEOUT => ElectionEvent::LeaderTimeout,
            tags::NODE_REGISTRATION => ElectionEvent::NodeRegistration(raw.payload.parse()?),
            tags::SENSOR_VALUE => match raw.payload.trim().parse::<SensorValue>() {
                Ok(value) => ElectionEvent::SensorValue(value),
                Err(err) => {
                    return new_err(
                        format!("Invalid sensor value '{}'", raw.payload),
                        err.to_string(),
                    )
                }
            },
            tags::LEADER_THRESHOLD => ElectionEvent::LeaderThreshold,
            unknown => return new_err(format!("Unknown event tag {:#x}", unknown), String::new()),
        };

        Ok(event)
    }
}

impl From<TimerId> for ElectionEvent {
    fn from(id: TimerId) -> Self {
        match id {
            TimerId::Interval => ElectionEvent::IntervalTick,
            TimerId::LeaderTimeout => ElectionEvent::LeaderTimeout,
            TimerId::LeaderThreshold => ElectionEvent::LeaderThreshold,
        }
    }
}
