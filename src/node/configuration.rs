use std::time::Duration;

use crate::communication::{InboundEventChannels, Sensor, Transport};
use crate::errors::{new_err, Result};

/// Delays of the election timers and the collaborator communication bound.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct NodeTimings {
    /// Own address broadcast period (candidate) and follower polling period (leader).
    pub message_interval: Duration,

    /// Follower gives up on a silent leader after this delay.
    pub leader_timeout: Duration,

    /// Highest seen address must stay unchanged this long before settling.
    pub leader_threshold: Duration,

    /// Timeout for event delivery and peer requests.
    pub communication_timeout: Duration,
}

impl Default for NodeTimings {
    fn default() -> Self {
        NodeTimings {
            message_interval: Duration::from_millis(1000),
            leader_timeout: Duration::from_millis(4000),
            leader_threshold: Duration::from_millis(3000),
            communication_timeout: Duration::from_millis(1000),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeLimits {
    /// Maximum number of followers a leader accepts.
    pub max_nodes: usize,

    /// Smoothing weight of the sensor average: the newest sample counts 1/w.
    pub fusion_weight: f32,

    pub event_queue_capacity: usize,
}

impl Default for NodeLimits {
    fn default() -> Self {
        NodeLimits {
            max_nodes: 10,
            fusion_weight: 16.0,
            event_queue_capacity: 10,
        }
    }
}

impl NodeLimits {
    pub fn validate(&self) -> Result<()> {
        if self.max_nodes == 0 {
            return new_err("Invalid node limits".to_string(), "max_nodes = 0".to_string());
        }
        if !(self.fusion_weight >= 1.0) {
            return new_err(
                "Invalid node limits".to_string(),
                format!("fusion_weight = {} (must be >= 1)", self.fusion_weight),
            );
        }
        if self.event_queue_capacity == 0 {
            return new_err(
                "Invalid node limits".to_string(),
                "event_queue_capacity = 0".to_string(),
            );
        }

        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct NodeConfiguration<Tr, Sn>
where
    Tr: Transport + InboundEventChannels,
    Sn: Sensor,
{
    pub transport: Tr,
    pub sensor: Sn,
    pub timings: NodeTimings,
    pub limits: NodeLimits,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_limits_are_valid() {
        assert!(NodeLimits::default().validate().is_ok());
    }

    #[test]
    fn invalid_limits_rejected() {
        let no_nodes = NodeLimits {
            max_nodes: 0,
            ..NodeLimits::default()
        };
        let no_weight = NodeLimits {
            fusion_weight: 0.5,
            ..NodeLimits::default()
        };
        let nan_weight = NodeLimits {
            fusion_weight: std::f32::NAN,
            ..NodeLimits::default()
        };

        assert!(no_nodes.validate().is_err());
        assert!(no_weight.validate().is_err());
        assert!(nan_weight.validate().is_err());
    }
}
