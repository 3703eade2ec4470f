use crate::communication::{AggregateValue, SensorValue};

/// Leader-side exponentially weighted average of the follower sensor readings.
#[derive(Clone, Debug, PartialEq)]
pub struct SensorFusion {
    weight: f32,
    estimate: f32,
    samples_received: usize,
}

impl SensorFusion {
    pub fn new(weight: f32) -> SensorFusion {
        SensorFusion {
            weight,
            estimate: 0.0,
            samples_received: 0,
        }
    }

    /// Starts a polling cycle: the local reading becomes the current estimate.
    pub fn begin_cycle(&mut self, local_value: SensorValue) {
        self.estimate = local_value as f32;
        self.samples_received = 0;
    }

    /// estimate = ((w-1)/w) * estimate + (1/w) * value
    pub fn add_sample(&mut self, value: SensorValue) {
        let w = self.weight;
        self.estimate = ((w - 1.0) / w) * self.estimate + (1.0 / w) * value as f32;
        self.samples_received += 1;
    }

    pub fn samples_received(&self) -> usize {
        self.samples_received
    }

    pub fn estimate(&self) -> f32 {
        self.estimate
    }

    /// Fused value as published to the group, truncated toward zero.
    pub fn aggregate(&self) -> AggregateValue {
        self.estimate as AggregateValue
    }

    pub fn clear(&mut self) {
        self.estimate = 0.0;
        self.samples_received = 0;
    }
}
