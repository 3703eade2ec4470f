use elect::{Sensor, SensorValue};

/// Sensor always reporting the same reading.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct FixedSensor {
    value: SensorValue,
}

impl FixedSensor {
    pub fn new(value: SensorValue) -> FixedSensor {
        FixedSensor { value }
    }
}

impl Sensor for FixedSensor {
    fn read(&self) -> SensorValue {
        self.value
    }
}
