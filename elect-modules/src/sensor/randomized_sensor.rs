use elect::{Sensor, SensorValue};
use rand::Rng;

/// Provides random readings within a range.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct RandomizedSensor {
    range_start: SensorValue,
    range_stop: SensorValue,
}

impl RandomizedSensor {
    /// Creates new RandomizedSensor with the half-open reading range.
    pub fn new(range_start: SensorValue, range_stop: SensorValue) -> RandomizedSensor {
        if range_start >= range_stop {
            panic!(
                "Invalid params: range_start : {}, range_stop : {}",
                range_start, range_stop
            )
        }
        RandomizedSensor {
            range_start,
            range_stop,
        }
    }
}

impl Sensor for RandomizedSensor {
    fn read(&self) -> SensorValue {
        let mut rng = rand::thread_rng();

        rng.gen_range(self.range_start, self.range_stop)
    }
}
