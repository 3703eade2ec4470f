//! Ready-made collaborators for the election node: an in-process broadcast
//! network and sensors.

#[macro_use]
extern crate log;
extern crate crossbeam_channel;
extern crate elect;

mod communication;
mod sensor;

pub use communication::inproc::inproc_network::{InProcNetwork, InProcTransport};
pub use sensor::fixed_sensor::FixedSensor;
pub use sensor::randomized_sensor::RandomizedSensor;
