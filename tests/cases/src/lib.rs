//! # Election group test cases
//!
//! Scenario runs of whole node groups over the in-process network.

#[macro_use]
extern crate log;
pub mod cases;
mod steps;

pub use self::cases::smoke;
