#![forbid(unsafe_code)]

//! Event bus carrying controller events to any number of host subscribers.

mod bus;

pub use bus::EventBus;
