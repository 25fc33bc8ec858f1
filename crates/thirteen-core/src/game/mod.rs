pub mod events;
pub mod schedule;
pub mod serialization;
pub mod session;
