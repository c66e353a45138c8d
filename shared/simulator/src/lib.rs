pub mod ai;
pub mod cannonball;
pub mod config;
pub mod error;
pub mod rng;
pub mod scenario;
pub mod schedule;
pub mod ship;
pub mod simulation;
pub mod snapshot;
pub mod target;

pub use config::Config;
pub use error::Error;
