//! Application layer - the bulletin pipeline and its cache
//!
//! Turns a raw weather snapshot into spoken Spanish lines and keeps the
//! latest rendering in a single-flight, TTL-bounded cache. Port traits
//! describe what the infrastructure layer must supply.

pub mod clock;
pub mod error;
pub mod ports;
pub mod services;

pub use clock::{Clock, fixed_clock, system_clock};
pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
