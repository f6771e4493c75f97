//! Domain layer for meteovoz
//!
//! Contains the weather observation model, the fixed day-part partition,
//! WMO weather code descriptions and the cache entry that the rest of the
//! workspace passes around. This layer performs no I/O.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
