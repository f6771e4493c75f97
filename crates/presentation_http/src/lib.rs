//! meteovoz HTTP presentation layer
//!
//! Serves the cached voice bulletin, a forced refresh and health endpoints.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod state;

pub use error::{ApiError, RefreshResponse};
pub use routes::create_router;
pub use server::serve;
pub use state::AppState;
