//! The HTTP binding of the user administration backend.

pub mod error;
pub mod payloads;
pub mod resources;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::AppState;
