//! Configuration for the service: command-line flags, environment variables and
//! the database connection pool.

pub mod options;
pub mod pool;
pub mod values;

pub use options::ServerOptions;
pub use pool::{create_lazy_pool, create_pool};
pub use values::{ConnectionUri, PoolSettings};
