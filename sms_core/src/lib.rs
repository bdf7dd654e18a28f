pub mod domain;
pub mod database;
pub mod error;
pub mod graphql;

// Re-export commonly used types
pub use domain::*;
pub use error::*;

// Re-export external dependencies that consumers will need
pub use chrono;
pub use serde;
pub use uuid;

#[cfg(feature = "database")]
pub use database::*;