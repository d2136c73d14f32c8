pub mod backend;
pub mod client;
pub mod error;
pub mod types;

pub use backend::MigrationBackend;
pub use client::{Client, DEFAULT_API_SERVER};
pub use error::{ApiError, Result};
pub use types::*;
