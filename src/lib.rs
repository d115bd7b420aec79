pub mod auth;
pub mod config;
pub mod database;
pub mod dataset;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod schema;
pub mod sheets;
pub mod transform;

pub use error::{Stage, StageError, SyncError};
pub use pipeline::{RunReport, SyncPipeline};
