//! solarbridge-storage
//!
//! Persistence for assessments behind the [`store::AssessmentStore`] trait.
//! Backends: a flat-file directory, an S3 bucket, and an in-memory store.

pub mod client;
pub mod clock;
pub mod config;
pub mod credentials;
pub mod error;
pub mod file;
pub mod memory;
pub mod objects;
pub mod s3;
pub mod store;

pub use config::{StorageConfig, open_store};
pub use store::AssessmentStore;
