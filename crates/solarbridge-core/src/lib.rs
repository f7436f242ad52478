//! solarbridge-core
//!
//! Pure domain types, storage key conventions and the assessment form rules.
//! No I/O: this is the shared vocabulary of the SolarBridge system.

pub mod error;
pub mod form;
pub mod keys;
pub mod models;
pub mod savings;
pub mod validation;
