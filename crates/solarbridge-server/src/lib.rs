//! solarbridge-server
//!
//! HTTP front door for SolarBridge: accepts assessment submissions, lists
//! stored assessments, and wires storage and notifications together.

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;
pub mod telemetry;

pub use app::build_router;
pub use config::ServerConfig;
pub use state::AppState;
