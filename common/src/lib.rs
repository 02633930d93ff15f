// Common library for the platform-independent work model shared by the
// translation layer and its consumers

pub mod capability;
pub mod config;
pub mod errors;
pub mod models;
pub mod telemetry;
