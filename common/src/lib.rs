//! Provides types and functions shared by the manifest generators and their tooling.
#![deny(missing_docs)]
pub mod install_config;
#[cfg(feature = "telemetry")]
pub mod telemetry;
