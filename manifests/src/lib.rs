//! Provides API for rendering the cluster network and DNS operator manifests.
#![warn(missing_docs)]

/// Asset module for the generate/load lifecycle shared by all manifests.
pub mod asset;
/// Dns module for the cluster DNS operator manifests.
pub mod dns;
/// Error module for failures surfaced by the generators.
mod error;
/// Labels module for managing resource labels.
pub(crate) mod labels;
/// Network module for the cluster network operator manifests.
pub mod network;

pub use error::{Error, Result};

/// Name used for the single instance of each cluster scoped configuration.
const DEFAULT_CONFIG_NAME: &str = "default";
