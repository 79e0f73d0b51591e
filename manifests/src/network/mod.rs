//! Network is the cluster network operator configuration derived from the install config.

// Export all spec types
mod spec;
pub use spec::*;

mod generator;
pub use generator::{
    Networking, DEFAULT_HOST_SUBNET_LENGTH, NETWORK_CONFIG_CRD, NETWORK_CONFIG_FILENAME,
    NETWORK_CRD_FILENAME,
};
