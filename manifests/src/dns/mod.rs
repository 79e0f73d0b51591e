//! Dns is the cluster DNS operator bundle and the configuration derived from the install config.

// Export all spec types
mod spec;
pub use spec::*;

mod assets;
pub use assets::{OperatorAssetSource, OperatorAssets, DNS_OPERATOR_NAMESPACE};

mod generator;
pub use generator::{ClusterDnsOperator, DNS_CONFIG_FILENAME, DNS_OPERATOR_ASSET_DIR};
