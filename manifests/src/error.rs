use std::io;

/// Result type returned by the manifest generators.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors produced while generating or loading manifests.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Neither a pod CIDR nor any cluster networks were configured.
    #[error("either pod CIDR or cluster networks must be specified")]
    MissingNetworking,
    /// Generate was called without a parent asset it depends on.
    #[error("{asset} asset is missing from the parents")]
    MissingDependency {
        /// Name of the missing asset.
        asset: &'static str,
    },
    /// An accessor was used before the asset was generated or loaded.
    #[error("{accessor} called before initialization")]
    Uninitialized {
        /// Name of the accessor.
        accessor: &'static str,
    },
    /// Rendering a manifest to YAML failed.
    #[error("failed to create {name} manifests from install config: {source}")]
    Marshal {
        /// Name of the asset being rendered.
        name: &'static str,
        /// Underlying YAML error.
        source: serde_yaml::Error,
    },
    /// Parsing a previously rendered manifest failed.
    #[error("failed to unmarshal {filename}: {source}")]
    Unmarshal {
        /// File that failed to parse.
        filename: String,
        /// Underlying YAML error.
        source: serde_yaml::Error,
    },
    /// Reading or writing a manifest failed.
    #[error("failed to access {filename}: {source}")]
    Io {
        /// File being accessed.
        filename: String,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// Error from an install config helper.
    #[error("App error: {source}")]
    App {
        /// Underlying error.
        #[from]
        source: anyhow::Error,
    },
}
