//! Assets are the units of generated output.
//!
//! Each asset names the upstream assets it depends on, generates its state from them, and exposes
//! the resulting files. Writable assets can also reload their state from files written by an
//! earlier run.
use std::io;

use clustergen_common::install_config::InstallConfig;

use crate::{Error, Result};

mod fetch;
#[cfg(test)]
pub mod test;

pub use fetch::{write_files, DirFetcher};

/// A generated file, its path is relative to the asset root.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct File {
    /// Relative path of the file
    pub filename: String,
    /// Contents of the file
    pub data: Vec<u8>,
}

impl File {
    /// Create a new file
    pub fn new(filename: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            data: data.into(),
        }
    }
}

/// Upstream assets an asset can depend on.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Dependency {
    /// The user supplied install config
    InstallConfig,
}

impl Dependency {
    /// Human friendly name of the dependency
    pub fn name(&self) -> &'static str {
        match self {
            Dependency::InstallConfig => "Install Config",
        }
    }
}

/// Resolved upstream assets handed to [`Asset::generate`].
#[derive(Debug, Default, Clone)]
pub struct Parents {
    install_config: Option<InstallConfig>,
}

impl Parents {
    /// Parents with the install config resolved.
    pub fn with_install_config(install_config: InstallConfig) -> Self {
        Self {
            install_config: Some(install_config),
        }
    }

    /// Report the install config, fails if it was never resolved.
    pub fn install_config(&self) -> Result<&InstallConfig> {
        self.install_config
            .as_ref()
            .ok_or(Error::MissingDependency {
                asset: Dependency::InstallConfig.name(),
            })
    }
}

/// Generates state from its dependencies.
pub trait Asset {
    /// Human friendly name of the asset
    fn name(&self) -> &'static str;
    /// All of the assets directly needed to generate this asset.
    fn dependencies(&self) -> Vec<Dependency>;
    /// Generate the asset state from the resolved dependencies.
    fn generate(&mut self, parents: &Parents) -> Result<()>;
}

/// An asset whose state is written out as files.
pub trait WritableAsset: Asset {
    /// Files generated or loaded by the asset.
    fn files(&self) -> &[File];
    /// Load previously written files.
    ///
    /// Returns false when the files do not exist yet, which is not an error.
    fn load(&mut self, fetcher: &dyn FileFetcher) -> Result<bool>;
}

/// Reads files relative to the asset root.
pub trait FileFetcher {
    /// Fetch a single file by its relative path.
    fn fetch_by_name(&self, name: &str) -> io::Result<File>;
    /// Fetch every regular file directly inside dir, sorted by name.
    fn fetch_dir(&self, dir: &str) -> io::Result<Vec<File>>;
}

/// Fetch a file, mapping a missing file to None.
pub(crate) fn fetch_optional(fetcher: &dyn FileFetcher, name: &str) -> Result<Option<File>> {
    match fetcher.fetch_by_name(name) {
        Ok(file) => Ok(Some(file)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(Error::Io {
            filename: name.to_owned(),
            source,
        }),
    }
}
