//! Helper methods only available for tests
use std::{collections::BTreeMap, io};

use clustergen_common::install_config::{
    ClusterNetworkEntry, InstallConfig, NetworkType, Networking,
};

use crate::asset::{File, FileFetcher};

/// A normal test install config
pub fn install_config() -> InstallConfig {
    InstallConfig {
        base_domain: "example.com".to_owned(),
        networking: Networking {
            network_type: NetworkType::OpenshiftSdn,
            service_cidr: "172.30.0.0/16".parse().unwrap(),
            pod_cidr: None,
            cluster_networks: vec![ClusterNetworkEntry {
                cidr: "10.128.0.0/14".parse().unwrap(),
                host_subnet_length: 9,
            }],
        },
    }
}

/// Modify an install config to have the expected networking
pub fn with_networking(networking: Networking) -> InstallConfig {
    InstallConfig {
        networking,
        ..install_config()
    }
}

/// Fetches files from memory, files without an entry are not found.
#[derive(Debug, Default)]
pub struct MemoryFetcher {
    files: BTreeMap<String, Vec<u8>>,
    errors: BTreeMap<String, io::ErrorKind>,
}

impl MemoryFetcher {
    /// Fetcher serving the given files
    pub fn from_files(files: &[File]) -> Self {
        Self {
            files: files
                .iter()
                .map(|f| (f.filename.clone(), f.data.clone()))
                .collect(),
            ..Default::default()
        }
    }
    /// Add or replace a file
    pub fn with_file(mut self, name: &str, data: impl Into<Vec<u8>>) -> Self {
        self.files.insert(name.to_owned(), data.into());
        self
    }
    /// Remove a file
    pub fn without_file(mut self, name: &str) -> Self {
        self.files.remove(name);
        self
    }
    /// Fail any fetch of name with kind
    pub fn with_error(mut self, name: &str, kind: io::ErrorKind) -> Self {
        self.errors.insert(name.to_owned(), kind);
        self
    }
}

impl FileFetcher for MemoryFetcher {
    fn fetch_by_name(&self, name: &str) -> io::Result<File> {
        if let Some(kind) = self.errors.get(name) {
            return Err(io::Error::from(*kind));
        }
        self.files
            .get(name)
            .map(|data| File::new(name, data.clone()))
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))
    }

    fn fetch_dir(&self, dir: &str) -> io::Result<Vec<File>> {
        if let Some(kind) = self.errors.get(dir) {
            return Err(io::Error::from(*kind));
        }
        // Directories are implicit, so a directory without files lists as empty.
        let prefix = format!("{dir}/");
        Ok(self
            .files
            .iter()
            .filter(|(name, _)| {
                name.strip_prefix(&prefix)
                    .is_some_and(|rest| !rest.contains('/'))
            })
            .map(|(name, data)| File::new(name.clone(), data.clone()))
            .collect())
    }
}
