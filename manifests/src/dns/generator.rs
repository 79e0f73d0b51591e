use std::io;

use clustergen_common::install_config::{cluster_dns_ip, InstallConfig};
use tracing::{debug, info};

use crate::{
    asset::{fetch_optional, Asset, Dependency, File, FileFetcher, Parents, WritableAsset},
    dns::{ClusterDNS, ClusterDnsSpec, OperatorAssetSource, OperatorAssets},
    Error, Result, DEFAULT_CONFIG_NAME,
};

/// Path of the ClusterDNS instance manifest.
pub const DNS_CONFIG_FILENAME: &str = "cluster-dns-operator-config.yml";
/// Directory holding the DNS operator manifests.
pub const DNS_OPERATOR_ASSET_DIR: &str = "cluster-dns-operator";

/// Generates the cluster-dns-operator manifests.
#[derive(Debug, Default)]
pub struct ClusterDnsOperator<S = OperatorAssets> {
    assets: S,
    config: Option<ClusterDNS>,
    file_list: Vec<File>,
}

impl ClusterDnsOperator {
    /// Create an asset using the bundled operator manifests
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S> ClusterDnsOperator<S> {
    /// Create an asset using operator manifests from assets
    pub fn with_assets(assets: S) -> Self {
        Self {
            assets,
            config: None,
            file_list: Vec::new(),
        }
    }

    /// Report the DNS config.
    pub fn cluster_dns(&self) -> Result<&ClusterDNS> {
        self.config.as_ref().ok_or(Error::Uninitialized {
            accessor: "ClusterDNS",
        })
    }
}

impl<S> Asset for ClusterDnsOperator<S>
where
    S: OperatorAssetSource,
{
    fn name(&self) -> &'static str {
        "Cluster DNS Operator"
    }

    fn dependencies(&self) -> Vec<Dependency> {
        vec![Dependency::InstallConfig]
    }

    #[tracing::instrument(skip_all)]
    fn generate(&mut self, parents: &Parents) -> Result<()> {
        let install_config = parents.install_config()?;
        let config = dns_config(install_config)?;

        let config_data = serde_yaml::to_string(&config).map_err(|source| Error::Marshal {
            name: self.name(),
            source,
        })?;
        debug!(?config.spec, "generated dns config");

        // BTreeMap iterates in key order so the output is reproducible.
        let mut file_list: Vec<File> = self
            .assets
            .operator_asset_content()?
            .into_iter()
            .map(|(name, data)| File::new(format!("{DNS_OPERATOR_ASSET_DIR}/{name}"), data))
            .collect();
        file_list.push(File::new(DNS_CONFIG_FILENAME, config_data));

        self.file_list = file_list;
        self.config = Some(config);
        Ok(())
    }
}

impl<S> WritableAsset for ClusterDnsOperator<S>
where
    S: OperatorAssetSource,
{
    fn files(&self) -> &[File] {
        &self.file_list
    }

    #[tracing::instrument(skip_all)]
    fn load(&mut self, fetcher: &dyn FileFetcher) -> Result<bool> {
        let Some(cfg_file) = fetch_optional(fetcher, DNS_CONFIG_FILENAME)? else {
            info!(file = DNS_CONFIG_FILENAME, "dns manifests not generated yet");
            return Ok(false);
        };
        // A missing or empty bundle dir both mean the operator manifests were never written.
        let mut file_list = match fetcher.fetch_dir(DNS_OPERATOR_ASSET_DIR) {
            Ok(files) if !files.is_empty() => files,
            Ok(_) => {
                info!(dir = DNS_OPERATOR_ASSET_DIR, "dns operator manifests are empty");
                return Ok(false);
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                info!(dir = DNS_OPERATOR_ASSET_DIR, "dns manifests not generated yet");
                return Ok(false);
            }
            Err(source) => {
                return Err(Error::Io {
                    filename: DNS_OPERATOR_ASSET_DIR.to_owned(),
                    source,
                })
            }
        };

        let config: ClusterDNS =
            serde_yaml::from_slice(&cfg_file.data).map_err(|source| Error::Unmarshal {
                filename: DNS_CONFIG_FILENAME.to_owned(),
                source,
            })?;

        file_list.push(cfg_file);
        self.file_list = file_list;
        self.config = Some(config);
        Ok(true)
    }
}

fn dns_config(install_config: &InstallConfig) -> Result<ClusterDNS> {
    let cluster_ip = cluster_dns_ip(install_config)?;
    Ok(ClusterDNS::new(
        DEFAULT_CONFIG_NAME,
        ClusterDnsSpec {
            cluster_ip: Some(cluster_ip.to_string()),
            cluster_domain: Some(install_config.base_domain.clone()),
        },
    ))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use anyhow::anyhow;
    use expect_test::expect;

    use tracing_test::traced_test;

    use super::*;
    use crate::asset::{
        test::{install_config, MemoryFetcher},
        write_files, DirFetcher,
    };

    // Operator manifests with keys out of order
    #[derive(Debug)]
    struct UnorderedAssets;
    impl OperatorAssetSource for UnorderedAssets {
        fn operator_asset_content(&self) -> Result<BTreeMap<String, Vec<u8>>> {
            Ok(BTreeMap::from_iter([
                ("b.yaml".to_owned(), b"b: 2\n".to_vec()),
                ("a.yaml".to_owned(), b"a: 1\n".to_vec()),
            ]))
        }
    }

    #[derive(Debug)]
    struct FailingAssets;
    impl OperatorAssetSource for FailingAssets {
        fn operator_asset_content(&self) -> Result<BTreeMap<String, Vec<u8>>> {
            Err(anyhow!("operator manifests unavailable").into())
        }
    }

    fn generate<S: OperatorAssetSource>(assets: S) -> Result<ClusterDnsOperator<S>> {
        let mut asset = ClusterDnsOperator::with_assets(assets);
        asset.generate(&Parents::with_install_config(install_config()))?;
        Ok(asset)
    }

    #[test]
    fn name_and_dependencies() {
        let asset = ClusterDnsOperator::new();
        assert_eq!(asset.name(), "Cluster DNS Operator");
        assert_eq!(asset.dependencies(), vec![Dependency::InstallConfig]);
    }

    #[test]
    fn dns_spec_from_install_config() {
        let asset = generate(OperatorAssets::default()).unwrap();
        assert_eq!(
            asset.cluster_dns().unwrap().spec,
            ClusterDnsSpec {
                cluster_ip: Some("172.30.0.10".to_owned()),
                cluster_domain: Some("example.com".to_owned()),
            }
        );
    }

    #[test]
    fn generate_files() {
        let asset = generate(OperatorAssets::default()).unwrap();
        expect![[r#"
            [
                "cluster-dns-operator/00-namespace.yaml",
                "cluster-dns-operator/01-custom-resource-definition.yaml",
                "cluster-dns-operator/02-service-account.yaml",
                "cluster-dns-operator/03-cluster-role.yaml",
                "cluster-dns-operator/04-cluster-role-binding.yaml",
                "cluster-dns-operator/05-deployment.yaml",
                "cluster-dns-operator-config.yml",
            ]
        "#]]
        .assert_debug_eq(
            &asset
                .files()
                .iter()
                .map(|f| f.filename.as_str())
                .collect::<Vec<_>>(),
        );

        let config = asset.files().last().unwrap();
        expect![[r#"
            apiVersion: dns.openshift.io/v1alpha1
            kind: ClusterDNS
            metadata:
              name: default
            spec:
              clusterIP: 172.30.0.10
              clusterDomain: example.com
        "#]]
        .assert_eq(std::str::from_utf8(&config.data).unwrap());
    }

    #[test]
    fn operator_files_sorted() {
        let asset = generate(UnorderedAssets).unwrap();
        assert_eq!(
            asset.files(),
            &[
                File::new("cluster-dns-operator/a.yaml", "a: 1\n"),
                File::new("cluster-dns-operator/b.yaml", "b: 2\n"),
                asset.files()[2].clone(),
            ]
        );
        assert_eq!(asset.files()[2].filename, DNS_CONFIG_FILENAME);
    }

    #[test]
    fn operator_assets_error() {
        let err = generate(FailingAssets).unwrap_err();
        assert_eq!(err.to_string(), "App error: operator manifests unavailable");
    }

    #[test]
    fn service_cidr_too_small() {
        let mut config = install_config();
        config.networking.service_cidr = "172.30.0.0/29".parse().unwrap();
        let mut asset = ClusterDnsOperator::new();
        let err = asset
            .generate(&Parents::with_install_config(config))
            .unwrap_err();
        assert!(matches!(err, Error::App { .. }), "{err}");
        assert!(asset.files().is_empty());
        assert!(asset.cluster_dns().is_err());
    }

    #[test]
    fn cluster_dns_before_generate() {
        let err = ClusterDnsOperator::new().cluster_dns().unwrap_err();
        assert_eq!(err.to_string(), "ClusterDNS called before initialization");
    }

    #[test]
    fn load_round_trip() {
        let generated = generate(UnorderedAssets).unwrap();
        let fetcher = MemoryFetcher::from_files(generated.files());

        let mut loaded = ClusterDnsOperator::with_assets(UnorderedAssets);
        assert!(loaded.load(&fetcher).unwrap());
        assert_eq!(
            loaded.cluster_dns().unwrap(),
            generated.cluster_dns().unwrap()
        );
        assert_eq!(loaded.files(), generated.files());
    }

    #[test]
    fn load_not_generated() {
        let generated = generate(UnorderedAssets).unwrap();

        let fetcher = MemoryFetcher::from_files(generated.files()).without_file(DNS_CONFIG_FILENAME);
        assert!(!ClusterDnsOperator::new().load(&fetcher).unwrap());

        let fetcher = MemoryFetcher::from_files(generated.files())
            .without_file("cluster-dns-operator/a.yaml")
            .without_file("cluster-dns-operator/b.yaml");
        assert!(!ClusterDnsOperator::new().load(&fetcher).unwrap());
    }

    #[test]
    fn load_written_manifests() {
        let dir = tempfile::tempdir().unwrap();
        let generated = generate(OperatorAssets::default()).unwrap();
        write_files(dir.path(), generated.files()).unwrap();

        let mut loaded = ClusterDnsOperator::new();
        assert!(loaded.load(&DirFetcher::new(dir.path())).unwrap());
        assert_eq!(
            loaded.cluster_dns().unwrap(),
            generated.cluster_dns().unwrap()
        );
        assert_eq!(loaded.files(), generated.files());
    }

    #[test]
    #[traced_test]
    fn load_empty_operator_dir() {
        let dir = tempfile::tempdir().unwrap();
        let generated = generate(OperatorAssets::default()).unwrap();
        let config = generated.files().last().unwrap();
        write_files(dir.path(), std::slice::from_ref(config)).unwrap();
        std::fs::create_dir(dir.path().join(DNS_OPERATOR_ASSET_DIR)).unwrap();

        let mut loaded = ClusterDnsOperator::new();
        assert!(!loaded.load(&DirFetcher::new(dir.path())).unwrap());
        assert!(loaded.files().is_empty());
        assert!(loaded.cluster_dns().is_err());
        assert!(logs_contain("dns operator manifests are empty"));

        // Same outcome when the files only live in memory
        let fetcher = MemoryFetcher::default().with_file(DNS_CONFIG_FILENAME, config.data.clone());
        assert!(!ClusterDnsOperator::new().load(&fetcher).unwrap());
    }

    #[test]
    fn load_operator_dir_error() {
        let generated = generate(UnorderedAssets).unwrap();
        let fetcher = MemoryFetcher::from_files(generated.files())
            .with_error(DNS_OPERATOR_ASSET_DIR, io::ErrorKind::PermissionDenied);
        let err = ClusterDnsOperator::new().load(&fetcher).unwrap_err();
        assert!(
            matches!(&err, Error::Io { filename, .. } if filename == DNS_OPERATOR_ASSET_DIR),
            "{err}"
        );
    }

    #[test]
    fn load_malformed_config() {
        let fetcher = MemoryFetcher::default()
            .with_file("cluster-dns-operator/a.yaml", "a: 1\n")
            .with_file(DNS_CONFIG_FILENAME, "spec: {clusterIP: [");
        let err = ClusterDnsOperator::new().load(&fetcher).unwrap_err();
        assert!(
            matches!(&err, Error::Unmarshal { filename, .. } if filename == DNS_CONFIG_FILENAME),
            "{err}"
        );
    }
}
