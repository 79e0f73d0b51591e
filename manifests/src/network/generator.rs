use clustergen_common::install_config::{self, NetworkType};
use tracing::{debug, info};

use crate::{
    asset::{fetch_optional, Asset, Dependency, File, FileFetcher, Parents, WritableAsset},
    network::{
        ClusterNetwork, ClusterNetworkingConfig, DefaultNetworkDefinition, NetworkConfig,
        NetworkConfigSpec, NetworkRanges, OpenshiftSdnConfig, SdnMode,
    },
    Error, Result, DEFAULT_CONFIG_NAME,
};

/// Path of the NetworkConfig CRD manifest.
pub const NETWORK_CRD_FILENAME: &str = "manifests/cluster-network-01-crd.yml";
/// Path of the NetworkConfig instance manifest.
pub const NETWORK_CONFIG_FILENAME: &str = "manifests/cluster-network-02-config.yml";

/// Host subnet length of the cluster network synthesized from a legacy pod CIDR.
pub const DEFAULT_HOST_SUBNET_LENGTH: u32 = 9;

/// CRD of the NetworkConfig resource.
///
/// Other operators have their CRD applied by the version operator, but the network operator
/// configuration is created at install time so its CRD must be applied first.
pub const NETWORK_CONFIG_CRD: &str = r#"apiVersion: apiextensions.k8s.io/v1beta1
kind: CustomResourceDefinition
metadata:
  name: networkconfigs.networkoperator.openshift.io
spec:
  group: networkoperator.openshift.io
  names:
    kind: NetworkConfig
    listKind: NetworkConfigList
    plural: networkconfigs
    singular: networkconfig
  scope: Cluster
  versions:
    - name: v1
      served: true
      storage: true
"#;

/// Generates the cluster-network-*.yml manifests.
#[derive(Debug, Default)]
pub struct Networking {
    config: Option<NetworkConfig>,
    file_list: Vec<File>,
}

impl Networking {
    /// Create an asset that has not been generated or loaded yet
    pub fn new() -> Self {
        Self::default()
    }

    /// The network config, if generated or loaded.
    pub fn config(&self) -> Option<&NetworkConfig> {
        self.config.as_ref()
    }

    /// Report the network ranges of the cluster.
    ///
    /// Used by consumers that describe the cluster in general terms and should not need to be
    /// aware of the network plugin.
    pub fn cluster_network(&self) -> Result<ClusterNetworkingConfig> {
        let config = self.config.as_ref().ok_or(Error::Uninitialized {
            accessor: "ClusterNetwork",
        })?;

        Ok(ClusterNetworkingConfig {
            services: NetworkRanges {
                cidr_blocks: vec![config.spec.service_network.clone()],
            },
            pods: NetworkRanges {
                cidr_blocks: config
                    .spec
                    .cluster_networks
                    .iter()
                    .map(|cn| cn.cidr.clone())
                    .collect(),
            },
        })
    }
}

impl Asset for Networking {
    fn name(&self) -> &'static str {
        "Network Config"
    }

    fn dependencies(&self) -> Vec<Dependency> {
        vec![Dependency::InstallConfig]
    }

    #[tracing::instrument(skip_all)]
    fn generate(&mut self, parents: &Parents) -> Result<()> {
        let net_config = &parents.install_config()?.networking;

        let config = NetworkConfig::new(
            DEFAULT_CONFIG_NAME,
            NetworkConfigSpec {
                service_network: net_config.service_cidr.trunc().to_string(),
                cluster_networks: cluster_networks(net_config)?,
                default_network: default_network(net_config.network_type),
            },
        );

        let config_data = serde_yaml::to_string(&config).map_err(|source| Error::Marshal {
            name: self.name(),
            source,
        })?;
        debug!(?config.spec, "generated network config");

        self.file_list = vec![
            File::new(NETWORK_CRD_FILENAME, NETWORK_CONFIG_CRD),
            File::new(NETWORK_CONFIG_FILENAME, config_data),
        ];
        self.config = Some(config);
        Ok(())
    }
}

impl WritableAsset for Networking {
    fn files(&self) -> &[File] {
        &self.file_list
    }

    #[tracing::instrument(skip_all)]
    fn load(&mut self, fetcher: &dyn FileFetcher) -> Result<bool> {
        let Some(crd_file) = fetch_optional(fetcher, NETWORK_CRD_FILENAME)? else {
            info!(file = NETWORK_CRD_FILENAME, "network manifests not generated yet");
            return Ok(false);
        };
        let Some(cfg_file) = fetch_optional(fetcher, NETWORK_CONFIG_FILENAME)? else {
            info!(file = NETWORK_CONFIG_FILENAME, "network manifests not generated yet");
            return Ok(false);
        };

        let config: NetworkConfig =
            serde_yaml::from_slice(&cfg_file.data).map_err(|source| Error::Unmarshal {
                filename: NETWORK_CONFIG_FILENAME.to_owned(),
                source,
            })?;

        self.file_list = vec![crd_file, cfg_file];
        self.config = Some(config);
        Ok(true)
    }
}

// Determine the pod address space.
// The legacy pod CIDR is only used when no cluster networks are given.
fn cluster_networks(net_config: &install_config::Networking) -> Result<Vec<ClusterNetwork>> {
    if !net_config.cluster_networks.is_empty() {
        Ok(net_config
            .cluster_networks
            .iter()
            .map(|cn| ClusterNetwork {
                cidr: cn.cidr.to_string(),
                host_subnet_length: cn.host_subnet_length,
            })
            .collect())
    } else if let Some(pod_cidr) = net_config.pod_cidr_specified() {
        Ok(vec![ClusterNetwork {
            cidr: pod_cidr.trunc().to_string(),
            host_subnet_length: DEFAULT_HOST_SUBNET_LENGTH,
        }])
    } else {
        Err(Error::MissingNetworking)
    }
}

// Add any network plugin specific defaults here.
fn default_network(network_type: NetworkType) -> DefaultNetworkDefinition {
    let openshift_sdn_config = match network_type {
        // Default to network policy, the operator provides all other defaults.
        NetworkType::OpenshiftSdn => Some(OpenshiftSdnConfig {
            mode: SdnMode::NetworkPolicy,
            ..Default::default()
        }),
        _ => None,
    };
    DefaultNetworkDefinition {
        network_type,
        openshift_sdn_config,
    }
}
