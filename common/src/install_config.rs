//! Defines the install configuration consumed by the manifest generators.
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use anyhow::{anyhow, Context, Result};
use ipnet::IpNet;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Offset of the cluster DNS service address within the service CIDR.
pub const CLUSTER_DNS_HOST_INDEX: u32 = 10;

/// Cluster wide install configuration.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct InstallConfig {
    /// Base DNS domain of the cluster.
    pub base_domain: String,
    /// Describes the cluster network.
    pub networking: Networking,
}

impl InstallConfig {
    /// Parse an install configuration from its YAML form.
    pub fn from_yaml(data: &str) -> Result<Self> {
        serde_yaml::from_str(data).context("failed to parse install config")
    }
}

/// Networking section of the install configuration.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Networking {
    /// Network plugin deployed as the default network.
    #[serde(rename = "type")]
    pub network_type: NetworkType,
    /// Address block services are allocated from.
    #[serde(rename = "serviceCIDR")]
    pub service_cidr: IpNet,
    /// Legacy single pod address block.
    /// Only consulted when cluster_networks is empty.
    #[serde(rename = "podCIDR", default, skip_serializing_if = "Option::is_none")]
    pub pod_cidr: Option<IpNet>,
    /// Address blocks pods are allocated from.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cluster_networks: Vec<ClusterNetworkEntry>,
}

impl Networking {
    /// Report the pod CIDR if it is present and its network address is not unspecified.
    pub fn pod_cidr_specified(&self) -> Option<IpNet> {
        self.pod_cidr.filter(|cidr| !cidr.network().is_unspecified())
    }
}

/// A pod address block and the size of the per node subnets carved out of it.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ClusterNetworkEntry {
    /// Address block of the cluster network.
    pub cidr: IpNet,
    /// Number of host bits in each node subnet.
    pub host_subnet_length: u32,
}

/// Network plugins understood by the cluster network operator.
#[derive(Serialize, Deserialize, Debug, Default, PartialEq, Eq, Clone, Copy, JsonSchema)]
pub enum NetworkType {
    /// OpenShift SDN (default)
    #[default]
    #[serde(rename = "OpenshiftSDN")]
    OpenshiftSdn,
    /// OVN Kubernetes
    #[serde(rename = "OVNKubernetes")]
    OvnKubernetes,
    /// Calico
    Calico,
    /// Kuryr
    Kuryr,
    /// Raw, the operator does not manage the default network.
    Raw,
}

impl NetworkType {
    /// Returns the name the operator uses for the plugin
    pub fn name(&self) -> &str {
        match self {
            NetworkType::OpenshiftSdn => "OpenshiftSDN",
            NetworkType::OvnKubernetes => "OVNKubernetes",
            NetworkType::Calico => "Calico",
            NetworkType::Kuryr => "Kuryr",
            NetworkType::Raw => "Raw",
        }
    }
}

/// Address of the cluster DNS service, a fixed host within the service CIDR.
pub fn cluster_dns_ip(config: &InstallConfig) -> Result<IpAddr> {
    nth_host(&config.networking.service_cidr, CLUSTER_DNS_HOST_INDEX)
}

// Address n hosts past the network address of cidr.
fn nth_host(cidr: &IpNet, n: u32) -> Result<IpAddr> {
    let out_of_range = || anyhow!("host {n} is out of range for {cidr}");
    match cidr.trunc() {
        IpNet::V4(net) => {
            let host_bits = 32 - u32::from(net.prefix_len());
            if host_bits < 32 && u64::from(n) >= 1u64 << host_bits {
                return Err(out_of_range());
            }
            Ok(IpAddr::V4(Ipv4Addr::from(u32::from(net.network()) + n)))
        }
        IpNet::V6(net) => {
            let host_bits = 128 - u32::from(net.prefix_len());
            if host_bits < 128 && u128::from(n) >= 1u128 << host_bits {
                return Err(out_of_range());
            }
            Ok(IpAddr::V6(Ipv6Addr::from(
                u128::from(net.network()) + u128::from(n),
            )))
        }
    }
}
