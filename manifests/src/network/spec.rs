//! Place all spec types into a single module so they can be used as a lightweight dependency
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub use clustergen_common::install_config::NetworkType;

/// Configuration of the cluster network operator.
/// A cluster has a single instance named `default`.
#[derive(CustomResource, Serialize, Deserialize, Debug, Default, PartialEq, Clone, JsonSchema)]
#[kube(
    group = "networkoperator.openshift.io",
    version = "v1",
    kind = "NetworkConfig",
    plural = "networkconfigs",
    derive = "PartialEq"
)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfigSpec {
    /// Address block services are allocated from.
    pub service_network: String,
    /// Address blocks pods are allocated from.
    pub cluster_networks: Vec<ClusterNetwork>,
    /// Describes the plugin providing the default network.
    pub default_network: DefaultNetworkDefinition,
}

/// A pod address block and the size of the per node subnets carved out of it.
#[derive(Serialize, Deserialize, Debug, Default, PartialEq, Clone, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClusterNetwork {
    /// Address block in CIDR notation
    pub cidr: String,
    /// Number of host bits in each node subnet.
    pub host_subnet_length: u32,
}

/// Describes the plugin providing the default network and its plugin specific settings.
#[derive(Serialize, Deserialize, Debug, Default, PartialEq, Clone, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DefaultNetworkDefinition {
    /// Network plugin type
    #[serde(rename = "type")]
    pub network_type: NetworkType,
    /// Settings of the OpenShift SDN plugin.
    /// Only meaningful when the type is OpenshiftSDN.
    #[serde(
        rename = "openshiftSDNConfig",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub openshift_sdn_config: Option<OpenshiftSdnConfig>,
}

/// Settings of the OpenShift SDN plugin.
/// Anything left unset is defaulted by the operator.
#[derive(Serialize, Deserialize, Debug, Default, PartialEq, Clone, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OpenshiftSdnConfig {
    /// Isolation mode of the SDN
    pub mode: SdnMode,
    /// UDP port used for VXLAN traffic
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vxlan_port: Option<u32>,
    /// MTU of the pod network
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mtu: Option<u32>,
    /// Use an Open vSwitch managed outside the operator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_external_openvswitch: Option<bool>,
}

/// SdnMode is the discrete set of isolation modes of the OpenShift SDN
#[derive(Serialize, Deserialize, Debug, Default, PartialEq, Eq, Clone, Copy, JsonSchema)]
pub enum SdnMode {
    /// Flat network, every pod can reach every other pod
    Subnet,
    /// Isolate traffic by project
    Multitenant,
    /// Isolate traffic with NetworkPolicy objects (default)
    #[default]
    NetworkPolicy,
}

/// Network ranges of the cluster, for consumers that are not network plugin aware.
#[derive(Serialize, Deserialize, Debug, Default, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ClusterNetworkingConfig {
    /// Address ranges services are allocated from.
    pub services: NetworkRanges,
    /// Address ranges pods are allocated from.
    pub pods: NetworkRanges,
}

/// A list of address blocks.
#[derive(Serialize, Deserialize, Debug, Default, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NetworkRanges {
    /// Address blocks in CIDR notation
    pub cidr_blocks: Vec<String>,
}
