use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Configuration of the cluster DNS operator.
#[derive(CustomResource, Serialize, Deserialize, Debug, Default, PartialEq, Clone, JsonSchema)]
#[kube(
    group = "dns.openshift.io",
    version = "v1alpha1",
    kind = "ClusterDNS",
    plural = "clusterdnses",
    derive = "PartialEq"
)]
#[serde(rename_all = "camelCase")]
pub struct ClusterDnsSpec {
    /// Address of the cluster DNS service, must be within the service CIDR.
    #[serde(rename = "clusterIP", default, skip_serializing_if = "Option::is_none")]
    pub cluster_ip: Option<String>,
    /// Base domain of the cluster.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_domain: Option<String>,
}
