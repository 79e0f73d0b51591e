use std::collections::BTreeMap;

use k8s_openapi::{
    api::{
        apps::v1::{Deployment, DeploymentSpec},
        core::v1::{Container, EnvVar, Namespace, PodSpec, PodTemplateSpec, ServiceAccount},
        rbac::v1::{ClusterRole, ClusterRoleBinding, PolicyRule, RoleRef, Subject},
    },
    apimachinery::pkg::apis::meta::v1::LabelSelector,
};
use kube::{core::ObjectMeta, CustomResourceExt};
use serde::Serialize;

use crate::{
    dns::ClusterDNS,
    labels::{app_labels, managed_labels, selector_labels},
    Error, Result,
};

/// Namespace the DNS operator runs in.
pub const DNS_OPERATOR_NAMESPACE: &str = "openshift-cluster-dns-operator";
const DNS_OPERATOR_APP: &str = "cluster-dns-operator";
const DNS_OPERATOR_NAME: &str = "Cluster DNS Operator";

/// Provides the manifests needed to run the DNS operator, keyed by file name.
pub trait OperatorAssetSource {
    /// Report the operator manifests.
    fn operator_asset_content(&self) -> Result<BTreeMap<String, Vec<u8>>>;
}

/// Renders the DNS operator manifests from their typed form.
#[derive(Debug, Clone, PartialEq)]
pub struct OperatorAssets {
    image: String,
    image_pull_policy: String,
}

impl Default for OperatorAssets {
    fn default() -> Self {
        Self {
            image: "quay.io/openshift/origin-cluster-dns-operator:latest".to_owned(),
            image_pull_policy: "IfNotPresent".to_owned(),
        }
    }
}

impl OperatorAssets {
    /// Modify the assets to run the operator from image
    pub fn with_image(self, image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            ..self
        }
    }

    fn namespace(&self) -> Namespace {
        Namespace {
            metadata: ObjectMeta {
                name: Some(DNS_OPERATOR_NAMESPACE.to_owned()),
                labels: managed_labels(),
                ..ObjectMeta::default()
            },
            ..Default::default()
        }
    }

    fn service_account(&self) -> ServiceAccount {
        ServiceAccount {
            metadata: operator_metadata(),
            ..Default::default()
        }
    }

    fn cluster_role(&self) -> ClusterRole {
        let rule = |api_group: &str, resources: &[&str]| PolicyRule {
            api_groups: Some(vec![api_group.to_owned()]),
            resources: Some(resources.iter().map(|r| (*r).to_owned()).collect()),
            verbs: vec!["*".to_owned()],
            ..Default::default()
        };
        ClusterRole {
            metadata: ObjectMeta {
                name: Some(DNS_OPERATOR_APP.to_owned()),
                labels: managed_labels(),
                ..ObjectMeta::default()
            },
            rules: Some(vec![
                rule("dns.openshift.io", &["*"]),
                rule(
                    "",
                    &["configmaps", "namespaces", "serviceaccounts", "services"],
                ),
                rule("apps", &["daemonsets"]),
                rule("rbac.authorization.k8s.io", &["clusterroles", "clusterrolebindings"]),
            ]),
            ..Default::default()
        }
    }

    fn cluster_role_binding(&self) -> ClusterRoleBinding {
        ClusterRoleBinding {
            metadata: ObjectMeta {
                name: Some(DNS_OPERATOR_APP.to_owned()),
                labels: managed_labels(),
                ..ObjectMeta::default()
            },
            role_ref: RoleRef {
                api_group: "rbac.authorization.k8s.io".to_owned(),
                kind: "ClusterRole".to_owned(),
                name: DNS_OPERATOR_APP.to_owned(),
            },
            subjects: Some(vec![Subject {
                kind: "ServiceAccount".to_owned(),
                name: DNS_OPERATOR_APP.to_owned(),
                namespace: Some(DNS_OPERATOR_NAMESPACE.to_owned()),
                ..Default::default()
            }]),
        }
    }

    fn deployment(&self) -> Deployment {
        Deployment {
            metadata: operator_metadata(),
            spec: Some(DeploymentSpec {
                replicas: Some(1),
                selector: LabelSelector {
                    match_labels: selector_labels(DNS_OPERATOR_APP),
                    ..Default::default()
                },
                template: PodTemplateSpec {
                    metadata: Some(ObjectMeta {
                        labels: app_labels(DNS_OPERATOR_APP),
                        ..Default::default()
                    }),
                    spec: Some(PodSpec {
                        service_account_name: Some(DNS_OPERATOR_APP.to_owned()),
                        containers: vec![Container {
                            name: DNS_OPERATOR_APP.to_owned(),
                            image: Some(self.image.to_owned()),
                            image_pull_policy: Some(self.image_pull_policy.to_owned()),
                            command: Some(vec!["cluster-dns-operator".to_owned()]),
                            env: Some(vec![EnvVar {
                                name: "OPERATOR_NAME".to_owned(),
                                value: Some(DNS_OPERATOR_APP.to_owned()),
                                ..Default::default()
                            }]),
                            ..Default::default()
                        }],
                        ..Default::default()
                    }),
                },
                ..Default::default()
            }),
            ..Default::default()
        }
    }
}

impl OperatorAssetSource for OperatorAssets {
    fn operator_asset_content(&self) -> Result<BTreeMap<String, Vec<u8>>> {
        Ok(BTreeMap::from_iter([
            ("00-namespace.yaml".to_owned(), to_yaml(&self.namespace())?),
            (
                "01-custom-resource-definition.yaml".to_owned(),
                to_yaml(&ClusterDNS::crd())?,
            ),
            (
                "02-service-account.yaml".to_owned(),
                to_yaml(&self.service_account())?,
            ),
            ("03-cluster-role.yaml".to_owned(), to_yaml(&self.cluster_role())?),
            (
                "04-cluster-role-binding.yaml".to_owned(),
                to_yaml(&self.cluster_role_binding())?,
            ),
            ("05-deployment.yaml".to_owned(), to_yaml(&self.deployment())?),
        ]))
    }
}

fn operator_metadata() -> ObjectMeta {
    ObjectMeta {
        name: Some(DNS_OPERATOR_APP.to_owned()),
        namespace: Some(DNS_OPERATOR_NAMESPACE.to_owned()),
        labels: app_labels(DNS_OPERATOR_APP),
        ..ObjectMeta::default()
    }
}

fn to_yaml(value: &impl Serialize) -> Result<Vec<u8>> {
    serde_yaml::to_string(value)
        .map(String::into_bytes)
        .map_err(|source| Error::Marshal {
            name: DNS_OPERATOR_NAME,
            source,
        })
}
