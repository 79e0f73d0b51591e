use anyhow::Result;
use kube::CustomResourceExt;

use clustergen_manifests::dns::ClusterDNS;
use clustergen_manifests::network::NetworkConfig;

fn main() -> Result<()> {
    print!("{}", serde_yaml::to_string(&NetworkConfig::crd())?);
    println!("---");
    print!("{}", serde_yaml::to_string(&ClusterDNS::crd())?);
    Ok(())
}
