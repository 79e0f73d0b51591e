//! Clustergen renders the cluster network and DNS operator manifests
#![deny(missing_docs)]

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};

use clustergen_common::install_config::InstallConfig;
use clustergen_manifests::{
    asset::{write_files, Asset, DirFetcher, Parents, WritableAsset},
    dns::{ClusterDnsOperator, OperatorAssets},
    network::Networking,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

/// Available Subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render all manifests from an install config
    Render(RenderOpts),
    /// Load previously rendered manifests and print what they describe
    Inspect(InspectOpts),
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::Render(_) => "render",
            Command::Inspect(_) => "inspect",
        }
    }
}

/// Options to Render command
#[derive(Args, Debug)]
pub struct RenderOpts {
    /// Path of the install config.
    #[arg(long, env = "CLUSTERGEN_INSTALL_CONFIG")]
    install_config: PathBuf,

    /// Directory the manifests are written to.
    #[arg(long, env = "CLUSTERGEN_DIR", default_value = ".")]
    dir: PathBuf,

    /// Image of the DNS operator, defaults to the upstream image.
    #[arg(long, env = "CLUSTERGEN_DNS_OPERATOR_IMAGE")]
    dns_operator_image: Option<String>,
}

/// Options to Inspect command
#[derive(Args, Debug)]
pub struct InspectOpts {
    /// Directory the manifests were written to.
    #[arg(long, env = "CLUSTERGEN_DIR", default_value = ".")]
    dir: PathBuf,
}

fn main() -> Result<()> {
    let args = Cli::parse();
    clustergen_common::telemetry::init()?;

    info!(command = args.command.name(), "starting clustergen");
    match args.command {
        Command::Render(opts) => render(opts)?,
        Command::Inspect(opts) => inspect(opts)?,
    }
    Ok(())
}

#[tracing::instrument]
fn render(opts: RenderOpts) -> Result<()> {
    let data = fs::read_to_string(&opts.install_config)
        .with_context(|| format!("failed to read {}", opts.install_config.display()))?;
    let parents = Parents::with_install_config(InstallConfig::from_yaml(&data)?);

    let mut operator_assets = OperatorAssets::default();
    if let Some(image) = opts.dns_operator_image {
        operator_assets = operator_assets.with_image(image);
    }

    let mut networking = Networking::new();
    let mut dns = ClusterDnsOperator::with_assets(operator_assets);
    let assets: [&mut dyn WritableAsset; 2] = [&mut networking, &mut dns];
    for asset in assets {
        asset.generate(&parents)?;
        write_files(&opts.dir, asset.files())?;
        info!(
            asset = asset.name(),
            files = asset.files().len(),
            "rendered manifests"
        );
    }
    Ok(())
}

#[tracing::instrument]
fn inspect(opts: InspectOpts) -> Result<()> {
    let fetcher = DirFetcher::new(&opts.dir);

    let mut networking = Networking::new();
    if networking.load(&fetcher)? {
        print!("{}", serde_yaml::to_string(&networking.cluster_network()?)?);
    } else {
        warn!(asset = networking.name(), "manifests not found");
    }

    let mut dns = ClusterDnsOperator::new();
    if dns.load(&fetcher)? {
        println!("---");
        print!("{}", serde_yaml::to_string(&dns.cluster_dns()?.spec)?);
    } else {
        warn!(asset = dns.name(), "manifests not found");
    }
    Ok(())
}
