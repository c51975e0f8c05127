//! FEDNS Command Line Interface
//!
//! Resolves dotted names across the federation hierarchy and registers new
//! TLDs, domains, and assets with the owning networks.

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{Args, Parser, Subcommand, ValueEnum};
use fedns_net::{NetworkConnector, RoundRobinSelector};
use fedns_resolver::{DnsResolver, Registry, Resolution, Signer};
use fedns_rpc::{HttpDescriptorSource, HttpDialer};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "fedns")]
#[command(about = "Resolve and register names across a federation of networks", long_about = None)]
#[command(version)]
struct Cli {
    /// URL of the root network descriptor document
    #[arg(
        long,
        global = true,
        env = "FEDNS_ROOT_SPEC_URL",
        default_value = "http://127.0.0.1:3000/json/rootSpec.json"
    )]
    root_spec_url: String,

    /// Strategy for picking entry points while dialing
    #[arg(long, global = true, value_enum, default_value = "random")]
    entry_selection: EntrySelection,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum EntrySelection {
    Random,
    RoundRobin,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a name to a descriptor pointer or asset record
    Resolve(ResolveCommand),
    /// Register a label at the appropriate hierarchy level
    Register {
        #[command(subcommand)]
        action: RegisterCommands,
    },
}

#[derive(Args)]
struct ResolveCommand {
    /// Dotted name, optionally suffixed with /asset/<id>
    name: String,

    /// Issue N concurrent resolutions and report the latency spread
    #[arg(long, value_name = "N")]
    parallel: Option<usize>,
}

#[derive(Subcommand)]
enum RegisterCommands {
    /// Register a top-level label in the root network
    Tld {
        /// Top-level label to claim
        label: String,
        /// URL of the TLD network's descriptor document
        spec_url: String,
        #[command(flatten)]
        signer: SignerArgs,
    },
    /// Register a domain in its TLD network
    Domain {
        /// Full dotted domain name
        domain: String,
        /// URL of the target network's descriptor document
        spec_url: String,
        #[command(flatten)]
        signer: SignerArgs,
    },
    /// Create an asset on a domain's target network
    Asset {
        /// Domain whose target network will host the asset
        domain: String,
        /// Numeric asset identifier
        asset_id: u32,
        /// Minimum balance for the asset
        min_balance: u128,
        #[command(flatten)]
        signer: SignerArgs,
    },
}

#[derive(Args)]
struct SignerArgs {
    /// Seed phrase of the signing account
    #[arg(long, env = "FEDNS_PHRASE", hide_env_values = true)]
    phrase: String,
}

fn parse_cli() -> Cli {
    match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => std::process::exit(0),
                _ => std::process::exit(1),
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = parse_cli();

    let dialer = Arc::new(HttpDialer::new().context("failed to build the HTTP dialer")?);
    let connector = NetworkConnector::new(dialer);
    let connector = Arc::new(match cli.entry_selection {
        EntrySelection::Random => connector,
        EntrySelection::RoundRobin => connector.with_selector(Box::new(RoundRobinSelector)),
    });
    let descriptors =
        Arc::new(HttpDescriptorSource::new().context("failed to build the descriptor fetcher")?);

    match cli.command {
        Commands::Resolve(command) => {
            let resolver = Arc::new(DnsResolver::new(
                connector,
                descriptors,
                cli.root_spec_url.clone(),
            ));
            resolver
                .init()
                .await
                .with_context(|| format!("could not load root descriptor {}", cli.root_spec_url))?;
            match command.parallel {
                None => resolve_once(&resolver, &command.name).await?,
                Some(count) => resolve_many(resolver, &command.name, count).await?,
            }
        }
        Commands::Register { action } => register(connector, descriptors, &cli.root_spec_url, action).await?,
    }

    Ok(())
}

async fn resolve_once(resolver: &DnsResolver, name: &str) -> Result<()> {
    let started = Instant::now();
    let resolution = resolver
        .resolve(name)
        .await
        .with_context(|| format!("could not resolve {name}"))?;
    print_resolution(name, &resolution)?;
    info!(elapsed_ms = started.elapsed().as_millis() as u64, "resolved");
    Ok(())
}

/// Fire `count` concurrent resolutions of the same name and report the
/// per-call latency spread.
async fn resolve_many(resolver: Arc<DnsResolver>, name: &str, count: usize) -> Result<()> {
    let calls = (0..count.max(1)).map(|_| {
        let resolver = resolver.clone();
        let name = name.to_string();
        async move {
            let started = Instant::now();
            let outcome = resolver.resolve(&name).await;
            (outcome, started.elapsed())
        }
    });

    let results = futures::future::join_all(calls).await;

    let mut latencies = Vec::with_capacity(results.len());
    let mut first = None;
    let mut failures = 0usize;
    for (outcome, elapsed) in results {
        match outcome {
            Ok(resolution) => {
                latencies.push(elapsed);
                first.get_or_insert(resolution);
            }
            Err(_) => failures += 1,
        }
    }

    let resolution = first.with_context(|| format!("could not resolve {name}"))?;
    print_resolution(name, &resolution)?;

    let mean = latencies.iter().sum::<Duration>() / latencies.len() as u32;
    let min = latencies.iter().min().copied().unwrap_or_default();
    let max = latencies.iter().max().copied().unwrap_or_default();
    println!(
        "{} calls: min {:.3} ms, mean {:.3} ms, max {:.3} ms, {} failed",
        latencies.len(),
        min.as_secs_f64() * 1e3,
        mean.as_secs_f64() * 1e3,
        max.as_secs_f64() * 1e3,
        failures
    );
    Ok(())
}

fn print_resolution(name: &str, resolution: &Resolution) -> Result<()> {
    match resolution {
        Resolution::Pointer(pointer) => {
            println!("target descriptor for {name}: {pointer}");
        }
        Resolution::Asset(record) => {
            println!("asset record for {name}:");
            println!("{}", serde_json::to_string_pretty(record)?);
        }
    }
    Ok(())
}

async fn register(
    connector: Arc<NetworkConnector>,
    descriptors: Arc<fedns_rpc::HttpDescriptorSource>,
    root_spec_url: &str,
    action: RegisterCommands,
) -> Result<()> {
    match action {
        RegisterCommands::Tld {
            label,
            spec_url,
            signer,
        } => {
            let registry = Registry::new(
                connector,
                descriptors,
                root_spec_url,
                Signer::from_phrase(&signer.phrase),
            );
            registry
                .register_tld(&label, &spec_url)
                .await
                .with_context(|| format!("could not register TLD {label}"))?;
            println!("registered TLD {label} in the root network");
        }
        RegisterCommands::Domain {
            domain,
            spec_url,
            signer,
        } => {
            let registry = Registry::new(
                connector,
                descriptors,
                root_spec_url,
                Signer::from_phrase(&signer.phrase),
            );
            registry
                .register_domain(&domain, &spec_url)
                .await
                .with_context(|| format!("could not register domain {domain}"))?;
            println!("registered domain {domain} in its TLD network");
        }
        RegisterCommands::Asset {
            domain,
            asset_id,
            min_balance,
            signer,
        } => {
            let registry = Registry::new(
                connector,
                descriptors,
                root_spec_url,
                Signer::from_phrase(&signer.phrase),
            );
            registry
                .register_asset(&domain, asset_id, min_balance)
                .await
                .with_context(|| format!("could not create asset {asset_id} under {domain}"))?;
            println!("created asset {asset_id} on the target network of {domain}");
        }
    }
    Ok(())
}
