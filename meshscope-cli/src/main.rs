use clap::{Parser, Subcommand};
use log::{error, warn, LevelFilter};
use tokio_util::sync::CancellationToken;

use meshscope_client::{ClientError, InFlight, NodeClient, PumpEnd, TelemetryStream};
use meshscope_core::ignition::{dissoc_candidates, IgnitionAction, IgnitionRequest};
use meshscope_core::node_config::{validate_node_config, SENT_MESSAGE, VALID_MESSAGE};
use meshscope_core::status::StatusReport;
use meshscope_core::telemetry::{SeriesPalette, TelemetryRingBuffer};

mod config;
mod render;

use config::{Config, DEFAULT_CONFIG_PATH};

#[derive(Parser, Debug)]
#[command(name = "meshscope")]
#[command(about = "Diagnostics for a mesh node: status, topology scans and link stats")]
struct Args {
    /// Path to meshscope.toml
    #[arg(long, short = 'c', default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// Node API address (overrides config file)
    #[arg(long, short = 'a')]
    address: Option<String>,

    /// Log at debug level
    #[arg(long, short = 'v')]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the node status report
    Status,
    /// Show the current link table
    Links,
    /// Run a topology scan from one of the node's radios
    Scan { radio_mac: String },
    /// Follow live link statistics until Ctrl+C
    Stats {
        /// Stop after this many samples
        #[arg(long, short = 'n', value_parser = clap::value_parser!(u64).range(1..))]
        count: Option<u64>,
    },
    /// Associate a link
    Assoc { initiator: String, responder: String },
    /// Dissociate a link
    Dissoc { initiator: String, responder: String },
    /// Read, check or replace the node configuration
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Reboot the node and wait for it to come back
    Reboot {
        /// Return right after the reboot request
        #[arg(long)]
        no_wait: bool,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Print the node configuration
    Get,
    /// Check a configuration file is valid JSON
    Validate { file: String },
    /// Check and send a configuration file to the node
    Send { file: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    simple_logger::SimpleLogger::new().with_level(level).env().init()?;

    let mut cfg = config::load_config(&args.config)?;

    // CLI arg takes precedence over config
    if let Some(addr) = &args.address {
        cfg.node.address = config::resolve_address(addr);
    }

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted");
                cancel.cancel();
            }
        });
    }

    let client = NodeClient::new(&cfg.node.address);

    if let Err(e) = run(args.command, &client, &cfg, &cancel).await {
        error!("{}", e);
        std::process::exit(1);
    }

    Ok(())
}

async fn run(
    command: Command,
    client: &NodeClient,
    cfg: &Config,
    cancel: &CancellationToken,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Status => {
            let report = client.status_report().await?;
            print!("{}", render::render_status(&report));
        }
        Command::Links => {
            let dump = client.link_dump().await?;
            print!("{}", render::render_links(&dump));
        }
        Command::Scan { radio_mac } => {
            let report = client.status_report().await?;
            let radio_mac = scan_radio(&report, &radio_mac)?;
            let in_flight = InFlight::new();
            let outcome = client.topo_scan(radio_mac, &in_flight).await?;
            print!("{}", render::render_scan(&meshscope_core::present(&outcome)));
        }
        Command::Stats { count } => run_stats(client, cfg, cancel, count).await?,
        Command::Assoc {
            initiator,
            responder,
        } => run_ignition(client, IgnitionAction::Assoc, &initiator, &responder).await?,
        Command::Dissoc {
            initiator,
            responder,
        } => run_ignition(client, IgnitionAction::Dissoc, &initiator, &responder).await?,
        Command::Config(ConfigCommand::Get) => {
            println!("{}", client.node_config().await?);
        }
        Command::Config(ConfigCommand::Validate { file }) => {
            let draft = std::fs::read_to_string(&file)?;
            validate_node_config(&draft)?;
            println!("{}", VALID_MESSAGE);
        }
        Command::Config(ConfigCommand::Send { file }) => {
            let draft = std::fs::read_to_string(&file)?;
            client.set_node_config(&draft).await?;
            println!("{}", SENT_MESSAGE);
        }
        Command::Reboot { no_wait } => {
            client.reboot().await?;
            println!("Reboot command was sent.");

            if !no_wait {
                let poller = cfg.reboot.poller();
                match poller.wait_until_up(client, cancel).await {
                    Ok(_) => println!("Node is back up."),
                    Err(ClientError::Cancelled) => println!("Stopped waiting for node."),
                    Err(e) => return Err(e.into()),
                }
            }
        }
    }

    Ok(())
}

/// The radio to scan from, spelled the way the node reports it.
///
/// MACs are not re-validated here; the node's radio list is trusted and an
/// unlisted MAC is passed through unchanged.
fn scan_radio<'a>(
    report: &'a StatusReport,
    requested: &'a str,
) -> Result<&'a str, &'static str> {
    if !report.has_radios() {
        return Err("No radios reported by node (n/a).");
    }

    match report
        .radio_macs()
        .into_iter()
        .find(|mac| mac.eq_ignore_ascii_case(requested))
    {
        Some(mac) => Ok(mac),
        None => {
            warn!(
                "{} is not one of the node's radios ({})",
                requested,
                report.radio_macs().join(", ")
            );
            Ok(requested)
        }
    }
}

async fn run_stats(
    client: &NodeClient,
    cfg: &Config,
    cancel: &CancellationToken,
    count: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut buffer = TelemetryRingBuffer::new(cfg.telemetry.capacity);
    let mut palette = SeriesPalette::new(cfg.telemetry.palette_seed);
    let stream = TelemetryStream::connect(client).await?;

    // a local child so reaching `count` stops only this stream
    let stop = cancel.child_token();
    let mut received = 0u64;
    let end = stream
        .run(&mut buffer, &stop, |buffer| {
            if let Some(sample) = buffer.iter().last() {
                println!("{}", render::render_sample(sample));
            }
            received += 1;
            if count.is_some_and(|n| received >= n) {
                stop.cancel();
            }
        })
        .await;

    if end == PumpEnd::Closed {
        warn!("Node closed the link stats connection");
    }

    println!();
    print!("{}", render::render_stats_summary(&buffer, &mut palette));
    Ok(())
}

async fn run_ignition(
    client: &NodeClient,
    action: IgnitionAction,
    initiator: &str,
    responder: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let request = IgnitionRequest::validate(Some(action), Some(initiator), Some(responder))?;

    if action == IgnitionAction::Dissoc {
        let dump = client.link_dump().await?;
        if !action.is_available(&dump) {
            return Err("No links to dissociate.".into());
        }
        let candidates = dissoc_candidates(&dump, &request.initiator);
        if !candidates.contains(&request.responder.as_str()) {
            warn!(
                "{} has no link to {} (linked: {})",
                request.initiator,
                request.responder,
                candidates.join(", ")
            );
        }
    }

    match client.ignition(&request).await {
        Ok(_) => {
            println!("{}", request.sent_message());
            Ok(())
        }
        Err(e) => {
            println!("{}", request.failed_message());
            Err(e.into())
        }
    }
}
