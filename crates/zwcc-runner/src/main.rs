//! Command line for the command-class framework.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;
use zwcc_command_classes::RequestFlags;
use zwcc_runner::{load_network, Driver, SimulatedNetwork};
use zwcc_values::{Value, ValueData, ValueId};

/// Refresh and configure the devices of a simulated network.
#[derive(Parser, Debug)]
#[command(name = "zwcc")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Action to perform.
    #[command(subcommand)]
    command: Command,

    /// Network description.
    #[arg(short, long, global = true, default_value = "networks/scene_controllers.yaml")]
    network: PathBuf,

    /// Override the seed for frame loss.
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Override the frame loss probability.
    #[arg(long, global = true)]
    loss: Option<f64>,

    /// Verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Refresh every node and print the values.
    Refresh {
        /// Only print this node's values.
        #[arg(long, value_parser = parse_byte)]
        node: Option<u8>,
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Write one value, then refresh and print the node's values.
    Set {
        /// Target node.
        #[arg(long, value_parser = parse_byte)]
        node: u8,
        /// Endpoint instance.
        #[arg(long, default_value_t = 1)]
        instance: u8,
        /// Command class id (decimal or 0x-prefixed hex).
        #[arg(long, value_parser = parse_byte)]
        class: u8,
        /// Value index.
        #[arg(long, value_parser = parse_byte)]
        index: u8,
        /// New value.
        #[arg(value_parser = parse_byte)]
        value: u8,
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Print the values each node exposes without talking to it.
    Values {
        /// Only print this node's values.
        #[arg(long, value_parser = parse_byte)]
        node: Option<u8>,
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
}

fn parse_byte(s: &str) -> Result<u8, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid byte '{}': {}", s, e))
}

fn print_values(values: &[Value], json: bool) -> Result<(), serde_json::Error> {
    if json {
        println!("{}", serde_json::to_string_pretty(values)?);
        return Ok(());
    }

    println!("{:<5} {:<4} {:<6} {:<5} {:<28} VALUE", "NODE", "INST", "CLASS", "INDEX", "LABEL");
    for value in values {
        let id = value.id();
        let data = if value.is_set() {
            value.data().to_string()
        } else {
            "-".to_string()
        };
        println!(
            "{:<5} {:<4} 0x{:02X}   {:<5} {:<28} {}",
            id.node_id,
            id.instance,
            id.command_class_id,
            id.index,
            value.label(),
            data
        );
    }
    Ok(())
}

fn selected(driver: &Driver, node: Option<u8>) -> Vec<Value> {
    match node {
        Some(node_id) => driver.values().values_for_node(node_id),
        None => driver.values().values(),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(std::io::stderr)
        .init();
    zwcc_metrics::describe_metrics();

    let mut config = load_network(&args.network)?;
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(loss) = args.loss {
        config.loss_probability = loss;
        config.validate()?;
    }
    info!(
        "loaded {} nodes from {} (seed {}, loss {})",
        config.nodes.len(),
        args.network.display(),
        config.seed,
        config.loss_probability
    );

    let driver = Driver::new(&config);
    let mut network = SimulatedNetwork::new(&config);

    match args.command {
        Command::Refresh { node, json } => {
            let summary = match node {
                Some(node_id) => driver.refresh_node(node_id, RequestFlags::ALL)?,
                None => driver.refresh_all(RequestFlags::ALL),
            };
            let stats = driver.pump(&mut network);
            info!("{}; {} frames sent, {} reports handled", summary, stats.sent, stats.handled);
            print_values(&selected(&driver, node), json)?;
        }

        Command::Set {
            node,
            instance,
            class,
            index,
            value,
            json,
        } => {
            driver.refresh_node(node, RequestFlags::ALL)?;
            driver.pump(&mut network);

            let id = ValueId::new(config.home_id, node, instance, class, index);
            driver.set_value(&id, ValueData::Byte(value))?;
            driver.pump(&mut network);

            driver.refresh_node(node, RequestFlags::ALL)?;
            let stats = driver.pump(&mut network);
            info!("{} frames sent, {} reports handled", stats.sent, stats.handled);
            print_values(&selected(&driver, Some(node)), json)?;
        }

        Command::Values { node, json } => {
            driver.create_values();
            print_values(&selected(&driver, node), json)?;
        }
    }

    let stats = network.stats();
    info!(
        "network: {} delivered, {} dropped, {} replies",
        stats.delivered, stats.dropped, stats.replies
    );
    Ok(())
}
