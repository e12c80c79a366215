mod commands;
mod host;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "blobflow")]
#[command(about = "Run Azure Blob Storage flow nodes from the shell")]
#[command(version)]
struct Cli {
    /// Path to the blobflow config directory (default: ~/.blobflow)
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default flow file
    Init,

    /// Show the fallback account and configured nodes
    Config,

    /// List registered node types
    Nodes,

    /// Send one message through a configured node
    Send {
        /// Node id from the flow file
        node: String,
        /// Text payload (a file path for upload and download-to-file)
        #[arg(long, conflicts_with = "payload_file")]
        payload: Option<String>,
        /// Use the contents of this file as a raw byte payload
        #[arg(long)]
        payload_file: Option<PathBuf>,
        /// Message `containerName`
        #[arg(long)]
        container: Option<String>,
        /// Message `blobName`
        #[arg(long)]
        blob: Option<String>,
        /// Use a directory tree instead of Azure
        #[arg(long, conflicts_with = "emulator")]
        local: Option<PathBuf>,
        /// Use the Azurite emulator
        #[arg(long)]
        emulator: bool,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("blobflow=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let base_dir = match cli.config_dir {
        Some(ref dir) => dir.clone(),
        None => blobflow_core::config::FlowConfig::default_base_dir()?,
    };

    match cli.command {
        Commands::Init => commands::init::run(&base_dir),
        Commands::Config => commands::config::run(&base_dir),
        Commands::Nodes => commands::nodes::run(),
        Commands::Send {
            node,
            payload,
            payload_file,
            container,
            blob,
            local,
            emulator,
        } => {
            let rt = tokio::runtime::Runtime::new()?;
            let args = commands::send::SendArgs {
                node,
                payload,
                payload_file,
                container,
                blob,
                local,
                emulator,
            };
            rt.block_on(commands::send::run(&base_dir, args))
        }
    }
}
