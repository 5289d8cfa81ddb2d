use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use metastore_codec::Format;

#[derive(Parser)]
#[command(
    name = "metastore",
    about = "Metastore: in-memory identifier/key/value metadata store",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Serve a store over HTTP
    Serve(ServeArgs),
    /// Convert a snapshot between json, toml and binary
    Convert(ConvertArgs),
    /// Print the identifiers and key/value pairs of a snapshot
    Show(ShowArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// Address to listen on (overrides the config file)
    #[arg(long)]
    pub bind: Option<SocketAddr>,
    /// TOML server configuration
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Snapshot to load at startup (overrides the config file)
    #[arg(long)]
    pub load: Option<PathBuf>,
}

#[derive(Args)]
pub struct ConvertArgs {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Input format; inferred from the extension when omitted
    #[arg(long)]
    pub from: Option<Format>,
    /// Output format; inferred from the extension when omitted
    #[arg(long)]
    pub to: Option<Format>,
}

#[derive(Args)]
pub struct ShowArgs {
    pub file: PathBuf,
    #[arg(long)]
    pub from: Option<Format>,
}
