use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "todo", about = "Todo ledger: a flat-file todo store with an HTTP API", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path of the JSON database file
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the HTTP server
    Serve(ServeArgs),
    /// Create a todo
    Add(AddArgs),
    /// List every todo
    List,
    /// Show one todo, or `all`
    Show(ShowArgs),
    /// Change fields of a todo
    Update(UpdateArgs),
    /// Delete a todo
    Delete(DeleteArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    #[arg(long)]
    pub bind: Option<SocketAddr>,
    /// TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct AddArgs {
    pub title: String,
    #[arg(long)]
    pub due: Option<String>,
    #[arg(long)]
    pub completed: bool,
}

#[derive(Args)]
pub struct ShowArgs {
    pub id: String,
}

#[derive(Args)]
pub struct UpdateArgs {
    pub id: String,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub due: Option<String>,
    #[arg(long)]
    pub completed: Option<bool>,
}

#[derive(Args)]
pub struct DeleteArgs {
    pub id: String,
    #[arg(long)]
    pub dry_run: bool,
}
