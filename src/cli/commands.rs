use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "grain", about = concat!("grain v", env!("CARGO_PKG_VERSION"), " - a keyboard-first task list"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Use a different data directory
    #[arg(short = 'C', long = "data-dir", global = true)]
    pub data_dir: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long = "log-level", global = true)]
    pub log_level: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List grains, newest first
    List(ListArgs),
    /// Add a grain
    Add(AddArgs),
}

#[derive(Args)]
pub struct ListArgs {
    /// Hide finished grains
    #[arg(long)]
    pub pending: bool,
}

#[derive(Args)]
pub struct AddArgs {
    /// Grain title (words are joined with spaces)
    #[arg(required = true, num_args = 1..)]
    pub title: Vec<String>,
}
