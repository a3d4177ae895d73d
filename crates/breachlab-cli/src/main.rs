use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "breachlab", version, about = "Breachlab CLI")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the vulnerable web application
    Serve,

    /// Create and seed the SQLite database (replaces an existing one)
    InitDb {
        /// Database file to create
        #[arg(default_value = "users.db")]
        path: PathBuf,
    },

    /// Verify the checkout is runnable and still carries all seven vulnerabilities
    Verify,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let cli = Cli::parse();

    match cli.cmd {
        Command::Serve => commands::serve::serve().await?,
        Command::InitDb { path } => commands::init_db::init_db(&path).await?,
        Command::Verify => commands::verify::verify(Path::new(".")).await?,
    }

    Ok(())
}
