//! quire-admin: manages categories and posts of a running Quire server
//! through the procedure endpoint.

mod args;
mod context;
mod handlers;
mod io;
mod print;

#[cfg(test)]
mod tests;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use args::{Cli, Commands};
use context::{AdminError, Ctx};
use handlers::{categories, dashboard, posts, preview};

#[tokio::main]
async fn main() -> Result<(), AdminError> {
    let cli = Cli::parse();
    init_logging();

    if let Commands::Preview { file } = &cli.command {
        return preview::handle(file.clone());
    }

    let ctx = Ctx::from_cli(&cli)?;
    match cli.command {
        Commands::Dashboard => dashboard::handle(&ctx).await?,
        Commands::Categories(cmd) => categories::handle(&ctx, cmd.action).await?,
        Commands::Posts(cmd) => posts::handle(&ctx, cmd.action).await?,
        Commands::Preview { .. } => {}
    }

    Ok(())
}

/// Diagnostics go to stderr, filtered by `QUIRE_ADMIN_LOG` (default `warn`).
fn init_logging() {
    let filter =
        EnvFilter::try_from_env("QUIRE_ADMIN_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}
