//! API status monitor entry point

use apiwatch::cli::{check, serve::ServeArgs, Cli, Commands};
use apiwatch::{bootstrap, logging, server};
use clap::Parser;
use tracing::error;

async fn run_server(args: ServeArgs) -> apiwatch::common::error::StatusResult<()> {
    let ctx = bootstrap::initialize().await?;
    let scheduler = bootstrap::start_scheduler(&ctx);

    server::run(ctx.state, &args.bind_addr()).await?;

    if let Some(handle) = scheduler {
        if let Err(e) = handle.await {
            error!("Task join error: {}", e);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init() {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let result = match cli.command {
        Some(Commands::Check(args)) => check::execute(&args).await,
        Some(Commands::Serve(args)) => run_server(args).await,
        None => run_server(ServeArgs::from_env()).await,
    };

    if let Err(e) = result {
        error!(error = %e, "apiwatch exited with an error");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
