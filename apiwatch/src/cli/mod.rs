//! CLI module for apiwatch
//!
//! Provides the command-line interface for the API status monitor.

pub mod check;
pub mod serve;

use clap::{Parser, Subcommand};

/// API status monitor - concurrent health checks for upstream provider APIs
#[derive(Parser, Debug)]
#[command(name = "apiwatch")]
#[command(version, about, long_about = None)]
#[command(after_help = r#"ENVIRONMENT VARIABLES:
    APIWATCH_HOST                 Bind address (default: 0.0.0.0)
    APIWATCH_PORT                 Listen port (default: 8080)
    APIWATCH_LOG_LEVEL            Log level (default: info)
    APIWATCH_LOG_FORMAT           Set to "json" for JSON log lines
    APIWATCH_LOG_DIR              Directory for daily rotated log files
    APIWATCH_DATABASE_URL         Status log database (default: sqlite:data/apiwatch.db)
    APIWATCH_PROBE_TIMEOUT_SECS   Per-endpoint timeout (default: 45)
    APIWATCH_DEGRADED_THRESHOLD_MS  Slow response threshold (default: 6000)
    APIWATCH_POOL_SIZE            Concurrent probes per provider (default: 3)
    APIWATCH_UPTIME_WINDOW        History entries used for uptime (default: 100)
    APIWATCH_CHECK_INTERVAL_SECS  Background check interval, 0 disables (default: 0)
    APIWATCH_CRON_SECRET          Bearer secret for /cron/status-check
    VISMA_CLIENT_ID / VISMA_CLIENT_SECRET / VISMA_TOKEN_URL / VISMA_TENANT_ID
                                  OAuth2 client credentials
    VISMA_ACCESS_TOKEN            Static bearer token (skips OAuth2)
"#)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve(serve::ServeArgs),
    /// Run one status check and print the snapshot as JSON
    Check(check::CheckArgs),
}
