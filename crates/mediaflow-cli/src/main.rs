//! Mediaflow CLI — drives the offline FairPlay DRM workflow end to end.
//!
//! Configure credentials and account scope through the environment (a local
//! `.env` file works); run flags only tune waiting and interactivity.

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use mediaflow_cli::init_tracing;
use mediaflow_cli::waiter::WaiterOptions;
use mediaflow_cli::workflow::{self, RunOptions};
use mediaflow_client::{ClientError, MediaClient};
use mediaflow_core::Config;

#[derive(Parser)]
#[command(name = "mediaflow", about = "Offline FairPlay DRM workflow driver")]
struct Cli {
    /// Minutes to wait on the event-driven path before polling takes over
    #[arg(long, default_value = "30")]
    event_timeout_mins: u64,
    /// Seconds between job status polls in the fallback strategy
    #[arg(long, default_value = "60")]
    poll_interval_secs: u64,
    /// Do not pause for ENTER before cleanup
    #[arg(long, short = 'y')]
    yes: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let client = match MediaClient::connect(&config).await {
        Ok(client) => client,
        Err(e) => {
            if e.is_auth() {
                eprintln!("ERROR: Authentication error, please check your account settings.");
            }
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let options = RunOptions {
        waiter: WaiterOptions {
            event_timeout: Duration::from_secs(cli.event_timeout_mins * 60),
            poll_interval: Duration::from_secs(cli.poll_interval_secs),
        },
        interactive: !cli.yes,
    };

    match workflow::execute(&client, &config, &options).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let auth = err
                .downcast_ref::<ClientError>()
                .is_some_and(ClientError::is_auth);
            if auth {
                eprintln!("ERROR: Authentication error, please check your account settings.");
            }
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
