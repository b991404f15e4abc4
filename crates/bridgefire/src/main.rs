use std::process::ExitCode;
use std::time::Duration;

use bridgefire::{init_logging, ClientConfig, Orchestrator};
use bridgefire_transport::RetryPolicy;
use clap::Parser;
use tracing::info;
use tracing_subscriber::filter::LevelFilter;

#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Host name or address of the game server
    hostname: String,

    /// Port of the first river; the others follow on consecutive ports
    base_port: u16,

    /// Shared secret sent with every request
    secret: String,

    /// How long to wait for each reply, in milliseconds
    #[arg(long, default_value_t = 200)]
    attempt_timeout_ms: u64,

    /// How many times a request is resent before giving up
    #[arg(long, default_value_t = 10)]
    max_retransmissions: u32,

    /// A log level among "off", "error", "warn", "info", "debug", "trace"
    #[arg(short, long, default_value = "info")]
    log_level: LevelFilter,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    init_logging(args.log_level);

    let config = ClientConfig {
        host: args.hostname,
        base_port: args.base_port,
        secret: args.secret,
        retry: RetryPolicy {
            attempt_timeout: Duration::from_millis(args.attempt_timeout_ms),
            max_retransmissions: args.max_retransmissions,
        },
    };

    let result = match Orchestrator::connect(config).await {
        Ok(orchestrator) => orchestrator.run().await,
        Err(e) => Err(e),
    };

    match result {
        Ok(outcome) => {
            info!(
                turns = outcome.turns_played,
                shots = outcome.shots_fired,
                "finished"
            );
            println!("{}", outcome.final_message);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("bridgefire: {e}");
            ExitCode::FAILURE
        }
    }
}
