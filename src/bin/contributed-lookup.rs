//! Command-line client listing a user's contributions from a running
//! contribution service.

use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use contributed::ContributionError;
use contributed::client::{LookupArgs, LookupClient, write_report};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = LookupArgs::parse();
    init_tracing();

    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            if writeln!(io::stderr().lock(), "{error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &LookupArgs) -> Result<(), ContributionError> {
    let client = LookupClient::new(&args.url)?;

    for user in &args.users {
        let report = client.contributions(user, args.refresh).await?;
        let mut stdout = io::stdout().lock();
        write_report(&mut stdout, user, &report, args.full)?;
    }

    Ok(())
}

// Quiet unless `RUST_LOG` asks for more.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let _already_installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}
