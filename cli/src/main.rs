use std::process::ExitCode;

use clap::Parser;

use crate::application::{commands, failure::Failure, logging::init_logging, state::state};
use crate::args::Args;

mod application;
mod args;

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();

    let args = Args::parse();
    init_logging(&args.log);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let failure = Failure::from(&err);
            tracing::debug!(error = ?err, "command failed");
            eprintln!("{}", failure.to_json());
            ExitCode::from(failure.exit_code)
        }
    }
}

async fn run(args: Args) -> Result<(), anyhow::Error> {
    let state = state(args)?;
    let extraction = commands::dispatch(&state).await?;

    println!("{}", serde_json::to_string_pretty(&extraction)?);
    Ok(())
}
