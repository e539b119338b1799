//! Binary entrypoint for the `alerter` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    // GITHUB_TOKEN and ALERTER_* may come from a local .env file.
    dotenvy::dotenv().ok();

    match alerter::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
