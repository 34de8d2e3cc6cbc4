mod arm;
mod auth;
mod azcli;
mod cmd;
mod config;
mod logging;
mod output;
mod prompt;

use arm::ArmClient;
use clap::Parser;
use cmd::error::{CommandError, CommandResult};
use cmd::{Cli, Session};
use std::process::ExitCode;

const USER_AGENT: &str = concat!("ea-cli/", env!("CARGO_PKG_VERSION"));

async fn run(cli: Cli) -> CommandResult<()> {
    let config = cli.global.apply(config::load(cli.global.config.as_deref())?);
    let credential = cli.global.credential(&config)?;

    let http = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(config.request_timeout())
        .build()
        .map_err(CommandError::HttpClient)?;

    let token = credential.token(&config.authority).await?;
    let session = Session::new(ArmClient::new(http, &config.endpoint, token), &config);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    cmd::dispatch(cli.command, &session, &mut out).await
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    logging::init(cli.global.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(error = ?err, "command failed");
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
