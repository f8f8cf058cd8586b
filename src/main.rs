//! `babylon` 바이너리 진입점.

use std::process;

use babylon::application::datastore::DataStore;
use babylon::application::errors::exit_code_for;
use babylon::interface::cli::{AppComposition, Cli, CommandRunner};
use clap::Parser;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let args: Vec<String> = std::env::args_os()
        .map(|a| a.to_string_lossy().into_owned())
        .collect();

    let composition = match AppComposition::from_env() {
        Ok(composition) => composition,
        Err(err) => {
            eprintln!("error: {err:#}");
            process::exit(1);
        }
    };
    let reporter = composition.reporter();
    let runner = CommandRunner::new(&composition);
    let datastore = DataStore::new();

    // 치환은 clap 파싱보다 먼저 수행한다.
    let args = match runner.substitute(&args, &datastore) {
        Ok(args) => args,
        Err(err) => {
            reporter.error(&format!("{err:#}"));
            process::exit(exit_code_for(&err));
        }
    };

    let cli = match Cli::try_parse_from(&args) {
        Ok(cli) => cli,
        Err(err) => err.exit(),
    };

    if let Err(err) = runner.execute(cli.command, &datastore).await {
        reporter.error(&format!("{err:#}"));
        process::exit(exit_code_for(&err));
    }
}
