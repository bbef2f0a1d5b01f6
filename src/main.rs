use std::io::IsTerminal;
use std::process::ExitCode;

use clap::Parser;
use fshred::cancel::{self, CancelToken};
use fshred::cli::CliArgs;
use fshred::shred::{ShredError, Shredder, SkipUnwritable};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = CliArgs::parse();
    setup_logging(&args);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("fshred: {e}");
            ExitCode::FAILURE
        },
    }
}

fn run(args: &CliArgs) -> Result<(), ShredError> {
    let token = CancelToken::new();
    if let Err(e) = cancel::install_handler(token.clone(), || eprintln!("\nInterrupt received, stopping...")) {
        warn!("cannot install signal handler: {e}");
    }

    let mut shredder = Shredder::new(args.to_config())?
        .with_filter(SkipUnwritable)
        .with_cancel_token(token);
    let summary = shredder.run(&args.targets)?;

    info!(
        shredded = summary.shredded,
        bytes = summary.bytes_written,
        unlinked = summary.unlinked,
        directories_removed = summary.directories_removed,
        skipped = summary.skipped,
        "done"
    );
    Ok(())
}

fn setup_logging(args: &CliArgs) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_filter()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .init();
}
