use vsixget_core::fetcher::FetchError;
use vsixget_core::logging;

mod cli;

use crate::cli::Cli;

fn main() {
    let cli = match Cli::parse_args() {
        Ok(cli) => cli,
        Err(err) => {
            // clap exits 2 on usage errors; this tool uses 1. Help and
            // version output still exit 0.
            let code = if err.use_stderr() { 1 } else { 0 };
            let _ = err.print();
            std::process::exit(code);
        }
    };

    // Initialize logging as early as possible; fall back to stderr if the log file can't be opened.
    if let Err(e) = logging::init_logging(cli.debug) {
        logging::init_logging_stderr(cli.debug);
        tracing::warn!("log file unavailable ({:#}), logging to stderr", e);
    }

    if let Err(err) = cli.run() {
        eprintln!("vsixget error: {:#}", err);
        if let Some(fetch) = err.downcast_ref::<FetchError>() {
            cli::console::print_troubleshooting(fetch);
        } else if cli::console::wants_usage(&err) {
            cli::console::print_usage();
        }
        std::process::exit(1);
    }
}
