mod handlers;
pub mod parse;

use clap::Parser;
pub use parse::Cli;
use tracing::Level;

use crate::core::error::ChartError;

fn init_logging(cli: &Cli) {
    let level = if cli.debug {
        Level::DEBUG
    } else if cli.quiet {
        Level::WARN
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

/// Parse arguments, set up logging and run the chosen subcommand.
///
/// # Errors
/// Configuration, I/O and (for one-shot commands) fetch failures.
pub async fn run() -> Result<(), ChartError> {
    let cli = parse::Cli::parse();
    init_logging(&cli);
    match cli.cmd {
        parse::Command::Watch(a) => handlers::watch(a).await,
        parse::Command::Render(a) => handlers::render(&a),
        parse::Command::Demo(a) => handlers::demo(a).await,
        parse::Command::Examples => {
            handlers::examples();
            Ok(())
        }
    }
}
