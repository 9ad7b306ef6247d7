use clap::Parser;
use colored::Colorize;
use rtd_cli::cli::{run, Args};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = init_logging(args.verbose) {
        eprintln!("{}: failed to initialize logging: {}", "error".red().bold(), e);
    }

    if let Err(e) = run(args).await {
        eprintln!("{}: {:#}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Log to stderr so stdout stays clean for command output. `RUST_LOG` wins
/// over `-v`.
fn init_logging(verbose: u8) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
