//! DRVC3 CLI: issue and verify content-provenance receipts.

mod commands;

use std::process::ExitCode;

use clap::Parser;

/// DRVC3: signed content-provenance receipts.
///
/// `create` digests a file, signs the digest with the key in `PRIVATE_KEY`
/// and writes the receipt. `verify` re-checks receipts against the schema,
/// the local content and the signature.
#[derive(Parser)]
#[command(name = "drvc3", version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (repeat for more detail: -v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Output logs as JSON (for machine consumption).
    #[arg(long, global = true)]
    json_logs: bool,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Issue a signed receipt for a file.
    Create(commands::create::CreateArgs),
    /// Verify one or more receipt files.
    Verify(commands::verify::VerifyArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    if cli.json_logs {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    let result = match cli.command {
        Commands::Create(args) => commands::create::execute(args),
        Commands::Verify(args) => commands::verify::execute(args).await,
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
