use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser, Subcommand};
use std::process;
use tracing::{error, info};
use tunnel_core::config::Config;
use tunnel_core::TunnelResult;

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON file with grid, card and viewport settings.
    #[arg(global = true, long)]
    config: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Lay out a set of cards and check them for overlap.
    Arrange(cmd::arrange::ArrangeArgs),
    /// Run frame times through the quality monitor.
    Perf(cmd::perf::PerfArgs),
    /// Replay a drag/settle event script against a board.
    Replay(cmd::replay::ReplayArgs),
}

/// File config (if any) with explicit command-line flags layered on top.
fn resolve_config(
    path: Option<&str>,
    cli_config: &Config,
    sub_matches: Option<&ArgMatches>,
) -> TunnelResult<Config> {
    let Some(path) = path else {
        return Ok(cli_config.clone());
    };
    info!("📂 Loading config from: {}", path);
    let mut config = Config::load_from_file(path)?;
    if let Some(m) = sub_matches {
        config.merge_from_cli(cli_config, m);
    }
    Ok(config)
}

fn main() {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    let result = match cli.command {
        Commands::Arrange(args) => {
            resolve_config(
                cli.config.as_deref(),
                &args.config,
                matches.subcommand_matches("arrange"),
            )
            .and_then(|config| cmd::arrange::run(args, &config))
        }
        Commands::Replay(args) => {
            resolve_config(
                cli.config.as_deref(),
                &args.config,
                matches.subcommand_matches("replay"),
            )
            .and_then(|config| cmd::replay::run(args, config))
        }
        Commands::Perf(args) => cmd::perf::run(args),
    };

    if let Err(e) = result {
        error!("❌ {}", e);
        process::exit(1);
    }
}
