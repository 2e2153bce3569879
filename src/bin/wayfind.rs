use clap::{Parser, Subcommand};
use std::{path::PathBuf, process::ExitCode};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use wayfind::RouteNetwork;


/// Shortest routes through a DOT edge list
#[derive(Parser, Debug)]
#[command(name = "wayfind", version)]
struct Cli {
    /// DOT file with one `"from" -> "to" [seconds=N];` edge per line
    #[arg(short, long, env = "WAYFIND_FILE")]
    file: PathBuf,

    /// Log search details to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every location in the order it appears in the file
    Locations,
    /// Shortest path between two locations
    Path {
        start: String,
        end: String,
        /// Location the path must pass through
        #[arg(long)]
        via: Option<String>,
        /// Print the travel time of every hop
        #[arg(long)]
        times: bool,
    },
}


fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(error) = init_tracing(cli.verbose) {
        eprintln!("warning: failed to initialize logging: {error}");
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "wayfind=debug" } else { "warn" }));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr).with_ansi(false))
        .try_init()?;
    Ok(())
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let network = RouteNetwork::load_dot_file(&cli.file)?;

    match cli.command {
        Command::Locations => {
            for location in network.locations() {
                println!("{location}");
            }
        }
        Command::Path { start, end, via, times } => {
            let path = match via.as_deref() {
                Some(via) => network.find_shortest_path_via(&start, via, &end)?,
                None => network.find_shortest_path(&start, &end)?,
            };
            let hop_times = network.hop_times(&path)?;

            println!("{}", path.join(" -> "));
            if times {
                for (hop, seconds) in path.windows(2).zip(&hop_times) {
                    println!("  {} -> {}: {seconds}", hop[0], hop[1]);
                }
            }
            println!("total: {}", hop_times.iter().sum::<f64>());
        }
    }
    Ok(())
}
