use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod logging;
mod output;
mod progress;

#[derive(Parser)]
#[command(name = "postervault")]
#[command(about = "Download poster art from a Plex Media Server")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// Path to the library config file
    #[arg(long, global = true, default_value = "config.yml", value_name = "FILE")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download poster images for every configured library
    #[command(
        long_about = "Walk every library listed in config.yml and save one PNG per movie, show, or album poster. Video posters are named \"<Title> (<Year>).png\"; album posters \"<Album>.png\". Name collisions get an incrementing _N suffix instead of overwriting."
    )]
    Download {
        /// Root directory to save posters under (default: ./Posters)
        save_path: Option<PathBuf>,

        /// Only process the named library (repeatable)
        #[arg(long = "library", value_name = "NAME")]
        libraries: Vec<String>,
    },

    /// List the configured libraries and their item counts
    #[command(
        long_about = "Connect to the server and show each configured library with its type and item count. With --check-collections, also load every referenced collection config file and report the ones that fail to parse."
    )]
    Libraries {
        /// Also validate the collection config files referenced by config.yml
        #[arg(long, action = ArgAction::SetTrue)]
        check_collections: bool,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    // Take environment variables from .env, letting the file win over
    // whatever is already set in the shell.
    dotenvy::dotenv_override().ok();

    let cli = Cli::parse();

    logging::init_logging(cli.verbose, cli.quiet)
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::Download {
            save_path,
            libraries,
        } => commands::download::run_download(&cli.config, save_path, libraries, &output).await,
        Commands::Libraries { check_collections } => {
            commands::libraries::run_libraries(&cli.config, check_collections, &output).await
        }
    }
}
