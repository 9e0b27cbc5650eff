use clap::{ArgAction, Parser, Subcommand};
use commands::{config, list, shell};
use moviemate_config::PathManager;
use std::path::PathBuf;

mod commands;
mod logging;
mod output;
mod terminal;

#[derive(Parser)]
#[command(name = "moviemate")]
#[command(about = "MovieMate - search movies and keep track of what you watched")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// Config file to use instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write logs to this file (rotated daily) instead of stderr
    #[arg(long, global = true, value_name = "PATH", num_args = 0..=1, default_missing_value = "")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive search shell (default)
    #[command(long_about = "Start the interactive shell. Type a title to search, open a result to see its details, and add movies to your watched list or watch list. Type :help inside the shell for all commands.")]
    Shell,
    /// Print your watched list and watch list
    List,
    /// Show or create the configuration
    Config {
        #[command(subcommand)]
        cmd: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration (masks the API key)
    Show {
        /// Show the API key unmasked
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },
    /// Write a config file with your OMDb API key
    Init {
        /// OMDb API key (if not provided, will prompt)
        #[arg(long)]
        api_key: Option<String>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let paths = PathManager::default();

    // A bare --log-file means the default location under the log directory
    let log_file = cli.log_file.map(|path| {
        if path.as_os_str().is_empty() {
            paths.default_log_file()
        } else {
            path
        }
    });
    logging::init_logging(cli.verbose, cli.quiet, log_file).map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);
    let config_file = commands::config_path(&paths, cli.config.as_deref());
    let app_config = commands::load_config(&paths, cli.config.as_deref())?;

    match cli.command.unwrap_or(Commands::Shell) {
        Commands::Shell => shell::run_shell(app_config, &paths, &output).await,
        Commands::List => list::run_list(&app_config, &paths, &output),
        Commands::Config { cmd } => match cmd.unwrap_or(ConfigCommands::Show { full: false }) {
            ConfigCommands::Show { full } => config::show_config(&app_config, &config_file, full, &output),
            ConfigCommands::Init { api_key } => config::init_config(app_config, &config_file, api_key, &output),
        },
    }
}
