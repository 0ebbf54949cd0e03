//! Command line front end for xlwings Server settings
//!
//! # Usage
//!
//! ```bash
//! xlwings-settings show --format toml
//! xlwings-settings check
//! xlwings-settings --dotenv /etc/xlwings/.env init
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{debug, info};

use xlwings_server_settings::{
    cli::{
        check,
        init::{InitArgs, run_init},
        init_logging,
        show::{OutputFormat, ShowArgs, render},
    },
    config::{self, ConfigLoader},
    utils::VERSION,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "xlwings-settings")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override file to read (defaults to $DOTENV_PATH, then .env)
    #[arg(long, global = true, value_name = "PATH")]
    dotenv: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the resolved settings
    Show {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Print secrets instead of masking them
        #[arg(long)]
        reveal: bool,
    },
    /// Resolve and validate the settings
    Check,
    /// Write fresh manifest ids into the override file
    Init {
        /// Also replace manifest ids that were already customised
        #[arg(long)]
        force: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.dotenv {
        loader = loader.with_dotenv_path(path);
    }

    let logging = init_logging(cli.verbose);
    debug!("xlwings-settings v{}", VERSION);

    match cli.command {
        Commands::Show { format, reveal } => {
            let settings = config::init_with(&loader)?;
            logging.set_level(settings.tracing_level());

            let out = render(settings, &ShowArgs { format, reveal }, loader.prefix())?;
            print!("{}", out);
            if !out.ends_with('\n') {
                println!();
            }
        }
        Commands::Check => {
            let settings = config::init_with(&loader)?;
            logging.set_level(settings.tracing_level());

            println!("{}", check::summary(settings));
        }
        Commands::Init { force } => {
            let path = loader.dotenv_path();
            let report = run_init(&path, loader.prefix(), &InitArgs { force })?;

            for key in &report.written {
                println!("wrote {key}");
            }
            for key in &report.kept {
                info!("Keeping custom {key}, pass --force to replace it");
            }
        }
    }

    Ok(())
}
