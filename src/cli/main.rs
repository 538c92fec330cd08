//! CLI binary entry point for cdi-metadata-cli

#[cfg(feature = "cli")]
use cdi_metadata_sdk::cli::commands::extract::{ExtractArgs, handle_extract};
#[cfg(feature = "cli")]
use cdi_metadata_sdk::cli::commands::load::{LoadArgs, handle_load};
#[cfg(feature = "cli")]
use cdi_metadata_sdk::cli::commands::payload::handle_payload;
#[cfg(feature = "cli")]
use cdi_metadata_sdk::cli::commands::{InputSource, OutputFormat};
#[cfg(feature = "cli")]
use cdi_metadata_sdk::cli::error::CliError;
#[cfg(feature = "cli")]
use cdi_metadata_sdk::cli::logging::init_logging;
#[cfg(feature = "cli")]
use cdi_metadata_sdk::config::{SdkConfig, sample_config};
#[cfg(feature = "cli")]
use cdi_metadata_sdk::remote::LoadParams;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "cdi-metadata-cli")]
#[command(about = "Extract dataset metadata from DDI-CDI JSON-LD documents")]
#[command(version)]
struct Cli {
    /// Configuration file (default: ./.cdi-metadata.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Fetch a document from the CDI endpoint and print the dataset
    Load {
        #[arg(long)]
        fileid: Option<String>,
        #[arg(long)]
        site_url: Option<String>,
        #[arg(long)]
        datasetid: Option<String>,
        #[arg(long)]
        datasetversion: Option<String>,
        #[arg(long)]
        locale: Option<String>,
        /// Use the parameters as given, even when some are missing
        #[arg(long)]
        dataverse: bool,
        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: FormatArg,
    },
    /// Extract a dataset from a local JSON-LD document
    Extract {
        /// Input file path or '-' for stdin
        #[arg(default_value = "-")]
        input: String,
        /// Dataset persistent identifier for the resource map
        #[arg(long)]
        datasetid: Option<String>,
        /// Skip the resource map fallback and enrichment
        #[arg(long)]
        offline: bool,
        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: FormatArg,
    },
    /// Parse a model-generated definition payload
    Payload {
        /// Input file path or '-' for stdin
        #[arg(default_value = "-")]
        input: String,
    },
    /// Print configuration
    Config {
        /// Print the effective configuration instead of the sample
        #[arg(long)]
        effective: bool,
    },
}

#[cfg(feature = "cli")]
#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Json,
    Markdown,
    Csv,
    /// Column list only
    Columns,
}

#[cfg(feature = "cli")]
impl From<FormatArg> for OutputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Markdown => OutputFormat::Markdown,
            FormatArg::Csv => OutputFormat::Csv,
            FormatArg::Columns => OutputFormat::Columns,
        }
    }
}

#[cfg(feature = "cli")]
fn load_config(path: Option<&PathBuf>) -> Result<SdkConfig, CliError> {
    let config = match path {
        Some(path) => SdkConfig::load_file(path)?,
        None => SdkConfig::load(std::path::Path::new("."))?,
    };
    Ok(config)
}

#[cfg(feature = "cli")]
fn run(cli: Cli) -> Result<(), CliError> {
    init_logging(cli.verbose)?;

    match cli.command {
        Commands::Load {
            fileid,
            site_url,
            datasetid,
            datasetversion,
            locale,
            dataverse,
            format,
        } => {
            let args = LoadArgs {
                params: LoadParams {
                    fileid,
                    site_url,
                    datasetid,
                    datasetversion,
                    locale,
                },
                dataverse,
                format: format.into(),
                config: load_config(cli.config.as_ref())?,
            };
            handle_load(&args)
        }
        Commands::Extract {
            input,
            datasetid,
            offline,
            format,
        } => {
            let args = ExtractArgs {
                input: InputSource::parse(&input),
                datasetid,
                offline,
                format: format.into(),
                config: load_config(cli.config.as_ref())?,
            };
            handle_extract(&args)
        }
        Commands::Payload { input } => handle_payload(&InputSource::parse(&input)),
        Commands::Config { effective } => {
            if effective {
                println!("{}", load_config(cli.config.as_ref())?.to_toml()?);
            } else {
                print!("{}", sample_config());
            }
            Ok(())
        }
    }
}

#[cfg(feature = "cli")]
fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature is not enabled. Build with --features cli");
    std::process::exit(1);
}
