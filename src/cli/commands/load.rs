//! `load`: fetch a document from the CDI endpoint and assemble it.

use super::{OutputFormat, render, runtime};
use crate::cli::error::CliError;
use crate::config::SdkConfig;
use crate::import::DatasetAssembler;
use crate::remote::{HttpMetadataSource, LoadParams, LoadRequest, PageMode};
use tracing::info;

/// Arguments for the load command
#[derive(Debug, Clone)]
pub struct LoadArgs {
    pub params: LoadParams,
    /// Use the parameters as given, with no demonstration fallback
    pub dataverse: bool,
    pub format: OutputFormat,
    pub config: SdkConfig,
}

/// Handle the load command
pub fn handle_load(args: &LoadArgs) -> Result<(), CliError> {
    let mode = if args.dataverse {
        PageMode::Dataverse
    } else {
        PageMode::Standalone
    };
    let request = LoadRequest::new(args.params.clone(), mode);
    if mode == PageMode::Standalone && !request.params.is_complete() {
        info!("Incomplete parameters, loading the demonstration dataset");
    }

    let assembler = DatasetAssembler::new(
        HttpMetadataSource::with_timeout(args.config.timeout()),
        args.config.clone(),
    );
    let dataset = runtime()?.block_on(assembler.load(&request))?;

    println!("{}", render(&dataset, args.format)?);
    Ok(())
}
