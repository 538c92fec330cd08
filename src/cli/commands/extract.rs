//! `extract`: run the pipeline on a local JSON-LD document.

use super::{InputSource, OutputFormat, load_input, render, runtime};
use crate::cli::error::CliError;
use crate::config::SdkConfig;
use crate::import::{DatasetAssembler, assemble_offline, parse_document};
use crate::jsonld::ColumnExtractor;
use crate::models::RepresentationCatalog;
use crate::remote::HttpMetadataSource;

/// Arguments for the extract command
#[derive(Debug, Clone)]
pub struct ExtractArgs {
    pub input: InputSource,
    /// Persistent identifier for the resource map lookup
    pub datasetid: Option<String>,
    /// Skip the resource map entirely
    pub offline: bool,
    pub format: OutputFormat,
    pub config: SdkConfig,
}

/// Handle the extract command
pub fn handle_extract(args: &ExtractArgs) -> Result<(), CliError> {
    let document = parse_document(&load_input(&args.input)?)?;

    let dataset = if args.offline {
        let extractor = ColumnExtractor::new(
            args.config.extraction_catalog(),
            RepresentationCatalog::default(),
        );
        assemble_offline(document, &extractor)?
    } else {
        let assembler = DatasetAssembler::new(
            HttpMetadataSource::with_timeout(args.config.timeout()),
            args.config.clone(),
        );
        let persistent_id = args.datasetid.as_deref().unwrap_or_default();
        runtime()?.block_on(assembler.assemble(document, persistent_id))?
    };

    println!("{}", render(&dataset, args.format)?);
    Ok(())
}
