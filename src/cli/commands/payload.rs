//! `payload`: run the definition payload parser on a file.

use super::{InputSource, load_input};
use crate::cli::error::CliError;
use crate::enrichment::parse_payload;

/// Handle the payload command
pub fn handle_payload(input: &InputSource) -> Result<(), CliError> {
    let raw = load_input(input)?;
    let parsed = parse_payload(&raw);
    let output = serde_json::to_string_pretty(&parsed)
        .map_err(|e| CliError::SerializationError(e.to_string()))?;
    println!("{}", output);
    Ok(())
}
