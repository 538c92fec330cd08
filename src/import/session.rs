//! Holder for the dataset currently on display.

use super::ImportError;
use super::assembler::DatasetAssembler;
use crate::models::Dataset;
use crate::remote::{LoadRequest, MetadataSource};
use tracing::error;

/// The current dataset of a page or tool.
///
/// A load replaces the dataset wholesale, and only when it succeeds; a
/// failed load leaves the previous dataset in place.
#[derive(Debug, Default)]
pub struct DatasetSession {
    current: Option<Dataset>,
}

impl DatasetSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&Dataset> {
        self.current.as_ref()
    }

    /// Replace the current dataset, returning the previous one
    pub fn replace(&mut self, dataset: Dataset) -> Option<Dataset> {
        self.current.replace(dataset)
    }

    pub fn take(&mut self) -> Option<Dataset> {
        self.current.take()
    }

    /// Runs a load and commits its dataset on success.
    pub async fn load<S: MetadataSource>(
        &mut self,
        assembler: &DatasetAssembler<S>,
        request: &LoadRequest,
    ) -> Result<&Dataset, ImportError> {
        match assembler.load(request).await {
            Ok(dataset) => Ok(self.current.insert(dataset)),
            Err(e) => {
                error!("Failed to load JSON-LD: {}", e);
                Err(e)
            }
        }
    }
}
