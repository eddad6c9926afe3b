use std::fs;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::experiment::Experiment;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Experiment definitions as supplied by configuration: a JSON array of
/// experiments in the dashboard's camelCase shape.
///
/// Loading validates structure only. Weight totals, duplicate ids and the
/// like are accepted and surface as diagnostics on registration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExperimentCatalog {
    experiments: Vec<Experiment>,
}

impl ExperimentCatalog {
    pub fn new(experiments: Vec<Experiment>) -> Self {
        Self { experiments }
    }

    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let f = fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(f))
    }

    pub fn experiments(&self) -> &[Experiment] {
        &self.experiments
    }

    pub fn into_experiments(self) -> Vec<Experiment> {
        self.experiments
    }

    pub fn len(&self) -> usize {
        self.experiments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.experiments.is_empty()
    }
}
