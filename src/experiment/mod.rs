pub mod config;
pub mod experiment;

pub use crate::types::identifiers::{DefinitionVersion, ExperimentId};
pub use config::VariantConfig;
pub use experiment::{Diagnostic, Experiment, Variant, FULL_WEIGHT};
