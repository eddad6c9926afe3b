pub mod catalog;
pub mod registry;
pub mod snapshot;

pub use catalog::{CatalogError, ExperimentCatalog};
pub use registry::{ExperimentRegistry, RegisteredExperiment};
pub use snapshot::{AssignmentConfig, RegistrySnapshot, SnapshotEntry};
