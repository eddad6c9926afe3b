pub mod assignment;
pub mod identifiers;

pub use assignment::{Assignment, AssignmentWhy, Decision};
pub use identifiers::{DefinitionVersion, ExperimentId};
