//! Deterministic variant assignment for A/B experiments.
//!
//! `experiment-core` holds experiment definitions and maps any
//! (experiment, subject) pair to one of the experiment's weighted variants.
//! The mapping is a pure function of the definition and the two ids: a
//! 32-bit rolling hash of `subject_id + experiment_id` picks a bucket in
//! `[0, 100)`, and the bucket is located in the cumulative variant weights.
//! No per-subject state is stored, so every process holding the same
//! definitions reproduces the same assignments.
//!
//! ```
//! use experiment_core::experiment::{Experiment, Variant};
//! use experiment_core::registry::ExperimentRegistry;
//!
//! let registry = ExperimentRegistry::new();
//! registry.register(Experiment::new(
//!     "exp-1",
//!     "Checkout button",
//!     vec![Variant::new("A", "Control", 50.0), Variant::new("B", "Green", 50.0)],
//! ));
//!
//! let variant = registry.get_variant("exp-1", "user-42").unwrap();
//! assert_eq!(variant.id, "A");
//! assert!(registry.get_variant("missing", "user-42").is_none());
//! ```

pub mod assignment;
pub mod experiment;
pub mod registry;
pub mod types;
