use experiment_core::assignment::{bucket_for, rolling_hash};
use experiment_core::experiment::{Experiment, Variant, VariantConfig};
use experiment_core::registry::ExperimentRegistry;
use proptest::prelude::*;

fn ab_experiment(id: &str) -> Experiment {
    Experiment::new(
        id,
        "Checkout button",
        vec![Variant::new("A", "Control", 50.0), Variant::new("B", "Green", 50.0)],
    )
}

#[test]
fn golden_user_42_in_exp_1() {
    // Pinned: a change here means existing deployments would reshuffle.
    assert_eq!(rolling_hash("user-42exp-1"), 718448833);
    assert_eq!(bucket_for("user-42", "exp-1"), 33);

    let registry = ExperimentRegistry::new();
    registry.register(ab_experiment("exp-1"));

    let variant = registry.get_variant("exp-1", "user-42").unwrap();
    assert_eq!(variant.id, "A");

    let assignment = registry.assign("exp-1", "user-42").unwrap();
    assert_eq!(assignment.why.hash, 718448833);
    assert_eq!(assignment.why.bucket, 33);
    assert!(!assignment.why.fallback);
}

#[test]
fn bucket_decides_variant_for_many_subjects() {
    let registry = ExperimentRegistry::new();
    registry.register(ab_experiment("exp-1"));

    for i in 0..500 {
        let subject = format!("user-{i}");
        let expected = if bucket_for(&subject, "exp-1") < 50 { "A" } else { "B" };
        let variant = registry.get_variant("exp-1", &subject).unwrap();
        assert_eq!(variant.id, expected, "subject {subject}");
    }
}

#[test]
fn repeated_calls_and_fresh_registries_agree() {
    let first = ExperimentRegistry::new();
    first.register(ab_experiment("exp-1"));

    // Stands in for a process restart
    let second = ExperimentRegistry::new();
    second.register(ab_experiment("exp-1"));

    for i in 0..200 {
        let subject = format!("driver-{i}");
        let a = first.get_variant("exp-1", &subject).unwrap();
        let b = first.get_variant("exp-1", &subject).unwrap();
        let c = second.get_variant("exp-1", &subject).unwrap();
        assert_eq!(a.id, b.id);
        assert_eq!(a.id, c.id);
    }
}

#[test]
fn inactive_experiment_assigns_nobody() {
    let registry = ExperimentRegistry::new();
    registry.register(ab_experiment("exp-1").with_active(false));

    for i in 0..200 {
        assert!(registry.get_variant("exp-1", &format!("user-{i}")).is_none());
    }
    // Would be "A" if active
    assert!(registry.get_variant("exp-1", "user-42").is_none());
    assert!(!registry.is_active("exp-1"));
}

#[test]
fn unknown_experiment_assigns_nobody() {
    let registry = ExperimentRegistry::new();
    registry.register(ab_experiment("exp-1"));

    assert!(registry.get_variant("exp-2", "user-42").is_none());
    assert!(registry.assign("", "user-42").is_none());
    assert!(!registry.is_active("exp-2"));
}

#[test]
fn zero_variant_experiment_assigns_nobody() {
    let registry = ExperimentRegistry::new();
    registry.register(Experiment::new("exp-empty", "Empty", vec![]));

    assert!(registry.is_active("exp-empty"));
    for i in 0..100 {
        assert!(registry.get_variant("exp-empty", &format!("user-{i}")).is_none());
    }
}

#[test]
fn underweighted_experiment_always_returns_first() {
    let registry = ExperimentRegistry::new();
    registry.register(Experiment::new(
        "exp-under",
        "Underweighted",
        vec![Variant::new("A", "Only", 30.0)],
    ));

    let mut saw_fallback = false;
    for i in 0..500 {
        let assignment = registry.assign("exp-under", &format!("user-{i}")).unwrap();
        assert_eq!(assignment.variant.id, "A");
        assert_eq!(assignment.why.fallback, assignment.why.bucket >= 30);
        saw_fallback |= assignment.why.fallback;
    }
    assert!(saw_fallback);
}

#[test]
fn empty_ids_are_hashed_not_rejected() {
    let registry = ExperimentRegistry::new();
    registry.register(ab_experiment(""));

    // "" + "" hashes to 0, bucket 0
    let assignment = registry.assign("", "").unwrap();
    assert_eq!(assignment.why.bucket, 0);
    assert_eq!(assignment.variant.id, "A");
}

#[test]
fn variant_config_is_returned_untouched() {
    let mut config = VariantConfig::new();
    config.insert("buttonColor", "green");
    config.insert("maxVehicles", 25);
    config.insert("nested", serde_json::json!({ "enabled": true, "tiers": [1, 2] }));

    let registry = ExperimentRegistry::new();
    registry.register(Experiment::new(
        "exp-config",
        "Config payload",
        vec![Variant::new("only", "Only", 100.0).with_config(config.clone())],
    ));

    let variant = registry.get_variant("exp-config", "user-1").unwrap();
    assert_eq!(variant.config, config);
    assert_eq!(variant.config.get("buttonColor"), Some(&serde_json::json!("green")));
}

proptest! {
    #[test]
    fn assignment_is_a_pure_function(
        subject in ".{0,24}",
        experiment_id in "[a-z0-9-]{0,16}",
        weights in proptest::collection::vec(0u8..=60, 1..5),
    ) {
        let variants: Vec<Variant> = weights
            .iter()
            .enumerate()
            .map(|(i, w)| Variant::new(format!("v{i}"), format!("Variant {i}"), f64::from(*w)))
            .collect();
        let experiment = Experiment::new(experiment_id.as_str(), "Generated", variants);

        let registry = ExperimentRegistry::new();
        registry.register(experiment.clone());

        let first = registry.assign(&experiment_id, &subject).unwrap();
        let second = registry.assign(&experiment_id, &subject).unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert!(first.why.bucket < 100);
        prop_assert_eq!(first.why.bucket, bucket_for(&subject, &experiment_id));

        if first.why.fallback {
            prop_assert_eq!(first.variant.id.as_str(), "v0");
        } else {
            prop_assert!(f64::from(first.why.bucket) < first.why.cumulative_weight);
        }
    }
}
