use super::*;
use crate::{
    curve::key::CurveKey,
    feature::{MultiplyFeature, SdkFeature, WeightedSumFeature},
};

fn valid_def() -> Definition {
    let mut def = Definition::new();
    def.add_input("a");
    def.add_input("b");
    def.add_feature(MultiplyFeature::new("m", ["a", "b"]));
    def.add_feature(WeightedSumFeature::new("w", [("a", 0.5), ("m", 0.5)]));
    def.add_feature(SdkFeature::new(
        "s",
        "w",
        vec![CurveKey::new(0.0, 0.0), CurveKey::new(1.0, 2.0)],
    ));
    def.set_output("out", "s");
    def
}

#[test]
fn well_formed_definition_has_no_issues() {
    let report = valid_def().validation_report();
    assert!(report.is_valid(), "{:?}", report.issues);
}

#[test]
fn feature_named_like_input_is_a_collision() {
    let mut def = valid_def();
    def.add_feature(MultiplyFeature::new("a", ["b", "m"]));
    let report = def.validation_report();
    assert!(
        report
            .issues
            .contains(&ValidationIssue::NameCollision { name: "a".to_string() })
    );
}

#[test]
fn duplicate_feature_names_across_variants_are_reported_once() {
    let mut def = valid_def();
    def.add_feature(MultiplyFeature::new("w", ["a", "b"]));
    def.add_feature(SdkFeature::new(
        "w",
        "a",
        vec![CurveKey::new(0.0, 0.0), CurveKey::new(1.0, 1.0)],
    ));
    let dupes: Vec<_> = def
        .validation_report()
        .issues
        .into_iter()
        .filter(|i| matches!(i, ValidationIssue::DuplicateName { .. }))
        .collect();
    assert_eq!(dupes, vec![ValidationIssue::DuplicateName { name: "w".to_string() }]);
}

#[test]
fn outputs_must_exist_and_resolve() {
    let mut def = valid_def();
    def.remove_output("out");
    assert!(def.validation_report().issues.contains(&ValidationIssue::NoOutputs));

    def.set_output("out", "nowhere");
    assert!(def.validation_report().issues.contains(&ValidationIssue::UnresolvedOutput {
        output: "out".to_string(),
        source_name: "nowhere".to_string(),
    }));

    def.set_output("out", "a");
    assert!(def.validation_report().is_valid());
}

#[test]
fn null_output_sharing_an_output_name_is_invalid() {
    let mut def = valid_def();
    def.add_null_output("spare");
    assert!(def.validation_report().is_valid());

    def.add_null_output("out");
    assert!(def.validation_report().issues.contains(&ValidationIssue::NullOutputConflict {
        name: "out".to_string(),
    }));
}

#[test]
fn duplicate_null_output_is_invalid() {
    let mut def = valid_def();
    def.add_null_output("spare");
    def.add_null_output("spare");
    assert_eq!(
        def.validation_report().issues,
        vec![ValidationIssue::DuplicateNullOutput {
            name: "spare".to_string()
        }]
    );
}

#[test]
fn every_finding_is_collected() {
    let mut def = Definition::new();
    def.add_input("a");
    def.add_feature(MultiplyFeature::new("m", ["m"]));
    def.add_null_output("n");
    def.add_null_output("n");
    let issues = def.validation_report().issues;
    assert!(issues.contains(&ValidationIssue::SelfReference { feature: "m".to_string() }));
    assert!(issues.iter().any(|i| matches!(i, ValidationIssue::InsufficientInputs { .. })));
    assert!(issues.contains(&ValidationIssue::NoOutputs));
    assert!(issues.contains(&ValidationIssue::DuplicateNullOutput { name: "n".to_string() }));
}
