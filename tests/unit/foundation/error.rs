use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        RigError::from(LoadErrors::from(LoadError::Json("x".to_string())))
            .to_string()
            .contains("load error:")
    );
    assert!(
        RigError::from(ValidationErrors::from(ValidationIssue::NoOutputs))
            .to_string()
            .contains("validation error:")
    );
    assert!(
        RigError::from(BakeErrors::from(BakeError::TooFewSourceLayers { found: 1 }))
            .to_string()
            .contains("bake error:")
    );
    assert!(
        RigError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = RigError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn collected_errors_print_one_per_line() {
    let mut errs = ValidationErrors::default();
    errs.push(ValidationIssue::NoOutputs);
    errs.push(ValidationIssue::SelfReference {
        feature: "f".to_string(),
    });
    let text = errs.to_string();
    assert_eq!(text.lines().count(), 2);
    assert!(text.contains("references itself"));
    assert!(errs.into_result().is_err());
}

#[test]
fn empty_collection_is_ok() {
    assert!(BakeErrors::default().into_result().is_ok());
}
