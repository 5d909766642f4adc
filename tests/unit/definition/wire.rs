use super::*;

#[test]
fn sdk_keys_are_sorted_on_load() {
    let f = parse_feature(
        "s",
        &serde_json::json!({
            "type": "sdk",
            "input_features": ["a"],
            "params": { "in_val": [2.0, 0.0, 1.0], "out_val": [20.0, 0.0, 10.0] }
        }),
    )
    .unwrap();
    let Feature::Sdk(sdk) = f else {
        panic!("expected sdk feature");
    };
    let ins: Vec<f64> = sdk.keys.iter().map(|k| k.in_val).collect();
    let outs: Vec<f64> = sdk.keys.iter().map(|k| k.out_val).collect();
    assert_eq!(ins, vec![0.0, 1.0, 2.0]);
    assert_eq!(outs, vec![0.0, 10.0, 20.0]);
}

#[test]
fn missing_and_mistyped_fields_are_load_errors() {
    let err = parse_feature("m", &serde_json::json!({ "input_features": ["a"] })).unwrap_err();
    assert!(matches!(err.errors[0], LoadError::MissingField { .. }));

    let err = parse_feature(
        "m",
        &serde_json::json!({ "type": "multiply", "input_features": "a" }),
    )
    .unwrap_err();
    assert!(matches!(err.errors[0], LoadError::WrongType { .. }));

    let err = parse_feature(
        "s",
        &serde_json::json!({
            "type": "sdk",
            "input_features": ["a"],
            "params": { "in_val": [0.0] }
        }),
    )
    .unwrap_err();
    assert_eq!(
        err.errors,
        vec![LoadError::MissingField {
            section: "features.s".to_string(),
            field: "params.out_val".to_string(),
        }]
    );
}

#[test]
fn weighted_sum_clamp_is_optional() {
    let f = parse_feature(
        "w",
        &serde_json::json!({
            "type": "weighted_sum",
            "input_features": ["a", "b"],
            "params": { "weights": [1.0, 2.0], "min": -1.0 }
        }),
    )
    .unwrap();
    let Feature::WeightedSum(ws) = f else {
        panic!("expected weighted sum");
    };
    assert_eq!(ws.range.lower_bound, Some(-1.0));
    assert_eq!(ws.range.upper_bound, None);
}

#[test]
fn null_outputs_may_be_null() {
    assert!(parse_null_outputs(&serde_json::Value::Null).unwrap().is_empty());
    assert!(parse_null_outputs(&serde_json::json!(3)).is_err());
}

#[test]
fn export_omits_empty_params() {
    let multiply = MultiplyFeature::new("m", ["a", "b"]);
    let def = FeatureDef::from_feature(FeatureRef::Multiply(&multiply));
    let v = serde_json::to_value(&def).unwrap();
    assert_eq!(
        v,
        serde_json::json!({ "type": "multiply", "input_features": ["a", "b"] })
    );
}
