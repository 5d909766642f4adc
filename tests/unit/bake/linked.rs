use std::collections::BTreeMap;

use super::*;
use crate::feature::{FeatureRef, MultiplyFeature, WeightedSumFeature};

fn base_layer() -> Definition {
    let mut def = Definition::new();
    for i in ["a", "b", "c"] {
        def.add_input(i);
    }
    def.add_feature(WeightedSumFeature::new("x", [("a", 0.5), ("b", 0.5)]));
    def.set_output("x", "x");
    def.set_output("c", "c");
    def
}

fn top_layer() -> Definition {
    let mut def = Definition::new();
    def.add_input("x");
    def.add_input("c");
    def.add_feature(WeightedSumFeature::new("y", [("x", 2.0), ("c", 1.0)]));
    def.set_output("y", "y");
    def
}

fn linked_pair(store: &mut DefinitionStore) -> LinkedDefinitions {
    let l0 = store.insert(base_layer());
    let l1 = store.insert(top_layer());
    LinkedDefinitions::new([l0, l1])
}

#[test]
fn bakes_two_valid_layers() {
    let mut store = DefinitionStore::new();
    let mut linked = linked_pair(&mut store);
    assert!(linked.validate_links(&store).is_ok());

    let summary = linked.bake(&mut store, &BakeOpts::default()).unwrap();
    assert_eq!(
        summary,
        BakeSummary {
            requested_outputs: 1,
            baked_outputs: vec!["y".to_string()],
            null_outputs: Vec::new(),
            feature_count: 1,
            baked_valid: true,
        }
    );

    let baked = linked.baked_definition().unwrap();
    match baked.features().find("y:1") {
        Some(FeatureRef::WeightedSum(f)) => assert_eq!(
            f.weights,
            BTreeMap::from([
                ("a".to_string(), 1.0),
                ("b".to_string(), 1.0),
                ("c".to_string(), 1.0),
            ])
        ),
        other => panic!("expected weighted sum, got {other:?}"),
    }
    assert_eq!(baked.validity(), crate::Validity::Valid);
}

#[test]
fn one_layer_is_not_enough() {
    let mut store = DefinitionStore::new();
    let only = store.insert(base_layer());
    let mut linked = LinkedDefinitions::new([only]);

    let err = linked.bake(&mut store, &BakeOpts::default()).unwrap_err();
    assert_eq!(err.errors, [BakeError::TooFewSourceLayers { found: 1 }]);
    assert!(linked.baked_definition().is_none());
}

#[test]
fn unknown_ids_are_reported() {
    let mut store = DefinitionStore::new();
    let l0 = store.insert(base_layer());
    let mut linked = LinkedDefinitions::new([l0, DefinitionId(7)]);

    let err = linked.bake(&mut store, &BakeOpts::default()).unwrap_err();
    assert_eq!(err.errors, [BakeError::UnknownDefinition { index: 1 }]);
}

#[test]
fn invalid_source_layers_are_rejected() {
    let mut store = DefinitionStore::new();
    let mut broken = top_layer();
    broken.add_feature(MultiplyFeature::new("solo", ["x"]));
    let l0 = store.insert(base_layer());
    let l1 = store.insert(broken);
    let mut linked = LinkedDefinitions::new([l0, l1]);

    let err = linked.bake(&mut store, &BakeOpts::default()).unwrap_err();
    assert_eq!(err.errors, [BakeError::InvalidSourceLayer { index: 1 }]);
    assert_eq!(
        store.get(l1).map(Definition::validity),
        Some(crate::Validity::Invalid)
    );
}

#[test]
fn failed_bake_keeps_previous_result() {
    let mut store = DefinitionStore::new();
    let mut linked = linked_pair(&mut store);
    linked.bake(&mut store, &BakeOpts::default()).unwrap();
    let before = linked.baked_definition().cloned();

    let l1 = linked.source_definitions[1];
    let top = store.get_mut(l1).unwrap();
    top.add_input("ghost");
    top.add_feature(MultiplyFeature::new("g", ["ghost", "x"]));
    top.set_output("g", "g");

    let err = linked.bake(&mut store, &BakeOpts::default()).unwrap_err();
    assert!(err.errors.contains(&BakeError::MissingLayerConnection {
        layer: 1,
        name: "ghost".to_string(),
    }));
    assert_eq!(linked.baked_definition().cloned(), before);
}

#[test]
fn unused_unconnected_input_still_fails() {
    let mut store = DefinitionStore::new();
    let mut top = top_layer();
    top.add_input("ghost");
    let l0 = store.insert(base_layer());
    let l1 = store.insert(top);
    let mut linked = LinkedDefinitions::new([l0, l1]);

    let err = linked.bake(&mut store, &BakeOpts::default()).unwrap_err();
    assert_eq!(
        err.errors,
        [BakeError::MissingLayerConnection {
            layer: 1,
            name: "ghost".to_string(),
        }]
    );
    assert!(linked.baked_definition().is_none());
}

#[test]
fn links_report_every_unconnected_input() {
    let mut store = DefinitionStore::new();
    let mut top = top_layer();
    top.add_input("ghost");
    top.add_input("spare");
    let mut base = base_layer();
    base.add_null_output("spare");
    let l0 = store.insert(base);
    let l1 = store.insert(top);

    let err = LinkedDefinitions::new([l0, l1])
        .validate_links(&store)
        .unwrap_err();
    assert_eq!(
        err.errors,
        [crate::ValidationIssue::UnconnectedInput {
            layer: 1,
            name: "ghost".to_string(),
        }]
    );
}

#[test]
fn store_hands_out_sequential_ids() {
    let mut store = DefinitionStore::new();
    assert!(store.is_empty());
    let a = store.insert(Definition::new());
    let b = store.insert(Definition::new());
    assert_eq!((a, b), (DefinitionId(0), DefinitionId(1)));
    assert_eq!(store.len(), 2);
    assert_eq!(store.iter().map(|(id, _)| id).collect::<Vec<_>>(), [a, b]);
    assert!(store.get(DefinitionId(2)).is_none());
}
