//! JSON wire format: section parsers for loading and serde structs for export.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::{
    curve::key::CurveKey,
    feature::{Feature, FeatureKind, FeatureRef, MultiplyFeature, SdkFeature, WeightedSumFeature},
    foundation::error::{LoadError, LoadErrors},
};

/// Exported shape of a definition.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DefinitionDef {
    /// Input names.
    pub inputs: Vec<String>,
    /// Feature name -> feature payload.
    pub features: BTreeMap<String, FeatureDef>,
    /// Output name -> source name.
    pub outputs: BTreeMap<String, String>,
    /// Outputs a downstream layer may find missing.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub null_outputs: Vec<String>,
}

/// Exported shape of a feature.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FeatureDef {
    /// Variant discriminator.
    #[serde(rename = "type")]
    pub kind: FeatureKind,
    /// Referenced names.
    pub input_features: Vec<String>,
    /// Variant parameters.
    #[serde(default, skip_serializing_if = "ParamsDef::is_empty")]
    pub params: ParamsDef,
}

/// Variant parameters; which fields are present depends on the feature type.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ParamsDef {
    /// Weighted-sum weights, parallel to `input_features`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<Vec<f64>>,
    /// Weighted-sum lower clamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Weighted-sum upper clamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// SDK key inputs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_val: Option<Vec<f64>>,
    /// SDK key outputs, parallel to `in_val`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_val: Option<Vec<f64>>,
}

impl ParamsDef {
    fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl FeatureDef {
    pub(crate) fn from_feature(feature: FeatureRef<'_>) -> Self {
        match feature {
            FeatureRef::Multiply(f) => Self {
                kind: FeatureKind::Multiply,
                input_features: f.inputs.clone(),
                params: ParamsDef::default(),
            },
            FeatureRef::WeightedSum(f) => Self {
                kind: FeatureKind::WeightedSum,
                input_features: f.weights.keys().cloned().collect(),
                params: ParamsDef {
                    weights: Some(f.weights.values().copied().collect()),
                    min: f.range.lower_bound,
                    max: f.range.upper_bound,
                    ..ParamsDef::default()
                },
            },
            FeatureRef::Sdk(f) => Self {
                kind: FeatureKind::Sdk,
                input_features: f.inputs.clone(),
                params: ParamsDef {
                    in_val: Some(f.keys.iter().map(|k| k.in_val).collect()),
                    out_val: Some(f.keys.iter().map(|k| k.out_val).collect()),
                    ..ParamsDef::default()
                },
            },
        }
    }
}

/// Parse the `inputs` section.
pub(crate) fn parse_inputs(value: &Value) -> Result<Vec<String>, LoadErrors> {
    string_array(value, "inputs", "inputs").map_err(LoadErrors::from)
}

/// Parse the `outputs` section.
pub(crate) fn parse_outputs(value: &Value) -> Result<BTreeMap<String, String>, LoadErrors> {
    let Some(obj) = value.as_object() else {
        return Err(wrong_type("outputs", "outputs", "an object").into());
    };
    let mut errors = LoadErrors::default();
    let mut outputs = BTreeMap::new();
    for (name, source) in obj {
        match source.as_str() {
            Some(s) => {
                outputs.insert(name.clone(), s.to_string());
            }
            None => errors.push(wrong_type("outputs", name, "a string")),
        }
    }
    errors.into_result().map(|()| outputs)
}

/// Parse the optional `null_outputs` section; `null` reads as empty.
pub(crate) fn parse_null_outputs(value: &Value) -> Result<Vec<String>, LoadErrors> {
    if value.is_null() {
        return Ok(Vec::new());
    }
    string_array(value, "null_outputs", "null_outputs").map_err(LoadErrors::from)
}

/// Parse one member of the `features` object.
pub(crate) fn parse_feature(name: &str, payload: &Value) -> Result<Feature, LoadErrors> {
    let section = format!("features.{name}");
    if !payload.is_object() {
        return Err(wrong_type(&section, name, "an object").into());
    }

    let kind_str = match payload.get("type") {
        Some(Value::String(s)) => s.as_str(),
        Some(_) => return Err(wrong_type(&section, "type", "a string").into()),
        None => return Err(missing(&section, "type").into()),
    };
    let Some(kind) = FeatureKind::parse(kind_str) else {
        return Err(LoadError::UnknownFeatureType {
            feature: name.to_string(),
            kind: kind_str.to_string(),
        }
        .into());
    };

    let inputs = match payload.get("input_features") {
        Some(v) => string_array(v, &section, "input_features")?,
        None => return Err(missing(&section, "input_features").into()),
    };
    let params = payload.get("params");

    match kind {
        FeatureKind::Multiply => Ok(MultiplyFeature::new(name, inputs).into()),
        FeatureKind::WeightedSum => {
            let weights = number_array(param(params, &section, "weights")?, &section, "weights")?;
            check_len(name, "weights", inputs.len(), weights.len())?;
            let min = optional_number(params, &section, "min")?;
            let max = optional_number(params, &section, "max")?;
            Ok(WeightedSumFeature::new(name, inputs.into_iter().zip(weights))
                .with_range(min, max)
                .into())
        }
        FeatureKind::Sdk => {
            let ins = number_array(param(params, &section, "in_val")?, &section, "in_val")?;
            let outs = number_array(param(params, &section, "out_val")?, &section, "out_val")?;
            check_len(name, "out_val", ins.len(), outs.len())?;
            let keys = ins
                .into_iter()
                .zip(outs)
                .map(|(i, o)| CurveKey::new(i, o))
                .collect();
            Ok(SdkFeature::with_inputs(name, inputs, keys).into())
        }
    }
}

fn param<'a>(params: Option<&'a Value>, section: &str, key: &str) -> Result<&'a Value, LoadError> {
    match params {
        None => Err(missing(section, "params")),
        Some(p) if !p.is_object() => Err(wrong_type(section, "params", "an object")),
        Some(p) => p
            .get(key)
            .ok_or_else(|| missing(section, &format!("params.{key}"))),
    }
}

fn optional_number(
    params: Option<&Value>,
    section: &str,
    key: &str,
) -> Result<Option<f64>, LoadError> {
    match params.and_then(|p| p.get(key)) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => v
            .as_f64()
            .map(Some)
            .ok_or_else(|| wrong_type(section, &format!("params.{key}"), "a number")),
    }
}

fn string_array(value: &Value, section: &str, field: &str) -> Result<Vec<String>, LoadError> {
    let Some(items) = value.as_array() else {
        return Err(wrong_type(section, field, "an array of strings"));
    };
    items
        .iter()
        .map(|v| {
            v.as_str()
                .map(str::to_string)
                .ok_or_else(|| wrong_type(section, field, "an array of strings"))
        })
        .collect()
}

fn number_array(value: &Value, section: &str, field: &str) -> Result<Vec<f64>, LoadError> {
    let Some(items) = value.as_array() else {
        return Err(wrong_type(section, field, "an array of numbers"));
    };
    items
        .iter()
        .map(|v| {
            v.as_f64()
                .ok_or_else(|| wrong_type(section, field, "an array of numbers"))
        })
        .collect()
}

fn check_len(
    feature: &str,
    field: &'static str,
    expected: usize,
    found: usize,
) -> Result<(), LoadError> {
    if expected == found {
        return Ok(());
    }
    Err(LoadError::LengthMismatch {
        feature: feature.to_string(),
        field,
        expected,
        found,
    })
}

fn missing(section: &str, field: &str) -> LoadError {
    LoadError::MissingField {
        section: section.to_string(),
        field: field.to_string(),
    }
}

fn wrong_type(section: &str, field: &str, expected: &'static str) -> LoadError {
    LoadError::WrongType {
        section: section.to_string(),
        field: field.to_string(),
        expected,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/definition/wire.rs"]
mod tests;
