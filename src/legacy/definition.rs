use super::mapping::LegacyMappings;
use super::{null_as_default, string_or_int};
use crate::error::LoadError;
use crate::flow::ValueMap;
use ahash::AHashMap;
use serde::{Deserialize, Deserializer};

/// A flow definition as written by the legacy engine.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyDefinition {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "model", default)]
    pub model_id: String,
    #[serde(default)]
    pub explicit_reply: bool,
    #[serde(default)]
    pub metadata: Option<LegacyMetadata>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tasks: Vec<LegacyTask>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub links: Vec<LegacyLink>,
    #[serde(default)]
    pub error_handler: Option<LegacyErrorHandler>,
    /// Only set by the oldest layout, where the graph hangs off a single root task.
    #[serde(default)]
    pub root_task: Option<Box<LegacyTask>>,
}

impl LegacyDefinition {
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Declared flow inputs and outputs, keyed by attribute name.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LegacyMetadata {
    #[serde(default, deserialize_with = "attributes_by_name")]
    pub input: AHashMap<String, LegacyAttribute>,
    #[serde(default, deserialize_with = "attributes_by_name")]
    pub output: AHashMap<String, LegacyAttribute>,
}

/// A named, typed legacy value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LegacyAttribute {
    pub name: String,
    #[serde(rename = "type", default)]
    pub attr_type: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

impl LegacyAttribute {
    pub fn new(name: &str, attr_type: &str, value: serde_json::Value) -> Self {
        Self {
            name: name.to_string(),
            attr_type: attr_type.to_string(),
            value,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LegacyTask {
    #[serde(deserialize_with = "string_or_int")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default, deserialize_with = "string_or_int")]
    pub task_type: String,
    #[serde(default)]
    pub settings: Option<ValueMap>,
    #[serde(rename = "activity", default)]
    pub activity: Option<LegacyActivityConfig>,
}

/// The configuration of an activity invocation in the legacy schema.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LegacyActivityConfig {
    #[serde(rename = "ref")]
    pub activity_ref: String,
    #[serde(default)]
    pub settings: Option<ValueMap>,
    #[serde(rename = "input", default, deserialize_with = "null_as_default")]
    pub input_attrs: ValueMap,
    #[serde(rename = "output", default, deserialize_with = "null_as_default")]
    pub output_attrs: ValueMap,
    #[serde(default)]
    pub mappings: Option<LegacyMappings>,
}

impl LegacyActivityConfig {
    pub fn new(activity_ref: &str) -> Self {
        Self {
            activity_ref: activity_ref.to_string(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LegacyLink {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub value: String,
    #[serde(rename = "type", default, deserialize_with = "string_or_int")]
    pub link_type: String,
    #[serde(rename = "from", deserialize_with = "string_or_int")]
    pub from_id: String,
    #[serde(rename = "to", deserialize_with = "string_or_int")]
    pub to_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LegacyErrorHandler {
    #[serde(default, deserialize_with = "null_as_default")]
    pub tasks: Vec<LegacyTask>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub links: Vec<LegacyLink>,
}

/// Legacy metadata lists attributes as an array; they are addressed by name.
fn attributes_by_name<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<AHashMap<String, LegacyAttribute>, D::Error> {
    let attrs: Option<Vec<LegacyAttribute>> = Option::deserialize(deserializer)?;
    Ok(attrs
        .unwrap_or_default()
        .into_iter()
        .map(|attr| (attr.name.clone(), attr))
        .collect())
}
