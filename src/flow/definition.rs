use super::activity::ActivityConfig;
use super::data::{DataType, SchemaDef, TypedValue, ValueMap, serialize_sorted};
use ahash::AHashMap;
use itertools::Itertools;
use serde::{Serialize, Serializer};

/// A flow definition in the current engine schema.
/// This is the target structure of a legacy conversion.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowDefinition {
    pub name: String,
    #[serde(rename = "model", skip_serializing_if = "String::is_empty")]
    pub model_id: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub explicit_reply: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<IoMetadata>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tasks: Vec<TaskDefinition>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<LinkDefinition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_handler: Option<ErrorHandlerDefinition>,
}

impl FlowDefinition {
    /// Serializes the definition into the JSON layout the current engine loads.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Declared flow inputs and outputs. A side is `None` when the legacy flow declared nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IoMetadata {
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_attributes"
    )]
    pub input: Option<AHashMap<String, TypedValue>>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_attributes"
    )]
    pub output: Option<AHashMap<String, TypedValue>>,
}

/// A single step of the flow graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaskDefinition {
    pub id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(rename = "type", skip_serializing_if = "String::is_empty")]
    pub task_type: String,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "serialize_sorted")]
    pub settings: Option<ValueMap>,
    #[serde(rename = "activity", skip_serializing_if = "Option::is_none")]
    pub activity: Option<ActivityConfig>,
}

/// A directed connection between two tasks.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LinkDefinition {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(rename = "type", skip_serializing_if = "String::is_empty")]
    pub link_type: String,
    #[serde(rename = "from")]
    pub from_id: String,
    #[serde(rename = "to")]
    pub to_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub value: String,
}

/// The secondary task graph executed when the main graph fails.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ErrorHandlerDefinition {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tasks: Vec<TaskDefinition>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<LinkDefinition>,
}

#[derive(Serialize)]
struct AttributeRecord<'a> {
    name: &'a str,
    #[serde(rename = "type")]
    data_type: DataType,
    #[serde(skip_serializing_if = "serde_json::Value::is_null")]
    value: &'a serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    schema: Option<&'a SchemaDef>,
}

/// Metadata attributes are written as a name-ordered array of `{name, type, value, schema}`.
fn serialize_attributes<S: Serializer>(
    attrs: &Option<AHashMap<String, TypedValue>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let records = attrs
        .iter()
        .flatten()
        .sorted_by(|(a, _), (b, _)| a.cmp(b))
        .map(|(name, attr)| AttributeRecord {
            name,
            data_type: attr.data_type,
            value: &attr.value,
            schema: attr.schema.as_ref(),
        })
        .collect::<Vec<_>>();
    serializer.collect_seq(records)
}
