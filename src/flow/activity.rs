use super::data::{SchemaMap, ValueMap, serialize_sorted};
use serde::Serialize;

/// The configuration of an activity invocation in the current engine schema.
///
/// `input` and `output` are `None` rather than empty when the activity declares nothing,
/// and `schemas` is only present when at least one attribute carried schema information.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ActivityConfig {
    #[serde(rename = "ref")]
    pub activity_ref: String,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "serialize_sorted")]
    pub settings: Option<ValueMap>,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "serialize_sorted")]
    pub input: Option<ValueMap>,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "serialize_sorted")]
    pub output: Option<ValueMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schemas: Option<SchemaConfig>,
}

/// Per-attribute schema information for an activity's inputs and outputs.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SchemaConfig {
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "serialize_sorted")]
    pub input: Option<SchemaMap>,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "serialize_sorted")]
    pub output: Option<SchemaMap>,
}
