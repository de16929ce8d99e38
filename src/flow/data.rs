use ahash::AHashMap;
use itertools::Itertools;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// A loosely-typed map of named values, as found in settings, inputs and outputs.
pub type ValueMap = AHashMap<String, serde_json::Value>;

/// Schema information keyed by attribute name.
pub type SchemaMap = AHashMap<String, SchemaDef>;

/// Writes a name-keyed map with its keys in sorted order.
pub(crate) fn serialize_sorted<S, V>(
    map: &Option<AHashMap<String, V>>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    V: Serialize,
{
    match map {
        Some(map) => serializer.collect_map(map.iter().sorted_by(|(a, _), (b, _)| a.cmp(b))),
        None => serializer.serialize_none(),
    }
}

/// The value types understood by the current engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Any,
    String,
    Int,
    Float64,
    Bool,
    Object,
    Array,
    Params,
    Bytes,
}

impl DataType {
    /// Maps a legacy attribute type name onto its current equivalent.
    pub fn from_legacy(name: &str) -> Option<Self> {
        let data_type = match name.to_ascii_lowercase().as_str() {
            "" | "any" => DataType::Any,
            "string" => DataType::String,
            "integer" | "int" | "int32" | "int64" => DataType::Int,
            "number" | "double" | "float" | "float32" | "float64" => DataType::Float64,
            "boolean" | "bool" => DataType::Bool,
            "object" | "complex_object" | "complexobject" | "map" => DataType::Object,
            "array" => DataType::Array,
            "params" => DataType::Params,
            "bytes" => DataType::Bytes,
            _ => return None,
        };
        Some(data_type)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Any => "any",
            DataType::String => "string",
            DataType::Int => "int",
            DataType::Float64 => "float64",
            DataType::Bool => "bool",
            DataType::Object => "object",
            DataType::Array => "array",
            DataType::Params => "params",
            DataType::Bytes => "bytes",
        };
        write!(f, "{}", name)
    }
}

/// A type schema attached to an attribute, e.g. a JSON schema describing an object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaDef {
    #[serde(rename = "type")]
    pub schema_type: String,
    pub value: String,
}

impl SchemaDef {
    pub fn json(value: impl Into<String>) -> Self {
        Self {
            schema_type: "json".to_string(),
            value: value.into(),
        }
    }
}

/// A value carrying its declared type, used for flow metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedValue {
    pub data_type: DataType,
    pub value: serde_json::Value,
    pub schema: Option<SchemaDef>,
}

impl TypedValue {
    pub fn new(data_type: DataType, value: serde_json::Value) -> Self {
        Self {
            data_type,
            value,
            schema: None,
        }
    }
}
