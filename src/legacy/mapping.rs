use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a legacy mapping interprets its `value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MappingType {
    /// `value` is a single reference to resolve, e.g. `${activity.log.message}`.
    Assign,
    /// `value` is used as-is.
    Literal,
    /// `value` is an expression string that may embed references.
    Expression,
    /// `value` is an object template.
    Object,
    /// `value` is an array template.
    Array,
}

impl MappingType {
    pub fn code(self) -> u8 {
        match self {
            MappingType::Assign => 1,
            MappingType::Literal => 2,
            MappingType::Expression => 3,
            MappingType::Object => 4,
            MappingType::Array => 5,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(MappingType::Assign),
            2 => Some(MappingType::Literal),
            3 => Some(MappingType::Expression),
            4 => Some(MappingType::Object),
            5 => Some(MappingType::Array),
            _ => None,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "assign" => Some(MappingType::Assign),
            "literal" => Some(MappingType::Literal),
            "expression" => Some(MappingType::Expression),
            "object" => Some(MappingType::Object),
            "array" => Some(MappingType::Array),
            other => other.parse().ok().and_then(Self::from_code),
        }
    }
}

impl fmt::Display for MappingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MappingType::Assign => "assign",
            MappingType::Literal => "literal",
            MappingType::Expression => "expression",
            MappingType::Object => "object",
            MappingType::Array => "array",
        };
        write!(f, "{}", name)
    }
}

impl Serialize for MappingType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

impl<'de> Deserialize<'de> for MappingType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Code(i64),
            Name(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Code(code) => MappingType::from_code(code)
                .ok_or_else(|| de::Error::custom(format!("unknown mapping type code {}", code))),
            Raw::Name(name) => MappingType::from_name(&name)
                .ok_or_else(|| de::Error::custom(format!("unknown mapping type '{}'", name))),
        }
    }
}

/// A single legacy mapping rule binding `map_to` to `value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyMappingDef {
    #[serde(rename = "type")]
    pub mapping_type: MappingType,
    #[serde(default)]
    pub value: serde_json::Value,
    #[serde(rename = "mapTo", default)]
    pub map_to: String,
}

impl LegacyMappingDef {
    pub fn new(mapping_type: MappingType, map_to: &str, value: serde_json::Value) -> Self {
        Self {
            mapping_type,
            value,
            map_to: map_to.to_string(),
        }
    }
}

/// The input and output mapping lists of a legacy activity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegacyMappings {
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub input: Vec<LegacyMappingDef>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub output: Vec<LegacyMappingDef>,
}
