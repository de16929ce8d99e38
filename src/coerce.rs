//! Value coercion helpers shared by the attribute and mapping converters.

use crate::error::CoercionError;
use crate::flow::DataType;
use serde_json::{Map, Value, json};

/// Reinterprets a value as a byte payload.
///
/// Strings yield their UTF-8 bytes so that JSON stored as text can be re-parsed; every
/// other non-null value is serialized to JSON.
pub fn to_bytes(value: &Value) -> Result<Vec<u8>, CoercionError> {
    match value {
        Value::Null => Err(CoercionError::NullBytes),
        Value::String(text) => Ok(text.as_bytes().to_vec()),
        other => {
            serde_json::to_vec(other).map_err(|e| CoercionError::Serialization(e.to_string()))
        }
    }
}

/// Coerces `value` into the representation expected for `data_type`.
///
/// `null` passes through untouched for every type, since an attribute without a default
/// value is valid.
pub fn coerce_to(value: &Value, data_type: DataType) -> Result<Value, CoercionError> {
    if value.is_null() {
        return Ok(Value::Null);
    }

    match data_type {
        DataType::Any => Ok(value.clone()),
        DataType::String => Ok(Value::String(to_string(value))),
        DataType::Int => to_int(value).map(Value::from),
        DataType::Float64 => to_float(value).map(|f| json!(f)),
        DataType::Bool => to_bool(value).map(Value::Bool),
        DataType::Object => to_object(value, data_type).map(Value::Object),
        DataType::Params => {
            let params = to_object(value, data_type)?
                .into_iter()
                .map(|(key, v)| (key, Value::String(to_string(&v))))
                .collect::<Map<_, _>>();
            Ok(Value::Object(params))
        }
        DataType::Array => to_array(value).map(Value::Array),
        DataType::Bytes => match value {
            Value::String(_) => Ok(value.clone()),
            other => Err(incompatible(other, data_type)),
        },
    }
}

fn incompatible(value: &Value, data_type: DataType) -> CoercionError {
    CoercionError::Incompatible {
        value: value.to_string(),
        target: data_type.to_string(),
    }
}

fn to_string(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn to_int(value: &Value) -> Result<i64, CoercionError> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .ok_or_else(|| incompatible(value, DataType::Int)),
        Value::Bool(b) => Ok(i64::from(*b)),
        Value::String(text) => {
            let text = text.trim();
            if text.is_empty() {
                return Ok(0);
            }
            text.parse::<i64>()
                .ok()
                .or_else(|| text.parse::<f64>().ok().map(|f| f.trunc() as i64))
                .ok_or_else(|| incompatible(value, DataType::Int))
        }
        other => Err(incompatible(other, DataType::Int)),
    }
}

fn to_float(value: &Value) -> Result<f64, CoercionError> {
    match value {
        Value::Number(n) => n.as_f64().ok_or_else(|| incompatible(value, DataType::Float64)),
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::String(text) => {
            let text = text.trim();
            if text.is_empty() {
                return Ok(0.0);
            }
            text.parse::<f64>()
                .map_err(|_| incompatible(value, DataType::Float64))
        }
        other => Err(incompatible(other, DataType::Float64)),
    }
}

fn to_bool(value: &Value) -> Result<bool, CoercionError> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::Number(n) => Ok(n.as_f64().is_some_and(|f| f != 0.0)),
        Value::String(text) => match text.trim().to_ascii_lowercase().as_str() {
            "" | "false" => Ok(false),
            "true" => Ok(true),
            _ => Err(incompatible(value, DataType::Bool)),
        },
        other => Err(incompatible(other, DataType::Bool)),
    }
}

fn to_object(value: &Value, data_type: DataType) -> Result<Map<String, Value>, CoercionError> {
    match value {
        Value::Object(map) => Ok(map.clone()),
        Value::String(text) if text.trim().is_empty() => Ok(Map::new()),
        Value::String(text) => match serde_json::from_str(text) {
            Ok(Value::Object(map)) => Ok(map),
            _ => Err(incompatible(value, data_type)),
        },
        other => Err(incompatible(other, data_type)),
    }
}

fn to_array(value: &Value) -> Result<Vec<Value>, CoercionError> {
    match value {
        Value::Array(items) => Ok(items.clone()),
        Value::String(text) if text.trim().is_empty() => Ok(Vec::new()),
        Value::String(text) => match serde_json::from_str(text) {
            Ok(Value::Array(items)) => Ok(items),
            _ => Err(incompatible(value, DataType::Array)),
        },
        other => Err(incompatible(other, DataType::Array)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strings_become_raw_bytes() {
        let bytes = to_bytes(&json!("[{\"type\":1}]")).unwrap();
        assert_eq!(bytes, b"[{\"type\":1}]".to_vec());
    }

    #[test]
    fn structured_values_are_serialized() {
        let bytes = to_bytes(&json!([{"mapTo": "code"}])).unwrap();
        assert_eq!(bytes, br#"[{"mapTo":"code"}]"#.to_vec());
        assert_eq!(to_bytes(&Value::Null), Err(CoercionError::NullBytes));
    }

    #[test]
    fn scalar_coercions() {
        assert_eq!(coerce_to(&json!("42"), DataType::Int).unwrap(), json!(42));
        assert_eq!(coerce_to(&json!(3.9), DataType::Int).unwrap(), json!(3));
        assert_eq!(coerce_to(&json!("1.5"), DataType::Float64).unwrap(), json!(1.5));
        assert_eq!(coerce_to(&json!("TRUE"), DataType::Bool).unwrap(), json!(true));
        assert_eq!(coerce_to(&json!(12), DataType::String).unwrap(), json!("12"));
        assert_eq!(coerce_to(&Value::Null, DataType::Int).unwrap(), Value::Null);
    }

    #[test]
    fn structured_coercions() {
        assert_eq!(
            coerce_to(&json!("{\"a\":1}"), DataType::Object).unwrap(),
            json!({"a": 1})
        );
        assert_eq!(
            coerce_to(&json!({"retries": 3}), DataType::Params).unwrap(),
            json!({"retries": "3"})
        );
        assert_eq!(coerce_to(&json!(""), DataType::Array).unwrap(), json!([]));
    }

    #[test]
    fn incompatible_values_are_rejected() {
        assert!(coerce_to(&json!("abc"), DataType::Int).is_err());
        assert!(coerce_to(&json!("maybe"), DataType::Bool).is_err());
        assert!(coerce_to(&json!(7), DataType::Array).is_err());
    }
}
