use super::mappings::whole_reference;
use crate::coerce::coerce_to;
use crate::error::ConversionError;
use crate::flow::{DataType, SchemaDef, SchemaMap, TypedValue, ValueMap};
use crate::legacy::LegacyAttribute;
use crate::resolve::DataResolver;
use serde_json::Value;

/// Converts a typed legacy attribute (flow metadata) into a `TypedValue`.
pub fn convert_legacy_attr(attr: &LegacyAttribute) -> Result<TypedValue, ConversionError> {
    let data_type = DataType::from_legacy(&attr.attr_type).ok_or_else(|| {
        ConversionError::AttributeConversionFailed {
            name: attr.name.clone(),
            message: format!("unknown legacy type '{}'", attr.attr_type),
        }
    })?;

    let (raw_value, schema) = match split_complex_object(&attr.value) {
        Some((value, schema)) => (value, schema),
        None => (&attr.value, None),
    };

    let value = coerce_to(raw_value, data_type).map_err(|e| {
        ConversionError::AttributeConversionFailed {
            name: attr.name.clone(),
            message: e.to_string(),
        }
    })?;

    Ok(TypedValue {
        data_type,
        value,
        schema,
    })
}

/// Converts a map of legacy values (settings, activity inputs or outputs).
///
/// Returns the converted values together with any schema information found in
/// complex-object envelopes. A string that is exactly one legacy reference becomes an
/// `=`-prefixed expression in the current addressing syntax and must resolve; any other
/// string is copied unchanged.
pub fn convert_values(
    values: &ValueMap,
    resolver: &dyn DataResolver,
) -> Result<(ValueMap, SchemaMap), ConversionError> {
    let mut converted = ValueMap::with_capacity(values.len());
    let mut schemas = SchemaMap::new();

    for (name, value) in values {
        if let Some((inner, schema)) = split_complex_object(value) {
            if let Some(schema) = schema {
                schemas.insert(name.clone(), schema);
            }
            converted.insert(name.clone(), inner.clone());
            continue;
        }

        let value = match value.as_str().and_then(whole_reference) {
            Some(reference) => {
                resolver.validate_reference(&reference).map_err(|message| {
                    ConversionError::AttributeConversionFailed {
                        name: name.clone(),
                        message,
                    }
                })?;
                Value::String(format!("={}", reference))
            }
            None => value.clone(),
        };
        converted.insert(name.clone(), value);
    }

    Ok((converted, schemas))
}

/// Recognises the legacy complex-object envelope `{"metadata": <schema>, "value": <v>}`.
fn split_complex_object(value: &Value) -> Option<(&Value, Option<SchemaDef>)> {
    let object = value.as_object()?;
    if object.len() > 2 || !object.contains_key("metadata") {
        return None;
    }
    let inner = object.get("value")?;
    let schema = match object.get("metadata") {
        Some(Value::String(text)) if !text.trim().is_empty() => Some(SchemaDef::json(text.clone())),
        Some(Value::Object(map)) if !map.is_empty() => {
            Some(SchemaDef::json(Value::Object(map.clone()).to_string()))
        }
        _ => None,
    };
    Some((inner, schema))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::ScopedResolver;
    use serde_json::json;

    fn values(entries: &[(&str, Value)]) -> ValueMap {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn convert(entries: &[(&str, Value)]) -> (ValueMap, SchemaMap) {
        convert_values(&values(entries), &ScopedResolver::default()).unwrap()
    }

    #[test]
    fn plain_values_are_copied() {
        let (converted, schemas) = convert(&[("message", json!("hello")), ("count", json!(3))]);
        assert_eq!(converted["message"], json!("hello"));
        assert_eq!(converted["count"], json!(3));
        assert!(schemas.is_empty());
    }

    #[test]
    fn references_become_expressions() {
        let (converted, _) = convert(&[("msg", json!("${activity.log.message}"))]);
        assert_eq!(converted["msg"], json!("=$activity[log].message"));
    }

    #[test]
    fn dollar_literals_are_not_references() {
        let (converted, _) = convert(&[
            ("price", json!("$5.00 off")),
            ("greeting", json!("$flow.name says hi")),
            ("bare", json!("$")),
        ]);
        assert_eq!(converted["price"], json!("$5.00 off"));
        assert_eq!(converted["greeting"], json!("$flow.name says hi"));
        assert_eq!(converted["bare"], json!("$"));
    }

    #[test]
    fn unresolvable_reference_names_the_value() {
        let err = convert_values(
            &values(&[("body", json!("${trigger.body}"))]),
            &ScopedResolver::default(),
        )
        .unwrap_err();
        match err {
            ConversionError::AttributeConversionFailed { name, message } => {
                assert_eq!(name, "body");
                assert!(message.contains("trigger"));
            }
            other => panic!("Expected AttributeConversionFailed, got {:?}", other),
        }
    }

    #[test]
    fn complex_objects_yield_schemas() {
        let schema = r#"{"type":"object","properties":{"id":{"type":"string"}}}"#;
        let (converted, schemas) = convert(&[(
            "customer",
            json!({"metadata": schema, "value": {"id": "c-1"}}),
        )]);
        assert_eq!(converted["customer"], json!({"id": "c-1"}));
        assert_eq!(schemas["customer"], SchemaDef::json(schema));
    }

    #[test]
    fn complex_object_without_metadata_has_no_schema() {
        let (converted, schemas) = convert(&[("data", json!({"metadata": "", "value": [1, 2]}))]);
        assert_eq!(converted["data"], json!([1, 2]));
        assert!(schemas.is_empty());
    }

    #[test]
    fn attributes_are_coerced_to_their_type() {
        let attr = LegacyAttribute::new("retries", "integer", json!("5"));
        let typed = convert_legacy_attr(&attr).unwrap();
        assert_eq!(typed.data_type, DataType::Int);
        assert_eq!(typed.value, json!(5));
        assert!(typed.schema.is_none());
    }

    #[test]
    fn unknown_attribute_type_names_the_attribute() {
        let attr = LegacyAttribute::new("when", "timestamp-ish", json!(null));
        match convert_legacy_attr(&attr).unwrap_err() {
            ConversionError::AttributeConversionFailed { name, message } => {
                assert_eq!(name, "when");
                assert!(message.contains("timestamp-ish"));
            }
            other => panic!("Expected AttributeConversionFailed, got {:?}", other),
        }
    }
}
