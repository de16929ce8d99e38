//! Common test utilities for building legacy flow definitions.
use flowbridge::prelude::*;
use serde_json::{Value, json};

#[allow(dead_code)]
pub const LEGACY_RETURN: &str = "github.com/TIBCOSoftware/flogo-contrib/activity/actreturn";
#[allow(dead_code)]
pub const LEGACY_REPLY: &str = "github.com/TIBCOSoftware/flogo-contrib/activity/actreply";
#[allow(dead_code)]
pub const CURRENT_RETURN: &str = "github.com/project-flogo/contrib/activity/actreturn";
#[allow(dead_code)]
pub const CURRENT_REPLY: &str = "github.com/project-flogo/contrib/activity/actreply";
#[allow(dead_code)]
pub const LEGACY_LOG: &str = "github.com/TIBCOSoftware/flogo-contrib/activity/log";

/// Builds a value map from `(key, value)` pairs.
#[allow(dead_code)]
pub fn values(entries: &[(&str, Value)]) -> ValueMap {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

#[allow(dead_code)]
pub fn activity_task(id: &str, activity: LegacyActivityConfig) -> LegacyTask {
    LegacyTask {
        id: id.to_string(),
        name: format!("Task {}", id),
        task_type: "activity".to_string(),
        settings: None,
        activity: Some(activity),
    }
}

#[allow(dead_code)]
pub fn link(from: &str, to: &str) -> LegacyLink {
    LegacyLink {
        name: format!("{}->{}", from, to),
        value: String::new(),
        link_type: "default".to_string(),
        from_id: from.to_string(),
        to_id: to.to_string(),
    }
}

/// A small log → return flow with metadata and mappings.
///
/// Logic: log `$flow.name`, then return `{ code: 200, data: $activity[log_1].message }`.
#[allow(dead_code)]
pub fn create_simple_legacy_flow() -> LegacyDefinition {
    let mut log = LegacyActivityConfig::new(LEGACY_LOG);
    log.input_attrs = values(&[("flowInfo", json!(false)), ("message", json!(""))]);
    log.mappings = Some(LegacyMappings {
        input: vec![LegacyMappingDef::new(
            MappingType::Assign,
            "message",
            json!("${flow.name}"),
        )],
        output: vec![],
    });

    let mut ret = LegacyActivityConfig::new(LEGACY_RETURN);
    ret.input_attrs = values(&[(
        "mappings",
        json!([
            {"type": "literal", "value": 200, "mapTo": "code"},
            {"type": "assign", "value": "${activity.log_1.message}", "mapTo": "data"}
        ]),
    )]);

    let mut metadata = LegacyMetadata::default();
    metadata.input.insert(
        "name".to_string(),
        LegacyAttribute::new("name", "string", json!("world")),
    );
    metadata.output.insert(
        "code".to_string(),
        LegacyAttribute::new("code", "integer", Value::Null),
    );

    LegacyDefinition {
        name: "Greeter".to_string(),
        model_id: "tibco-simple".to_string(),
        explicit_reply: true,
        metadata: Some(metadata),
        tasks: vec![activity_task("log_1", log), activity_task("return_2", ret)],
        links: vec![link("log_1", "return_2")],
        error_handler: None,
        root_task: None,
    }
}

/// The same flow as a legacy JSON document.
#[allow(dead_code)]
pub const SIMPLE_LEGACY_JSON: &str = r#"{
    "name": "Greeter",
    "model": "tibco-simple",
    "explicitReply": true,
    "metadata": {
        "input": [{"name": "name", "type": "string", "value": "world"}],
        "output": [{"name": "code", "type": "integer"}]
    },
    "tasks": [
        {
            "id": "log_1",
            "name": "Task log_1",
            "type": "activity",
            "activity": {
                "ref": "github.com/TIBCOSoftware/flogo-contrib/activity/log",
                "input": {"flowInfo": false, "message": ""},
                "mappings": {
                    "input": [{"type": 1, "value": "${flow.name}", "mapTo": "message"}]
                }
            }
        },
        {
            "id": "return_2",
            "name": "Task return_2",
            "type": "activity",
            "activity": {
                "ref": "github.com/TIBCOSoftware/flogo-contrib/activity/actreturn",
                "input": {
                    "mappings": [
                        {"type": "literal", "value": 200, "mapTo": "code"},
                        {"type": "assign", "value": "${activity.log_1.message}", "mapTo": "data"}
                    ]
                }
            }
        }
    ],
    "links": [{"name": "log_1->return_2", "type": "default", "from": "log_1", "to": "return_2"}]
}"#;
