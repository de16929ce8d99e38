//! Integration tests for flowbridge
//!
//! End-to-end tests from legacy JSON documents to current-schema JSON.
//!
mod common;
use common::*;
use flowbridge::prelude::*;
use serde_json::{Value, json};

#[cfg(test)]
mod integration_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn convert_to_json(legacy_json: &str) -> Value {
        let legacy = LegacyDefinition::from_json(legacy_json).expect("Failed to parse legacy JSON");
        let flow = FlowConverter::default()
            .convert(&legacy)
            .expect("Failed to convert");
        serde_json::from_str(&flow.to_json_pretty().expect("Failed to serialize"))
            .expect("Output should be valid JSON")
    }

    #[test]
    fn test_legacy_json_matches_builder_fixture() {
        let parsed = LegacyDefinition::from_json(SIMPLE_LEGACY_JSON).unwrap();
        assert_eq!(parsed, create_simple_legacy_flow());
    }

    #[test]
    fn test_simple_flow_end_to_end() {
        let output = convert_to_json(SIMPLE_LEGACY_JSON);

        assert_eq!(
            output,
            json!({
                "name": "Greeter",
                "model": "tibco-simple",
                "explicitReply": true,
                "metadata": {
                    "input": [{"name": "name", "type": "string", "value": "world"}],
                    "output": [{"name": "code", "type": "int"}]
                },
                "tasks": [
                    {
                        "id": "log_1",
                        "name": "Task log_1",
                        "type": "activity",
                        "activity": {
                            "ref": "github.com/TIBCOSoftware/flogo-contrib/activity/log",
                            "input": {"flowInfo": false, "message": "=$flow.name"}
                        }
                    },
                    {
                        "id": "return_2",
                        "name": "Task return_2",
                        "type": "activity",
                        "activity": {
                            "ref": "github.com/project-flogo/contrib/activity/actreturn",
                            "settings": {
                                "mappings": {"code": 200, "data": "=$activity[log_1].message"}
                            }
                        }
                    }
                ],
                "links": [{"name": "log_1->return_2", "type": "default", "from": "log_1", "to": "return_2"}]
            })
        );
    }

    #[test]
    fn test_single_return_task_scenario() {
        let legacy_json = r#"{
            "name": "P",
            "tasks": [{
                "id": 1,
                "type": "activity",
                "activity": {"ref": "github.com/TIBCOSoftware/flogo-contrib/activity/actreturn", "input": null}
            }],
            "links": []
        }"#;

        let legacy = LegacyDefinition::from_json(legacy_json).unwrap();
        assert_eq!(legacy.tasks[0].id, "1");

        let flow = FlowConverter::default().convert(&legacy).unwrap();
        assert_eq!(flow.tasks.len(), 1);
        assert_eq!(
            flow.tasks[0].activity.as_ref().unwrap().activity_ref,
            CURRENT_RETURN
        );
        assert!(flow.links.is_empty());
    }

    #[test]
    fn test_root_task_document_is_rejected() {
        let legacy_json = r#"{"name": "Old", "rootTask": {"id": 1, "type": 1, "tasks": []}}"#;
        let legacy = LegacyDefinition::from_json(legacy_json).unwrap();

        let result = FlowConverter::default().convert(&legacy);
        assert_eq!(result, Err(ConversionError::UnsupportedLegacyFormat));
    }

    #[test]
    fn test_null_root_task_is_not_the_old_layout() {
        let legacy_json = r#"{"name": "New", "rootTask": null, "tasks": null, "links": null}"#;
        let legacy = LegacyDefinition::from_json(legacy_json).unwrap();

        let output = FlowConverter::default().convert(&legacy).unwrap();
        assert_eq!(serde_json::to_value(&output).unwrap(), json!({"name": "New"}));
    }

    #[test]
    fn test_complex_object_schema_is_written() {
        let legacy_json = r#"{
            "name": "Schemas",
            "tasks": [{
                "id": "rest",
                "activity": {
                    "ref": "github.com/acme/activity/rest",
                    "input": {
                        "body": {"metadata": "{\"type\":\"object\"}", "value": {"id": 1}},
                        "method": "POST"
                    }
                }
            }]
        }"#;

        let output = convert_to_json(legacy_json);
        let activity = &output["tasks"][0]["activity"];
        assert_eq!(activity["input"], json!({"body": {"id": 1}, "method": "POST"}));
        assert_eq!(
            activity["schemas"],
            json!({"input": {"body": {"type": "json", "value": "{\"type\":\"object\"}"}}})
        );
    }

    #[test]
    fn test_value_maps_are_written_in_key_order() {
        let legacy_json = r#"{
            "name": "Ordered",
            "tasks": [{
                "id": "t",
                "settings": {"zulu": 1, "alpha": 2, "mike": 3},
                "activity": {
                    "ref": "github.com/acme/activity/echo",
                    "settings": {"timeout": 5, "retries": 1, "delay": 2},
                    "input": {"zeta": 1, "eta": 2, "beta": 3, "alpha": 4, "kappa": 5},
                    "output": {"result": null, "code": null}
                }
            }]
        }"#;

        let legacy = LegacyDefinition::from_json(legacy_json).unwrap();
        let flow = FlowConverter::default().convert(&legacy).unwrap();
        let text = flow.to_json().unwrap();

        let ordered = |keys: &[&str]| {
            let positions: Vec<usize> = keys
                .iter()
                .map(|key| text.find(&format!("\"{}\"", key)).unwrap())
                .collect();
            assert!(
                positions.windows(2).all(|w| w[0] < w[1]),
                "{:?} out of order in {}",
                keys,
                text
            );
        };
        ordered(&["alpha", "mike", "zulu"]);
        ordered(&["delay", "retries", "timeout"]);
        ordered(&["beta", "eta", "kappa", "zeta"]);
        ordered(&["code", "result"]);

        let again = FlowConverter::default().convert(&legacy).unwrap();
        assert_eq!(text, again.to_json().unwrap());
    }

    #[test]
    fn test_application_document_with_resources() {
        let app_json = format!(
            r#"{{"name": "app", "type": "flogo:app", "resources": [
                {{"id": "flow:greeter", "data": {}}},
                {{"id": "flow:empty", "data": {{"name": "Empty"}}}}
            ]}}"#,
            SIMPLE_LEGACY_JSON
        );

        let flows = load_legacy_flows(&app_json).unwrap();
        assert_eq!(flows.len(), 2);
        assert_eq!(flows[0].resource_id.as_deref(), Some("flow:greeter"));
        assert_eq!(flows[1].definition.name, "Empty");

        let converter = FlowConverter::default();
        for flow in &flows {
            assert!(converter.convert(&flow.definition).is_ok());
        }
    }

    #[test]
    fn test_bare_flow_document_has_no_resource_id() {
        let flows = load_legacy_flows(SIMPLE_LEGACY_JSON).unwrap();
        assert_eq!(flows.len(), 1);
        assert!(flows[0].resource_id.is_none());
    }

    #[test]
    fn test_invalid_documents_fail_to_load() {
        assert!(matches!(
            load_legacy_flows("{not json"),
            Err(LoadError::JsonParseError(_))
        ));
        assert!(matches!(
            load_legacy_flows(r#"{"resources": []}"#),
            Err(LoadError::NoFlows)
        ));
    }
}
