use super::definition::LegacyDefinition;
use crate::error::LoadError;
use serde::Deserialize;

/// A flow found in a legacy document, with the resource id it was stored under (if any).
#[derive(Debug, Clone, PartialEq)]
pub struct LegacyFlow {
    pub resource_id: Option<String>,
    pub definition: LegacyDefinition,
}

#[derive(Deserialize)]
struct RawApp {
    resources: Vec<RawResource>,
}

#[derive(Deserialize)]
struct RawResource {
    id: String,
    data: LegacyDefinition,
}

/// Reads every flow from a legacy document.
///
/// Accepts either a bare flow definition or an application document whose flows are
/// stored as `{"resources": [{"id": "flow:name", "data": {...}}]}`.
pub fn load_legacy_flows(json: &str) -> Result<Vec<LegacyFlow>, LoadError> {
    let raw: serde_json::Value = serde_json::from_str(json)?;

    if raw.get("resources").is_some() {
        let app: RawApp = serde_json::from_value(raw)?;
        if app.resources.is_empty() {
            return Err(LoadError::NoFlows);
        }
        return Ok(app
            .resources
            .into_iter()
            .map(|resource| LegacyFlow {
                resource_id: Some(resource.id),
                definition: resource.data,
            })
            .collect());
    }

    Ok(vec![LegacyFlow {
        resource_id: None,
        definition: serde_json::from_value(raw)?,
    }])
}
