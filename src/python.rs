use crate::converter::FlowConverter;
use crate::legacy::load_legacy_flows;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

/// Converts a legacy flow document into the current schema.
///
/// Args:
///     legacy_json (str): A legacy flow definition, or an application document whose
///         flows are listed under "resources".
///     pretty (bool): Indent the resulting JSON. Defaults to True.
///
/// Returns:
///     list[str]: One JSON document per converted flow, in document order.
///
/// Raises:
///     ValueError: If the document cannot be parsed, uses the deprecated root task
///         layout, or contains a mapping that cannot be resolved.
#[pyfunction]
#[pyo3(signature = (legacy_json, pretty = true))]
fn convert(legacy_json: &str, pretty: bool) -> PyResult<Vec<String>> {
    let flows = load_legacy_flows(legacy_json).map_err(|e| PyValueError::new_err(e.to_string()))?;
    let converter = FlowConverter::default();

    flows
        .iter()
        .map(|flow| {
            let converted = converter
                .convert(&flow.definition)
                .map_err(|e| PyValueError::new_err(e.to_string()))?;
            let json = if pretty {
                converted.to_json_pretty()
            } else {
                converted.to_json()
            };
            json.map_err(|e| PyValueError::new_err(e.to_string()))
        })
        .collect()
}

/// Upgrades legacy flow definitions to the current engine schema.
#[pymodule]
fn flowbridge(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(convert, m)?)?;
    Ok(())
}
