use super::mappings::convert_legacy_mappings;
use super::upgrade::UpgradeTable;
use super::values::convert_values;
use crate::error::ConversionError;
use crate::flow::{ActivityConfig, SchemaConfig, SchemaMap, ValueMap};
use crate::legacy::LegacyActivityConfig;
use crate::resolve::DataResolver;

/// Builds a current activity configuration from a legacy one.
///
/// Mapping-derived values overwrite attribute values with the same name. Activities in
/// `upgrades` get their `mappings` input relocated into settings and carry no input map.
pub fn convert_activity_config(
    legacy: &LegacyActivityConfig,
    resolver: &dyn DataResolver,
    upgrades: &UpgradeTable,
) -> Result<ActivityConfig, ConversionError> {
    let mut config = ActivityConfig {
        activity_ref: legacy.activity_ref.clone(),
        settings: legacy.settings.clone(),
        ..Default::default()
    };

    let activity_failed = |e: ConversionError| ConversionError::ActivityConversionFailed {
        activity_ref: legacy.activity_ref.clone(),
        source: Box::new(e),
    };

    let (settings, _) = match &legacy.settings {
        Some(settings) => convert_values(settings, resolver).map_err(activity_failed)?,
        None => Default::default(),
    };
    let (mut input, input_schemas) =
        convert_values(&legacy.input_attrs, resolver).map_err(activity_failed)?;
    let (mut output, output_schemas) =
        convert_values(&legacy.output_attrs, resolver).map_err(activity_failed)?;

    if let Some(mappings) = &legacy.mappings {
        let (input_mappings, output_mappings) =
            convert_legacy_mappings(mappings, resolver).map_err(activity_failed)?;
        input.extend(input_mappings);
        output.extend(output_mappings);
    }

    if !settings.is_empty() {
        config.settings = Some(settings);
    }

    let upgraded = upgrades
        .try_upgrade(&input, legacy, &mut config, resolver)
        .map_err(|e| ConversionError::UpgradeRewriteFailed {
            activity_ref: legacy.activity_ref.clone(),
            source: Box::new(e),
        })?;

    if !upgraded {
        config.input = non_empty(input);
    }
    config.output = non_empty(output);

    if !input_schemas.is_empty() || !output_schemas.is_empty() {
        config.schemas = Some(SchemaConfig {
            input: non_empty_schemas(input_schemas),
            output: non_empty_schemas(output_schemas),
        });
    }

    Ok(config)
}

fn non_empty(values: ValueMap) -> Option<ValueMap> {
    (!values.is_empty()).then_some(values)
}

fn non_empty_schemas(schemas: SchemaMap) -> Option<SchemaMap> {
    (!schemas.is_empty()).then_some(schemas)
}
