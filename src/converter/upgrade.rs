use super::mappings::handle_mappings;
use crate::coerce::to_bytes;
use crate::error::ConversionError;
use crate::flow::{ActivityConfig, ValueMap};
use crate::legacy::{LegacyActivityConfig, LegacyMappingDef};
use crate::resolve::DataResolver;
use serde_json::Value;
use tracing::debug;

/// Legacy terminal activities and the current activities that replace them.
pub const DEFAULT_UPGRADES: [(&str, &str); 2] = [
    (
        "github.com/TIBCOSoftware/flogo-contrib/activity/actreturn",
        "github.com/project-flogo/contrib/activity/actreturn",
    ),
    (
        "github.com/TIBCOSoftware/flogo-contrib/activity/actreply",
        "github.com/project-flogo/contrib/activity/actreply",
    ),
];

/// The input that upgraded activities move into their settings.
pub const MAPPINGS_KEY: &str = "mappings";

/// Activities whose legacy `mappings` input is relocated into settings on upgrade.
#[derive(Debug, Clone, PartialEq)]
pub struct UpgradeTable {
    rows: Vec<(String, String)>,
}

impl UpgradeTable {
    pub fn empty() -> Self {
        Self { rows: Vec::new() }
    }

    /// Adds a row, replacing any existing row for the same legacy reference.
    pub fn insert(&mut self, legacy_ref: &str, current_ref: &str) {
        self.rows.retain(|(legacy, _)| legacy != legacy_ref);
        self.rows.push((legacy_ref.to_string(), current_ref.to_string()));
    }

    pub fn lookup(&self, legacy_ref: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|(legacy, _)| legacy == legacy_ref)
            .map(|(_, current)| current.as_str())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Upgrades `config` in place when `legacy` is one of the table's activities.
    ///
    /// Returns `Ok(false)` without touching `config` for any other activity. On a match the
    /// reference is rewritten and a non-null `mappings` entry of `input` is parsed as a list
    /// of legacy mappings, resolved, and stored as `settings["mappings"]`. The caller must
    /// then discard `input` for this activity.
    pub fn try_upgrade(
        &self,
        input: &ValueMap,
        legacy: &LegacyActivityConfig,
        config: &mut ActivityConfig,
        resolver: &dyn DataResolver,
    ) -> Result<bool, ConversionError> {
        let Some(current_ref) = self.lookup(&legacy.activity_ref) else {
            return Ok(false);
        };

        debug!(
            from = %legacy.activity_ref,
            to = %current_ref,
            "upgrading terminal activity"
        );
        config.activity_ref = current_ref.to_string();

        let payload = match input.get(MAPPINGS_KEY) {
            Some(value) if !value.is_null() => value,
            _ => return Ok(true),
        };

        let bytes = to_bytes(payload)
            .map_err(|e| ConversionError::MalformedMappingPayload(e.to_string()))?;
        let defs: Vec<LegacyMappingDef> = serde_json::from_slice(&bytes)
            .map_err(|e| ConversionError::MalformedMappingPayload(e.to_string()))?;

        let resolved = handle_mappings(&defs, resolver)?;
        config
            .settings
            .get_or_insert_with(ValueMap::new)
            .insert(MAPPINGS_KEY.to_string(), Value::Object(resolved.into_iter().collect()));

        Ok(true)
    }
}

impl Default for UpgradeTable {
    fn default() -> Self {
        let mut table = Self::empty();
        for (legacy, current) in DEFAULT_UPGRADES {
            table.insert(legacy, current);
        }
        table
    }
}
