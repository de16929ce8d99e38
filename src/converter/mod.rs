//! Conversion of legacy flow definitions into the current schema.

use crate::error::ConversionError;
use crate::flow::{
    ErrorHandlerDefinition, FlowDefinition, IoMetadata, LinkDefinition, TaskDefinition,
    TypedValue,
};
use crate::legacy::{LegacyAttribute, LegacyDefinition, LegacyLink, LegacyTask};
use crate::resolve::{DataResolver, ScopedResolver};
use ahash::{AHashMap, AHashSet};
use std::sync::Arc;
use tracing::{debug, info, warn};

mod activity;
mod mappings;
mod upgrade;
mod values;

pub use activity::convert_activity_config;
pub use mappings::{convert_legacy_mappings, handle_mappings, rewrite_expression, rewrite_reference};
pub use upgrade::{DEFAULT_UPGRADES, MAPPINGS_KEY, UpgradeTable};
pub use values::{convert_legacy_attr, convert_values};

/// Converts legacy flow definitions into the current schema.
///
/// A converter holds no per-conversion state and can be shared between threads; every
/// call to [`FlowConverter::convert`] is independent.
pub struct FlowConverter {
    resolver: Arc<dyn DataResolver>,
    upgrades: UpgradeTable,
}

pub struct FlowConverterBuilder {
    resolver: Arc<dyn DataResolver>,
    upgrades: UpgradeTable,
}

impl FlowConverterBuilder {
    pub fn new(resolver: Arc<dyn DataResolver>) -> Self {
        Self {
            resolver,
            upgrades: UpgradeTable::default(),
        }
    }

    /// Registers an additional legacy activity whose `mappings` input moves into settings.
    pub fn with_upgrade(mut self, legacy_ref: &str, current_ref: &str) -> Self {
        self.upgrades.insert(legacy_ref, current_ref);
        self
    }

    /// Drops the built-in return/reply rows.
    pub fn without_default_upgrades(mut self) -> Self {
        self.upgrades = UpgradeTable::empty();
        self
    }

    pub fn build(self) -> FlowConverter {
        FlowConverter {
            resolver: self.resolver,
            upgrades: self.upgrades,
        }
    }
}

impl FlowConverter {
    pub fn builder(resolver: Arc<dyn DataResolver>) -> FlowConverterBuilder {
        FlowConverterBuilder::new(resolver)
    }

    pub fn new(resolver: Arc<dyn DataResolver>) -> Self {
        Self::builder(resolver).build()
    }

    pub fn upgrades(&self) -> &UpgradeTable {
        &self.upgrades
    }

    /// Converts a complete legacy definition.
    ///
    /// Fails fast: the first task, activity or mapping error aborts the conversion and no
    /// partial document is returned.
    pub fn convert(&self, legacy: &LegacyDefinition) -> Result<FlowDefinition, ConversionError> {
        if legacy.root_task.is_some() {
            return Err(ConversionError::UnsupportedLegacyFormat);
        }

        info!(
            flow = %legacy.name,
            tasks = legacy.tasks.len(),
            links = legacy.links.len(),
            "converting legacy flow"
        );

        let metadata = match &legacy.metadata {
            Some(meta) => Some(IoMetadata {
                input: convert_attributes(&meta.input)?,
                output: convert_attributes(&meta.output)?,
            }),
            None => None,
        };

        let (tasks, links) = self.convert_graph(&legacy.tasks, &legacy.links)?;

        let error_handler = match &legacy.error_handler {
            Some(handler) => {
                debug!(
                    tasks = handler.tasks.len(),
                    links = handler.links.len(),
                    "converting error handler"
                );
                let (tasks, links) = self.convert_graph(&handler.tasks, &handler.links)?;
                Some(ErrorHandlerDefinition { tasks, links })
            }
            None => None,
        };

        info!(flow = %legacy.name, "legacy flow converted");

        Ok(FlowDefinition {
            name: legacy.name.clone(),
            model_id: legacy.model_id.clone(),
            explicit_reply: legacy.explicit_reply,
            metadata,
            tasks,
            links,
            error_handler,
        })
    }

    /// Converts one legacy task, including its activity configuration.
    pub fn convert_task(&self, legacy: &LegacyTask) -> Result<TaskDefinition, ConversionError> {
        debug!(task = %legacy.id, "converting task");

        let activity = legacy
            .activity
            .as_ref()
            .map(|cfg| convert_activity_config(cfg, self.resolver.as_ref(), &self.upgrades))
            .transpose()
            .map_err(|e| ConversionError::TaskConversionFailed {
                task_id: legacy.id.clone(),
                source: Box::new(e),
            })?;

        Ok(TaskDefinition {
            id: legacy.id.clone(),
            name: legacy.name.clone(),
            task_type: legacy.task_type.clone(),
            settings: legacy.settings.clone(),
            activity,
        })
    }

    fn convert_graph(
        &self,
        tasks: &[LegacyTask],
        links: &[LegacyLink],
    ) -> Result<(Vec<TaskDefinition>, Vec<LinkDefinition>), ConversionError> {
        let tasks = tasks
            .iter()
            .map(|task| self.convert_task(task))
            .collect::<Result<Vec<_>, _>>()?;

        let known: AHashSet<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
        let links = links
            .iter()
            .map(|link| {
                if !known.contains(link.from_id.as_str()) || !known.contains(link.to_id.as_str()) {
                    warn!(
                        from = %link.from_id,
                        to = %link.to_id,
                        "link references a task that is not part of its graph"
                    );
                }
                convert_link(link)
            })
            .collect();

        Ok((tasks, links))
    }
}

impl Default for FlowConverter {
    fn default() -> Self {
        Self::new(Arc::new(ScopedResolver::default()))
    }
}

/// Copies a legacy link into the current schema.
pub fn convert_link(legacy: &LegacyLink) -> LinkDefinition {
    LinkDefinition {
        name: legacy.name.clone(),
        link_type: legacy.link_type.clone(),
        from_id: legacy.from_id.clone(),
        to_id: legacy.to_id.clone(),
        value: legacy.value.clone(),
    }
}

fn convert_attributes(
    attrs: &AHashMap<String, LegacyAttribute>,
) -> Result<Option<AHashMap<String, TypedValue>>, ConversionError> {
    if attrs.is_empty() {
        return Ok(None);
    }
    attrs
        .iter()
        .map(|(name, attr)| convert_legacy_attr(attr).map(|typed| (name.clone(), typed)))
        .collect::<Result<AHashMap<_, _>, _>>()
        .map(Some)
}
