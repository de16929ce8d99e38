use thiserror::Error;

/// Errors that can occur while converting a legacy flow definition.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConversionError {
    #[error("Definition uses the deprecated root task layout and is too old to be converted")]
    UnsupportedLegacyFormat,

    #[error("Attribute '{name}' could not be converted: {message}")]
    AttributeConversionFailed { name: String, message: String },

    #[error("Mapping to '{target}' could not be resolved: {message}")]
    MappingResolutionFailed { target: String, message: String },

    #[error("The 'mappings' payload is not a list of legacy mapping definitions: {0}")]
    MalformedMappingPayload(String),

    #[error("Upgrade of activity '{activity_ref}' failed: {source}")]
    UpgradeRewriteFailed {
        activity_ref: String,
        source: Box<ConversionError>,
    },

    #[error("Activity '{activity_ref}' could not be converted: {source}")]
    ActivityConversionFailed {
        activity_ref: String,
        source: Box<ConversionError>,
    },

    #[error("Task '{task_id}' could not be converted: {source}")]
    TaskConversionFailed {
        task_id: String,
        source: Box<ConversionError>,
    },
}

impl ConversionError {
    /// Strips the task and activity context wrappers, returning the underlying failure.
    ///
    /// `UpgradeRewriteFailed` is itself a cause and is not unwrapped.
    pub fn root_cause(&self) -> &ConversionError {
        match self {
            ConversionError::ActivityConversionFailed { source, .. }
            | ConversionError::TaskConversionFailed { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Errors raised by the value coercion helpers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoercionError {
    #[error("Cannot coerce '{value}' to {target}")]
    Incompatible { value: String, target: String },

    #[error("Cannot coerce null to bytes")]
    NullBytes,

    #[error("Serialization failed: {0}")]
    Serialization(String),
}

/// Errors that can occur while loading or writing definition documents.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to parse legacy JSON: {0}")]
    JsonParseError(#[from] serde_json::Error),

    #[error("Document contains no flow definitions")]
    NoFlows,
}
