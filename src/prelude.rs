//! Prelude module for convenient imports
//!
//! Re-exports the types needed to load, convert and write flow definitions.
//!
//! # Example
//!
//! ```rust,no_run
//! use flowbridge::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let legacy = LegacyDefinition::from_json(&std::fs::read_to_string("flow.json")?)?;
//! let flow = FlowConverter::default().convert(&legacy)?;
//! println!("{}", flow.to_json_pretty()?);
//! # Ok(())
//! # }
//! ```

// Conversion
pub use crate::converter::{FlowConverter, FlowConverterBuilder, UpgradeTable, convert_link};
pub use crate::resolve::{DataResolver, ScopeKind, ScopedResolver};

// Legacy schema
pub use crate::legacy::{
    LegacyActivityConfig, LegacyAttribute, LegacyDefinition, LegacyErrorHandler, LegacyFlow,
    LegacyLink, LegacyMappingDef, LegacyMappings, LegacyMetadata, LegacyTask, MappingType,
    load_legacy_flows,
};

// Current schema
pub use crate::flow::{
    ActivityConfig, DataType, ErrorHandlerDefinition, FlowDefinition, IoMetadata,
    LinkDefinition, SchemaConfig, SchemaDef, TaskDefinition, TypedValue, ValueMap,
};

// Error types
pub use crate::error::{CoercionError, ConversionError, LoadError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
