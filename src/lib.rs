//! # flowbridge - Legacy Flow Definition Upgrader
//!
//! **flowbridge** converts flow definitions written for the legacy engine (tasks, links,
//! activity configuration and data mappings in the old schema) into the current engine's
//! definition schema, so that existing processes keep loading after a platform upgrade.
//!
//! ## Core Workflow
//!
//! 1.  **Load**: Parse the legacy document with [`legacy::LegacyDefinition::from_json`]
//!     (or [`legacy::load_legacy_flows`] for whole application documents).
//! 2.  **Configure**: Build a [`converter::FlowConverter`] around a
//!     [`resolve::DataResolver`]. The resolver validates every rewritten mapping reference
//!     against the scopes the current engine understands.
//! 3.  **Convert**: Call `convert`. Conversion is all-or-nothing: a definition either
//!     converts completely or the first error is returned.
//! 4.  **Write**: Serialize the resulting [`flow::FlowDefinition`] with `to_json_pretty`.
//!
//! Two legacy terminal activities, `actreturn` and `actreply`, are upgraded to their
//! current equivalents; their `mappings` input moves into settings. Definitions using the
//! deprecated root task layout are rejected with
//! [`error::ConversionError::UnsupportedLegacyFormat`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use flowbridge::prelude::*;
//! use std::sync::Arc;
//!
//! fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//!     let legacy_json = std::fs::read_to_string("legacy_flow.json")?;
//!     let legacy = LegacyDefinition::from_json(&legacy_json)?;
//!
//!     // Register an extra scope on top of the defaults ($flow, $activity[..], $env[..], ...)
//!     let resolver = ScopedResolver::builder()
//!         .with_scope("trigger", ScopeKind::Path)
//!         .build();
//!
//!     let converter = FlowConverter::builder(Arc::new(resolver))
//!         .with_upgrade(
//!             "github.com/acme/legacy/activity/respond",
//!             "github.com/acme/activity/respond",
//!         )
//!         .build();
//!
//!     let flow = converter.convert(&legacy)?;
//!     println!("{}", flow.to_json_pretty()?);
//!     Ok(())
//! }
//! ```

pub mod coerce;
pub mod converter;
pub mod error;
pub mod flow;
pub mod legacy;
pub mod prelude;
pub mod resolve;

#[cfg(feature = "python-bindings")]
mod python;
