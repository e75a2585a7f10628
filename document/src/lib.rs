//! Document mapping and tool configuration for field definitions.
//!
//! This crate sits between [`field_schema_core`] and the outside world: it
//! reads and writes drafts and accepted definitions as JSON or YAML, renders
//! validation results, and loads the YAML tool configuration.
//!
//! # Quick start
//!
//! ```no_run
//! use field_schema_core::FieldDefinitionStore;
//! use field_schema_document::{DocumentFormat, load_draft, render_errors, save_spec};
//!
//! let draft = load_draft("status.field.json").unwrap();
//! let mut store = FieldDefinitionStore::with_draft(draft);
//! match store.submit() {
//!     Ok(accepted) => save_spec(&accepted.spec, "status.spec.json").unwrap(),
//!     Err(errors) => eprint!("{}", render_errors(&errors, DocumentFormat::Text, false).unwrap()),
//! }
//! ```
//!
//! # Feature flags
//!
//! - **`clap`**: derives `clap::ValueEnum` for [`DocumentFormat`].

mod config;
mod document;
mod error;

pub use config::{CONFIG_VERSION, DEFAULT_CONFIG_FILE, LoggingConfig, OutputConfig, ToolConfig};
pub use document::{
    DocumentFormat, from_str, load_draft, load_spec, render_errors, render_validated, save_draft,
    save_spec, to_string,
};
pub use error::{DocumentError, Result};
