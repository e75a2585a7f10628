//! Field definition model and validation.
//!
//! This crate describes a single field of a JSON document shape and checks
//! user input against it:
//!
//! - [`FieldDraft`]: the editable draft: name, description, required and
//!   nullable flags, datatype, and the raw attributes of every datatype.
//! - [`EnumMemberSet`]: ordered enum members addressed by stable
//!   [`EnumMemberId`]s.
//! - [`DATATYPE_PROFILES`]: the static table of attributes each [`Datatype`]
//!   activates ([`active_attributes_for`]).
//! - [`validate`]: turns a draft into a normalized [`FieldSpec`] or the full
//!   list of [`FieldError`]s.
//! - [`FieldDefinitionStore`]: draft plus last accepted definition, with
//!   [`submit`](FieldDefinitionStore::submit) as the only transition.
//!
//! # Example
//!
//! ```
//! use field_schema_core::*;
//!
//! let draft = FieldDraft::named("invoice_code", Datatype::String)
//!     .with_description("Printed on the invoice header")
//!     .mark_required()
//!     .with_length_bounds("3", "12")
//!     .with_default_value("INV");
//!
//! let validated = validate(&draft).unwrap();
//! assert_eq!(validated.spec.datatype(), Datatype::String);
//! assert!(validated.notices.is_empty());
//! ```

mod attributes;
mod members;
mod store;
mod types;
mod validate;

pub use attributes::{
    AttributeName, BASE_ATTRIBUTES, DATATYPE_PROFILES, DatatypeProfile, active_attributes_for,
    all_active_attributes, is_active, profile_for,
};
pub use members::{EnumMember, EnumMemberId, EnumMemberPatch, EnumMemberSet};
pub use store::FieldDefinitionStore;
pub use types::*;
pub use validate::{ErrorKind, FieldError, ValidationErrors, Validated, validate};
