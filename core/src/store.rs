//! Draft / accepted state holder.
//!
//! [`FieldDefinitionStore`] keeps the draft the caller is editing next to the
//! last definition that passed validation. [`FieldDefinitionStore::submit`] is
//! the only way a definition becomes accepted, and a rejected submit leaves the
//! accepted definition untouched.
//!
//! # Examples
//!
//! ```
//! use field_schema_core::*;
//!
//! let mut store = FieldDefinitionStore::new();
//! store.draft_mut().name = "status".into();
//! store.draft_mut().datatype = Some(Datatype::Enum);
//! assert!(store.submit().is_err()); // no enum values yet
//!
//! let id = store.draft_mut().enum_members.add().id;
//! store.draft_mut().enum_members.update(id, EnumMemberPatch::value("open"));
//! let accepted = store.submit().unwrap();
//! assert_eq!(accepted.spec.name, "status");
//! assert!(store.last_accepted().is_some());
//! ```

use tracing::{debug, info};

use crate::{FieldDraft, ValidationErrors, Validated, validate};

/// Holds the editable draft and the last accepted definition.
#[derive(Debug, Clone, Default)]
pub struct FieldDefinitionStore {
    draft: FieldDraft,
    last_accepted: Option<Validated>,
}

impl FieldDefinitionStore {
    /// Creates a store with an empty draft and nothing accepted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store around an existing draft.
    pub fn with_draft(draft: FieldDraft) -> Self {
        Self {
            draft,
            last_accepted: None,
        }
    }

    pub fn draft(&self) -> &FieldDraft {
        &self.draft
    }

    /// Mutable access to the draft for field-by-field edits.
    pub fn draft_mut(&mut self) -> &mut FieldDraft {
        &mut self.draft
    }

    /// The last definition accepted by [`submit`](Self::submit).
    pub fn last_accepted(&self) -> Option<&Validated> {
        self.last_accepted.as_ref()
    }

    /// Validates the current draft and, on success, records it as accepted.
    ///
    /// # Errors
    ///
    /// Returns the validation findings; the accepted definition is unchanged.
    pub fn submit(&mut self) -> Result<&Validated, ValidationErrors> {
        let outcome = validate(&self.draft);
        self.record(outcome)
    }

    /// Validates `draft` instead of the held one, with the same transition.
    ///
    /// The held draft is left as it is.
    ///
    /// # Errors
    ///
    /// Returns the validation findings; the accepted definition is unchanged.
    pub fn submit_draft(&mut self, draft: &FieldDraft) -> Result<&Validated, ValidationErrors> {
        let outcome = validate(draft);
        self.record(outcome)
    }

    fn record(
        &mut self,
        outcome: Result<Validated, ValidationErrors>,
    ) -> Result<&Validated, ValidationErrors> {
        match outcome {
            Ok(validated) => {
                info!(
                    field = %validated.spec.name,
                    datatype = %validated.spec.datatype(),
                    "Field definition accepted"
                );
                Ok(&*self.last_accepted.insert(validated))
            }
            Err(errors) => {
                debug!(errors = errors.len(), "Field definition rejected");
                Err(errors)
            }
        }
    }

    /// Discards the draft, replacing it with an empty one.
    pub fn reset_draft(&mut self) {
        self.draft = FieldDraft::new();
    }

    /// Replaces the draft with the last accepted definition for re-editing.
    ///
    /// Returns `false` (and leaves the draft alone) when nothing was accepted.
    pub fn edit_last_accepted(&mut self) -> bool {
        match &self.last_accepted {
            Some(validated) => {
                self.draft = FieldDraft::from(&validated.spec);
                true
            }
            None => false,
        }
    }
}
