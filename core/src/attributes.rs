//! Datatype → active attribute table.
//!
//! [`DATATYPE_PROFILES`] is the single source of truth for which attributes a
//! datatype uses. The validator walks a profile's attribute list to decide
//! what to parse and check, and presentation layers read the same table to
//! decide what to render.
//!
//! # Examples
//!
//! ```
//! use field_schema_core::{AttributeName, Datatype, active_attributes_for};
//!
//! assert_eq!(
//!     active_attributes_for(Datatype::Int),
//!     &[AttributeName::StartValue, AttributeName::EndValue]
//! );
//! assert!(active_attributes_for(Datatype::Number).is_empty());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Datatype;

/// Name of a field definition attribute.
///
/// Serialized as the document key, see [`AttributeName::key`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AttributeName {
    FieldName,
    Description,
    Required,
    Nullable,
    Datatype,
    StartValue,
    EndValue,
    MinLength,
    MaxLength,
    DefaultValue,
    BooleanDefault,
    EnumValues,
    /// Value of a single enum member.
    EnumValue,
}

impl AttributeName {
    /// Document key of the attribute.
    pub fn key(self) -> &'static str {
        match self {
            Self::FieldName => "fieldName",
            Self::Description => "description",
            Self::Required => "required",
            Self::Nullable => "nullable",
            Self::Datatype => "datatype",
            Self::StartValue => "startValue",
            Self::EndValue => "endValue",
            Self::MinLength => "minLength",
            Self::MaxLength => "maxLength",
            Self::DefaultValue => "defaultValue",
            Self::BooleanDefault => "booleanDefault",
            Self::EnumValues => "enumValues",
            Self::EnumValue => "enumValue",
        }
    }
}

impl fmt::Display for AttributeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Attributes active for every datatype.
pub const BASE_ATTRIBUTES: &[AttributeName] = &[
    AttributeName::FieldName,
    AttributeName::Description,
    AttributeName::Required,
    AttributeName::Nullable,
    AttributeName::Datatype,
];

/// Datatype-specific attributes of one datatype.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatatypeProfile {
    pub datatype: Datatype,
    /// Attributes used in addition to [`BASE_ATTRIBUTES`], in display order.
    pub attributes: &'static [AttributeName],
    /// `false` when the datatype is accepted but has no semantics yet.
    pub implemented: bool,
}

impl DatatypeProfile {
    /// Returns `true` if `attribute` is datatype-specific to this profile.
    pub fn activates(&self, attribute: AttributeName) -> bool {
        self.attributes.contains(&attribute)
    }
}

/// One profile per datatype, indexed by [`Datatype::index`].
pub static DATATYPE_PROFILES: [DatatypeProfile; 6] = [
    DatatypeProfile {
        datatype: Datatype::Int,
        attributes: &[AttributeName::StartValue, AttributeName::EndValue],
        implemented: true,
    },
    DatatypeProfile {
        datatype: Datatype::String,
        attributes: &[
            AttributeName::MinLength,
            AttributeName::MaxLength,
            AttributeName::DefaultValue,
        ],
        implemented: true,
    },
    DatatypeProfile {
        datatype: Datatype::Boolean,
        attributes: &[AttributeName::BooleanDefault],
        implemented: true,
    },
    DatatypeProfile {
        datatype: Datatype::Number,
        attributes: &[],
        implemented: true,
    },
    DatatypeProfile {
        datatype: Datatype::Enum,
        attributes: &[AttributeName::EnumValues],
        implemented: true,
    },
    DatatypeProfile {
        datatype: Datatype::Array,
        attributes: &[],
        implemented: false,
    },
];

/// Returns the profile of `datatype`.
pub fn profile_for(datatype: Datatype) -> &'static DatatypeProfile {
    &DATATYPE_PROFILES[datatype.index()]
}

/// Returns the datatype-specific attributes of `datatype`.
pub fn active_attributes_for(datatype: Datatype) -> &'static [AttributeName] {
    profile_for(datatype).attributes
}

/// Returns base attributes followed by the datatype-specific ones.
///
/// # Examples
///
/// ```
/// use field_schema_core::{AttributeName, Datatype, all_active_attributes};
///
/// let attributes = all_active_attributes(Datatype::Boolean);
/// assert_eq!(attributes.first(), Some(&AttributeName::FieldName));
/// assert_eq!(attributes.last(), Some(&AttributeName::BooleanDefault));
/// ```
pub fn all_active_attributes(datatype: Datatype) -> Vec<AttributeName> {
    BASE_ATTRIBUTES
        .iter()
        .chain(active_attributes_for(datatype))
        .copied()
        .collect()
}

/// Returns `true` if `attribute` is active for `datatype`.
pub fn is_active(datatype: Datatype, attribute: AttributeName) -> bool {
    BASE_ATTRIBUTES.contains(&attribute) || profile_for(datatype).activates(attribute)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiles_are_indexed_by_datatype() {
        for datatype in Datatype::ALL {
            assert_eq!(profile_for(datatype).datatype, datatype);
        }
    }

    #[test]
    fn test_lookup_is_deterministic() {
        for datatype in Datatype::ALL {
            assert_eq!(
                active_attributes_for(datatype),
                active_attributes_for(datatype)
            );
        }
    }

    #[test]
    fn test_string_attributes() {
        assert_eq!(
            active_attributes_for(Datatype::String),
            &[
                AttributeName::MinLength,
                AttributeName::MaxLength,
                AttributeName::DefaultValue
            ]
        );
    }

    #[test]
    fn test_only_array_is_unimplemented() {
        let unimplemented: Vec<Datatype> = DATATYPE_PROFILES
            .iter()
            .filter(|profile| !profile.implemented)
            .map(|profile| profile.datatype)
            .collect();
        assert_eq!(unimplemented, vec![Datatype::Array]);
    }

    #[test]
    fn test_base_attributes_always_active() {
        for datatype in Datatype::ALL {
            for attribute in BASE_ATTRIBUTES {
                assert!(is_active(datatype, *attribute));
            }
        }
        assert!(!is_active(Datatype::Int, AttributeName::EnumValues));
        assert!(is_active(Datatype::Enum, AttributeName::EnumValues));
    }

    #[test]
    fn test_keys_match_serde_names() {
        let json = serde_json::to_string(&AttributeName::BooleanDefault).unwrap();
        assert_eq!(json, "\"booleanDefault\"");
        assert_eq!(AttributeName::FieldName.to_string(), "fieldName");
    }
}
