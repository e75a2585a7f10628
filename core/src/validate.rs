//! Field draft validation.
//!
//! [`validate`] checks a [`FieldDraft`] against the attribute table and
//! either projects it into a normalized [`FieldSpec`] or reports every
//! problem it found. Rules never short-circuit: the caller gets the full
//! list in one pass, ordered as the rules run (name, datatype, then the
//! datatype's own attributes).
//!
//! # Examples
//!
//! ```
//! use field_schema_core::*;
//!
//! let draft = FieldDraft::named("age", Datatype::Int).with_int_range("0", "130");
//! let validated = validate(&draft).unwrap();
//! assert_eq!(
//!     validated.spec.constraints,
//!     Constraints::Int { start_value: Some(0.0), end_value: Some(130.0) }
//! );
//!
//! // Invalid: empty name and inverted range are both reported
//! let bad = FieldDraft::named("", Datatype::Int).with_int_range("10", "5");
//! let errors = validate(&bad).unwrap_err();
//! assert_eq!(errors.len(), 2);
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::{
    AttributeName, Constraints, Datatype, EnumMemberId, EnumMemberSet, EnumValue, FieldDraft,
    FieldSpec, profile_for,
};

/// Kind of a validation finding.
///
/// The `Display` impl provides a generic message; [`FieldError::message`]
/// may carry a more specific one.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ErrorKind {
    /// A mandatory attribute is empty.
    #[error("{0} is required")]
    Required(AttributeName),
    /// The lower bound of a pair exceeds the upper bound.
    #[error("{start} must not be greater than {end}")]
    RangeInvalid {
        start: AttributeName,
        end: AttributeName,
    },
    /// The string default is shorter or longer than the length bounds allow.
    #[error("default value length is outside the allowed length range")]
    DefaultOutOfRange,
    /// Two enum members share a value.
    #[error("duplicate enum value: {0}")]
    Duplicate(String),
    /// The datatype is accepted but has no semantics yet.
    #[error("{0} fields are not implemented yet")]
    Unimplemented(Datatype),
    /// A numeric attribute does not parse and was left out of its checks.
    #[error("{0} is not a valid number and was ignored")]
    InvalidNumber(AttributeName),
}

impl ErrorKind {
    /// Returns `false` for informational findings that do not reject a draft.
    pub fn is_blocking(&self) -> bool {
        !matches!(self, Self::Unimplemented(_) | Self::InvalidNumber(_))
    }
}

/// One validation finding, addressed to an attribute.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{attribute}: {message}")]
pub struct FieldError {
    /// Document key of the offending attribute (`enumValues[2]` for a member).
    pub attribute: String,
    pub kind: ErrorKind,
    /// Human-readable message.
    pub message: String,
    /// Offending enum member, when the finding is about one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member: Option<EnumMemberId>,
}

impl FieldError {
    /// Creates a finding with the kind's generic message.
    pub fn new(attribute: impl Into<String>, kind: ErrorKind) -> Self {
        let message = kind.to_string();
        Self {
            attribute: attribute.into(),
            kind,
            message,
            member: None,
        }
    }

    /// Replaces the message.
    pub fn with_message(mut self, message: &str) -> Self {
        self.message = message.to_string();
        self
    }

    /// Attaches the offending enum member.
    pub fn for_member(mut self, id: EnumMemberId) -> Self {
        self.member = Some(id);
        self
    }
}

/// Ordered list of blocking findings returned when a draft is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("field definition has {} validation error(s)", .0.len())]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    /// Findings in the order they were produced.
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// Number of findings.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when there are no findings.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the findings in order.
    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.0.iter()
    }

    /// Kinds of all findings, in order.
    pub fn kinds(&self) -> Vec<&ErrorKind> {
        self.0.iter().map(|error| &error.kind).collect()
    }

    /// Consumes the list, returning the findings.
    pub fn into_vec(self) -> Vec<FieldError> {
        self.0
    }
}

impl IntoIterator for ValidationErrors {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Successful validation result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Validated {
    /// The normalized definition.
    pub spec: FieldSpec,
    /// Non-blocking findings: [`ErrorKind::Unimplemented`] and
    /// [`ErrorKind::InvalidNumber`].
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notices: Vec<FieldError>,
}

/// Datatype-specific attribute values that parsed cleanly.
#[derive(Debug, Default)]
struct Parsed {
    start_value: Option<f64>,
    end_value: Option<f64>,
    min_length: Option<usize>,
    max_length: Option<usize>,
    default_value: Option<String>,
    boolean_default: Option<bool>,
    enum_values: Option<Vec<EnumValue>>,
}

/// Validates a field draft.
///
/// The draft is only read. On success the returned [`FieldSpec`] holds just
/// the attributes active for the chosen datatype; the draft keeps the rest.
///
/// # Errors
///
/// Returns every blocking finding as [`ValidationErrors`].
///
/// # Examples
///
/// ```
/// use field_schema_core::*;
///
/// let mut draft = FieldDraft::named("color", Datatype::Enum);
/// draft.enum_members.push("red", MemberType::String);
/// draft.enum_members.push("red", MemberType::String);
///
/// let errors = validate(&draft).unwrap_err();
/// assert_eq!(errors.kinds(), vec![&ErrorKind::Duplicate("red".into())]);
/// ```
pub fn validate(draft: &FieldDraft) -> Result<Validated, ValidationErrors> {
    let mut errors = Vec::new();
    let mut notices = Vec::new();

    let name = draft.name.trim();
    if name.is_empty() {
        errors.push(
            FieldError::new(
                AttributeName::FieldName.key(),
                ErrorKind::Required(AttributeName::FieldName),
            )
            .with_message("Field name is required"),
        );
    }

    let Some(datatype) = draft.datatype else {
        errors.push(
            FieldError::new(
                AttributeName::Datatype.key(),
                ErrorKind::Required(AttributeName::Datatype),
            )
            .with_message("Datatype is required"),
        );
        debug!(errors = errors.len(), "Rejected field draft without datatype");
        return Err(ValidationErrors(errors));
    };

    let profile = profile_for(datatype);
    let mut parsed = Parsed::default();
    for attribute in profile.attributes {
        match attribute {
            AttributeName::StartValue => {
                parsed.start_value = parse_bound(&draft.start_value, *attribute, &mut notices);
            }
            AttributeName::EndValue => {
                parsed.end_value = parse_bound(&draft.end_value, *attribute, &mut notices);
            }
            AttributeName::MinLength => {
                parsed.min_length = parse_input(&draft.min_length, *attribute, &mut notices);
            }
            AttributeName::MaxLength => {
                parsed.max_length = parse_input(&draft.max_length, *attribute, &mut notices);
            }
            AttributeName::DefaultValue => {
                parsed.default_value =
                    Some(draft.default_value.clone()).filter(|value| !value.is_empty());
            }
            AttributeName::BooleanDefault => {
                parsed.boolean_default = Some(draft.boolean_default);
            }
            AttributeName::EnumValues => {
                parsed.enum_values = Some(validate_enum_members(&draft.enum_members, &mut errors));
            }
            AttributeName::FieldName
            | AttributeName::Description
            | AttributeName::Required
            | AttributeName::Nullable
            | AttributeName::Datatype
            | AttributeName::EnumValue => {}
        }
    }

    check_range(
        parsed.start_value,
        parsed.end_value,
        (AttributeName::StartValue, AttributeName::EndValue),
        &mut errors,
    );
    check_range(
        parsed.min_length,
        parsed.max_length,
        (AttributeName::MinLength, AttributeName::MaxLength),
        &mut errors,
    );
    if let Some(default_value) = &parsed.default_value {
        check_default_length(default_value, parsed.min_length, parsed.max_length, &mut errors);
    }

    if !errors.is_empty() {
        debug!(
            datatype = %datatype,
            errors = errors.len(),
            "Rejected field draft"
        );
        return Err(ValidationErrors(errors));
    }

    if !profile.implemented {
        notices.push(
            FieldError::new(
                AttributeName::Datatype.key(),
                ErrorKind::Unimplemented(datatype),
            )
            .with_message(&format!("{datatype} fields are not implemented yet.")),
        );
    }

    let description = draft.description.trim();
    let spec = FieldSpec {
        name: name.to_string(),
        description: (!description.is_empty()).then(|| description.to_string()),
        required: draft.required,
        nullable: draft.nullable,
        constraints: project(datatype, parsed),
    };
    debug!(
        field = %spec.name,
        datatype = %datatype,
        notices = notices.len(),
        "Accepted field draft"
    );

    Ok(Validated { spec, notices })
}

fn project(datatype: Datatype, parsed: Parsed) -> Constraints {
    match datatype {
        Datatype::Int => Constraints::Int {
            start_value: parsed.start_value,
            end_value: parsed.end_value,
        },
        Datatype::String => Constraints::String {
            min_length: parsed.min_length,
            max_length: parsed.max_length,
            default_value: parsed.default_value,
        },
        Datatype::Boolean => Constraints::Boolean {
            boolean_default: parsed.boolean_default.unwrap_or(true),
        },
        Datatype::Number => Constraints::Number,
        Datatype::Enum => Constraints::Enum {
            enum_values: parsed.enum_values.unwrap_or_default(),
        },
        Datatype::Array => Constraints::Array,
    }
}

/// Parses a raw numeric input. Empty input means "not supplied"; anything
/// unparsable is treated as not supplied and noted.
fn parse_input<T: std::str::FromStr>(
    raw: &str,
    attribute: AttributeName,
    notices: &mut Vec<FieldError>,
) -> Option<T> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            debug!(attribute = %attribute, raw, "Ignoring unparsable number");
            notices.push(FieldError::new(
                attribute.key(),
                ErrorKind::InvalidNumber(attribute),
            ));
            None
        }
    }
}

/// Like [`parse_input`] for range bounds, which also reject `inf` and `NaN`.
fn parse_bound(raw: &str, attribute: AttributeName, notices: &mut Vec<FieldError>) -> Option<f64> {
    match parse_input::<f64>(raw, attribute, notices) {
        Some(value) if !value.is_finite() => {
            notices.push(FieldError::new(
                attribute.key(),
                ErrorKind::InvalidNumber(attribute),
            ));
            None
        }
        value => value,
    }
}

fn check_range<T: PartialOrd>(
    start: Option<T>,
    end: Option<T>,
    (start_attr, end_attr): (AttributeName, AttributeName),
    errors: &mut Vec<FieldError>,
) {
    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            errors.push(FieldError::new(
                start_attr.key(),
                ErrorKind::RangeInvalid {
                    start: start_attr,
                    end: end_attr,
                },
            ));
        }
    }
}

fn check_default_length(
    default_value: &str,
    min: Option<usize>,
    max: Option<usize>,
    errors: &mut Vec<FieldError>,
) {
    let length = default_value.chars().count();
    let too_short = min.is_some_and(|min| length < min);
    let too_long = max.is_some_and(|max| length > max);
    if too_short || too_long {
        errors.push(FieldError::new(
            AttributeName::DefaultValue.key(),
            ErrorKind::DefaultOutOfRange,
        ));
    }
}

fn validate_enum_members(members: &EnumMemberSet, errors: &mut Vec<FieldError>) -> Vec<EnumValue> {
    if members.is_empty() {
        errors.push(
            FieldError::new(
                AttributeName::EnumValues.key(),
                ErrorKind::Required(AttributeName::EnumValues),
            )
            .with_message("at least one enum value is required"),
        );
        return Vec::new();
    }

    for (index, member) in members.iter().enumerate() {
        if member.value.is_empty() {
            errors.push(
                FieldError::new(
                    member_attribute(index),
                    ErrorKind::Required(AttributeName::EnumValue),
                )
                .for_member(member.id),
            );
        }
    }

    // One finding per duplicated value, reported at its first repeat.
    let mut seen: HashMap<&str, usize> = HashMap::new();
    for (index, member) in members.iter().enumerate() {
        if member.value.is_empty() {
            continue;
        }
        let count = seen.entry(member.value.as_str()).or_insert(0);
        *count += 1;
        if *count == 2 {
            errors.push(
                FieldError::new(
                    member_attribute(index),
                    ErrorKind::Duplicate(member.value.clone()),
                )
                .for_member(member.id),
            );
        }
    }

    members.values()
}

fn member_attribute(index: usize) -> String {
    format!("{}[{index}]", AttributeName::EnumValues.key())
}
