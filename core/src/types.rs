//! Field definition types.
//!
//! Two shapes describe a field. [`FieldDraft`] is the live, caller-edited
//! input: every datatype's attributes are stored side by side as raw text so
//! switching the datatype back and forth never loses what was typed.
//! [`FieldSpec`] is the normalized output of validation: a tagged union
//! ([`Constraints`]) that only carries the attributes of its datatype.
//!
//! Both serialize with the document keys used by form callers
//! (`fieldName`, `startValue`, `enumValues`, ...).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::EnumMemberSet;

/// Datatype of a field.
///
/// The datatype selects which datatype-specific attributes are active, see
/// [`active_attributes_for`](crate::active_attributes_for).
///
/// # Examples
///
/// ```
/// use field_schema_core::Datatype;
///
/// let datatype: Datatype = "Enum".parse().unwrap();
/// assert_eq!(datatype, Datatype::Enum);
/// assert_eq!(datatype.to_string(), "Enum");
/// assert!("Text".parse::<Datatype>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Datatype {
    /// Whole number with an optional start/end range.
    Int,
    /// Text with optional length bounds and a default.
    String,
    /// `true`/`false` with a default.
    Boolean,
    /// Any number, unconstrained.
    Number,
    /// One of a list of enum members.
    Enum,
    /// Array. Accepted, but carries no constraints yet.
    Array,
}

impl Datatype {
    /// Every datatype, in declaration order.
    pub const ALL: [Datatype; 6] = [
        Datatype::Int,
        Datatype::String,
        Datatype::Boolean,
        Datatype::Number,
        Datatype::Enum,
        Datatype::Array,
    ];

    /// Returns the label used in documents and select boxes.
    pub fn label(self) -> &'static str {
        match self {
            Self::Int => "Int",
            Self::String => "String",
            Self::Boolean => "Boolean",
            Self::Number => "Number",
            Self::Enum => "Enum",
            Self::Array => "Array",
        }
    }

    /// Position of this datatype in [`Datatype::ALL`].
    pub fn index(self) -> usize {
        match self {
            Self::Int => 0,
            Self::String => 1,
            Self::Boolean => 2,
            Self::Number => 3,
            Self::Enum => 4,
            Self::Array => 5,
        }
    }
}

impl fmt::Display for Datatype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A datatype label that names none of the [`Datatype`] variants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown datatype: {0}")]
pub struct UnknownDatatype(pub String);

impl FromStr for Datatype {
    type Err = UnknownDatatype;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Datatype::ALL
            .into_iter()
            .find(|datatype| datatype.label() == s)
            .ok_or_else(|| UnknownDatatype(s.to_string()))
    }
}

/// Type tag of a single enum member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MemberType {
    /// Integer member (the default for new members).
    #[default]
    Int,
    /// String member.
    String,
}

impl fmt::Display for MemberType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int => f.write_str("Int"),
            Self::String => f.write_str("String"),
        }
    }
}

/// One allowed value of an `Enum` field, without its addressing id.
///
/// This is how members appear in documents and in a [`FieldSpec`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumValue {
    /// The member value as entered.
    #[serde(default)]
    pub value: String,
    /// Type tag of the member; forms send it as `type`.
    #[serde(default, alias = "type")]
    pub member_type: MemberType,
}

impl EnumValue {
    /// Creates an enum value.
    pub fn new(value: impl Into<String>, member_type: MemberType) -> Self {
        Self {
            value: value.into(),
            member_type,
        }
    }
}

/// Editable draft of a field definition.
///
/// Fields are public and edited directly by the caller; enum members are
/// edited through [`EnumMemberSet`]. Attributes belonging to datatypes other
/// than the selected one are kept as-is and simply ignored by validation.
///
/// Numeric attributes hold the raw text the user typed. An empty string means
/// "not supplied".
///
/// # Examples
///
/// ```
/// use field_schema_core::{Datatype, FieldDraft};
///
/// let mut draft = FieldDraft::named("quantity", Datatype::Int).with_int_range("1", "99");
/// draft.datatype = Some(Datatype::String);
/// draft.datatype = Some(Datatype::Int);
/// assert_eq!(draft.start_value, "1"); // switching back restores the range
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldDraft {
    /// Field name (document key `fieldName`).
    #[serde(rename = "fieldName")]
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Whether the field must be present.
    pub required: bool,
    /// Whether the field value may be `null`.
    pub nullable: bool,
    /// Selected datatype; `None` until the user picks one.
    #[serde(deserialize_with = "deserialize_datatype")]
    pub datatype: Option<Datatype>,
    /// Lower bound of an `Int` range.
    #[serde(deserialize_with = "deserialize_raw_input")]
    pub start_value: String,
    /// Upper bound of an `Int` range.
    #[serde(deserialize_with = "deserialize_raw_input")]
    pub end_value: String,
    /// Minimum length of a `String`.
    #[serde(deserialize_with = "deserialize_raw_input")]
    pub min_length: String,
    /// Maximum length of a `String`.
    #[serde(deserialize_with = "deserialize_raw_input")]
    pub max_length: String,
    /// Default value of a `String`.
    pub default_value: String,
    /// Default value of a `Boolean`.
    #[serde(deserialize_with = "deserialize_boolean_default")]
    pub boolean_default: bool,
    /// Members of an `Enum` (document key `enumValues`).
    #[serde(rename = "enumValues")]
    pub enum_members: EnumMemberSet,
}

impl Default for FieldDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            required: false,
            nullable: false,
            datatype: None,
            start_value: String::new(),
            end_value: String::new(),
            min_length: String::new(),
            max_length: String::new(),
            default_value: String::new(),
            boolean_default: true,
            enum_members: EnumMemberSet::new(),
        }
    }
}

impl FieldDraft {
    /// Creates an empty draft: no name, no datatype, boolean default `true`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a draft with a name and datatype already chosen.
    pub fn named(name: &str, datatype: Datatype) -> Self {
        Self {
            name: name.to_string(),
            datatype: Some(datatype),
            ..Self::default()
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Marks the field as required.
    pub fn mark_required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Marks the field as nullable.
    pub fn mark_nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Sets the raw `Int` range bounds.
    pub fn with_int_range(mut self, start: &str, end: &str) -> Self {
        self.start_value = start.to_string();
        self.end_value = end.to_string();
        self
    }

    /// Sets the raw `String` length bounds.
    pub fn with_length_bounds(mut self, min: &str, max: &str) -> Self {
        self.min_length = min.to_string();
        self.max_length = max.to_string();
        self
    }

    /// Sets the `String` default value.
    pub fn with_default_value(mut self, value: &str) -> Self {
        self.default_value = value.to_string();
        self
    }

    /// Sets the `Boolean` default value.
    pub fn with_boolean_default(mut self, value: bool) -> Self {
        self.boolean_default = value;
        self
    }

    /// Appends an enum member.
    pub fn with_enum_member(mut self, value: &str, member_type: MemberType) -> Self {
        self.enum_members.push(value, member_type);
        self
    }
}

impl From<&FieldSpec> for FieldDraft {
    fn from(spec: &FieldSpec) -> Self {
        let mut draft = FieldDraft {
            name: spec.name.clone(),
            description: spec.description.clone().unwrap_or_default(),
            required: spec.required,
            nullable: spec.nullable,
            datatype: Some(spec.datatype()),
            ..FieldDraft::default()
        };

        match &spec.constraints {
            Constraints::Int {
                start_value,
                end_value,
            } => {
                draft.start_value = start_value.map(|v| v.to_string()).unwrap_or_default();
                draft.end_value = end_value.map(|v| v.to_string()).unwrap_or_default();
            }
            Constraints::String {
                min_length,
                max_length,
                default_value,
            } => {
                draft.min_length = min_length.map(|v| v.to_string()).unwrap_or_default();
                draft.max_length = max_length.map(|v| v.to_string()).unwrap_or_default();
                draft.default_value = default_value.clone().unwrap_or_default();
            }
            Constraints::Boolean { boolean_default } => {
                draft.boolean_default = *boolean_default;
            }
            Constraints::Enum { enum_values } => {
                draft.enum_members = enum_values.iter().cloned().collect();
            }
            Constraints::Number | Constraints::Array => {}
        }

        draft
    }
}

/// Datatype-specific constraints of a normalized field.
///
/// Serialized internally tagged by `datatype`, so a [`FieldSpec`] reads as a
/// flat document. Whole-number `Int` bounds are written as integers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "datatype", rename_all_fields = "camelCase")]
pub enum Constraints {
    /// Integer with an optional inclusive range.
    Int {
        #[serde(
            default,
            skip_serializing_if = "Option::is_none",
            serialize_with = "serialize_bound"
        )]
        start_value: Option<f64>,
        #[serde(
            default,
            skip_serializing_if = "Option::is_none",
            serialize_with = "serialize_bound"
        )]
        end_value: Option<f64>,
    },
    /// String with optional length bounds and default.
    String {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_length: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_length: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default_value: Option<String>,
    },
    /// Boolean with its default.
    Boolean { boolean_default: bool },
    /// Unconstrained number.
    Number,
    /// Enumeration of members, in display order.
    Enum { enum_values: Vec<EnumValue> },
    /// Array without constraints.
    Array,
}

impl Constraints {
    /// Returns the datatype this constraint set belongs to.
    pub fn datatype(&self) -> Datatype {
        match self {
            Self::Int { .. } => Datatype::Int,
            Self::String { .. } => Datatype::String,
            Self::Boolean { .. } => Datatype::Boolean,
            Self::Number => Datatype::Number,
            Self::Enum { .. } => Datatype::Enum,
            Self::Array => Datatype::Array,
        }
    }
}

/// Normalized, validated field definition.
///
/// Produced by [`validate`](crate::validate); only the attributes active for
/// the datatype are present.
///
/// # Examples
///
/// ```
/// use field_schema_core::{Constraints, Datatype, FieldSpec};
///
/// let spec = FieldSpec {
///     name: "active".into(),
///     description: None,
///     required: true,
///     nullable: false,
///     constraints: Constraints::Boolean { boolean_default: false },
/// };
/// assert_eq!(spec.datatype(), Datatype::Boolean);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    /// Field name, trimmed.
    #[serde(rename = "fieldName")]
    pub name: String,
    /// Description, `None` when left empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the field must be present.
    pub required: bool,
    /// Whether the field value may be `null`.
    pub nullable: bool,
    /// Datatype and its constraints.
    #[serde(flatten)]
    pub constraints: Constraints,
}

impl FieldSpec {
    /// Returns the datatype of this field.
    pub fn datatype(&self) -> Datatype {
        self.constraints.datatype()
    }
}

/// Largest magnitude below which every integer is exact in an `f64`.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

fn serialize_bound<S>(bound: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match *bound {
        Some(value) if value.fract() == 0.0 && value.abs() < MAX_EXACT_INTEGER => {
            serializer.serialize_i64(value as i64)
        }
        Some(value) => serializer.serialize_f64(value),
        None => serializer.serialize_none(),
    }
}

fn deserialize_datatype<'de, D>(deserializer: D) -> Result<Option<Datatype>, D::Error>
where
    D: Deserializer<'de>,
{
    // Forms submit "" for the unselected placeholder.
    let label = Option::<String>::deserialize(deserializer)?;
    match label.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(label) => label.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawInput {
    Text(String),
    Integer(i64),
    Float(f64),
}

fn deserialize_raw_input<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<RawInput>::deserialize(deserializer)? {
        None => String::new(),
        Some(RawInput::Text(text)) => text,
        Some(RawInput::Integer(n)) => n.to_string(),
        Some(RawInput::Float(n)) => n.to_string(),
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BooleanInput {
    Flag(bool),
    Label(String),
}

fn deserialize_boolean_default<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match BooleanInput::deserialize(deserializer)? {
        BooleanInput::Flag(flag) => Ok(flag),
        BooleanInput::Label(label) if label.eq_ignore_ascii_case("true") => Ok(true),
        BooleanInput::Label(label) if label.eq_ignore_ascii_case("false") => Ok(false),
        BooleanInput::Label(label) => Err(serde::de::Error::custom(format!(
            "booleanDefault must be True or False, got {label:?}"
        ))),
    }
}
