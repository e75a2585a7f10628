//! Document mapping for drafts and accepted field definitions.
//!
//! Drafts and [`FieldSpec`]s are stored as JSON or YAML using the form's
//! camelCase keys. The format is picked from the file extension
//! (`.json`, `.yaml`, `.yml`) unless given explicitly. The `text` format is
//! render-only and meant for terminals.

use std::fmt::Write as _;
use std::path::Path;

use field_schema_core::{
    Constraints, FieldDraft, FieldError, FieldSpec, ValidationErrors, Validated,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{DocumentError, Result};

/// Supported document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum DocumentFormat {
    #[default]
    Json,
    Yaml,
    /// Human-readable listing; cannot be read back.
    Text,
}

impl DocumentFormat {
    /// Picks the format from a path's extension.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::UnsupportedFormat`] for any other extension.
    ///
    /// # Examples
    ///
    /// ```
    /// use field_schema_document::DocumentFormat;
    ///
    /// assert_eq!(DocumentFormat::from_path("field.yml").unwrap(), DocumentFormat::Yaml);
    /// assert!(DocumentFormat::from_path("field.toml").is_err());
    /// ```
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            _ => Err(DocumentError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Canonical file extension.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Text => "txt",
        }
    }
}

/// Serializes `value` as JSON or YAML.
///
/// # Errors
///
/// Returns a serialization error, or [`DocumentError::UnsupportedFormat`] for
/// [`DocumentFormat::Text`], which only [`render_validated`] and
/// [`render_errors`] support.
pub fn to_string<T: Serialize>(value: &T, format: DocumentFormat, pretty: bool) -> Result<String> {
    match format {
        DocumentFormat::Json if pretty => Ok(serde_json::to_string_pretty(value)?),
        DocumentFormat::Json => Ok(serde_json::to_string(value)?),
        DocumentFormat::Yaml => Ok(serde_yaml::to_string(value)?),
        DocumentFormat::Text => Err(DocumentError::UnsupportedFormat("text".to_string())),
    }
}

/// Deserializes a JSON or YAML document.
///
/// # Errors
///
/// Returns a parse error, or [`DocumentError::UnsupportedFormat`] for
/// [`DocumentFormat::Text`].
pub fn from_str<T: DeserializeOwned>(raw: &str, format: DocumentFormat) -> Result<T> {
    match format {
        DocumentFormat::Json => Ok(serde_json::from_str(raw)?),
        DocumentFormat::Yaml => Ok(serde_yaml::from_str(raw)?),
        DocumentFormat::Text => Err(DocumentError::UnsupportedFormat("text".to_string())),
    }
}

fn load<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let format = DocumentFormat::from_path(path)?;
    let raw = std::fs::read_to_string(path)?;
    debug!(path = %path.display(), ?format, "Loading document");
    from_str(&raw, format)
}

fn save<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let format = DocumentFormat::from_path(path)?;
    let mut raw = to_string(value, format, true)?;
    if !raw.ends_with('\n') {
        raw.push('\n');
    }
    std::fs::write(path, raw)?;
    debug!(path = %path.display(), ?format, "Saved document");
    Ok(())
}

/// Loads a draft from a `.json`/`.yaml`/`.yml` file.
///
/// Missing keys take their empty defaults; an unknown `datatype` label is a
/// parse error.
///
/// # Errors
///
/// Returns I/O, parse or unsupported-format errors.
pub fn load_draft(path: impl AsRef<Path>) -> Result<FieldDraft> {
    load(path.as_ref())
}

/// Writes a draft, picking the format from the extension.
///
/// # Errors
///
/// Returns I/O, serialization or unsupported-format errors.
pub fn save_draft(draft: &FieldDraft, path: impl AsRef<Path>) -> Result<()> {
    save(draft, path.as_ref())
}

/// Loads an accepted field definition.
///
/// # Errors
///
/// Returns I/O, parse or unsupported-format errors.
pub fn load_spec(path: impl AsRef<Path>) -> Result<FieldSpec> {
    load(path.as_ref())
}

/// Writes an accepted field definition.
///
/// # Errors
///
/// Returns I/O, serialization or unsupported-format errors.
pub fn save_spec(spec: &FieldSpec, path: impl AsRef<Path>) -> Result<()> {
    save(spec, path.as_ref())
}

/// Renders an accepted definition with its notices.
///
/// JSON and YAML emit the `{ spec, notices }` structure; text emits the
/// definition followed by one `note:` line per notice.
///
/// # Errors
///
/// Returns serialization errors.
pub fn render_validated(
    validated: &Validated,
    format: DocumentFormat,
    pretty: bool,
) -> Result<String> {
    match format {
        DocumentFormat::Text => {
            let mut out = spec_to_text(&validated.spec);
            for notice in &validated.notices {
                let _ = writeln!(out, "note: {}", notice.message);
            }
            Ok(out)
        }
        _ => to_string(validated, format, pretty),
    }
}

/// Renders validation errors.
///
/// JSON and YAML emit `{ "errors": [...] }`; text emits one
/// `attribute: message` line per error.
///
/// # Errors
///
/// Returns serialization errors.
pub fn render_errors(
    errors: &ValidationErrors,
    format: DocumentFormat,
    pretty: bool,
) -> Result<String> {
    #[derive(Serialize)]
    struct ErrorReport<'a> {
        errors: &'a [FieldError],
    }

    match format {
        DocumentFormat::Text => {
            let mut out = String::new();
            for error in errors {
                let _ = writeln!(out, "{error}");
            }
            Ok(out)
        }
        _ => to_string(
            &ErrorReport {
                errors: errors.errors(),
            },
            format,
            pretty,
        ),
    }
}

fn spec_to_text(spec: &FieldSpec) -> String {
    let mut out = String::new();
    let mut flags = Vec::new();
    if spec.required {
        flags.push("required");
    }
    if spec.nullable {
        flags.push("nullable");
    }

    let _ = write!(out, "{}: {}", spec.name, spec.datatype());
    if !flags.is_empty() {
        let _ = write!(out, " ({})", flags.join(", "));
    }
    out.push('\n');

    if let Some(description) = &spec.description {
        let _ = writeln!(out, "  {description}");
    }

    match &spec.constraints {
        Constraints::Int {
            start_value,
            end_value,
        } => {
            if let Some(start) = start_value {
                let _ = writeln!(out, "  start: {start}");
            }
            if let Some(end) = end_value {
                let _ = writeln!(out, "  end: {end}");
            }
        }
        Constraints::String {
            min_length,
            max_length,
            default_value,
        } => {
            if let Some(min) = min_length {
                let _ = writeln!(out, "  min length: {min}");
            }
            if let Some(max) = max_length {
                let _ = writeln!(out, "  max length: {max}");
            }
            if let Some(default) = default_value {
                let _ = writeln!(out, "  default: {default:?}");
            }
        }
        Constraints::Boolean { boolean_default } => {
            let _ = writeln!(out, "  default: {boolean_default}");
        }
        Constraints::Enum { enum_values } => {
            for member in enum_values {
                let _ = writeln!(out, "  - {} ({})", member.value, member.member_type);
            }
        }
        Constraints::Number | Constraints::Array => {}
    }

    out
}
