//! Error types for token generation and region merging.

use std::io;
use std::path::PathBuf;

/// Errors produced while turning a design document into stylesheet text.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// The document is not valid JSON.
    #[error("Failed to parse DSM JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// The document parsed, but its root is not a JSON object.
    #[error("DSM JSON root must be an object, found {found}")]
    NotAnObject { found: &'static str },

    /// A value mentions `px` but carries no numeric magnitude in front of it.
    #[error("Malformed pixel value '{value}': expected a number followed by 'px'")]
    MalformedPixelValue { value: String },

    /// The configured divisor for relative units is unusable.
    #[error("Invalid unit base '{base}': expected a positive number")]
    InvalidBase { base: String },

    /// A property of a named style could not be normalized.
    #[error("Style '{style}', property '{property}': {source}")]
    Property {
        style: String,
        property: String,
        #[source]
        source: Box<TokenError>,
    },
}

impl TokenError {
    pub(crate) fn malformed_px(value: impl Into<String>) -> Self {
        Self::MalformedPixelValue {
            value: value.into(),
        }
    }

    pub(crate) fn in_property(self, style: &str, property: &str) -> Self {
        Self::Property {
            style: style.to_string(),
            property: property.to_string(),
            source: Box::new(self),
        }
    }
}

/// Errors produced by the region merge writer.
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    /// Only one of the two sentinel lines is present in the target file.
    #[error("{path}: found '{found}' without its matching sentinel")]
    MalformedRegion { path: PathBuf, found: &'static str },

    /// Reading or writing the target file failed.
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
