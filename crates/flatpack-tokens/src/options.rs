//! Options that shape the generated stylesheet text.
//!
//! [`TokenOptions`] is deserialized straight from the `opts` section of the
//! user's configuration. Every field carries a default, so a partial section
//! only overrides the keys it names:
//!
//! ```yaml
//! colorPrefix: "color-"
//! typePrefix: "type-"
//! indent: 2
//! replacePx:
//!   enable: true
//!   val: rem
//!   remUseTenth: false
//!   emBase: "16"
//! defaultFontWeight: "400"
//! ```

use serde::{Deserialize, Deserializer};

/// Naming, indentation and unit settings for the emitters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TokenOptions {
    /// Prepended to every color name (`$<prefix><name>`).
    pub color_prefix: String,
    /// Prepended to every mixin name.
    pub type_prefix: String,
    /// Spaces in front of each mixin body line.
    pub indent: usize,
    /// Pixel replacement strategy.
    pub replace_px: PxReplacement,
    /// `font-weight` values equal to this are left out of the mixins.
    #[serde(deserialize_with = "string_or_number")]
    pub default_font_weight: String,
}

impl Default for TokenOptions {
    fn default() -> Self {
        Self {
            color_prefix: "color-".to_string(),
            type_prefix: "type-".to_string(),
            indent: 2,
            replace_px: PxReplacement::default(),
            default_font_weight: "400".to_string(),
        }
    }
}

/// Controls whether and how `px` values become relative units.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PxReplacement {
    pub enable: bool,
    /// Target unit.
    pub val: RelativeUnit,
    /// With `rem`, multiply by 0.1 instead of dividing by `em_base`.
    pub rem_use_tenth: bool,
    /// Divisor for the default strategy, kept as text as it appears in config.
    #[serde(deserialize_with = "string_or_number")]
    pub em_base: String,
}

impl Default for PxReplacement {
    fn default() -> Self {
        Self {
            enable: false,
            val: RelativeUnit::Rem,
            rem_use_tenth: false,
            em_base: "16".to_string(),
        }
    }
}

impl PxReplacement {
    /// Enabled replacement with the given unit and the default divisor.
    pub fn enabled(val: RelativeUnit) -> Self {
        Self {
            enable: true,
            val,
            ..Self::default()
        }
    }

    /// Switches to the tenth strategy (`12px` becomes `1.2rem`).
    pub fn with_tenth(mut self) -> Self {
        self.rem_use_tenth = true;
        self
    }

    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.em_base = base.into();
        self
    }
}

/// Relative units a pixel value can be rewritten into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelativeUnit {
    #[default]
    Rem,
    Em,
}

impl RelativeUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            RelativeUnit::Rem => "rem",
            RelativeUnit::Em => "em",
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Int(i64),
    Float(f64),
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => s,
        StringOrNumber::Int(n) => n.to_string(),
        StringOrNumber::Float(f) => f.to_string(),
    })
}
