//! DSM export documents and their normalized view.
//!
//! The design tool serves two JSON shapes for the same data:
//!
//! ```text
//! flat:  { "colors": { name: value }, "fontStyles": { name: { attr: value } } }
//! list:  { "list": { "colors": [ { "colors": [ { "name", "value" } ] } ],
//!                    "typeStyles": [ { "name", attr: value } ] } }
//! ```
//!
//! [`StyleDocument`] records which shape arrived; [`StyleDocument::adapt`]
//! turns either into the same [`AdaptedDocument`], so nothing downstream
//! needs to know where the data came from.

use std::fmt;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::TokenError;

/// Attributes of one style, keyed by the source's property names.
pub type StyleAttributes = Map<String, Value>;

/// Insertion-ordered color name to raw value table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorTable {
    entries: Vec<(String, String)>,
}

impl ColorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a color. A repeated name takes the new value but keeps its
    /// original position.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for ColorTable {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut table = ColorTable::new();
        for (name, value) in iter {
            table.insert(name, value);
        }
        table
    }
}

/// A text style and its attributes, without the `name` metadata key.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedStyle {
    pub name: String,
    pub attributes: StyleAttributes,
}

impl NamedStyle {
    pub fn new(name: impl Into<String>, mut attributes: StyleAttributes) -> Self {
        attributes.shift_remove("name");
        Self {
            name: name.into(),
            attributes,
        }
    }
}

/// Informational outcome of adapting a document: a half with no usable data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    NoColorData,
    NoStyleData,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::NoColorData => write!(f, "No DSM color data."),
            Notice::NoStyleData => write!(f, "No DSM font or type style data."),
        }
    }
}

/// Shape-independent view of a document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdaptedDocument {
    /// `None` when the document has no usable colors.
    pub colors: Option<ColorTable>,
    /// `None` when the document has no usable styles.
    pub styles: Option<Vec<NamedStyle>>,
}

impl AdaptedDocument {
    /// Notices for every half that will be skipped.
    pub fn notices(&self) -> Vec<Notice> {
        let mut notices = Vec::new();
        if self.colors.is_none() {
            notices.push(Notice::NoColorData);
        }
        if self.styles.is_none() {
            notices.push(Notice::NoStyleData);
        }
        notices
    }
}

/// The `?exportFormat=list` shape.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListDocument {
    pub colors: Option<Value>,
    pub type_styles: Option<Value>,
}

/// The default shape.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FlatDocument {
    pub colors: Option<Value>,
    pub font_styles: Option<Value>,
}

/// A DSM export in one of its two supported shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum StyleDocument {
    Flat(FlatDocument),
    List(ListDocument),
}

impl StyleDocument {
    /// Parses a document from JSON text.
    pub fn from_json(text: &str) -> Result<Self, TokenError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(value)
    }

    /// Detects the shape of an already parsed document. The presence of a
    /// `list` key selects the list shape.
    pub fn from_value(value: Value) -> Result<Self, TokenError> {
        let mut root = match value {
            Value::Object(root) => root,
            other => {
                return Err(TokenError::NotAnObject {
                    found: kind_of(&other),
                })
            }
        };

        if let Some(list) = root.remove("list") {
            // A `list` that is not an object still selects the list shape;
            // it just carries nothing usable.
            let list = serde_json::from_value(list).unwrap_or_default();
            return Ok(StyleDocument::List(list));
        }

        Ok(StyleDocument::Flat(FlatDocument {
            colors: root.remove("colors"),
            font_styles: root.remove("fontStyles"),
        }))
    }

    /// Extracts colors and styles, whatever the shape.
    pub fn adapt(&self) -> AdaptedDocument {
        let (colors, styles) = match self {
            StyleDocument::Flat(doc) => (
                doc.colors.as_ref().map(flat_colors),
                doc.font_styles.as_ref().map(flat_styles),
            ),
            StyleDocument::List(doc) => (
                doc.colors.as_ref().map(grouped_colors),
                doc.type_styles.as_ref().map(listed_styles),
            ),
        };

        AdaptedDocument {
            colors: colors.filter(|c| !c.is_empty()),
            styles: styles.filter(|s| !s.is_empty()),
        }
    }
}

fn flat_colors(value: &Value) -> ColorTable {
    let mut table = ColorTable::new();
    let Some(map) = value.as_object() else {
        log::warn!("`colors` is not an object, ignoring it");
        return table;
    };
    for (name, raw) in map {
        match scalar_text(raw) {
            Some(raw) => table.insert(name.as_str(), raw),
            None => log::warn!("color '{}' has no usable value, skipping", name),
        }
    }
    table
}

fn grouped_colors(value: &Value) -> ColorTable {
    let mut table = ColorTable::new();
    let Some(groups) = value.as_array() else {
        log::warn!("`list.colors` is not an array, ignoring it");
        return table;
    };
    for group in groups {
        let Some(colors) = group.get("colors").and_then(Value::as_array) else {
            log::warn!("color group without a `colors` array, skipping");
            continue;
        };
        for pair in colors {
            let name = pair.get("name").and_then(Value::as_str);
            let raw = pair.get("value").and_then(scalar_text);
            match (name, raw) {
                (Some(name), Some(raw)) => table.insert(name, raw),
                _ => log::warn!("color entry without name or value, skipping"),
            }
        }
    }
    table
}

fn flat_styles(value: &Value) -> Vec<NamedStyle> {
    let Some(map) = value.as_object() else {
        log::warn!("`fontStyles` is not an object, ignoring it");
        return Vec::new();
    };
    map.iter()
        .filter_map(|(name, attrs)| match attrs.as_object() {
            Some(attrs) => Some(NamedStyle::new(name.as_str(), attrs.clone())),
            None => {
                log::warn!("font style '{}' is not an object, skipping", name);
                None
            }
        })
        .collect()
}

fn listed_styles(value: &Value) -> Vec<NamedStyle> {
    let Some(items) = value.as_array() else {
        log::warn!("`list.typeStyles` is not an array, ignoring it");
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| {
            let attrs = item.as_object()?;
            match attrs.get("name").and_then(Value::as_str) {
                Some(name) => Some(NamedStyle::new(name, attrs.clone())),
                None => {
                    log::warn!("type style without a name, skipping");
                    None
                }
            }
        })
        .collect()
}

/// Text form of a string, number or boolean JSON value.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
