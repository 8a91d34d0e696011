//! Translation of DSM style attributes into SCSS declarations.
//!
//! Each attribute goes through the rules below in order; the first one that
//! applies decides the output, and the attribute is then consumed.
//!
//! | Property | Rule |
//! |----------|------|
//! | `name` | metadata, never emitted |
//! | `text-align` | dropped |
//! | `font-style: normal` | dropped |
//! | `font-weight` equal to the default | dropped |
//! | `text-color` | emitted as `color`, value resolved through the color index |
//! | `font-family` | value single-quoted |
//! | `line-height` in px | `font-size / line-height`, 2 decimals, unitless |
//! | other values with `px` | unit converter |
//! | `#RRGGBB` values | color index, literal kept if unknown |
//!
//! Property names arrive in camelCase or kebab-case and always leave in
//! kebab-case.

use std::collections::VecDeque;

use crate::color::ColorIndex;
use crate::document::{scalar_text, StyleAttributes};
use crate::error::TokenError;
use crate::options::TokenOptions;
use crate::units;

/// What the normalizer needs to know about the run.
#[derive(Debug, Clone, Copy)]
pub struct StyleContext<'a> {
    pub options: &'a TokenOptions,
    pub colors: &'a ColorIndex,
}

impl<'a> StyleContext<'a> {
    pub fn new(options: &'a TokenOptions, colors: &'a ColorIndex) -> Self {
        Self { options, colors }
    }
}

/// Converts camelCase to kebab-case in one pass.
///
/// Every uppercase letter becomes a hyphen plus its lowercase form, except
/// at the start of the name or right after an existing hyphen, so
/// `FontSize` gives `font-size` and kebab-case names come back unchanged.
pub fn kebab_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_uppercase() {
            if !out.is_empty() && !out.ends_with('-') {
                out.push('-');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// The attributes of one style still waiting to be emitted.
///
/// Built from a style's attributes with names already in kebab-case; `name`
/// metadata and `null` values never enter the set.
#[derive(Debug, Clone)]
pub struct RemainingProperties {
    entries: VecDeque<(String, String)>,
    font_size_px: Option<f64>,
}

impl RemainingProperties {
    pub fn from_attributes(attributes: &StyleAttributes) -> Self {
        let mut entries = VecDeque::with_capacity(attributes.len());
        for (key, value) in attributes {
            if key == "name" || value.is_null() {
                continue;
            }
            match scalar_text(value) {
                Some(text) => entries.push_back((kebab_case(key), text)),
                None => log::warn!("property '{}' is not a scalar, skipping", key),
            }
        }

        let font_size_px = entries
            .iter()
            .find(|(name, _)| name == "font-size")
            .and_then(|(_, value)| units::pixel_magnitude(value));

        Self {
            entries,
            font_size_px,
        }
    }

    /// Font size in pixels, if the style declares one.
    pub fn font_size_px(&self) -> Option<f64> {
        self.font_size_px
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes and returns the next property in source order.
    pub fn take_next(&mut self) -> Option<(String, String)> {
        self.entries.pop_front()
    }
}

/// Normalizes every attribute of a style, in source order.
///
/// Returns the declaration lines without indentation or trailing newlines.
pub fn normalize_style(
    style_name: &str,
    attributes: &StyleAttributes,
    ctx: &StyleContext<'_>,
) -> Result<Vec<String>, TokenError> {
    let mut remaining = RemainingProperties::from_attributes(attributes);
    let font_size_px = remaining.font_size_px();
    let mut lines = Vec::with_capacity(remaining.len());

    while let Some((property, value)) = remaining.take_next() {
        let line = normalize(&property, &value, font_size_px, ctx)
            .map_err(|err| err.in_property(style_name, &property))?;
        lines.extend(line);
    }

    Ok(lines)
}

/// Normalizes a single property.
///
/// `property` may be camelCase or kebab-case. `font_size_px` is the font
/// size of the enclosing style, used for unitless line heights. Returns
/// `None` when the property is suppressed.
pub fn normalize(
    property: &str,
    value: &str,
    font_size_px: Option<f64>,
    ctx: &StyleContext<'_>,
) -> Result<Option<String>, TokenError> {
    let property = kebab_case(property);
    let opts = ctx.options;

    match property.as_str() {
        "name" | "text-align" => return Ok(None),
        "font-style" if value == "normal" => return Ok(None),
        "font-weight" if value == opts.default_font_weight => return Ok(None),
        "text-color" => {
            let value = ctx.colors.resolve(value).unwrap_or(value);
            return Ok(Some(declaration("color", value)));
        }
        "font-family" => {
            return Ok(Some(declaration(&property, &format!("'{}'", value))));
        }
        "line-height" if value.contains("px") => {
            if let Some(font_size) = font_size_px {
                let ratio = unitless_line_height(font_size, value)?;
                return Ok(Some(declaration(&property, &ratio)));
            }
            log::debug!(
                "line-height {} without a pixel font-size, converting as a length",
                value
            );
        }
        _ => {}
    }

    let value = if value.contains("px") {
        units::convert(value, &opts.replace_px)?
    } else {
        value.to_string()
    };

    let value = match ctx.colors.resolve(&value) {
        Some(symbol) => symbol.to_string(),
        None => value,
    };

    Ok(Some(declaration(&property, &value)))
}

/// `font_size / line_height`, rounded to two decimals.
fn unitless_line_height(font_size: f64, line_height: &str) -> Result<String, TokenError> {
    let line_height = units::pixel_magnitude(line_height)
        .filter(|lh| *lh > 0.0)
        .ok_or_else(|| TokenError::malformed_px(line_height))?;
    let ratio = (font_size / line_height * 100.0).round() / 100.0;
    Ok(units::format_number(ratio))
}

fn declaration(property: &str, value: &str) -> String {
    format!("{}: {};", property, value)
}
