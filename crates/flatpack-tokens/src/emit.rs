//! Generated SCSS regions.
//!
//! Both emitters produce a complete region, sentinels included, ready for
//! [`write_region`](crate::merge::write_region):
//!
//! ```scss
//! /// START DSM VARIABLES
//! $color-primary: #FF0000;
//! /// END DSM VARIABLES
//! ```
//!
//! ```scss
//! /// START DSM VARIABLES
//! @mixin type-heading {
//!   font-size: 24px;
//!   color: $color-primary;
//! }
//!
//! /// END DSM VARIABLES
//! ```
//!
//! Output depends only on the inputs, so the same document and options give
//! byte-identical regions on every run.

use crate::color::ColorIndex;
use crate::document::{ColorTable, NamedStyle};
use crate::error::TokenError;
use crate::property::{normalize_style, StyleContext};

/// First line of every generated region.
pub const REGION_START: &str = "/// START DSM VARIABLES";
/// Last line of every generated region.
pub const REGION_END: &str = "/// END DSM VARIABLES";

/// Emits one variable per color, registering each in `index`.
///
/// Must run before [`emit_style_block`] so that styles can refer to the
/// variables by name.
pub fn emit_color_block(colors: &ColorTable, index: &mut ColorIndex) -> String {
    let mut out = String::new();
    out.push_str(REGION_START);
    out.push('\n');
    for (name, raw) in colors.iter() {
        out.push_str(&index.record(name, raw));
        out.push('\n');
    }
    out.push_str(REGION_END);
    log::debug!("emitted {} color declarations", colors.len());
    out
}

/// Emits one mixin per style.
pub fn emit_style_block(
    styles: &[NamedStyle],
    ctx: &StyleContext<'_>,
) -> Result<String, TokenError> {
    let mut out = String::new();
    out.push_str(REGION_START);
    out.push('\n');
    for style in styles {
        let lines = normalize_style(&style.name, &style.attributes, ctx)?;
        out.push_str("@mixin ");
        out.push_str(&mixin_name(&ctx.options.type_prefix, &style.name));
        out.push_str(" {\n");
        out.push_str(&indent_lines(&lines, ctx.options.indent));
        out.push_str("}\n\n");
    }
    out.push_str(REGION_END);
    log::debug!("emitted {} mixins", styles.len());
    Ok(out)
}

/// Mixin identifier for a style: prefix plus name, lowercased, `/` turned
/// into `-`, spaces removed.
pub fn mixin_name(prefix: &str, style_name: &str) -> String {
    format!("{}{}", prefix, style_name)
        .replace('/', "-")
        .replace(' ', "")
        .to_lowercase()
}

fn indent_lines(lines: &[String], width: usize) -> String {
    let pad = " ".repeat(width);
    let mut out = String::new();
    for line in lines {
        if !line.is_empty() {
            out.push_str(&pad);
        }
        out.push_str(line);
        out.push('\n');
    }
    out
}
