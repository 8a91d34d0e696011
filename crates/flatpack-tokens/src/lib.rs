//! # Flatpack Tokens - DSM Exports to SCSS
//!
//! `flatpack-tokens` turns a design-system export (colors and text styles, as
//! served by the design tool's JSON API) into SCSS: one variable per color and
//! one mixin per text style. It is the transformation core of the `flatpack`
//! CLI and has no network or terminal dependencies.
//!
//! ## Pipeline
//!
//! 1. [`StyleDocument`] detects which of the two JSON shapes arrived, and
//!    [`StyleDocument::adapt`] reduces it to a [`ColorTable`] and a list of
//!    [`NamedStyle`]s.
//! 2. [`emit_color_block`] writes the color variables and fills a
//!    [`ColorIndex`] on the way.
//! 3. [`emit_style_block`] writes the mixins, running every attribute through
//!    [`property::normalize`], which converts units and swaps color literals
//!    for the variables from step 2.
//! 4. [`write_region`] puts each region into its target file between the
//!    `/// START DSM VARIABLES` and `/// END DSM VARIABLES` sentinels.
//!
//! Colors must be emitted before styles: style normalization only sees
//! colors already in the index.
//!
//! ## Example
//!
//! ```rust
//! use flatpack_tokens::{
//!     emit_color_block, emit_style_block, ColorIndex, StyleContext, StyleDocument, TokenOptions,
//! };
//!
//! let doc = StyleDocument::from_json(r##"{
//!     "colors": { "primary": "#FF0000" },
//!     "fontStyles": { "heading": { "fontSize": "24px", "textColor": "#FF0000" } }
//! }"##).unwrap();
//! let adapted = doc.adapt();
//! let opts = TokenOptions::default();
//!
//! let mut index = ColorIndex::new(&opts.color_prefix);
//! let colors = emit_color_block(adapted.colors.as_ref().unwrap(), &mut index);
//! assert!(colors.contains("$color-primary: #FF0000;"));
//!
//! let ctx = StyleContext::new(&opts, &index);
//! let styles = emit_style_block(adapted.styles.as_ref().unwrap(), &ctx).unwrap();
//! assert!(styles.contains("@mixin type-heading {"));
//! assert!(styles.contains("  color: $color-primary;"));
//! ```

pub mod color;
pub mod document;
pub mod emit;
mod error;
pub mod merge;
pub mod options;
pub mod property;
pub mod units;

pub use color::{is_hex_color, ColorEntry, ColorIndex};
pub use document::{
    AdaptedDocument, ColorTable, FlatDocument, ListDocument, NamedStyle, Notice, StyleAttributes,
    StyleDocument,
};
pub use emit::{emit_color_block, emit_style_block, mixin_name, REGION_END, REGION_START};
pub use error::{MergeError, TokenError};
pub use merge::{write_region, MergeOutcome};
pub use options::{PxReplacement, RelativeUnit, TokenOptions};
pub use property::{kebab_case, StyleContext};
