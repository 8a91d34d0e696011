//! Pixel to relative unit conversion.
//!
//! Two strategies are available, selected by [`PxReplacement`]:
//!
//! | Strategy | Formula | `12px` |
//! |----------|---------|--------|
//! | divisor (default) | `px / base` | `0.75rem` with base 16 |
//! | tenth (`rem` only) | `px * 0.1`, 4 decimals, trailing zeros stripped | `1.2rem` |
//!
//! Every `<number>px` occurrence in the value is rewritten; all other
//! characters (signs, separators, other units) are kept verbatim.

use crate::error::TokenError;
use crate::options::{PxReplacement, RelativeUnit};

/// Rewrites the pixel magnitudes in `value` according to `opts`.
///
/// Returns the input unchanged when replacement is disabled. A value that
/// contains `px` without a number in front of it is rejected.
pub fn convert(value: &str, opts: &PxReplacement) -> Result<String, TokenError> {
    if !opts.enable {
        return Ok(value.to_string());
    }

    let strategy = Strategy::from_options(opts)?;
    let mut out = String::with_capacity(value.len() + 4);
    let mut rest = value;
    let mut replaced = 0;

    while let Some(idx) = rest.find("px") {
        let head = &rest[..idx];
        let start = magnitude_start(head);
        let magnitude = parse_magnitude(&head[start..]).ok_or_else(|| TokenError::malformed_px(value))?;

        out.push_str(&head[..start]);
        out.push_str(&strategy.apply(magnitude));
        out.push_str(opts.val.as_str());
        rest = &rest[idx + 2..];
        replaced += 1;
    }

    if replaced == 0 {
        return Err(TokenError::malformed_px(value));
    }

    out.push_str(rest);
    Ok(out)
}

/// Numeric magnitude of a plain pixel value such as `"24px"`.
///
/// Returns `None` for anything that is not exactly a number followed by `px`.
pub fn pixel_magnitude(value: &str) -> Option<f64> {
    value.trim().strip_suffix("px").and_then(parse_magnitude)
}

/// Formats a number the way it should appear in stylesheet output:
/// shortest round-trip form, no trailing `.0`.
pub fn format_number(n: f64) -> String {
    if n == 0.0 {
        // Avoids "-0".
        return "0".to_string();
    }
    format!("{}", n)
}

/// Rounds to `places` decimals and strips trailing zeros and a trailing point.
pub fn round_trimmed(n: f64, places: usize) -> String {
    let fixed = format!("{:.*}", places, n);
    if !fixed.contains('.') {
        return fixed;
    }
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "" | "-" | "-0" => "0".to_string(),
        other => other.to_string(),
    }
}

enum Strategy {
    Tenth,
    Divisor(f64),
}

impl Strategy {
    fn from_options(opts: &PxReplacement) -> Result<Self, TokenError> {
        if opts.val == RelativeUnit::Rem && opts.rem_use_tenth {
            return Ok(Strategy::Tenth);
        }
        let base = opts
            .em_base
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|b| b.is_finite() && *b > 0.0)
            .ok_or_else(|| TokenError::InvalidBase {
                base: opts.em_base.clone(),
            })?;
        Ok(Strategy::Divisor(base))
    }

    fn apply(&self, magnitude: f64) -> String {
        match self {
            Strategy::Tenth => round_trimmed(magnitude * 0.1, 4),
            Strategy::Divisor(base) => format_number(magnitude / base),
        }
    }
}

/// Byte offset where the trailing run of digits and decimal points begins.
fn magnitude_start(head: &str) -> usize {
    head.char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit() || *c == '.')
        .last()
        .map(|(i, _)| i)
        .unwrap_or(head.len())
}

fn parse_magnitude(digits: &str) -> Option<f64> {
    if !digits.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse::<f64>().ok().filter(|n| n.is_finite())
}
