//! Color declarations and the raw-value to variable index.
//!
//! [`ColorIndex`] is filled while the color block is emitted and consulted
//! afterwards when style properties are normalized, so that a literal such
//! as `#FF0000` inside a mixin becomes `$color-primary`. One index lives for
//! one run; it is passed explicitly to whoever needs it.

use std::collections::HashMap;

/// A registered color: its raw value and the variable that now names it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorEntry {
    pub raw: String,
    pub symbol: String,
}

/// Maps raw color values to generated variable names.
#[derive(Debug, Clone, Default)]
pub struct ColorIndex {
    prefix: String,
    entries: Vec<ColorEntry>,
    /// Exact raw value to entry.
    positions: HashMap<String, usize>,
    /// Lowercased hex literal to the entry registered last for it.
    hex_lookup: HashMap<String, usize>,
}

impl ColorIndex {
    /// Creates an empty index whose variables are named `$<prefix><name>`.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            entries: Vec::new(),
            positions: HashMap::new(),
            hex_lookup: HashMap::new(),
        }
    }

    /// The variable name generated for a color name, including the `$`.
    pub fn symbol_for(&self, name: &str) -> String {
        format!("${}{}", self.prefix, name)
    }

    /// Registers `raw` under `name` and returns its declaration line.
    ///
    /// Entries are keyed by the exact raw string. When the same raw value is
    /// registered twice, the later name wins but the entry keeps its
    /// original position; `#FF0000` and `#ff0000` stay separate entries.
    pub fn record(&mut self, name: &str, raw: &str) -> String {
        let symbol = self.symbol_for(name);
        let declaration = format!("{}: {};", symbol, raw);

        let pos = match self.positions.get(raw) {
            Some(&pos) => {
                log::debug!("color {} re-registered as {}", raw, symbol);
                self.entries[pos].symbol = symbol;
                pos
            }
            None => {
                let pos = self.entries.len();
                self.positions.insert(raw.to_string(), pos);
                self.entries.push(ColorEntry {
                    raw: raw.to_string(),
                    symbol,
                });
                pos
            }
        };
        if is_hex_color(raw) {
            self.hex_lookup.insert(raw.to_ascii_lowercase(), pos);
        }

        declaration
    }

    /// Looks up the variable for a raw value.
    ///
    /// Only six-digit hex literals are eligible. An exact match wins;
    /// otherwise hex digits compare case-insensitively, picking the last
    /// registration. Anything else returns `None`.
    pub fn resolve(&self, raw: &str) -> Option<&str> {
        if !is_hex_color(raw) {
            return None;
        }
        self.positions
            .get(raw)
            .or_else(|| self.hex_lookup.get(&raw.to_ascii_lowercase()))
            .map(|&pos| self.entries[pos].symbol.as_str())
    }

    /// Registered colors in registration order.
    pub fn entries(&self) -> &[ColorEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// True for `#RRGGBB` literals, any case.
pub fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].bytes().all(|b| b.is_ascii_hexdigit())
}
