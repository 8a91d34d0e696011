//! Fractal component config export.
//!
//! Fractal reads a component's context from `<name>.config.json`. Publishing
//! the color index there lets the pattern library render swatches keyed by
//! raw value, e.g. `{"#FF0000": "$color-primary"}`.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use flatpack_tokens::ColorIndex;
use serde_json::{Map, Value};

/// Writes `index` as a raw-value to variable map at `context.<context_key>`
/// inside the JSON file at `path`. The rest of the file is kept as is.
///
/// The file must already exist; missing intermediate objects are created.
pub fn export_color_index(path: &Path, context_key: &str, index: &ColorIndex) -> Result<()> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("cannot read Fractal config {}", path.display()))?;
    let mut config: Value = serde_json::from_str(&text)
        .with_context(|| format!("Fractal config {} is not valid JSON", path.display()))?;

    let colors: Map<String, Value> = index
        .entries()
        .iter()
        .map(|entry| (entry.raw.clone(), Value::String(entry.symbol.clone())))
        .collect();
    insert_at(&mut config, &format!("context.{}", context_key), Value::Object(colors))
        .with_context(|| format!("cannot update {}", path.display()))?;

    let mut out = serde_json::to_string_pretty(&config)?;
    out.push('\n');
    fs::write(path, out).with_context(|| format!("cannot write {}", path.display()))?;
    log::info!(
        "exported {} colors to {} at context.{}",
        index.len(),
        path.display(),
        context_key
    );
    Ok(())
}

fn insert_at(target: &mut Value, key_path: &str, value: Value) -> Result<()> {
    let mut segments = key_path.split('.').filter(|s| !s.is_empty()).peekable();
    let mut current = target;
    while let Some(segment) = segments.next() {
        let map = current
            .as_object_mut()
            .ok_or_else(|| anyhow!("parent of '{}' is not an object", segment))?;
        if segments.peek().is_none() {
            map.insert(segment.to_string(), value);
            return Ok(());
        }
        current = map
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }
    bail!("empty context key")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn index() -> ColorIndex {
        let mut index = ColorIndex::new("color-");
        index.record("primary", "#FF0000");
        index.record("ink", "#222222");
        index
    }

    #[test]
    fn test_export_keeps_other_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("colors.config.json");
        fs::write(&path, r#"{"title": "Colors", "context": {"intro": "hi"}}"#).unwrap();

        export_color_index(&path, "colors", &index()).unwrap();

        let written: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(
            written,
            json!({
                "title": "Colors",
                "context": {
                    "intro": "hi",
                    "colors": {"#FF0000": "$color-primary", "#222222": "$color-ink"}
                }
            })
        );
    }

    #[test]
    fn test_export_creates_nested_context() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("c.json");
        fs::write(&path, "{}").unwrap();

        export_color_index(&path, "tokens.palette", &index()).unwrap();

        let written: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(
            written["context"]["tokens"]["palette"]["#222222"],
            json!("$color-ink")
        );
    }

    #[test]
    fn test_export_keeps_case_variant_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("c.json");
        fs::write(&path, "{}").unwrap();
        let mut index = ColorIndex::new("color-");
        index.record("primary", "#FF0000");
        index.record("alert", "#ff0000");

        export_color_index(&path, "colors", &index).unwrap();

        let written: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(
            written["context"]["colors"],
            json!({"#FF0000": "$color-primary", "#ff0000": "$color-alert"})
        );
    }

    #[test]
    fn test_export_errors() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(export_color_index(&missing, "colors", &index()).is_err());

        let scalar_context = dir.path().join("scalar.json");
        fs::write(&scalar_context, r#"{"context": 3}"#).unwrap();
        let err = export_color_index(&scalar_context, "colors", &index()).unwrap_err();
        assert!(format!("{:#}", err).contains("not an object"));
    }
}
