//! Run configuration.
//!
//! Configuration lives in a YAML file (`flatpack.yaml` by default). Every
//! section and every key inside it is optional; whatever is left out keeps
//! its default, so a file only needs to name what differs:
//!
//! ```yaml
//! urls:
//!   json: https://dsm.example.com/api/v1/styles?exportFormat=list
//!   icons: https://dsm.example.com/api/v1/icons.zip
//! dest:
//!   colorVars: { name: _colors, path: src/scss/settings }
//! opts:
//!   replacePx: { enable: true, val: rem }
//! ```
//!
//! Destination paths are relative to the project root.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use flatpack_tokens::TokenOptions;
use serde::Deserialize;

/// File looked up in the project root when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "flatpack.yaml";

const SCSS_EXTENSION: &str = ".scss";

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub urls: Urls,
    pub dest: Destinations,
    pub opts: TokenOptions,
    pub fractal: FractalConfig,
}

/// Where the design tool serves its exports.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct Urls {
    pub json: Option<String>,
    pub icons: Option<String>,
}

/// Output locations.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Destinations {
    pub color_vars: VarsFile,
    pub type_vars: VarsFile,
    pub icons: Option<PathBuf>,
}

impl Destinations {
    /// Target file for the color variables.
    pub fn colors_file(&self, root: &Path) -> PathBuf {
        self.color_vars.resolve(root, "vars.colors")
    }

    /// Target file for the type mixins.
    pub fn type_file(&self, root: &Path) -> PathBuf {
        self.type_vars.resolve(root, "vars.type")
    }

    /// Directory receiving the extracted icons.
    pub fn icons_dir(&self, root: &Path) -> PathBuf {
        root.join(self.icons.as_deref().unwrap_or(Path::new("icons")))
    }
}

/// A generated SCSS file: its name and the directory holding it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct VarsFile {
    pub name: Option<String>,
    pub path: Option<PathBuf>,
}

impl VarsFile {
    fn resolve(&self, root: &Path, default_name: &str) -> PathBuf {
        let dir = self.path.as_deref().unwrap_or(Path::new("scss"));
        let name = self.name.as_deref().unwrap_or(default_name);
        root.join(dir).join(with_scss_extension(name))
    }
}

/// Appends `.scss` unless the name already ends with it.
pub fn with_scss_extension(name: &str) -> String {
    if name.to_ascii_lowercase().ends_with(SCSS_EXTENSION) {
        name.to_string()
    } else {
        format!("{}{}", name, SCSS_EXTENSION)
    }
}

/// Export of the color index into a Fractal component config.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct FractalConfig {
    pub enable: bool,
    pub colors: FractalColors,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FractalColors {
    /// JSON file to update, relative to the root.
    pub file: PathBuf,
    /// Dotted key under the file's `context` object.
    pub context: String,
}

impl Default for FractalColors {
    fn default() -> Self {
        Self {
            file: PathBuf::from("components/colors/colors.config.json"),
            context: "colors".to_string(),
        }
    }
}

impl Config {
    /// Reads and parses a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_yaml(&text).with_context(|| format!("failed to parse config {}", path.display()))
    }

    /// Parses configuration text. Empty text yields the defaults.
    pub fn from_yaml(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Loads `explicit` if given, otherwise `flatpack.yaml` in `root` when
    /// present, otherwise the defaults.
    pub fn load_or_default(explicit: Option<&Path>, root: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let fallback = root.join(DEFAULT_CONFIG_FILE);
        if fallback.is_file() {
            log::info!("using config {}", fallback.display());
            Self::load(&fallback)
        } else {
            log::info!("no {} found, using defaults", DEFAULT_CONFIG_FILE);
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flatpack_tokens::RelativeUnit;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::from_yaml("").unwrap();
        assert_eq!(config, Config::default());
        let root = Path::new("/project");
        assert_eq!(
            config.dest.colors_file(root),
            PathBuf::from("/project/scss/vars.colors.scss")
        );
        assert_eq!(
            config.dest.type_file(root),
            PathBuf::from("/project/scss/vars.type.scss")
        );
        assert_eq!(config.dest.icons_dir(root), PathBuf::from("/project/icons"));
        assert!(!config.fractal.enable);
        assert_eq!(config.fractal.colors.context, "colors");
    }

    #[test]
    fn test_full_config() {
        let config = Config::from_yaml(
            r#"
urls:
  json: https://dsm.test/styles.json
  icons: https://dsm.test/icons.zip
dest:
  colorVars: { name: _colors.scss, path: src/settings }
  typeVars: { name: _type, path: src/tools }
  icons: assets/icons
opts:
  colorPrefix: c-
  typePrefix: t-
  indent: 4
  replacePx: { enable: true, val: em, remUseTenth: false, emBase: 10 }
  defaultFontWeight: 300
fractal:
  enable: true
  colors: { file: fractal.json, context: tokens.colors }
"#,
        )
        .unwrap();

        let root = Path::new("/p");
        assert_eq!(config.urls.json.as_deref(), Some("https://dsm.test/styles.json"));
        assert_eq!(
            config.dest.colors_file(root),
            PathBuf::from("/p/src/settings/_colors.scss")
        );
        assert_eq!(
            config.dest.type_file(root),
            PathBuf::from("/p/src/tools/_type.scss")
        );
        assert_eq!(config.dest.icons_dir(root), PathBuf::from("/p/assets/icons"));
        assert_eq!(config.opts.color_prefix, "c-");
        assert_eq!(config.opts.indent, 4);
        assert_eq!(config.opts.replace_px.val, RelativeUnit::Em);
        assert_eq!(config.opts.replace_px.em_base, "10");
        assert_eq!(config.opts.default_font_weight, "300");
        assert!(config.fractal.enable);
        assert_eq!(config.fractal.colors.context, "tokens.colors");
    }

    #[test]
    fn test_partial_sections_keep_defaults() {
        let config = Config::from_yaml(
            r#"
dest:
  colorVars: { path: styles }
opts:
  typePrefix: text-
"#,
        )
        .unwrap();
        let root = Path::new("/p");
        assert_eq!(
            config.dest.colors_file(root),
            PathBuf::from("/p/styles/vars.colors.scss")
        );
        assert_eq!(config.opts.type_prefix, "text-");
        assert_eq!(config.opts.color_prefix, "color-");
        assert_eq!(config.opts.indent, 2);
        assert_eq!(
            config.fractal.colors.file,
            PathBuf::from("components/colors/colors.config.json")
        );
    }

    #[test]
    fn test_with_scss_extension() {
        assert_eq!(with_scss_extension("vars"), "vars.scss");
        assert_eq!(with_scss_extension("vars.scss"), "vars.scss");
        assert_eq!(with_scss_extension("vars.SCSS"), "vars.SCSS");
        assert_eq!(with_scss_extension("vars.colors"), "vars.colors.scss");
    }

    #[test]
    fn test_load_or_default() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_or_default(None, dir.path()).unwrap();
        assert_eq!(config, Config::default());

        fs::write(
            dir.path().join(DEFAULT_CONFIG_FILE),
            "urls:\n  json: https://dsm.test/a.json\n",
        )
        .unwrap();
        let config = Config::load_or_default(None, dir.path()).unwrap();
        assert_eq!(config.urls.json.as_deref(), Some("https://dsm.test/a.json"));

        let missing = dir.path().join("nope.yaml");
        assert!(Config::load_or_default(Some(&missing), dir.path()).is_err());
    }

    #[test]
    fn test_invalid_yaml_reports_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.yaml");
        fs::write(&path, "opts:\n  indent: lots\n").unwrap();
        let err = Config::load(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("bad.yaml"));
    }
}
