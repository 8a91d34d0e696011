//! Full runs against an in-memory fetcher and a temporary project root.

use std::fs;
use std::io::{Cursor, Write};

use flatpack::pipeline::{self, RunOptions};
use flatpack::{Branch, Config, Event};
use flatpack_fetch::MockFetcher;
use flatpack_tokens::{MergeOutcome, Notice};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const JSON_URL: &str = "https://dsm.test/styles.json";
const ICONS_URL: &str = "https://dsm.test/icons.zip";

const DOCUMENT: &str = r##"{
    "colors": {"primary": "#FF0000"},
    "fontStyles": {"heading": {"fontSize": "24px", "textColor": "#FF0000"}}
}"##;

fn config() -> Config {
    let mut config = Config::default();
    config.urls.json = Some(JSON_URL.to_string());
    config.urls.icons = Some(ICONS_URL.to_string());
    config
}

fn icons_zip() -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let opts = SimpleFileOptions::default();
    for (name, body) in [
        ("dsm/arrow.svg", "<svg/>"),
        ("dsm/close.svg", "<svg/>"),
        ("dsm/notes.txt", "not an icon"),
    ] {
        writer.start_file(name, opts).unwrap();
        writer.write_all(body.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

#[test]
fn end_to_end_writes_variables_mixins_and_icons() {
    let dir = TempDir::new().unwrap();
    let fetcher = MockFetcher::new()
        .with_body(JSON_URL, DOCUMENT)
        .with_body(ICONS_URL, icons_zip());

    let report = pipeline::run(&config(), &RunOptions::new(dir.path()), &fetcher);

    assert!(!report.has_failures(), "{:?}", report.events());
    assert_eq!(report.outcome(Branch::Colors), Some(MergeOutcome::Created));
    assert_eq!(report.outcome(Branch::Styles), Some(MergeOutcome::Created));

    let colors = fs::read_to_string(dir.path().join("scss/vars.colors.scss")).unwrap();
    assert!(colors.contains("$color-primary: #FF0000;"));

    let styles = fs::read_to_string(dir.path().join("scss/vars.type.scss")).unwrap();
    assert!(styles.contains("@mixin type-heading {"));
    assert!(styles.contains("font-size: 24px;"));
    assert!(styles.contains("color: $color-primary;"));

    let icons = dir.path().join("icons");
    assert!(icons.join("arrow.svg").is_file());
    assert!(icons.join("close.svg").is_file());
    assert!(!icons.join("notes.txt").exists());
    assert!(report.events().contains(&Event::IconsExtracted {
        dest: icons,
        count: 2
    }));
}

#[test]
fn second_run_leaves_user_content_alone() {
    let dir = TempDir::new().unwrap();
    let fetcher = MockFetcher::new().with_body(JSON_URL, DOCUMENT);
    let options = RunOptions {
        skip_icons: true,
        ..RunOptions::new(dir.path())
    };

    pipeline::run(&config(), &options, &fetcher);
    let colors_path = dir.path().join("scss/vars.colors.scss");
    let generated = fs::read_to_string(&colors_path).unwrap();
    let edited = format!("@use 'base';\n\n{}\n\n$local: 4px;\n", generated);
    fs::write(&colors_path, &edited).unwrap();

    let report = pipeline::run(&config(), &options, &fetcher);
    assert_eq!(report.outcome(Branch::Colors), Some(MergeOutcome::Updated));
    assert_eq!(fs::read_to_string(&colors_path).unwrap(), edited);
}

#[test]
fn icons_failure_does_not_stop_styles() {
    let dir = TempDir::new().unwrap();
    let fetcher = MockFetcher::new()
        .with_body(JSON_URL, DOCUMENT)
        .with_status(ICONS_URL, 503);

    let report = pipeline::run(&config(), &RunOptions::new(dir.path()), &fetcher);

    assert!(report.has_failures());
    assert!(report.failure(Branch::Icons).unwrap().contains("503"));
    assert_eq!(report.outcome(Branch::Styles), Some(MergeOutcome::Created));
    assert!(dir.path().join("scss/vars.type.scss").is_file());
}

#[test]
fn json_failure_does_not_stop_icons() {
    let dir = TempDir::new().unwrap();
    let fetcher = MockFetcher::new()
        .with_body(JSON_URL, "{not json")
        .with_body(ICONS_URL, icons_zip());

    let report = pipeline::run(&config(), &RunOptions::new(dir.path()), &fetcher);

    assert!(report.failure(Branch::Json).is_some());
    assert!(dir.path().join("icons/arrow.svg").is_file());
    assert!(!dir.path().join("scss").exists());
}

#[test]
fn missing_url_fails_only_its_branch() {
    let dir = TempDir::new().unwrap();
    let mut config = config();
    config.urls.icons = None;
    let fetcher = MockFetcher::new().with_body(JSON_URL, DOCUMENT);

    let report = pipeline::run(&config, &RunOptions::new(dir.path()), &fetcher);

    assert!(report.failure(Branch::Icons).unwrap().contains("urls.icons"));
    assert_eq!(report.outcome(Branch::Colors), Some(MergeOutcome::Created));
    assert_eq!(fetcher.requested(), vec![JSON_URL.to_string()]);
}

#[test]
fn file_without_markers_is_left_untouched() {
    let dir = TempDir::new().unwrap();
    let type_path = dir.path().join("scss/vars.type.scss");
    fs::create_dir_all(type_path.parent().unwrap()).unwrap();
    fs::write(&type_path, "// hand written\n").unwrap();
    let fetcher = MockFetcher::new().with_body(JSON_URL, DOCUMENT);
    let options = RunOptions {
        skip_icons: true,
        ..RunOptions::new(dir.path())
    };

    let report = pipeline::run(&config(), &options, &fetcher);

    assert_eq!(
        report.outcome(Branch::Styles),
        Some(MergeOutcome::SkippedNoMarkers)
    );
    assert!(!report.has_failures());
    assert_eq!(fs::read_to_string(&type_path).unwrap(), "// hand written\n");
}

#[test]
fn colors_only_document_reports_missing_styles() {
    let dir = TempDir::new().unwrap();
    let fetcher =
        MockFetcher::new().with_body(JSON_URL, r##"{"colors": {"ink": "#222222"}}"##);
    let options = RunOptions {
        skip_icons: true,
        ..RunOptions::new(dir.path())
    };

    let report = pipeline::run(&config(), &options, &fetcher);

    assert!(report
        .events()
        .contains(&Event::Notice(Notice::NoStyleData)));
    assert_eq!(report.outcome(Branch::Colors), Some(MergeOutcome::Created));
    assert_eq!(report.outcome(Branch::Styles), None);
    assert!(!dir.path().join("scss/vars.type.scss").exists());
}

#[test]
fn fractal_export_follows_color_block() {
    let dir = TempDir::new().unwrap();
    let fractal_path = dir.path().join("components/colors/colors.config.json");
    fs::create_dir_all(fractal_path.parent().unwrap()).unwrap();
    fs::write(&fractal_path, r#"{"title": "Colors"}"#).unwrap();

    let mut config = config();
    config.fractal.enable = true;
    let fetcher = MockFetcher::new().with_body(JSON_URL, DOCUMENT);
    let options = RunOptions {
        skip_icons: true,
        ..RunOptions::new(dir.path())
    };

    let report = pipeline::run(&config, &options, &fetcher);

    assert!(!report.has_failures(), "{:?}", report.events());
    let exported: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&fractal_path).unwrap()).unwrap();
    assert_eq!(exported["title"], "Colors");
    assert_eq!(exported["context"]["colors"]["#FF0000"], "$color-primary");
}

#[test]
fn fractal_failure_is_reported_without_blocking_styles() {
    let dir = TempDir::new().unwrap();
    let mut config = config();
    config.fractal.enable = true;
    let fetcher = MockFetcher::new().with_body(JSON_URL, DOCUMENT);
    let options = RunOptions {
        skip_icons: true,
        ..RunOptions::new(dir.path())
    };

    let report = pipeline::run(&config, &options, &fetcher);

    assert!(report.failure(Branch::Fractal).is_some());
    assert_eq!(report.outcome(Branch::Styles), Some(MergeOutcome::Created));
}

#[test]
fn config_file_drives_destinations() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("flatpack.yaml"),
        format!(
            "urls:\n  json: {}\ndest:\n  colorVars: {{ name: _colors, path: src/settings }}\n",
            JSON_URL
        ),
    )
    .unwrap();
    let config = Config::load_or_default(None, dir.path()).unwrap();
    let fetcher = MockFetcher::new().with_body(JSON_URL, DOCUMENT);
    let options = RunOptions {
        skip_icons: true,
        ..RunOptions::new(dir.path())
    };

    pipeline::run(&config, &options, &fetcher);

    assert!(dir.path().join("src/settings/_colors.scss").is_file());
    assert!(dir.path().join("scss/vars.type.scss").is_file());
}
