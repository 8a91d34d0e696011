//! The sync run.
//!
//! Two independent branches run side by side: the JSON branch (fetch the
//! style document, write color variables, export to Fractal, write type
//! mixins) and the icons branch (fetch the archive, extract its SVGs).
//! Neither branch can stop the other; each failure becomes an
//! [`Event::Failed`] in the report.

use std::path::{Path, PathBuf};
use std::thread::{self, ScopedJoinHandle};

use anyhow::{Context, Result};
use flatpack_fetch::{extract_svgs, Fetcher};
use flatpack_tokens::{
    emit_color_block, emit_style_block, write_region, ColorIndex, StyleContext, StyleDocument,
};

use crate::config::Config;
use crate::fractal;
use crate::report::{Branch, Event, RunReport};

/// Per-invocation switches that are not part of the config file.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Base directory for every relative destination.
    pub root: PathBuf,
    pub skip_json: bool,
    pub skip_icons: bool,
}

impl RunOptions {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }
}

/// Runs both branches and collects what happened.
pub fn run(config: &Config, options: &RunOptions, fetcher: &dyn Fetcher) -> RunReport {
    let root = options.root.as_path();
    let events = thread::scope(|scope| {
        let json = (!options.skip_json)
            .then(|| scope.spawn(move || json_branch(config, root, fetcher)));
        let icons = (!options.skip_icons)
            .then(|| scope.spawn(move || icons_branch(config, root, fetcher)));

        let mut events = join(json, Branch::Json);
        events.extend(join(icons, Branch::Icons));
        events
    });
    RunReport::new(events)
}

fn join(handle: Option<ScopedJoinHandle<'_, Vec<Event>>>, branch: Branch) -> Vec<Event> {
    match handle.map(ScopedJoinHandle::join) {
        None => {
            log::info!("{} branch skipped", branch);
            Vec::new()
        }
        Some(Ok(events)) => events,
        Some(Err(_)) => vec![Event::failed(branch, "branch panicked")],
    }
}

fn json_branch(config: &Config, root: &Path, fetcher: &dyn Fetcher) -> Vec<Event> {
    let Some(url) = configured(config.urls.json.as_deref()) else {
        return vec![Event::failed(
            Branch::Json,
            "no DSM JSON url configured (urls.json)",
        )];
    };
    match fetch_text(fetcher, url) {
        Ok(text) => process_document(&text, config, root),
        Err(err) => vec![Event::failed(Branch::Json, format!("{:#}", err))],
    }
}

/// A blank URL counts as not configured.
fn configured(url: Option<&str>) -> Option<&str> {
    url.filter(|url| !url.trim().is_empty())
}

fn fetch_text(fetcher: &dyn Fetcher, url: &str) -> Result<String> {
    let bytes = fetcher.fetch(url)?;
    String::from_utf8(bytes).with_context(|| format!("{} did not return UTF-8 text", url))
}

/// Turns a style document into written files.
///
/// Colors are emitted first so the mixins can refer to their variables.
/// A failure in one output does not prevent the others.
pub fn process_document(text: &str, config: &Config, root: &Path) -> Vec<Event> {
    let document = match StyleDocument::from_json(text) {
        Ok(document) => document,
        Err(err) => return vec![Event::failed(Branch::Json, err)],
    };
    let adapted = document.adapt();
    let mut events: Vec<Event> = adapted.notices().into_iter().map(Event::Notice).collect();

    let opts = &config.opts;
    let mut index = ColorIndex::new(opts.color_prefix.as_str());

    if let Some(colors) = &adapted.colors {
        let region = emit_color_block(colors, &mut index);
        events.push(write_event(
            Branch::Colors,
            config.dest.colors_file(root),
            &region,
        ));

        if config.fractal.enable {
            let path = root.join(&config.fractal.colors.file);
            let context = &config.fractal.colors.context;
            events.push(match fractal::export_color_index(&path, context, &index) {
                Ok(()) => Event::FractalUpdated {
                    path,
                    context: context.clone(),
                },
                Err(err) => Event::failed(Branch::Fractal, format!("{:#}", err)),
            });
        }
    }

    if let Some(styles) = &adapted.styles {
        let ctx = StyleContext::new(opts, &index);
        events.push(match emit_style_block(styles, &ctx) {
            Ok(region) => write_event(Branch::Styles, config.dest.type_file(root), &region),
            Err(err) => Event::failed(Branch::Styles, err),
        });
    }

    events
}

fn write_event(branch: Branch, path: PathBuf, region: &str) -> Event {
    match write_region(&path, region) {
        Ok(outcome) => {
            log::info!("{}: {} {}", branch, outcome, path.display());
            Event::Written {
                branch,
                path,
                outcome,
            }
        }
        Err(err) => Event::failed(branch, err),
    }
}

fn icons_branch(config: &Config, root: &Path, fetcher: &dyn Fetcher) -> Vec<Event> {
    let Some(url) = configured(config.urls.icons.as_deref()) else {
        return vec![Event::failed(
            Branch::Icons,
            "no DSM icons url configured (urls.icons)",
        )];
    };
    let dest = config.dest.icons_dir(root);
    let extracted = fetcher
        .fetch(url)
        .map_err(anyhow::Error::from)
        .and_then(|bytes| {
            extract_svgs(&bytes, &dest)
                .with_context(|| format!("cannot extract icons into {}", dest.display()))
        });
    match extracted {
        Ok(count) => vec![Event::IconsExtracted { dest, count }],
        Err(err) => vec![Event::failed(Branch::Icons, format!("{:#}", err))],
    }
}
