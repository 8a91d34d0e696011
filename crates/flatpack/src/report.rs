//! What a run did, and how it is shown to the user.

use std::fmt;
use std::path::{Path, PathBuf};

use console::style;
use flatpack_tokens::{MergeOutcome, Notice, REGION_END, REGION_START};

/// A part of the run that can succeed or fail on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Branch {
    Json,
    Colors,
    Styles,
    Fractal,
    Icons,
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Branch::Json => "json",
            Branch::Colors => "colors",
            Branch::Styles => "styles",
            Branch::Fractal => "fractal",
            Branch::Icons => "icons",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A generated region was merged into (or created as) `path`.
    Written {
        branch: Branch,
        path: PathBuf,
        outcome: MergeOutcome,
    },
    /// The document lacked a section.
    Notice(Notice),
    FractalUpdated {
        path: PathBuf,
        context: String,
    },
    IconsExtracted {
        dest: PathBuf,
        count: usize,
    },
    Failed {
        branch: Branch,
        message: String,
    },
}

impl Event {
    pub fn failed(branch: Branch, message: impl fmt::Display) -> Self {
        Event::Failed {
            branch,
            message: message.to_string(),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Event::Failed { .. })
    }
}

/// Ordered record of a run: JSON branch events first, then icons.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    events: Vec<Event>,
}

impl RunReport {
    pub fn new(events: Vec<Event>) -> Self {
        Self { events }
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn has_failures(&self) -> bool {
        self.events.iter().any(Event::is_failure)
    }

    /// Merge outcome recorded for `branch`, if it wrote anything.
    pub fn outcome(&self, branch: Branch) -> Option<MergeOutcome> {
        self.events.iter().find_map(|event| match event {
            Event::Written {
                branch: b, outcome, ..
            } if *b == branch => Some(*outcome),
            _ => None,
        })
    }

    pub fn failure(&self, branch: Branch) -> Option<&str> {
        self.events.iter().find_map(|event| match event {
            Event::Failed { branch: b, message } if *b == branch => Some(message.as_str()),
            _ => None,
        })
    }

    /// Writes the report to stderr, paths shown relative to `root`.
    pub fn print(&self, root: &Path) {
        for event in &self.events {
            for line in render_event(event, root) {
                eprintln!("{}", line);
            }
        }
    }
}

fn render_event(event: &Event, root: &Path) -> Vec<String> {
    match event {
        Event::Written { path, outcome, .. } => {
            let shown = style(display_path(path, root)).cyan();
            match outcome {
                MergeOutcome::Created => vec![format!("{} {}", style("✓ Created").green(), shown)],
                MergeOutcome::Updated => vec![format!(
                    "{} {}",
                    style("✓ DSM variables updated in").green(),
                    shown
                )],
                MergeOutcome::SkippedNoMarkers => vec![
                    format!(
                        "{} {}{}",
                        style("Can not find variable matches in").red(),
                        shown,
                        style(". Please add or wrap DSM variables as:").red()
                    ),
                    format!("  {}", style(REGION_START).cyan()),
                    format!("  {}", style("$var: val;").cyan()),
                    format!("  {}", style("$etc: etc;").cyan()),
                    format!("  {}", style(REGION_END).cyan()),
                ],
            }
        }
        Event::Notice(notice) => vec![style(notice).red().to_string()],
        Event::FractalUpdated { path, context } => vec![format!(
            "{} {} {}",
            style(format!("✓ DSM data updated in Fractal `context.{}`", context)).green(),
            style("->").dim(),
            style(display_path(path, root)).cyan()
        )],
        Event::IconsExtracted { dest, count } => vec![format!(
            "{} {} ({} files)",
            style("✓ DSM Icons added to").green(),
            style(display_path(dest, root)).cyan(),
            count
        )],
        Event::Failed { branch, message } => vec![format!(
            "{} {}",
            style(format!("FLATPACK ERROR ({}):", branch)).red().bold(),
            message
        )],
    }
}

fn display_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}
