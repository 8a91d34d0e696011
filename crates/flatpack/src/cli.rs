//! Command-line surface.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use flatpack_fetch::HttpFetcher;

use crate::config::Config;
use crate::pipeline::{self, RunOptions};
use crate::report::RunReport;

#[derive(Debug, Parser)]
#[command(
    name = "flatpack",
    version,
    about = "Sync SCSS variables, type mixins and icons from a DSM export"
)]
pub struct Cli {
    /// Config file [default: <root>/flatpack.yaml when present]
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Project root that destinations are relative to [default: current dir]
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Override urls.json
    #[arg(long, value_name = "URL")]
    pub json_url: Option<String>,

    /// Override urls.icons
    #[arg(long, value_name = "URL")]
    pub icons_url: Option<String>,

    /// Do not fetch the style document
    #[arg(long)]
    pub skip_json: bool,

    /// Do not fetch the icon archive
    #[arg(long)]
    pub skip_icons: bool,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Command-line URLs take precedence over the config file.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(url) = &self.json_url {
            config.urls.json = Some(url.clone());
        }
        if let Some(url) = &self.icons_url {
            config.urls.icons = Some(url.clone());
        }
    }

    pub fn root_dir(&self) -> Result<PathBuf> {
        match &self.root {
            Some(root) => Ok(root.clone()),
            None => env::current_dir().context("cannot determine the current directory"),
        }
    }

    pub fn run_options(&self, root: PathBuf) -> RunOptions {
        RunOptions {
            root,
            skip_json: self.skip_json,
            skip_icons: self.skip_icons,
        }
    }
}

/// Sets up `log` output on stderr. `RUST_LOG` wins over `-v`.
pub fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .try_init();
}

/// Loads the config, runs the sync against the network and prints the report.
pub fn run(args: &Cli) -> Result<RunReport> {
    let root = args.root_dir()?;
    let mut config = Config::load_or_default(args.config.as_deref(), &root)?;
    args.apply_overrides(&mut config);

    let fetcher = HttpFetcher::new()?;
    let report = pipeline::run(&config, &args.run_options(root.clone()), &fetcher);
    report.print(&root);
    Ok(report)
}
