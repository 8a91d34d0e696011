//! # flatpack
//!
//! Keeps an SCSS style library in sync with a DSM design system export.
//!
//! A run has two independent branches:
//!
//! - **JSON**: fetch the style document, write color variables and type
//!   mixins between the `/// START DSM VARIABLES` and
//!   `/// END DSM VARIABLES` sentinels of the target files, and optionally
//!   publish the color index to a Fractal component config.
//! - **Icons**: fetch a zip archive and extract its SVG files.
//!
//! The token logic lives in `flatpack-tokens`; networking and archives in
//! `flatpack-fetch`. This crate wires them to a config file and a CLI.
//!
//! ```no_run
//! use flatpack::{pipeline, Config, RunOptions};
//! use flatpack_fetch::HttpFetcher;
//!
//! let config = Config::load("flatpack.yaml".as_ref())?;
//! let report = pipeline::run(&config, &RunOptions::new("."), &HttpFetcher::new()?);
//! report.print(".".as_ref());
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod cli;
pub mod config;
pub mod fractal;
pub mod pipeline;
pub mod report;

pub use config::{Config, Destinations, FractalColors, FractalConfig, Urls, VarsFile};
pub use pipeline::{process_document, RunOptions};
pub use report::{Branch, Event, RunReport};
