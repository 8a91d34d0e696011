//! Collaborators around the token pipeline: getting bytes from the design
//! tool and turning an icon archive into a directory of SVG files.
//!
//! Fetching goes through the [`Fetcher`] trait so callers can swap the real
//! [`HttpFetcher`] for a [`MockFetcher`] in tests.

pub mod archive;
pub mod fetch;

pub use archive::{extract_svgs, ArchiveError};
pub use fetch::{FetchError, Fetcher, HttpFetcher, MockFetcher};
