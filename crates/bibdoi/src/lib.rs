#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::perf,
    clippy::style,
    clippy::missing_safety_doc,
    clippy::missing_const_for_fn
)]
#![warn(missing_docs, rust_2018_idioms)]
#![allow(clippy::module_name_repetitions)]

//! # bibdoi
//!
//! bibdoi is a library which finds DOI names in free-form text, resolves them one at a time
//! against a metadata service such as `https://doi.org/` and composes a BibTeX/biblatex record for
//! each of them.
//!
//! ```no_run
//! let records = bibdoi::resolve("https://doi.org/10.1103/PhysRevLett.116.061102").unwrap();
//!
//! for record in &records {
//!     println!("{record}");
//! }
//! println!("{}", bibdoi::export_text(&records));
//! ```
//!
//! A resolution run is driven by a [`Controller`] which can be built from a [`Config`], or from a
//! [`api::MetadataClient`] with any [`api::Client`] transport.

pub mod api;
pub mod config;
pub mod controller;
pub mod doi;
mod error;
pub mod format;
pub mod metadata;
pub mod record;

pub use api::Style;
pub use config::Config;
pub use controller::Controller;
pub use doi::{extract, Doi};
pub use error::{Error, ErrorKind};
pub use record::{export_text, ResolvedRecord};

use log::trace;

/// Resolve every DOI name found in `text` with the default [`Config`].
///
/// Records are returned in the order the DOI names were found. A DOI name that cannot be resolved
/// produces a failed record instead of an error.
///
/// # Errors
///
/// An `Err` is returned when the HTTP client cannot be built.
pub fn resolve(text: &str) -> Result<Vec<ResolvedRecord>, Error> {
    trace!("Resolve DOI names of {} lines", text.lines().count());
    let mut controller = Config::default().controller()?;
    controller.resolve(text, |_| {});
    Ok(controller.take_records())
}
