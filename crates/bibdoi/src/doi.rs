//! DOI names and their extraction from free-form text.
//!
//! Every DOI starts with the `10.` directory indicator followed by a registrant code made of
//! digits and dots. A `/` separates this prefix from a suffix which may contain almost anything;
//! whitespace and `}` end a DOI here so that names can be picked out of prose and existing BibTeX.
//!
//! Two patterns are searched on every line:
//!
//! - a resolver URL, where everything following `doi.org/` is taken (percent-encoding is decoded)
//! - a bare name, `10.` + digits/dots + `/` + suffix
//!
//! Matches are lowercased, and only the first occurrence of each name is kept.

use std::{collections::HashSet, fmt, str::FromStr};

use lazy_static::lazy_static;
use log::trace;
use regex::Regex;

use crate::{Error, ErrorKind};

lazy_static! {
    static ref URL_REGEX: Regex = Regex::new(r"(?i)doi\.org/([^\s}]+)").unwrap();
    static ref DOI_REGEX: Regex = Regex::new(r"(?i)(10\.[.\d]+/[^\s}]+)").unwrap();
    static ref GRAMMAR: Regex = Regex::new(r"^10\.[.\d]+/[^\s}]+$").unwrap();
}

/// A normalized (lowercase) DOI name such as `10.1000/xyz123`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Doi(String);

impl Doi {
    /// The DOI name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the [`Doi`] returning the inner [`String`].
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Doi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Doi {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Doi {
    type Err = Error;

    /// Parses the first DOI name found in `s`, either bare or as a `doi.org` URL.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        extract(s)
            .into_iter()
            .next()
            .ok_or_else(|| Error::new(ErrorKind::NoValue, format!("No DOI name found in '{s}'")))
    }
}

/// Extract the unique DOI names found in `text` in the order they first appear.
///
/// Lines that do not contain a DOI name contribute nothing, they are never taken literally.
///
/// # Examples
///
/// ```
/// let dois = bibdoi::extract("10.1000/XYZ123\nhttps://doi.org/10.1000/xyz123\nnot a doi");
///
/// assert_eq!(1, dois.len());
/// assert_eq!("10.1000/xyz123", dois[0].as_str());
/// ```
#[must_use]
pub fn extract(text: &str) -> Vec<Doi> {
    let mut seen = HashSet::new();
    let mut dois = Vec::new();

    for line in text.lines() {
        for name in line_matches(line) {
            if seen.insert(name.clone()) {
                dois.push(Doi(name));
            }
        }
    }

    trace!("Extracted {} unique DOI names", dois.len());
    dois
}

fn line_matches(line: &str) -> impl Iterator<Item = String> + '_ {
    let url_spans = URL_REGEX
        .captures_iter(line)
        .filter_map(|cap| cap.get(1))
        .map(|m| (m.range(), decode_url_suffix(m.as_str())))
        .collect::<Vec<_>>();

    // Bare matches inside a decoded URL capture are the same name, still percent-encoded.
    let bare = DOI_REGEX
        .captures_iter(line)
        .filter_map(|cap| cap.get(1))
        .filter(|m| {
            !url_spans.iter().any(|(span, name)| {
                name.is_some() && m.start() < span.end && span.start < m.end()
            })
        })
        .map(|m| m.as_str().to_lowercase())
        .collect::<Vec<_>>();

    url_spans
        .into_iter()
        .filter_map(|(_, name)| name)
        .chain(bare)
}

// A URL suffix is only a DOI name once decoded and matching the bare grammar, e.g.
// `doi.org/10.1000%2Fxyz` but not `doi.org/api/handles`.
fn decode_url_suffix(suffix: &str) -> Option<String> {
    let decoded = urlencoding::decode(suffix).ok()?.to_lowercase();
    GRAMMAR.is_match(&decoded).then_some(decoded)
}
