//! Resolved records and the bibliography database exported from them.

use std::fmt;

use crate::{api::Lookup, doi::Doi};

/// Suggested file name of an exported database.
pub const EXPORT_FILE_NAME: &str = "db.bib";

/// The outcome of resolving one DOI name, in the order it was resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedRecord {
    doi: Doi,
    bib: Option<String>,
}

impl ResolvedRecord {
    /// A successfully resolved record.
    #[must_use]
    pub const fn resolved(doi: Doi, bib: String) -> Self {
        Self {
            doi,
            bib: Some(bib),
        }
    }

    /// A record for a DOI name that could not be resolved.
    #[must_use]
    pub const fn failed(doi: Doi) -> Self {
        Self { doi, bib: None }
    }

    /// The DOI name this record was resolved for.
    #[must_use]
    pub const fn doi(&self) -> &Doi {
        &self.doi
    }

    /// The formatted bib text, `None` when resolving failed.
    #[must_use]
    pub fn bib(&self) -> Option<&str> {
        self.bib.as_deref()
    }

    /// Whether the DOI name was resolved.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.bib.is_some()
    }
}

impl From<Lookup> for ResolvedRecord {
    fn from(lookup: Lookup) -> Self {
        let bib = lookup.bib();
        Self {
            doi: lookup.doi,
            bib,
        }
    }
}

/// The bib text of a resolved record, or a marker naming the DOI that failed.
impl fmt::Display for ResolvedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.bib {
            Some(bib) => f.write_str(bib),
            None => write!(f, "Could not resolve [{}]", self.doi),
        }
    }
}

/// Join the bib text of every successful record with a blank line in between.
///
/// Failed records are left out.
#[must_use]
pub fn export_text(records: &[ResolvedRecord]) -> String {
    records
        .iter()
        .filter_map(ResolvedRecord::bib)
        .collect::<Vec<_>>()
        .join("\n\n")
}
