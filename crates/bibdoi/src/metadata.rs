//! Typed bibliographic metadata of a single work.
//!
//! [`Metadata`] is produced by the metadata client from the service response (see
//! [`Metadata::from_csl_json`]) and consumed by [`crate::format::format`].

use crate::{api::csl, Error};

/// Bibliographic metadata of a single work.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Metadata {
    /// The CSL type tag, e.g. `journal-article` or `proceedings-article`.
    pub kind: String,
    /// Title of the work.
    pub title: Option<String>,
    /// Authors in the order of the byline.
    pub authors: Vec<Author>,
    /// Journal or proceedings title.
    pub container_title: Option<String>,
    /// Issue number within the volume.
    pub issue: Option<String>,
    /// Volume of the container.
    pub volume: Option<String>,
    /// Page range, e.g. `1-12`.
    pub page: Option<String>,
    /// Name of the publisher.
    pub publisher: Option<String>,
    /// Landing page of the work.
    pub url: Option<String>,
    /// DOI name as reported by the service, case preserved.
    pub doi: Option<String>,
    /// Date the work was issued.
    pub issued: Option<Date>,
    /// Date the DOI name was registered.
    pub created: Option<Date>,
}

/// A single author name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Author {
    /// Family name, or the full name of an institutional author.
    pub family: String,
    /// Given names.
    pub given: Option<String>,
}

/// A calendar date where only the year is guaranteed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Date {
    /// Calendar year.
    pub year: i32,
    /// Month, `1` to `12`.
    pub month: Option<u32>,
    /// Day of the month, only set together with `month`.
    pub day: Option<u32>,
}

impl Date {
    /// Year used for the citation date when the metadata has no usable date at all.
    pub const UNKNOWN_YEAR: i32 = 9999;

    /// A date with only the year set.
    #[must_use]
    pub const fn year(year: i32) -> Self {
        Self {
            year,
            month: None,
            day: None,
        }
    }

    /// The placeholder date carrying [`Date::UNKNOWN_YEAR`].
    #[must_use]
    pub const fn unknown() -> Self {
        Self::year(Self::UNKNOWN_YEAR)
    }
}

impl Author {
    /// An author with a family name and an optional given name.
    pub fn new<S: Into<String>>(family: S, given: Option<S>) -> Self {
        Self {
            family: family.into(),
            given: given.map(Into::into),
        }
    }
}

impl Metadata {
    /// Parses and validates a CSL-JSON document describing a single work.
    ///
    /// # Errors
    ///
    /// An [`Err`] is returned when `json` is not a valid CSL-JSON item.
    /// An [`Err`] is returned when the item has no usable author.
    pub fn from_csl_json(json: &str) -> Result<Self, Error> {
        csl::parse(json)
    }

    /// The date a work is cited by: `issued`, then `created`, then [`Date::unknown`].
    #[must_use]
    pub fn citation_date(&self) -> Date {
        self.issued
            .or(self.created)
            .unwrap_or_else(Date::unknown)
    }

    /// The first author of the byline, if any.
    #[must_use]
    pub fn first_author(&self) -> Option<&Author> {
        self.authors.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn citation_date_prefers_issued_over_created() {
        let mut metadata = Metadata {
            issued: Some(Date::year(2019)),
            created: Some(Date::year(2018)),
            ..Metadata::default()
        };
        assert_eq!(2019, metadata.citation_date().year);

        metadata.issued = None;
        assert_eq!(2018, metadata.citation_date().year);

        metadata.created = None;
        assert_eq!(Date::UNKNOWN_YEAR, metadata.citation_date().year);
    }
}
