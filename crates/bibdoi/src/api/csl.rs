//! The subset of CSL-JSON read from the metadata service.
//!
//! The service is loose about types: `volume` may be a number, `container-title` a list and date
//! parts strings, so every scalar goes through [`Text`] before it is trusted.

use serde::Deserialize;

use crate::{
    metadata::{Author, Date, Metadata},
    Error, ErrorKind,
};

pub(crate) fn parse(json: &str) -> Result<Metadata, Error> {
    serde_json::from_str::<CslItem>(json)
        .map_err(|e| Error::wrap(ErrorKind::Deserialize, e))
        .and_then(Metadata::try_from)
}

#[derive(Deserialize)]
#[cfg_attr(test, derive(Debug))]
pub(crate) struct CslItem {
    #[serde(rename = "type", default)]
    kind: String,
    title: Option<Text>,
    author: Option<Vec<Name>>,
    #[serde(rename = "container-title")]
    container_title: Option<Text>,
    issue: Option<Text>,
    volume: Option<Text>,
    page: Option<Text>,
    publisher: Option<Text>,
    #[serde(rename = "URL")]
    url: Option<Text>,
    #[serde(rename = "DOI")]
    doi: Option<Text>,
    issued: Option<DateVariable>,
    created: Option<DateVariable>,
}

#[derive(Deserialize)]
#[cfg_attr(test, derive(Debug))]
struct Name {
    family: Option<String>,
    given: Option<String>,
    /// Institutional authors only carry a literal name.
    literal: Option<String>,
}

#[derive(Deserialize)]
#[cfg_attr(test, derive(Debug))]
struct DateVariable {
    #[serde(rename = "date-parts", default)]
    date_parts: Vec<Vec<Option<Text>>>,
}

#[derive(Deserialize)]
#[cfg_attr(test, derive(Debug))]
#[serde(untagged)]
enum Text {
    Plain(String),
    Number(i64),
    List(Vec<String>),
}

impl Text {
    fn into_string(self) -> Option<String> {
        let s = match self {
            Self::Plain(s) => s,
            Self::Number(n) => n.to_string(),
            Self::List(list) => list.into_iter().next()?,
        };
        let s = s.trim();

        if s.is_empty() {
            None
        } else {
            Some(s.to_owned())
        }
    }
}

impl DateVariable {
    /// `date-parts` is a list of dates (a range has two), only the first is used.
    fn into_date(self) -> Option<Date> {
        let mut parts = self
            .date_parts
            .into_iter()
            .next()?
            .into_iter()
            .map(|part| part.and_then(Text::into_string));

        let year = parts.next().flatten()?.parse().ok()?;
        let month = parts.next().flatten().and_then(|s| s.parse().ok());
        let day = month
            .and(parts.next().flatten())
            .and_then(|s| s.parse().ok());

        Some(Date { year, month, day })
    }
}

fn into_author(name: Name) -> Option<Author> {
    let Name {
        family,
        given,
        literal,
    } = name;

    let family = family
        .or(literal)
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())?;
    let given = given
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty());

    Some(Author { family, given })
}

impl TryFrom<CslItem> for Metadata {
    type Error = Error;

    fn try_from(item: CslItem) -> Result<Self, Error> {
        // Deconstruct item to take ownership of fields (avoids cloning).
        let CslItem {
            kind,
            title,
            author,
            container_title,
            issue,
            volume,
            page,
            publisher,
            url,
            doi,
            issued,
            created,
        } = item;

        let authors = author
            .unwrap_or_default()
            .into_iter()
            .filter_map(into_author)
            .collect::<Vec<_>>();

        if authors.is_empty() {
            return Err(Error::new(
                ErrorKind::NoValue,
                "No authors found in the metadata response",
            ));
        }

        Ok(Self {
            kind,
            title: title.and_then(Text::into_string),
            authors,
            container_title: container_title.and_then(Text::into_string),
            issue: issue.and_then(Text::into_string),
            volume: volume.and_then(Text::into_string),
            page: page.and_then(Text::into_string),
            publisher: publisher.and_then(Text::into_string),
            url: url.and_then(Text::into_string),
            doi: doi.and_then(Text::into_string),
            issued: issued.and_then(DateVariable::into_date),
            created: created.and_then(DateVariable::into_date),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARTICLE_JSON: &str = include_str!("../../../../tests/data/csl_article.json");
    const PROCEEDINGS_JSON: &str = include_str!("../../../../tests/data/csl_proceedings.json");

    #[test]
    fn article_json_can_be_parsed_to_metadata() {
        let metadata = parse(ARTICLE_JSON).unwrap();

        assert_eq!("journal-article", metadata.kind);
        assert_eq!(
            Some("Über die Quantenmechanik der Elektronen in Kristallgittern"),
            metadata.title.as_deref()
        );
        assert_eq!(2, metadata.authors.len());
        assert_eq!("Müller", metadata.authors[0].family);
        assert_eq!(Some("Anna"), metadata.authors[0].given.as_deref());
        assert_eq!(Some("Zeitschrift für Physik"), metadata.container_title.as_deref());
        assert_eq!(Some("52"), metadata.volume.as_deref());
        assert_eq!(Some("555-600"), metadata.page.as_deref());
        assert_eq!(Some("10.1007/BF01339455"), metadata.doi.as_deref());
        assert_eq!(
            Some(Date {
                year: 2020,
                month: Some(7),
                day: Some(14)
            }),
            metadata.issued
        );
    }

    #[test]
    fn proceedings_json_has_literal_author_and_no_issued_date() {
        let metadata = parse(PROCEEDINGS_JSON).unwrap();

        assert_eq!("proceedings-article", metadata.kind);
        assert_eq!("The ATLAS Collaboration", metadata.authors[1].family);
        assert_eq!(None, metadata.authors[1].given);
        assert_eq!(None, metadata.issued);
        assert_eq!(Some(2019), metadata.created.map(|d| d.year));
        assert_eq!(None, metadata.page);
    }

    #[test]
    fn missing_authors_is_a_no_value_error() {
        let err = parse(r#"{"type": "dataset", "title": "Numbers"}"#).unwrap_err();
        assert_eq!(ErrorKind::NoValue, err.kind());

        let err = parse(r#"{"type": "dataset", "author": [{"given": "Ann"}]}"#).unwrap_err();
        assert_eq!(ErrorKind::NoValue, err.kind());
    }

    #[test]
    fn invalid_json_is_a_deserialize_error() {
        let err = parse("<html>Not Found</html>").unwrap_err();
        assert_eq!(ErrorKind::Deserialize, err.kind());
    }

    #[test]
    fn loose_scalars_are_accepted() {
        let json = r#"{
            "type": "article",
            "author": [{"family": "Doe", "given": "  "}],
            "container-title": ["Journal of Tests", "J. Tests"],
            "volume": 12,
            "issue": "",
            "issued": {"date-parts": [["2001", "3"]]}
        }"#;
        let metadata = parse(json).unwrap();

        assert_eq!(None, metadata.authors[0].given);
        assert_eq!(Some("Journal of Tests"), metadata.container_title.as_deref());
        assert_eq!(Some("12"), metadata.volume.as_deref());
        assert_eq!(None, metadata.issue);
        assert_eq!(
            Some(Date {
                year: 2001,
                month: Some(3),
                day: None
            }),
            metadata.issued
        );
    }

    #[test]
    fn date_without_a_year_is_absent() {
        let json = r#"{
            "author": [{"family": "Doe"}],
            "issued": {"date-parts": [[null]]},
            "created": {"date-parts": [[2015, 1, 2]]}
        }"#;
        let metadata = parse(json).unwrap();

        assert_eq!(None, metadata.issued);
        assert_eq!(2015, metadata.citation_date().year);
    }
}
