//! Composing BibTeX/biblatex records from [`Metadata`].
//!
//! A record is an ordered list of [`BibField`]s under an entry type and a label:
//!
//! ```text
//! @article{muller2020,
//!   title = {{\"U}ber die Quantenmechanik},
//!   author = {M{\"u}ller, Anna},
//!   year = {2020}
//! }
//! ```
//!
//! Fields with empty values are never written.

use std::borrow::Cow;

pub mod bibtex;
pub mod tex;

use crate::metadata::{Author, Metadata};

use tex::{to_ascii, to_tex};

/// Fields in the order they are written; any other field follows alphabetically.
pub(crate) const FIELD_ORDER: [&str; 12] = [
    "title",
    "author",
    "year",
    "month",
    "day",
    "number",
    "volume",
    "journal",
    "pages",
    "publisher",
    "url",
    "doi",
];

const INDENT: &str = "  ";

/// A single `key = {value}` pair of a record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BibField {
    /// Field name, lowercase.
    pub key: Cow<'static, str>,
    /// Field value written between braces.
    pub value: String,
}

impl BibField {
    /// A field with the given key and value.
    pub fn new<K, V>(key: K, value: V) -> Self
    where
        K: Into<Cow<'static, str>>,
        V: Into<String>,
    {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    fn optional(key: &'static str, value: Option<&str>) -> Option<Self> {
        value.map(|value| Self::new(key, value))
    }
}

/// Compose the BibTeX record of `metadata`.
///
/// Composing is pure: the same metadata always produces the same text.
#[must_use]
pub fn format(metadata: &Metadata) -> String {
    serialize(label_type(&metadata.kind), &label_name(metadata), &fields(metadata))
}

/// The fields of the record of `metadata` in the order they are written.
#[must_use]
pub fn fields(metadata: &Metadata) -> Vec<BibField> {
    let date = metadata.citation_date();

    let mut fields = Vec::with_capacity(FIELD_ORDER.len());
    fields.extend(
        metadata
            .title
            .as_deref()
            .map(|title| BibField::new("title", to_tex(title))),
    );
    fields.push(BibField::new("author", authors(&metadata.authors)));
    fields.push(BibField::new("year", date.year.to_string()));
    fields.extend(date.month.map(|month| BibField::new("month", month.to_string())));
    fields.extend(date.day.map(|day| BibField::new("day", day.to_string())));

    fields.extend(
        [
            ("number", metadata.issue.as_deref()),
            ("volume", metadata.volume.as_deref()),
            ("journal", metadata.container_title.as_deref()),
            ("pages", metadata.page.as_deref()),
            ("publisher", metadata.publisher.as_deref()),
            ("url", metadata.url.as_deref()),
            ("doi", metadata.doi.as_deref()),
        ]
        .into_iter()
        .filter_map(|(key, value)| BibField::optional(key, value)),
    );

    fields
}

fn authors(authors: &[Author]) -> String {
    authors
        .iter()
        .map(|author| match &author.given {
            Some(given) => format!("{}, {}", to_tex(&author.family), to_tex(given)),
            None => to_tex(&author.family),
        })
        .collect::<Vec<_>>()
        .join(" and ")
}

/// The entry type for a CSL type tag.
///
/// ```
/// use bibdoi::format::label_type;
///
/// assert_eq!("inproceedings", label_type("proceedings-article"));
/// assert_eq!("article", label_type("journal-article"));
/// assert_eq!("misc", label_type("dataset"));
/// ```
#[must_use]
pub fn label_type(kind: &str) -> &'static str {
    if kind.contains("proceedings-") {
        "inproceedings"
    } else if kind.contains("journal-") || kind.contains("article") {
        "article"
    } else {
        "misc"
    }
}

/// The label of the record: the first author's family name reduced to lowercase ASCII word
/// characters, followed by the citation year.
#[must_use]
pub fn label_name(metadata: &Metadata) -> String {
    let mut label = metadata
        .first_author()
        .map(|author| {
            to_ascii(&author.family)
                .to_lowercase()
                .chars()
                .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
                .collect::<String>()
        })
        .unwrap_or_default();

    label.push_str(&metadata.citation_date().year.to_string());
    label
}

/// Write a record as `@kind{label,` followed by one indented field per line.
#[must_use]
pub fn serialize(kind: &str, label: &str, fields: &[BibField]) -> String {
    let body = fields
        .iter()
        .filter(|field| !field.value.is_empty())
        .map(|field| format!("{INDENT}{} = {{{}}}", field.key, field.value))
        .collect::<Vec<_>>()
        .join(",\n");

    format!("@{kind}{{{label},\n{body}\n}}")
}
