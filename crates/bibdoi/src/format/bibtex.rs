//! Normalization of BibTeX rendered by the metadata service.
//!
//! Services that render BibTeX themselves differ in layout (single line, tabs, capitalized entry
//! types). The text is parsed and every entry is written again in the same layout as
//! [`super::format`], keeping the service's label and fields.

use biblatex::{Bibliography, Chunk};

use crate::{Error, ErrorKind};

use super::{serialize, BibField, FIELD_ORDER};

/// Parse pre-rendered BibTeX and write its entries in the canonical layout.
///
/// Entries are separated by a blank line. Known fields are written in the canonical order and
/// any other field follows alphabetically.
///
/// # Errors
///
/// An [`Err`] is returned when `text` cannot be parsed as BibTeX or has no entries.
pub fn normalize(text: &str) -> Result<String, Error> {
    let bibliography = Bibliography::parse(text)
        .filter(|b| b.len() != 0)
        .ok_or_else(|| Error::new(ErrorKind::Deserialize, "Unable to parse string as BibTeX"))?;

    Ok(bibliography
        .into_iter()
        .map(compose_entry)
        .collect::<Vec<_>>()
        .join("\n\n"))
}

fn compose_entry(entry: biblatex::Entry) -> String {
    // Deconstruct to avoid cloning
    let biblatex::Entry {
        key,
        entry_type,
        fields,
    } = entry;

    let mut fields = fields
        .into_iter()
        .map(|(name, chunks)| BibField::new(name.to_lowercase(), compose_chunks(chunks)))
        .collect::<Vec<_>>();
    fields.sort_by(|a, b| {
        field_rank(&a.key)
            .cmp(&field_rank(&b.key))
            .then_with(|| a.key.cmp(&b.key))
    });

    serialize(&entry_type.to_string().to_lowercase(), &key, &fields)
}

fn field_rank(key: &str) -> usize {
    FIELD_ORDER
        .iter()
        .position(|known| *known == key)
        .unwrap_or(FIELD_ORDER.len())
}

// Verbatim chunks were braced in the source and stay braced.
fn compose_chunks(chunks: Vec<Chunk>) -> String {
    let mut text = String::new();

    let mut chunks = chunks.into_iter();
    while let Some(chunk) = chunks.next() {
        match chunk {
            Chunk::Normal(s) => text.push_str(&s),
            Chunk::Verbatim(mut s) => {
                merge_escaped_verbatim(&mut s, &mut chunks);
                text.push('{');
                text.push_str(&s);
                text.push('}');
            }
        }
    }

    text.trim().to_owned()
}

// biblatex treats a '/' inside a braced group as an escape, so `{(HTTP/1.1)}` is parsed as
// [Verbatim("(HTTP/"), Normal("1"), Verbatim("."), Normal("1"), Verbatim(")")].
//
// A verbatim chunk ending in '/' swallows the following chunks up to and including the verbatim
// chunk after the second normal chunk, checking every swallowed verbatim chunk for the same escape.
fn merge_escaped_verbatim(verbatim: &mut String, chunks: &mut impl Iterator<Item = Chunk>) {
    if !verbatim.ends_with('/') {
        return;
    }

    let mut normal_count = 0;
    while let Some(chunk) = chunks.next() {
        match chunk {
            Chunk::Normal(s) => {
                normal_count += 1;
                verbatim.push_str(&s);
            }
            Chunk::Verbatim(mut s) => {
                merge_escaped_verbatim(&mut s, chunks);
                verbatim.push_str(&s);
                if normal_count == 2 {
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CROSSREF_BIBTEX: &str = include_str!("../../../../tests/data/crossref_bibtex.bib");

    #[test]
    fn single_line_bibtex_is_laid_out_per_field() {
        let text = normalize(CROSSREF_BIBTEX).unwrap();

        assert!(text.starts_with("@article{Abbott_2016,\n  title = {"));
        assert!(text.contains("\n  year = {2016},\n"));
        assert!(text.contains("\n  journal = {Physical Review Letters},\n"));
        assert!(text.ends_with("\n}"));
        assert!(!text.contains('\t'));
    }

    #[test]
    fn unknown_fields_follow_known_fields_alphabetically() {
        let text = normalize("@Book{key, zeta = {z}, ISSN = {1}, title = {T}, year = {2000}}")
            .unwrap();

        assert_eq!(
            "@book{key,\n  title = {T},\n  year = {2000},\n  issn = {1},\n  zeta = {z}\n}",
            text
        );
    }

    #[test]
    fn normalizing_is_deterministic() {
        assert_eq!(
            normalize(CROSSREF_BIBTEX).unwrap(),
            normalize(CROSSREF_BIBTEX).unwrap()
        );
    }

    #[test]
    fn text_that_is_not_bibtex_is_an_error() {
        let err = normalize("This is not valid BibTeX").unwrap_err();
        assert_eq!(ErrorKind::Deserialize, err.kind());
    }

    #[test]
    fn verbatim_chunks_keep_their_braces() {
        let chunks = vec![
            Chunk::Normal("The ".to_owned()),
            Chunk::Verbatim("LIGO".to_owned()),
            Chunk::Normal(" detector".to_owned()),
        ];

        assert_eq!("The {LIGO} detector", compose_chunks(chunks));
    }

    #[test]
    fn verbatim_split_at_slash_is_merged() {
        // `{(HTTP/1.1)}` as biblatex splits it
        let chunks = vec![
            Chunk::Normal("Transfer Protocol ".to_owned()),
            Chunk::Verbatim("(HTTP/".to_owned()),
            Chunk::Normal("1".to_owned()),
            Chunk::Verbatim(".".to_owned()),
            Chunk::Normal("1".to_owned()),
            Chunk::Verbatim(")".to_owned()),
            Chunk::Normal(": Authentication".to_owned()),
        ];

        assert_eq!(
            "Transfer Protocol {(HTTP/1.1)}: Authentication",
            compose_chunks(chunks)
        );
    }

    #[test]
    fn braced_title_with_slash_stays_one_group() {
        let text = normalize(
            "@misc{rfc7235, title = {{Hypertext Transfer Protocol (HTTP/1.1): Authentication}}, year = {2014}}",
        )
        .unwrap();

        assert_eq!(
            "@misc{rfc7235,\n  title = {{Hypertext Transfer Protocol (HTTP/1.1): Authentication}},\n  year = {2014}\n}",
            text
        );
    }
}
