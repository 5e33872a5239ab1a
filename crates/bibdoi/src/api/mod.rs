//! Fetching metadata of a DOI name from the metadata service.

pub(crate) mod csl;

use log::{trace, warn};

use crate::{doi::Doi, format, metadata::Metadata, Error, ErrorKind};

/// Media type of CSL-JSON, the structured citation metadata.
pub const CSL_JSON: &str = "application/vnd.citationstyles.csl+json";
/// Media type of pre-rendered BibTeX.
pub const BIBTEX: &str = "application/x-bibtex";

/// A blocking HTTP transport used by the [`MetadataClient`].
pub trait Client {
    /// `GET` the `url` asking for the `accept` media type and return the response body.
    ///
    /// # Errors
    ///
    /// An [`Err`] is returned when the request fails, the response status is not a success or the
    /// body is empty.
    fn get_text(&self, url: &str, accept: &str) -> Result<String, Error>;
}

impl Client for reqwest::blocking::Client {
    fn get_text(&self, url: &str, accept: &str) -> Result<String, Error> {
        let resp = self
            .get(url)
            .header(reqwest::header::ACCEPT, accept)
            .send()
            .map_err(|e| Error::wrap(ErrorKind::IO, e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::new(
                ErrorKind::Status,
                format!("'{url}' responded with {status}"),
            ));
        }

        let text = resp
            .text()
            .map_err(|e| Error::wrap(ErrorKind::Deserialize, e))?;

        if text.is_empty() {
            Err(Error::new(ErrorKind::NoValue, "Response text is empty"))
        } else {
            Ok(text)
        }
    }
}

/// How the metadata service is asked for a record.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Style {
    /// Request CSL-JSON and compose the record with [`format::format`].
    #[default]
    Csl,
    /// Request BibTeX rendered by the service and normalize its layout.
    BibTex,
}

impl Style {
    const fn accept(self) -> &'static str {
        match self {
            Self::Csl => CSL_JSON,
            Self::BibTex => BIBTEX,
        }
    }
}

/// What a successful lookup produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Payload {
    /// Structured metadata still to be formatted.
    Metadata(Metadata),
    /// A record already rendered by the service, normalized.
    Rendered(String),
}

/// The outcome of resolving a single DOI name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lookup {
    /// The DOI name that was looked up.
    pub doi: Doi,
    /// `None` when the lookup failed.
    pub payload: Option<Payload>,
}

impl Lookup {
    /// Whether the lookup produced a payload.
    #[must_use]
    pub const fn success(&self) -> bool {
        self.payload.is_some()
    }

    /// The bib text of the payload, formatting metadata when needed.
    #[must_use]
    pub fn bib(&self) -> Option<String> {
        self.payload.as_ref().map(|payload| match payload {
            Payload::Metadata(metadata) => format::format(metadata),
            Payload::Rendered(text) => text.clone(),
        })
    }
}

/// Resolves DOI names against a metadata service such as `https://doi.org/`.
#[derive(Debug)]
pub struct MetadataClient<C: Client> {
    client: C,
    base_url: String,
    style: Style,
}

impl<C: Client> MetadataClient<C> {
    /// A metadata client requesting `base_url` + DOI name through `client`.
    pub fn new<S: Into<String>>(client: C, base_url: S, style: Style) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            style,
        }
    }

    /// The style records are requested in.
    #[must_use]
    pub const fn style(&self) -> Style {
        self.style
    }

    /// The URL requested for `doi`.
    #[must_use]
    pub fn url(&self, doi: &Doi) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), doi)
    }

    /// Resolve `doi` with a single request.
    ///
    /// This never fails: transport errors, unsuccessful statuses and responses that cannot be
    /// parsed are logged and produce a failed [`Lookup`].
    pub fn resolve(&self, doi: &Doi) -> Lookup {
        let payload = match self.fetch(doi) {
            Ok(payload) => {
                trace!("Resolved '{doi}'");
                Some(payload)
            }
            Err(err) => {
                warn!("Could not resolve '{doi}': {err}");
                None
            }
        };

        Lookup {
            doi: doi.clone(),
            payload,
        }
    }

    fn fetch(&self, doi: &Doi) -> Result<Payload, Error> {
        let url = self.url(doi);
        trace!("Requesting '{url}' as {}", self.style.accept());

        let text = self.client.get_text(&url, self.style.accept())?;

        match self.style {
            Style::Csl => Metadata::from_csl_json(&text).map(Payload::Metadata),
            Style::BibTex => format::bibtex::normalize(&text).map(Payload::Rendered),
        }
    }
}

#[cfg(test)]
pub(crate) use test::{
    assert_url, impl_text_producer, MockClient, NetworkErrorProducer, Producer, URL_SINK,
};

#[cfg(test)]
mod test {

    use super::*;

    thread_local! {
        pub(crate) static URL_SINK: std::cell::RefCell<Vec<(String, String)>> = std::cell::RefCell::new(Vec::new());
    }

    /// Asserts that the last URL requested through a [`MockClient`] is the expected one.
    ///
    /// The [`MockClient`] pushes every URL and accept header it is asked for to the thread local
    /// `URL_SINK`, so tests can check which requests were made and in which order.
    macro_rules! assert_url {
        ($expected: expr) => {
            assert_url!($expected, "");
        };
        ($expected: expr, $($arg: tt)+) => {
            let url = crate::api::URL_SINK
                .with(|sink| sink.borrow().last().map(|(url, _)| url.clone()).unwrap_or_default());
            assert_eq!($expected, url, $($arg)+);
        };
    }

    pub(crate) trait Producer<T> {
        fn produce(url: &str) -> Result<T, Error>;
    }

    #[derive(Default)]
    pub(crate) struct MockClient<P: Producer<String> = EmptyTextProducer> {
        _producer: std::marker::PhantomData<P>,
    }

    impl<P: Producer<String>> Client for MockClient<P> {
        fn get_text(&self, url: &str, accept: &str) -> Result<String, Error> {
            URL_SINK.with(|sink| {
                sink.borrow_mut()
                    .push((url.to_owned(), accept.to_owned()));
            });
            P::produce(url)
        }
    }

    macro_rules! impl_text_producer {
        ($($producer:ident => |$url:pat_param| $exp:expr,)*) => {
            $(
                #[derive(Default)]
                pub(crate) struct $producer;

                impl crate::api::Producer<String> for $producer {
                    #[allow(unused_variables)]
                    fn produce($url: &str) -> Result<String, crate::Error> {
                        $exp
                    }
                }
            )*
        };
    }
    impl_text_producer! {
        EmptyTextProducer => |_url| Err(Error::new(ErrorKind::NoValue, "Response text is empty")),
        NetworkErrorProducer => |_url| Err(Error::new(ErrorKind::IO, "Network error")),
    }

    pub(crate) use assert_url;
    pub(crate) use impl_text_producer;
}
