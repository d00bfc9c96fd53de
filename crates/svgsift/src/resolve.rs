//! Resolution of external image references.
//!
//! An [`ExternalImage`] record carries only a URL. The [`Resolver`] fetches
//! the referenced content through a [`Fetcher`], parses it as a complete
//! vector document and stores the root element on the record. Inline `data:`
//! URIs are decoded locally and never reach the fetcher.
//!
//! Every failure, whether the fetch was blocked, the server refused, or the
//! body did not parse, has the same outcome: the record is marked CORS
//! restricted and keeps no element. Nothing is retried.

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use log::{debug, trace, warn};
use reqwest::header::{ACCESS_CONTROL_ALLOW_ORIGIN, ORIGIN};
use url::Url;

use svgsift_core::{
    element::Element,
    record::{ExternalImage, VectorRecord},
};
use svgsift_parser::xml;

use crate::{
    config::FetchConfig,
    error::{FetchError, ResolveError},
};

/// Source of bytes for absolute URLs.
///
/// `origin` is the origin of the document the reference was found in.
/// Implementations decide what a cross-origin request is allowed to return.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &Url, origin: &str) -> Result<Vec<u8>, FetchError>;
}

/// [`Fetcher`] backed by an HTTP client.
///
/// When CORS enforcement is on, a cross-origin request carries an `Origin`
/// header and its response must answer with an `Access-Control-Allow-Origin`
/// of `*` or the requesting origin. Same-origin requests are never checked.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    enforce_cors: bool,
}

impl HttpFetcher {
    /// Builds the HTTP client from the fetch configuration.
    ///
    /// # Errors
    ///
    /// Returns the client builder's error if the TLS backend cannot be
    /// initialized or the user agent is not a valid header value.
    pub fn new(config: &FetchConfig) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = config.user_agent() {
            builder = builder.user_agent(user_agent);
        }

        Ok(Self {
            client: builder.build()?,
            enforce_cors: config.enforce_cors(),
        })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url, origin: &str) -> Result<Vec<u8>, FetchError> {
        let checked = self.enforce_cors && !is_same_origin(url, origin);
        let request_origin = serialize_origin(origin);

        let mut request = self.client.get(url.clone());
        if checked {
            request = request.header(ORIGIN, request_origin.as_str());
        }

        let response = request.send().await.map_err(FetchError::Network)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        if checked {
            let allowed = response
                .headers()
                .get(ACCESS_CONTROL_ALLOW_ORIGIN)
                .and_then(|value| value.to_str().ok());
            if !allows_origin(allowed, &request_origin) {
                return Err(FetchError::CrossOrigin {
                    target: url.to_string(),
                    origin: request_origin,
                });
            }
        }

        let body = response.bytes().await.map_err(FetchError::Network)?;
        Ok(body.to_vec())
    }
}

/// Resolves external image records in place.
pub struct Resolver {
    fetcher: Box<dyn Fetcher>,
}

impl Resolver {
    pub fn new(fetcher: impl Fetcher + 'static) -> Self {
        Self {
            fetcher: Box::new(fetcher),
        }
    }

    /// Fetches and parses the content of one external image record.
    ///
    /// On success the record holds the fetched root element and is detached
    /// from its document. On failure it is marked CORS restricted. Records of
    /// other kinds, and records already resolved, are left untouched.
    pub async fn resolve(&self, record: &mut VectorRecord) {
        if record.is_valid() || record.cors_restricted() {
            return;
        }
        let Some(image) = record.external_image() else {
            return;
        };

        match self.load(image).await {
            Ok(element) => {
                debug!(id = record.id(); "External image resolved");
                record.resolve(element);
            }
            Err(err) => {
                warn!(id = record.id(), error:% = err; "External image could not be resolved");
                record.mark_cors_restricted();
            }
        }
    }

    async fn load(&self, image: &ExternalImage) -> Result<Element, ResolveError> {
        let bytes = match image.source() {
            Some(source) if image.is_data_uri() => decode_data_uri(source)?,
            _ => {
                let url = image
                    .absolute_source_url()
                    .ok_or_else(|| FetchError::InvalidUrl(image.source().map(str::to_string)))?;
                trace!(url = url.as_str(), origin = image.origin(); "Fetching external image");
                self.fetcher.fetch(url, image.origin()).await?
            }
        };

        let text = String::from_utf8(bytes).map_err(FetchError::from)?;
        Ok(xml::parse_document(&text)?)
    }
}

/// Decodes the payload of a `data:` URI.
///
/// Payloads marked `;base64` are base64-decoded with ASCII whitespace
/// ignored; everything else is percent-decoded.
fn decode_data_uri(source: &str) -> Result<Vec<u8>, FetchError> {
    let source = source.trim();
    let (header, payload) = source
        .get(5..)
        .and_then(|rest| rest.split_once(','))
        .ok_or_else(|| FetchError::DataUri("missing ',' separator".to_string()))?;

    let is_base64 = header
        .rsplit(';')
        .next()
        .is_some_and(|param| param.trim().eq_ignore_ascii_case("base64"));

    if is_base64 {
        let compact: String = payload
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();
        let compact = urlencoding::decode(&compact)
            .map_err(|err| FetchError::DataUri(err.to_string()))?;
        STANDARD
            .decode(compact.as_bytes())
            .map_err(|err| FetchError::DataUri(err.to_string()))
    } else {
        Ok(urlencoding::decode_binary(payload.as_bytes()).into_owned())
    }
}

/// Returns `true` if `url` has the same origin as the document origin.
///
/// An unparseable document origin is opaque and matches nothing.
fn is_same_origin(url: &Url, origin: &str) -> bool {
    Url::parse(origin).is_ok_and(|document| document.origin() == url.origin())
}

/// Serializes a document origin the way a browser sends it in `Origin`.
fn serialize_origin(origin: &str) -> String {
    Url::parse(origin)
        .map(|url| url.origin().ascii_serialization())
        .unwrap_or_else(|_| "null".to_string())
}

fn allows_origin(allowed: Option<&str>, request_origin: &str) -> bool {
    allowed.is_some_and(|allowed| {
        let allowed = allowed.trim();
        allowed == "*" || allowed == request_origin
    })
}
