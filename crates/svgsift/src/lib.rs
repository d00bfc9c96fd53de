//! svgsift - Extract renderable vector fragments from captured web documents.
//!
//! Raw markup strings captured by a document scanner go through four stages:
//! classification into typed records, concurrent resolution of external
//! image references, validation with sprite sheet expansion, and lazy
//! viewport normalization. Only records that were actually reconstituted
//! into an element tree come out the other end.

pub mod config;
pub mod expand;
pub mod normalize;
pub mod resolve;

mod error;

pub use svgsift_core::{context, element, exchange, geometry, record};
pub use svgsift_parser::classify;

pub use error::{FetchError, ResolveError, SiftError};

use futures::future::join_all;
use log::{debug, info, trace};

use config::AppConfig;
use exchange::DocumentBatch;
use record::VectorRecord;
use resolve::{Fetcher, HttpFetcher, Resolver};

/// Runs the extraction pipeline over document batches.
///
/// # Examples
///
/// ```rust,no_run
/// use svgsift::{Harvester, config::AppConfig, exchange::{Candidate, DocumentBatch}};
///
/// # async fn run() -> Result<(), svgsift::SiftError> {
/// let harvester = Harvester::new(AppConfig::default())?;
///
/// let batch = DocumentBatch::new(
///     vec![Candidate::new("logo", r#"<svg width="24" height="24"><path d="M0 0"/></svg>"#)],
///     "example.com",
///     "https://example.com",
/// );
///
/// for record in harvester.process(Some(batch)).await {
///     println!("{}: {:?}", record.id(), record.presentation());
/// }
/// # Ok(())
/// # }
/// ```
pub struct Harvester {
    config: AppConfig,
    resolver: Resolver,
}

impl Harvester {
    /// Create a harvester that fetches external images over HTTP.
    ///
    /// # Errors
    ///
    /// Returns `SiftError::HttpClient` if the HTTP client cannot be built
    /// from the fetch configuration.
    pub fn new(config: AppConfig) -> Result<Self, SiftError> {
        let fetcher = HttpFetcher::new(config.fetch())?;
        Ok(Self::with_fetcher(config, fetcher))
    }

    /// Create a harvester that fetches external images through `fetcher`.
    pub fn with_fetcher(config: AppConfig, fetcher: impl Fetcher + 'static) -> Self {
        Self {
            config,
            resolver: Resolver::new(fetcher),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Classify every candidate of `batch`, skipping unrecognized markup.
    ///
    /// The returned records are in candidate order and have not been
    /// resolved or validated yet.
    pub fn classify(&self, batch: &DocumentBatch) -> Vec<VectorRecord> {
        batch
            .data
            .iter()
            .filter_map(|candidate| {
                classify::classify(&candidate.svg, &candidate.id, Some(batch.origin.as_str()))
            })
            .collect()
    }

    /// Resolve every external image in `records` concurrently.
    ///
    /// Each resolution mutates only its own record, so the slice keeps its
    /// order. Failures are recorded on the records; this never fails.
    pub async fn resolve(&self, records: &mut [VectorRecord]) {
        let pending: Vec<_> = records
            .iter_mut()
            .filter(|record| record.is_external_image())
            .map(|record| self.resolver.resolve(record))
            .collect();

        debug!(fetches = pending.len(); "Resolving external images");
        join_all(pending).await;
    }

    /// Turn a batch of captured markup into valid vector records.
    ///
    /// Returns an empty list when no batch is given. Malformed markup and
    /// failed fetches are dropped from the output, never reported as errors.
    pub async fn process(&self, batch: Option<DocumentBatch>) -> Vec<VectorRecord> {
        let Some(batch) = batch else {
            debug!("No document batch to process");
            return Vec::new();
        };

        info!(candidates = batch.data.len(), origin = batch.origin; "Processing document batch");

        let mut records = self.classify(&batch);
        self.resolve(&mut records).await;
        let records = expand::validate_and_expand(records);

        info!(records = records.len(); "Document batch processed");
        trace!(records:?; "Extracted records");
        records
    }
}
