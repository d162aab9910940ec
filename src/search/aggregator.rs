//! Paginated search across a remote listing.
//!
//! The aggregator fetches page 1, and on request every remaining page in
//! order, keeping the records that match the query locally. A failed
//! first page fails the search; later page failures are recorded and the
//! scan moves on.

use crate::api::ResourceListing;
use crate::error::{ClientError, SearchError};
use crate::models::{Record, ResourcePage};
use crate::search::pacing::{FixedDelay, PacingPolicy};
use crate::search::query::Query;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// A page that could not be fetched during a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFailure {
    pub page: u32,
    pub message: String,
}

/// Outcome of one search invocation.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Matches in page order, then in-page order.
    pub matches: Vec<Record>,
    /// Pages requested, failed ones included.
    pub pages_scanned: u32,
    pub failures: Vec<PageFailure>,
    /// Upstream hint from page 1.
    pub total_pages: Option<u32>,
    /// Upstream hint from page 1.
    pub total_count: Option<u64>,
    /// The scan was stopped before reaching the last page.
    pub cancelled: bool,
}

impl SearchResult {
    fn new(first_page: &ResourcePage) -> Self {
        Self {
            matches: Vec::new(),
            pages_scanned: 0,
            failures: Vec::new(),
            total_pages: first_page.pagination.total_pages,
            total_count: first_page.pagination.total_count,
            cancelled: false,
        }
    }

    /// True when more pages exist than were scanned.
    pub fn has_more_pages(&self) -> bool {
        matches!(self.total_pages, Some(total) if total > self.pages_scanned)
    }

    fn absorb(&mut self, query: &Query, page: ResourcePage) -> usize {
        let before = self.matches.len();
        self.matches
            .extend(page.records.into_iter().filter(|record| query.matches(record)));
        self.matches.len() - before
    }
}

/// Hooks for rendering scan progress.
pub trait ScanObserver: Send + Sync {
    fn scan_started(&self, _total_pages: u32) {}
    fn waiting(&self, _page: u32, _delay: Duration) {}
    fn page_finished(&self, _page: u32, _matches: usize) {}
    fn page_failed(&self, _page: u32, _error: &ClientError) {}
}

struct SilentObserver;

impl ScanObserver for SilentObserver {}

/// Drives a paginated search against a `ResourceListing`.
pub struct SearchAggregator<'a> {
    listing: &'a dyn ResourceListing,
    pacing: Box<dyn PacingPolicy + 'a>,
    cancel: CancellationToken,
    observer: Box<dyn ScanObserver + 'a>,
}

impl<'a> SearchAggregator<'a> {
    /// Aggregator with the default rate-limit pacing and no cancellation.
    pub fn new(listing: &'a dyn ResourceListing) -> Self {
        Self {
            listing,
            pacing: Box::new(FixedDelay::default()),
            cancel: CancellationToken::new(),
            observer: Box::new(SilentObserver),
        }
    }

    pub fn with_pacing(mut self, pacing: impl PacingPolicy + 'a) -> Self {
        self.pacing = Box::new(pacing);
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_observer(mut self, observer: impl ScanObserver + 'a) -> Self {
        self.observer = Box::new(observer);
        self
    }

    pub fn pacing(&self) -> &dyn PacingPolicy {
        self.pacing.as_ref()
    }

    /// Run the search.
    ///
    /// With `autoscan` false, or when page 1 reports no further pages
    /// (or no page count at all), only page 1 is fetched.
    pub async fn search(&self, query: &Query, autoscan: bool) -> Result<SearchResult, SearchError> {
        let result = self.first_page(query).await?;
        if autoscan {
            Ok(self.scan_remaining(query, result).await)
        } else {
            Ok(result)
        }
    }

    /// Fetch and filter page 1. A failure here is fatal.
    pub async fn first_page(&self, query: &Query) -> Result<SearchResult, SearchError> {
        info!("Searching {} for '{}'", query.kind(), query.text());

        let first_page = self
            .listing
            .list_resources(query.kind(), 1, query.text())
            .await
            .map_err(SearchError::FirstPage)?;

        let mut result = SearchResult::new(&first_page);
        result.pages_scanned = 1;
        let found = result.absorb(query, first_page);
        debug!("Page 1: {} matches", found);

        Ok(result)
    }

    /// Scan every page after the ones already in `result`, up to the
    /// upstream page count. Page failures are recorded, not returned.
    pub async fn scan_remaining(&self, query: &Query, mut result: SearchResult) -> SearchResult {
        let total_pages = match result.total_pages {
            Some(total) if total > result.pages_scanned => total,
            _ => return result,
        };

        self.observer.scan_started(total_pages);
        self.observer
            .page_finished(result.pages_scanned, result.matches.len());

        for page in (result.pages_scanned + 1)..=total_pages {
            if self.cancel.is_cancelled() || !self.pace(page).await {
                info!("Search cancelled before page {}", page);
                result.cancelled = true;
                break;
            }

            result.pages_scanned += 1;
            match self.listing.list_resources(query.kind(), page, query.text()).await {
                Ok(resources) => {
                    let found = result.absorb(query, resources);
                    debug!("Page {}/{}: {} matches", page, total_pages, found);
                    self.observer.page_finished(page, found);
                }
                Err(e) => {
                    warn!("Page {}/{} failed: {}", page, total_pages, e);
                    self.observer.page_failed(page, &e);
                    result.failures.push(PageFailure {
                        page,
                        message: e.to_string(),
                    });
                }
            }
        }

        info!(
            "Search finished: {} matches over {} pages ({} failed)",
            result.matches.len(),
            result.pages_scanned,
            result.failures.len()
        );

        result
    }

    /// Wait the pacing delay before `page`. Returns false if cancelled meanwhile.
    async fn pace(&self, page: u32) -> bool {
        let delay = self.pacing.delay_before(page - 1);
        if delay.is_zero() {
            return true;
        }

        self.observer.waiting(page, delay);
        tokio::select! {
            _ = self.cancel.cancelled() => false,
            _ = tokio::time::sleep(delay) => true,
        }
    }
}
