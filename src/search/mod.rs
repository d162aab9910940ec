//! Remote search.
//!
//! Query validation and matching, request pacing, and the paginated
//! aggregator that ties them to a `ResourceListing`.

pub mod aggregator;
pub mod pacing;
pub mod query;

pub use aggregator::{PageFailure, ScanObserver, SearchAggregator, SearchResult};
pub use pacing::{
    estimate_scan_duration, FixedDelay, NoDelay, PacingPolicy, DEFAULT_RATE_LIMIT_DELAY,
};
pub use query::Query;

#[cfg(test)]
pub(crate) mod testing {
    use crate::api::ResourceListing;
    use crate::error::ClientError;
    use crate::models::{Pagination, Record, ResourceKind, ResourcePage};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Listing that serves canned pages and records which were requested.
    #[derive(Default)]
    pub(crate) struct FakeListing {
        pages: HashMap<u32, Result<ResourcePage, String>>,
        requested: Mutex<Vec<u32>>,
    }

    impl FakeListing {
        pub(crate) fn page(
            mut self,
            number: u32,
            records: Vec<Record>,
            total_pages: Option<u32>,
        ) -> Self {
            let page = ResourcePage {
                records,
                pagination: Pagination {
                    current_page: Some(number),
                    total_pages,
                    total_count: None,
                },
            };
            self.pages.insert(number, Ok(page));
            self
        }

        pub(crate) fn failing(mut self, number: u32, message: &str) -> Self {
            self.pages.insert(number, Err(message.to_string()));
            self
        }

        pub(crate) fn requested(&self) -> Vec<u32> {
            self.requested.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ResourceListing for FakeListing {
        async fn list_resources(
            &self,
            _kind: ResourceKind,
            page: u32,
            _query: &str,
        ) -> Result<ResourcePage, ClientError> {
            self.requested.lock().unwrap().push(page);
            match self.pages.get(&page) {
                Some(Ok(resources)) => Ok(resources.clone()),
                Some(Err(message)) => Err(ClientError::Transport(message.clone())),
                None => Ok(ResourcePage::default()),
            }
        }
    }
}
