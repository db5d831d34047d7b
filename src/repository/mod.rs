//! Aggregating repository over the collection API.
//!
//! Turns a search into a hydrated, sorted list of artworks:
//!
//! 1. Run the search. Its failure is the only error the caller sees.
//! 2. Keep the first `limit` ids (silently; the caller is not told).
//! 3. Fetch each detail, one at a time unless configured otherwise. A
//!    failed detail is skipped.
//! 4. Sort by artist sort key.
//!
//! Each public operation is a stream of [`FetchState`]s: `Loading`, then one
//! terminal state.

pub mod config;

use std::sync::Arc;

use futures_util::stream::{self, Stream, StreamExt};
use tracing::{debug, info};

use crate::fetch::{self, FetchState};
use crate::model::{ArtworkDetail, Department, SearchFilters};
use crate::remote::{CollectionApi, RemoteError, SearchQuery};

pub use config::{HydrationConfig, EUROPEAN_PAINTINGS_DEPARTMENT_ID};

/// Repository over a [`CollectionApi`].
pub struct Repository<A> {
    api: Arc<A>,
    config: HydrationConfig,
}

impl<A> Clone for Repository<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            config: self.config.clone(),
        }
    }
}

impl<A: CollectionApi + 'static> Repository<A> {
    pub fn new(api: A, config: HydrationConfig) -> Self {
        Self::from_arc(Arc::new(api), config)
    }

    pub fn from_arc(api: Arc<A>, config: HydrationConfig) -> Self {
        Self { api, config }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn config(&self) -> &HydrationConfig {
        &self.config
    }

    /// All departments.
    pub fn departments(&self) -> impl Stream<Item = FetchState<Vec<Department>>> + Send + 'static {
        let api = Arc::clone(&self.api);
        fetch::track(async move {
            match api.list_departments().await {
                Ok(response) => Ok(response.departments),
                Err(RemoteError::EmptyBody) => Err("No departments found".to_string()),
                Err(e) => Err(e.to_string()),
            }
        })
    }

    /// General search from user filters, capped at the search limit.
    pub fn search_artworks(
        &self,
        filters: &SearchFilters,
    ) -> impl Stream<Item = FetchState<Vec<ArtworkDetail>>> + Send + 'static {
        let query = SearchQuery::new(filters.query.clone())
            .with_department(filters.department_id())
            .with_has_images(filters.has_images);
        self.search_and_hydrate(query, self.config.search_limit)
    }

    /// Map search: paintings with images from one country, capped at the geo limit.
    pub fn search_artworks_by_country(
        &self,
        country: &str,
    ) -> impl Stream<Item = FetchState<Vec<ArtworkDetail>>> + Send + 'static {
        let query = SearchQuery::new("")
            .with_geo_location(country)
            .with_department(Some(self.config.geo_department_id))
            .with_has_images(true);
        self.search_and_hydrate(query, self.config.geo_limit)
    }

    /// Search, then hydrate at most `limit` hits.
    pub fn search_and_hydrate(
        &self,
        query: SearchQuery,
        limit: usize,
    ) -> impl Stream<Item = FetchState<Vec<ArtworkDetail>>> + Send + 'static {
        let api = Arc::clone(&self.api);
        let concurrency = self.config.concurrency;
        fetch::track(async move {
            hydrate(&*api, &query, limit, concurrency)
                .await
                .map_err(search_failure)
        })
    }

    /// One artwork by id.
    pub fn artwork_detail(&self, object_id: i64) -> impl Stream<Item = FetchState<ArtworkDetail>> + Send + 'static {
        let api = Arc::clone(&self.api);
        fetch::track(async move {
            match api.get_detail(object_id).await {
                Ok(detail) => Ok(detail),
                Err(RemoteError::EmptyBody) => Err("Artwork not found".to_string()),
                Err(e) => Err(e.to_string()),
            }
        })
    }
}

/// Run a search and fetch the details of its first `limit` hits.
///
/// Details are requested in hit order with at most `concurrency` in flight
/// (1 means each starts after the previous finished). Failed details are
/// dropped. The result is sorted by [`ArtworkDetail::sort_key`].
pub async fn hydrate<A: CollectionApi>(
    api: &A,
    query: &SearchQuery,
    limit: usize,
    concurrency: usize,
) -> Result<Vec<ArtworkDetail>, RemoteError> {
    let ids = match api.search(query).await {
        Ok(response) => response.into_ids(),
        // No body means no hits
        Err(RemoteError::EmptyBody) => Vec::new(),
        Err(e) => return Err(e),
    };

    if ids.is_empty() {
        debug!(query = ?query, "Search returned no objects");
        return Ok(Vec::new());
    }

    let total = ids.len();
    let requested: Vec<i64> = ids.into_iter().take(limit).collect();
    let attempted = requested.len();

    let results: Vec<(i64, Result<ArtworkDetail, RemoteError>)> = stream::iter(requested)
        .map(|id| async move { (id, api.get_detail(id).await) })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let mut artworks = Vec::with_capacity(attempted);
    for (id, result) in results {
        match result {
            Ok(detail) => artworks.push(detail),
            Err(e) => debug!(object_id = id, error = %e, "Skipping artwork that failed to load"),
        }
    }

    artworks.sort_by(|a, b| a.sort_key().cmp(b.sort_key()));

    info!(
        total,
        attempted,
        hydrated = artworks.len(),
        skipped = attempted - artworks.len(),
        "Hydrated search results"
    );

    Ok(artworks)
}

/// Message for a failed search call. Anything but an HTTP status is
/// reported as a network error.
fn search_failure(e: RemoteError) -> String {
    match e {
        RemoteError::HttpStatus { .. } => format!("Search failed: {}", e.reason()),
        RemoteError::Transport(_) => e.to_string(),
        other => format!("Network error: {}", other),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory [`CollectionApi`] for repository and session tests.

    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use parking_lot::Mutex;

    use crate::model::{ArtworkDetail, Department, DepartmentsResponse, SearchResponse};
    use crate::remote::{CollectionApi, RemoteError, Result, SearchQuery};

    /// Scripted backend that records every call.
    #[derive(Default)]
    pub struct FakeApi {
        pub departments: Option<Vec<Department>>,
        pub search_ids: Option<Vec<i64>>,
        pub search_status: Option<u16>,
        /// Answer searches with a body that does not decode.
        pub search_malformed: bool,
        pub details: HashMap<i64, ArtworkDetail>,
        pub delay: Option<Duration>,
        pub detail_delay: Option<Duration>,
        pub searches: Mutex<Vec<SearchQuery>>,
        pub detail_calls: Mutex<Vec<i64>>,
        pub in_flight: AtomicUsize,
        pub max_in_flight: AtomicUsize,
    }

    impl FakeApi {
        pub fn with_search(ids: Vec<i64>) -> Self {
            Self {
                search_ids: Some(ids),
                ..Default::default()
            }
        }

        pub fn with_artwork(mut self, id: i64, alpha_sort: Option<&str>) -> Self {
            self.details.insert(id, artwork(id, alpha_sort));
            self
        }

        pub fn with_detail_delay(mut self, delay: Duration) -> Self {
            self.detail_delay = Some(delay);
            self
        }

        pub fn detail_calls(&self) -> Vec<i64> {
            self.detail_calls.lock().clone()
        }

        /// Most detail requests seen running at the same time.
        pub fn max_in_flight(&self) -> usize {
            self.max_in_flight.load(Ordering::SeqCst)
        }
    }

    pub fn artwork(id: i64, alpha_sort: Option<&str>) -> ArtworkDetail {
        ArtworkDetail {
            object_id: id,
            title: Some(format!("Object {id}")),
            artist_alpha_sort: alpha_sort.map(str::to_string),
            ..Default::default()
        }
    }

    fn not_found() -> RemoteError {
        RemoteError::HttpStatus { code: 404, message: "Not Found".to_string() }
    }

    impl CollectionApi for FakeApi {
        async fn list_departments(&self) -> Result<DepartmentsResponse> {
            match &self.departments {
                Some(departments) => Ok(DepartmentsResponse { departments: departments.clone() }),
                None => Err(RemoteError::EmptyBody),
            }
        }

        async fn search(&self, query: &SearchQuery) -> Result<SearchResponse> {
            self.searches.lock().push(query.clone());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if let Some(code) = self.search_status {
                return Err(RemoteError::HttpStatus {
                    code,
                    message: "Service Unavailable".to_string(),
                });
            }
            if self.search_malformed {
                return Err(serde_json::from_str::<SearchResponse>("{\"total\":").unwrap_err().into());
            }
            let ids = self.search_ids.clone();
            Ok(SearchResponse {
                total: ids.as_ref().map_or(0, |ids| ids.len() as i64),
                object_ids: ids,
            })
        }

        async fn get_detail(&self, object_id: i64) -> Result<ArtworkDetail> {
            self.detail_calls.lock().push(object_id);

            let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(running, Ordering::SeqCst);
            if let Some(delay) = self.detail_delay {
                tokio::time::sleep(delay).await;
            }
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            self.details.get(&object_id).cloned().ok_or_else(not_found)
        }
    }
}
