//! Search screen state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info};

use super::StateCell;
use crate::fetch::FetchState;
use crate::model::{ArtworkDetail, Department, SearchFilters};
use crate::remote::CollectionApi;
use crate::repository::Repository;

/// Departments, filters and results of the search screen.
///
/// Departments start loading as soon as the session is created.
pub struct SearchSession<A> {
    repository: Repository<A>,
    departments: Arc<StateCell<Vec<Department>>>,
    results: Arc<StateCell<Vec<ArtworkDetail>>>,
    filters: watch::Sender<SearchFilters>,
    searching: AtomicBool,
}

impl<A: CollectionApi + 'static> SearchSession<A> {
    /// Create the session and start loading departments. Must be called
    /// inside a Tokio runtime.
    pub fn new(repository: Repository<A>) -> Self {
        Self::with_filters(repository, SearchFilters::default())
    }

    /// Create the session with restored filters.
    pub fn with_filters(repository: Repository<A>, filters: SearchFilters) -> Self {
        let session = Self {
            repository,
            departments: StateCell::new(),
            results: StateCell::new(),
            filters: watch::channel(filters).0,
            searching: AtomicBool::new(false),
        };
        session.load_departments();
        session
    }

    /// Reload the department list.
    pub fn load_departments(&self) {
        self.departments.run(self.repository.departments());
    }

    pub fn departments(&self) -> watch::Receiver<FetchState<Vec<Department>>> {
        self.departments.subscribe()
    }

    pub fn results(&self) -> watch::Receiver<FetchState<Vec<ArtworkDetail>>> {
        self.results.subscribe()
    }

    pub fn filters(&self) -> SearchFilters {
        self.filters.borrow().clone()
    }

    pub fn watch_filters(&self) -> watch::Receiver<SearchFilters> {
        self.filters.subscribe()
    }

    /// True between [`perform_search`](Self::perform_search) and its result.
    pub fn is_searching(&self) -> bool {
        self.searching.load(Ordering::SeqCst) && self.results.is_loading()
    }

    pub fn update_query(&self, query: impl Into<String>) {
        let query = query.into();
        self.filters.send_modify(|f| f.query = query);
    }

    pub fn update_department(&self, department: Option<Department>) {
        self.filters.send_modify(|f| f.selected_department = department);
    }

    pub fn update_has_images(&self, has_images: bool) {
        self.filters.send_modify(|f| f.has_images = has_images);
    }

    /// Search with the current filters.
    ///
    /// Returns false, without touching the results, when the filters have
    /// neither a query nor a department.
    pub fn perform_search(&self) -> bool {
        let filters = self.filters();
        if !filters.can_submit() {
            debug!("Search needs a query or a department");
            return false;
        }

        info!(
            query = %filters.query,
            department_id = ?filters.department_id(),
            has_images = filters.has_images,
            "Searching collection"
        );

        self.searching.store(true, Ordering::SeqCst);
        self.results.run(self.repository.search_artworks(&filters));
        true
    }

    /// Reset filters and drop any results.
    pub fn clear_search(&self) {
        self.results.reset();
        self.searching.store(false, Ordering::SeqCst);
        self.filters.send_replace(SearchFilters::default());
    }
}

impl<A> Drop for SearchSession<A> {
    fn drop(&mut self) {
        self.departments.cancel();
        self.results.cancel();
    }
}
