//! Hydration limits.

/// European Paintings, the department the map searches in.
pub const EUROPEAN_PAINTINGS_DEPARTMENT_ID: i64 = 11;

/// How many search hits get hydrated, and how.
#[derive(Debug, Clone)]
pub struct HydrationConfig {
    /// Cap for map (geo) searches.
    pub geo_limit: usize,

    /// Cap for general searches.
    pub search_limit: usize,

    /// Detail requests in flight at once. 1 fetches strictly one after another.
    pub concurrency: usize,

    /// Department used for geo searches.
    pub geo_department_id: i64,
}

impl HydrationConfig {
    /// Set both limits.
    pub fn with_limits(mut self, geo_limit: usize, search_limit: usize) -> Self {
        self.geo_limit = geo_limit;
        self.search_limit = search_limit;
        self
    }

    /// Set the number of concurrent detail requests (at least 1).
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }
}

impl Default for HydrationConfig {
    fn default() -> Self {
        Self {
            geo_limit: 20,
            search_limit: 50,
            concurrency: 1,
            geo_department_id: EUROPEAN_PAINTINGS_DEPARTMENT_ID,
        }
    }
}
