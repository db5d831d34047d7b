//! Map screen state.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, warn};

use super::StateCell;
use crate::fetch::FetchState;
use crate::model::{ArtworkDetail, GeoCapital};
use crate::remote::CollectionApi;
use crate::repository::Repository;

/// Selected capital and the artworks found for its country.
pub struct MapSession<A> {
    repository: Repository<A>,
    selected: watch::Sender<Option<GeoCapital>>,
    artworks: Arc<StateCell<Vec<ArtworkDetail>>>,
    sheet_visible: watch::Sender<bool>,
    connected: watch::Sender<bool>,
}

impl<A: CollectionApi + 'static> MapSession<A> {
    pub fn new(repository: Repository<A>) -> Self {
        Self {
            repository,
            selected: watch::channel(None).0,
            artworks: StateCell::new(),
            sheet_visible: watch::channel(false).0,
            connected: watch::channel(true).0,
        }
    }

    pub fn selected(&self) -> Option<GeoCapital> {
        *self.selected.borrow()
    }

    pub fn is_sheet_visible(&self) -> bool {
        *self.sheet_visible.borrow()
    }

    pub fn watch_sheet(&self) -> watch::Receiver<bool> {
        self.sheet_visible.subscribe()
    }

    pub fn is_connected(&self) -> bool {
        *self.connected.borrow()
    }

    /// Report network availability. Selections are refused while offline.
    pub fn set_connected(&self, connected: bool) {
        self.connected.send_replace(connected);
    }

    pub fn artworks(&self) -> watch::Receiver<FetchState<Vec<ArtworkDetail>>> {
        self.artworks.subscribe()
    }

    /// Open the sheet for a capital and look up its country's paintings.
    ///
    /// Returns false, leaving everything as it was, when offline.
    pub fn select_capital(&self, capital: GeoCapital) -> bool {
        if !self.is_connected() {
            warn!(capital = capital.capital, "Offline, not loading capital");
            return false;
        }

        info!(capital = capital.capital, country = capital.country, "Capital selected");

        self.selected.send_replace(Some(capital));
        self.sheet_visible.send_replace(true);
        self.artworks
            .run(self.repository.search_artworks_by_country(capital.country));
        true
    }

    /// Select the capital closest to a position. `None` when offline.
    pub fn select_nearest(&self, latitude: f64, longitude: f64) -> Option<GeoCapital> {
        let capital = *GeoCapital::nearest(latitude, longitude);
        self.select_capital(capital).then_some(capital)
    }

    /// Close the sheet and forget the selection.
    pub fn hide_sheet(&self) {
        self.artworks.cancel();
        self.sheet_visible.send_replace(false);
        self.selected.send_replace(None);
    }
}

impl<A> Drop for MapSession<A> {
    fn drop(&mut self) {
        self.artworks.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::testing::FakeApi;
    use crate::repository::HydrationConfig;
    use crate::session::settled;

    fn session(api: FakeApi) -> MapSession<FakeApi> {
        MapSession::new(Repository::new(api, HydrationConfig::default()))
    }

    #[tokio::test]
    async fn test_select_capital_searches_country() {
        let session = session(FakeApi::with_search(vec![8]).with_artwork(8, Some("Rembrandt")));
        let amsterdam = *GeoCapital::find("Amsterdam").unwrap();

        assert!(session.select_capital(amsterdam));
        assert!(session.is_sheet_visible());
        assert_eq!(session.selected(), Some(amsterdam));

        let state = settled(&mut session.artworks()).await;
        assert_eq!(state.success().map(Vec::len), Some(1));

        let searches = session.repository.api().searches.lock().clone();
        assert_eq!(searches[0].geo_location.as_deref(), Some("Netherlands"));
    }

    #[tokio::test]
    async fn test_select_nearest() {
        let session = session(FakeApi::with_search(vec![]));
        let capital = session.select_nearest(47.0707, 15.4395).unwrap(); // Graz
        assert_eq!(capital.capital, "Vienna");
        assert_eq!(settled(&mut session.artworks()).await, FetchState::Success(vec![]));
    }

    #[tokio::test]
    async fn test_hide_sheet() {
        let session = session(FakeApi::with_search(vec![]));
        session.select_capital(*GeoCapital::find("Rome").unwrap());
        session.hide_sheet();

        assert!(!session.is_sheet_visible());
        assert_eq!(session.selected(), None);
    }

    #[tokio::test]
    async fn test_offline_selection_is_refused() {
        let session = session(FakeApi::with_search(vec![]));
        session.set_connected(false);

        assert!(!session.select_capital(*GeoCapital::find("Madrid").unwrap()));
        assert_eq!(session.select_nearest(41.39, 2.17), None);
        assert!(!session.is_sheet_visible());
        assert_eq!(session.selected(), None);
        assert!(session.repository.api().searches.lock().is_empty());

        session.set_connected(true);
        assert!(session.select_capital(*GeoCapital::find("Madrid").unwrap()));
        assert_eq!(settled(&mut session.artworks()).await, FetchState::Success(vec![]));
    }
}
