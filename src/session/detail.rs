//! Artwork detail screen state.

use std::sync::Arc;

use tokio::sync::watch;

use super::StateCell;
use crate::fetch::FetchState;
use crate::model::ArtworkDetail;
use crate::remote::CollectionApi;
use crate::repository::Repository;

pub struct DetailSession<A> {
    repository: Repository<A>,
    artwork: Arc<StateCell<ArtworkDetail>>,
}

impl<A: CollectionApi + 'static> DetailSession<A> {
    pub fn new(repository: Repository<A>) -> Self {
        Self {
            repository,
            artwork: StateCell::new(),
        }
    }

    pub fn artwork(&self) -> watch::Receiver<FetchState<ArtworkDetail>> {
        self.artwork.subscribe()
    }

    /// Load an artwork, replacing whatever was shown.
    pub fn load(&self, object_id: i64) {
        self.artwork.run(self.repository.artwork_detail(object_id));
    }
}

impl<A> Drop for DetailSession<A> {
    fn drop(&mut self) {
        self.artwork.cancel();
    }
}
