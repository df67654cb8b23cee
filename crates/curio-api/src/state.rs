//! Application state shared by every handler.

use crate::services::{ItemMediaCoordinator, ItemService};
use curio_core::Config;
use curio_db::ItemStore;
use curio_storage::MediaBackend;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub items: ItemService,
    pub media: Arc<ItemMediaCoordinator>,
}

impl AppState {
    /// Wire the item service to its store and the media backend chosen at startup.
    pub fn new(config: Config, store: Arc<dyn ItemStore>, backend: Arc<dyn MediaBackend>) -> Self {
        let media = Arc::new(ItemMediaCoordinator::new(
            backend,
            config.max_upload_size_bytes() as u64,
            config.media_folder(),
        ));
        let items = ItemService::new(store, media.clone());

        Self {
            config,
            items,
            media,
        }
    }
}
