use std::sync::Arc;

use crate::config::Settings;
use crate::storage::PlayerStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn PlayerStore>,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(store: Arc<dyn PlayerStore>, settings: Settings) -> Self {
        Self {
            store,
            settings: Arc::new(settings),
        }
    }
}
