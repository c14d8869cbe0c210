use crate::models::Store;
use crate::storage::FileStorage;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<FileStorage>,
    pub store: Arc<Mutex<Store>>,
}

impl AppState {
    pub fn new(storage: FileStorage, store: Store) -> Self {
        Self {
            storage: Arc::new(storage),
            store: Arc::new(Mutex::new(store)),
        }
    }
}
