use folio_core::error::{FolioError, Result};
use folio_core::personality::KeyValueStore;
use web_sys as web;

/// `window.localStorage`. Missing or blocked storage (private browsing,
/// sandboxed iframes) surfaces as [`FolioError::Storage`].
#[derive(Default)]
pub struct LocalStorage;

impl LocalStorage {
    fn handle(&self) -> Result<web::Storage> {
        web::window()
            .ok_or_else(|| FolioError::Storage("no window".into()))?
            .local_storage()
            .map_err(|e| FolioError::Storage(format!("{:?}", e)))?
            .ok_or_else(|| FolioError::Storage("localStorage disabled".into()))
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.handle()?
            .get_item(key)
            .map_err(|e| FolioError::Storage(format!("{:?}", e)))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.handle()?
            .set_item(key, value)
            .map_err(|e| FolioError::Storage(format!("{:?}", e)))
    }
}
