use gloo_storage::errors::StorageError;
use gloo_storage::{LocalStorage, Storage};
use network_client::error::{NetworkClientError, Result};
use network_client::{Identity, IdentityStore};

const USER_KEY: &str = "user";

/// Keeps the logged in identity in `localStorage` under `user`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalIdentityStore;

impl IdentityStore for LocalIdentityStore {
    fn load(&self) -> Result<Option<Identity>> {
        match LocalStorage::get::<Identity>(USER_KEY) {
            Ok(identity) => Ok(Some(identity)),
            Err(StorageError::KeyNotFound(_)) => Ok(None),
            Err(e) => Err(NetworkClientError::StorageError(e.to_string())),
        }
    }

    fn save(&self, identity: &Identity) -> Result<()> {
        LocalStorage::set(USER_KEY, identity)
            .map_err(|e| NetworkClientError::StorageError(e.to_string()))
    }

    fn clear(&self) -> Result<()> {
        LocalStorage::delete(USER_KEY);
        Ok(())
    }
}
