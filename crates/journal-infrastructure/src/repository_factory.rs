//! Storage backend selection.

use std::sync::Arc;

use journal_core::config::StorageConfig;
use journal_core::error::{JournalError, Result};
use journal_core::storage::{JournalRepository, StorageBackend};

use crate::firestore::FirestoreDocumentStore;
use crate::local_journal_repository::LocalJournalRepository;
use crate::paths::JournalPaths;
use crate::remote_journal_repository::RemoteJournalRepository;
use crate::storage::FileKeyValueStore;

/// Builds the repository for the configured backend.
///
/// The choice is made once; a remote section that is missing or still holds
/// placeholder values selects local storage.
pub fn create_journal_repository(
    storage: &StorageConfig,
    paths: &JournalPaths,
) -> Result<Arc<dyn JournalRepository>> {
    match (storage.selected_backend(), &storage.remote) {
        (StorageBackend::Remote, Some(remote)) => {
            tracing::info!(
                "[RepositoryFactory] Using remote storage (project '{}', database '{}')",
                remote.project_id,
                remote.database
            );
            let store = Arc::new(FirestoreDocumentStore::from_config(remote));
            Ok(Arc::new(RemoteJournalRepository::from_config(store, remote)))
        }
        _ => {
            tracing::warn!(
                "[RepositoryFactory] Remote storage is not configured, falling back to local storage"
            );
            let scope_dir = match &storage.scope_dir {
                Some(dir) => dir.clone(),
                None => paths
                    .store_dir()
                    .map_err(|e| JournalError::config(e.to_string()))?,
            };
            tracing::info!(
                "[RepositoryFactory] Using local storage at {}",
                scope_dir.display()
            );
            let store = Arc::new(FileKeyValueStore::new(scope_dir));
            Ok(Arc::new(LocalJournalRepository::new(store)))
        }
    }
}
