pub mod config_service;
pub mod firestore;
pub mod local_journal_repository;
pub mod paths;
pub mod remote_journal_repository;
pub mod repository_factory;
pub mod secret_service;
pub mod storage;

pub use crate::config_service::ConfigService;
pub use crate::firestore::{DocumentStore, FirestoreDocumentStore};
pub use crate::local_journal_repository::LocalJournalRepository;
pub use crate::paths::JournalPaths;
pub use crate::remote_journal_repository::RemoteJournalRepository;
pub use crate::repository_factory::create_journal_repository;
pub use crate::secret_service::SecretServiceImpl;
pub use crate::storage::{FileKeyValueStore, KeyValueStore};
