//! Storage layer for atomic file operations and the local key-value scope.

mod atomic_file;
mod key_value;

pub use atomic_file::AtomicFile;
pub use key_value::{FileKeyValueStore, KeyValueStore, UpdateFn};
