pub mod error;
pub mod file_storage;

pub use error::{StorageError, StorageResult};
pub use file_storage::{FileStorage, DEFAULT_FILE_PATH};
