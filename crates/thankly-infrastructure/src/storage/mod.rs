//! Storage layer: atomic documents and the file-backed key/value store.

mod atomic_file;
mod file_store;

pub use atomic_file::{AtomicFile, AtomicFileError, FileFormat};
pub use file_store::{
    DOCUMENT_VERSION, FileKeyValueStore, StoredDocument, escape_file_stem, unescape_file_stem,
};
