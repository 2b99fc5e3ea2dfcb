//! App catalog: the app records shown on the public site.
//!
//! The record store is reached through [`AppRecordStore`], implemented by the
//! db crate. Blobs referenced by a record live in object storage and are
//! removed best-effort when the record goes away.

mod error;
mod repository;
mod service;
mod types;

pub use error::CatalogError;
pub use repository::{AppField, AppRecordStore, BlobPatch, RecordStoreError};
pub use service::CatalogService;
pub use types::{
    App, AppChanges, AppUpdate, BlobRefs, DownloadSource, FileType, NewApp, normalize_tags,
};
