//! Upload workflow: place a package or image in object storage and link it
//! into its app record.
//!
//! The two backing systems share no transaction, so an upload runs as a small
//! saga:
//!
//! ```text
//! Pending ──put blob──▶ BlobWritten ──link record──▶ RecordUpdated ──▶ Committed
//!                           │
//!                           └─ link failed ──delete blob──▶ Compensated
//! ```
//!
//! A record update that fails only because a non-essential column is missing
//! is retried once without that column under `SchemaDriftPolicy::Degrade`.

mod error;
mod locks;
mod saga;
mod service;
mod types;
mod validation;


pub use error::UploadError;
pub use folio_shared::config::SchemaDriftPolicy;
pub use locks::{OwnerGuard, OwnerLocks};
pub use saga::{SagaState, UploadSaga};
pub use service::UploadService;
pub use types::{IncomingFile, UploadOutcome, UploadRequest};
pub use validation::{
    IMAGE_EXTENSIONS, IMAGE_MAX_BYTES, PACKAGE_EXTENSIONS, PACKAGE_MAX_BYTES, ValidUpload,
    max_bytes, size_limit_message, validate,
};
