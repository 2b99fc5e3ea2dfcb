//! Object storage for app packages and images using Apache OpenDAL.
//!
//! This module provides vendor-agnostic object storage with support for:
//! - S3-compatible: Cloudflare R2, Supabase Storage, AWS S3, MinIO
//! - Azure Blob Storage
//! - Local filesystem (development only)
//! - In-process memory (tests)
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                          BlobStore                               │
//! │          put (if-not-exists) │ get │ remove │ public_url         │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                      Apache OpenDAL                              │
//! │       one Operator per bucket: packages, images                  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod path;
mod service;
mod store;

pub use config::StorageConfig;
pub use error::StorageError;
pub use folio_shared::config::StorageProvider;
pub use path::{object_path, sanitize_filename};
pub use service::StorageService;
pub use store::{BlobKind, BlobStore};
