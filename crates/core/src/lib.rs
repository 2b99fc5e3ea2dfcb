//! Core domain logic for Folio.
//!
//! This crate contains pure domain logic with ZERO web or database dependencies.
//! Backing systems are reached through the `BlobStore` and `AppRecordStore`
//! traits, implemented by `storage::StorageService` and the db crate.
//!
//! # Modules
//!
//! - `storage` - Vendor-agnostic object storage (OpenDAL)
//! - `catalog` - App records and the record-store seam
//! - `upload` - The upload saga (blob write, record link, compensation)
//! - `download` - Resolving an app to a stream, a redirect, or nothing
//! - `content` - Site content sections and merge rules
//! - `inbox` - Visitor message reply rules
//! - `auth` - Roles, admin allowlist, access decisions
//! - `dashboard` - Admin overview counters

pub mod auth;
pub mod catalog;
pub mod content;
pub mod dashboard;
pub mod download;
pub mod inbox;
pub mod storage;
pub mod upload;

#[cfg(test)]
pub(crate) mod testing;
