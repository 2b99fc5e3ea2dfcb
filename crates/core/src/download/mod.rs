//! Download resolution: decide how an app's artifact is served.
//!
//! Precedence: a stored package is streamed; otherwise the external
//! download link is a redirect; otherwise there is nothing to download.

mod error;
mod headers;
mod service;

pub use error::DownloadError;
pub use headers::{CACHE_CONTROL, content_disposition, encode_uri_component};
pub use service::{Download, DownloadService, StoredDownload};
