//! Object key derivation.

use folio_shared::types::AppId;

/// Replaces every character outside `[A-Za-z0-9.-]` with `_`.
#[must_use]
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Object key for an app's blob.
///
/// Format: `apps/{app_id}/{unix_millis}_{sanitized_filename}`
#[must_use]
pub fn object_path(app_id: AppId, unix_millis: i64, filename: &str) -> String {
    format!("apps/{app_id}/{unix_millis}_{}", sanitize_filename(filename))
}
