//! In-memory fakes of the record store and blob store for unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use bytes::Bytes;
use chrono::Utc;

use crate::catalog::{
    App, AppChanges, AppField, AppRecordStore, BlobPatch, BlobRefs, DownloadSource, NewApp,
    RecordStoreError,
};
use crate::storage::{BlobKind, BlobStore, StorageError};
use folio_shared::types::AppId;

/// An app with no file, image, or link.
pub fn sample_app(title: &str) -> App {
    let now = Utc::now();
    App {
        id: AppId::new(),
        title: title.to_string(),
        description: format!("{title} description"),
        category: "Productivity".to_string(),
        tags: vec!["iOS".to_string(), "Android".to_string()],
        display_order: 0,
        download_link: None,
        file_path: None,
        file_name: None,
        file_size: None,
        file_type: None,
        image_path: None,
        image_url: None,
        download_count: 0,
        created_at: now,
        updated_at: now,
    }
}

/// Mock record store.
#[derive(Default)]
pub struct MemoryAppStore {
    apps: Mutex<HashMap<AppId, App>>,
    missing: Mutex<HashSet<AppField>>,
    fail_links: AtomicBool,
    fail_increments: AtomicBool,
    link_attempts: AtomicUsize,
}

impl MemoryAppStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, app: App) {
        self.apps.lock().unwrap().insert(app.id, app);
    }

    pub fn get(&self, id: AppId) -> Option<App> {
        self.apps.lock().unwrap().get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.apps.lock().unwrap().len()
    }

    /// Simulate a schema without this column.
    pub fn drop_column(&self, field: AppField) {
        self.missing.lock().unwrap().insert(field);
    }

    pub fn fail_links(&self) {
        self.fail_links.store(true, Ordering::SeqCst);
    }

    pub fn fail_increments(&self) {
        self.fail_increments.store(true, Ordering::SeqCst);
    }

    pub fn link_attempts(&self) -> usize {
        self.link_attempts.load(Ordering::SeqCst)
    }

    /// Fails the way a query selecting a dropped column fails.
    fn select(&self, fields: &[AppField]) -> Result<(), RecordStoreError> {
        let missing = self.missing.lock().unwrap();
        match fields.iter().find(|f| missing.contains(f)) {
            Some(field) => Err(RecordStoreError::MissingField(*field)),
            None => Ok(()),
        }
    }
}

const ALL_FIELDS: [AppField; 7] = [
    AppField::FilePath,
    AppField::FileName,
    AppField::FileSize,
    AppField::FileType,
    AppField::DownloadLink,
    AppField::ImagePath,
    AppField::ImageUrl,
];

impl AppRecordStore for MemoryAppStore {
    async fn find_by_id(&self, id: AppId) -> Result<Option<App>, RecordStoreError> {
        self.select(&ALL_FIELDS)?;
        Ok(self.get(id))
    }

    async fn find_blob_refs(&self, id: AppId) -> Result<Option<BlobRefs>, RecordStoreError> {
        self.select(&[AppField::FilePath, AppField::ImagePath])?;
        Ok(self.get(id).as_ref().map(BlobRefs::from))
    }

    async fn find_download_source(
        &self,
        id: AppId,
    ) -> Result<Option<DownloadSource>, RecordStoreError> {
        self.select(&[
            AppField::FilePath,
            AppField::FileName,
            AppField::FileType,
            AppField::DownloadLink,
        ])?;
        Ok(self.get(id).as_ref().map(DownloadSource::from))
    }

    async fn list(&self) -> Result<Vec<App>, RecordStoreError> {
        self.select(&ALL_FIELDS)?;
        let mut apps: Vec<App> = self.apps.lock().unwrap().values().cloned().collect();
        apps.sort_by_key(|a| (a.display_order, a.created_at));
        Ok(apps)
    }

    async fn count(&self) -> Result<u64, RecordStoreError> {
        Ok(self.len() as u64)
    }

    async fn create(&self, input: NewApp) -> Result<App, RecordStoreError> {
        let mut app = sample_app(&input.title);
        app.description = input.description;
        app.category = input.category;
        app.tags = input.tags;
        app.download_link = input.download_link;
        app.display_order = input.display_order.unwrap_or(0);
        self.insert(app.clone());
        Ok(app)
    }

    async fn update(&self, id: AppId, changes: AppChanges) -> Result<Option<App>, RecordStoreError> {
        let mut apps = self.apps.lock().unwrap();
        let Some(app) = apps.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(title) = changes.title {
            app.title = title;
        }
        if let Some(description) = changes.description {
            app.description = description;
        }
        if let Some(category) = changes.category {
            app.category = category;
        }
        if let Some(tags) = changes.tags {
            app.tags = tags;
        }
        if let Some(link) = changes.download_link {
            app.download_link = link;
        }
        if let Some(order) = changes.display_order {
            app.display_order = order;
        }
        app.updated_at = Utc::now();
        Ok(Some(app.clone()))
    }

    async fn delete(&self, id: AppId) -> Result<bool, RecordStoreError> {
        Ok(self.apps.lock().unwrap().remove(&id).is_some())
    }

    async fn link_blob(&self, id: AppId, patch: &BlobPatch) -> Result<bool, RecordStoreError> {
        self.link_attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_links.load(Ordering::SeqCst) {
            return Err(RecordStoreError::Backend("connection reset by peer".into()));
        }
        self.select(&patch.fields())?;

        let mut apps = self.apps.lock().unwrap();
        let Some(app) = apps.get_mut(&id) else {
            return Ok(false);
        };
        match patch.clone() {
            BlobPatch::Package {
                file_path,
                file_name,
                file_size,
                file_type,
                download_link,
            } => {
                app.file_path = Some(file_path);
                app.file_name = Some(file_name);
                if file_size.is_some() {
                    app.file_size = file_size;
                }
                if file_type.is_some() {
                    app.file_type = file_type;
                }
                if download_link.is_some() {
                    app.download_link = download_link;
                }
            }
            BlobPatch::Image {
                image_path,
                image_url,
            } => {
                app.image_path = Some(image_path);
                if image_url.is_some() {
                    app.image_url = image_url;
                }
            }
        }
        Ok(true)
    }

    async fn clear_fields(&self, id: AppId, fields: &[AppField]) -> Result<bool, RecordStoreError> {
        self.select(fields)?;
        let mut apps = self.apps.lock().unwrap();
        let Some(app) = apps.get_mut(&id) else {
            return Ok(false);
        };
        for field in fields {
            match field {
                AppField::FilePath => app.file_path = None,
                AppField::FileName => app.file_name = None,
                AppField::FileSize => app.file_size = None,
                AppField::FileType => app.file_type = None,
                AppField::DownloadLink => app.download_link = None,
                AppField::ImagePath => app.image_path = None,
                AppField::ImageUrl => app.image_url = None,
            }
        }
        Ok(true)
    }

    async fn increment_downloads(&self, id: AppId) -> Result<(), RecordStoreError> {
        if self.fail_increments.load(Ordering::SeqCst) {
            return Err(RecordStoreError::Backend("function increment_app_downloads missing".into()));
        }
        if let Some(app) = self.apps.lock().unwrap().get_mut(&id) {
            app.download_count += 1;
        }
        Ok(())
    }
}

/// Mock blob store with failure injection.
#[derive(Default)]
pub struct MemoryBlobStore {
    objects: Mutex<HashMap<(BlobKind, String), Bytes>>,
    puts: Mutex<Vec<String>>,
    removes: Mutex<Vec<String>>,
    duplicates: AtomicUsize,
    fail_puts: AtomicBool,
    fail_removes: AtomicBool,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, kind: BlobKind, path: &str, data: &'static [u8]) {
        self.objects
            .lock()
            .unwrap()
            .insert((kind, path.to_string()), Bytes::from_static(data));
    }

    pub fn contains(&self, kind: BlobKind, path: &str) -> bool {
        self.objects
            .lock()
            .unwrap()
            .contains_key(&(kind, path.to_string()))
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    /// Paths of every attempted write, in order.
    pub fn puts(&self) -> Vec<String> {
        self.puts.lock().unwrap().clone()
    }

    /// Paths of every attempted delete, in order.
    pub fn removes(&self) -> Vec<String> {
        self.removes.lock().unwrap().clone()
    }

    /// Reject the next `n` writes as duplicates.
    pub fn reject_as_duplicate(&self, n: usize) {
        self.duplicates.store(n, Ordering::SeqCst);
    }

    pub fn fail_puts(&self) {
        self.fail_puts.store(true, Ordering::SeqCst);
    }

    pub fn fail_removes(&self) {
        self.fail_removes.store(true, Ordering::SeqCst);
    }
}

impl BlobStore for MemoryBlobStore {
    async fn put(
        &self,
        kind: BlobKind,
        path: &str,
        data: Bytes,
        _content_type: &str,
    ) -> Result<(), StorageError> {
        self.puts.lock().unwrap().push(path.to_string());

        if self
            .duplicates
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(StorageError::already_exists(path));
        }
        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(StorageError::operation("bucket unavailable"));
        }

        let mut objects = self.objects.lock().unwrap();
        let key = (kind, path.to_string());
        if objects.contains_key(&key) {
            return Err(StorageError::already_exists(path));
        }
        objects.insert(key, data);
        Ok(())
    }

    async fn get(&self, kind: BlobKind, path: &str) -> Result<Bytes, StorageError> {
        self.objects
            .lock()
            .unwrap()
            .get(&(kind, path.to_string()))
            .cloned()
            .ok_or_else(|| StorageError::not_found(path))
    }

    async fn remove(&self, kind: BlobKind, path: &str) -> Result<(), StorageError> {
        self.removes.lock().unwrap().push(path.to_string());
        if self.fail_removes.load(Ordering::SeqCst) {
            return Err(StorageError::operation("delete denied"));
        }
        self.objects.lock().unwrap().remove(&(kind, path.to_string()));
        Ok(())
    }

    fn public_url(&self, kind: BlobKind, path: &str) -> String {
        let bucket = match kind {
            BlobKind::Package => "app-files",
            BlobKind::Image => "app-image",
        };
        format!("http://blobs.test/{bucket}/{path}")
    }
}
