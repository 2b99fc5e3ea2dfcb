//! App repository: the Postgres-backed [`AppRecordStore`].

use std::sync::Arc;

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, FromQueryResult,
    IntoActiveModel, NotSet, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set,
};
use uuid::Uuid;

use folio_core::catalog::{
    App, AppChanges, AppField, AppRecordStore, BlobPatch, BlobRefs, DownloadSource, FileType,
    NewApp, RecordStoreError,
};
use folio_shared::types::AppId;

use crate::entities::{apps, sea_orm_active_enums::FileType as DbFileType};

/// App repository for catalog persistence.
#[derive(Debug, Clone)]
pub struct AppRepository {
    db: Arc<DatabaseConnection>,
}

impl AppRepository {
    /// Creates a new app repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl AppRecordStore for AppRepository {
    async fn find_by_id(&self, id: AppId) -> Result<Option<App>, RecordStoreError> {
        let model = apps::Entity::find_by_id(id.into_inner())
            .one(self.db.as_ref())
            .await
            .map_err(classify)?;
        Ok(model.map(to_domain))
    }

    async fn find_blob_refs(&self, id: AppId) -> Result<Option<BlobRefs>, RecordStoreError> {
        let row = blob_refs_query(id.into_inner())
            .into_model::<BlobRefsRow>()
            .one(self.db.as_ref())
            .await
            .map_err(classify)?;
        Ok(row.map(|r| BlobRefs {
            file_path: r.file_path,
            image_path: r.image_path,
        }))
    }

    async fn find_download_source(
        &self,
        id: AppId,
    ) -> Result<Option<DownloadSource>, RecordStoreError> {
        let row = download_source_query(id.into_inner())
            .into_model::<DownloadSourceRow>()
            .one(self.db.as_ref())
            .await
            .map_err(classify)?;
        Ok(row.map(|r| DownloadSource {
            file_path: r.file_path,
            file_name: r.file_name,
            file_type: r.file_type.map(from_db_file_type),
            download_link: r.download_link,
        }))
    }

    async fn list(&self) -> Result<Vec<App>, RecordStoreError> {
        let models = apps::Entity::find()
            .order_by_asc(apps::Column::DisplayOrder)
            .order_by_asc(apps::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(classify)?;
        Ok(models.into_iter().map(to_domain).collect())
    }

    async fn count(&self) -> Result<u64, RecordStoreError> {
        apps::Entity::find().count(self.db.as_ref()).await.map_err(classify)
    }

    async fn create(&self, input: NewApp) -> Result<App, RecordStoreError> {
        let now = Utc::now().into();
        // Blob columns stay NotSet so the insert only names columns it writes.
        let model = apps::ActiveModel {
            id: Set(AppId::new().into_inner()),
            title: Set(input.title),
            description: Set(input.description),
            category: Set(input.category),
            tags: Set(input.tags),
            display_order: Set(input.display_order.unwrap_or(0)),
            download_link: Set(input.download_link),
            download_count: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = model.insert(self.db.as_ref()).await.map_err(classify)?;
        Ok(to_domain(model))
    }

    async fn update(&self, id: AppId, changes: AppChanges) -> Result<Option<App>, RecordStoreError> {
        let Some(existing) = apps::Entity::find_by_id(id.into_inner())
            .one(self.db.as_ref())
            .await
            .map_err(classify)?
        else {
            return Ok(None);
        };

        let mut model = existing.into_active_model();
        if let Some(title) = changes.title {
            model.title = Set(title);
        }
        if let Some(description) = changes.description {
            model.description = Set(description);
        }
        if let Some(category) = changes.category {
            model.category = Set(category);
        }
        if let Some(tags) = changes.tags {
            model.tags = Set(tags);
        }
        if let Some(link) = changes.download_link {
            model.download_link = Set(link);
        }
        if let Some(order) = changes.display_order {
            model.display_order = Set(order);
        }
        model.updated_at = Set(Utc::now().into());

        let model = model.update(self.db.as_ref()).await.map_err(classify)?;
        Ok(Some(to_domain(model)))
    }

    async fn delete(&self, id: AppId) -> Result<bool, RecordStoreError> {
        let result = apps::Entity::delete_by_id(id.into_inner())
            .exec(self.db.as_ref())
            .await
            .map_err(classify)?;
        Ok(result.rows_affected > 0)
    }

    async fn link_blob(&self, id: AppId, patch: &BlobPatch) -> Result<bool, RecordStoreError> {
        let result = apps::Entity::update_many()
            .set(patch_model(patch))
            .filter(apps::Column::Id.eq(id.into_inner()))
            .exec(self.db.as_ref())
            .await
            .map_err(classify)?;
        Ok(result.rows_affected > 0)
    }

    async fn clear_fields(&self, id: AppId, fields: &[AppField]) -> Result<bool, RecordStoreError> {
        let result = apps::Entity::update_many()
            .set(cleared_model(fields))
            .filter(apps::Column::Id.eq(id.into_inner()))
            .exec(self.db.as_ref())
            .await
            .map_err(classify)?;
        Ok(result.rows_affected > 0)
    }

    async fn increment_downloads(&self, id: AppId) -> Result<(), RecordStoreError> {
        apps::Entity::update_many()
            .col_expr(
                apps::Column::DownloadCount,
                Expr::col(apps::Column::DownloadCount).add(1),
            )
            .filter(apps::Column::Id.eq(id.into_inner()))
            .exec(self.db.as_ref())
            .await
            .map_err(classify)?;
        Ok(())
    }
}

/// Blob keys, read without touching optional columns.
#[derive(Debug, FromQueryResult)]
struct BlobRefsRow {
    file_path: Option<String>,
    image_path: Option<String>,
}

/// Package columns needed to serve a download.
#[derive(Debug, FromQueryResult)]
struct DownloadSourceRow {
    file_path: Option<String>,
    file_name: Option<String>,
    file_type: Option<DbFileType>,
    download_link: Option<String>,
}

fn blob_refs_query(id: Uuid) -> Select<apps::Entity> {
    apps::Entity::find_by_id(id)
        .select_only()
        .column(apps::Column::Id)
        .column(apps::Column::FilePath)
        .column(apps::Column::ImagePath)
}

fn download_source_query(id: Uuid) -> Select<apps::Entity> {
    apps::Entity::find_by_id(id)
        .select_only()
        .column(apps::Column::Id)
        .column(apps::Column::FilePath)
        .column(apps::Column::FileName)
        .column(apps::Column::FileType)
        .column(apps::Column::DownloadLink)
}

/// Active model nulling the given fields.
fn cleared_model(fields: &[AppField]) -> apps::ActiveModel {
    let mut model = apps::ActiveModel {
        updated_at: Set(Utc::now().into()),
        ..Default::default()
    };
    for field in fields {
        match field {
            AppField::FilePath => model.file_path = Set(None),
            AppField::FileName => model.file_name = Set(None),
            AppField::FileSize => model.file_size = Set(None),
            AppField::FileType => model.file_type = Set(None),
            AppField::DownloadLink => model.download_link = Set(None),
            AppField::ImagePath => model.image_path = Set(None),
            AppField::ImageUrl => model.image_url = Set(None),
        }
    }
    model
}

/// Active model carrying only the columns a patch writes.
fn patch_model(patch: &BlobPatch) -> apps::ActiveModel {
    let mut model = apps::ActiveModel {
        updated_at: Set(Utc::now().into()),
        ..Default::default()
    };

    match patch {
        BlobPatch::Package {
            file_path,
            file_name,
            file_size,
            file_type,
            download_link,
        } => {
            model.file_path = Set(Some(file_path.clone()));
            model.file_name = Set(Some(file_name.clone()));
            model.file_size = file_size.map_or(NotSet, |size| Set(Some(size)));
            model.file_type = file_type.map_or(NotSet, |t| Set(Some(to_db_file_type(t))));
            model.download_link = download_link
                .as_ref()
                .map_or(NotSet, |link| Set(Some(link.clone())));
        }
        BlobPatch::Image {
            image_path,
            image_url,
        } => {
            model.image_path = Set(Some(image_path.clone()));
            model.image_url = image_url
                .as_ref()
                .map_or(NotSet, |url| Set(Some(url.clone())));
        }
    }
    model
}

/// Maps a database error, recognising an undefined column on `apps`.
fn classify(err: DbErr) -> RecordStoreError {
    let message = err.to_string();
    match missing_column(&message).and_then(AppField::from_column) {
        Some(field) => RecordStoreError::MissingField(field),
        None => RecordStoreError::Backend(message),
    }
}

/// Extracts the column name from a Postgres "column ... does not exist" error.
///
/// Handles both `column "x" of relation "apps"` and `column apps.x`.
fn missing_column(message: &str) -> Option<&str> {
    if !message.contains("does not exist") {
        return None;
    }
    let start = message.find("column ")? + "column ".len();
    let rest = &message[start..];
    let token = match rest.strip_prefix('"') {
        Some(quoted) => quoted.split('"').next()?,
        None => rest.split_whitespace().next()?,
    };
    token.rsplit('.').next()
}

const fn to_db_file_type(file_type: FileType) -> DbFileType {
    match file_type {
        FileType::Apk => DbFileType::Apk,
        FileType::Ipa => DbFileType::Ipa,
    }
}

const fn from_db_file_type(file_type: DbFileType) -> FileType {
    match file_type {
        DbFileType::Apk => FileType::Apk,
        DbFileType::Ipa => FileType::Ipa,
    }
}

fn to_domain(model: apps::Model) -> App {
    App {
        id: AppId::from_uuid(model.id),
        title: model.title,
        description: model.description,
        category: model.category,
        tags: model.tags,
        display_order: model.display_order,
        download_link: model.download_link,
        file_path: model.file_path,
        file_name: model.file_name,
        file_size: model.file_size,
        file_type: model.file_type.map(from_db_file_type),
        image_path: model.image_path,
        image_url: model.image_url,
        download_count: model.download_count,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}
