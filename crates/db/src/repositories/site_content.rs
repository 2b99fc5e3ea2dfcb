//! Site content repository for the editable page sections.

use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use folio_core::content::{SiteContent, SiteSection};

use crate::entities::{sea_orm_active_enums::SectionName, site_content};

/// Site content repository.
#[derive(Debug, Clone)]
pub struct SiteContentRepository {
    db: Arc<DatabaseConnection>,
}

impl SiteContentRepository {
    /// Creates a new site content repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Lists every stored section.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<SiteContent>, DbErr> {
        let models = site_content::Entity::find()
            .order_by_asc(site_content::Column::SectionName)
            .all(self.db.as_ref())
            .await?;
        Ok(models.into_iter().map(to_domain).collect())
    }

    /// Finds one section.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find(&self, section: SiteSection) -> Result<Option<SiteContent>, DbErr> {
        let model = self.find_model(section).await?;
        Ok(model.map(to_domain))
    }

    /// Stores a section, inserting the row if it was never seeded.
    ///
    /// # Errors
    ///
    /// Returns an error if the database write fails.
    pub async fn save(&self, content: SiteContent) -> Result<SiteContent, DbErr> {
        let now = Utc::now().into();

        let model = match self.find_model(content.section_name).await? {
            Some(existing) => {
                let mut model = existing.into_active_model();
                model.title = Set(content.title);
                model.subtitle = Set(content.subtitle);
                model.content = Set(content.content);
                model.updated_at = Set(now);
                model.update(self.db.as_ref()).await?
            }
            None => {
                site_content::ActiveModel {
                    id: Set(Uuid::now_v7()),
                    section_name: Set(to_db_section(content.section_name)),
                    title: Set(content.title),
                    subtitle: Set(content.subtitle),
                    content: Set(content.content),
                    created_at: Set(now),
                    updated_at: Set(now),
                }
                .insert(self.db.as_ref())
                .await?
            }
        };

        tracing::info!(section = %content.section_name, "Saved site content");
        Ok(to_domain(model))
    }

    async fn find_model(&self, section: SiteSection) -> Result<Option<site_content::Model>, DbErr> {
        site_content::Entity::find()
            .filter(site_content::Column::SectionName.eq(to_db_section(section)))
            .one(self.db.as_ref())
            .await
    }
}

const fn to_db_section(section: SiteSection) -> SectionName {
    match section {
        SiteSection::HomeHero => SectionName::HomeHero,
        SiteSection::About => SectionName::About,
        SiteSection::Contact => SectionName::Contact,
    }
}

const fn from_db_section(section: SectionName) -> SiteSection {
    match section {
        SectionName::HomeHero => SiteSection::HomeHero,
        SectionName::About => SiteSection::About,
        SectionName::Contact => SiteSection::Contact,
    }
}

fn to_domain(model: site_content::Model) -> SiteContent {
    SiteContent {
        section_name: from_db_section(model.section_name),
        title: model.title,
        subtitle: model.subtitle,
        content: model.content,
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use serde_json::json;

    #[tokio::test]
    async fn test_find_converts_section() {
        let now = Utc::now().into();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![site_content::Model {
                id: Uuid::now_v7(),
                section_name: SectionName::About,
                title: Some("About Me".into()),
                subtitle: None,
                content: json!({"description": "Builder of apps"}),
                created_at: now,
                updated_at: now,
            }]])
            .into_connection();

        let section = SiteContentRepository::new(Arc::new(db))
            .find(SiteSection::About)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(section.section_name, SiteSection::About);
        assert_eq!(section.content["description"], "Builder of apps");
    }
}
