//! Dashboard repository for admin overview counts.

use std::sync::Arc;

use sea_orm::{DatabaseConnection, DbErr, EntityTrait, PaginatorTrait};

use folio_core::dashboard::DashboardStats;

use super::MessageRepository;
use crate::entities::apps;

/// Dashboard repository.
#[derive(Debug, Clone)]
pub struct DashboardRepository {
    db: Arc<DatabaseConnection>,
}

impl DashboardRepository {
    /// Creates a new dashboard repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Message and app totals for the admin overview.
    ///
    /// # Errors
    ///
    /// Returns an error if any count query fails.
    pub async fn stats(&self) -> Result<DashboardStats, DbErr> {
        let messages = MessageRepository::new(Arc::clone(&self.db));
        let total_messages = messages.count().await?;
        let unreplied_messages = messages.count_unreplied().await?;
        let total_apps = apps::Entity::find().count(self.db.as_ref()).await?;

        Ok(DashboardStats {
            total_messages,
            unreplied_messages,
            total_apps,
        })
    }
}
