//! Adds the cover image columns to apps.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            r"
ALTER TABLE apps ADD COLUMN IF NOT EXISTS image_path TEXT;
ALTER TABLE apps ADD COLUMN IF NOT EXISTS image_url TEXT;
",
        )
        .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            r"
ALTER TABLE apps DROP COLUMN IF EXISTS image_url;
ALTER TABLE apps DROP COLUMN IF EXISTS image_path;
",
        )
        .await?;
        Ok(())
    }
}
