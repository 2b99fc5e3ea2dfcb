//! Message repository for the visitor inbox.

use std::sync::Arc;

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use uuid::Uuid;

use folio_core::inbox::Message;
use folio_shared::types::{MessageId, PageRequest};

use crate::entities::messages;

/// Result of recording an admin reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyOutcome {
    /// The reply was stored.
    Replied(Message),
    /// Another reply landed first.
    AlreadyReplied,
    /// No such message.
    NotFound,
}

/// Message repository.
#[derive(Debug, Clone)]
pub struct MessageRepository {
    db: Arc<DatabaseConnection>,
}

impl MessageRepository {
    /// Creates a new message repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Lists a page of messages, newest first, with the total count.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, page: &PageRequest) -> Result<(Vec<Message>, u64), DbErr> {
        let total = messages::Entity::find().count(self.db.as_ref()).await?;
        let models = messages::Entity::find()
            .order_by_desc(messages::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(self.db.as_ref())
            .await?;
        Ok((models.into_iter().map(to_domain).collect(), total))
    }

    /// Finds a message by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: MessageId) -> Result<Option<Message>, DbErr> {
        let model = messages::Entity::find_by_id(id.into_inner())
            .one(self.db.as_ref())
            .await?;
        Ok(model.map(to_domain))
    }

    /// Stores a reply unless the message was already answered.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn reply(&self, id: MessageId, response: &str) -> Result<ReplyOutcome, DbErr> {
        let now: sea_orm::prelude::DateTimeWithTimeZone = Utc::now().into();
        let result = messages::Entity::update_many()
            .col_expr(messages::Column::AdminResponse, Expr::value(response))
            .col_expr(messages::Column::RepliedAt, Expr::value(now))
            .filter(messages::Column::Id.eq(id.into_inner()))
            .filter(messages::Column::RepliedAt.is_null())
            .exec(self.db.as_ref())
            .await?;

        let current = self.find_by_id(id).await?;
        Ok(match (result.rows_affected, current) {
            (_, None) => ReplyOutcome::NotFound,
            (0, Some(_)) => ReplyOutcome::AlreadyReplied,
            (_, Some(message)) => ReplyOutcome::Replied(message),
        })
    }

    /// Deletes a message; `false` if it did not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete(&self, id: MessageId) -> Result<bool, DbErr> {
        let result = messages::Entity::delete_by_id(id.into_inner())
            .exec(self.db.as_ref())
            .await?;
        Ok(result.rows_affected > 0)
    }

    /// Counts all messages.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn count(&self) -> Result<u64, DbErr> {
        messages::Entity::find().count(self.db.as_ref()).await
    }

    /// Counts messages without a reply.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn count_unreplied(&self) -> Result<u64, DbErr> {
        messages::Entity::find()
            .filter(messages::Column::RepliedAt.is_null())
            .count(self.db.as_ref())
            .await
    }
}

/// Creates a message row; used by the seeder.
///
/// # Errors
///
/// Returns an error if the database insert fails.
pub async fn insert_message(
    db: &DatabaseConnection,
    name: &str,
    email: &str,
    subject: Option<&str>,
    body: &str,
) -> Result<Message, DbErr> {
    use sea_orm::{ActiveModelTrait, Set};

    let model = messages::ActiveModel {
        id: Set(Uuid::now_v7()),
        name: Set(name.to_string()),
        email: Set(email.to_string()),
        subject: Set(subject.map(str::to_string)),
        message: Set(body.to_string()),
        created_at: Set(Utc::now().into()),
        replied_at: Set(None),
        admin_response: Set(None),
    }
    .insert(db)
    .await?;
    Ok(to_domain(model))
}

fn to_domain(model: messages::Model) -> Message {
    Message {
        id: MessageId::from_uuid(model.id),
        name: model.name,
        email: model.email,
        subject: model.subject,
        message: model.message,
        created_at: model.created_at.with_timezone(&Utc),
        replied_at: model.replied_at.map(|t| t.with_timezone(&Utc)),
        admin_response: model.admin_response,
    }
}
