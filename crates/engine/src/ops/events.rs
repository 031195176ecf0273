use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, QuerySelect, prelude::*,
};
use uuid::Uuid;

use crate::{DomainEvent, ResultEngine, outbox};

use super::Engine;

impl Engine {
    /// Append an event to the outbox inside the caller's transaction.
    ///
    /// The append commits (or rolls back) together with the write it
    /// announces; the publisher only ever sees committed events.
    pub(super) async fn append_event(
        &self,
        db_tx: &DatabaseTransaction,
        event: &DomainEvent,
    ) -> ResultEngine<()> {
        outbox::ActiveModel::from(event).insert(db_tx).await?;
        Ok(())
    }

    /// Oldest-first batch of events that have not been published yet.
    pub async fn pending_events(&self, limit: u64) -> ResultEngine<Vec<DomainEvent>> {
        let models = outbox::Entity::find()
            .filter(outbox::Column::PublishedAt.is_null())
            .order_by_asc(outbox::Column::CreatedAt)
            .limit(limit)
            .all(&self.database)
            .await?;

        models
            .into_iter()
            .map(DomainEvent::try_from)
            .collect::<ResultEngine<Vec<_>>>()
    }

    /// Record that an event reached its consumers.
    pub async fn mark_event_published(
        &self,
        id: Uuid,
        published_at: DateTime<Utc>,
    ) -> ResultEngine<()> {
        let active = outbox::ActiveModel {
            id: ActiveValue::Set(id.to_string()),
            published_at: ActiveValue::Set(Some(published_at)),
            ..Default::default()
        };
        active.update(&self.database).await?;
        Ok(())
    }
}
