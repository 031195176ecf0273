use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    Cashbox, CashboxFilter, CashboxPatch, DomainEvent, EngineError, EventAction, EventEntity,
    NewCashbox, ResultEngine, cashboxes,
};

use super::{Engine, with_tx};

impl Engine {
    /// List cashboxes, optionally filtered by project and auxiliary flag.
    pub async fn list_cashboxes(&self, filter: &CashboxFilter) -> ResultEngine<Vec<Cashbox>> {
        let mut query = cashboxes::Entity::find().order_by_asc(cashboxes::Column::Id);
        if let Some(project_id) = filter.project_id {
            query = query.filter(cashboxes::Column::ProjectId.eq(project_id));
        }
        if let Some(is_auxiliary) = filter.is_auxiliary {
            query = query.filter(cashboxes::Column::IsAuxiliary.eq(is_auxiliary));
        }

        let models = query.all(&self.database).await?;
        Ok(models.into_iter().map(Cashbox::from).collect())
    }

    /// Return a single cashbox.
    pub async fn cashbox(&self, id: i64) -> ResultEngine<Cashbox> {
        cashboxes::Entity::find_by_id(id)
            .one(&self.database)
            .await?
            .map(Cashbox::from)
            .ok_or_else(|| EngineError::KeyNotFound("cashbox not exists".to_string()))
    }

    /// Create a cashbox and announce it through the outbox.
    pub async fn create_cashbox(&self, new: NewCashbox, actor: &str) -> ResultEngine<i64> {
        with_tx!(self, |db_tx| {
            let model = cashboxes::ActiveModel {
                label: ActiveValue::Set(new.label.clone()),
                project_id: ActiveValue::Set(new.project_id),
                is_auxiliary: ActiveValue::Set(new.is_auxiliary),
                ..Default::default()
            }
            .insert(&db_tx)
            .await?;

            let event = DomainEvent::new(
                EventEntity::Cashbox,
                EventAction::Create,
                actor,
                serde_json::json!({ "id": model.id }),
                Utc::now(),
            );
            self.append_event(&db_tx, &event).await?;

            Ok(model.id)
        })
    }

    /// Apply a partial update and return the stored cashbox.
    pub async fn update_cashbox(
        &self,
        id: i64,
        patch: CashboxPatch,
        actor: &str,
    ) -> ResultEngine<Cashbox> {
        with_tx!(self, |db_tx| {
            let model = cashboxes::Entity::find_by_id(id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("cashbox not exists".to_string()))?;

            let mut active: cashboxes::ActiveModel = model.into();
            if let Some(label) = patch.label {
                active.label = ActiveValue::Set(label);
            }
            if let Some(project_id) = patch.project_id {
                active.project_id = ActiveValue::Set(project_id);
            }
            if let Some(is_auxiliary) = patch.is_auxiliary {
                active.is_auxiliary = ActiveValue::Set(is_auxiliary);
            }
            let updated = active.update(&db_tx).await?;

            let event = DomainEvent::new(
                EventEntity::Cashbox,
                EventAction::Update,
                actor,
                serde_json::json!({ "id": id }),
                Utc::now(),
            );
            self.append_event(&db_tx, &event).await?;

            Ok(Cashbox::from(updated))
        })
    }

    /// Remove a cashbox.
    pub async fn delete_cashbox(&self, id: i64, actor: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let res = cashboxes::Entity::delete_by_id(id).exec(&db_tx).await?;
            if res.rows_affected == 0 {
                return Err(EngineError::KeyNotFound("cashbox not exists".to_string()));
            }

            let event = DomainEvent::new(
                EventEntity::Cashbox,
                EventAction::Delete,
                actor,
                serde_json::json!({ "id": id }),
                Utc::now(),
            );
            self.append_event(&db_tx, &event).await?;

            Ok(())
        })
    }
}
