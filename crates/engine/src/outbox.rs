//! Transactional outbox for domain events.
//!
//! Events are appended inside the same database transaction as the write
//! they announce, then drained asynchronously by the application. A publish
//! failure is logged and retried on the next pass; it can never roll back a
//! committed write.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EngineError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventEntity {
    Voucher,
    Cashbox,
}

impl EventEntity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Voucher => "voucher",
            Self::Cashbox => "cashbox",
        }
    }
}

impl TryFrom<&str> for EventEntity {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "voucher" => Ok(Self::Voucher),
            "cashbox" => Ok(Self::Cashbox),
            other => Err(EngineError::InvalidEvent(format!(
                "invalid event entity: {other}"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    Correct,
    Create,
    Update,
    Delete,
}

impl EventAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Correct => "correct",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl TryFrom<&str> for EventAction {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "correct" => Ok(Self::Correct),
            "create" => Ok(Self::Create),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            other => Err(EngineError::InvalidEvent(format!(
                "invalid event action: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainEvent {
    pub id: Uuid,
    pub entity: EventEntity,
    pub action: EventAction,
    pub user_id: String,
    pub payload: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
}

impl DomainEvent {
    pub fn new(
        entity: EventEntity,
        action: EventAction,
        user_id: impl Into<String>,
        payload: serde_json::Value,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            entity,
            action,
            user_id: user_id.into(),
            payload,
            created_at,
            published_at: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "outbox")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub entity: String,
    pub action: String,
    pub user_id: String,
    pub payload: String,
    pub created_at: DateTimeUtc,
    pub published_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&DomainEvent> for ActiveModel {
    fn from(event: &DomainEvent) -> Self {
        Self {
            id: ActiveValue::Set(event.id.to_string()),
            entity: ActiveValue::Set(event.entity.as_str().to_string()),
            action: ActiveValue::Set(event.action.as_str().to_string()),
            user_id: ActiveValue::Set(event.user_id.clone()),
            payload: ActiveValue::Set(event.payload.to_string()),
            created_at: ActiveValue::Set(event.created_at),
            published_at: ActiveValue::Set(event.published_at),
        }
    }
}

impl TryFrom<Model> for DomainEvent {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::InvalidId("invalid event id".to_string()))?,
            entity: EventEntity::try_from(model.entity.as_str())?,
            action: EventAction::try_from(model.action.as_str())?,
            user_id: model.user_id,
            payload: serde_json::from_str(&model.payload)
                .map_err(|err| EngineError::InvalidEvent(format!("invalid payload: {err}")))?,
            created_at: model.created_at,
            published_at: model.published_at,
        })
    }
}
