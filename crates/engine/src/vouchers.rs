//! Voucher primitives.
//!
//! A `Voucher` is a posted, balanced set of debit/credit rows under one
//! stable identifier. Corrections never mutate a posted voucher in place:
//! they append a reversal voucher and a correction voucher, both linked back
//! to the original through `origin_id`.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Currency, EngineError};

use super::voucher_rows;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoucherKind {
    /// An ordinary posted voucher, eligible for correction.
    Primary,
    /// The debit/credit swap of a primary voucher.
    Reversal,
    /// The replacement posting that supersedes a reversed primary.
    Correction,
}

impl VoucherKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Reversal => "reversal",
            Self::Correction => "correction",
        }
    }
}

impl TryFrom<&str> for VoucherKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "primary" => Ok(Self::Primary),
            "reversal" => Ok(Self::Reversal),
            "correction" => Ok(Self::Correction),
            other => Err(EngineError::InvalidId(format!(
                "invalid voucher kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voucher {
    pub id: Uuid,
    /// Human-facing sequence number, unique across all vouchers.
    pub trans_id: i64,
    pub kind: VoucherKind,
    pub project_id: i64,
    pub currency: Currency,
    pub description: String,
    pub posted_at: DateTime<Utc>,
    pub created_by: String,
    /// For reversal/correction vouchers: the original they replace.
    pub origin_id: Option<Uuid>,
    pub corrected_at: Option<DateTime<Utc>>,
    pub corrected_by: Option<String>,
    pub rows: Vec<voucher_rows::VoucherRow>,
}

impl Voucher {
    pub fn new(
        trans_id: i64,
        kind: VoucherKind,
        project_id: i64,
        currency: Currency,
        description: String,
        posted_at: DateTime<Utc>,
        created_by: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            trans_id,
            kind,
            project_id,
            currency,
            description,
            posted_at,
            created_by,
            origin_id: None,
            corrected_at: None,
            corrected_by: None,
            rows: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "vouchers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub trans_id: i64,
    pub kind: String,
    pub project_id: i64,
    pub currency: String,
    pub description: String,
    pub posted_at: DateTimeUtc,
    pub created_by: String,
    pub origin_id: Option<String>,
    pub corrected_at: Option<DateTimeUtc>,
    pub corrected_by: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::voucher_rows::Entity")]
    VoucherRows,
}

impl Related<super::voucher_rows::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VoucherRows.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Voucher> for ActiveModel {
    fn from(voucher: &Voucher) -> Self {
        Self {
            id: ActiveValue::Set(voucher.id.to_string()),
            trans_id: ActiveValue::Set(voucher.trans_id),
            kind: ActiveValue::Set(voucher.kind.as_str().to_string()),
            project_id: ActiveValue::Set(voucher.project_id),
            currency: ActiveValue::Set(voucher.currency.code().to_string()),
            description: ActiveValue::Set(voucher.description.clone()),
            posted_at: ActiveValue::Set(voucher.posted_at),
            created_by: ActiveValue::Set(voucher.created_by.clone()),
            origin_id: ActiveValue::Set(voucher.origin_id.map(|id| id.to_string())),
            corrected_at: ActiveValue::Set(voucher.corrected_at),
            corrected_by: ActiveValue::Set(voucher.corrected_by.clone()),
        }
    }
}

impl TryFrom<Model> for Voucher {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::InvalidId("invalid voucher id".to_string()))?,
            trans_id: model.trans_id,
            kind: VoucherKind::try_from(model.kind.as_str())?,
            project_id: model.project_id,
            currency: Currency::try_from(model.currency.as_str())?,
            description: model.description,
            posted_at: model.posted_at,
            created_by: model.created_by,
            origin_id: model
                .origin_id
                .and_then(|s| Uuid::parse_str(&s).ok()),
            corrected_at: model.corrected_at,
            corrected_by: model.corrected_by,
            rows: Vec::new(),
        })
    }
}
