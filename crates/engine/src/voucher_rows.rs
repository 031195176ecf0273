//! Voucher rows.
//!
//! A [`VoucherRow`] is a single ledger line of a
//! [`Voucher`](crate::Voucher): an account plus either a debit or a credit
//! amount, never both.
//!
//! Amounts are stored as non-negative integer **minor units** (e.g. cents for
//! EUR). A voucher's rows must balance: the sum of debits equals the sum of
//! credits.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EngineError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoucherRow {
    pub id: Uuid,
    pub voucher_id: Uuid,
    /// Zero-based position within the voucher; preserves posting order.
    pub line: i32,
    pub account_id: i64,
    pub debit_minor: i64,
    pub credit_minor: i64,
    pub description: Option<String>,
    /// Optional link to a payer/payee entity.
    pub entity_id: Option<Uuid>,
    /// Optional link to a source document.
    pub reference_id: Option<Uuid>,
}

impl VoucherRow {
    pub fn new(
        voucher_id: Uuid,
        line: i32,
        account_id: i64,
        debit_minor: i64,
        credit_minor: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            voucher_id,
            line,
            account_id,
            debit_minor,
            credit_minor,
            description: None,
            entity_id: None,
            reference_id: None,
        }
    }

    /// Builds the reversing row for `original`: same account, magnitude and
    /// links, with debit and credit swapped.
    pub fn reversal_of(original: &VoucherRow, voucher_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            voucher_id,
            line: original.line,
            account_id: original.account_id,
            debit_minor: original.credit_minor,
            credit_minor: original.debit_minor,
            description: original.description.clone(),
            entity_id: original.entity_id,
            reference_id: original.reference_id,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "voucher_rows")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub voucher_id: String,
    pub line: i32,
    pub account_id: i64,
    pub debit_minor: i64,
    pub credit_minor: i64,
    pub description: Option<String>,
    pub entity_id: Option<String>,
    pub reference_id: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::vouchers::Entity",
        from = "Column::VoucherId",
        to = "super::vouchers::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Vouchers,
}

impl Related<super::vouchers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vouchers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&VoucherRow> for ActiveModel {
    fn from(row: &VoucherRow) -> Self {
        Self {
            id: ActiveValue::Set(row.id.to_string()),
            voucher_id: ActiveValue::Set(row.voucher_id.to_string()),
            line: ActiveValue::Set(row.line),
            account_id: ActiveValue::Set(row.account_id),
            debit_minor: ActiveValue::Set(row.debit_minor),
            credit_minor: ActiveValue::Set(row.credit_minor),
            description: ActiveValue::Set(row.description.clone()),
            entity_id: ActiveValue::Set(row.entity_id.map(|id| id.to_string())),
            reference_id: ActiveValue::Set(row.reference_id.map(|id| id.to_string())),
        }
    }
}

impl TryFrom<Model> for VoucherRow {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::InvalidId("invalid voucher row id".to_string()))?,
            voucher_id: Uuid::parse_str(&model.voucher_id)
                .map_err(|_| EngineError::InvalidId("invalid voucher id".to_string()))?,
            line: model.line,
            account_id: model.account_id,
            debit_minor: model.debit_minor,
            credit_minor: model.credit_minor,
            description: model.description,
            entity_id: model.entity_id.and_then(|s| Uuid::parse_str(&s).ok()),
            reference_id: model.reference_id.and_then(|s| Uuid::parse_str(&s).ok()),
        })
    }
}
