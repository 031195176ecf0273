//! Cashbox records.
//!
//! Cashboxes are plain reference data with no ledger invariants; the engine
//! exposes CRUD over them and announces mutations through the outbox.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cashbox {
    pub id: i64,
    pub label: String,
    pub project_id: i64,
    pub is_auxiliary: bool,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "cashboxes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub label: String,
    pub project_id: i64,
    pub is_auxiliary: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Cashbox {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            label: model.label,
            project_id: model.project_id,
            is_auxiliary: model.is_auxiliary,
        }
    }
}
