use std::collections::{HashMap, HashSet};

use sea_orm::{
    ConnectionTrait, DatabaseTransaction, QueryFilter, QueryOrder, Statement, TransactionTrait,
    prelude::*,
};
use uuid::Uuid;

use crate::{
    EngineError, PostVoucherCmd, ResultEngine, RowInput, Voucher, VoucherKind, VoucherRow,
    accounts, voucher_rows, vouchers,
};

use super::{Engine, with_tx};

impl Engine {
    /// Post a balanced primary voucher.
    ///
    /// This is the substrate the correction flow builds on: it assigns the
    /// next `trans_id` and persists the header with its rows in one
    /// transaction.
    pub async fn post_voucher(&self, cmd: PostVoucherCmd) -> ResultEngine<Uuid> {
        validate_rows(&cmd.rows)?;

        with_tx!(self, |db_tx| {
            let account_ids: Vec<i64> = cmd.rows.iter().map(|row| row.account_id).collect();
            self.require_postable_accounts(&db_tx, &account_ids).await?;

            let trans_id = next_trans_id(&db_tx).await?;
            let voucher = Voucher::new(
                trans_id,
                VoucherKind::Primary,
                cmd.project_id,
                cmd.currency,
                cmd.description.clone(),
                cmd.posted_at,
                cmd.created_by.clone(),
            );
            let rows = rows_for_voucher(voucher.id, &cmd.rows);
            insert_voucher_with_rows(&db_tx, &voucher, &rows).await?;

            Ok(voucher.id)
        })
    }

    /// Load a voucher with its rows, ordered as posted.
    pub async fn voucher_with_rows(&self, id: Uuid) -> ResultEngine<Voucher> {
        let model = vouchers::Entity::find_by_id(id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("voucher not exists".to_string()))?;
        let mut voucher = Voucher::try_from(model)?;

        let row_models = voucher_rows::Entity::find()
            .filter(voucher_rows::Column::VoucherId.eq(id.to_string()))
            .order_by_asc(voucher_rows::Column::Line)
            .all(&self.database)
            .await?;
        voucher.rows = row_models
            .into_iter()
            .map(VoucherRow::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;

        Ok(voucher)
    }

    /// Fails unless every account exists and accepts postings.
    pub(super) async fn require_postable_accounts(
        &self,
        db_tx: &DatabaseTransaction,
        account_ids: &[i64],
    ) -> ResultEngine<()> {
        let unique: HashSet<i64> = account_ids.iter().copied().collect();
        let models = accounts::Entity::find()
            .filter(accounts::Column::Id.is_in(unique.iter().copied()))
            .all(db_tx)
            .await?;
        let by_id: HashMap<i64, &accounts::Model> =
            models.iter().map(|model| (model.id, model)).collect();

        for account_id in unique {
            match by_id.get(&account_id) {
                None => {
                    return Err(EngineError::InvalidAccount(format!(
                        "account {account_id} not exists"
                    )));
                }
                Some(model) if model.locked => {
                    return Err(EngineError::InvalidAccount(format!(
                        "account {account_id} is locked against posting"
                    )));
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}

/// Validate row shape and the balance invariant.
///
/// Order matters for the error a caller sees: empty set first, then per-row
/// shape, then the debit/credit totals.
pub(super) fn validate_rows(rows: &[RowInput]) -> ResultEngine<()> {
    if rows.is_empty() {
        return Err(EngineError::EmptyRows);
    }

    let mut debit_total: i64 = 0;
    let mut credit_total: i64 = 0;
    for row in rows {
        if row.debit_minor < 0 || row.credit_minor < 0 {
            return Err(EngineError::Unbalanced(format!(
                "account {}: debit and credit must be >= 0",
                row.account_id
            )));
        }
        if (row.debit_minor == 0) == (row.credit_minor == 0) {
            return Err(EngineError::Unbalanced(format!(
                "account {}: a row must carry exactly one of debit or credit",
                row.account_id
            )));
        }
        debit_total += row.debit_minor;
        credit_total += row.credit_minor;
    }

    if debit_total != credit_total {
        return Err(EngineError::Unbalanced(format!(
            "debits {debit_total} != credits {credit_total}"
        )));
    }
    Ok(())
}

pub(super) fn rows_for_voucher(voucher_id: Uuid, inputs: &[RowInput]) -> Vec<VoucherRow> {
    inputs
        .iter()
        .enumerate()
        .map(|(line, input)| {
            let mut row = VoucherRow::new(
                voucher_id,
                line as i32,
                input.account_id,
                input.debit_minor,
                input.credit_minor,
            );
            row.description = input.description.clone();
            row.entity_id = input.entity_id;
            row.reference_id = input.reference_id;
            row
        })
        .collect()
}

/// Next human-facing sequence number, computed inside the caller's
/// transaction.
pub(super) async fn next_trans_id(db_tx: &DatabaseTransaction) -> ResultEngine<i64> {
    let backend = db_tx.get_database_backend();
    let stmt = Statement::from_string(
        backend,
        "SELECT COALESCE(MAX(trans_id), 0) AS max_trans_id FROM vouchers",
    );
    let row = db_tx.query_one(stmt).await?;
    let max: i64 = row
        .and_then(|r| r.try_get("", "max_trans_id").ok())
        .unwrap_or(0);
    Ok(max + 1)
}

pub(super) async fn insert_voucher_with_rows(
    db_tx: &DatabaseTransaction,
    voucher: &Voucher,
    rows: &[VoucherRow],
) -> ResultEngine<()> {
    vouchers::ActiveModel::from(voucher).insert(db_tx).await?;
    for row in rows {
        voucher_rows::ActiveModel::from(row).insert(db_tx).await?;
    }
    Ok(())
}
