use sea_orm::{
    QueryFilter, QueryOrder, TransactionTrait, prelude::*, sea_query::Expr,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    CorrectVoucherCmd, CorrectionDetails, Currency, DomainEvent, EngineError, EventAction,
    EventEntity, ResultEngine, Voucher, VoucherKind, VoucherRow, voucher_rows, vouchers,
};

use super::vouchers::{insert_voucher_with_rows, next_trans_id, rows_for_voucher, validate_rows};
use super::{Engine, with_tx};

/// Identifiers of a committed correction pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrectionOutcome {
    pub original_id: Uuid,
    pub reversal_id: Uuid,
    pub correction_id: Uuid,
}

/// Header details after the completeness check.
struct ValidatedHeader {
    project_id: i64,
    currency: Currency,
    trans_id: i64,
    reversal_description: String,
    correction_description: String,
}

fn validated_header(
    original_id: Uuid,
    details: &CorrectionDetails,
) -> ResultEngine<ValidatedHeader> {
    fn require<T>(value: Option<T>, field: &str) -> ResultEngine<T> {
        value.ok_or_else(|| {
            EngineError::HeaderIncomplete(format!("missing required header field: {field}"))
        })
    }

    let record_id = require(details.record_id, "record_id")?;
    let user_id = require(details.user_id.clone(), "user_id")?;
    let project_id = require(details.project_id, "project_id")?;
    let currency = require(details.currency, "currency")?;
    let trans_id = require(details.trans_id, "trans_id")?;

    if record_id != original_id {
        return Err(EngineError::HeaderIncomplete(
            "record_id does not match the voucher being corrected".to_string(),
        ));
    }
    if user_id.trim().is_empty() {
        return Err(EngineError::HeaderIncomplete(
            "missing required header field: user_id".to_string(),
        ));
    }

    // Client-localized descriptions win; otherwise fall back to plain labels
    // so the vouchers are never stored without one.
    let reversal_description = details
        .description
        .clone()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| format!("Reversal of voucher {trans_id}"));
    let correction_description = details
        .correction_description
        .clone()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| format!("Correction of voucher {trans_id}"));

    Ok(ValidatedHeader {
        project_id,
        currency,
        trans_id,
        reversal_description,
        correction_description,
    })
}

impl Engine {
    /// Correct a posted voucher.
    ///
    /// Atomically posts a reversal voucher (the exact debit/credit swap of
    /// the original's rows) and a correction voucher (the submitted rows),
    /// links both to the original and marks the original corrected. Either
    /// all three writes commit or none do.
    ///
    /// The original is claimed with a conditional update on
    /// `corrected_at IS NULL`, so of two concurrent attempts exactly one
    /// creates the pair and the other fails with
    /// [`EngineError::AlreadyCorrected`].
    pub async fn correct_voucher(
        &self,
        cmd: CorrectVoucherCmd,
    ) -> ResultEngine<CorrectionOutcome> {
        let header = validated_header(cmd.original_id, &cmd.details)?;
        validate_rows(&cmd.correction)?;

        with_tx!(self, |db_tx| {
            let original = vouchers::Entity::find_by_id(cmd.original_id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("voucher not exists".to_string()))?;

            if VoucherKind::try_from(original.kind.as_str())? != VoucherKind::Primary {
                return Err(EngineError::AlreadyCorrected(format!(
                    "voucher {} is itself part of a correction and cannot be corrected",
                    original.trans_id
                )));
            }
            if original.corrected_at.is_some() {
                return Err(EngineError::AlreadyCorrected(format!(
                    "voucher {} already has a correction",
                    original.trans_id
                )));
            }

            let account_ids: Vec<i64> =
                cmd.correction.iter().map(|row| row.account_id).collect();
            self.require_postable_accounts(&db_tx, &account_ids).await?;

            let row_models = voucher_rows::Entity::find()
                .filter(voucher_rows::Column::VoucherId.eq(cmd.original_id.to_string()))
                .order_by_asc(voucher_rows::Column::Line)
                .all(&db_tx)
                .await?;
            let original_rows = row_models
                .into_iter()
                .map(VoucherRow::try_from)
                .collect::<ResultEngine<Vec<_>>>()?;

            // Claim the original. This is the serialization point: a
            // concurrent correction of the same voucher updates zero rows
            // here and fails before writing anything.
            let claimed = vouchers::Entity::update_many()
                .col_expr(vouchers::Column::CorrectedAt, Expr::value(cmd.posted_at))
                .col_expr(vouchers::Column::CorrectedBy, Expr::value(cmd.actor.clone()))
                .filter(vouchers::Column::Id.eq(cmd.original_id.to_string()))
                .filter(vouchers::Column::CorrectedAt.is_null())
                .exec(&db_tx)
                .await?;
            if claimed.rows_affected == 0 {
                return Err(EngineError::AlreadyCorrected(format!(
                    "voucher {} already has a correction",
                    header.trans_id
                )));
            }

            let trans_id = next_trans_id(&db_tx).await?;

            let mut reversal = Voucher::new(
                trans_id,
                VoucherKind::Reversal,
                header.project_id,
                header.currency,
                header.reversal_description.clone(),
                cmd.posted_at,
                cmd.actor.clone(),
            );
            reversal.origin_id = Some(cmd.original_id);
            let reversal_rows: Vec<VoucherRow> = original_rows
                .iter()
                .map(|row| VoucherRow::reversal_of(row, reversal.id))
                .collect();
            insert_voucher_with_rows(&db_tx, &reversal, &reversal_rows).await?;

            let mut correction = Voucher::new(
                trans_id + 1,
                VoucherKind::Correction,
                header.project_id,
                header.currency,
                header.correction_description.clone(),
                cmd.posted_at,
                cmd.actor.clone(),
            );
            correction.origin_id = Some(cmd.original_id);
            let correction_rows = rows_for_voucher(correction.id, &cmd.correction);
            insert_voucher_with_rows(&db_tx, &correction, &correction_rows).await?;

            let outcome = CorrectionOutcome {
                original_id: cmd.original_id,
                reversal_id: reversal.id,
                correction_id: correction.id,
            };
            let event = DomainEvent::new(
                EventEntity::Voucher,
                EventAction::Correct,
                cmd.actor.clone(),
                serde_json::json!({
                    "original_id": outcome.original_id,
                    "reversal_id": outcome.reversal_id,
                    "correction_id": outcome.correction_id,
                }),
                cmd.posted_at,
            );
            self.append_event(&db_tx, &event).await?;

            Ok(outcome)
        })
    }
}
