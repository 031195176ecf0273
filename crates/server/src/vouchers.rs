//! Voucher API endpoints

use api_types::voucher::{
    CorrectionRequest, CorrectionResult, VoucherDetailResponse, VoucherHeaderView,
    VoucherKind as ApiKind, VoucherRowView,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{FixedOffset, Utc};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};

fn map_kind(kind: engine::VoucherKind) -> ApiKind {
    match kind {
        engine::VoucherKind::Primary => ApiKind::Primary,
        engine::VoucherKind::Reversal => ApiKind::Reversal,
        engine::VoucherKind::Correction => ApiKind::Correction,
    }
}

fn map_currency(currency: engine::Currency) -> api_types::Currency {
    match currency {
        engine::Currency::Eur => api_types::Currency::Eur,
        engine::Currency::Usd => api_types::Currency::Usd,
    }
}

fn map_api_currency(currency: api_types::Currency) -> engine::Currency {
    match currency {
        api_types::Currency::Eur => engine::Currency::Eur,
        api_types::Currency::Usd => engine::Currency::Usd,
    }
}

pub async fn get_detail(
    Extension(_user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<VoucherDetailResponse>, ServerError> {
    let voucher = state.engine.voucher_with_rows(id).await?;

    let utc = FixedOffset::east_opt(0)
        .ok_or_else(|| ServerError::Generic("invalid UTC offset".to_string()))?;

    let header = VoucherHeaderView {
        id: voucher.id,
        trans_id: voucher.trans_id,
        kind: map_kind(voucher.kind),
        project_id: voucher.project_id,
        currency: map_currency(voucher.currency),
        description: voucher.description,
        posted_at: voucher.posted_at.with_timezone(&utc),
        created_by: voucher.created_by,
        origin_id: voucher.origin_id,
        corrected: voucher.corrected_at.is_some(),
    };

    let rows = voucher
        .rows
        .into_iter()
        .map(|row| VoucherRowView {
            account_id: row.account_id,
            debit_minor: row.debit_minor,
            credit_minor: row.credit_minor,
            description: row.description,
            entity_id: row.entity_id,
            reference_id: row.reference_id,
        })
        .collect();

    Ok(Json(VoucherDetailResponse {
        voucher: header,
        rows,
    }))
}

pub async fn correct(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CorrectionRequest>,
) -> Result<(StatusCode, Json<CorrectionResult>), ServerError> {
    let details = engine::CorrectionDetails {
        record_id: payload.transaction_details.record_id,
        user_id: payload.transaction_details.user_id,
        project_id: payload.transaction_details.project_id,
        currency: payload.transaction_details.currency.map(map_api_currency),
        trans_id: payload.transaction_details.trans_id,
        description: payload.transaction_details.description,
        correction_description: payload.transaction_details.correction_description,
    };
    let correction = payload
        .correction
        .into_iter()
        .map(|row| engine::RowInput {
            account_id: row.account_id,
            debit_minor: row.debit_minor,
            credit_minor: row.credit_minor,
            description: row.description,
            entity_id: row.entity_id,
            reference_id: row.reference_id,
        })
        .collect();

    let outcome = state
        .engine
        .correct_voucher(engine::CorrectVoucherCmd::new(
            id,
            details,
            correction,
            user.username.clone(),
            Utc::now(),
        ))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CorrectionResult {
            original_id: outcome.original_id,
            reversal_id: outcome.reversal_id,
            correction_id: outcome.correction_id,
        }),
    ))
}
