use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Eur,
    Usd,
}

pub mod error {
    use super::*;

    /// Error body returned by every failing endpoint.
    ///
    /// `code` is drawn from a closed taxonomy and is what clients should
    /// branch on; `message` is human-readable and may change freely.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ErrorBody {
        pub code: String,
        pub message: String,
    }
}

pub mod voucher {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum VoucherKind {
        Primary,
        Reversal,
        Correction,
    }

    /// Shared header attributes of the voucher being corrected.
    ///
    /// Every field is optional at the wire layer: the service owns the
    /// completeness check and replies with a taxonomy code when a required
    /// field is missing. Unknown fields in the incoming JSON are ignored.
    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    pub struct TransactionDetails {
        pub record_id: Option<Uuid>,
        pub user_id: Option<String>,
        pub project_id: Option<i64>,
        pub currency: Option<Currency>,
        /// Human-facing sequence number of the original voucher.
        pub trans_id: Option<i64>,
        /// Description stamped on the reversal voucher.
        pub description: Option<String>,
        /// Description stamped on the replacement voucher.
        pub correction_description: Option<String>,
    }

    /// One proposed replacement ledger line.
    ///
    /// Amounts are integer minor units (e.g. cents); exactly one of
    /// `debit_minor`/`credit_minor` must be non-zero per row.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct CorrectionRow {
        pub account_id: i64,
        pub debit_minor: i64,
        pub credit_minor: i64,
        pub description: Option<String>,
        pub entity_id: Option<Uuid>,
        pub reference_id: Option<Uuid>,
    }

    /// Request body for `POST /vouchers/{id}/correct`.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct CorrectionRequest {
        pub transaction_details: TransactionDetails,
        pub correction: Vec<CorrectionRow>,
    }

    /// Identifiers of the reversal/correction pair plus the original they
    /// replace.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct CorrectionResult {
        pub original_id: Uuid,
        pub reversal_id: Uuid,
        pub correction_id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct VoucherHeaderView {
        pub id: Uuid,
        pub trans_id: i64,
        pub kind: VoucherKind,
        pub project_id: i64,
        pub currency: Currency,
        pub description: String,
        /// RFC3339 timestamp, including timezone offset.
        pub posted_at: DateTime<FixedOffset>,
        pub created_by: String,
        /// Set on reversal/correction vouchers: the original they replace.
        pub origin_id: Option<Uuid>,
        pub corrected: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct VoucherRowView {
        pub account_id: i64,
        pub debit_minor: i64,
        pub credit_minor: i64,
        pub description: Option<String>,
        pub entity_id: Option<Uuid>,
        pub reference_id: Option<Uuid>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct VoucherDetailResponse {
        pub voucher: VoucherHeaderView,
        pub rows: Vec<VoucherRowView>,
    }
}

pub mod cashbox {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CashboxNew {
        pub label: String,
        pub project_id: i64,
        pub is_auxiliary: bool,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CashboxUpdate {
        pub label: Option<String>,
        pub project_id: Option<i64>,
        pub is_auxiliary: Option<bool>,
    }

    /// Query-string filters for `GET /cashboxes`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CashboxListQuery {
        pub project_id: Option<i64>,
        pub is_auxiliary: Option<bool>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CashboxView {
        pub id: i64,
        pub label: String,
        pub project_id: i64,
        pub is_auxiliary: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CashboxCreated {
        pub id: i64,
    }
}
