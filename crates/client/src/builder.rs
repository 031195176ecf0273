//! Correction request builder.
//!
//! The editor works on a superset of what the server accepts: resolved
//! labels, running balances, selection flags. The builder is the choke point
//! that projects that state into exactly the wire shape, so the server
//! receives the expected fields regardless of what the editor accumulates.

use api_types::Currency;
use api_types::voucher::{CorrectionRequest, CorrectionRow, TransactionDetails};
use chrono::{DateTime, FixedOffset};
use uuid::Uuid;

/// Formatting capability for the generated voucher descriptions.
///
/// Injected rather than looked up globally so the builder stays a pure
/// function; production code passes a localized implementation, tests pass
/// [`EnglishLabels`].
pub trait CorrectionLabels {
    fn reversal_description(&self, trans_id: i64) -> String;
    fn correction_description(&self, trans_id: i64) -> String;
}

/// Plain English labels.
#[derive(Clone, Copy, Debug, Default)]
pub struct EnglishLabels;

impl CorrectionLabels for EnglishLabels {
    fn reversal_description(&self, trans_id: i64) -> String {
        format!("Reversal of voucher {trans_id}")
    }

    fn correction_description(&self, trans_id: i64) -> String {
        format!("Correction of voucher {trans_id}")
    }
}

/// Header state of the voucher loaded in the editor.
///
/// Only the five shared attributes are ever submitted; the rest is
/// display-only and dropped by the builder.
#[derive(Clone, Debug, Default)]
pub struct EditorHeader {
    pub record_id: Option<Uuid>,
    pub user_id: Option<String>,
    pub project_id: Option<i64>,
    pub currency: Option<Currency>,
    pub trans_id: Option<i64>,
    // Display-only fields below.
    pub description: Option<String>,
    pub project_label: Option<String>,
    pub posted_at: Option<DateTime<FixedOffset>>,
    pub amount_minor: Option<i64>,
}

/// One editable row of the proposed replacement posting.
#[derive(Clone, Debug, Default)]
pub struct EditorRow {
    pub account_id: i64,
    pub debit_minor: i64,
    pub credit_minor: i64,
    pub description: Option<String>,
    pub entity_id: Option<Uuid>,
    pub reference_id: Option<Uuid>,
    // Display-only fields below.
    pub account_label: Option<String>,
    pub balance_minor: Option<i64>,
}

/// Project editor state into a [`CorrectionRequest`].
///
/// Pure function of its inputs. Missing header fields project to `None` and
/// are rejected server-side; the builder never fails.
pub fn build_correction_request(
    header: &EditorHeader,
    rows: &[EditorRow],
    labels: &impl CorrectionLabels,
) -> CorrectionRequest {
    let transaction_details = TransactionDetails {
        record_id: header.record_id,
        user_id: header.user_id.clone(),
        project_id: header.project_id,
        currency: header.currency,
        trans_id: header.trans_id,
        description: header.trans_id.map(|t| labels.reversal_description(t)),
        correction_description: header.trans_id.map(|t| labels.correction_description(t)),
    };

    let correction = rows
        .iter()
        .map(|row| CorrectionRow {
            account_id: row.account_id,
            debit_minor: row.debit_minor,
            credit_minor: row.credit_minor,
            description: row.description.clone(),
            entity_id: row.entity_id,
            reference_id: row.reference_id,
        })
        .collect();

    CorrectionRequest {
        transaction_details,
        correction,
    }
}
