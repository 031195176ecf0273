//! Command structs for engine operations.
//!
//! These types group parameters for write operations (posting, correcting,
//! cashbox CRUD), keeping call sites readable and avoiding long argument
//! lists.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::Currency;

/// Shared header attributes of the voucher being corrected, as submitted.
///
/// All fields are optional on purpose: the submission layer forwards whatever
/// the client sent, and [`Engine::correct_voucher`](crate::Engine::correct_voucher)
/// owns the completeness check.
#[derive(Clone, Debug, Default)]
pub struct CorrectionDetails {
    pub record_id: Option<Uuid>,
    pub user_id: Option<String>,
    pub project_id: Option<i64>,
    pub currency: Option<Currency>,
    pub trans_id: Option<i64>,
    /// Description stamped on the reversal voucher.
    pub description: Option<String>,
    /// Description stamped on the replacement voucher.
    pub correction_description: Option<String>,
}

impl CorrectionDetails {
    /// Details with the five required header fields filled in.
    #[must_use]
    pub fn for_voucher(
        record_id: Uuid,
        user_id: impl Into<String>,
        project_id: i64,
        currency: Currency,
        trans_id: i64,
    ) -> Self {
        Self {
            record_id: Some(record_id),
            user_id: Some(user_id.into()),
            project_id: Some(project_id),
            currency: Some(currency),
            trans_id: Some(trans_id),
            description: None,
            correction_description: None,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn correction_description(mut self, description: impl Into<String>) -> Self {
        self.correction_description = Some(description.into());
        self
    }
}

/// One proposed ledger row, as submitted.
#[derive(Clone, Debug)]
pub struct RowInput {
    pub account_id: i64,
    pub debit_minor: i64,
    pub credit_minor: i64,
    pub description: Option<String>,
    pub entity_id: Option<Uuid>,
    pub reference_id: Option<Uuid>,
}

impl RowInput {
    /// A debit row for `amount_minor` on `account_id`.
    #[must_use]
    pub fn debit(account_id: i64, amount_minor: i64) -> Self {
        Self {
            account_id,
            debit_minor: amount_minor,
            credit_minor: 0,
            description: None,
            entity_id: None,
            reference_id: None,
        }
    }

    /// A credit row for `amount_minor` on `account_id`.
    #[must_use]
    pub fn credit(account_id: i64, amount_minor: i64) -> Self {
        Self {
            account_id,
            debit_minor: 0,
            credit_minor: amount_minor,
            description: None,
            entity_id: None,
            reference_id: None,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn entity_id(mut self, entity_id: Uuid) -> Self {
        self.entity_id = Some(entity_id);
        self
    }

    #[must_use]
    pub fn reference_id(mut self, reference_id: Uuid) -> Self {
        self.reference_id = Some(reference_id);
        self
    }
}

/// Correct a posted voucher: reverse it and post a replacement.
#[derive(Clone, Debug)]
pub struct CorrectVoucherCmd {
    /// Id of the voucher being corrected, as addressed by the caller.
    pub original_id: Uuid,
    pub details: CorrectionDetails,
    /// Ordered rows of the replacement voucher.
    pub correction: Vec<RowInput>,
    /// Authenticated user performing the correction.
    pub actor: String,
    pub posted_at: DateTime<Utc>,
}

impl CorrectVoucherCmd {
    #[must_use]
    pub fn new(
        original_id: Uuid,
        details: CorrectionDetails,
        correction: Vec<RowInput>,
        actor: impl Into<String>,
        posted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            original_id,
            details,
            correction,
            actor: actor.into(),
            posted_at,
        }
    }
}

/// Post a primary voucher.
///
/// Substrate for the correction flow and for tests; not a general-ledger
/// feature surface.
#[derive(Clone, Debug)]
pub struct PostVoucherCmd {
    pub project_id: i64,
    pub currency: Currency,
    pub description: String,
    pub rows: Vec<RowInput>,
    pub posted_at: DateTime<Utc>,
    pub created_by: String,
}

impl PostVoucherCmd {
    #[must_use]
    pub fn new(
        project_id: i64,
        currency: Currency,
        description: impl Into<String>,
        rows: Vec<RowInput>,
        posted_at: DateTime<Utc>,
        created_by: impl Into<String>,
    ) -> Self {
        Self {
            project_id,
            currency,
            description: description.into(),
            rows,
            posted_at,
            created_by: created_by.into(),
        }
    }
}

/// Create a cashbox.
#[derive(Clone, Debug)]
pub struct NewCashbox {
    pub label: String,
    pub project_id: i64,
    pub is_auxiliary: bool,
}

/// Partial update of a cashbox; `None` keeps the stored value.
#[derive(Clone, Debug, Default)]
pub struct CashboxPatch {
    pub label: Option<String>,
    pub project_id: Option<i64>,
    pub is_auxiliary: Option<bool>,
}

/// Filters for listing cashboxes.
#[derive(Clone, Copy, Debug, Default)]
pub struct CashboxFilter {
    pub project_id: Option<i64>,
    pub is_auxiliary: Option<bool>,
}
