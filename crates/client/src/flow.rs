//! Submission lifecycle for a voucher correction.
//!
//! The lifecycle is a single tagged state, so "pending and errored at the
//! same time" is unrepresentable. Replacing the source voucher does not move
//! the lifecycle; only submitting and its outcome do.

use api_types::voucher::CorrectionResult;
use thiserror::Error;
use uuid::Uuid;

use crate::builder::{CorrectionLabels, EditorHeader, EditorRow, build_correction_request};
use crate::http::{Client, ClientError};

/// The voucher loaded in the editor, as the correction tool sees it.
#[derive(Clone, Debug, Default)]
pub struct SourceVoucher {
    pub header: EditorHeader,
    pub rows: Vec<EditorRow>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum CorrectionState {
    /// Editing; nothing submitted yet.
    Input,
    /// A submission is in flight.
    Pending,
    /// The server created the reversal/correction pair.
    Done(CorrectionResult),
    /// The server rejected the submission; holds the taxonomy code.
    Errored(String),
}

impl CorrectionState {
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Error code for display, if the last submission failed.
    #[must_use]
    pub fn flag(&self) -> Option<&str> {
        match self {
            Self::Errored(code) => Some(code),
            _ => None,
        }
    }
}

/// Caller errors; these never change the lifecycle state.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FlowError {
    #[error("a submission is already pending")]
    SubmissionPending,
    #[error("no source voucher loaded")]
    MissingSource,
}

pub struct CorrectionFlow<L> {
    labels: L,
    source: Option<SourceVoucher>,
    state: CorrectionState,
}

impl<L: CorrectionLabels> CorrectionFlow<L> {
    pub fn new(labels: L) -> Self {
        Self {
            labels,
            source: None,
            state: CorrectionState::Input,
        }
    }

    #[must_use]
    pub fn state(&self) -> &CorrectionState {
        &self.state
    }

    /// Replace the voucher being corrected.
    ///
    /// Deliberately leaves the lifecycle untouched: switching the source is
    /// not a submission outcome.
    pub fn set_source(&mut self, source: SourceVoucher) {
        self.source = Some(source);
    }

    /// Build the request from the current editor state and enter `Pending`.
    ///
    /// Each call re-projects the editor state, so edits made after an error
    /// are honored on resubmit. Submitting while `Pending` is a caller error.
    pub fn begin_submit(
        &mut self,
    ) -> Result<(Uuid, api_types::voucher::CorrectionRequest), FlowError> {
        if self.state.is_pending() {
            return Err(FlowError::SubmissionPending);
        }
        let source = self.source.as_ref().ok_or(FlowError::MissingSource)?;

        let request = build_correction_request(&source.header, &source.rows, &self.labels);
        let record_id = request.transaction_details.record_id.unwrap_or_default();
        self.state = CorrectionState::Pending;
        Ok((record_id, request))
    }

    /// Resolve the in-flight submission.
    pub fn complete(&mut self, outcome: Result<CorrectionResult, ClientError>) {
        self.state = match outcome {
            Ok(result) => CorrectionState::Done(result),
            Err(err) => CorrectionState::Errored(err.code().to_string()),
        };
    }

    /// Submit the correction and drive the state to `Done` or `Errored`.
    pub async fn submit(
        &mut self,
        client: &Client,
        username: &str,
        password: &str,
    ) -> Result<&CorrectionState, FlowError> {
        let (record_id, request) = self.begin_submit()?;
        let outcome = client
            .correct_transaction(username, password, record_id, &request)
            .await;
        self.complete(outcome);
        Ok(self.state())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::EnglishLabels;

    fn source() -> SourceVoucher {
        SourceVoucher {
            header: EditorHeader {
                record_id: Some(Uuid::new_v4()),
                user_id: Some("alice".to_string()),
                project_id: Some(1),
                currency: Some(api_types::Currency::Eur),
                trans_id: Some(42),
                ..Default::default()
            },
            rows: vec![EditorRow {
                account_id: 1,
                credit_minor: 100,
                ..Default::default()
            }],
        }
    }

    fn api_error(code: &str) -> ClientError {
        ClientError::Api {
            status: 422,
            code: code.to_string(),
            message: "rejected".to_string(),
        }
    }

    fn result() -> CorrectionResult {
        CorrectionResult {
            original_id: Uuid::new_v4(),
            reversal_id: Uuid::new_v4(),
            correction_id: Uuid::new_v4(),
        }
    }

    #[test]
    fn starts_in_input() {
        let flow = CorrectionFlow::new(EnglishLabels);
        assert_eq!(*flow.state(), CorrectionState::Input);
    }

    #[test]
    fn submit_without_source_is_a_caller_error() {
        let mut flow = CorrectionFlow::new(EnglishLabels);
        assert_eq!(flow.begin_submit().unwrap_err(), FlowError::MissingSource);
        assert_eq!(*flow.state(), CorrectionState::Input);
    }

    #[test]
    fn successful_submission_ends_done() {
        let mut flow = CorrectionFlow::new(EnglishLabels);
        flow.set_source(source());

        let (record_id, request) = flow.begin_submit().unwrap();
        assert!(flow.state().is_pending());
        assert_eq!(Some(record_id), request.transaction_details.record_id);

        let result = result();
        flow.complete(Ok(result));
        assert_eq!(*flow.state(), CorrectionState::Done(result));
    }

    #[test]
    fn failed_submission_stores_the_error_code() {
        let mut flow = CorrectionFlow::new(EnglishLabels);
        flow.set_source(source());

        flow.begin_submit().unwrap();
        flow.complete(Err(api_error("VALIDATION_UNBALANCED")));

        assert_eq!(flow.state().flag(), Some("VALIDATION_UNBALANCED"));
        assert!(!flow.state().is_pending());
    }

    #[test]
    fn second_submit_while_pending_is_rejected() {
        let mut flow = CorrectionFlow::new(EnglishLabels);
        flow.set_source(source());

        flow.begin_submit().unwrap();
        assert_eq!(
            flow.begin_submit().unwrap_err(),
            FlowError::SubmissionPending
        );
        assert!(flow.state().is_pending());
    }

    #[test]
    fn resubmit_after_error_uses_current_editor_state() {
        let mut flow = CorrectionFlow::new(EnglishLabels);
        flow.set_source(source());

        flow.begin_submit().unwrap();
        flow.complete(Err(api_error("VALIDATION_UNBALANCED")));

        // The user fixes the rows, then resubmits.
        let mut fixed = source();
        fixed.rows.push(EditorRow {
            account_id: 3,
            debit_minor: 100,
            ..Default::default()
        });
        flow.set_source(fixed);

        let (_, request) = flow.begin_submit().unwrap();
        assert!(flow.state().is_pending());
        assert_eq!(request.correction.len(), 2);
    }

    #[test]
    fn replacing_the_source_keeps_the_lifecycle_state() {
        let mut flow = CorrectionFlow::new(EnglishLabels);
        flow.set_source(source());

        flow.begin_submit().unwrap();
        flow.complete(Err(api_error("NOT_FOUND")));

        flow.set_source(source());
        assert_eq!(flow.state().flag(), Some("NOT_FOUND"));
    }

    #[test]
    fn transport_failures_report_a_transport_code() {
        let err = ClientError::BaseUrl("nope".to_string());
        assert_eq!(err.code(), "TRANSPORT_FAILURE");
    }
}
