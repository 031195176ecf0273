//! Client-side voucher correction tooling.
//!
//! Three pieces, layered bottom-up:
//! - [`builder`]: projects UI editor state into the wire-accepted
//!   [`CorrectionRequest`](api_types::voucher::CorrectionRequest) shape.
//! - [`CorrectionFlow`]: the submission lifecycle
//!   (`Input -> Pending -> Done | Errored`).
//! - [`Client`]: the HTTP transport.

pub use builder::{
    CorrectionLabels, EditorHeader, EditorRow, EnglishLabels, build_correction_request,
};
pub use flow::{CorrectionFlow, CorrectionState, FlowError, SourceVoucher};
pub use http::{Client, ClientError};

mod builder;
mod flow;
mod http;
