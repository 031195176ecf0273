pub use accounts::Account;
pub use cashboxes::Cashbox;
pub use commands::{
    CashboxFilter, CashboxPatch, CorrectVoucherCmd, CorrectionDetails, NewCashbox, PostVoucherCmd,
    RowInput,
};
pub use currency::Currency;
pub use error::EngineError;
pub use ops::{CorrectionOutcome, Engine, EngineBuilder};
pub use outbox::{DomainEvent, EventAction, EventEntity};
pub use voucher_rows::VoucherRow;
pub use vouchers::{Voucher, VoucherKind};

mod accounts;
mod cashboxes;
mod commands;
mod currency;
mod error;
mod ops;
mod outbox;
mod voucher_rows;
mod vouchers;

type ResultEngine<T> = Result<T, EngineError>;
