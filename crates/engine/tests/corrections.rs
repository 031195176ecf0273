use chrono::Utc;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};
use uuid::Uuid;

use engine::{
    CorrectVoucherCmd, CorrectionDetails, Currency, Engine, EngineError, EventAction, EventEntity,
    PostVoucherCmd, RowInput, Voucher, VoucherKind,
};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let backend = db.get_database_backend();
    for (id, label, locked) in [
        (1_i64, "Cash", false),
        (2, "Patient revenue", false),
        (3, "Receivables", false),
        (9, "Closed 2025", true),
    ] {
        db.execute(Statement::from_sql_and_values(
            backend,
            "INSERT INTO accounts (id, label, locked) VALUES (?, ?, ?)",
            vec![id.into(), label.into(), locked.into()],
        ))
        .await
        .unwrap();
    }
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

async fn table_count(db: &DatabaseConnection, table: &str) -> i64 {
    let backend = db.get_database_backend();
    let row = db
        .query_one(Statement::from_string(
            backend,
            format!("SELECT COUNT(*) AS n FROM {table}"),
        ))
        .await
        .unwrap()
        .unwrap();
    row.try_get("", "n").unwrap()
}

async fn post_original(engine: &Engine) -> Voucher {
    let id = engine
        .post_voucher(PostVoucherCmd::new(
            1,
            Currency::Eur,
            "Patient invoice IV.2026.100",
            vec![RowInput::debit(1, 100), RowInput::credit(2, 100)],
            Utc::now(),
            "alice",
        ))
        .await
        .unwrap();
    engine.voucher_with_rows(id).await.unwrap()
}

fn details_for(voucher: &Voucher) -> CorrectionDetails {
    CorrectionDetails::for_voucher(
        voucher.id,
        "alice",
        voucher.project_id,
        voucher.currency,
        voucher.trans_id,
    )
}

fn balanced_correction() -> Vec<RowInput> {
    vec![RowInput::credit(1, 100), RowInput::debit(3, 100)]
}

fn correct_cmd(voucher: &Voucher, rows: Vec<RowInput>) -> CorrectVoucherCmd {
    CorrectVoucherCmd::new(voucher.id, details_for(voucher), rows, "alice", Utc::now())
}

#[tokio::test]
async fn correction_posts_reversal_and_replacement() {
    let (engine, _db) = engine_with_db().await;
    let original = post_original(&engine).await;

    let details = details_for(&original)
        .description("Reversal of voucher 1")
        .correction_description("Correction of voucher 1");
    let outcome = engine
        .correct_voucher(CorrectVoucherCmd::new(
            original.id,
            details,
            balanced_correction(),
            "alice",
            Utc::now(),
        ))
        .await
        .unwrap();

    assert_eq!(outcome.original_id, original.id);
    assert_ne!(outcome.reversal_id, outcome.correction_id);

    let reversal = engine.voucher_with_rows(outcome.reversal_id).await.unwrap();
    assert_eq!(reversal.kind, VoucherKind::Reversal);
    assert_eq!(reversal.origin_id, Some(original.id));
    assert_eq!(reversal.description, "Reversal of voucher 1");

    // The reversal is the exact debit/credit swap, row for row.
    assert_eq!(reversal.rows.len(), original.rows.len());
    for (reversed, posted) in reversal.rows.iter().zip(original.rows.iter()) {
        assert_eq!(reversed.account_id, posted.account_id);
        assert_eq!(reversed.debit_minor, posted.credit_minor);
        assert_eq!(reversed.credit_minor, posted.debit_minor);
    }

    let correction = engine
        .voucher_with_rows(outcome.correction_id)
        .await
        .unwrap();
    assert_eq!(correction.kind, VoucherKind::Correction);
    assert_eq!(correction.origin_id, Some(original.id));
    assert_eq!(correction.description, "Correction of voucher 1");
    assert_eq!(correction.rows.len(), 2);
    assert_eq!(correction.rows[0].account_id, 1);
    assert_eq!(correction.rows[0].credit_minor, 100);
    assert_eq!(correction.rows[1].account_id, 3);
    assert_eq!(correction.rows[1].debit_minor, 100);

    let original = engine.voucher_with_rows(original.id).await.unwrap();
    assert!(original.corrected_at.is_some());
    assert_eq!(original.corrected_by.as_deref(), Some("alice"));
}

#[tokio::test]
async fn correction_vouchers_get_the_next_trans_ids() {
    let (engine, _db) = engine_with_db().await;
    let original = post_original(&engine).await;

    let outcome = engine
        .correct_voucher(correct_cmd(&original, balanced_correction()))
        .await
        .unwrap();

    let reversal = engine.voucher_with_rows(outcome.reversal_id).await.unwrap();
    let correction = engine
        .voucher_with_rows(outcome.correction_id)
        .await
        .unwrap();
    assert_eq!(reversal.trans_id, original.trans_id + 1);
    assert_eq!(correction.trans_id, original.trans_id + 2);
}

#[tokio::test]
async fn default_descriptions_reference_the_original_trans_id() {
    let (engine, _db) = engine_with_db().await;
    let original = post_original(&engine).await;

    let outcome = engine
        .correct_voucher(correct_cmd(&original, balanced_correction()))
        .await
        .unwrap();

    let reversal = engine.voucher_with_rows(outcome.reversal_id).await.unwrap();
    let correction = engine
        .voucher_with_rows(outcome.correction_id)
        .await
        .unwrap();
    assert!(reversal.description.contains(&original.trans_id.to_string()));
    assert!(
        correction
            .description
            .contains(&original.trans_id.to_string())
    );
}

#[tokio::test]
async fn unbalanced_correction_rejected_without_writes() {
    let (engine, db) = engine_with_db().await;
    let original = post_original(&engine).await;

    // One credit with no offsetting debit.
    let cmd = correct_cmd(&original, vec![RowInput::credit(1, 100)]);
    let err = engine.correct_voucher(cmd.clone()).await.unwrap_err();
    assert!(matches!(err, EngineError::Unbalanced(_)));
    assert_eq!(err.code(), "VALIDATION_UNBALANCED");

    assert_eq!(table_count(&db, "vouchers").await, 1);
    assert_eq!(table_count(&db, "voucher_rows").await, 2);
    assert_eq!(table_count(&db, "outbox").await, 0);
    let original = engine.voucher_with_rows(original.id).await.unwrap();
    assert!(original.corrected_at.is_none());

    // Rejection is idempotent: same request, same code, still no writes.
    let err = engine.correct_voucher(cmd).await.unwrap_err();
    assert_eq!(err.code(), "VALIDATION_UNBALANCED");
    assert_eq!(table_count(&db, "vouchers").await, 1);
}

#[tokio::test]
async fn row_with_both_sides_set_is_rejected() {
    let (engine, _db) = engine_with_db().await;
    let original = post_original(&engine).await;

    let bad_row = RowInput {
        account_id: 1,
        debit_minor: 50,
        credit_minor: 50,
        description: None,
        entity_id: None,
        reference_id: None,
    };
    let err = engine
        .correct_voucher(correct_cmd(&original, vec![bad_row.clone(), bad_row]))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "VALIDATION_UNBALANCED");
}

#[tokio::test]
async fn empty_correction_rejected() {
    let (engine, db) = engine_with_db().await;
    let original = post_original(&engine).await;

    let err = engine
        .correct_voucher(correct_cmd(&original, Vec::new()))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::EmptyRows);
    assert_eq!(err.code(), "VALIDATION_EMPTY_ROWS");
    assert_eq!(table_count(&db, "vouchers").await, 1);
}

#[tokio::test]
async fn incomplete_header_rejected() {
    let (engine, _db) = engine_with_db().await;
    let original = post_original(&engine).await;

    let mut details = details_for(&original);
    details.user_id = None;
    let err = engine
        .correct_voucher(CorrectVoucherCmd::new(
            original.id,
            details,
            balanced_correction(),
            "alice",
            Utc::now(),
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::HeaderIncomplete(_)));
    assert_eq!(err.code(), "VALIDATION_HEADER_INCOMPLETE");
}

#[tokio::test]
async fn header_record_id_must_match_the_addressed_voucher() {
    let (engine, _db) = engine_with_db().await;
    let original = post_original(&engine).await;

    let mut details = details_for(&original);
    details.record_id = Some(Uuid::new_v4());
    let err = engine
        .correct_voucher(CorrectVoucherCmd::new(
            original.id,
            details,
            balanced_correction(),
            "alice",
            Utc::now(),
        ))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "VALIDATION_HEADER_INCOMPLETE");
}

#[tokio::test]
async fn unknown_account_rejected() {
    let (engine, db) = engine_with_db().await;
    let original = post_original(&engine).await;

    let rows = vec![RowInput::credit(1, 100), RowInput::debit(42, 100)];
    let err = engine
        .correct_voucher(correct_cmd(&original, rows))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAccount(_)));
    assert_eq!(err.code(), "VALIDATION_INVALID_ACCOUNT");
    assert_eq!(table_count(&db, "vouchers").await, 1);
}

#[tokio::test]
async fn locked_account_rejected() {
    let (engine, _db) = engine_with_db().await;
    let original = post_original(&engine).await;

    let rows = vec![RowInput::credit(1, 100), RowInput::debit(9, 100)];
    let err = engine
        .correct_voucher(correct_cmd(&original, rows))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "VALIDATION_INVALID_ACCOUNT");
}

#[tokio::test]
async fn missing_original_not_found() {
    let (engine, _db) = engine_with_db().await;

    let ghost_id = Uuid::new_v4();
    let details = CorrectionDetails::for_voucher(ghost_id, "alice", 1, Currency::Eur, 7);
    let err = engine
        .correct_voucher(CorrectVoucherCmd::new(
            ghost_id,
            details,
            balanced_correction(),
            "alice",
            Utc::now(),
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
    assert_eq!(err.code(), "NOT_FOUND");
}

#[tokio::test]
async fn second_correction_conflicts() {
    let (engine, db) = engine_with_db().await;
    let original = post_original(&engine).await;

    engine
        .correct_voucher(correct_cmd(&original, balanced_correction()))
        .await
        .unwrap();

    let err = engine
        .correct_voucher(correct_cmd(&original, balanced_correction()))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::AlreadyCorrected(_)));
    assert_eq!(err.code(), "CONFLICT_ALREADY_CORRECTED");

    // Exactly one correction pair exists.
    assert_eq!(table_count(&db, "vouchers").await, 3);
}

#[tokio::test]
async fn correction_vouchers_are_not_correctable() {
    let (engine, _db) = engine_with_db().await;
    let original = post_original(&engine).await;

    let outcome = engine
        .correct_voucher(correct_cmd(&original, balanced_correction()))
        .await
        .unwrap();

    let correction = engine
        .voucher_with_rows(outcome.correction_id)
        .await
        .unwrap();
    let err = engine
        .correct_voucher(correct_cmd(&correction, balanced_correction()))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "CONFLICT_ALREADY_CORRECTED");
}

#[tokio::test]
async fn correction_appends_an_outbox_event() {
    let (engine, _db) = engine_with_db().await;
    let original = post_original(&engine).await;

    let outcome = engine
        .correct_voucher(correct_cmd(&original, balanced_correction()))
        .await
        .unwrap();

    let events = engine.pending_events(10).await.unwrap();
    assert_eq!(events.len(), 1);
    let event = &events[0];
    assert_eq!(event.entity, EventEntity::Voucher);
    assert_eq!(event.action, EventAction::Correct);
    assert_eq!(event.user_id, "alice");
    assert_eq!(
        event.payload["original_id"],
        serde_json::json!(original.id)
    );
    assert_eq!(
        event.payload["reversal_id"],
        serde_json::json!(outcome.reversal_id)
    );
    assert_eq!(
        event.payload["correction_id"],
        serde_json::json!(outcome.correction_id)
    );

    engine
        .mark_event_published(event.id, Utc::now())
        .await
        .unwrap();
    assert!(engine.pending_events(10).await.unwrap().is_empty());
}

#[tokio::test]
async fn post_voucher_rejects_unbalanced_rows() {
    let (engine, db) = engine_with_db().await;

    let err = engine
        .post_voucher(PostVoucherCmd::new(
            1,
            Currency::Eur,
            "Broken voucher",
            vec![RowInput::debit(1, 100), RowInput::credit(2, 90)],
            Utc::now(),
            "alice",
        ))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "VALIDATION_UNBALANCED");
    assert_eq!(table_count(&db, "vouchers").await, 0);
    assert_eq!(table_count(&db, "voucher_rows").await, 0);
}
