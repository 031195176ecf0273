use std::sync::Arc;

use chrono::Utc;
use sea_orm::{ConnectionTrait, Database, Statement};

use client::{Client, CorrectionFlow, CorrectionState, EditorHeader, EditorRow, EnglishLabels, SourceVoucher};
use engine::{Currency, PostVoucherCmd, RowInput};
use migration::MigratorTrait;

async fn spawn_server() -> (Client, Arc<engine::Engine>) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "INSERT INTO users (username, password) VALUES (?, ?)",
        vec!["alice".into(), "password".into()],
    ))
    .await
    .unwrap();
    for (id, label) in [(1_i64, "Cash"), (2, "Patient revenue"), (3, "Receivables")] {
        db.execute(Statement::from_sql_and_values(
            backend,
            "INSERT INTO accounts (id, label, locked) VALUES (?, ?, ?)",
            vec![id.into(), label.into(), false.into()],
        ))
        .await
        .unwrap();
    }

    let engine = Arc::new(
        engine::Engine::builder()
            .database(db.clone())
            .build()
            .await
            .unwrap(),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = server::spawn_with_listener(engine.clone(), db, listener).unwrap();

    let client = Client::new(&format!("http://{addr}/")).unwrap();
    (client, engine)
}

async fn load_source(client: &Client, engine: &engine::Engine) -> SourceVoucher {
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

    let detail = client.voucher_detail("alice", "password", id).await.unwrap();
    SourceVoucher {
        header: EditorHeader {
            record_id: Some(detail.voucher.id),
            user_id: Some("alice".to_string()),
            project_id: Some(detail.voucher.project_id),
            currency: Some(detail.voucher.currency),
            trans_id: Some(detail.voucher.trans_id),
            description: Some(detail.voucher.description.clone()),
            ..Default::default()
        },
        rows: detail
            .rows
            .iter()
            .map(|row| EditorRow {
                account_id: row.account_id,
                debit_minor: row.debit_minor,
                credit_minor: row.credit_minor,
                ..Default::default()
            })
            .collect(),
    }
}

#[tokio::test]
async fn balanced_submission_ends_done() {
    let (client, engine) = spawn_server().await;
    let mut source = load_source(&client, &engine).await;

    // The user replaces the revenue booking with a receivable.
    source.rows = vec![
        EditorRow {
            account_id: 1,
            credit_minor: 100,
            ..Default::default()
        },
        EditorRow {
            account_id: 3,
            debit_minor: 100,
            ..Default::default()
        },
    ];

    let mut flow = CorrectionFlow::new(EnglishLabels);
    flow.set_source(source);
    let state = flow
        .submit(&client, "alice", "password")
        .await
        .unwrap()
        .clone();

    let CorrectionState::Done(result) = state else {
        panic!("expected Done, got {state:?}");
    };
    let reversal = engine.voucher_with_rows(result.reversal_id).await.unwrap();
    assert_eq!(reversal.rows[0].credit_minor, 100);
    assert_eq!(reversal.rows[1].debit_minor, 100);
}

#[tokio::test]
async fn unbalanced_submission_ends_errored_with_the_server_code() {
    let (client, engine) = spawn_server().await;
    let mut source = load_source(&client, &engine).await;

    // No offsetting row: the server must reject and the flow must surface
    // the taxonomy code.
    source.rows = vec![EditorRow {
        account_id: 1,
        credit_minor: 100,
        ..Default::default()
    }];

    let mut flow = CorrectionFlow::new(EnglishLabels);
    flow.set_source(source);
    let state = flow.submit(&client, "alice", "password").await.unwrap();

    assert_eq!(state.flag(), Some("VALIDATION_UNBALANCED"));
}
