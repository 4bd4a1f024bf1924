//! End-to-end tests for the ledger service against a throwaway store file.

use chrono::{Duration, Local, NaiveDate};
use loanbook::application_impl::{Argon2CredentialHasher, RealLedgerService};
use loanbook::application_port::{LedgerError, LedgerService, NewBorrower, NewLoan};
use loanbook::domain_model::{BorrowerId, LoanId, LoanStatus};
use loanbook::domain_port::{BorrowerRepo, CredentialRepo, LoanRepo, PaymentRepo, TxManager};
use loanbook::infra_sqlite::{
    SchemaInitializer, SqliteBorrowerRepo, SqliteCredentialRepo, SqliteLoanRepo,
    SqlitePaymentRepo, SqliteStore, SqliteTxManager,
};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

struct Harness {
    // owns the directory for the lifetime of the test
    _dir: TempDir,
    store: SqliteStore,
    ledger: RealLedgerService,
    report_path: PathBuf,
}

async fn setup() -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let report_path = dir.path().join("loan_report.csv");

    let store = SqliteStore::connect(dir.path().join("loans.db"))
        .await
        .unwrap();
    SchemaInitializer::new(store.pool()).run().await.unwrap();

    let borrower_repo: Arc<dyn BorrowerRepo> = Arc::new(SqliteBorrowerRepo::new(store.pool()));
    let loan_repo: Arc<dyn LoanRepo> = Arc::new(SqliteLoanRepo::new(store.pool()));
    let payment_repo: Arc<dyn PaymentRepo> = Arc::new(SqlitePaymentRepo::new(store.pool()));
    let tx_manager: Arc<dyn TxManager> = Arc::new(SqliteTxManager::new(store.pool()));

    let ledger = RealLedgerService::new(
        borrower_repo,
        loan_repo,
        payment_repo,
        tx_manager,
        report_path.clone(),
    );

    Harness {
        _dir: dir,
        store,
        ledger,
        report_path,
    }
}

fn borrower(full_name: &str) -> NewBorrower {
    NewBorrower {
        full_name: full_name.to_string(),
        contact: Some("0917-000-0000".to_string()),
        email: None,
        address: None,
        id_type: Some("Passport".to_string()),
        id_number: Some("P1234567".to_string()),
    }
}

fn loan(borrower_id: BorrowerId, amount: f64, start_date: NaiveDate) -> NewLoan {
    NewLoan {
        borrower_id,
        amount,
        interest_rate: 5.0,
        term_months: 12,
        start_date,
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[tokio::test]
async fn borrower_ids_are_strictly_increasing() {
    let h = setup().await;

    let first = h.ledger.add_borrower(borrower("Juan Dela Cruz")).await.unwrap();
    let second = h.ledger.add_borrower(borrower("Maria Santos")).await.unwrap();
    let third = h.ledger.add_borrower(borrower("Jose Rizal")).await.unwrap();

    assert!(first < second);
    assert!(second < third);

    let names = h.ledger.get_borrower_names().await.unwrap();
    assert_eq!(names, vec!["Juan Dela Cruz", "Maria Santos", "Jose Rizal"]);
}

#[tokio::test]
async fn balance_is_principal_minus_payments() {
    let h = setup().await;

    let b = h.ledger.add_borrower(borrower("Juan Dela Cruz")).await.unwrap();
    let l = h.ledger.add_loan(loan(b, 1000.0, today())).await.unwrap();

    assert_eq!(h.ledger.get_loan_balance(l).await.unwrap(), 1000.0);

    let after_first = h.ledger.record_payment(l, 300.0, today()).await.unwrap();
    assert_eq!(after_first, 700.0);

    let after_second = h.ledger.record_payment(l, 150.0, today()).await.unwrap();
    assert_eq!(after_second, 550.0);

    assert_eq!(h.ledger.get_loan_balance(l).await.unwrap(), 550.0);

    // the derived balance equals the snapshot on the most recent payment
    let summary = h.ledger.get_loan_summary(l).await.unwrap();
    assert_eq!(summary.payments.len(), 2);
    assert_eq!(summary.payments.last().unwrap().balance_after_payment, 550.0);
}

#[tokio::test]
async fn payment_on_young_loan_keeps_it_active() {
    let h = setup().await;

    let b = h.ledger.add_borrower(borrower("Juan Dela Cruz")).await.unwrap();
    let start = today() - Duration::days(5);
    let l = h.ledger.add_loan(loan(b, 1000.0, start)).await.unwrap();

    h.ledger.record_payment(l, 200.0, today()).await.unwrap();

    let summary = h.ledger.get_loan_summary(l).await.unwrap();
    assert_eq!(summary.loan.status, LoanStatus::Active);
}

#[tokio::test]
async fn unpaid_loan_older_than_thirty_days_goes_overdue() {
    let h = setup().await;

    let b = h.ledger.add_borrower(borrower("Juan Dela Cruz")).await.unwrap();
    let start = today() - Duration::days(40);
    let l = h.ledger.add_loan(loan(b, 1000.0, start)).await.unwrap();

    let balance = h.ledger.record_payment(l, 200.0, today()).await.unwrap();
    assert_eq!(balance, 800.0);

    let summary = h.ledger.get_loan_summary(l).await.unwrap();
    assert_eq!(summary.loan.status, LoanStatus::Overdue);
}

#[tokio::test]
async fn full_payment_marks_the_loan_paid_even_when_old() {
    let h = setup().await;

    let b = h.ledger.add_borrower(borrower("Juan Dela Cruz")).await.unwrap();
    let start = today() - Duration::days(40);
    let l = h.ledger.add_loan(loan(b, 1000.0, start)).await.unwrap();

    let balance = h.ledger.record_payment(l, 1000.0, today()).await.unwrap();
    assert_eq!(balance, 0.0);

    let summary = h.ledger.get_loan_summary(l).await.unwrap();
    assert_eq!(summary.loan.status, LoanStatus::Paid);
}

#[tokio::test]
async fn overpayment_is_accepted_and_leaves_a_negative_snapshot() {
    let h = setup().await;

    let b = h.ledger.add_borrower(borrower("Juan Dela Cruz")).await.unwrap();
    let l = h.ledger.add_loan(loan(b, 500.0, today())).await.unwrap();

    let balance = h.ledger.record_payment(l, 600.0, today()).await.unwrap();
    assert_eq!(balance, -100.0);

    let summary = h.ledger.get_loan_summary(l).await.unwrap();
    assert_eq!(summary.loan.status, LoanStatus::Paid);
    assert_eq!(summary.payments[0].balance_after_payment, -100.0);

    // a later payment keeps the loan paid, only driving the balance further down
    let balance = h.ledger.record_payment(l, 50.0, today()).await.unwrap();
    assert_eq!(balance, -150.0);
    let summary = h.ledger.get_loan_summary(l).await.unwrap();
    assert_eq!(summary.loan.status, LoanStatus::Paid);
}

#[tokio::test]
async fn payment_against_unknown_loan_is_not_found() {
    let h = setup().await;

    let err = h
        .ledger
        .record_payment(LoanId(99), 10.0, today())
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::LoanNotFound));
}

#[tokio::test]
async fn loan_for_unknown_borrower_is_rejected() {
    let h = setup().await;

    let err = h
        .ledger
        .add_loan(loan(BorrowerId(42), 1000.0, today()))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::Rejected));
}

#[tokio::test]
async fn borrower_search_is_substring_match() {
    let h = setup().await;

    h.ledger.add_borrower(borrower("Juan Dela Cruz")).await.unwrap();
    h.ledger.add_borrower(borrower("Maria Santos")).await.unwrap();

    let hits = h.ledger.search_borrowers("Juan").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].full_name, "Juan Dela Cruz");

    // "z" only appears inside "Dela Cruz"
    let hits = h.ledger.search_borrowers("z").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].full_name, "Juan Dela Cruz");

    // SQLite LIKE folds ASCII case
    let hits = h.ledger.search_borrowers("maria").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].full_name, "Maria Santos");

    let hits = h.ledger.search_borrowers("nobody").await.unwrap();
    assert!(hits.is_empty());
}

#[tokio::test]
async fn loan_search_matches_name_and_id() {
    let h = setup().await;

    let juan = h.ledger.add_borrower(borrower("Juan Dela Cruz")).await.unwrap();
    let maria = h.ledger.add_borrower(borrower("Maria Santos")).await.unwrap();
    let l1 = h.ledger.add_loan(loan(juan, 1000.0, today())).await.unwrap();
    h.ledger.add_loan(loan(maria, 2000.0, today())).await.unwrap();

    let hits = h.ledger.search_loans("Santos").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].amount, 2000.0);

    let hits = h.ledger.search_loans(&l1.to_string()).await.unwrap();
    assert!(hits.iter().any(|row| row.loan_id == l1));
}

#[tokio::test]
async fn exact_name_lookup() {
    let h = setup().await;

    let b = h.ledger.add_borrower(borrower("Juan Dela Cruz")).await.unwrap();

    let found = h
        .ledger
        .get_borrower_by_name("Juan Dela Cruz")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.borrower_id, b);

    assert!(
        h.ledger
            .get_borrower_by_name("Juan")
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn dashboard_aggregates_reflect_persisted_status() {
    let h = setup().await;

    let b = h.ledger.add_borrower(borrower("Juan Dela Cruz")).await.unwrap();
    let fresh = h.ledger.add_loan(loan(b, 1000.0, today())).await.unwrap();
    let old = h
        .ledger
        .add_loan(loan(b, 2000.0, today() - Duration::days(60)))
        .await
        .unwrap();
    let paid = h.ledger.add_loan(loan(b, 500.0, today())).await.unwrap();

    h.ledger.record_payment(old, 100.0, today()).await.unwrap();
    h.ledger.record_payment(paid, 500.0, today()).await.unwrap();
    let _ = fresh;

    let snapshot = h.ledger.get_dashboard_data().await.unwrap();
    assert_eq!(snapshot.total_loans, 3);
    assert_eq!(snapshot.total_amount, 3500.0);
    assert_eq!(snapshot.active_loans, 1);
    assert_eq!(snapshot.overdue_loans, 1);
    assert_eq!(snapshot.amounts, vec![1000.0, 2000.0, 500.0]);

    let total_by_status: i64 = snapshot.status_breakdown.iter().map(|s| s.count).sum();
    assert_eq!(total_by_status, 3);
}

#[tokio::test]
async fn status_stays_stale_without_payment_activity() {
    let h = setup().await;

    let b = h.ledger.add_borrower(borrower("Juan Dela Cruz")).await.unwrap();
    // old loan, never paid against: no payment event means no recompute
    let l = h
        .ledger
        .add_loan(loan(b, 1000.0, today() - Duration::days(90)))
        .await
        .unwrap();

    let summary = h.ledger.get_loan_summary(l).await.unwrap();
    assert_eq!(summary.loan.status, LoanStatus::Active);

    let snapshot = h.ledger.get_dashboard_data().await.unwrap();
    assert_eq!(snapshot.overdue_loans, 0);
}

#[tokio::test]
async fn report_has_one_row_per_loan_with_verbatim_amounts() {
    let h = setup().await;

    let b = h.ledger.add_borrower(borrower("Juan Dela Cruz")).await.unwrap();
    h.ledger.add_loan(loan(b, 1500.0, today())).await.unwrap();
    h.ledger
        .add_loan(loan(b, 2750.5, today() - Duration::days(10)))
        .await
        .unwrap();

    let rows = h.ledger.export_loan_report().await.unwrap();
    assert_eq!(rows, 2);

    let report = std::fs::read_to_string(&h.report_path).unwrap();
    let lines: Vec<&str> = report.lines().collect();
    assert_eq!(
        lines[0],
        "loan_id,full_name,amount,interest_rate,term_months,start_date,status"
    );
    assert_eq!(lines.len(), 3);
    assert!(lines[1].contains("Juan Dela Cruz"));
    assert!(lines[1].contains(",1500,"));
    assert!(lines[2].contains(",2750.5,"));
}

#[tokio::test]
async fn schema_init_is_idempotent() {
    let h = setup().await;

    let b = h.ledger.add_borrower(borrower("Juan Dela Cruz")).await.unwrap();
    h.ledger.add_loan(loan(b, 1000.0, today())).await.unwrap();

    // second run must not touch existing tables or rows
    let schema = SchemaInitializer::new(h.store.pool());
    schema.run().await.unwrap();
    schema.run().await.unwrap();

    assert_eq!(h.ledger.get_all_borrowers().await.unwrap().len(), 1);
    assert_eq!(h.ledger.get_all_loans().await.unwrap().len(), 1);
}

#[tokio::test]
async fn seed_runs_once_and_never_overwrites() {
    let h = setup().await;
    let hasher = Argon2CredentialHasher;
    let credential_repo = SqliteCredentialRepo::new(h.store.pool());

    let schema = SchemaInitializer::new(h.store.pool());
    schema
        .seed_default_credential(&credential_repo, &hasher, "admin", "admin123")
        .await
        .unwrap();
    schema
        .seed_default_credential(&credential_repo, &hasher, "other", "changed")
        .await
        .unwrap();

    assert_eq!(credential_repo.count().await.unwrap(), 1);
    let seeded = credential_repo
        .get_by_username("admin")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(seeded.username, "admin");
    assert!(
        credential_repo
            .get_by_username("other")
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn backup_is_a_byte_copy() {
    let h = setup().await;

    let b = h.ledger.add_borrower(borrower("Juan Dela Cruz")).await.unwrap();
    h.ledger.add_loan(loan(b, 1000.0, today())).await.unwrap();

    let dest = h._dir.path().join("backup.db");
    let bytes = h.store.backup_to(&dest).await.unwrap();
    assert!(bytes > 0);

    let original = std::fs::read(h.store.path()).unwrap();
    let copy = std::fs::read(&dest).unwrap();
    assert_eq!(original, copy);

    // the copy is a working store on its own
    let restored = SqliteStore::connect(&dest).await.unwrap();
    let loans: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM loans")
        .fetch_one(&restored.pool())
        .await
        .unwrap();
    assert_eq!(loans, 1);
}
