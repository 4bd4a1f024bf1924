use anyhow::bail;
use chrono::Local;
use loanbook::application_impl::*;
use loanbook::application_port::*;
use loanbook::domain_model::LoanId;
use loanbook::domain_port::*;
use loanbook::infra_sqlite::*;
use loanbook::logger::*;
use loanbook::settings::*;
use std::path::PathBuf;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let logger = Logger::new_bootstrap();

    let project_settings = parse_settings(cli.settings.as_deref())?;
    let logger_config = LogConfig {
        filter: project_settings.log.filter.clone(),
    };
    logger.reload_from_config(&logger_config)?;

    let store = SqliteStore::connect(&project_settings.store.path).await?;

    let hasher: Arc<dyn CredentialHasher> = Arc::new(Argon2CredentialHasher);
    let credential_repo: Arc<dyn CredentialRepo> =
        Arc::new(SqliteCredentialRepo::new(store.pool()));

    // runs on every launch; creates nothing that already exists
    let schema = SchemaInitializer::new(store.pool());
    schema.run().await?;
    schema
        .seed_default_credential(
            credential_repo.as_ref(),
            hasher.as_ref(),
            &project_settings.auth.default_username,
            &project_settings.auth.default_secret,
        )
        .await?;

    let borrower_repo: Arc<dyn BorrowerRepo> = Arc::new(SqliteBorrowerRepo::new(store.pool()));
    let loan_repo: Arc<dyn LoanRepo> = Arc::new(SqliteLoanRepo::new(store.pool()));
    let payment_repo: Arc<dyn PaymentRepo> = Arc::new(SqlitePaymentRepo::new(store.pool()));
    let tx_manager: Arc<dyn TxManager> = Arc::new(SqliteTxManager::new(store.pool()));

    let ledger = RealLedgerService::new(
        borrower_repo,
        loan_repo,
        payment_repo,
        tx_manager,
        PathBuf::from(&project_settings.report.path),
    );
    let auth = RealAuthService::new(credential_repo, hasher);

    let result = run_command(cli.command, &ledger, &auth, &store).await;
    store.close().await;
    result
}

async fn run_command(
    command: Command,
    ledger: &RealLedgerService,
    auth: &RealAuthService,
    store: &SqliteStore,
) -> anyhow::Result<()> {
    match command {
        Command::Login { username, secret } => {
            if auth.verify(&username, &secret).await? {
                println!("login ok");
            } else {
                bail!("invalid credentials");
            }
        }
        Command::AddBorrower {
            name,
            contact,
            email,
            address,
            id_type,
            id_number,
        } => {
            // the field checks the GUI forms used to do
            if name.trim().is_empty() {
                bail!("full name is required");
            }
            if id_number.is_some() && id_type.is_none() {
                bail!("--id-number requires --id-type");
            }
            let borrower_id = ledger
                .add_borrower(NewBorrower {
                    full_name: name.trim().to_string(),
                    contact,
                    email,
                    address,
                    id_type,
                    id_number,
                })
                .await?;
            println!("borrower {borrower_id} added");
        }
        Command::AddLoan {
            borrower_id,
            amount,
            rate,
            term_months,
            start_date,
        } => {
            if amount <= 0.0 {
                bail!("amount must be positive");
            }
            if rate < 0.0 {
                bail!("rate must not be negative");
            }
            if term_months <= 0 {
                bail!("term must be positive");
            }
            let loan_id = ledger
                .add_loan(NewLoan {
                    borrower_id: loanbook::domain_model::BorrowerId(borrower_id),
                    amount,
                    interest_rate: rate,
                    term_months,
                    start_date: start_date.unwrap_or_else(|| Local::now().date_naive()),
                })
                .await?;
            println!("loan {loan_id} added");
        }
        Command::RecordPayment {
            loan_id,
            amount,
            date,
        } => {
            if amount <= 0.0 {
                bail!("amount must be positive");
            }
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            let new_balance = ledger
                .record_payment(LoanId(loan_id), amount, date)
                .await?;
            println!("payment recorded, new balance: {new_balance:.2}");
        }
        Command::Dashboard => {
            let snapshot = ledger.get_dashboard_data().await?;
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        Command::Borrowers => {
            for borrower in ledger.get_all_borrowers().await? {
                print_borrower(&borrower);
            }
        }
        Command::BorrowerNames => {
            for name in ledger.get_borrower_names().await? {
                println!("{name}");
            }
        }
        Command::BorrowerByName { name } => match ledger.get_borrower_by_name(name.trim()).await? {
            Some(borrower) => print_borrower(&borrower),
            None => bail!("no borrower named {name}"),
        },
        Command::Loans => {
            for loan in ledger.get_all_loans().await? {
                print_loan(&loan);
            }
        }
        Command::SearchBorrowers { query } => {
            for borrower in ledger.search_borrowers(query.trim()).await? {
                print_borrower(&borrower);
            }
        }
        Command::SearchLoans { query } => {
            for loan in ledger.search_loans(query.trim()).await? {
                print_loan(&loan);
            }
        }
        Command::Balance { loan_id } => {
            let balance = ledger.get_loan_balance(LoanId(loan_id)).await?;
            println!("balance: {balance:.2}");
        }
        Command::Summary { loan_id } => {
            let summary = ledger.get_loan_summary(LoanId(loan_id)).await?;
            println!(
                "loan {} | principal {:.2} | rate {} | {} months | started {} | {}",
                summary.loan.loan_id,
                summary.loan.amount,
                summary.loan.interest_rate,
                summary.loan.term_months,
                summary.loan.start_date,
                summary.loan.status
            );
            for payment in &summary.payments {
                println!(
                    "  payment {} | {} | {:.2} | balance after {:.2}",
                    payment.payment_id,
                    payment.payment_date,
                    payment.amount,
                    payment.balance_after_payment
                );
            }
        }
        Command::Export => {
            let rows = ledger.export_loan_report().await?;
            println!("exported {rows} loans");
        }
        Command::Backup { dest } => {
            let bytes = store.backup_to(&dest).await?;
            println!("backed up {bytes} bytes to {dest}");
        }
    }

    Ok(())
}

fn print_borrower(borrower: &BorrowerRecord) {
    println!(
        "ID: {} | Name: {} | Contact: {} | Email: {} | ID No: {}",
        borrower.borrower_id,
        borrower.full_name,
        borrower.contact.as_deref().unwrap_or("N/A"),
        borrower.email.as_deref().unwrap_or("N/A"),
        borrower.id_number.as_deref().unwrap_or("N/A"),
    );
}

fn print_loan(loan: &LoanWithBorrower) {
    println!(
        "ID: {} | Name: {} | Amount: {:.2} | Status: {}",
        loan.loan_id, loan.full_name, loan.amount, loan.status
    );
}
