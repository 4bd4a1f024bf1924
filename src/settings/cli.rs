use super::Parser;
use chrono::NaiveDate;
use clap::Subcommand;

#[derive(Parser, Debug)]
pub struct Cli {
    #[arg(long)]
    pub settings: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// One subcommand per ledger operation. This is the stand-in for the desktop
/// shell; field validation lives on this side of the service boundary.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check the operator credential.
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        secret: String,
    },
    AddBorrower {
        #[arg(long)]
        name: String,
        #[arg(long)]
        contact: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        id_type: Option<String>,
        #[arg(long)]
        id_number: Option<String>,
    },
    AddLoan {
        #[arg(long)]
        borrower_id: i64,
        #[arg(long)]
        amount: f64,
        #[arg(long)]
        rate: f64,
        #[arg(long)]
        term_months: i64,
        /// ISO date; defaults to today.
        #[arg(long)]
        start_date: Option<NaiveDate>,
    },
    RecordPayment {
        #[arg(long)]
        loan_id: i64,
        #[arg(long)]
        amount: f64,
        /// ISO date; defaults to today.
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    Dashboard,
    Borrowers,
    /// List borrower names, as the shell's dropdowns do.
    BorrowerNames,
    /// Exact full-name lookup.
    BorrowerByName {
        name: String,
    },
    Loans,
    SearchBorrowers {
        query: String,
    },
    SearchLoans {
        query: String,
    },
    Balance {
        loan_id: i64,
    },
    Summary {
        loan_id: i64,
    },
    /// Write the loan report CSV to the configured path.
    Export,
    /// Byte-copy the store file to the given path.
    Backup {
        dest: String,
    },
}
