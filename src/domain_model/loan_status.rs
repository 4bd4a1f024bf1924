use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Days a loan may run past its start date before an unpaid balance marks it
/// overdue.
pub const OVERDUE_AFTER_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum LoanStatus {
    Active,
    Paid,
    Overdue,
}

impl LoanStatus {
    /// Status is a pure function of the post-payment balance and the loan age.
    /// It is evaluated (and persisted) only when a payment is recorded, so a
    /// loan with no payment activity keeps its last persisted status even as
    /// time passes.
    pub fn derive(balance: f64, start_date: NaiveDate, today: NaiveDate) -> LoanStatus {
        if balance <= 0.0 {
            return LoanStatus::Paid;
        }
        if (today - start_date).num_days() > OVERDUE_AFTER_DAYS {
            return LoanStatus::Overdue;
        }
        LoanStatus::Active
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Active => "Active",
            LoanStatus::Paid => "Paid",
            LoanStatus::Overdue => "Overdue",
        }
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LoanStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Active" => Ok(LoanStatus::Active),
            "Paid" => Ok(LoanStatus::Paid),
            "Overdue" => Ok(LoanStatus::Overdue),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown loan status: {0}")]
pub struct UnknownStatus(pub String);
