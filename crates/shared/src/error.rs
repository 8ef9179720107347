use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::{CategoryId, LoanId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("loan {loan_id} references unknown category '{category}'")]
    UnknownCategory { loan_id: LoanId, category: CategoryId },
    #[error("loan {loan_id} cannot be filed under the catch-all category")]
    CatchAllCategory { loan_id: LoanId },
    #[error("loan id {0} appears more than once")]
    DuplicateLoanId(LoanId),
    #[error("due date {due_date} of loan {loan_id} cannot be advanced by {days} days")]
    DueDateOverflow {
        loan_id: LoanId,
        due_date: NaiveDate,
        days: u64,
    },
}
