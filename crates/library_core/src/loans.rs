use std::collections::HashSet;

use chrono::{Days, NaiveDate};
use shared::{
    domain::{CategoryId, Loan, LoanId, LoanStatus},
    error::CatalogError,
};
use tracing::{info, warn};

use crate::catalog::CatalogRegistry;

pub const RENEWAL_PERIOD_DAYS: u64 = 14;

fn seed_loans() -> Vec<Loan> {
    let seed = |id, title: &str, author: &str, category: &str, cover: &str, (y, m, d)| {
        NaiveDate::from_ymd_opt(y, m, d).map(|due_date| Loan {
            id: LoanId(id),
            title: title.to_string(),
            author: author.to_string(),
            category: CategoryId::from(category),
            cover: cover.to_string(),
            due_date,
            status: LoanStatus::Borrowed,
        })
    };

    [
        seed(
            1,
            "تعلم البرمجة من الصفر",
            "أحمد محمد",
            "programming",
            "fas fa-code",
            (2024, 12, 15),
        ),
        seed(
            2,
            "فن التصميم الجرافيكي",
            "فاطمة علي",
            "arts",
            "fas fa-palette",
            (2024, 12, 20),
        ),
        seed(
            3,
            "مبادئ الفيزياء الحديثة",
            "د. خالد حسن",
            "science",
            "fas fa-microscope",
            (2024, 12, 25),
        ),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// In-memory borrowed-book list. Never persisted; rebuilt from the seed on
/// every page load.
#[derive(Debug, Clone)]
pub struct LoanRegistry {
    loans: Vec<Loan>,
}

impl LoanRegistry {
    pub fn seeded(catalog: &CatalogRegistry) -> Result<Self, CatalogError> {
        Self::with_loans(seed_loans(), catalog)
    }

    /// Validates that ids are unique and that each loan points at a concrete
    /// (non catch-all) category known to `catalog`.
    pub fn with_loans(loans: Vec<Loan>, catalog: &CatalogRegistry) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for loan in &loans {
            if !seen.insert(loan.id) {
                return Err(CatalogError::DuplicateLoanId(loan.id));
            }
            if loan.category.is_all() {
                return Err(CatalogError::CatchAllCategory { loan_id: loan.id });
            }
            if !catalog.contains(&loan.category) {
                return Err(CatalogError::UnknownCategory {
                    loan_id: loan.id,
                    category: loan.category.clone(),
                });
            }
        }
        Ok(Self { loans })
    }

    pub fn get_borrowed_books(&self) -> &[Loan] {
        &self.loans
    }

    pub fn len(&self) -> usize {
        self.loans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loans.is_empty()
    }

    pub fn get(&self, id: LoanId) -> Option<&Loan> {
        self.loans.iter().find(|loan| loan.id == id)
    }

    /// Loans filed under `category`; the catch-all returns the full list.
    pub fn books_in_category(&self, category: &CategoryId) -> Vec<&Loan> {
        if category.is_all() {
            return self.loans.iter().collect();
        }
        self.loans
            .iter()
            .filter(|loan| &loan.category == category)
            .collect()
    }

    /// Pushes the due date of loan `id` out by [`RENEWAL_PERIOD_DAYS`]
    /// calendar days. Returns the new due date, or `None` if no loan matches.
    pub fn try_renew(&mut self, id: LoanId) -> Result<Option<NaiveDate>, CatalogError> {
        let Some(loan) = self.loans.iter_mut().find(|loan| loan.id == id) else {
            return Ok(None);
        };
        let renewed = loan
            .due_date
            .checked_add_days(Days::new(RENEWAL_PERIOD_DAYS))
            .ok_or(CatalogError::DueDateOverflow {
                loan_id: id,
                due_date: loan.due_date,
                days: RENEWAL_PERIOD_DAYS,
            })?;
        info!(loan_id = id.0, from = %loan.due_date, to = %renewed, "renewed loan");
        loan.due_date = renewed;
        Ok(Some(renewed))
    }

    pub fn renew_book(&mut self, id: LoanId) -> bool {
        match self.try_renew(id) {
            Ok(renewed) => renewed.is_some(),
            Err(err) => {
                warn!(error = %err, "loan renewal rejected");
                false
            }
        }
    }

    pub fn return_book(&mut self, id: LoanId) -> bool {
        let Some(index) = self.loans.iter().position(|loan| loan.id == id) else {
            return false;
        };
        let returned = self.loans.remove(index);
        info!(loan_id = id.0, title = %returned.title, "returned loan");
        true
    }
}

#[cfg(test)]
#[path = "tests/loans_tests.rs"]
mod tests;
