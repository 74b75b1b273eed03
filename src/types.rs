use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// unique identifier for a customer
pub type CustomerId = Uuid;

/// unique identifier for a loan
pub type LoanId = Uuid;

/// unique identifier for an installment
pub type InstallmentId = Uuid;

/// optional predicates for loan listing, each applied only when present
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LoanFilter {
    pub number_of_installment: Option<u32>,
    pub is_paid: Option<bool>,
}

impl LoanFilter {
    /// true when the loan passes every present predicate
    pub fn matches(&self, number_of_installment: u32, is_paid: bool) -> bool {
        if let Some(n) = self.number_of_installment {
            if n != number_of_installment {
                return false;
            }
        }
        if let Some(p) = self.is_paid {
            if p != is_paid {
                return false;
            }
        }
        true
    }
}
