use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::errors::{CreditError, Result};
use crate::model::{Customer, Installment, Loan};
use crate::types::{CustomerId, InstallmentId, LoanId};

/// persistence boundary for customers
pub trait CustomerStore: Send + Sync {
    fn find(&self, id: CustomerId) -> Result<Option<Customer>>;
    fn save(&self, customer: &Customer) -> Result<()>;
}

/// persistence boundary for loans
pub trait LoanStore: Send + Sync {
    fn find(&self, id: LoanId) -> Result<Option<Loan>>;
    /// all loans of a customer in creation order
    fn find_by_customer(&self, customer_id: CustomerId) -> Result<Vec<Loan>>;
    fn save(&self, loan: &Loan) -> Result<()>;
}

/// persistence boundary for the installment ledger
pub trait InstallmentStore: Send + Sync {
    /// all installments of a loan in schedule order
    fn find_by_loan(&self, loan_id: LoanId) -> Result<Vec<Installment>>;
    fn save(&self, installment: &Installment) -> Result<()>;
    fn save_batch(&self, installments: &[Installment]) -> Result<()>;
}

/// shared in-memory customer store, clones see the same data
#[derive(Debug, Clone, Default)]
pub struct InMemoryCustomers {
    customers: Arc<RwLock<HashMap<CustomerId, Customer>>>,
}

impl InMemoryCustomers {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CustomerStore for InMemoryCustomers {
    fn find(&self, id: CustomerId) -> Result<Option<Customer>> {
        let customers = self
            .customers
            .read()
            .map_err(|_| CreditError::Storage("customer store lock poisoned".into()))?;
        Ok(customers.get(&id).cloned())
    }

    fn save(&self, customer: &Customer) -> Result<()> {
        let mut customers = self
            .customers
            .write()
            .map_err(|_| CreditError::Storage("customer store lock poisoned".into()))?;
        customers.insert(customer.id, customer.clone());
        Ok(())
    }
}

/// shared in-memory loan store with a per-customer index in creation order
#[derive(Debug, Clone, Default)]
pub struct InMemoryLoans {
    loans: Arc<RwLock<HashMap<LoanId, Loan>>>,
    by_customer: Arc<RwLock<HashMap<CustomerId, Vec<LoanId>>>>,
}

impl InMemoryLoans {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LoanStore for InMemoryLoans {
    fn find(&self, id: LoanId) -> Result<Option<Loan>> {
        let loans = self
            .loans
            .read()
            .map_err(|_| CreditError::Storage("loan store lock poisoned".into()))?;
        Ok(loans.get(&id).cloned())
    }

    fn find_by_customer(&self, customer_id: CustomerId) -> Result<Vec<Loan>> {
        let loans = self
            .loans
            .read()
            .map_err(|_| CreditError::Storage("loan store lock poisoned".into()))?;
        let by_customer = self
            .by_customer
            .read()
            .map_err(|_| CreditError::Storage("loan store lock poisoned".into()))?;
        let ids = by_customer.get(&customer_id).cloned().unwrap_or_default();
        Ok(ids.iter().filter_map(|id| loans.get(id).cloned()).collect())
    }

    fn save(&self, loan: &Loan) -> Result<()> {
        let mut loans = self
            .loans
            .write()
            .map_err(|_| CreditError::Storage("loan store lock poisoned".into()))?;
        let mut by_customer = self
            .by_customer
            .write()
            .map_err(|_| CreditError::Storage("loan store lock poisoned".into()))?;
        if loans.insert(loan.id, loan.clone()).is_none() {
            by_customer.entry(loan.customer_id).or_default().push(loan.id);
        }
        Ok(())
    }
}

/// shared in-memory installment ledger with a per-loan index in schedule order
#[derive(Debug, Clone, Default)]
pub struct InMemoryInstallments {
    installments: Arc<RwLock<HashMap<InstallmentId, Installment>>>,
    by_loan: Arc<RwLock<HashMap<LoanId, Vec<InstallmentId>>>>,
}

impl InMemoryInstallments {
    pub fn new() -> Self {
        Self::default()
    }
}

impl InstallmentStore for InMemoryInstallments {
    fn find_by_loan(&self, loan_id: LoanId) -> Result<Vec<Installment>> {
        let installments = self
            .installments
            .read()
            .map_err(|_| CreditError::Storage("installment store lock poisoned".into()))?;
        let by_loan = self
            .by_loan
            .read()
            .map_err(|_| CreditError::Storage("installment store lock poisoned".into()))?;
        let ids = by_loan.get(&loan_id).cloned().unwrap_or_default();
        Ok(ids
            .iter()
            .filter_map(|id| installments.get(id).cloned())
            .collect())
    }

    fn save(&self, installment: &Installment) -> Result<()> {
        let mut installments = self
            .installments
            .write()
            .map_err(|_| CreditError::Storage("installment store lock poisoned".into()))?;
        let mut by_loan = self
            .by_loan
            .write()
            .map_err(|_| CreditError::Storage("installment store lock poisoned".into()))?;
        if installments
            .insert(installment.id, installment.clone())
            .is_none()
        {
            by_loan
                .entry(installment.loan_id)
                .or_default()
                .push(installment.id);
        }
        Ok(())
    }

    fn save_batch(&self, batch: &[Installment]) -> Result<()> {
        for installment in batch {
            self.save(installment)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Money;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_customer_roundtrip_and_update() {
        let store = InMemoryCustomers::new();
        let mut customer = Customer::new(
            "Grace".to_string(),
            "Hopper".to_string(),
            Money::from_major(10_000),
            Money::ZERO,
        );
        store.save(&customer).unwrap();

        customer.reserve_credit(Money::from_major(4_000));
        store.save(&customer).unwrap();

        let found = store.find(customer.id).unwrap().unwrap();
        assert_eq!(found.used_credit_limit, Money::from_major(4_000));
        assert!(store.find(Uuid::new_v4()).unwrap().is_none());
    }

    #[test]
    fn test_clones_share_state() {
        let store = InMemoryLoans::new();
        let clone = store.clone();
        let loan = Loan::new(Uuid::new_v4(), Money::from_major(5_000), 12, date(2024, 1, 1));
        store.save(&loan).unwrap();
        assert!(clone.find(loan.id).unwrap().is_some());
    }

    #[test]
    fn test_loans_listed_in_creation_order() {
        let store = InMemoryLoans::new();
        let customer_id = Uuid::new_v4();
        let first = Loan::new(customer_id, Money::from_major(1_000), 6, date(2024, 1, 1));
        let second = Loan::new(customer_id, Money::from_major(2_000), 12, date(2024, 2, 1));
        store.save(&first).unwrap();
        store.save(&second).unwrap();

        let listed = store.find_by_customer(customer_id).unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, first.id);
        assert_eq!(listed[1].id, second.id);
        assert!(store.find_by_customer(Uuid::new_v4()).unwrap().is_empty());
    }

    #[test]
    fn test_resave_does_not_duplicate_index() {
        let store = InMemoryLoans::new();
        let customer_id = Uuid::new_v4();
        let mut loan = Loan::new(customer_id, Money::from_major(1_000), 6, date(2024, 1, 1));
        store.save(&loan).unwrap();
        loan.mark_paid();
        store.save(&loan).unwrap();

        let listed = store.find_by_customer(customer_id).unwrap();
        assert_eq!(listed.len(), 1);
        assert!(listed[0].is_paid);
    }

    #[test]
    fn test_installments_keep_schedule_order() {
        let store = InMemoryInstallments::new();
        let loan_id = Uuid::new_v4();
        let batch: Vec<Installment> = (1..=3)
            .map(|m| Installment::new(loan_id, Money::from_major(500), date(2024, m, 1)))
            .collect();
        store.save_batch(&batch).unwrap();

        let listed = store.find_by_loan(loan_id).unwrap();
        assert_eq!(listed.len(), 3);
        for (stored, original) in listed.iter().zip(batch.iter()) {
            assert_eq!(stored.id, original.id);
        }
    }
}
