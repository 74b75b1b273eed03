use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;
use crate::types::{CustomerId, InstallmentId, LoanId};

/// a customer with an approved credit limit and the share currently committed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub surname: String,
    pub credit_limit: Money,
    pub used_credit_limit: Money,
}

impl Customer {
    pub fn new(name: String, surname: String, credit_limit: Money, used_credit_limit: Money) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            surname,
            credit_limit,
            used_credit_limit,
        }
    }

    /// headroom left under the approved limit
    pub fn available_credit(&self) -> Money {
        self.credit_limit - self.used_credit_limit
    }

    /// commit part of the limit to a new loan
    pub fn reserve_credit(&mut self, amount: Money) {
        self.used_credit_limit += amount;
    }

    /// hand back the commitment of a fully paid loan
    pub fn release_credit(&mut self, amount: Money) {
        self.used_credit_limit -= amount;
    }
}

/// an installment loan written against a customer's credit limit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    pub id: LoanId,
    pub customer_id: CustomerId,
    /// principal only, interest is carried by the installment amounts
    pub loan_amount: Money,
    pub number_of_installment: u32,
    pub create_date: NaiveDate,
    pub is_paid: bool,
}

impl Loan {
    pub fn new(
        customer_id: CustomerId,
        loan_amount: Money,
        number_of_installment: u32,
        create_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            customer_id,
            loan_amount,
            number_of_installment,
            create_date,
            is_paid: false,
        }
    }

    pub fn mark_paid(&mut self) {
        self.is_paid = true;
    }
}

/// one scheduled repayment of a loan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installment {
    pub id: InstallmentId,
    pub loan_id: LoanId,
    /// nominal share of principal plus interest
    pub amount: Money,
    /// what was actually applied, differs from `amount` under early/late adjustment
    pub paid_amount: Money,
    pub due_date: NaiveDate,
    pub payment_date: Option<NaiveDate>,
    pub is_paid: bool,
}

impl Installment {
    pub fn new(loan_id: LoanId, amount: Money, due_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            loan_id,
            amount,
            paid_amount: Money::ZERO,
            due_date,
            payment_date: None,
            is_paid: false,
        }
    }

    /// record the settlement; a settled installment never re-enters allocation
    pub fn settle(&mut self, paid_amount: Money, payment_date: NaiveDate) {
        self.paid_amount = paid_amount;
        self.payment_date = Some(payment_date);
        self.is_paid = true;
    }
}
