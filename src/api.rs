use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::CreditPolicy;
use crate::decimal::{Money, Rate};
use crate::errors::ValidationError;
use crate::model::{Installment, Loan};
use crate::types::{CustomerId, InstallmentId, LoanFilter, LoanId};

/// request to register a customer, omitted limits default to zero
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerRequest {
    pub name: String,
    pub surname: String,
    pub credit_limit: Option<Money>,
    pub used_credit_limit: Option<Money>,
}

impl CreateCustomerRequest {
    /// boundary validation, the core does not repeat these checks
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::new("name", "Name cannot be empty."));
        }
        if self.surname.trim().is_empty() {
            return Err(ValidationError::new("surname", "Surname cannot be empty."));
        }
        Ok(())
    }
}

/// request to write a new installment loan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLoanRequest {
    pub customer_id: CustomerId,
    pub loan_amount: Money,
    pub number_of_installment: u32,
    pub interest_rate: Rate,
}

impl CreateLoanRequest {
    /// boundary validation, the core does not repeat these checks
    ///
    /// the rate band lives here rather than in the factory; a request fed
    /// past this check is accepted by the core whatever its rate says
    pub fn validate(&self, policy: &CreditPolicy) -> Result<(), ValidationError> {
        if !self.loan_amount.is_positive() {
            return Err(ValidationError::new(
                "loanAmount",
                "Loan amount must be greater than 0.",
            ));
        }
        if !policy.rate_in_band(self.interest_rate) {
            let message = if self.interest_rate < policy.min_interest_rate {
                format!(
                    "Interest rate must be at least {}.",
                    policy.min_interest_rate.as_decimal()
                )
            } else {
                format!(
                    "Interest rate must be at most {}.",
                    policy.max_interest_rate.as_decimal()
                )
            };
            return Err(ValidationError::new("interestRate", message));
        }
        Ok(())
    }
}

/// request to list a customer's loans with optional predicates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListLoansRequest {
    pub customer_id: CustomerId,
    pub number_of_installment: Option<u32>,
    pub is_paid: Option<bool>,
}

impl ListLoansRequest {
    pub fn filter(&self) -> LoanFilter {
        LoanFilter {
            number_of_installment: self.number_of_installment,
            is_paid: self.is_paid,
        }
    }
}

/// request to pay down a loan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayLoanRequest {
    pub loan_id: LoanId,
    pub payment_amount: Money,
}

impl PayLoanRequest {
    /// boundary validation, the core does not repeat this check
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.payment_amount.is_positive() {
            return Err(ValidationError::new(
                "paymentAmount",
                "Payment amount must be greater than 0.",
            ));
        }
        Ok(())
    }
}

/// loan view returned by the listing operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanSummary {
    pub id: LoanId,
    pub loan_amount: Money,
    pub number_of_installment: u32,
    pub create_date: NaiveDate,
    pub is_paid: bool,
}

impl LoanSummary {
    pub fn from_loan(loan: &Loan) -> Self {
        Self {
            id: loan.id,
            loan_amount: loan.loan_amount,
            number_of_installment: loan.number_of_installment,
            create_date: loan.create_date,
            is_paid: loan.is_paid,
        }
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// installment view returned by the listing operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallmentSummary {
    pub id: InstallmentId,
    pub amount: Money,
    pub paid_amount: Money,
    pub due_date: NaiveDate,
    pub payment_date: Option<NaiveDate>,
    pub is_paid: bool,
}

impl InstallmentSummary {
    pub fn from_installment(installment: &Installment) -> Self {
        Self {
            id: installment.id,
            amount: installment.amount,
            paid_amount: installment.paid_amount,
            due_date: installment.due_date,
            payment_date: installment.payment_date,
            is_paid: installment.is_paid,
        }
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
