use serde::{Deserialize, Serialize};
use thiserror::Error;

/// domain errors, one variant per catalog entry with a stable code and message
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CreditError {
    #[error("Customer not found with given id.")]
    CustomerNotFound,

    #[error("Customer does not have enough credit limit for the loan.")]
    InsufficientCreditLimit,

    #[error("Number of installments must be one of the following: 6, 9, 12, 24.")]
    InvalidNumberOfInstallments,

    #[error("Loan not found for given user.")]
    LoanNotFound,

    #[error("Installment not found for given loanId.")]
    InstallmentNotFound,

    /// reserved code, no operation raises it
    #[error("Loan with given ID already paid.")]
    LoanAlreadyPaid,

    /// reserved code, no operation raises it
    #[error("Payment amount cannot be less than loan amount.")]
    InvalidPaymentAmount,

    #[error("There are no payable installments.")]
    NoPayableInstallments,

    /// unexpected persistence failure, outside the catalog
    #[error("storage failure: {0}")]
    Storage(String),
}

impl CreditError {
    /// stable catalog code, `None` for non-catalog failures
    pub fn error_code(&self) -> Option<u16> {
        match self {
            CreditError::CustomerNotFound => Some(1001),
            CreditError::InsufficientCreditLimit => Some(1002),
            CreditError::InvalidNumberOfInstallments => Some(1003),
            CreditError::LoanNotFound => Some(1004),
            CreditError::InstallmentNotFound => Some(1005),
            CreditError::LoanAlreadyPaid => Some(1006),
            CreditError::InvalidPaymentAmount => Some(1007),
            CreditError::NoPayableInstallments => Some(1008),
            CreditError::Storage(_) => None,
        }
    }
}

/// client-facing error body: catalog errors carry `{errorCode, errorMessage}`,
/// anything else collapses to a generic `{error}` shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorResponse {
    #[serde(rename_all = "camelCase")]
    Catalog { error_code: u16, error_message: String },
    Unexpected { error: String },
}

impl From<&CreditError> for ErrorResponse {
    fn from(err: &CreditError) -> Self {
        match err.error_code() {
            Some(code) => ErrorResponse::Catalog {
                error_code: code,
                error_message: err.to_string(),
            },
            None => ErrorResponse::Unexpected {
                error: format!("An unexpected error occurred: {err}"),
            },
        }
    }
}

/// field-level rejection produced by request validation
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CreditError>;
