pub mod adjustment;
pub mod allocation;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::LoanId;

pub use adjustment::{AdjustedAmount, AdjustmentEngine};
pub use allocation::{AllocationResult, PaymentAllocator, Settlement};

/// result of a payment run against a loan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSummary {
    pub loan_id: LoanId,
    pub loan_amount: Money,
    pub total_installments: u32,
    /// installments settled by this payment
    pub paid_installments: u32,
    /// unpaid installments left on the whole ledger, horizon or not
    pub unpaid_installments: u64,
    /// funds the allocation could not spend
    pub remaining_amount: Money,
    pub payment_date: NaiveDate,
}
