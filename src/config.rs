use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::decimal::Rate;

/// lending policy knobs: installment terms, rate band, payment window, per-diem factor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditPolicy {
    /// installment counts a loan may be written for
    pub allowed_installment_counts: Vec<u32>,
    /// inclusive lower bound for the interest rate
    pub min_interest_rate: Rate,
    /// inclusive upper bound for the interest rate
    pub max_interest_rate: Rate,
    /// installments due within this many calendar months are payable
    pub payment_horizon_months: u32,
    /// discount/penalty factor per day of early/late payment
    pub daily_adjustment_rate: Rate,
}

impl CreditPolicy {
    /// standard policy: terms of 6/9/12/24 months, rates 10%-50%,
    /// 3 month payment window, 0.1% per-diem adjustment
    pub fn standard() -> Self {
        Self {
            allowed_installment_counts: vec![6, 9, 12, 24],
            min_interest_rate: Rate::from_decimal(dec!(0.1)),
            max_interest_rate: Rate::from_decimal(dec!(0.5)),
            payment_horizon_months: 3,
            daily_adjustment_rate: Rate::from_decimal(dec!(0.001)),
        }
    }

    /// check an installment count against the allowed terms
    pub fn allows_installment_count(&self, count: u32) -> bool {
        self.allowed_installment_counts.contains(&count)
    }

    /// check a rate against the inclusive band
    pub fn rate_in_band(&self, rate: Rate) -> bool {
        rate >= self.min_interest_rate && rate <= self.max_interest_rate
    }
}

impl Default for CreditPolicy {
    fn default() -> Self {
        Self::standard()
    }
}
