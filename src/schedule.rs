use chrono::{Datelike, Days, Months, NaiveDate};
use rust_decimal::Decimal;

use crate::decimal::{Money, Rate};
use crate::model::Installment;
use crate::types::LoanId;

/// flat repayment plan: identical installments due on the first of consecutive months
#[derive(Debug, Clone)]
pub struct InstallmentSchedule {
    pub loan_id: LoanId,
    pub principal: Money,
    pub interest_rate: Rate,
    pub number_of_installment: u32,
    pub total_payable: Money,
    pub installment_amount: Money,
    pub installments: Vec<Installment>,
}

impl InstallmentSchedule {
    /// generate the plan for a validated loan
    ///
    /// total payable is `principal * (1 + rate)`, split evenly across the
    /// term. every installment carries the same amount, the last one is not
    /// adjusted for rounding remainder. the first due date is the first day
    /// of the month after `create_date`, each following installment is due
    /// one calendar month later.
    pub fn generate(
        loan_id: LoanId,
        principal: Money,
        interest_rate: Rate,
        number_of_installment: u32,
        create_date: NaiveDate,
    ) -> Self {
        let total_payable = principal * (Decimal::ONE + interest_rate.as_decimal());
        let installment_amount = total_payable / Decimal::from(number_of_installment);
        let first_due = first_of_next_month(create_date);

        let installments = (0..number_of_installment)
            .map(|i| Installment::new(loan_id, installment_amount, first_due + Months::new(i)))
            .collect();

        Self {
            loan_id,
            principal,
            interest_rate,
            number_of_installment,
            total_payable,
            installment_amount,
            installments,
        }
    }
}

/// first day of the month after `date`
fn first_of_next_month(date: NaiveDate) -> NaiveDate {
    let first_of_month = date - Days::new(u64::from(date.day0()));
    first_of_month + Months::new(1)
}
