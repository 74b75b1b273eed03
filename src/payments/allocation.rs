use chrono::{Months, NaiveDate};

use crate::decimal::Money;
use crate::model::Installment;
use crate::payments::adjustment::{AdjustedAmount, AdjustmentEngine};

/// allocator that spends a payment across payable installments
#[derive(Debug, Clone)]
pub struct PaymentAllocator {
    engine: AdjustmentEngine,
    horizon_months: u32,
}

/// one installment settled during allocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
    /// the installment row after settlement, ready to persist
    pub installment: Installment,
    pub adjusted: AdjustedAmount,
}

/// outcome of allocating one payment
#[derive(Debug, Clone)]
pub struct AllocationResult {
    pub settlements: Vec<Settlement>,
    pub leftover: Money,
    /// true when every candidate ended up paid, the loan closure condition
    pub all_candidates_paid: bool,
}

impl PaymentAllocator {
    pub fn new(engine: AdjustmentEngine, horizon_months: u32) -> Self {
        Self {
            engine,
            horizon_months,
        }
    }

    /// unpaid installments due strictly before `today + horizon`,
    /// in ascending due-date order
    pub fn payable_candidates(
        &self,
        installments: &[Installment],
        today: NaiveDate,
    ) -> Vec<Installment> {
        let horizon = today + Months::new(self.horizon_months);
        let mut candidates: Vec<Installment> = installments
            .iter()
            .filter(|i| !i.is_paid && i.due_date < horizon)
            .cloned()
            .collect();
        candidates.sort_by_key(|i| i.due_date);
        candidates
    }

    /// scan the candidates in order, settling each one the remaining funds
    /// can cover at its adjusted cost
    ///
    /// an unaffordable candidate is skipped without stopping the scan; the
    /// order is never revisited, so funds flow to a later candidate only if
    /// its own adjusted cost fits what is left.
    pub fn allocate(
        &self,
        candidates: Vec<Installment>,
        payment_amount: Money,
        today: NaiveDate,
    ) -> AllocationResult {
        let mut remaining = payment_amount;
        let mut settlements = Vec::new();
        let mut skipped = 0usize;

        for mut installment in candidates {
            let adjusted = self
                .engine
                .adjust(installment.amount, installment.due_date, today);

            if remaining >= adjusted.final_amount {
                installment.settle(adjusted.final_amount, today);
                remaining -= adjusted.final_amount;
                settlements.push(Settlement {
                    installment,
                    adjusted,
                });
            } else {
                skipped += 1;
            }
        }

        AllocationResult {
            settlements,
            leftover: remaining,
            all_candidates_paid: skipped == 0,
        }
    }
}
