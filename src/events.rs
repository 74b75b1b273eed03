use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::{CustomerId, InstallmentId, LoanId};

/// all events that can be emitted by the module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    // customer events
    CustomerRegistered {
        customer_id: CustomerId,
        name: String,
        surname: String,
        credit_limit: Money,
    },
    CreditReserved {
        customer_id: CustomerId,
        amount: Money,
        used_credit_limit: Money,
    },
    CreditReleased {
        customer_id: CustomerId,
        amount: Money,
        used_credit_limit: Money,
    },

    // loan lifecycle events
    LoanCreated {
        loan_id: LoanId,
        customer_id: CustomerId,
        loan_amount: Money,
        total_payable: Money,
        number_of_installment: u32,
        create_date: NaiveDate,
    },
    LoanSettled {
        loan_id: LoanId,
        customer_id: CustomerId,
        settled_on: NaiveDate,
    },

    // payment events
    InstallmentPaid {
        loan_id: LoanId,
        installment_id: InstallmentId,
        nominal_amount: Money,
        adjustment: Money,
        paid_amount: Money,
        /// due date minus payment date in days, negative when paid late
        days_to_due: i64,
        payment_date: NaiveDate,
    },
    PaymentReceived {
        loan_id: LoanId,
        amount: Money,
        installments_paid: u32,
        leftover: Money,
        payment_date: NaiveDate,
    },
}

/// event store for collecting events during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_take_events_drains() {
        let mut store = EventStore::new();
        store.emit(Event::CreditReserved {
            customer_id: Uuid::new_v4(),
            amount: Money::from_major(5_000),
            used_credit_limit: Money::from_major(7_000),
        });
        assert_eq!(store.events().len(), 1);

        let drained = store.take_events();
        assert_eq!(drained.len(), 1);
        assert!(store.events().is_empty());
    }

    #[test]
    fn test_events_serialize() {
        let event = Event::PaymentReceived {
            loan_id: Uuid::new_v4(),
            amount: Money::from_major(1_000),
            installments_paid: 2,
            leftover: Money::ZERO,
            payment_date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("PaymentReceived"));
        assert!(json.contains("2024-02-01"));
    }
}
