use hourglass_rs::SafeTimeProvider;

use crate::api::{
    CreateCustomerRequest, CreateLoanRequest, InstallmentSummary, ListLoansRequest, LoanSummary,
    PayLoanRequest,
};
use crate::config::CreditPolicy;
use crate::decimal::Money;
use crate::errors::{CreditError, Result};
use crate::events::{Event, EventStore};
use crate::model::{Customer, Loan};
use crate::payments::{AdjustmentEngine, PaymentAllocator, PaymentSummary};
use crate::schedule::InstallmentSchedule;
use crate::store::{
    CustomerStore, InMemoryCustomers, InMemoryInstallments, InMemoryLoans, InstallmentStore,
    LoanStore,
};
use crate::types::LoanId;

/// core module struct wiring stores, policy and events
pub struct CreditModule<C, L, I> {
    pub policy: CreditPolicy,
    pub events: EventStore,
    customers: C,
    loans: L,
    installments: I,
}

impl CreditModule<InMemoryCustomers, InMemoryLoans, InMemoryInstallments> {
    /// module over shared in-memory stores with the standard policy
    pub fn in_memory() -> Self {
        Self::new(
            InMemoryCustomers::new(),
            InMemoryLoans::new(),
            InMemoryInstallments::new(),
            CreditPolicy::standard(),
        )
    }
}

impl<C, L, I> CreditModule<C, L, I>
where
    C: CustomerStore,
    L: LoanStore,
    I: InstallmentStore,
{
    /// create new module
    pub fn new(customers: C, loans: L, installments: I, policy: CreditPolicy) -> Self {
        Self {
            policy,
            events: EventStore::new(),
            customers,
            loans,
            installments,
        }
    }

    /// register a customer, omitted limits default to zero
    pub fn create_customer(&mut self, request: CreateCustomerRequest) -> Result<Customer> {
        let customer = Customer::new(
            request.name,
            request.surname,
            request.credit_limit.unwrap_or(Money::ZERO),
            request.used_credit_limit.unwrap_or(Money::ZERO),
        );
        self.customers.save(&customer)?;

        self.events.emit(Event::CustomerRegistered {
            customer_id: customer.id,
            name: customer.name.clone(),
            surname: customer.surname.clone(),
            credit_limit: customer.credit_limit,
        });

        Ok(customer)
    }

    /// create loan with system time
    pub fn create_loan_now(&mut self, request: CreateLoanRequest) -> Result<Loan> {
        let time = SafeTimeProvider::new(hourglass_rs::TimeSource::System);
        self.create_loan(request, &time)
    }

    /// write a loan and its installment schedule against a customer's limit
    pub fn create_loan(
        &mut self,
        request: CreateLoanRequest,
        time_provider: &SafeTimeProvider,
    ) -> Result<Loan> {
        let mut customer = self
            .customers
            .find(request.customer_id)?
            .ok_or(CreditError::CustomerNotFound)?;

        // the limit check is against the total approved limit, not headroom
        if customer.credit_limit < request.loan_amount {
            return Err(CreditError::InsufficientCreditLimit);
        }

        if !self.policy.allows_installment_count(request.number_of_installment) {
            return Err(CreditError::InvalidNumberOfInstallments);
        }

        let today = time_provider.now().date_naive();
        let loan = Loan::new(
            customer.id,
            request.loan_amount,
            request.number_of_installment,
            today,
        );
        let schedule = InstallmentSchedule::generate(
            loan.id,
            request.loan_amount,
            request.interest_rate,
            request.number_of_installment,
            today,
        );

        // persist loan, then the customer's new commitment, then the schedule
        self.loans.save(&loan)?;

        customer.reserve_credit(request.loan_amount);
        self.customers.save(&customer)?;

        self.installments.save_batch(&schedule.installments)?;

        self.events.emit(Event::LoanCreated {
            loan_id: loan.id,
            customer_id: customer.id,
            loan_amount: loan.loan_amount,
            total_payable: schedule.total_payable,
            number_of_installment: loan.number_of_installment,
            create_date: loan.create_date,
        });
        self.events.emit(Event::CreditReserved {
            customer_id: customer.id,
            amount: loan.loan_amount,
            used_credit_limit: customer.used_credit_limit,
        });

        Ok(loan)
    }

    /// list a customer's loans through the optional filters
    pub fn list_loans(&self, request: ListLoansRequest) -> Result<Vec<LoanSummary>> {
        if self.customers.find(request.customer_id)?.is_none() {
            return Err(CreditError::CustomerNotFound);
        }

        let loans = self.loans.find_by_customer(request.customer_id)?;
        if loans.is_empty() {
            return Err(CreditError::LoanNotFound);
        }

        // filters apply after the existence check, an empty match is not an error
        let filter = request.filter();
        Ok(loans
            .iter()
            .filter(|loan| filter.matches(loan.number_of_installment, loan.is_paid))
            .map(LoanSummary::from_loan)
            .collect())
    }

    /// list the full installment ledger of a loan
    pub fn list_installments(&self, loan_id: LoanId) -> Result<Vec<InstallmentSummary>> {
        let installments = self.installments.find_by_loan(loan_id)?;
        if installments.is_empty() {
            return Err(CreditError::InstallmentNotFound);
        }
        Ok(installments
            .iter()
            .map(InstallmentSummary::from_installment)
            .collect())
    }

    /// pay loan with system time
    pub fn pay_loan_now(&mut self, request: PayLoanRequest) -> Result<PaymentSummary> {
        let time = SafeTimeProvider::new(hourglass_rs::TimeSource::System);
        self.pay_loan(request, &time)
    }

    /// allocate a payment across the loan's payable installments
    pub fn pay_loan(
        &mut self,
        request: PayLoanRequest,
        time_provider: &SafeTimeProvider,
    ) -> Result<PaymentSummary> {
        let mut loan = self
            .loans
            .find(request.loan_id)?
            .ok_or(CreditError::LoanNotFound)?;

        let today = time_provider.now().date_naive();
        let ledger = self.installments.find_by_loan(loan.id)?;

        let allocator = PaymentAllocator::new(
            AdjustmentEngine::new(self.policy.daily_adjustment_rate),
            self.policy.payment_horizon_months,
        );
        let candidates = allocator.payable_candidates(&ledger, today);
        if candidates.is_empty() {
            return Err(CreditError::NoPayableInstallments);
        }

        let result = allocator.allocate(candidates, request.payment_amount, today);

        for settlement in &result.settlements {
            self.installments.save(&settlement.installment)?;

            self.events.emit(Event::InstallmentPaid {
                loan_id: loan.id,
                installment_id: settlement.installment.id,
                nominal_amount: settlement.adjusted.nominal_amount,
                adjustment: settlement.adjusted.adjustment,
                paid_amount: settlement.adjusted.final_amount,
                days_to_due: settlement.adjusted.days_difference,
                payment_date: today,
            });
        }

        self.events.emit(Event::PaymentReceived {
            loan_id: loan.id,
            amount: request.payment_amount,
            installments_paid: result.settlements.len() as u32,
            leftover: result.leftover,
            payment_date: today,
        });

        // the closure check sees only the payable window; installments due
        // beyond the horizon are not consulted
        if result.all_candidates_paid {
            loan.mark_paid();
            self.loans.save(&loan)?;

            let mut customer = self
                .customers
                .find(loan.customer_id)?
                .ok_or(CreditError::CustomerNotFound)?;
            customer.release_credit(loan.loan_amount);
            self.customers.save(&customer)?;

            self.events.emit(Event::LoanSettled {
                loan_id: loan.id,
                customer_id: customer.id,
                settled_on: today,
            });
            self.events.emit(Event::CreditReleased {
                customer_id: customer.id,
                amount: loan.loan_amount,
                used_credit_limit: customer.used_credit_limit,
            });
        }

        // the unpaid count comes from the whole ledger, horizon or not
        let ledger = self.installments.find_by_loan(loan.id)?;
        let unpaid_installments = ledger.iter().filter(|i| !i.is_paid).count() as u64;

        Ok(PaymentSummary {
            loan_id: loan.id,
            loan_amount: loan.loan_amount,
            total_installments: loan.number_of_installment,
            paid_installments: result.settlements.len() as u32,
            unpaid_installments,
            remaining_amount: result.leftover,
            payment_date: today,
        })
    }

    /// get events
    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.take_events()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use hourglass_rs::TimeSource;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    use crate::decimal::Rate;
    use crate::types::CustomerId;

    fn test_time(y: i32, m: u32, d: u32) -> SafeTimeProvider {
        SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap(),
        ))
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn money(s: &str) -> Money {
        Money::from_str_exact(s).unwrap()
    }

    type InMemoryModule = CreditModule<InMemoryCustomers, InMemoryLoans, InMemoryInstallments>;

    fn module_with_customer(credit_limit: i64, used: i64) -> (InMemoryModule, Customer) {
        let mut module = CreditModule::in_memory();
        let customer = module
            .create_customer(CreateCustomerRequest {
                name: "Ada".to_string(),
                surname: "Lovelace".to_string(),
                credit_limit: Some(Money::from_major(credit_limit)),
                used_credit_limit: Some(Money::from_major(used)),
            })
            .unwrap();
        (module, customer)
    }

    fn loan_request(customer_id: CustomerId, amount: i64, count: u32) -> CreateLoanRequest {
        CreateLoanRequest {
            customer_id,
            loan_amount: Money::from_major(amount),
            number_of_installment: count,
            interest_rate: Rate::from_decimal(dec!(0.2)),
        }
    }

    #[test]
    fn test_create_customer_defaults_limits() {
        let mut module = CreditModule::in_memory();
        let customer = module
            .create_customer(CreateCustomerRequest {
                name: "Grace".to_string(),
                surname: "Hopper".to_string(),
                credit_limit: None,
                used_credit_limit: None,
            })
            .unwrap();
        assert_eq!(customer.credit_limit, Money::ZERO);
        assert_eq!(customer.used_credit_limit, Money::ZERO);
    }

    #[test]
    fn test_create_loan_writes_schedule_and_reserves_credit() {
        let customers = InMemoryCustomers::new();
        let mut module = CreditModule::new(
            customers.clone(),
            InMemoryLoans::new(),
            InMemoryInstallments::new(),
            CreditPolicy::standard(),
        );
        let customer = module
            .create_customer(CreateCustomerRequest {
                name: "Ada".to_string(),
                surname: "Lovelace".to_string(),
                credit_limit: Some(Money::from_major(10_000)),
                used_credit_limit: Some(Money::from_major(2_000)),
            })
            .unwrap();

        let time = test_time(2024, 1, 15);
        let loan = module
            .create_loan(loan_request(customer.id, 5_000, 12), &time)
            .unwrap();

        assert_eq!(loan.create_date, date(2024, 1, 15));
        assert!(!loan.is_paid);

        let stored = customers.find(customer.id).unwrap().unwrap();
        assert_eq!(stored.used_credit_limit, Money::from_major(7_000));

        let installments = module.list_installments(loan.id).unwrap();
        assert_eq!(installments.len(), 12);
        // 5000 * 1.2 = 6000 split into twelve equal 500s
        for installment in &installments {
            assert_eq!(installment.amount, Money::from_major(500));
            assert!(!installment.is_paid);
        }
        assert_eq!(installments[0].due_date, date(2024, 2, 1));
        assert_eq!(installments[11].due_date, date(2025, 1, 1));
    }

    #[test]
    fn test_create_loan_rejections() {
        let (mut module, customer) = module_with_customer(4_000, 0);
        let time = test_time(2024, 1, 15);

        let err = module
            .create_loan(loan_request(Uuid::new_v4(), 1_000, 12), &time)
            .unwrap_err();
        assert!(matches!(err, CreditError::CustomerNotFound));

        let err = module
            .create_loan(loan_request(customer.id, 5_000, 12), &time)
            .unwrap_err();
        assert!(matches!(err, CreditError::InsufficientCreditLimit));

        let err = module
            .create_loan(loan_request(customer.id, 1_000, 10), &time)
            .unwrap_err();
        assert!(matches!(err, CreditError::InvalidNumberOfInstallments));
    }

    #[test]
    fn test_credit_check_ignores_existing_usage() {
        // the check compares the raw limit, a customer with 9000 of 10000
        // already committed can still borrow 5000
        let (mut module, customer) = module_with_customer(10_000, 9_000);
        let time = test_time(2024, 1, 15);

        let loan = module
            .create_loan(loan_request(customer.id, 5_000, 12), &time)
            .unwrap();
        assert_eq!(loan.loan_amount, Money::from_major(5_000));
    }

    #[test]
    fn test_list_loans_requires_customer_and_loans() {
        let (module, customer) = module_with_customer(10_000, 0);

        let err = module
            .list_loans(ListLoansRequest {
                customer_id: Uuid::new_v4(),
                number_of_installment: None,
                is_paid: None,
            })
            .unwrap_err();
        assert!(matches!(err, CreditError::CustomerNotFound));

        // a customer with zero loans is an error, not an empty list
        let err = module
            .list_loans(ListLoansRequest {
                customer_id: customer.id,
                number_of_installment: None,
                is_paid: None,
            })
            .unwrap_err();
        assert!(matches!(err, CreditError::LoanNotFound));
    }

    #[test]
    fn test_list_loans_filters() {
        let (mut module, customer) = module_with_customer(10_000, 0);
        let time = test_time(2024, 1, 15);
        module.create_loan(loan_request(customer.id, 1_200, 6), &time).unwrap();
        module.create_loan(loan_request(customer.id, 2_400, 12), &time).unwrap();

        let all = module
            .list_loans(ListLoansRequest {
                customer_id: customer.id,
                number_of_installment: None,
                is_paid: None,
            })
            .unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].loan_amount, Money::from_major(1_200));

        let twelves = module
            .list_loans(ListLoansRequest {
                customer_id: customer.id,
                number_of_installment: Some(12),
                is_paid: None,
            })
            .unwrap();
        assert_eq!(twelves.len(), 1);
        assert_eq!(twelves[0].number_of_installment, 12);

        // a filter that matches nothing is an empty list
        let paid = module
            .list_loans(ListLoansRequest {
                customer_id: customer.id,
                number_of_installment: None,
                is_paid: Some(true),
            })
            .unwrap();
        assert!(paid.is_empty());
    }

    #[test]
    fn test_list_installments_unknown_loan() {
        let module = CreditModule::in_memory();
        let err = module.list_installments(Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, CreditError::InstallmentNotFound));
    }

    #[test]
    fn test_pay_loan_unknown_loan() {
        let mut module = CreditModule::in_memory();
        let err = module
            .pay_loan(
                PayLoanRequest {
                    loan_id: Uuid::new_v4(),
                    payment_amount: Money::from_major(500),
                },
                &test_time(2024, 2, 1),
            )
            .unwrap_err();
        assert!(matches!(err, CreditError::LoanNotFound));
    }

    #[test]
    fn test_pay_loan_allocates_in_order_with_discounts() {
        let customers = InMemoryCustomers::new();
        let mut module = CreditModule::new(
            customers.clone(),
            InMemoryLoans::new(),
            InMemoryInstallments::new(),
            CreditPolicy::standard(),
        );
        let customer = module
            .create_customer(CreateCustomerRequest {
                name: "Ada".to_string(),
                surname: "Lovelace".to_string(),
                credit_limit: Some(Money::from_major(10_000)),
                used_credit_limit: Some(Money::from_major(2_000)),
            })
            .unwrap();
        let loan = module
            .create_loan(loan_request(customer.id, 5_000, 12), &test_time(2024, 1, 15))
            .unwrap();

        // paying 1400 on 2024-02-01: due 02-01 costs 500, due 03-01 costs
        // 485.5 (29 days early); due 04-01 costs 470 (60 days early), more
        // than the 414.5 left, so it is skipped
        let summary = module
            .pay_loan(
                PayLoanRequest {
                    loan_id: loan.id,
                    payment_amount: Money::from_major(1_400),
                },
                &test_time(2024, 2, 1),
            )
            .unwrap();

        assert_eq!(summary.paid_installments, 2);
        assert_eq!(summary.unpaid_installments, 10);
        assert_eq!(summary.total_installments, 12);
        assert_eq!(summary.remaining_amount, money("414.5"));
        assert_eq!(summary.payment_date, date(2024, 2, 1));

        let installments = module.list_installments(loan.id).unwrap();
        assert_eq!(installments[0].paid_amount, Money::from_major(500));
        assert_eq!(installments[1].paid_amount, money("485.5"));
        assert_eq!(installments[1].payment_date, Some(date(2024, 2, 1)));
        assert!(!installments[2].is_paid);
        assert!(!installments[3].is_paid);

        // a candidate went unpaid, so the loan stays open and the
        // reserved credit stays put
        let loans = module
            .list_loans(ListLoansRequest {
                customer_id: customer.id,
                number_of_installment: None,
                is_paid: None,
            })
            .unwrap();
        assert!(!loans[0].is_paid);
        assert_eq!(
            customers.find(customer.id).unwrap().unwrap().used_credit_limit,
            Money::from_major(7_000)
        );
    }

    #[test]
    fn test_full_window_payment_closes_the_loan() {
        let customers = InMemoryCustomers::new();
        let mut module = CreditModule::new(
            customers.clone(),
            InMemoryLoans::new(),
            InMemoryInstallments::new(),
            CreditPolicy::standard(),
        );
        let customer = module
            .create_customer(CreateCustomerRequest {
                name: "Ada".to_string(),
                surname: "Lovelace".to_string(),
                credit_limit: Some(Money::from_major(10_000)),
                used_credit_limit: Some(Money::from_major(2_000)),
            })
            .unwrap();
        let loan = module
            .create_loan(loan_request(customer.id, 5_000, 12), &test_time(2024, 1, 15))
            .unwrap();

        // 1500 covers all three candidates due before 2024-05-01
        // (500 + 485.5 + 470 = 1455.5), so the loan closes and the
        // principal is released even with nine installments left
        let summary = module
            .pay_loan(
                PayLoanRequest {
                    loan_id: loan.id,
                    payment_amount: Money::from_major(1_500),
                },
                &test_time(2024, 2, 1),
            )
            .unwrap();

        assert_eq!(summary.paid_installments, 3);
        assert_eq!(summary.unpaid_installments, 9);
        assert_eq!(summary.remaining_amount, money("44.5"));

        let loans = module
            .list_loans(ListLoansRequest {
                customer_id: customer.id,
                number_of_installment: None,
                is_paid: None,
            })
            .unwrap();
        assert!(loans[0].is_paid);
        assert_eq!(
            customers.find(customer.id).unwrap().unwrap().used_credit_limit,
            Money::from_major(2_000)
        );
    }

    #[test]
    fn test_pay_loan_rejects_when_nothing_in_window() {
        let (mut module, customer) = module_with_customer(10_000, 0);
        let loan = module
            .create_loan(loan_request(customer.id, 5_000, 12), &test_time(2024, 1, 15))
            .unwrap();

        // pay everything reachable from 2024-02-01, then pay again the same day
        module
            .pay_loan(
                PayLoanRequest {
                    loan_id: loan.id,
                    payment_amount: Money::from_major(1_500),
                },
                &test_time(2024, 2, 1),
            )
            .unwrap();
        let err = module
            .pay_loan(
                PayLoanRequest {
                    loan_id: loan.id,
                    payment_amount: Money::from_major(1_500),
                },
                &test_time(2024, 2, 1),
            )
            .unwrap_err();
        assert!(matches!(err, CreditError::NoPayableInstallments));
    }

    #[test]
    fn test_settling_all_candidates_closes_loan_and_releases_credit() {
        let customers = InMemoryCustomers::new();
        let mut module = CreditModule::new(
            customers.clone(),
            InMemoryLoans::new(),
            InMemoryInstallments::new(),
            CreditPolicy::standard(),
        );
        let customer = module
            .create_customer(CreateCustomerRequest {
                name: "Ada".to_string(),
                surname: "Lovelace".to_string(),
                credit_limit: Some(Money::from_major(1_000)),
                used_credit_limit: None,
            })
            .unwrap();

        // 600 at 50% over 6 installments of 150, due 02-01 through 07-01
        let loan = module
            .create_loan(
                CreateLoanRequest {
                    customer_id: customer.id,
                    loan_amount: Money::from_major(600),
                    number_of_installment: 6,
                    interest_rate: Rate::from_decimal(dec!(0.5)),
                },
                &test_time(2024, 1, 15),
            )
            .unwrap();
        assert_eq!(
            customers.find(customer.id).unwrap().unwrap().used_credit_limit,
            Money::from_major(600)
        );

        // on 2024-05-05 every installment falls inside the window; the six
        // adjusted costs sum to 857.85
        let summary = module
            .pay_loan(
                PayLoanRequest {
                    loan_id: loan.id,
                    payment_amount: Money::from_major(900),
                },
                &test_time(2024, 5, 5),
            )
            .unwrap();

        assert_eq!(summary.paid_installments, 6);
        assert_eq!(summary.unpaid_installments, 0);
        assert_eq!(summary.remaining_amount, money("42.15"));

        let loans = module
            .list_loans(ListLoansRequest {
                customer_id: customer.id,
                number_of_installment: None,
                is_paid: None,
            })
            .unwrap();
        assert!(loans[0].is_paid);

        let stored = customers.find(customer.id).unwrap().unwrap();
        assert_eq!(stored.used_credit_limit, Money::ZERO);
    }

    #[test]
    fn test_closure_only_consults_payable_window() {
        let customers = InMemoryCustomers::new();
        let mut module = CreditModule::new(
            customers.clone(),
            InMemoryLoans::new(),
            InMemoryInstallments::new(),
            CreditPolicy::standard(),
        );
        let customer = module
            .create_customer(CreateCustomerRequest {
                name: "Ada".to_string(),
                surname: "Lovelace".to_string(),
                credit_limit: Some(Money::from_major(5_000)),
                used_credit_limit: None,
            })
            .unwrap();

        // 24 installments of 125; on 2024-02-01 only the first three are
        // payable, settling them closes the loan with 21 still unpaid
        let loan = module
            .create_loan(
                CreateLoanRequest {
                    customer_id: customer.id,
                    loan_amount: Money::from_major(2_400),
                    number_of_installment: 24,
                    interest_rate: Rate::from_decimal(dec!(0.25)),
                },
                &test_time(2024, 1, 15),
            )
            .unwrap();

        let summary = module
            .pay_loan(
                PayLoanRequest {
                    loan_id: loan.id,
                    payment_amount: Money::from_major(400),
                },
                &test_time(2024, 2, 1),
            )
            .unwrap();

        assert_eq!(summary.paid_installments, 3);
        assert_eq!(summary.unpaid_installments, 21);

        let loans = module
            .list_loans(ListLoansRequest {
                customer_id: customer.id,
                number_of_installment: None,
                is_paid: None,
            })
            .unwrap();
        assert!(loans[0].is_paid);
        assert_eq!(
            customers.find(customer.id).unwrap().unwrap().used_credit_limit,
            Money::ZERO
        );
    }

    #[test]
    fn test_events_trace_the_lifecycle() {
        let (mut module, customer) = module_with_customer(10_000, 0);
        let loan = module
            .create_loan(loan_request(customer.id, 5_000, 12), &test_time(2024, 1, 15))
            .unwrap();
        module
            .pay_loan(
                PayLoanRequest {
                    loan_id: loan.id,
                    payment_amount: Money::from_major(500),
                },
                &test_time(2024, 2, 1),
            )
            .unwrap();

        let events = module.take_events();
        assert!(matches!(events[0], Event::CustomerRegistered { .. }));
        assert!(matches!(events[1], Event::LoanCreated { .. }));
        assert!(matches!(events[2], Event::CreditReserved { .. }));
        assert!(matches!(events[3], Event::InstallmentPaid { .. }));
        assert!(matches!(events[4], Event::PaymentReceived { .. }));
        assert_eq!(events.len(), 5);

        match &events[3] {
            Event::InstallmentPaid {
                paid_amount,
                adjustment,
                days_to_due,
                ..
            } => {
                assert_eq!(*paid_amount, Money::from_major(500));
                assert_eq!(*adjustment, Money::ZERO);
                assert_eq!(*days_to_due, 0);
            }
            other => panic!("unexpected event {:?}", other),
        }

        assert!(module.take_events().is_empty());
    }
}
