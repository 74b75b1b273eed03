/// lifecycle - a loan from registration to settlement
use credit_module_rs::{
    CreateCustomerRequest, CreateLoanRequest, CreditModule, Event, ListLoansRequest, Money,
    PayLoanRequest, Rate, SafeTimeProvider, TimeSource,
};
use chrono::{Duration, TimeZone, Utc};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== loan lifecycle ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap(),
    ));
    let controller = time.test_control().unwrap();

    let mut module = CreditModule::in_memory();

    // 1. registration
    println!("1. registration");
    println!("---------------");
    let customer = module.create_customer(CreateCustomerRequest {
        name: "Ada".to_string(),
        surname: "Lovelace".to_string(),
        credit_limit: Some(Money::from_major(10_000)),
        used_credit_limit: None,
    })?;
    println!("  ✓ customer registered, limit {}", customer.credit_limit);

    // 2. loan creation
    println!("\n2. loan creation");
    println!("----------------");
    let loan = module.create_loan(
        CreateLoanRequest {
            customer_id: customer.id,
            loan_amount: Money::from_major(600),
            number_of_installment: 6,
            interest_rate: Rate::from_percentage(50),
        },
        &time,
    )?;
    println!("  ✓ 600 at 50% over 6 installments");
    let schedule = module.list_installments(loan.id)?;
    for installment in &schedule {
        println!("    {} due {}", installment.amount, installment.due_date);
    }

    // 3. servicing, one installment on each due date
    println!("\n3. servicing");
    println!("------------");
    for (month, days) in [(1, 17i64), (2, 29), (3, 31)] {
        controller.advance(Duration::days(days));
        let summary = module.pay_loan(
            PayLoanRequest {
                loan_id: loan.id,
                payment_amount: Money::from_major(150),
            },
            &time,
        )?;
        println!(
            "  month {}: {} paid {} installment, {} unpaid remain",
            month,
            time.now().format("%Y-%m-%d"),
            summary.paid_installments,
            summary.unpaid_installments
        );
    }

    // 4. settlement, the last three installments in one payment
    println!("\n4. settlement");
    println!("-------------");
    controller.advance(Duration::days(34));
    println!("  date: {}", time.now().format("%Y-%m-%d"));
    let summary = module.pay_loan(
        PayLoanRequest {
            loan_id: loan.id,
            payment_amount: Money::from_major(450),
        },
        &time,
    )?;
    println!(
        "  ✓ paid {} installments, leftover {}",
        summary.paid_installments, summary.remaining_amount
    );

    let loans = module.list_loans(ListLoansRequest {
        customer_id: customer.id,
        number_of_installment: None,
        is_paid: Some(true),
    })?;
    println!("  loan settled: {}", loans[0].is_paid);

    // 5. replay the event stream
    println!("\n5. event stream");
    println!("---------------");
    for event in module.take_events() {
        match event {
            Event::CustomerRegistered { name, surname, .. } => {
                println!("  customer registered: {} {}", name, surname)
            }
            Event::CreditReserved {
                amount,
                used_credit_limit,
                ..
            } => println!("  credit reserved: {} (used now {})", amount, used_credit_limit),
            Event::CreditReleased {
                amount,
                used_credit_limit,
                ..
            } => println!("  credit released: {} (used now {})", amount, used_credit_limit),
            Event::LoanCreated { total_payable, .. } => {
                println!("  loan created, total payable {}", total_payable)
            }
            Event::LoanSettled { settled_on, .. } => {
                println!("  loan settled on {}", settled_on)
            }
            Event::InstallmentPaid {
                paid_amount,
                days_to_due,
                ..
            } => println!(
                "  installment paid: {} ({} days to due)",
                paid_amount, days_to_due
            ),
            Event::PaymentReceived {
                amount, leftover, ..
            } => println!("  payment received: {} (leftover {})", amount, leftover),
        }
    }

    // 6. a loan the limit cannot carry
    println!("\n6. rejected loan");
    println!("----------------");
    match module.create_loan(
        CreateLoanRequest {
            customer_id: customer.id,
            loan_amount: Money::from_major(20_000),
            number_of_installment: 12,
            interest_rate: Rate::from_percentage(20),
        },
        &time,
    ) {
        Ok(_) => println!("  error: expected rejection"),
        Err(e) => println!("  ✗ {}", e),
    }

    Ok(())
}
