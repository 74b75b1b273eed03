/// payment timing - per-diem adjustment and the payable window
use credit_module_rs::{
    AdjustmentEngine, CreateCustomerRequest, CreateLoanRequest, CreditModule, Money,
    PayLoanRequest, Rate, SafeTimeProvider, TimeSource,
};
use chrono::{Duration, NaiveDate, TimeZone, Utc};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== payment timing ===\n");

    // controlled time pinned to loan creation day
    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap(),
    ));
    let controller = time.test_control().unwrap();

    let mut module = CreditModule::in_memory();
    let customer = module.create_customer(CreateCustomerRequest {
        name: "Ada".to_string(),
        surname: "Lovelace".to_string(),
        credit_limit: Some(Money::from_major(10_000)),
        used_credit_limit: None,
    })?;

    let loan = module.create_loan(
        CreateLoanRequest {
            customer_id: customer.id,
            loan_amount: Money::from_major(5_000),
            number_of_installment: 12,
            interest_rate: Rate::from_percentage(20),
        },
        &time,
    )?;

    println!("loan written on {}", time.now().format("%Y-%m-%d"));
    let schedule = module.list_installments(loan.id)?;
    println!(
        "schedule: {} installments of {} starting {}\n",
        schedule.len(),
        schedule[0].amount,
        schedule[0].due_date
    );

    // what one installment costs depending on when it is paid
    let engine = AdjustmentEngine::new(module.policy.daily_adjustment_rate);
    let due = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    for (label, pay_on) in [
        ("a month early", NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()),
        ("on the due date", due),
        ("ten days late", NaiveDate::from_ymd_opt(2024, 3, 11).unwrap()),
    ] {
        let cost = engine.adjust(schedule[0].amount, due, pay_on);
        println!(
            "paying the 03-01 installment {} ({}): adjustment {}, final {}",
            label, pay_on, cost.adjustment, cost.final_amount
        );
    }

    // advance to the first due date and pay 1500
    controller.advance(Duration::days(17));
    println!("\nadvanced to: {}", time.now().format("%Y-%m-%d"));

    let summary = module.pay_loan(
        PayLoanRequest {
            loan_id: loan.id,
            payment_amount: Money::from_major(1_500),
        },
        &time,
    )?;
    println!(
        "paid {} installments, leftover {}",
        summary.paid_installments, summary.remaining_amount
    );

    let ledger = module.list_installments(loan.id)?;
    for installment in ledger.iter().filter(|i| i.is_paid) {
        println!(
            "  due {} settled for {} (nominal {})",
            installment.due_date, installment.paid_amount, installment.amount
        );
    }

    // everything inside the three month window is settled now; the rest of
    // the schedule is out of reach until time moves on
    match module.pay_loan(
        PayLoanRequest {
            loan_id: loan.id,
            payment_amount: Money::from_major(1_500),
        },
        &time,
    ) {
        Ok(_) => println!("error: expected no payable installments"),
        Err(e) => println!("\npaying again today: {}", e),
    }

    Ok(())
}
