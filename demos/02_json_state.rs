/// json state - wire shapes for summaries, events and errors
use credit_module_rs::{
    CreateCustomerRequest, CreateLoanRequest, CreditError, CreditModule, ErrorResponse,
    ListLoansRequest, Money, PayLoanRequest, Rate, SafeTimeProvider, TimeSource, Uuid,
};
use chrono::{TimeZone, Utc};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== json state ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap(),
    ));

    let mut module = CreditModule::in_memory();
    let customer = module.create_customer(CreateCustomerRequest {
        name: "Marie".to_string(),
        surname: "Curie".to_string(),
        credit_limit: Some(Money::from_major(8_000)),
        used_credit_limit: None,
    })?;

    println!("stage 1: registered customer");
    println!("----------------------------");
    println!("{}\n", serde_json::to_string_pretty(&customer)?);

    let loan = module.create_loan(
        CreateLoanRequest {
            customer_id: customer.id,
            loan_amount: Money::from_major(2_400),
            number_of_installment: 6,
            interest_rate: Rate::from_percentage(25),
        },
        &time,
    )?;

    println!("stage 2: loan written");
    println!("---------------------");
    let loans = module.list_loans(ListLoansRequest {
        customer_id: customer.id,
        number_of_installment: None,
        is_paid: None,
    })?;
    println!("{}\n", loans[0].to_json_pretty()?);

    println!("stage 3: first scheduled installment");
    println!("------------------------------------");
    let installments = module.list_installments(loan.id)?;
    println!("{}\n", installments[0].to_json_pretty()?);

    println!("stage 4: after a 1,000 payment");
    println!("------------------------------");
    let summary = module.pay_loan(
        PayLoanRequest {
            loan_id: loan.id,
            payment_amount: Money::from_major(1_000),
        },
        &time,
    )?;
    println!("{}\n", serde_json::to_string_pretty(&summary)?);

    println!("stage 5: event stream");
    println!("---------------------");
    let events = module.take_events();
    println!("{}\n", serde_json::to_string_pretty(&events)?);

    // error bodies, the catalog shape and the unexpected-failure shape
    println!("stage 6: error shapes");
    println!("---------------------");
    if let Err(e) = module.pay_loan(
        PayLoanRequest {
            loan_id: Uuid::new_v4(),
            payment_amount: Money::from_major(100),
        },
        &time,
    ) {
        println!("{}", serde_json::to_string_pretty(&ErrorResponse::from(&e))?);
    }
    let storage = CreditError::Storage("connection reset".to_string());
    println!(
        "{}",
        serde_json::to_string_pretty(&ErrorResponse::from(&storage))?
    );

    Ok(())
}
