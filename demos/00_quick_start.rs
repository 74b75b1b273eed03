/// quick start - minimal example to get started
use credit_module_rs::{
    CreateCustomerRequest, CreateLoanRequest, CreditModule, Money, PayLoanRequest, Rate,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut module = CreditModule::in_memory();

    // register a customer with a 10,000 limit
    let customer = module.create_customer(CreateCustomerRequest {
        name: "Ada".to_string(),
        surname: "Lovelace".to_string(),
        credit_limit: Some(Money::from_major(10_000)),
        used_credit_limit: None,
    })?;

    // write a 5,000 loan at 20% over 12 installments
    let request = CreateLoanRequest {
        customer_id: customer.id,
        loan_amount: Money::from_major(5_000),
        number_of_installment: 12,
        interest_rate: Rate::from_percentage(20),
    };
    request.validate(&module.policy)?;
    let loan = module.create_loan_now(request)?;

    // pay 1,000 toward the schedule
    let summary = module.pay_loan_now(PayLoanRequest {
        loan_id: loan.id,
        payment_amount: Money::from_major(1_000),
    })?;

    println!(
        "paid {} installment(s), {} left unspent, {} installments remain",
        summary.paid_installments, summary.remaining_amount, summary.unpaid_installments
    );

    Ok(())
}
