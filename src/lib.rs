pub mod api;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod model;
pub mod module;
pub mod payments;
pub mod schedule;
pub mod store;
pub mod types;

// re-export key types
pub use api::{
    CreateCustomerRequest, CreateLoanRequest, InstallmentSummary, ListLoansRequest, LoanSummary,
    PayLoanRequest,
};
pub use config::CreditPolicy;
pub use decimal::{Money, Rate};
pub use errors::{CreditError, ErrorResponse, Result, ValidationError};
pub use events::{Event, EventStore};
pub use model::{Customer, Installment, Loan};
pub use module::CreditModule;
pub use payments::{
    AdjustedAmount, AdjustmentEngine, AllocationResult, PaymentAllocator, PaymentSummary,
    Settlement,
};
pub use schedule::InstallmentSchedule;
pub use store::{
    CustomerStore, InMemoryCustomers, InMemoryInstallments, InMemoryLoans, InstallmentStore,
    LoanStore,
};
pub use types::{CustomerId, InstallmentId, LoanFilter, LoanId};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
