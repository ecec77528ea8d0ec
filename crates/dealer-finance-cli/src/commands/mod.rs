pub mod loan;
pub mod products;
pub mod quote;
pub mod session;
