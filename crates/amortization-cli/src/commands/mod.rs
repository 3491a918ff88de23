pub mod currency;
pub mod export;
pub mod loan;
