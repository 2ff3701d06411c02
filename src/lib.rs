//! MamaPesa Library
//!
//! Microloan and savings ledger: records, the values derived from them,
//! and the data API. Re-exports modules for integration testing and the
//! server binary.

pub mod api;
pub mod config;
pub mod db;
pub mod domain;
pub mod handlers;
pub mod models;
pub mod repository;

mod error;

#[cfg(test)]
mod test_support;

pub use config::Config;
pub use domain::{DomainError, LoanPolicy, Money, MoneyError, OperationContext};
pub use error::{AppError, ErrorResponse};
pub use repository::{RepositoryError, RepositoryResult};
