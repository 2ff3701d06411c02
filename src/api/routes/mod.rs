//! API Routes
//!
//! HTTP endpoint definitions, one module per group of records.

use axum::Router;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AppState;

pub mod items;
pub mod loans;
pub mod payments;
pub mod savings;
pub mod users;

// =========================================================================
// Shared request/response types
// =========================================================================

/// Body of the repay and deposit endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct AmountRequest {
    /// Amount (as string for precise decimal)
    pub amount: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MaxLoanAmountResponse {
    pub user_id: Uuid,
    pub max_loan_amount: Decimal,
}

// =========================================================================
// API Router
// =========================================================================

/// Create the API router
pub fn create_router() -> Router<AppState> {
    Router::new()
        .merge(users::routes())
        .merge(items::routes())
        .merge(loans::routes())
        .merge(savings::routes())
        .merge(payments::routes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_request_deserialize() {
        let json = r#"{"amount": "150.00"}"#;
        let request: AmountRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.amount, "150.00");
        assert!(request.description.is_none());
    }

    #[test]
    fn test_amount_request_with_description() {
        let json = r#"{"amount": "20", "description": "Weekly deposit"}"#;
        let request: AmountRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.description.as_deref(), Some("Weekly deposit"));
    }
}
