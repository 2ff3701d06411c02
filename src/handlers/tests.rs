//! Unit tests for handler inputs
//!
//! The database paths are covered by tests/integration_api.rs.

#[cfg(test)]
mod tests {
    use crate::domain::DomainError;
    use crate::handlers::{
        parse_interest_rate, parse_positive_amount, DepositSavingsCommand, RepayLoanCommand,
    };
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    // =========================================================================
    // Amount parsing
    // =========================================================================

    #[test]
    fn test_parse_positive_amount() {
        assert_eq!(parse_positive_amount("250.50").unwrap().value(), dec!(250.50));
        assert_eq!(parse_positive_amount(" 10 ").unwrap().value(), dec!(10));
    }

    #[test]
    fn test_zero_amount_rejected() {
        assert!(matches!(
            parse_positive_amount("0.00"),
            Err(DomainError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_malformed_amounts_rejected() {
        for raw in ["-5", "1.005", "abc", ""] {
            assert!(
                matches!(parse_positive_amount(raw), Err(DomainError::InvalidAmount(_))),
                "{} should be rejected",
                raw
            );
        }
    }

    #[test]
    fn test_parse_interest_rate() {
        assert_eq!(parse_interest_rate("12.5").unwrap().value(), dec!(12.5));
        assert!(parse_interest_rate("1000").is_err());
        assert!(parse_interest_rate("ten").is_err());
    }

    // =========================================================================
    // Command builders
    // =========================================================================

    #[test]
    fn test_repay_loan_command() {
        let loan_id = Uuid::new_v4();
        let cmd = RepayLoanCommand::new(loan_id, "100.00".to_string())
            .with_description("M-Pesa repayment".to_string());

        assert_eq!(cmd.loan_id, loan_id);
        assert_eq!(cmd.description, Some("M-Pesa repayment".to_string()));
    }

    #[test]
    fn test_deposit_command_defaults() {
        let cmd = DepositSavingsCommand::new(Uuid::new_v4(), "75".to_string());
        assert!(cmd.description.is_none());
    }

    #[test]
    fn test_command_deserializes_without_items() {
        let cmd: crate::handlers::ApplyForLoanCommand = serde_json::from_value(serde_json::json!({
            "user_id": Uuid::new_v4(),
            "amount": "500",
            "interest_rate": "10",
            "duration_months": 3,
        }))
        .unwrap();
        assert!(cmd.item_ids.is_empty());
    }
}
