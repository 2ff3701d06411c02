//! Lending policy
//!
//! The loan ceiling is a configuration value handed to every calculation
//! that needs it instead of a global read from inside the records.

use rust_decimal::Decimal;

use super::money::floor_at_zero;

/// Default loan ceiling in currency units
pub const LOAN_LIMIT: i64 = 5000;

/// Currency units of borrowing allowed per trust score point
pub const SCORE_MULTIPLIER: i64 = 100;

/// Score given to a newly created trust score
pub const DEFAULT_TRUST_SCORE: i32 = 100;

/// Length of a savings plan; `end_date` is always `start_date` plus this
pub const SAVINGS_PERIOD_DAYS: i64 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoanPolicy {
    loan_limit: Decimal,
}

impl LoanPolicy {
    pub fn new(loan_limit: Decimal) -> Self {
        Self { loan_limit }
    }

    pub fn loan_limit(&self) -> Decimal {
        self.loan_limit
    }

    /// `min(score * 100, loan_limit)`. A negative score yields a negative
    /// ceiling, which rejects every application.
    pub fn max_for_score(&self, score: i32) -> Decimal {
        let by_score = Decimal::from(score) * Decimal::from(SCORE_MULTIPLIER);
        by_score.min(self.loan_limit)
    }

    /// `max(0, amount - repaid - loan_limit)`.
    ///
    /// The loan limit is subtracted from the per-loan balance; this is not
    /// the plain outstanding balance.
    pub fn remaining_after_limit(&self, amount: Decimal, repaid: Decimal) -> Decimal {
        let outstanding = amount - repaid;
        if outstanding < Decimal::ZERO {
            tracing::warn!(
                %amount,
                %repaid,
                "Repaid amount exceeds loan principal"
            );
        }
        floor_at_zero(outstanding - self.loan_limit)
    }
}

impl Default for LoanPolicy {
    fn default() -> Self {
        Self::new(Decimal::from(LOAN_LIMIT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_max_for_score_below_limit() {
        let policy = LoanPolicy::default();
        assert_eq!(policy.max_for_score(40), dec!(4000));
        assert_eq!(policy.max_for_score(0), Decimal::ZERO);
    }

    #[test]
    fn test_max_for_score_capped_at_limit() {
        let policy = LoanPolicy::default();
        assert_eq!(policy.max_for_score(50), dec!(5000));
        assert_eq!(policy.max_for_score(80), dec!(5000));
        assert_eq!(policy.max_for_score(100), dec!(5000));
    }

    #[test]
    fn test_max_for_score_follows_configured_limit() {
        let policy = LoanPolicy::new(dec!(2500));
        assert_eq!(policy.max_for_score(40), dec!(2500));
        assert_eq!(policy.max_for_score(20), dec!(2000));
    }

    #[test]
    fn test_remaining_after_limit_pins_current_output() {
        let policy = LoanPolicy::default();
        assert_eq!(policy.remaining_after_limit(dec!(6000), dec!(500)), dec!(500));
        assert_eq!(policy.remaining_after_limit(dec!(3000), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(policy.remaining_after_limit(dec!(5000), Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_remaining_after_limit_overpaid_is_zero() {
        let policy = LoanPolicy::default();
        assert_eq!(policy.remaining_after_limit(dec!(100), dec!(150)), Decimal::ZERO);
    }
}
