//! Trust scores
//!
//! One per user. The score sets the user's loan ceiling.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{LoanPolicy, DEFAULT_TRUST_SCORE};

use super::Record;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct TrustScore {
    pub id: Uuid,
    pub user_id: Uuid,
    pub score: i32,
    pub is_blacklisted: bool,
}

impl Record for TrustScore {
    const TABLE: &'static str = "trust_scores";
    const ENTITY: &'static str = "TrustScore";
}

impl TrustScore {
    pub fn max_loan_amount(&self, policy: &LoanPolicy) -> Decimal {
        policy.max_for_score(self.score)
    }
}

fn default_score() -> i32 {
    DEFAULT_TRUST_SCORE
}

/// Payload for creating a trust score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTrustScore {
    pub user_id: Uuid,
    #[serde(default = "default_score")]
    pub score: i32,
    #[serde(default)]
    pub is_blacklisted: bool,
}

impl NewTrustScore {
    /// Default score of 100, not blacklisted
    pub fn for_user(user_id: Uuid) -> Self {
        Self {
            user_id,
            score: DEFAULT_TRUST_SCORE,
            is_blacklisted: false,
        }
    }

    pub fn with_score(mut self, score: i32) -> Self {
        self.score = score;
        self
    }

    pub fn blacklisted(mut self, is_blacklisted: bool) -> Self {
        self.is_blacklisted = is_blacklisted;
        self
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrustScoreChanges {
    #[serde(default)]
    pub score: Option<i32>,
    #[serde(default)]
    pub is_blacklisted: Option<bool>,
}

impl TrustScoreChanges {
    pub fn apply(self, trust_score: &mut TrustScore) {
        if let Some(score) = self.score {
            trust_score.score = score;
        }
        if let Some(is_blacklisted) = self.is_blacklisted {
            trust_score.is_blacklisted = is_blacklisted;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trust_score_defaults() {
        let user_id = Uuid::new_v4();
        let new = NewTrustScore::for_user(user_id);
        assert_eq!(new.score, 100);
        assert!(!new.is_blacklisted);

        let parsed: NewTrustScore =
            serde_json::from_value(serde_json::json!({ "user_id": user_id })).unwrap();
        assert_eq!(parsed.score, 100);
        assert!(!parsed.is_blacklisted);
    }

    #[test]
    fn test_changes_apply() {
        let mut trust_score = TrustScore {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            score: 100,
            is_blacklisted: false,
        };
        TrustScoreChanges {
            score: Some(35),
            is_blacklisted: None,
        }
        .apply(&mut trust_score);

        assert_eq!(trust_score.score, 35);
        assert!(!trust_score.is_blacklisted);
        assert_eq!(trust_score.max_loan_amount(&LoanPolicy::default()), Decimal::from(3500));
    }
}
