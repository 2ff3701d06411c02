//! User records
//!
//! Account holders. The email is stored lowercase on every write.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{DomainError, LoanPolicy, Money};

use super::{Record, SaveInvariant, TrustScore};

/// Lowercase an email address for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.to_lowercase()
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    /// Unique, always lowercase once written
    pub email: String,
    /// Password hash; never serialized
    #[serde(skip_serializing)]
    pub password: String,
    /// Unique
    pub phone_number: String,
    /// National ID number; unique
    pub id_number: String,
    pub loan_count: i32,
    pub date_joined: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for User {
    const TABLE: &'static str = "users";
    const ENTITY: &'static str = "User";
}

impl SaveInvariant for User {
    fn enforce(&mut self) -> Result<(), DomainError> {
        self.email = normalize_email(&self.email);
        Ok(())
    }
}

/// Payload for creating a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    #[serde(default, skip_serializing)]
    pub password: String,
    pub phone_number: String,
    pub id_number: String,
}

impl NewUser {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        phone_number: impl Into<String>,
        id_number: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: String::new(),
            phone_number: phone_number.into(),
            id_number: id_number.into(),
        }
    }

    pub fn with_password(mut self, password_hash: impl Into<String>) -> Self {
        self.password = password_hash.into();
        self
    }
}

impl SaveInvariant for NewUser {
    fn enforce(&mut self) -> Result<(), DomainError> {
        self.email = normalize_email(&self.email);
        Ok(())
    }
}

/// Partial update of a user
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserChanges {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub id_number: Option<String>,
}

impl UserChanges {
    pub fn apply(self, user: &mut User) {
        if let Some(username) = self.username {
            user.username = username;
        }
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(password) = self.password {
            user.password = password;
        }
        if let Some(phone_number) = self.phone_number {
            user.phone_number = phone_number;
        }
        if let Some(id_number) = self.id_number {
            user.id_number = id_number;
        }
    }
}

/// A user together with their optional trust score.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub user: User,
    pub trust_score: Option<TrustScore>,
}

impl UserProfile {
    pub fn new(user: User, trust_score: Option<TrustScore>) -> Self {
        Self { user, trust_score }
    }

    fn require_trust_score(&self) -> Result<&TrustScore, DomainError> {
        self.trust_score
            .as_ref()
            .ok_or(DomainError::NoTrustScore { user_id: self.user.id })
    }

    /// `min(score * 100, loan_limit)`; fails when no trust score is associated.
    pub fn max_loan_amount(&self, policy: &LoanPolicy) -> Result<Decimal, DomainError> {
        Ok(self.require_trust_score()?.max_loan_amount(policy))
    }

    /// Check a loan application against the blacklist flag and the maximum
    /// loan amount. Returns the maximum on success.
    pub fn check_loan_application(
        &self,
        policy: &LoanPolicy,
        requested: Money,
    ) -> Result<Decimal, DomainError> {
        let trust_score = self.require_trust_score()?;
        if trust_score.is_blacklisted {
            return Err(DomainError::Blacklisted { user_id: self.user.id });
        }

        let maximum = trust_score.max_loan_amount(policy);
        if requested.value() > maximum {
            return Err(DomainError::loan_limit_exceeded(requested.value(), maximum));
        }
        Ok(maximum)
    }
}
