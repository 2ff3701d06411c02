//! Savings plans and savings goals
//!
//! A `SavingsItem` is a goal (a target amount for an item); a `Savings`
//! row is a plan accumulating deposits toward one goal. A plan always runs
//! for exactly `SAVINGS_PERIOD_DAYS`: its end date is recomputed from the
//! start date on every write and any other value is overwritten.

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{floor_at_zero, DomainError, Money, SAVINGS_PERIOD_DAYS};

use super::{today, Item, Record, SaveInvariant};

/// End date of a plan starting on `start_date`; fails past the calendar's end.
pub fn savings_end_date(start_date: NaiveDate) -> Result<NaiveDate, DomainError> {
    start_date
        .checked_add_signed(Duration::days(SAVINGS_PERIOD_DAYS))
        .ok_or_else(|| DomainError::InvalidDate(format!("start date {} is out of range", start_date)))
}

/// `max(0, target - saved)`
fn remaining_toward(target: Decimal, saved: Decimal) -> Decimal {
    if saved > target {
        tracing::warn!(%saved, %target, "Savings exceed goal target");
    }
    floor_at_zero(target - saved)
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Savings {
    pub id: Uuid,
    pub user_id: Uuid,
    pub savings_item_id: Uuid,
    pub amount_saved: Decimal,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_paid: Decimal,
}

impl Record for Savings {
    const TABLE: &'static str = "savings";
    const ENTITY: &'static str = "Savings";
}

impl SaveInvariant for Savings {
    fn enforce(&mut self) -> Result<(), DomainError> {
        self.end_date = savings_end_date(self.start_date)?;
        Ok(())
    }
}

impl Savings {
    /// `max(0, goal.target_amount - amount_saved)`
    pub fn remaining_amount(&self, goal: &SavingsItem) -> Decimal {
        remaining_toward(goal.target_amount, self.amount_saved)
    }

    /// Days since the plan started; negative if it starts in the future.
    pub fn days_saving_on(&self, today: NaiveDate) -> i64 {
        (today - self.start_date).num_days()
    }

    pub fn days_saving(&self) -> i64 {
        self.days_saving_on(today())
    }

    /// Days until the plan ends; negative once overdue.
    pub fn days_remaining_on(&self, today: NaiveDate) -> i64 {
        (self.end_date - today).num_days()
    }

    pub fn days_remaining(&self) -> i64 {
        self.days_remaining_on(today())
    }

    /// Whether the goal's item can currently be bought.
    pub fn is_item_available(goal_item: &Item) -> bool {
        goal_item.in_stock
    }

    /// Add a deposit to `amount_saved` and `total_paid`.
    pub fn record_deposit(&mut self, amount: Money) -> Result<(), DomainError> {
        self.amount_saved = Money::new(self.amount_saved)?.checked_add(&amount)?.value();
        self.total_paid = Money::new(self.total_paid)?.checked_add(&amount)?.value();
        Ok(())
    }
}

/// Payload for creating a savings plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSavings {
    pub user_id: Uuid,
    pub savings_item_id: Uuid,
    #[serde(default = "Money::zero")]
    pub amount_saved: Money,
    #[serde(default = "today")]
    pub start_date: NaiveDate,
    /// Ignored on input; set from `start_date` by `enforce` before insert
    #[serde(default = "today", skip_serializing)]
    pub end_date: NaiveDate,
}

impl NewSavings {
    /// A plan starting today with nothing saved yet
    pub fn new(user_id: Uuid, savings_item_id: Uuid) -> Self {
        let start_date = today();
        Self {
            user_id,
            savings_item_id,
            amount_saved: Money::zero(),
            start_date,
            end_date: start_date,
        }
    }

    pub fn starting_on(mut self, start_date: NaiveDate) -> Self {
        self.start_date = start_date;
        self
    }
}

impl SaveInvariant for NewSavings {
    fn enforce(&mut self) -> Result<(), DomainError> {
        self.end_date = savings_end_date(self.start_date)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SavingsChanges {
    #[serde(default)]
    pub amount_saved: Option<Money>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// Accepted but overwritten by the end-date rule on save
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub total_paid: Option<Money>,
}

impl SavingsChanges {
    pub fn apply(self, savings: &mut Savings) {
        if let Some(amount_saved) = self.amount_saved {
            savings.amount_saved = amount_saved.value();
        }
        if let Some(start_date) = self.start_date {
            savings.start_date = start_date;
        }
        if let Some(end_date) = self.end_date {
            savings.end_date = end_date;
        }
        if let Some(total_paid) = self.total_paid {
            savings.total_paid = total_paid.value();
        }
    }
}

/// Derived values of a savings plan
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavingsOverview {
    pub savings_id: Uuid,
    pub remaining_amount: Decimal,
    pub days_saving: i64,
    pub days_remaining: i64,
    pub is_item_available: bool,
}

impl SavingsOverview {
    pub fn new(savings: &Savings, goal: &SavingsItem, goal_item: &Item, today: NaiveDate) -> Self {
        Self {
            savings_id: savings.id,
            remaining_amount: savings.remaining_amount(goal),
            days_saving: savings.days_saving_on(today),
            days_remaining: savings.days_remaining_on(today),
            is_item_available: Savings::is_item_available(goal_item),
        }
    }
}

// =========================================================================
// Savings items (goals)
// =========================================================================

/// A savings goal. The amount saved toward it is the sum of `amount_saved`
/// over the plans pointing at it, supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct SavingsItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub item_id: Uuid,
    pub target_amount: Decimal,
    pub start_date: NaiveDate,
    pub due_date: NaiveDate,
}

impl Record for SavingsItem {
    const TABLE: &'static str = "savings_items";
    const ENTITY: &'static str = "SavingsItem";
}

impl SavingsItem {
    /// `max(0, target_amount - amount_saved)`
    pub fn amount_remaining(&self, amount_saved: Decimal) -> Decimal {
        remaining_toward(self.target_amount, amount_saved)
    }

    pub fn is_completed(&self, amount_saved: Decimal) -> bool {
        amount_saved >= self.target_amount
    }

    /// Days until the due date, never below zero.
    pub fn remaining_days_on(&self, today: NaiveDate) -> i64 {
        (self.due_date - today).num_days().max(0)
    }

    pub fn remaining_days(&self) -> i64 {
        self.remaining_days_on(today())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSavingsItem {
    pub user_id: Uuid,
    pub item_id: Uuid,
    pub target_amount: Money,
    #[serde(default = "today")]
    pub start_date: NaiveDate,
    pub due_date: NaiveDate,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SavingsItemChanges {
    #[serde(default)]
    pub target_amount: Option<Money>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

impl SavingsItemChanges {
    pub fn apply(self, goal: &mut SavingsItem) {
        if let Some(target_amount) = self.target_amount {
            goal.target_amount = target_amount.value();
        }
        if let Some(due_date) = self.due_date {
            goal.due_date = due_date;
        }
    }
}

/// Derived values of a savings goal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavingsItemOverview {
    pub savings_item_id: Uuid,
    pub amount_saved: Decimal,
    pub amount_remaining: Decimal,
    pub remaining_days: i64,
    pub is_completed: bool,
}

impl SavingsItemOverview {
    pub fn new(goal: &SavingsItem, amount_saved: Decimal, today: NaiveDate) -> Self {
        Self {
            savings_item_id: goal.id,
            amount_saved,
            amount_remaining: goal.amount_remaining(amount_saved),
            remaining_days: goal.remaining_days_on(today),
            is_completed: goal.is_completed(amount_saved),
        }
    }
}
