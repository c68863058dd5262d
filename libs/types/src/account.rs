//! Users and roles
//!
//! A user's cash balance only moves through ledger operations: debits on
//! purchases and buys, credits on sales, and the admin reset.

use crate::errors::DomainError;
use crate::ids::UserId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Role of a user in the classroom
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Views statistics and resets the simulation
    Teacher,
    /// Runs a business and trades
    Student,
}

/// A stored user record, password included
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub password: String,
    pub role: Role,
    #[serde(default)]
    pub name: String,
    pub balance: Decimal,
}

/// A user as exposed over the API (no password)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: UserId,
    pub username: String,
    pub role: Role,
    pub name: String,
    pub balance: Decimal,
}

impl User {
    /// Create a freshly registered student
    pub fn new_student(
        name: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        balance: Decimal,
    ) -> Self {
        Self {
            id: UserId::new(),
            username: username.into(),
            password: password.into(),
            role: Role::Student,
            name: name.into(),
            balance,
        }
    }

    pub fn is_student(&self) -> bool {
        matches!(self.role, Role::Student)
    }

    /// Strip the password for API responses
    pub fn public(&self) -> PublicUser {
        PublicUser {
            id: self.id.clone(),
            username: self.username.clone(),
            role: self.role,
            name: self.name.clone(),
            balance: self.balance,
        }
    }

    /// Whether the balance covers `amount`
    pub fn can_afford(&self, amount: Decimal) -> bool {
        self.balance >= amount
    }

    /// Remove `amount` from the balance, refusing to go below what is available
    pub fn debit(&mut self, amount: Decimal) -> Result<(), DomainError> {
        if !self.can_afford(amount) {
            return Err(DomainError::InsufficientFunds {
                required: amount,
                available: self.balance,
            });
        }
        self.balance -= amount;
        Ok(())
    }

    /// Add `amount` to the balance
    pub fn credit(&mut self, amount: Decimal) -> Result<(), DomainError> {
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(DomainError::AmountOverflow)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(balance: i64) -> User {
        User::new_student("Alex Johnson", "student1", "student1", Decimal::from(balance))
    }

    #[test]
    fn test_debit_within_balance() {
        let mut user = student(10_000);
        user.debit(Decimal::from(50)).unwrap();
        assert_eq!(user.balance, Decimal::from(9_950));
    }

    #[test]
    fn test_debit_exact_balance_allowed() {
        let mut user = student(300);
        user.debit(Decimal::from(300)).unwrap();
        assert_eq!(user.balance, Decimal::ZERO);
    }

    #[test]
    fn test_overdraft_rejected_without_change() {
        let mut user = student(200);
        let err = user.debit(Decimal::from(300)).unwrap_err();
        assert!(matches!(err, DomainError::InsufficientFunds { .. }));
        assert_eq!(user.balance, Decimal::from(200));
    }

    #[test]
    fn test_credit_past_decimal_range_rejected() {
        let mut user = student(10);
        let err = user.credit(Decimal::MAX).unwrap_err();
        assert_eq!(err, DomainError::AmountOverflow);
        assert_eq!(user.balance, Decimal::from(10));
        user.credit(Decimal::from(5)).unwrap();
        assert_eq!(user.balance, Decimal::from(15));
    }

    #[test]
    fn test_public_view_has_no_password() {
        let user = student(10_000);
        let json = serde_json::to_value(user.public()).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["role"], "student");
        assert_eq!(json["balance"], 10000.0);
    }

    #[test]
    fn test_reads_seeded_document_shape() {
        let raw = r#"{
            "id": "teacher-1",
            "username": "teacher",
            "password": "teacher123",
            "role": "teacher",
            "name": "Mr. Smith",
            "balance": 0
        }"#;
        let user: User = serde_json::from_str(raw).unwrap();
        assert_eq!(user.id, UserId::from("teacher-1"));
        assert_eq!(user.role, Role::Teacher);
        assert!(!user.is_student());
        assert_eq!(user.balance, Decimal::ZERO);
    }
}
