use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use crate::client::ClientId;

pub type AccountId = u32;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccountError {
    #[error("Account type must not be empty")]
    EmptyAccountType,
    #[error("Opening balance must not be negative, got {balance}")]
    NegativeOpeningBalance { balance: Decimal },
    #[error("Amount must be positive, got {amount}")]
    NonPositiveAmount { amount: Decimal },
    #[error("Insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds {
        requested: Decimal,
        available: Decimal,
    },
}

/// Balance holder owned by exactly one client. The balance is only ever
/// touched through [`credit`](Account::credit) and [`debit`](Account::debit),
/// both crate-private so every mutation goes through the bank's transaction
/// algorithm and its validation.
#[derive(Debug, Clone)]
pub struct Account {
    account_id: AccountId,
    client_id: ClientId,
    account_type: String,
    balance: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Flat snapshot for persistence and reporting collaborators.
#[derive(Debug, Clone, Serialize)]
pub struct AccountRecord {
    pub account_id: AccountId,
    pub client_id: String,
    pub account_type: String,
    pub balance: Decimal,
    pub created_at: String,
    pub updated_at: String,
}

impl Account {
    pub(crate) fn open(
        account_id: AccountId,
        client_id: ClientId,
        account_type: &str,
        opening_balance: Decimal,
        now: DateTime<Utc>,
    ) -> Result<Self, AccountError> {
        let account_type = account_type.trim();
        if account_type.is_empty() {
            return Err(AccountError::EmptyAccountType);
        }
        if opening_balance < Decimal::ZERO {
            return Err(AccountError::NegativeOpeningBalance {
                balance: opening_balance,
            });
        }
        Ok(Self {
            account_id,
            client_id,
            account_type: account_type.to_owned(),
            balance: opening_balance,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    pub fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    pub fn account_type(&self) -> &str {
        &self.account_type
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub(crate) fn credit(
        &mut self,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> Result<(), AccountError> {
        if amount <= Decimal::ZERO {
            return Err(AccountError::NonPositiveAmount { amount });
        }
        self.balance += amount;
        self.updated_at = now;
        Ok(())
    }

    pub(crate) fn debit(
        &mut self,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> Result<(), AccountError> {
        if amount <= Decimal::ZERO {
            return Err(AccountError::NonPositiveAmount { amount });
        }
        if amount > self.balance {
            return Err(AccountError::InsufficientFunds {
                requested: amount,
                available: self.balance,
            });
        }
        self.balance -= amount;
        self.updated_at = now;
        Ok(())
    }

    /// Non-mutating variant of the [`debit`](Account::debit) funds check, used
    /// to validate a whole transaction before applying any of it.
    pub(crate) fn can_debit(&self, amount: Decimal) -> bool {
        amount <= self.balance
    }

    /// Rollback path: restores a debit after the paired credit leg of a
    /// transfer failed. Unconditional, must only undo a just-applied debit.
    pub(crate) fn undo_debit(&mut self, amount: Decimal, now: DateTime<Utc>) {
        self.balance += amount;
        self.updated_at = now;
    }

    pub fn to_record(&self) -> AccountRecord {
        AccountRecord {
            account_id: self.account_id,
            client_id: self.client_id.to_string(),
            account_type: self.account_type.clone(),
            balance: self.balance,
            created_at: self.created_at.to_rfc3339(),
            updated_at: self.updated_at.to_rfc3339(),
        }
    }
}
