use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::account::AccountId;

pub type TransactionId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
    Transfer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Both balance mutations (where applicable) were applied.
    Completed,
    /// Rejected after validation, kept for audit. Balances untouched.
    Failed,
}

/// Durable record of one balance movement attempt. Created only by the bank
/// as the terminal outcome of [`execute_transaction`]; immutable thereafter.
///
/// [`execute_transaction`]: crate::bank::Bank::execute_transaction
#[derive(Debug, Clone)]
pub struct Transaction {
    transaction_id: TransactionId,
    kind: TransactionKind,
    source: Option<AccountId>,
    destination: Option<AccountId>,
    amount: Decimal,
    timestamp: DateTime<Utc>,
    status: TransactionStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransactionRecord {
    pub transaction_id: TransactionId,
    pub kind: TransactionKind,
    pub source: Option<AccountId>,
    pub destination: Option<AccountId>,
    pub amount: Decimal,
    pub timestamp: String,
    pub status: TransactionStatus,
}

impl Transaction {
    pub(crate) fn new(
        transaction_id: TransactionId,
        kind: TransactionKind,
        source: Option<AccountId>,
        destination: Option<AccountId>,
        amount: Decimal,
        timestamp: DateTime<Utc>,
        status: TransactionStatus,
    ) -> Self {
        Self {
            transaction_id,
            kind,
            source,
            destination,
            amount,
            timestamp,
            status,
        }
    }

    pub fn transaction_id(&self) -> TransactionId {
        self.transaction_id
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn source(&self) -> Option<AccountId> {
        self.source
    }

    pub fn destination(&self) -> Option<AccountId> {
        self.destination
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn status(&self) -> TransactionStatus {
        self.status
    }

    pub fn to_record(&self) -> TransactionRecord {
        TransactionRecord {
            transaction_id: self.transaction_id,
            kind: self.kind,
            source: self.source,
            destination: self.destination,
            amount: self.amount,
            timestamp: self.timestamp.to_rfc3339(),
            status: self.status,
        }
    }
}
