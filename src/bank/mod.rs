use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::account::{AccountError, AccountId};
use crate::address::{AddressDto, AddressError};
use crate::client::{ClientError, ClientId, ClientRecord};
use crate::transaction::{TransactionId, TransactionKind};

pub mod in_memory;

#[derive(Debug, Error)]
pub enum BankError {
    #[error(transparent)]
    Address(#[from] AddressError),
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error(transparent)]
    Account(#[from] AccountError),
    #[error("Client `{client_id}` is already registered")]
    ClientAlreadyExists { client_id: ClientId },
    #[error("Client `{client_id}` not found")]
    ClientNotFound { client_id: ClientId },
    #[error("Account {account_id} not found")]
    AccountNotFound { account_id: AccountId },
    #[error("Transaction amount must be positive, got {amount}")]
    InvalidAmount { amount: Decimal },
    #[error("{kind:?} requires a {role} account")]
    MissingAccountRef {
        kind: TransactionKind,
        role: &'static str,
    },
    #[error("{kind:?} must not reference a {role} account")]
    UnexpectedAccountRef {
        kind: TransactionKind,
        role: &'static str,
    },
    #[error("Transfer source and destination must be distinct accounts")]
    SameAccountTransfer,
    #[error("Unknown report kind `{0}`")]
    UnknownReportKind(String),
}

/// Client-creation payload crossing the contract boundary. Distinct from the
/// [`Client`](crate::client::Client) entity the bank builds out of it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientDto {
    pub name: String,
    pub tax_id: String,
    pub address: AddressDto,
}

/// One requested balance movement, not yet validated against any registry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TransactionRequest {
    pub kind: TransactionKind,
    pub source: Option<AccountId>,
    pub destination: Option<AccountId>,
    pub amount: Decimal,
}

/// Account references a validated request will touch; `debit` is settled
/// before `credit` so no interleaving ever observes conjured money.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TransferPlan {
    pub(crate) debit: Option<AccountId>,
    pub(crate) credit: Option<AccountId>,
}

impl TransactionRequest {
    pub fn deposit(destination: AccountId, amount: Decimal) -> Self {
        Self {
            kind: TransactionKind::Deposit,
            source: None,
            destination: Some(destination),
            amount,
        }
    }

    pub fn withdrawal(source: AccountId, amount: Decimal) -> Self {
        Self {
            kind: TransactionKind::Withdrawal,
            source: Some(source),
            destination: None,
            amount,
        }
    }

    pub fn transfer(source: AccountId, destination: AccountId, amount: Decimal) -> Self {
        Self {
            kind: TransactionKind::Transfer,
            source: Some(source),
            destination: Some(destination),
            amount,
        }
    }

    /// Shape validation only; existence and funds checks need the registries
    /// and stay with the bank.
    pub(crate) fn validate(&self) -> Result<TransferPlan, BankError> {
        if self.amount <= Decimal::ZERO {
            return Err(BankError::InvalidAmount {
                amount: self.amount,
            });
        }
        let kind = self.kind;
        match kind {
            TransactionKind::Deposit => {
                if self.source.is_some() {
                    return Err(BankError::UnexpectedAccountRef {
                        kind,
                        role: "source",
                    });
                }
                let destination = self.destination.ok_or(BankError::MissingAccountRef {
                    kind,
                    role: "destination",
                })?;
                Ok(TransferPlan {
                    debit: None,
                    credit: Some(destination),
                })
            }
            TransactionKind::Withdrawal => {
                if self.destination.is_some() {
                    return Err(BankError::UnexpectedAccountRef {
                        kind,
                        role: "destination",
                    });
                }
                let source = self.source.ok_or(BankError::MissingAccountRef {
                    kind,
                    role: "source",
                })?;
                Ok(TransferPlan {
                    debit: Some(source),
                    credit: None,
                })
            }
            TransactionKind::Transfer => {
                let source = self.source.ok_or(BankError::MissingAccountRef {
                    kind,
                    role: "source",
                })?;
                let destination = self.destination.ok_or(BankError::MissingAccountRef {
                    kind,
                    role: "destination",
                })?;
                if source == destination {
                    return Err(BankError::SameAccountTransfer);
                }
                Ok(TransferPlan {
                    debit: Some(source),
                    credit: Some(destination),
                })
            }
        }
    }
}

/// Opaque receipt for an applied transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Confirmation(TransactionId);

impl Confirmation {
    pub(crate) fn new(transaction_id: TransactionId) -> Self {
        Self(transaction_id)
    }

    pub fn transaction_id(&self) -> TransactionId {
        self.0
    }
}

impl fmt::Display for Confirmation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TX-{:06}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportKind {
    #[default]
    Summary,
    Financial,
    Clients,
}

impl FromStr for ReportKind {
    type Err = BankError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "summary" => Ok(Self::Summary),
            "financial" => Ok(Self::Financial),
            "clients" => Ok(Self::Clients),
            other => Err(BankError::UnknownReportKind(other.to_owned())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SummaryReport {
    pub clients: usize,
    pub accounts: usize,
    pub total_balance: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FinancialReport {
    pub total_balance: Decimal,
    /// Completed transactions, tallied per kind.
    pub deposits: u64,
    pub withdrawals: u64,
    pub transfers: u64,
    /// Attempts rejected after validation but kept for audit.
    pub failed: u64,
}

/// Structured report data. Rendering to text or CSV is a collaborator's job,
/// see [`crate::render`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Report {
    Summary(SummaryReport),
    Financial(FinancialReport),
    Clients(Vec<ClientRecord>),
}

/// The abstract bank contract. Every concrete bank (in-memory, persistent,
/// test double) implements these four operations with the same semantics:
/// inputs are validated before any registry is touched, mutations are atomic
/// per call, and reports are pure reads returning structured data.
///
/// `&mut self` on the mutating operations is the concurrency model: exclusive
/// access serializes every check-then-act sequence, so correctness holds even
/// when a caller shares a bank behind one coarse lock.
pub trait Bank {
    /// Registers a new client and returns its derived id. Fails with
    /// [`BankError::ClientAlreadyExists`] when the tax id is already taken.
    fn register_client(&mut self, dto: ClientDto) -> Result<ClientId, BankError>;

    /// Opens an account owned by `client_id` and returns the generated id.
    fn open_account(
        &mut self,
        client_id: &ClientId,
        account_type: &str,
        opening_balance: Decimal,
    ) -> Result<AccountId, BankError>;

    /// Executes one deposit, withdrawal or transfer. On success the involved
    /// balances are updated and a completed [`Transaction`] is recorded; on
    /// failure no balance changes (a failed attempt may still be recorded
    /// for audit).
    ///
    /// [`Transaction`]: crate::transaction::Transaction
    fn execute_transaction(&mut self, request: TransactionRequest)
    -> Result<Confirmation, BankError>;

    /// Aggregates registry data into a [`Report`]. Pure read.
    fn report(&self, kind: ReportKind) -> Result<Report, BankError>;
}

#[cfg(test)]
mod tests {
    use rust_decimal::dec;

    use super::*;

    #[test]
    fn report_kind_parsing() {
        assert_eq!("summary".parse::<ReportKind>().unwrap(), ReportKind::Summary);
        assert_eq!(
            " Financial ".parse::<ReportKind>().unwrap(),
            ReportKind::Financial
        );
        assert_eq!("clients".parse::<ReportKind>().unwrap(), ReportKind::Clients);
        let err = "detailed".parse::<ReportKind>().unwrap_err();
        assert!(matches!(err, BankError::UnknownReportKind(kind) if kind == "detailed"));
    }

    #[test]
    fn validate_rejects_non_positive_amount_first() {
        // amount check precedes shape checks, even for a hopeless request
        let request = TransactionRequest {
            kind: TransactionKind::Transfer,
            source: None,
            destination: None,
            amount: dec!(0),
        };
        assert!(matches!(
            request.validate().unwrap_err(),
            BankError::InvalidAmount { .. }
        ));
    }

    #[test]
    fn validate_deposit_shape() {
        let plan = TransactionRequest::deposit(1001, dec!(10)).validate().unwrap();
        assert_eq!(plan.debit, None);
        assert_eq!(plan.credit, Some(1001));

        let mut request = TransactionRequest::deposit(1001, dec!(10));
        request.source = Some(1002);
        assert!(matches!(
            request.validate().unwrap_err(),
            BankError::UnexpectedAccountRef {
                kind: TransactionKind::Deposit,
                role: "source",
            }
        ));

        let request = TransactionRequest {
            kind: TransactionKind::Deposit,
            source: None,
            destination: None,
            amount: dec!(10),
        };
        assert!(matches!(
            request.validate().unwrap_err(),
            BankError::MissingAccountRef {
                kind: TransactionKind::Deposit,
                role: "destination",
            }
        ));
    }

    #[test]
    fn validate_withdrawal_shape() {
        let plan = TransactionRequest::withdrawal(1001, dec!(10))
            .validate()
            .unwrap();
        assert_eq!(plan.debit, Some(1001));
        assert_eq!(plan.credit, None);

        let mut request = TransactionRequest::withdrawal(1001, dec!(10));
        request.destination = Some(1002);
        assert!(matches!(
            request.validate().unwrap_err(),
            BankError::UnexpectedAccountRef {
                kind: TransactionKind::Withdrawal,
                role: "destination",
            }
        ));
    }

    #[test]
    fn validate_transfer_shape() {
        let plan = TransactionRequest::transfer(1001, 1002, dec!(10))
            .validate()
            .unwrap();
        assert_eq!(plan.debit, Some(1001));
        assert_eq!(plan.credit, Some(1002));

        let request = TransactionRequest {
            kind: TransactionKind::Transfer,
            source: None,
            destination: None,
            amount: dec!(50),
        };
        assert!(matches!(
            request.validate().unwrap_err(),
            BankError::MissingAccountRef {
                kind: TransactionKind::Transfer,
                role: "source",
            }
        ));

        assert!(matches!(
            TransactionRequest::transfer(1001, 1001, dec!(10))
                .validate()
                .unwrap_err(),
            BankError::SameAccountTransfer
        ));
    }

    #[test]
    fn confirmation_display() {
        assert_eq!(Confirmation::new(7).to_string(), "TX-000007");
    }
}
