use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::account::{Account, AccountError, AccountId};
use crate::address::{Address, AddressDto};
use crate::bank::{
    Bank, BankError, ClientDto, Confirmation, FinancialReport, Report, ReportKind, SummaryReport,
    TransactionRequest,
};
use crate::client::{Client, ClientId, ClientRecord};
use crate::clock::{Clock, SystemClock};
use crate::repository::{InMemoryRepository, Repository};
use crate::transaction::{Transaction, TransactionId, TransactionKind, TransactionStatus};

/// Concrete [`Bank`] backed by in-memory registries. All mutating operations
/// take `&mut self`, so existence and funds checks can never interleave with
/// a conflicting mutation on the same registry.
pub struct InMemoryBank {
    name: String,
    clients: InMemoryRepository<ClientId, Client>,
    accounts: InMemoryRepository<AccountId, Account>,
    transactions: InMemoryRepository<TransactionId, Transaction>,
    clock: Box<dyn Clock>,
    account_id_seq: AccountId,
    transaction_id_seq: TransactionId,
}

impl InMemoryBank {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_clock(name, Box::new(SystemClock))
    }

    /// Same as [`new`](Self::new) but with an explicit time source, so tests
    /// can pin the audit timestamps.
    pub fn with_clock(name: impl Into<String>, clock: Box<dyn Clock>) -> Self {
        Self {
            name: name.into(),
            clients: InMemoryRepository::default(),
            accounts: InMemoryRepository::default(),
            transactions: InMemoryRepository::default(),
            clock,
            account_id_seq: 1000,
            transaction_id_seq: 1,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn client(&self, client_id: &ClientId) -> Option<&Client> {
        self.clients.get(client_id)
    }

    pub fn account(&self, account_id: AccountId) -> Option<&Account> {
        self.accounts.get(&account_id)
    }

    pub fn transaction(&self, transaction_id: TransactionId) -> Option<&Transaction> {
        self.transactions.get(&transaction_id)
    }

    /// Replaces a registered client's address and refreshes its audit
    /// timestamp.
    pub fn update_client_address(
        &mut self,
        client_id: &ClientId,
        address: AddressDto,
    ) -> Result<(), BankError> {
        let address = Address::new(address)?;
        let now = self.clock.now();
        let client =
            self.clients
                .get_mut(client_id)
                .ok_or_else(|| BankError::ClientNotFound {
                    client_id: client_id.clone(),
                })?;
        client.update_address(address, now);
        Ok(())
    }

    /// Monotonic account ids, still checked against the registry so an id can
    /// never be handed out twice. Pure; the sequence only advances once the
    /// account is actually registered, so a failed open burns nothing.
    fn next_account_id(&self) -> AccountId {
        let mut account_id = self.account_id_seq;
        while self.accounts.contains(&account_id) {
            account_id += 1;
        }
        account_id
    }

    fn record(
        &mut self,
        request: &TransactionRequest,
        status: TransactionStatus,
        timestamp: DateTime<Utc>,
    ) -> TransactionId {
        let transaction_id = self.transaction_id_seq;
        self.transaction_id_seq += 1;
        self.transactions.add(
            transaction_id,
            Transaction::new(
                transaction_id,
                request.kind,
                request.source,
                request.destination,
                request.amount,
                timestamp,
                status,
            ),
        );
        transaction_id
    }

    fn total_balance(&self) -> Decimal {
        self.accounts
            .list()
            .iter()
            .map(|account| account.balance())
            .sum()
    }
}

impl Bank for InMemoryBank {
    fn register_client(&mut self, dto: ClientDto) -> Result<ClientId, BankError> {
        let address = Address::new(dto.address)?;
        let client = Client::register(&dto.name, &dto.tax_id, address, self.clock.now())?;
        let client_id = client.client_id().clone();
        if self.clients.contains(&client_id) {
            return Err(BankError::ClientAlreadyExists { client_id });
        }
        debug!(bank = %self.name, %client_id, "client registered");
        self.clients.add(client_id.clone(), client);
        Ok(client_id)
    }

    fn open_account(
        &mut self,
        client_id: &ClientId,
        account_type: &str,
        opening_balance: Decimal,
    ) -> Result<AccountId, BankError> {
        if !self.clients.contains(client_id) {
            return Err(BankError::ClientNotFound {
                client_id: client_id.clone(),
            });
        }
        let account_id = self.next_account_id();
        let account = Account::open(
            account_id,
            client_id.clone(),
            account_type,
            opening_balance,
            self.clock.now(),
        )?;
        debug!(bank = %self.name, %client_id, account_id, "account opened");
        self.accounts.add(account_id, account);
        self.account_id_seq = account_id + 1;
        Ok(account_id)
    }

    fn execute_transaction(
        &mut self,
        request: TransactionRequest,
    ) -> Result<Confirmation, BankError> {
        let plan = request.validate()?;

        // resolve every referenced account before touching any balance
        for account_id in [plan.debit, plan.credit].into_iter().flatten() {
            if !self.accounts.contains(&account_id) {
                return Err(BankError::AccountNotFound { account_id });
            }
        }

        let now = self.clock.now();

        if let Some(source) = plan.debit {
            let account = self
                .accounts
                .get(&source)
                .ok_or(BankError::AccountNotFound { account_id: source })?;
            if !account.can_debit(request.amount) {
                let available = account.balance();
                // balances stay untouched; the attempt is kept for audit
                self.record(&request, TransactionStatus::Failed, now);
                warn!(
                    bank = %self.name,
                    source,
                    requested = %request.amount,
                    %available,
                    "transaction rejected, insufficient funds"
                );
                return Err(BankError::Account(AccountError::InsufficientFunds {
                    requested: request.amount,
                    available,
                }));
            }
        }

        // debit before credit: a partial failure can only leave money
        // missing, never conjured, and the debit below is rolled back on a
        // failed credit leg
        if let Some(source) = plan.debit {
            self.accounts
                .get_mut(&source)
                .ok_or(BankError::AccountNotFound { account_id: source })?
                .debit(request.amount, now)?;
        }
        if let Some(destination) = plan.credit {
            let credited = self
                .accounts
                .get_mut(&destination)
                .ok_or(BankError::AccountNotFound {
                    account_id: destination,
                })?
                .credit(request.amount, now);
            if let Err(err) = credited {
                if let Some(source) = plan.debit {
                    if let Some(account) = self.accounts.get_mut(&source) {
                        account.undo_debit(request.amount, now);
                    }
                }
                return Err(err.into());
            }
        }

        let transaction_id = self.record(&request, TransactionStatus::Completed, now);
        debug!(
            bank = %self.name,
            transaction_id,
            kind = ?request.kind,
            amount = %request.amount,
            "transaction completed"
        );
        Ok(Confirmation::new(transaction_id))
    }

    fn report(&self, kind: ReportKind) -> Result<Report, BankError> {
        let report = match kind {
            ReportKind::Summary => Report::Summary(SummaryReport {
                clients: self.clients.len(),
                accounts: self.accounts.len(),
                total_balance: self.total_balance(),
            }),
            ReportKind::Financial => {
                let mut report = FinancialReport {
                    total_balance: self.total_balance(),
                    deposits: 0,
                    withdrawals: 0,
                    transfers: 0,
                    failed: 0,
                };
                for transaction in self.transactions.list() {
                    match transaction.status() {
                        TransactionStatus::Failed => report.failed += 1,
                        TransactionStatus::Completed => match transaction.kind() {
                            TransactionKind::Deposit => report.deposits += 1,
                            TransactionKind::Withdrawal => report.withdrawals += 1,
                            TransactionKind::Transfer => report.transfers += 1,
                        },
                    }
                }
                Report::Financial(report)
            }
            ReportKind::Clients => {
                let mut records: Vec<ClientRecord> = self
                    .clients
                    .list()
                    .into_iter()
                    .map(Client::to_record)
                    .collect();
                records.sort_by(|a, b| a.client_id.cmp(&b.client_id));
                Report::Clients(records)
            }
        };
        Ok(report)
    }
}
