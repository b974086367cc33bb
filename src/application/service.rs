use crate::domain::{
    audit_accounts, is_valid_email, is_valid_phone, Account, AccountId, AuditReport, Cents,
};
use crate::storage::Repository;

use super::AppError;

/// Application service providing the teller-facing account operations.
/// This is the primary interface for any client (CLI, API, tests).
///
/// Validation errors are raised here, before any store mutation; the
/// transactional errors come back from the repository with the store
/// already rolled back.
pub struct LedgerService {
    repo: Repository,
}

impl LedgerService {
    /// Create a new ledger service with the given repository.
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Initialize a new database at the given path.
    pub async fn init(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = Repository::init(&db_url).await?;
        Ok(Self::new(repo))
    }

    /// Connect to an existing database.
    pub async fn connect(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let repo = Repository::connect(&db_url).await?;
        Ok(Self::new(repo))
    }

    /// Open a new customer account with a strictly positive starting balance.
    /// Returns the persisted account with its store-assigned number.
    pub async fn create_account(
        &self,
        name: &str,
        phone: &str,
        email: &str,
        initial_balance: Cents,
    ) -> Result<Account, AppError> {
        if initial_balance <= 0 {
            return Err(AppError::InvalidInitialBalance(initial_balance));
        }
        if !is_valid_phone(phone) {
            return Err(AppError::InvalidPhone(phone.to_string()));
        }
        if !is_valid_email(email) {
            return Err(AppError::InvalidEmail(email.to_string()));
        }

        // Friendly pre-check; the unique constraint on the phone column
        // still decides the winner if two creates race.
        if self.repo.get_account_by_phone(phone).await?.is_some() {
            return Err(AppError::DuplicatePhone(phone.to_string()));
        }

        self.repo
            .insert_account(name, phone, email, initial_balance)
            .await
    }

    /// Look up an account by number.
    pub async fn get_account(&self, id: AccountId) -> Result<Account, AppError> {
        self.repo
            .get_account(id)
            .await?
            .ok_or(AppError::AccountNotFound(id))
    }

    /// Read the current balance of an account.
    pub async fn get_balance(&self, id: AccountId) -> Result<Cents, AppError> {
        self.repo
            .fetch_balance(id)
            .await?
            .ok_or(AppError::AccountNotFound(id))
    }

    /// Credit funds to an account. Returns the new balance.
    pub async fn deposit(&self, id: AccountId, amount: Cents) -> Result<Cents, AppError> {
        if amount <= 0 {
            return Err(AppError::InvalidAmount(amount));
        }
        self.repo.deposit(id, amount).await
    }

    /// Debit funds from an account. Returns the new balance.
    pub async fn withdraw(&self, id: AccountId, amount: Cents) -> Result<Cents, AppError> {
        if amount <= 0 {
            return Err(AppError::InvalidAmount(amount));
        }
        self.repo.withdraw(id, amount).await
    }

    /// Move funds between two accounts as one all-or-nothing unit.
    /// Returns the new balances as (source, destination).
    pub async fn transfer(
        &self,
        from: AccountId,
        to: AccountId,
        amount: Cents,
    ) -> Result<(Cents, Cents), AppError> {
        if amount <= 0 {
            return Err(AppError::InvalidAmount(amount));
        }
        self.repo.transfer(from, to, amount).await
    }

    /// Close a customer account. The row is removed irreversibly; any
    /// remaining balance is returned to the caller for reporting.
    pub async fn delete_account(&self, id: AccountId) -> Result<Account, AppError> {
        let account = self.get_account(id).await?;
        self.repo.delete_account(id).await?;
        Ok(account)
    }

    /// List all accounts, ordered by account number.
    pub async fn list_accounts(&self) -> Result<Vec<Account>, AppError> {
        Ok(self.repo.list_accounts().await?)
    }

    /// Sweep the account table for invariant violations.
    pub async fn check_integrity(&self) -> Result<AuditReport, AppError> {
        let accounts = self.repo.list_accounts().await?;
        Ok(audit_accounts(&accounts))
    }
}
