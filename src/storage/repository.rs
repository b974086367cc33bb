use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

use crate::application::AppError;
use crate::domain::{Account, AccountId, Cents};

use super::MIGRATION_001_ACCOUNTS;

/// Repository for persisting and querying customer accounts.
///
/// Every mutating operation runs inside a store transaction, and balance
/// checks read inside that same transaction. This is the only concurrency
/// control in the system: several service instances may share one database,
/// and the store serializes the writers.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given URL.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_ACCOUNTS)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Initialize a new database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    // ========================
    // Account rows
    // ========================

    /// Insert a new account row and return it with the store-assigned id.
    ///
    /// A unique-constraint violation on the phone column is reported as
    /// `DuplicatePhone`: the service pre-checks, but two concurrent creates
    /// can both pass that pre-check and only one may win here.
    pub async fn insert_account(
        &self,
        name: &str,
        phone: &str,
        email: &str,
        initial_cents: Cents,
    ) -> Result<Account, AppError> {
        let created_at = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO accounts (name, phone, email, balance_cents, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(name)
        .bind(phone)
        .bind(email)
        .bind(initial_cents)
        .bind(created_at.to_rfc3339())
        .fetch_one(&self.pool)
        .await;

        let row = match result {
            Ok(row) => row,
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                return Err(AppError::DuplicatePhone(phone.to_string()));
            }
            Err(err) => {
                return Err(anyhow::Error::new(err)
                    .context("Failed to insert account")
                    .into());
            }
        };

        Ok(Account {
            id: row.get("id"),
            name: name.to_string(),
            phone: phone.to_string(),
            email: email.to_string(),
            balance_cents: initial_cents,
            created_at,
        })
    }

    /// Get an account by id.
    pub async fn get_account(&self, id: AccountId) -> Result<Option<Account>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, phone, email, balance_cents, created_at
            FROM accounts
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch account")?;

        match row {
            Some(row) => Ok(Some(Self::row_to_account(&row)?)),
            None => Ok(None),
        }
    }

    /// Get an account by phone number.
    pub async fn get_account_by_phone(&self, phone: &str) -> Result<Option<Account>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, phone, email, balance_cents, created_at
            FROM accounts
            WHERE phone = ?
            "#,
        )
        .bind(phone)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch account by phone")?;

        match row {
            Some(row) => Ok(Some(Self::row_to_account(&row)?)),
            None => Ok(None),
        }
    }

    /// Read the current balance of an account.
    pub async fn fetch_balance(&self, id: AccountId) -> Result<Option<Cents>> {
        let row = sqlx::query("SELECT balance_cents FROM accounts WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch balance")?;

        Ok(row.map(|r| r.get("balance_cents")))
    }

    /// List all accounts, ordered by account number.
    pub async fn list_accounts(&self) -> Result<Vec<Account>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, phone, email, balance_cents, created_at
            FROM accounts
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list accounts")?;

        rows.iter().map(Self::row_to_account).collect()
    }

    /// Delete an account row. The account is removed unconditionally,
    /// whatever its balance.
    pub async fn delete_account(&self, id: AccountId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete account")?;

        if result.rows_affected() == 0 {
            return Err(AppError::AccountNotFound(id));
        }
        Ok(())
    }

    // ========================
    // Balance mutations
    // ========================

    /// Credit an account. Returns the new balance.
    pub async fn deposit(&self, id: AccountId, amount: Cents) -> Result<Cents, AppError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        let row = sqlx::query(
            r#"
            UPDATE accounts
            SET balance_cents = balance_cents + ?
            WHERE id = ?
            RETURNING balance_cents
            "#,
        )
        .bind(amount)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .context("Failed to deposit funds")?;

        let Some(row) = row else {
            return Err(AppError::AccountNotFound(id));
        };

        tx.commit().await.context("Failed to commit deposit")?;
        Ok(row.get("balance_cents"))
    }

    /// Debit an account. Returns the new balance.
    ///
    /// The debit is conditional on the balance covering the amount, inside
    /// the transaction, so a concurrent withdrawal cannot slip between a
    /// check and the write and drive the balance negative.
    pub async fn withdraw(&self, id: AccountId, amount: Cents) -> Result<Cents, AppError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        let balance = Self::debit_in_tx(&mut tx, id, amount).await?;

        tx.commit().await.context("Failed to commit withdrawal")?;
        Ok(balance)
    }

    /// Move funds between two accounts atomically: the debit and the credit
    /// either both commit or neither does. Returns the new balances as
    /// (source, destination).
    pub async fn transfer(
        &self,
        from: AccountId,
        to: AccountId,
        amount: Cents,
    ) -> Result<(Cents, Cents), AppError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        let from_balance = Self::debit_in_tx(&mut tx, from, amount).await?;

        let row = sqlx::query(
            r#"
            UPDATE accounts
            SET balance_cents = balance_cents + ?
            WHERE id = ?
            RETURNING balance_cents
            "#,
        )
        .bind(amount)
        .bind(to)
        .fetch_optional(&mut *tx)
        .await
        .context("Failed to credit destination account")?;

        // Dropping the transaction here rolls the debit back too.
        let Some(row) = row else {
            return Err(AppError::AccountNotFound(to));
        };

        tx.commit().await.context("Failed to commit transfer")?;
        Ok((from_balance, row.get("balance_cents")))
    }

    /// Conditional debit inside an open transaction. When the update touches
    /// no row, a follow-up read under the same transaction distinguishes a
    /// missing account from insufficient funds.
    async fn debit_in_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        id: AccountId,
        amount: Cents,
    ) -> Result<Cents, AppError> {
        let row = sqlx::query(
            r#"
            UPDATE accounts
            SET balance_cents = balance_cents - ?
            WHERE id = ? AND balance_cents >= ?
            RETURNING balance_cents
            "#,
        )
        .bind(amount)
        .bind(id)
        .bind(amount)
        .fetch_optional(&mut **tx)
        .await
        .context("Failed to debit account")?;

        if let Some(row) = row {
            return Ok(row.get("balance_cents"));
        }

        let balance = sqlx::query("SELECT balance_cents FROM accounts WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
            .context("Failed to read balance during debit")?;

        match balance {
            Some(row) => Err(AppError::InsufficientFunds {
                account: id,
                balance: row.get("balance_cents"),
                requested: amount,
            }),
            None => Err(AppError::AccountNotFound(id)),
        }
    }

    fn row_to_account(row: &sqlx::sqlite::SqliteRow) -> Result<Account> {
        let created_at_str: String = row.get("created_at");

        Ok(Account {
            id: row.get("id"),
            name: row.get("name"),
            phone: row.get("phone"),
            email: row.get("email"),
            balance_cents: row.get("balance_cents"),
            created_at: DateTime::parse_from_rfc3339(&created_at_str)
                .context("Invalid created_at timestamp")?
                .with_timezone(&Utc),
        })
    }
}
