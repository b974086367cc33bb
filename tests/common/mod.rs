// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use sportello::application::LedgerService;
use sportello::domain::{AccountId, Cents};
use tempfile::TempDir;

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(LedgerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = LedgerService::init(db_path.to_str().unwrap()).await?;
    Ok((service, temp_dir))
}

/// Test fixture: customer accounts with valid, distinct phone numbers
pub struct Customers;

impl Customers {
    /// A valid phone number unique per index (index < 10).
    pub fn phone(index: u32) -> String {
        format!("987654321{}", index)
    }

    /// Open an account for the numbered test customer.
    pub async fn open(
        service: &LedgerService,
        index: u32,
        balance_cents: Cents,
    ) -> Result<AccountId> {
        let account = service
            .create_account(
                &format!("Customer {}", index),
                &Self::phone(index),
                &format!("customer{}@example.com", index),
                balance_cents,
            )
            .await?;
        Ok(account.id)
    }
}
