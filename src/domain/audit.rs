use std::collections::HashMap;

use super::{Account, AccountId, Cents};

/// Result of an integrity sweep over the account table.
///
/// Negative balances and duplicate phone numbers can only appear if the
/// store's constraints were bypassed (manual edits, a broken migration),
/// so any finding here means the database needs attention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditReport {
    pub account_count: usize,
    /// Sum of all balances: the total funds the bank is holding.
    pub total_cents: Cents,
    pub negative_balances: Vec<AccountId>,
    /// Phone number -> ids of the accounts sharing it.
    pub duplicate_phones: Vec<(String, Vec<AccountId>)>,
}

impl AuditReport {
    pub fn is_clean(&self) -> bool {
        self.negative_balances.is_empty() && self.duplicate_phones.is_empty()
    }
}

/// Sweep a loaded account list for invariant violations.
pub fn audit_accounts(accounts: &[Account]) -> AuditReport {
    let total_cents = accounts.iter().map(|a| a.balance_cents).sum();

    let negative_balances: Vec<AccountId> = accounts
        .iter()
        .filter(|a| a.balance_cents < 0)
        .map(|a| a.id)
        .collect();

    let mut by_phone: HashMap<&str, Vec<AccountId>> = HashMap::new();
    for account in accounts {
        by_phone.entry(&account.phone).or_default().push(account.id);
    }
    let mut duplicate_phones: Vec<(String, Vec<AccountId>)> = by_phone
        .into_iter()
        .filter(|(_, ids)| ids.len() > 1)
        .map(|(phone, ids)| (phone.to_string(), ids))
        .collect();
    duplicate_phones.sort();

    AuditReport {
        account_count: accounts.len(),
        total_cents,
        negative_balances,
        duplicate_phones,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn make_account(id: AccountId, phone: &str, balance_cents: Cents) -> Account {
        Account {
            id,
            name: format!("Customer {id}"),
            phone: phone.to_string(),
            email: format!("customer{id}@example.com"),
            balance_cents,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_audit_empty() {
        let report = audit_accounts(&[]);
        assert_eq!(report.account_count, 0);
        assert_eq!(report.total_cents, 0);
        assert!(report.is_clean());
    }

    #[test]
    fn test_audit_clean_accounts() {
        let accounts = vec![
            make_account(1, "9876543210", 10000),
            make_account(2, "8765432109", 2500),
        ];
        let report = audit_accounts(&accounts);
        assert_eq!(report.account_count, 2);
        assert_eq!(report.total_cents, 12500);
        assert!(report.is_clean());
    }

    #[test]
    fn test_audit_flags_negative_balance() {
        let accounts = vec![
            make_account(1, "9876543210", 10000),
            make_account(2, "8765432109", -300),
        ];
        let report = audit_accounts(&accounts);
        assert_eq!(report.negative_balances, vec![2]);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_audit_flags_duplicate_phone() {
        let accounts = vec![
            make_account(1, "9876543210", 100),
            make_account(2, "9876543210", 200),
            make_account(3, "8765432109", 300),
        ];
        let report = audit_accounts(&accounts);
        assert_eq!(report.duplicate_phones.len(), 1);
        assert_eq!(report.duplicate_phones[0].0, "9876543210");
        assert_eq!(report.duplicate_phones[0].1, vec![1, 2]);
    }
}
