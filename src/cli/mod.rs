use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::application::LedgerService;
use crate::domain::{format_cents, parse_cents, Account, AccountId, Cents};

/// Sportello - Teller Account Ledger
#[derive(Parser)]
#[command(name = "sportello")]
#[command(about = "A teller-side bank account ledger backed by SQLite")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, default_value = "sportello.db")]
    pub database: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// Open a new customer account
    Create {
        /// Customer name
        name: String,

        /// Customer phone number (10 digits, starting with 6-9, unique)
        #[arg(short, long)]
        phone: String,

        /// Customer email address
        #[arg(short, long)]
        email: String,

        /// Starting balance (e.g., "500.00" or "500"), must be positive
        #[arg(short, long)]
        balance: String,
    },

    /// Show the balance of an account
    Balance {
        /// Account number
        account: AccountId,
    },

    /// Deposit funds into an account
    Deposit {
        /// Account number
        account: AccountId,

        /// Amount to deposit (e.g., "50.00" or "50")
        amount: String,
    },

    /// Withdraw funds from an account
    Withdraw {
        /// Account number
        account: AccountId,

        /// Amount to withdraw (e.g., "50.00" or "50")
        amount: String,
    },

    /// Transfer funds between two accounts
    Transfer {
        /// Amount to transfer (e.g., "50.00" or "50")
        amount: String,

        /// Account number to debit
        #[arg(long)]
        from: AccountId,

        /// Account number to credit
        #[arg(long)]
        to: AccountId,
    },

    /// Close a customer account
    Delete {
        /// Account number
        account: AccountId,
    },

    /// List all accounts
    List,

    /// Verify account table integrity
    Check,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Init => {
                LedgerService::init(&self.database).await?;
                println!("Database initialized: {}", self.database);
            }

            Commands::Create {
                name,
                phone,
                email,
                balance,
            } => {
                let service = LedgerService::connect(&self.database).await?;
                let balance_cents = parse_amount(&balance)?;

                let account = service
                    .create_account(&name, &phone, &email, balance_cents)
                    .await?;
                println!(
                    "Created account {} for {} with balance {}",
                    account.id,
                    account.name,
                    format_cents(account.balance_cents)
                );
            }

            Commands::Balance { account } => {
                let service = LedgerService::connect(&self.database).await?;
                let balance = service.get_balance(account).await?;
                println!("Account {} balance: {}", account, format_cents(balance));
            }

            Commands::Deposit { account, amount } => {
                let service = LedgerService::connect(&self.database).await?;
                let amount_cents = parse_amount(&amount)?;

                let balance = service.deposit(account, amount_cents).await?;
                println!(
                    "Deposited {} into account {}. New balance: {}",
                    format_cents(amount_cents),
                    account,
                    format_cents(balance)
                );
            }

            Commands::Withdraw { account, amount } => {
                let service = LedgerService::connect(&self.database).await?;
                let amount_cents = parse_amount(&amount)?;

                let balance = service.withdraw(account, amount_cents).await?;
                println!(
                    "Withdrew {} from account {}. New balance: {}",
                    format_cents(amount_cents),
                    account,
                    format_cents(balance)
                );
            }

            Commands::Transfer { amount, from, to } => {
                let service = LedgerService::connect(&self.database).await?;
                let amount_cents = parse_amount(&amount)?;

                let (from_balance, to_balance) =
                    service.transfer(from, to, amount_cents).await?;
                println!(
                    "Transferred {} from account {} to account {}",
                    format_cents(amount_cents),
                    from,
                    to
                );
                println!("  Account {} balance: {}", from, format_cents(from_balance));
                println!("  Account {} balance: {}", to, format_cents(to_balance));
            }

            Commands::Delete { account } => {
                let service = LedgerService::connect(&self.database).await?;
                let deleted = service.delete_account(account).await?;
                println!("Deleted account {} ({})", deleted.id, deleted.name);
                if deleted.balance_cents > 0 {
                    eprintln!(
                        "Warning: account was closed with a remaining balance of {}",
                        format_cents(deleted.balance_cents)
                    );
                }
            }

            Commands::List => {
                let service = LedgerService::connect(&self.database).await?;
                let accounts = service.list_accounts().await?;
                print_account_table(&accounts);
            }

            Commands::Check => {
                let service = LedgerService::connect(&self.database).await?;
                let report = service.check_integrity().await?;

                println!("Accounts:    {}", report.account_count);
                println!("Total funds: {}", format_cents(report.total_cents));

                if report.is_clean() {
                    println!("Integrity:   OK");
                } else {
                    for id in &report.negative_balances {
                        println!("Integrity:   account {} has a negative balance", id);
                    }
                    for (phone, ids) in &report.duplicate_phones {
                        println!(
                            "Integrity:   phone {} is shared by accounts {:?}",
                            phone, ids
                        );
                    }
                    anyhow::bail!("integrity check failed");
                }
            }
        }

        Ok(())
    }
}

fn parse_amount(input: &str) -> Result<Cents> {
    parse_cents(input).context("Invalid amount format. Use '50.00' or '50'")
}

fn print_account_table(accounts: &[Account]) {
    if accounts.is_empty() {
        println!("No accounts found.");
        return;
    }

    println!(
        "{:<8} {:<20} {:<12} {:<28} {:>12}",
        "ACCOUNT", "NAME", "PHONE", "EMAIL", "BALANCE"
    );
    println!("{}", "-".repeat(84));
    for account in accounts {
        println!(
            "{:<8} {:<20} {:<12} {:<28} {:>12}",
            account.id,
            account.name,
            account.phone,
            account.email,
            format_cents(account.balance_cents)
        );
    }
}
