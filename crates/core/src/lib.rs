//! # Safebank Core
//!
//! Máy trạng thái bảo mật và giao dịch của một account:
//! credential, OTP, lockout, ledger, account và registry.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────── AccountRegistry ────────────────────────┐
//! │  IdentityVerifier   Clock                                       │
//! │  ┌────────────────────────── Account ────────────────────────┐  │
//! │  │  LockoutGuard   Credentials   OtpChallenge   Ledger       │  │
//! │  └───────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use safebank_core::{AccountRegistry, BankConfig, EchoChannel};
//!
//! let mut registry = AccountRegistry::new(BankConfig::default());
//! registry.open_account(application, &mut EchoChannel::new())?;
//!
//! let mut session = registry.login(1001, "Secret#123", &mut EchoChannel::new())?;
//! session.deposit(dec!(100));
//! session.withdraw(4321, dec!(30))?;
//! ```

pub mod account;
pub mod clock;
pub mod config;
pub mod credential;
pub mod error;
pub mod identity;
pub mod ledger;
pub mod lockout;
pub mod otp;
pub mod registry;

pub use account::{Account, AccountApplication, AccountType, PasswordReset, Session};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{AccountPolicy, BankConfig, IdentityConfig, LockoutPolicy};
pub use credential::{is_strong_password, is_valid_pin, Credentials};
pub use error::{BankError, BankResult};
pub use identity::{
    IdDocument, IdType, IdentityVerifier, LenientVerifier, StrictVerifier, VerifierKind,
};
pub use ledger::{Ledger, LedgerEntry, TransactionKind};
pub use lockout::{LockState, LockoutGuard};
pub use otp::{EchoChannel, FixedChannel, OtpChallenge, OtpChannel};
pub use registry::AccountRegistry;
