//! # Error Module
//!
//! Định nghĩa các domain errors cho Safebank sử dụng thiserror.
//! Mọi lỗi đều là kết quả trả về cho caller, không có lỗi nào làm crash process.

use rust_decimal::Decimal;
use thiserror::Error;

/// Core domain errors.
///
/// Tất cả đều có thể retry từ phía caller, ngoại trừ `AccountLocked` và
/// `StillLocked` cần chờ hết thời gian khóa.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BankError {
    // === Credential errors ===
    #[error("Weak password: need at least 8 characters with upper, lower, digit and special")]
    WeakPassword,

    #[error("Invalid PIN: {0} is not a 4-digit PIN")]
    InvalidPin(u32),

    #[error("Current password does not match")]
    WrongOldPassword,

    #[error("Security answer does not match")]
    WrongSecurityAnswer,

    #[error("Wrong PIN")]
    WrongPin,

    // === Login errors ===
    #[error("Wrong password ({attempts}/{max_attempts} failed attempts)")]
    WrongCredential { attempts: u32, max_attempts: u32 },

    #[error("Account locked for {lock_secs} seconds")]
    AccountLocked { lock_secs: i64 },

    #[error("Account locked, try again in {remaining_secs} seconds")]
    StillLocked { remaining_secs: i64 },

    #[error("OTP verification failed")]
    OtpFailed,

    // === Transaction errors ===
    #[error("Savings withdrawal limit reached ({limit} withdrawals)")]
    SavingsLimitReached { limit: u32 },

    #[error("Insufficient balance: need {needed}, available {available}")]
    InsufficientBalance { needed: Decimal, available: Decimal },

    #[error("Interest not available for current account")]
    NotApplicable,

    #[error("Amount {amount} overflows balance {balance}")]
    AmountOverflow { balance: Decimal, amount: Decimal },

    // === Opening / registry errors ===
    #[error("Account not found: {0}")]
    AccountNotFound(u64),

    #[error("Account number already exists: {0}")]
    AccountAlreadyExists(u64),

    #[error("Minimum balance for {account_type} is {minimum}, got {given}")]
    BelowMinimumBalance {
        account_type: String,
        minimum: Decimal,
        given: Decimal,
    },

    #[error("Invalid name: {0:?}")]
    InvalidName(String),

    #[error("Invalid {id_type} number: {number}")]
    InvalidIdentity { id_type: String, number: String },
}

/// Result type alias với BankError
pub type BankResult<T> = Result<T, BankError>;

impl BankError {
    /// Kiểm tra có phải lỗi do account đang bị khóa không
    pub fn is_lockout(&self) -> bool {
        matches!(
            self,
            BankError::AccountLocked { .. } | BankError::StillLocked { .. }
        )
    }

    /// Kiểm tra caller có thể thử lại ngay không (không cần chờ timer)
    pub fn is_retryable(&self) -> bool {
        !self.is_lockout()
    }

    /// Kiểm tra có phải lỗi xác thực (password, PIN, OTP, security answer) không
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            BankError::WrongCredential { .. }
                | BankError::WrongOldPassword
                | BankError::WrongSecurityAnswer
                | BankError::WrongPin
                | BankError::OtpFailed
        )
    }
}
