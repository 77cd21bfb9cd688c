//! # Config Module
//!
//! Cấu hình các ngưỡng nghiệp vụ (lockout, số dư tối thiểu, hạn mức rút tiền,
//! lãi suất, chế độ kiểm tra giấy tờ). Tất cả đều có default, có thể override
//! bằng file JSON.

use crate::identity::VerifierKind;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Cấu hình tổng của Safebank
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BankConfig {
    #[serde(default)]
    pub lockout: LockoutPolicy,
    #[serde(default)]
    pub accounts: AccountPolicy,
    #[serde(default)]
    pub identity: IdentityConfig,
}

/// Chính sách khóa đăng nhập
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockoutPolicy {
    /// Số lần sai password liên tiếp trước khi khóa
    #[serde(default = "default_max_failed_attempts")]
    pub max_failed_attempts: u32,

    /// Thời gian khóa (giây)
    #[serde(default = "default_lock_duration_secs")]
    pub lock_duration_secs: i64,
}

/// Chính sách theo loại tài khoản
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountPolicy {
    /// Số dư mở tài khoản tối thiểu cho Savings
    #[serde(default = "default_savings_min_balance")]
    pub savings_min_balance: Decimal,

    /// Số dư mở tài khoản tối thiểu cho Current
    #[serde(default = "default_current_min_balance")]
    pub current_min_balance: Decimal,

    /// Số lần rút tối đa trong suốt vòng đời tài khoản Savings
    #[serde(default = "default_savings_withdrawal_limit")]
    pub savings_withdrawal_limit: u32,

    /// Lãi suất năm cho Savings
    #[serde(default = "default_savings_interest_rate")]
    pub savings_interest_rate: Decimal,
}

/// Chọn bộ kiểm tra giấy tờ tùy thân
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityConfig {
    #[serde(default)]
    pub verifier: VerifierKind,
}

fn default_max_failed_attempts() -> u32 {
    3
}

fn default_lock_duration_secs() -> i64 {
    30
}

fn default_savings_min_balance() -> Decimal {
    Decimal::new(500, 0)
}

fn default_current_min_balance() -> Decimal {
    Decimal::new(5_000, 0)
}

fn default_savings_withdrawal_limit() -> u32 {
    5
}

fn default_savings_interest_rate() -> Decimal {
    Decimal::new(4, 2) // 0.04
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self {
            max_failed_attempts: default_max_failed_attempts(),
            lock_duration_secs: default_lock_duration_secs(),
        }
    }
}

impl LockoutPolicy {
    /// Thời gian khóa dạng chrono Duration.
    ///
    /// Giá trị vượt range của chrono được coi là khóa vô thời hạn.
    pub fn lock_duration(&self) -> chrono::Duration {
        chrono::Duration::try_seconds(self.lock_duration_secs).unwrap_or(chrono::Duration::MAX)
    }

    fn validate(&self) -> Result<(), String> {
        if self.lock_duration_secs < 0
            || chrono::Duration::try_seconds(self.lock_duration_secs).is_none()
        {
            return Err(format!(
                "lockout.lock_duration_secs out of range: {}",
                self.lock_duration_secs
            ));
        }
        if self.max_failed_attempts == 0 {
            return Err("lockout.max_failed_attempts must be at least 1".to_string());
        }
        Ok(())
    }
}

impl Default for AccountPolicy {
    fn default() -> Self {
        Self {
            savings_min_balance: default_savings_min_balance(),
            current_min_balance: default_current_min_balance(),
            savings_withdrawal_limit: default_savings_withdrawal_limit(),
            savings_interest_rate: default_savings_interest_rate(),
        }
    }
}

impl AccountPolicy {
    fn validate(&self) -> Result<(), String> {
        let amounts = [
            ("accounts.savings_min_balance", self.savings_min_balance),
            ("accounts.current_min_balance", self.current_min_balance),
            ("accounts.savings_interest_rate", self.savings_interest_rate),
        ];
        for (field, value) in amounts {
            if value.is_sign_negative() {
                return Err(format!("{} must not be negative: {}", field, value));
            }
        }
        Ok(())
    }
}

impl BankConfig {
    /// Load configuration from JSON file.
    ///
    /// Giá trị sai kiểu hoặc ngoài range đều trả về `InvalidData`.
    pub fn from_file(path: &Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        config.validate()?;
        Ok(config)
    }

    /// Kiểm tra các giá trị nằm trong range hợp lệ
    pub fn validate(&self) -> Result<(), std::io::Error> {
        self.lockout
            .validate()
            .and_then(|()| self.accounts.validate())
            .map_err(|msg| std::io::Error::new(std::io::ErrorKind::InvalidData, msg))
    }
}
