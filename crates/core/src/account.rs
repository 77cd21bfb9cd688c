//! # Account Module
//!
//! Định nghĩa Account - điều phối credential, lockout, OTP và ledger.
//!
//! Các thao tác trong phiên (balance, deposit, withdraw, ...) đi qua
//! [`Session`], chỉ có được sau khi [`Account::login`] thành công.

use crate::config::{AccountPolicy, BankConfig};
use crate::credential::Credentials;
use crate::error::{BankError, BankResult};
use crate::identity::IdDocument;
use crate::ledger::{Ledger, LedgerEntry, TransactionKind};
use crate::lockout::LockoutGuard;
use crate::otp::{self, OtpChannel};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Deref, DerefMut};
use uuid::Uuid;

/// Loại tài khoản
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Tiết kiệm: có lãi, giới hạn số lần rút
    Savings,
    /// Vãng lai: không lãi, không giới hạn rút
    Current,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Savings => "savings",
            AccountType::Current => "current",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "savings" => Some(AccountType::Savings),
            "current" => Some(AccountType::Current),
            _ => None,
        }
    }

    /// Số dư tối thiểu khi mở tài khoản
    pub fn minimum_balance(&self, policy: &AccountPolicy) -> Decimal {
        match self {
            AccountType::Savings => policy.savings_min_balance,
            AccountType::Current => policy.current_min_balance,
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Hồ sơ mở tài khoản, các field đã qua kiểm tra format ở tầng input.
#[derive(Debug, Clone)]
pub struct AccountApplication {
    pub number: u64,
    pub name: String,
    pub account_type: AccountType,
    pub password: String,
    pub pin: u32,
    pub id_document: IdDocument,
    pub security_answer: String,
    pub initial_deposit: Decimal,
}

/// Tài khoản ngân hàng.
///
/// Sở hữu riêng lockout guard và ledger. Số dư chỉ được kiểm tra tối thiểu
/// lúc mở tài khoản.
#[derive(Debug)]
pub struct Account {
    number: u64,
    name: String,
    account_type: AccountType,
    id_document: IdDocument,
    credentials: Credentials,
    balance: Decimal,
    /// Đếm trong suốt vòng đời account, không reset theo kỳ
    withdrawal_count: u32,
    ledger: Ledger,
    lockout: LockoutGuard,
    policy: AccountPolicy,
    created_at: DateTime<Utc>,
}

impl Account {
    /// Tạo account từ hồ sơ: kiểm tra password, PIN và số dư tối thiểu.
    ///
    /// Số dư ban đầu không ghi vào ledger.
    pub fn open(
        application: AccountApplication,
        config: &BankConfig,
        now: DateTime<Utc>,
    ) -> BankResult<Self> {
        let credentials = Credentials::new(
            &application.password,
            application.pin,
            &application.security_answer,
        )?;

        let minimum = application.account_type.minimum_balance(&config.accounts);
        if application.initial_deposit < minimum {
            return Err(BankError::BelowMinimumBalance {
                account_type: application.account_type.to_string(),
                minimum,
                given: application.initial_deposit,
            });
        }

        Ok(Self {
            number: application.number,
            name: application.name,
            account_type: application.account_type,
            id_document: application.id_document,
            credentials,
            balance: application.initial_deposit,
            withdrawal_count: 0,
            ledger: Ledger::new(),
            lockout: LockoutGuard::new(config.lockout),
            policy: config.accounts,
            created_at: now,
        })
    }

    pub fn number(&self) -> u64 {
        self.number
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn account_type(&self) -> AccountType {
        self.account_type
    }

    pub fn id_document(&self) -> &IdDocument {
        &self.id_document
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn withdrawal_count(&self) -> u32 {
        self.withdrawal_count
    }

    pub fn failed_login_attempts(&self) -> u32 {
        self.lockout.failed_attempts()
    }

    pub fn is_locked(&self) -> bool {
        self.lockout.is_locked()
    }

    // === Authentication ===

    /// Đăng nhập: lockout guard, password, rồi OTP.
    ///
    /// OTP chỉ được phát hành sau khi password đúng. OTP sai không tính vào
    /// số lần sai của lockout.
    pub fn login(
        &mut self,
        password: &str,
        otp: &mut dyn OtpChannel,
        now: DateTime<Utc>,
    ) -> BankResult<Session<'_>> {
        let credentials = &self.credentials;
        self.lockout
            .attempt(now, || credentials.verify_password(password))?;

        if !otp::issue_and_verify(otp) {
            return Err(BankError::OtpFailed);
        }

        let session = Session::start(self, now);
        tracing::info!(
            account = session.account.number,
            session_id = %session.id,
            "Login successful"
        );
        Ok(session)
    }

    /// Đổi password khi đã đăng nhập
    pub fn change_password(&mut self, old: &str, new: &str) -> BankResult<()> {
        self.credentials.change_password(old, new)?;
        tracing::info!(account = self.number, "Password changed");
        Ok(())
    }

    /// Quên password: security answer, rồi OTP, rồi password mới.
    ///
    /// Không đi qua lockout guard.
    pub fn forgot_password(
        &mut self,
        security_answer: &str,
        otp: &mut dyn OtpChannel,
        new_password: &str,
    ) -> BankResult<()> {
        self.begin_password_reset(security_answer, otp)?
            .complete(new_password)
    }

    /// Bước đầu của quên password: kiểm tra security answer rồi OTP.
    ///
    /// Trả về [`PasswordReset`] để caller hỏi password mới sau khi OTP đã qua.
    pub fn begin_password_reset(
        &mut self,
        security_answer: &str,
        otp: &mut dyn OtpChannel,
    ) -> BankResult<PasswordReset<'_>> {
        if !self.credentials.verify_security_answer(security_answer) {
            tracing::warn!(account = self.number, "Wrong security answer");
            return Err(BankError::WrongSecurityAnswer);
        }

        if !otp::issue_and_verify(otp) {
            return Err(BankError::OtpFailed);
        }

        Ok(PasswordReset { account: self })
    }

    // === Banking ===

    /// Xem số dư, yêu cầu PIN mỗi lần gọi
    pub fn check_balance(&self, pin: u32) -> BankResult<Decimal> {
        if !self.credentials.verify_pin(pin) {
            return Err(BankError::WrongPin);
        }
        Ok(self.balance)
    }

    /// Nạp tiền. Không cần PIN, không giới hạn.
    ///
    /// Chỉ thất bại khi số dư vượt range của `Decimal`, khi đó không ghi ledger.
    pub fn deposit(&mut self, amount: Decimal) -> BankResult<()> {
        if amount <= Decimal::ZERO {
            tracing::warn!(account = self.number, %amount, "Non-positive deposit accepted");
        }
        let Some(balance) = self.balance.checked_add(amount) else {
            tracing::warn!(
                account = self.number,
                balance = %self.balance,
                %amount,
                "Deposit overflows balance"
            );
            return Err(BankError::AmountOverflow {
                balance: self.balance,
                amount,
            });
        };

        self.balance = balance;
        self.ledger.record(TransactionKind::Deposit, amount);
        Ok(())
    }

    /// Rút tiền: PIN, hạn mức Savings, rồi số dư.
    ///
    /// Số tiền âm không bị chặn ở đây (tầng input lọc), chỉ ghi `warn!`.
    pub fn withdraw(&mut self, pin: u32, amount: Decimal) -> BankResult<()> {
        if !self.credentials.verify_pin(pin) {
            return Err(BankError::WrongPin);
        }

        if self.account_type == AccountType::Savings
            && self.withdrawal_count >= self.policy.savings_withdrawal_limit
        {
            return Err(BankError::SavingsLimitReached {
                limit: self.policy.savings_withdrawal_limit,
            });
        }

        if amount > self.balance {
            return Err(BankError::InsufficientBalance {
                needed: amount,
                available: self.balance,
            });
        }

        if amount <= Decimal::ZERO {
            tracing::warn!(account = self.number, %amount, "Non-positive withdrawal accepted");
        }
        let Some(balance) = self.balance.checked_sub(amount) else {
            tracing::warn!(
                account = self.number,
                balance = %self.balance,
                %amount,
                "Withdrawal overflows balance"
            );
            return Err(BankError::AmountOverflow {
                balance: self.balance,
                amount,
            });
        };

        self.balance = balance;
        self.withdrawal_count = self.withdrawal_count.saturating_add(1);
        self.ledger.record(TransactionKind::Withdraw, amount);
        Ok(())
    }

    /// Lãi năm, chỉ cho Savings
    pub fn interest(&self) -> BankResult<Decimal> {
        match self.account_type {
            AccountType::Savings => self
                .balance
                .checked_mul(self.policy.savings_interest_rate)
                .ok_or(BankError::AmountOverflow {
                    balance: self.balance,
                    amount: self.policy.savings_interest_rate,
                }),
            AccountType::Current => Err(BankError::NotApplicable),
        }
    }

    /// Lịch sử giao dịch theo thứ tự
    pub fn transactions(&self) -> std::slice::Iter<'_, LedgerEntry> {
        self.ledger.entries()
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Account {} ({}, {})",
            self.number, self.name, self.account_type
        )
    }
}

/// Quyền đặt lại password, có được sau security answer và OTP.
///
/// Password yếu không làm mất quyền, caller có thể gọi lại `complete`.
#[derive(Debug)]
pub struct PasswordReset<'a> {
    account: &'a mut Account,
}

impl PasswordReset<'_> {
    pub fn complete(&mut self, new_password: &str) -> BankResult<()> {
        self.account.credentials.set_password(new_password)?;
        tracing::info!(account = self.account.number, "Password reset");
        Ok(())
    }
}

/// Phiên đăng nhập đã xác thực.
///
/// Mượn mutable account trong suốt phiên, deref ra [`Account`].
#[derive(Debug)]
pub struct Session<'a> {
    id: Uuid,
    started_at: DateTime<Utc>,
    account: &'a mut Account,
}

impl<'a> Session<'a> {
    fn start(account: &'a mut Account, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: now,
            account,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Kết thúc phiên
    pub fn logout(self) {
        tracing::info!(account = self.account.number, session_id = %self.id, "Logged out");
    }
}

impl Deref for Session<'_> {
    type Target = Account;

    fn deref(&self) -> &Account {
        self.account
    }
}

impl DerefMut for Session<'_> {
    fn deref_mut(&mut self) -> &mut Account {
        self.account
    }
}
