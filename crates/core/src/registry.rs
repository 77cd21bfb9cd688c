//! # Registry Module
//!
//! AccountRegistry sở hữu toàn bộ account trong process, tra cứu theo số tài
//! khoản. Mở tài khoản, đăng nhập và quên password đều đi qua đây.

use crate::account::{Account, AccountApplication, PasswordReset, Session};
use crate::clock::{Clock, SystemClock};
use crate::config::BankConfig;
use crate::error::{BankError, BankResult};
use crate::identity::IdentityVerifier;
use crate::otp::{self, OtpChannel};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Danh sách account theo số tài khoản
pub struct AccountRegistry {
    accounts: BTreeMap<u64, Account>,
    config: BankConfig,
    verifier: Box<dyn IdentityVerifier>,
    clock: Arc<dyn Clock>,
}

impl AccountRegistry {
    /// Tạo registry với verifier theo config và đồng hồ hệ thống
    pub fn new(config: BankConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Tạo registry với đồng hồ chỉ định
    pub fn with_clock(config: BankConfig, clock: Arc<dyn Clock>) -> Self {
        let verifier = config.identity.verifier.build();
        Self {
            accounts: BTreeMap::new(),
            config,
            verifier,
            clock,
        }
    }

    /// Thay verifier (e.g. theo flag CLI)
    pub fn with_verifier(mut self, verifier: Box<dyn IdentityVerifier>) -> Self {
        self.verifier = verifier;
        self
    }

    pub fn config(&self) -> &BankConfig {
        &self.config
    }

    pub fn verifier(&self) -> &dyn IdentityVerifier {
        &*self.verifier
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn contains(&self, number: u64) -> bool {
        self.accounts.contains_key(&number)
    }

    pub fn get(&self, number: u64) -> Option<&Account> {
        self.accounts.get(&number)
    }

    /// Mở tài khoản mới.
    ///
    /// Thứ tự: trùng số, tên, giấy tờ, password/PIN/số dư, rồi OTP.
    /// Chỉ insert khi mọi bước đều qua.
    pub fn open_account(
        &mut self,
        application: AccountApplication,
        otp: &mut dyn OtpChannel,
    ) -> BankResult<&Account> {
        let number = application.number;
        if self.accounts.contains_key(&number) {
            return Err(BankError::AccountAlreadyExists(number));
        }

        if !self.verifier.verify_name(&application.name) {
            return Err(BankError::InvalidName(application.name));
        }

        if !self.verifier.verify_document(&application.id_document) {
            return Err(BankError::InvalidIdentity {
                id_type: application.id_document.id_type.to_string(),
                number: application.id_document.number,
            });
        }

        let account = Account::open(application, &self.config, self.clock.now())?;

        if !otp::issue_and_verify(otp) {
            return Err(BankError::OtpFailed);
        }

        tracing::info!(
            account = number,
            account_type = %account.account_type(),
            "Account opened"
        );
        Ok(self.accounts.entry(number).or_insert(account))
    }

    /// Đăng nhập vào account theo số tài khoản
    pub fn login(
        &mut self,
        number: u64,
        password: &str,
        otp: &mut dyn OtpChannel,
    ) -> BankResult<Session<'_>> {
        let now = self.clock.now();
        let account = self
            .accounts
            .get_mut(&number)
            .ok_or(BankError::AccountNotFound(number))?;
        account.login(password, otp, now)
    }

    /// Quên password theo số tài khoản
    pub fn forgot_password(
        &mut self,
        number: u64,
        security_answer: &str,
        otp: &mut dyn OtpChannel,
        new_password: &str,
    ) -> BankResult<()> {
        let account = self
            .accounts
            .get_mut(&number)
            .ok_or(BankError::AccountNotFound(number))?;
        account.forgot_password(security_answer, otp, new_password)
    }

    /// Kiểm tra security answer và OTP, password mới được đặt sau qua handle
    pub fn begin_password_reset(
        &mut self,
        number: u64,
        security_answer: &str,
        otp: &mut dyn OtpChannel,
    ) -> BankResult<PasswordReset<'_>> {
        let account = self
            .accounts
            .get_mut(&number)
            .ok_or(BankError::AccountNotFound(number))?;
        account.begin_password_reset(security_answer, otp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::AccountType;
    use crate::clock::ManualClock;
    use crate::identity::{IdDocument, IdType, VerifierKind};
    use crate::otp::{EchoChannel, FixedChannel};
    use rust_decimal_macros::dec;

    fn application(number: u64) -> AccountApplication {
        AccountApplication {
            number,
            name: "Bob Stone".to_string(),
            account_type: AccountType::Savings,
            password: "Secret#123".to_string(),
            pin: 2468,
            id_document: IdDocument::new(IdType::Pan, "ABCDE1234F"),
            security_answer: "green".to_string(),
            initial_deposit: dec!(1000),
        }
    }

    #[test]
    fn test_open_and_lookup() {
        let mut registry = AccountRegistry::new(BankConfig::default());
        assert!(registry.is_empty());

        let account = registry
            .open_account(application(7), &mut EchoChannel::new())
            .unwrap();
        assert_eq!(account.number(), 7);
        assert_eq!(account.name(), "Bob Stone");

        assert!(registry.contains(7));
        assert_eq!(registry.len(), 1);
        assert!(registry.get(8).is_none());
    }

    #[test]
    fn test_duplicate_number_rejected_before_otp() {
        let mut registry = AccountRegistry::new(BankConfig::default());
        registry
            .open_account(application(7), &mut EchoChannel::new())
            .unwrap();

        let mut otp = EchoChannel::new();
        let err = registry.open_account(application(7), &mut otp).unwrap_err();
        assert_eq!(err, BankError::AccountAlreadyExists(7));
        assert!(otp.delivered().is_empty());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_otp_failure_leaves_registry_unchanged() {
        let mut registry = AccountRegistry::new(BankConfig::default());
        let err = registry
            .open_account(application(7), &mut FixedChannel(Some(1)))
            .unwrap_err();

        assert_eq!(err, BankError::OtpFailed);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_identity_checks() {
        let mut registry = AccountRegistry::new(BankConfig::default());

        let mut app = application(1);
        app.name = "B0b".to_string();
        assert_eq!(
            registry.open_account(app, &mut EchoChannel::new()).unwrap_err(),
            BankError::InvalidName("B0b".to_string())
        );

        let mut app = application(1);
        app.id_document = IdDocument::new(IdType::Pan, "abc");
        assert!(matches!(
            registry.open_account(app, &mut EchoChannel::new()).unwrap_err(),
            BankError::InvalidIdentity { .. }
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_lenient_verifier_from_config() {
        let mut config = BankConfig::default();
        config.identity.verifier = VerifierKind::Lenient;
        let mut registry = AccountRegistry::new(config);

        let mut app = application(1);
        app.id_document = IdDocument::new(IdType::Aadhaar, "X1234");
        assert!(registry.open_account(app, &mut EchoChannel::new()).is_ok());
    }

    #[test]
    fn test_with_verifier_override() {
        let mut registry = AccountRegistry::new(BankConfig::default())
            .with_verifier(VerifierKind::Lenient.build());

        let mut app = application(1);
        app.id_document = IdDocument::new(IdType::Passport, "AB12");
        assert!(registry.open_account(app, &mut EchoChannel::new()).is_ok());
    }

    #[test]
    fn test_login_unknown_account() {
        let mut registry = AccountRegistry::new(BankConfig::default());
        assert_eq!(
            registry
                .login(42, "Secret#123", &mut EchoChannel::new())
                .unwrap_err(),
            BankError::AccountNotFound(42)
        );
        assert_eq!(
            registry
                .forgot_password(42, "green", &mut EchoChannel::new(), "Fresh#2024")
                .unwrap_err(),
            BankError::AccountNotFound(42)
        );
        assert!(matches!(
            registry.begin_password_reset(42, "green", &mut EchoChannel::new()),
            Err(BankError::AccountNotFound(42))
        ));
    }

    #[test]
    fn test_login_uses_injected_clock() {
        let clock = Arc::new(ManualClock::default());
        let mut registry = AccountRegistry::with_clock(BankConfig::default(), clock.clone());
        registry
            .open_account(application(7), &mut EchoChannel::new())
            .unwrap();

        let mut otp = EchoChannel::new();
        for _ in 0..3 {
            assert!(registry.login(7, "wrong", &mut otp).is_err());
        }

        clock.advance_secs(10);
        assert!(matches!(
            registry.login(7, "Secret#123", &mut otp).unwrap_err(),
            BankError::StillLocked { remaining_secs: 20 }
        ));

        clock.advance_secs(20);
        let session = registry.login(7, "Secret#123", &mut otp).unwrap();
        assert_eq!(session.started_at(), clock.now());
    }
}
