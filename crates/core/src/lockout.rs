//! # Lockout Module
//!
//! State machine khóa đăng nhập sau nhiều lần sai password.
//!
//! ```text
//!            success / failure (< max)
//!              ┌──────────┐
//!              ▼          │
//!          ┌────────┐  failure == max  ┌──────────┐
//!   ──────▶│  Open  │─────────────────▶│  Locked  │──┐ attempt trong thời gian khóa
//!          └────────┘                  └──────────┘◀─┘ -> StillLocked
//!              ▲    elapsed >= duration     │
//!              └────────────────────────────┘
//! ```
//!
//! Hết hạn khóa được đánh giá lazily ở lần đăng nhập kế tiếp, không có timer.
//! Guard chỉ được dùng khi login, PIN sai không tính vào đây.

use crate::config::LockoutPolicy;
use crate::error::{BankError, BankResult};
use chrono::{DateTime, Utc};

/// Trạng thái của guard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockState {
    Open,
    Locked { since: DateTime<Utc> },
}

/// Theo dõi số lần sai và thời điểm khóa của một account
#[derive(Debug, Clone)]
pub struct LockoutGuard {
    policy: LockoutPolicy,
    failed_attempts: u32,
    state: LockState,
}

impl LockoutGuard {
    pub fn new(policy: LockoutPolicy) -> Self {
        Self {
            policy,
            failed_attempts: 0,
            state: LockState::Open,
        }
    }

    pub fn failed_attempts(&self) -> u32 {
        self.failed_attempts
    }

    pub fn state(&self) -> LockState {
        self.state
    }

    pub fn is_locked(&self) -> bool {
        matches!(self.state, LockState::Locked { .. })
    }

    /// Kiểm tra có được phép thử đăng nhập tại `now` không.
    ///
    /// Nếu đang khóa và đã hết hạn thì mở khóa, reset counter về 0.
    pub fn admit(&mut self, now: DateTime<Utc>) -> BankResult<()> {
        let LockState::Locked { since } = self.state else {
            return Ok(());
        };

        let elapsed = now - since;
        let duration = self.policy.lock_duration();
        if elapsed < duration {
            let remaining = duration.checked_sub(&elapsed).unwrap_or(duration);
            let remaining_secs = remaining.num_milliseconds().saturating_add(999) / 1000;
            tracing::warn!(remaining_secs, "Login rejected, account still locked");
            return Err(BankError::StillLocked { remaining_secs });
        }

        tracing::debug!(locked_since = %since, "Lock expired, resetting attempts");
        self.state = LockState::Open;
        self.failed_attempts = 0;
        Ok(())
    }

    /// Ghi nhận credential đúng
    pub fn record_success(&mut self) {
        self.failed_attempts = 0;
    }

    /// Ghi nhận credential sai, trả về lỗi tương ứng.
    pub fn record_failure(&mut self, now: DateTime<Utc>) -> BankError {
        self.failed_attempts += 1;

        if self.failed_attempts >= self.policy.max_failed_attempts {
            self.state = LockState::Locked { since: now };
            tracing::warn!(
                attempts = self.failed_attempts,
                lock_secs = self.policy.lock_duration_secs,
                "Too many failed attempts, account locked"
            );
            return BankError::AccountLocked {
                lock_secs: self.policy.lock_duration_secs,
            };
        }

        tracing::warn!(
            attempts = self.failed_attempts,
            max_attempts = self.policy.max_failed_attempts,
            "Wrong credential"
        );
        BankError::WrongCredential {
            attempts: self.failed_attempts,
            max_attempts: self.policy.max_failed_attempts,
        }
    }

    /// Chạy một lần thử credential qua guard: admit, check, ghi nhận kết quả.
    pub fn attempt<F>(&mut self, now: DateTime<Utc>, check: F) -> BankResult<()>
    where
        F: FnOnce() -> bool,
    {
        self.admit(now)?;

        if check() {
            self.record_success();
            Ok(())
        } else {
            Err(self.record_failure(now))
        }
    }
}

impl Default for LockoutGuard {
    fn default() -> Self {
        Self::new(LockoutPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn t0() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn test_success_resets_counter() {
        let mut guard = LockoutGuard::default();

        assert!(matches!(
            guard.attempt(t0(), || false),
            Err(BankError::WrongCredential { attempts: 1, max_attempts: 3 })
        ));
        assert_eq!(guard.failed_attempts(), 1);

        guard.attempt(t0(), || true).unwrap();
        assert_eq!(guard.failed_attempts(), 0);
        assert_eq!(guard.state(), LockState::Open);
    }

    #[test]
    fn test_third_failure_locks() {
        let mut guard = LockoutGuard::default();

        assert!(guard.attempt(t0(), || false).is_err());
        assert!(guard.attempt(t0(), || false).is_err());
        assert_eq!(
            guard.attempt(t0(), || false),
            Err(BankError::AccountLocked { lock_secs: 30 })
        );
        assert!(guard.is_locked());
        assert_eq!(guard.failed_attempts(), 3);
        assert_eq!(guard.state(), LockState::Locked { since: t0() });
    }

    #[test]
    fn test_locked_skips_check() {
        let mut guard = LockoutGuard::default();
        for _ in 0..3 {
            let _ = guard.attempt(t0(), || false);
        }

        let mut called = false;
        let result = guard.attempt(t0() + Duration::seconds(10), || {
            called = true;
            true
        });

        assert_eq!(result, Err(BankError::StillLocked { remaining_secs: 20 }));
        assert!(!called);
        assert_eq!(guard.failed_attempts(), 3);
    }

    #[test]
    fn test_remaining_rounds_up() {
        let mut guard = LockoutGuard::default();
        for _ in 0..3 {
            let _ = guard.attempt(t0(), || false);
        }

        let now = t0() + Duration::milliseconds(29_500);
        assert_eq!(
            guard.admit(now),
            Err(BankError::StillLocked { remaining_secs: 1 })
        );
    }

    #[test]
    fn test_expiry_at_exact_boundary() {
        let mut guard = LockoutGuard::default();
        for _ in 0..3 {
            let _ = guard.attempt(t0(), || false);
        }

        guard.attempt(t0() + Duration::seconds(30), || true).unwrap();
        assert_eq!(guard.state(), LockState::Open);
        assert_eq!(guard.failed_attempts(), 0);
    }

    #[test]
    fn test_failure_after_expiry_starts_fresh_count() {
        let mut guard = LockoutGuard::default();
        for _ in 0..3 {
            let _ = guard.attempt(t0(), || false);
        }

        let later = t0() + Duration::seconds(31);
        assert!(matches!(
            guard.attempt(later, || false),
            Err(BankError::WrongCredential { attempts: 1, .. })
        ));
        assert!(!guard.is_locked());
    }

    #[test]
    fn test_custom_policy() {
        let mut guard = LockoutGuard::new(LockoutPolicy {
            max_failed_attempts: 1,
            lock_duration_secs: 5,
        });

        assert_eq!(
            guard.attempt(t0(), || false),
            Err(BankError::AccountLocked { lock_secs: 5 })
        );
        assert!(guard.admit(t0() + Duration::seconds(5)).is_ok());
    }

    #[test]
    fn test_huge_lock_duration_reports_instead_of_panicking() {
        let mut guard = LockoutGuard::new(LockoutPolicy {
            max_failed_attempts: 1,
            lock_duration_secs: i64::MAX,
        });
        let _ = guard.attempt(t0(), || false);

        let err = guard.attempt(t0() + Duration::seconds(1), || true).unwrap_err();
        assert!(matches!(err, BankError::StillLocked { remaining_secs } if remaining_secs > 0));

        // đồng hồ lùi lại trước thời điểm khóa
        let err = guard.attempt(t0() - Duration::days(1), || true).unwrap_err();
        assert!(err.is_lockout());
        assert!(guard.is_locked());
    }
}
