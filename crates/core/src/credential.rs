//! # Credential Module
//!
//! Lưu password, PIN và câu trả lời bảo mật, kiểm tra theo policy.
//! Mọi so sánh đều là so sánh chính xác, phân biệt hoa thường.

use crate::error::{BankError, BankResult};

/// Độ dài password tối thiểu
pub const MIN_PASSWORD_LEN: usize = 8;

/// Khoảng giá trị hợp lệ của PIN 4 chữ số
pub const PIN_RANGE: std::ops::RangeInclusive<u32> = 1000..=9999;

/// Kiểm tra độ mạnh password.
///
/// Cần ít nhất 8 ký tự, có chữ hoa, chữ thường, chữ số và ít nhất một ký tự
/// không thuộc ba nhóm trên. Phân loại theo ASCII: ký tự non-ASCII tính là
/// ký tự đặc biệt.
pub fn is_strong_password(candidate: &str) -> bool {
    if candidate.chars().count() < MIN_PASSWORD_LEN {
        return false;
    }

    let (mut upper, mut lower, mut digit, mut special) = (false, false, false, false);
    for c in candidate.chars() {
        if c.is_ascii_uppercase() {
            upper = true;
        } else if c.is_ascii_lowercase() {
            lower = true;
        } else if c.is_ascii_digit() {
            digit = true;
        } else {
            special = true;
        }
    }

    upper && lower && digit && special
}

/// Kiểm tra PIN nằm trong [1000, 9999]
pub fn is_valid_pin(candidate: u32) -> bool {
    PIN_RANGE.contains(&candidate)
}

/// Bộ credential của một account
#[derive(Clone)]
pub struct Credentials {
    password: String,
    pin: u32,
    security_answer: String,
}

impl Credentials {
    /// Tạo credentials mới, validate password và PIN
    pub fn new(password: &str, pin: u32, security_answer: &str) -> BankResult<Self> {
        if !is_strong_password(password) {
            return Err(BankError::WeakPassword);
        }
        if !is_valid_pin(pin) {
            return Err(BankError::InvalidPin(pin));
        }

        Ok(Self {
            password: password.to_string(),
            pin,
            security_answer: security_answer.to_string(),
        })
    }

    /// Đặt password mới. Bị từ chối thì state giữ nguyên.
    pub fn set_password(&mut self, candidate: &str) -> BankResult<()> {
        if !is_strong_password(candidate) {
            return Err(BankError::WeakPassword);
        }
        self.password = candidate.to_string();
        Ok(())
    }

    /// Đặt PIN mới
    pub fn set_pin(&mut self, candidate: u32) -> BankResult<()> {
        if !is_valid_pin(candidate) {
            return Err(BankError::InvalidPin(candidate));
        }
        self.pin = candidate;
        Ok(())
    }

    pub fn verify_password(&self, input: &str) -> bool {
        self.password == input
    }

    pub fn verify_pin(&self, input: u32) -> bool {
        self.pin == input
    }

    pub fn verify_security_answer(&self, input: &str) -> bool {
        self.security_answer == input
    }

    /// Đổi password, yêu cầu password cũ đúng
    pub fn change_password(&mut self, old: &str, new: &str) -> BankResult<()> {
        if !self.verify_password(old) {
            return Err(BankError::WrongOldPassword);
        }
        self.set_password(new)
    }
}

// Không bao giờ in secrets ra log
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("password", &"***")
            .field("pin", &"****")
            .field("security_answer", &"***")
            .finish()
    }
}
